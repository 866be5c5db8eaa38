use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A job record exactly as the external source returned it.
///
/// The shape is owned by the scraper, so the record is kept as an opaque JSON
/// object; the accessors below treat `null` the same as a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawJobRecord(pub Map<String, Value>);

impl RawJobRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Returns a field as display text. Strings are returned as-is, including
    /// empty ones; numbers and booleans in their JSON form.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Returns a numeric field rendered the way the source rendered it.
    /// Non-numeric, NaN and infinite values are treated as absent.
    pub fn amount(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::Number(n) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|_| n.to_string()),
            Value::String(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|_| trimmed.to_string())
            }
            _ => None,
        }
    }

    pub fn is_truthy(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "1"
            ),
            _ => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl From<Map<String, Value>> for RawJobRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawJobRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_null_fields_are_absent() {
        let r = record(json!({"title": null, "company": "Acme"}));
        assert!(r.get("title").is_none());
        assert_eq!(r.text("company").as_deref(), Some("Acme"));
    }

    #[test]
    fn test_empty_string_is_a_present_value() {
        let r = record(json!({"title": "", "job_url": "  "}));
        assert_eq!(r.text("title").as_deref(), Some(""));
        assert_eq!(r.text("job_url").as_deref(), Some("  "));
    }

    #[test]
    fn test_amount_rejects_non_numeric_strings() {
        let r = record(json!({"min_amount": "competitive", "max_amount": " 90000 "}));
        assert!(r.amount("min_amount").is_none());
        assert_eq!(r.amount("max_amount").as_deref(), Some("90000"));
    }

    #[test]
    fn test_amount_rejects_nan_string() {
        let r = record(json!({"min_amount": "NaN"}));
        assert!(r.amount("min_amount").is_none());
    }

    #[test]
    fn test_truthiness_of_remote_flags() {
        assert!(record(json!({"is_remote": true})).is_truthy("is_remote"));
        assert!(record(json!({"is_remote": "True"})).is_truthy("is_remote"));
        assert!(record(json!({"is_remote": 1})).is_truthy("is_remote"));
        assert!(!record(json!({"is_remote": 0})).is_truthy("is_remote"));
        assert!(!record(json!({"is_remote": "false"})).is_truthy("is_remote"));
        assert!(!record(json!({})).is_truthy("is_remote"));
    }
}
