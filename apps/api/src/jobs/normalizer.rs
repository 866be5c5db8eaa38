//! Record Normalizer: maps raw scraper records onto the uniform `JobListing` shape.
//!
//! Pure and infallible: malformed fields degrade to their placeholder values.

use crate::models::{JobListing, JobNature, RawJobRecord, SearchCriteria};

/// Currency assumed when the source omits one.
pub const DEFAULT_CURRENCY: &str = "PKR";
pub const NOT_AVAILABLE: &str = "N/A";
pub const SALARY_NOT_SPECIFIED: &str = "Not specified";
/// Job boards never expose required experience in a structured field.
pub const EXPERIENCE_NOT_FOUND: &str = "not found";

/// Converts one raw record into a `JobListing`.
///
/// `_criteria` is accepted so normalization can become profile-aware without
/// changing callers; it does not influence the result today.
pub fn normalize(raw: &RawJobRecord, _criteria: &SearchCriteria) -> JobListing {
    let job_nature = if raw.is_truthy("is_remote") {
        JobNature::Remote
    } else {
        JobNature::Onsite
    };

    JobListing {
        job_title: raw.text("title").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        company: raw.text("company").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        experience: EXPERIENCE_NOT_FOUND.to_string(),
        job_nature,
        location: raw
            .text("location")
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        salary: format_salary(raw),
        apply_link: raw
            .text("job_url")
            .or_else(|| raw.text("url"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

pub fn normalize_all(raws: &[RawJobRecord], criteria: &SearchCriteria) -> Vec<JobListing> {
    raws.iter().map(|raw| normalize(raw, criteria)).collect()
}

fn format_salary(raw: &RawJobRecord) -> String {
    let currency = raw
        .text("currency")
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    match (raw.amount("min_amount"), raw.amount("max_amount")) {
        (Some(min), Some(max)) => format!("{min} - {max} {currency}"),
        (Some(min), None) => format!("{min} {currency}"),
        (None, Some(max)) => format!("{max} {currency}"),
        (None, None) => SALARY_NOT_SPECIFIED.to_string(),
    }
}
