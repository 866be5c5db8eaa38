use std::fmt;

use serde::{Deserialize, Serialize};

/// Search profile supplied once per run, by the HTTP body or CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub position: String,
    pub experience: String,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default, rename = "jobNature")]
    pub job_nature: Option<String>,
    pub location: String,
    pub skills: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobNature {
    Remote,
    Onsite,
}

impl fmt::Display for JobNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobNature::Remote => f.write_str("Remote"),
            JobNature::Onsite => f.write_str("Onsite"),
        }
    }
}

/// A normalized job record, ready for relevance filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub job_title: String,
    pub company: String,
    pub experience: String,
    #[serde(rename = "jobNature")]
    pub job_nature: JobNature,
    pub location: String,
    pub salary: String,
    pub apply_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub relevant_jobs: Vec<JobListing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_accepts_camel_case_job_nature_and_missing_optionals() {
        let json = r#"{
            "position": "Rust Developer",
            "experience": "3 years",
            "jobNature": "remote",
            "location": "Lahore, Pakistan",
            "skills": "tokio, axum"
        }"#;
        let criteria: SearchCriteria = serde_json::from_str(json).unwrap();
        assert_eq!(criteria.job_nature.as_deref(), Some("remote"));
        assert!(criteria.salary.is_none());
    }

    #[test]
    fn test_listing_serializes_job_nature_as_plain_string() {
        let listing = JobListing {
            job_title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            experience: "not found".to_string(),
            job_nature: JobNature::Remote,
            location: "Karachi".to_string(),
            salary: "Not specified".to_string(),
            apply_link: "https://jobs.example/1".to_string(),
        };
        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["jobNature"], "Remote");
        assert!(value.get("job_nature").is_none());
    }
}
