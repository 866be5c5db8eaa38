// Prompt text for batch relevance filtering.
// Job numbers in a batch prompt are local to that batch (Job 1, Job 2, ...).

use crate::models::{JobListing, SearchCriteria};

const NOT_SPECIFIED: &str = "Not specified";

/// System prompt for providers that accept one (the secondary provider).
pub const RELEVANCE_SYSTEM: &str = "You are a helpful job matching assistant. \
    Respond with only Job X: Yes or Job X: No for each job.";

const BATCH_PREAMBLE: &str =
    "I need to determine if these job listings are relevant to a user's criteria.";

const BATCH_ANSWER_FORMAT: &str = "For each job, respond with \"Job X: Yes\" if it's relevant \
    or \"Job X: No\" if it's not relevant.";

const BATCH_CLOSING: &str =
    "For each job, respond with ONLY 'Job X: Yes' or 'Job X: No'. One line per job.";

/// Renders the user's criteria once per filtering run, in a fixed field order.
pub fn build_user_criteria_block(criteria: &SearchCriteria) -> String {
    format!(
        "Position: {}\nExperience: {}\nSalary: {}\nJob Nature: {}\nLocation: {}\nSkills: {}",
        criteria.position,
        criteria.experience,
        criteria.salary.as_deref().unwrap_or(NOT_SPECIFIED),
        criteria.job_nature.as_deref().unwrap_or(NOT_SPECIFIED),
        criteria.location,
        criteria.skills,
    )
}

pub fn build_batch_prompt(criteria_block: &str, batch: &[JobListing]) -> String {
    let mut prompt = format!(
        "{BATCH_PREAMBLE}\n\nUser criteria:\n{criteria_block}\n\n{BATCH_ANSWER_FORMAT}\n"
    );

    for (i, job) in batch.iter().enumerate() {
        prompt.push_str(&format!(
            "\nJob {}:\nJob Title: {}\nCompany: {}\nLocation: {}\nJob Nature: {}\nSalary: {}\n",
            i + 1,
            job.job_title,
            job.company,
            job.location,
            job.job_nature,
            job.salary,
        ));
    }

    prompt.push('\n');
    prompt.push_str(BATCH_CLOSING);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobNature;

    fn criteria(salary: Option<&str>) -> SearchCriteria {
        SearchCriteria {
            position: "Rust Developer".to_string(),
            experience: "3 years".to_string(),
            salary: salary.map(str::to_string),
            job_nature: None,
            location: "Lahore".to_string(),
            skills: "tokio, axum".to_string(),
        }
    }

    fn listing(title: &str) -> JobListing {
        JobListing {
            job_title: title.to_string(),
            company: "Acme".to_string(),
            experience: "not found".to_string(),
            job_nature: JobNature::Onsite,
            location: "Lahore".to_string(),
            salary: "Not specified".to_string(),
            apply_link: "N/A".to_string(),
        }
    }

    #[test]
    fn test_criteria_block_field_order_and_placeholders() {
        let block = build_user_criteria_block(&criteria(None));
        let lines: Vec<_> = block.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Position: Rust Developer",
                "Experience: 3 years",
                "Salary: Not specified",
                "Job Nature: Not specified",
                "Location: Lahore",
                "Skills: tokio, axum",
            ]
        );
    }

    #[test]
    fn test_criteria_block_includes_supplied_salary() {
        let block = build_user_criteria_block(&criteria(Some("100k PKR")));
        assert!(block.contains("Salary: 100k PKR"));
    }

    #[test]
    fn test_batch_prompt_numbers_jobs_locally() {
        let block = build_user_criteria_block(&criteria(None));
        let prompt = build_batch_prompt(&block, &[listing("First"), listing("Second")]);

        assert!(prompt.starts_with(BATCH_PREAMBLE));
        assert!(prompt.contains(&block));
        let first = prompt.find("Job 1:\nJob Title: First").unwrap();
        let second = prompt.find("Job 2:\nJob Title: Second").unwrap();
        assert!(first < second);
        assert!(!prompt.contains("Job 3:"));
        assert!(prompt.contains("Job Nature: Onsite"));
        assert!(prompt.ends_with(BATCH_CLOSING));
    }
}
