/// Parses a free-text batch answer into one relevance decision per job.
///
/// For job `n` the first line containing `Job {n}:` decides: the job is
/// relevant iff that line contains "yes" (any case). Jobs without a matching
/// line are not relevant. Unrelated commentary lines are ignored.
pub fn parse_batch_response(response: &str, batch_size: usize) -> Vec<bool> {
    (1..=batch_size)
        .map(|n| {
            let marker = format!("Job {n}:");
            response
                .lines()
                .find(|line| line.contains(&marker))
                .is_some_and(|line| line.to_lowercase().contains("yes"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_yes_no_lines() {
        assert_eq!(
            parse_batch_response("Job 1: Yes\nJob 2: No", 2),
            vec![true, false]
        );
    }

    #[test]
    fn test_tolerates_surrounding_commentary() {
        let response = "Sure! Here is my assessment:\n\n\
            Job 1: No\n\
            Job 2: yes please\n\
            Let me know if you need anything else.";
        assert_eq!(parse_batch_response(response, 2), vec![false, true]);
    }

    #[test]
    fn test_missing_marker_defaults_to_not_relevant() {
        assert_eq!(parse_batch_response("Job 1: YES", 2), vec![true, false]);
        assert_eq!(parse_batch_response("", 1), vec![false]);
    }

    #[test]
    fn test_first_matching_line_wins() {
        let response = "Job 1: No, the salary is too low\nJob 1: Yes";
        assert_eq!(parse_batch_response(response, 1), vec![false]);
    }

    #[test]
    fn test_marker_requires_colon() {
        // "Job 1 is relevant" has no "Job 1:" marker
        assert_eq!(parse_batch_response("Job 1 is relevant, yes", 1), vec![false]);
    }

    #[test]
    fn test_zero_batch_size_yields_nothing() {
        assert!(parse_batch_response("Job 1: Yes", 0).is_empty());
    }
}
