pub mod job;
pub mod raw;

pub use job::{JobListing, JobNature, SearchCriteria, SearchResults};
pub use raw::RawJobRecord;
