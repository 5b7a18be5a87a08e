//! Recruiter-logged pipeline events: submissions, interviews, deals and dropouts.

mod domain;
mod service;
mod validation;

pub use domain::{EntryDetails, EntryReceipt, EntryType, RecruiterEntry, MINIMUM_CV_MATCH_PERCENT};
pub use service::{EntryService, EntryServiceError, SUBMISSIONS_PATH};
pub use validation::{validate_entry, EntryValidationError};
