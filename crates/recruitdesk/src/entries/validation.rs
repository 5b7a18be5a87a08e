use super::domain::{EntryDetails, RecruiterEntry, MINIMUM_CV_MATCH_PERCENT};

/// Local checks that block an entry before any request is made.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntryValidationError {
    #[error("a role must be selected")]
    MissingRole,
    #[error("candidate name is required")]
    MissingCandidate,
    #[error(
        "CV match must be at least {}% to log a submission (got {0}%)",
        MINIMUM_CV_MATCH_PERCENT
    )]
    CvMatchBelowMinimum(f64),
    #[error("CV match percent must be between 0 and 100 (got {0})")]
    CvMatchOutOfRange(f64),
    #[error("interview level must be 1, 2 or 3 (got {0})")]
    InvalidInterviewLevel(u8),
    #[error("a dropout reason is required")]
    MissingDropoutReason,
    #[error("placement fee must be a non-negative amount")]
    InvalidPlacementFee,
}

pub fn validate_entry(entry: &RecruiterEntry) -> Result<(), EntryValidationError> {
    if entry.role_id.trim().is_empty() {
        return Err(EntryValidationError::MissingRole);
    }
    if entry.candidate_name.trim().is_empty() {
        return Err(EntryValidationError::MissingCandidate);
    }

    match &entry.details {
        EntryDetails::Submission {
            cv_match_percent, ..
        } => {
            if !(0.0..=100.0).contains(cv_match_percent) {
                return Err(EntryValidationError::CvMatchOutOfRange(*cv_match_percent));
            }
            if *cv_match_percent < MINIMUM_CV_MATCH_PERCENT {
                return Err(EntryValidationError::CvMatchBelowMinimum(*cv_match_percent));
            }
        }
        EntryDetails::Interview {
            interview_level, ..
        } => {
            if !(1..=3).contains(interview_level) {
                return Err(EntryValidationError::InvalidInterviewLevel(
                    *interview_level,
                ));
            }
        }
        EntryDetails::Deal { placement_fee, .. } => {
            if placement_fee.is_some_and(|fee| !fee.is_finite() || fee < 0.0) {
                return Err(EntryValidationError::InvalidPlacementFee);
            }
        }
        EntryDetails::Dropout { dropout_reason, .. } => {
            if dropout_reason.trim().is_empty() {
                return Err(EntryValidationError::MissingDropoutReason);
            }
        }
    }

    Ok(())
}
