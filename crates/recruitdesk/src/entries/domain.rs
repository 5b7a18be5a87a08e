use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lowest CV match a recruiter may log as a submission.
pub const MINIMUM_CV_MATCH_PERCENT: f64 = 85.0;

/// Event a recruiter logs against a role, posted to `/api/recruiter/submissions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterEntry {
    pub role_id: String,
    pub candidate_name: String,
    pub entry_date: NaiveDate,
    #[serde(flatten)]
    pub details: EntryDetails,
}

/// Entry payload discriminated by `entry_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry_type", rename_all = "snake_case")]
pub enum EntryDetails {
    Submission {
        cv_match_percent: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Interview {
        interview_level: u8,
        interview_date: NaiveDate,
    },
    Deal {
        deal_date: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placement_fee: Option<f64>,
    },
    Dropout {
        dropout_reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dropout_stage: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Submission,
    Interview,
    Deal,
    Dropout,
}

impl EntryType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submission => "Submission",
            Self::Interview => "Interview",
            Self::Deal => "Deal",
            Self::Dropout => "Dropout",
        }
    }
}

impl EntryDetails {
    pub const fn entry_type(&self) -> EntryType {
        match self {
            Self::Submission { .. } => EntryType::Submission,
            Self::Interview { .. } => EntryType::Interview,
            Self::Deal { .. } => EntryType::Deal,
            Self::Dropout { .. } => EntryType::Dropout,
        }
    }
}

/// Backend acknowledgement of a logged entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryReceipt {
    #[serde(default, alias = "id")]
    pub entry_id: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}
