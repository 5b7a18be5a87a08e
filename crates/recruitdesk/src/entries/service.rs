use std::sync::Arc;

use tracing::info;

use super::domain::{EntryReceipt, RecruiterEntry};
use super::validation::{validate_entry, EntryValidationError};
use crate::api::{ApiError, CrmClient, HttpMethod, Transport};
use crate::session::SessionStore;

pub const SUBMISSIONS_PATH: &str = "/api/recruiter/submissions";

/// Validates recruiter entries locally, then posts them to the CRM.
pub struct EntryService<T, S> {
    client: Arc<CrmClient<T, S>>,
}

impl<T, S> EntryService<T, S>
where
    T: Transport,
    S: SessionStore,
{
    pub fn new(client: Arc<CrmClient<T, S>>) -> Self {
        Self { client }
    }

    pub async fn submit(&self, entry: &RecruiterEntry) -> Result<EntryReceipt, EntryServiceError> {
        validate_entry(entry)?;

        let receipt: Option<EntryReceipt> = self
            .client
            .send_json(HttpMethod::Post, SUBMISSIONS_PATH, entry)
            .await?;

        info!(
            role_id = %entry.role_id,
            entry_type = entry.details.entry_type().label(),
            "recruiter entry logged"
        );
        Ok(receipt.unwrap_or_default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EntryServiceError {
    #[error(transparent)]
    Validation(#[from] EntryValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
