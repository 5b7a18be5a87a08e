//! The signed-in CRM user. Every request carries the user's id in
//! `x-user-id`, and exported reports are labelled with the user's name,
//! code and email.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Deserializer, Serialize};

use crate::api::DashboardRole;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(deserialize_with = "user_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub user_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<DashboardRole>,
}

impl SessionUser {
    /// Parses the stored session payload, rejecting users without an id.
    pub fn from_json(raw: &str) -> Result<Self, SessionError> {
        let user: SessionUser =
            serde_json::from_str(raw).map_err(|err| SessionError::Malformed(err.to_string()))?;
        if user.id.trim().is_empty() {
            return Err(SessionError::MissingUserId);
        }
        Ok(user)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Number(i64),
    Text(String),
}

fn user_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawUserId::deserialize(deserializer)? {
        RawUserId::Number(id) => id.to_string(),
        RawUserId::Text(id) => id.trim().to_string(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no signed-in user; log in before using the CRM")]
    Missing,
    #[error("stored session is malformed: {0}")]
    Malformed(String),
    #[error("stored session has no user id")]
    MissingUserId,
    #[error("unable to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of the current user, injected into the API client.
pub trait SessionStore: Send + Sync {
    fn current_user(&self) -> Result<SessionUser, SessionError>;
}

/// Session persisted as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, user: &SessionUser) -> Result<(), SessionError> {
        if user.id.trim().is_empty() {
            return Err(SessionError::MissingUserId);
        }
        let io_error = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let body = serde_json::to_string_pretty(user)
            .map_err(|err| SessionError::Malformed(err.to_string()))?;
        fs::write(&self.path, body).map_err(io_error)
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn current_user(&self) -> Result<SessionUser, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(SessionError::Missing),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Err(SessionError::Missing);
        }
        SessionUser::from_json(&raw)
    }
}

/// Process-local session, used by the report service and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    user: RwLock<Option<SessionUser>>,
}

impl MemorySessionStore {
    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: SessionUser) {
        if let Ok(mut guard) = self.user.write() {
            *guard = Some(user);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut guard) = self.user.write() {
            *guard = None;
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn current_user(&self) -> Result<SessionUser, SessionError> {
        let guard = self
            .user
            .read()
            .map_err(|_| SessionError::Malformed("session lock poisoned".to_string()))?;
        let user = guard.clone().ok_or(SessionError::Missing)?;
        if user.id.trim().is_empty() {
            return Err(SessionError::MissingUserId);
        }
        Ok(user)
    }
}
