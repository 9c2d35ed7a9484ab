//! The persisted session record and the one place that reads/writes it.
//!
//! Layout in the key/value store:
//!
//! | key               | value                                                   |
//! |-------------------|---------------------------------------------------------|
//! | `isAuthenticated` | `"true"` while logged in, absent otherwise              |
//! | `authorization`   | the token, sent verbatim on API calls                   |
//! | `userData`        | JSON `{name, role, role_name, role_id, permissions}`    |
//! | `userName`        | display copy of `userData.name`, written by the header  |
//! | `userRole`        | display copy of `userData.role_name`                    |

use std::sync::Arc;

use pragati_client::{ApiError, RemoteUser, TokenSource};
use pragati_kv::{KVError, KVStore};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::permission::PermissionMap;

pub mod keys {
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    pub const AUTHORIZATION: &str = "authorization";
    pub const USER_DATA: &str = "userData";
    pub const USER_NAME: &str = "userName";
    pub const USER_ROLE: &str = "userRole";

    /// Everything logout removes.
    pub const ALL: [&str; 5] = [IS_AUTHENTICATED, AUTHORIZATION, USER_DATA, USER_NAME, USER_ROLE];
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] KVError),

    #[error("encode user data: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Identity and permissions of the logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub role_name: String,
    #[serde(default)]
    pub role_id: String,
    #[serde(default)]
    pub permissions: PermissionMap,
}

impl UserData {
    /// Build from the verification reply; permissions are normalized here
    /// and nowhere else.
    pub fn from_remote(user: &RemoteUser) -> Self {
        Self {
            name: user.name.clone(),
            role: user.role.clone(),
            role_name: user.role_name.clone(),
            role_id: user.id.clone(),
            permissions: PermissionMap::normalize(&user.description),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    pub user: UserData,
}

/// Session access for every component. Nothing else touches the keys.
///
/// Reads fail closed: a storage error or a malformed blob is logged and
/// treated as "not logged in" / "no permissions".
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KVStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.kv.get(key) {
            Ok(v) => v,
            Err(e) => {
                error!("session: read {} failed: {}", key, e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(keys::IS_AUTHENTICATED).as_deref() == Some("true")
    }

    pub fn token(&self) -> Option<String> {
        self.read(keys::AUTHORIZATION).filter(|t| !t.is_empty())
    }

    /// The stored user, or an empty one (no permissions) if the blob is
    /// missing or unreadable.
    pub fn user_data(&self) -> UserData {
        let Some(raw) = self.read(keys::USER_DATA) else {
            return UserData::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("session: userData is malformed, treating as no access: {}", e);
            UserData::default()
        })
    }

    pub fn permissions(&self) -> PermissionMap {
        self.user_data().permissions
    }

    pub fn get_session(&self) -> Option<SessionRecord> {
        if !self.is_authenticated() {
            return None;
        }
        Some(SessionRecord {
            token: self.token().unwrap_or_default(),
            user: self.user_data(),
        })
    }

    /// Persist a fresh session in one write.
    pub fn set_session(&self, record: &SessionRecord) -> Result<(), SessionError> {
        let user = serde_json::to_string(&record.user)?;
        self.kv.set_many(&[
            (keys::IS_AUTHENTICATED, "true"),
            (keys::AUTHORIZATION, record.token.as_str()),
            (keys::USER_DATA, user.as_str()),
        ])?;
        info!("session: started for {}", record.user.name);
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), SessionError> {
        self.kv.delete_many(&keys::ALL)?;
        info!("session: cleared");
        Ok(())
    }

    /// Refresh the display copies the header shows.
    pub fn set_header_copies(&self) -> Result<(), SessionError> {
        let user = self.user_data();
        self.kv.set_many(&[
            (keys::USER_NAME, user.name.as_str()),
            (keys::USER_ROLE, user.role_name.as_str()),
        ])?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TokenSource for SessionStore {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        Ok(SessionStore::token(self))
    }
}
