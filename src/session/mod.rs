//! Server-side sessions.
//!
//! A session maps an opaque identifier, delivered to the browser in a signed
//! cookie, to a snapshot of the signed-in user. Handlers only ever talk to the
//! [`SessionStore`] capability held in `AppState`.

use std::fmt;

use anyhow::Context;
use axum::async_trait;
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub mod cookie;
pub mod memory;

pub use cookie::SessionCookies;
pub use memory::MemorySessionStore;

/// Opaque session identifier. Never logged in full.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> anyhow::Result<Self> {
        let mut bytes = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut bytes)
            .context("failed to generate session id")?;
        Ok(Self(Base64UrlUnpadded::encode_string(&bytes)))
    }

    pub(crate) fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SessionId({prefix}…)")
    }
}

/// Identity snapshot kept in a session. Carries no secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &SessionId) -> anyhow::Result<Option<SessionUser>>;
    async fn set(&self, id: &SessionId, user: SessionUser) -> anyhow::Result<()>;
    /// Removing an unknown id is not an error.
    async fn destroy(&self, id: &SessionId) -> anyhow::Result<()>;
    /// Drops expired entries, returning how many were removed.
    async fn purge_expired(&self) -> anyhow::Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_url_safe() {
        let a = SessionId::generate().unwrap();
        let b = SessionId::generate().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 43);
        assert!(a
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn debug_does_not_leak_full_id() {
        let id = SessionId::from_raw("abcdefghijklmnop");
        let shown = format!("{id:?}");
        assert!(shown.starts_with("SessionId(abcdef"));
        assert!(!shown.contains("ghijklmnop"));
    }
}
