use secrecy::SecretString;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::session::SessionUser;

/// Row as stored in the `users` table.
#[derive(FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// User record. The hash is wiped from memory when the value is dropped.
#[derive(Debug)]
pub struct User {
    pub id: Uuid,                    // unique user ID
    pub username: String,            // unique, case sensitive
    pub email: String,               // unique, lowercase
    pub password_hash: SecretString, // Argon2 PHC string, never plaintext
    pub created_at: OffsetDateTime,  // creation timestamp
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: SecretString::from(row.password_hash),
            created_at: row.created_at,
        }
    }
}

impl User {
    /// Non-secret identity fields, as kept in a session.
    pub fn identity(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// Values for a new `users` row.
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
