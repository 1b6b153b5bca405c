use anyhow::anyhow;
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};

lazy_static! {
    /// Verified against when the account does not exist, so an unknown email
    /// costs the same as a wrong password.
    static ref DUMMY_HASH: String =
        hash_password("gatehouse-timing-equalizer-0").unwrap_or_default();
}

/// Argon2id, default parameters. The PHC string carries salt and params.
fn hasher() -> Argon2<'static> {
    Argon2::default()
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("hash password: {e}"))
}

/// `Ok(false)` on a mismatch; `Err` only when the stored value is unusable.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| anyhow!("stored hash is not a PHC string: {e}"))?;
    match hasher().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("verify password: {e}")),
    }
}

/// Hashes on the blocking pool; Argon2 is deliberately slow.
pub async fn hash_password_async(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain)).await?
}

/// Verifies on the blocking pool. `None` checks against a dummy hash and
/// always returns `false`.
pub async fn verify_password_async(
    plain: String,
    hash: Option<SecretString>,
) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&plain, hash.expose_secret()),
        None => {
            let _ = verify_password(&plain, &DUMMY_HASH);
            Ok(false)
        }
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_the_original_plaintext() {
        let hash = hash_password("abc123").unwrap();
        assert!(verify_password("abc123", &hash).unwrap());
        for other in ["abc124", "ABC123", "abc123 ", ""] {
            assert!(!verify_password(other, &hash).unwrap(), "{other:?}");
        }
    }

    #[test]
    fn unusable_stored_value_is_an_error() {
        let err = verify_password("abc123", "abc123").unwrap_err();
        assert!(err.to_string().contains("PHC"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("abc123").unwrap();
        let b = hash_password("abc123").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(!a.contains("abc123"));
    }

    #[tokio::test]
    async fn async_variants_match_sync_ones() {
        let hash = hash_password_async("abc123".into()).await.unwrap();
        let secret = SecretString::from(hash);
        assert!(verify_password_async("abc123".into(), Some(secret)).await.unwrap());
        assert!(!verify_password_async("abc123".into(), None).await.unwrap());
        assert!(!DUMMY_HASH.is_empty());
    }
}
