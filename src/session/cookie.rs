use std::time::Duration;

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::Sha256;

use super::SessionId;
use crate::config::SessionConfig;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE_NAME: &str = "sid";

/// Builds and reads the `sid` cookie. The value is `<id>.<mac>` where the MAC
/// is HMAC-SHA256 of the id keyed by the session secret.
#[derive(Clone)]
pub struct SessionCookies {
    mac: HmacSha256,
    max_age: Duration,
    secure: bool,
}

impl SessionCookies {
    pub fn new(secret: &[u8], max_age: Duration, secure: bool) -> anyhow::Result<Self> {
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| anyhow::anyhow!("invalid session secret: {e}"))?;
        Ok(Self {
            mac,
            max_age,
            secure,
        })
    }

    pub fn from_config(config: &SessionConfig) -> anyhow::Result<Self> {
        Self::new(
            config.secret.expose_secret().as_bytes(),
            config.ttl,
            config.secure_cookie,
        )
    }

    fn signature(&self, id: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    pub fn sign(&self, id: &SessionId) -> String {
        let sig = Base64UrlUnpadded::encode_string(&self.signature(id.as_str()));
        format!("{}.{}", id.as_str(), sig)
    }

    /// Returns the session id when the MAC checks out.
    pub fn verify(&self, value: &str) -> Option<SessionId> {
        let (id, sig) = value.rsplit_once('.')?;
        if id.is_empty() {
            return None;
        }
        let sig = Base64UrlUnpadded::decode_vec(sig).ok()?;
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.verify_slice(&sig).ok()?;
        Some(SessionId::from_raw(id))
    }

    /// Reads and verifies the session cookie from request headers.
    pub fn session_id(&self, headers: &HeaderMap) -> Option<SessionId> {
        extract_cookie(headers, SESSION_COOKIE_NAME).and_then(|v| self.verify(&v))
    }

    pub fn set_cookie(&self, id: &SessionId) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{SESSION_COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.sign(id),
            self.max_age.as_secs()
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }

    pub fn clear_cookie(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| val.trim().to_string())
        })
}
