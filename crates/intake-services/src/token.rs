//! Access tokens for stored documents.
//!
//! Claims are `{id, expiresAt}` with `expiresAt` in epoch milliseconds.
//!
//! - Plain: `base64url(json)`. Reversible, not tamper-proof.
//! - Signed: `base64url(json || HMAC-SHA256(secret, json))`.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

/// Lifetime of an issued token.
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const MAC_LEN: usize = 32; // SHA256

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub id: Uuid,
    pub expires_at: i64,
}

impl TokenClaims {
    fn for_record(id: Uuid) -> Self {
        Self {
            id,
            expires_at: Utc::now().timestamp_millis() + ACCESS_TOKEN_TTL.as_millis() as i64,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Malformed access token")]
    Malformed,

    #[error("Access token signature mismatch")]
    InvalidSignature,

    #[error("Access token has expired")]
    Expired,
}

/// Mints an opaque capability string for a stored record.
pub trait AccessTokenIssuer: Send + Sync {
    fn issue(&self, id: Uuid) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTokenIssuer;

impl PlainTokenIssuer {
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| TokenError::Malformed)?;
        serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)
    }
}

impl AccessTokenIssuer for PlainTokenIssuer {
    fn issue(&self, id: Uuid) -> String {
        // Serializing a Uuid and an i64 cannot fail.
        let payload = serde_json::to_vec(&TokenClaims::for_record(id)).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(payload)
    }
}

#[derive(Clone)]
pub struct SignedTokenIssuer {
    mac: Hmac<Sha256>,
}

impl std::fmt::Debug for SignedTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedTokenIssuer").finish_non_exhaustive()
    }
}

impl SignedTokenIssuer {
    pub fn new(secret: &[u8]) -> Result<Self, InvalidLength> {
        Ok(Self {
            mac: Hmac::<Sha256>::new_from_slice(secret)?,
        })
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let decoded = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| TokenError::Malformed)?;
        if decoded.len() <= MAC_LEN {
            return Err(TokenError::Malformed);
        }
        let (payload, tag) = decoded.split_at(decoded.len() - MAC_LEN);

        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.verify_slice(tag)
            .map_err(|_| TokenError::InvalidSignature)?;

        let claims: TokenClaims =
            serde_json::from_slice(payload).map_err(|_| TokenError::Malformed)?;
        if claims.is_expired() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn sign(&self, claims: &TokenClaims) -> String {
        let mut token_bytes = serde_json::to_vec(claims).unwrap_or_default();
        let mut mac = self.mac.clone();
        mac.update(&token_bytes);
        token_bytes.extend_from_slice(&mac.finalize().into_bytes());
        URL_SAFE_NO_PAD.encode(token_bytes)
    }
}

impl AccessTokenIssuer for SignedTokenIssuer {
    fn issue(&self, id: Uuid) -> String {
        self.sign(&TokenClaims::for_record(id))
    }
}
