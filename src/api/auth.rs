use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::errors::AppError;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed token")]
    Malformed,

    #[error("bad signature")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("HMAC key rejected: {0}")]
    Key(String),
}

/// Verified token contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies stateless bearer tokens.
///
/// token = `base64url("{username}|{expiry_unix}") . base64url(hmac_sha256(payload))`
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| AuthError::Key(e.to_string()))
    }

    pub fn issue(&self, username: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires = (now + self.ttl).timestamp();
        let payload = format!("{username}|{expires}");

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            BASE64_URL.encode(payload.as_bytes()),
            BASE64_URL.encode(signature)
        ))
    }

    /// Constant-time equality of a supplied credential against the expected one.
    pub fn credential_matches(&self, supplied: &str, expected: &str) -> Result<bool, AuthError> {
        let mut mac = self.mac()?;
        mac.update(expected.as_bytes());
        let expected_tag = mac.finalize().into_bytes();

        let mut mac = self.mac()?;
        mac.update(supplied.as_bytes());
        Ok(mac.verify_slice(&expected_tag).is_ok())
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let (payload_b64, signature_b64) = token.split_once('.').ok_or(AuthError::Malformed)?;
        let payload = BASE64_URL
            .decode(payload_b64)
            .map_err(|_| AuthError::Malformed)?;
        let signature = BASE64_URL
            .decode(signature_b64)
            .map_err(|_| AuthError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::BadSignature)?;

        let payload = String::from_utf8(payload).map_err(|_| AuthError::Malformed)?;
        let (username, expires) = payload.rsplit_once('|').ok_or(AuthError::Malformed)?;
        let expires_at = expires
            .parse::<i64>()
            .ok()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .ok_or(AuthError::Malformed)?;

        if expires_at <= now {
            return Err(AuthError::Expired);
        }

        Ok(Claims {
            username: username.to_string(),
            expires_at,
        })
    }
}

/// Bearer-token authentication middleware.
///
/// If `AUTH_SECRET` is configured, every request must carry
/// `Authorization: Bearer <token>` issued by `/api/auth/login`.
/// Without a secret, authentication is disabled (dev mode).
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(signer) = state.tokens.as_ref() else {
        return next.run(req).await;
    };

    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token.map(|t| signer.verify(t.trim(), Utc::now())) {
        Some(Ok(claims)) => {
            tracing::debug!(user = %claims.username, "Authenticated request");
            next.run(req).await
        }
        Some(Err(e)) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Unauthorized.into_response()
        }
        None => AppError::Unauthorized.into_response(),
    }
}
