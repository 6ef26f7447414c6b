//! Best-effort decoding of the session token's identity claims.
//!
//! The payload is read without verifying the signature; the backend does
//! that on every request. The only consumer is the book upload, which
//! needs the administrator id.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bookstore_api::models::admin_id_from_json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::session::SessionToken;

/// Identity carried inside the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminClaims {
    pub admin_id: i64,
    pub email: Option<String>,
    /// Informational only; never enforced client-side.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of reading a token's claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claims {
    Found(AdminClaims),
    /// No token, or a readable payload without a positive administrator id.
    Absent,
    /// The token is not a decodable JWT; the string says why.
    Malformed(String),
}

impl Claims {
    pub fn admin_id(&self) -> Option<i64> {
        match self {
            Claims::Found(claims) => Some(claims.admin_id),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    adminid: Option<Value>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

pub struct ClaimsReader;

impl ClaimsReader {
    pub fn read(token: &SessionToken) -> Claims {
        match Self::decode(token.as_str()) {
            Ok(Some(claims)) => Claims::Found(claims),
            Ok(None) => Claims::Absent,
            Err(reason) => {
                tracing::debug!("Session token payload is malformed: {reason}");
                Claims::Malformed(reason)
            }
        }
    }

    fn decode(raw: &str) -> Result<Option<AdminClaims>, String> {
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.len() != 3 {
            return Err(format!("expected 3 segments, found {}", segments.len()));
        }

        // Some issuers pad their segments; the JWT form is unpadded.
        let payload = URL_SAFE_NO_PAD
            .decode(segments[1].trim_end_matches('='))
            .map_err(|e| format!("payload is not base64url: {e}"))?;
        let raw: RawClaims = serde_json::from_slice(&payload)
            .map_err(|e| format!("payload is not a JSON object: {e}"))?;

        let Some(admin_id) = admin_id_from_json(raw.adminid.as_ref().unwrap_or(&Value::Null))?
        else {
            return Ok(None);
        };

        Ok(Some(AdminClaims {
            admin_id,
            email: raw.email,
            expires_at: raw.exp.and_then(|exp| DateTime::from_timestamp(exp, 0)),
        }))
    }
}
