//! Compact JWT signing for outbound Jira requests.
//!
//! Atlassian Connect authenticates add-on requests with an HS256 JWT whose
//! claims bind the token to one request (via the QSH) and one short validity
//! window. The token travels in an `Authorization: JWT <token>` header.
//!
//! Tokens are ephemeral: computed per outbound call, never persisted. A
//! caller that holds a token past its expiry must sign again.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use super::credential::Credential;
use super::qsh::query_string_hash;

type HmacSha256 = Hmac<Sha256>;

/// Token validity window: 3 minutes past `iat`.
///
/// Long enough to tolerate loose NTP skew, short enough to bound replay.
pub const TOKEN_LIFETIME_SECS: i64 = 180;

/// HTTP verbs the signer accepts.
const RECOGNIZED_METHODS: [&str; 7] =
    ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Errors that can occur when signing a request.
#[derive(Debug, Error)]
pub enum SignError {
    /// The active credential has no usable signing secret.
    #[error("no credential available for signing")]
    MissingCredential,

    /// The request to sign is malformed.
    #[error("invalid signing input: {0}")]
    InvalidInput(String),
}

/// Result type for signing operations.
pub type Result<T> = std::result::Result<T, SignError>;

/// The claim set carried by an outbound token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The add-on's fixed key identifier.
    pub iss: String,

    /// Issued-at, Unix seconds (floored).
    pub iat: i64,

    /// Expiry, Unix seconds. Always `iat + 180`.
    pub exp: i64,

    /// Query-string hash binding the token to one request.
    pub qsh: String,
}

#[derive(Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

/// A signed, time-bounded token for one outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    /// The issuer claim (the add-on key).
    pub issuer: String,

    /// Issued-at, Unix seconds.
    pub issued_at: i64,

    /// Expiry, Unix seconds.
    pub expires_at: i64,

    /// The QSH embedded in the claims.
    pub query_hash: String,

    /// The compact JWT, ready for an `Authorization: JWT <raw>` header.
    pub raw: String,
}

/// Signs an outbound request with the installation's shared secret.
///
/// Stamps the token with the current wall-clock time; see
/// [`sign_request_at`] for the deterministic core.
///
/// # Errors
///
/// * `SignError::MissingCredential` if the credential's shared secret is empty
/// * `SignError::InvalidInput` if `method` is not a recognized HTTP verb
pub fn sign_request(
    app_key: &str,
    method: &str,
    path: &str,
    query: &str,
    credential: &Credential,
) -> Result<SignedToken> {
    sign_request_at(app_key, method, path, query, credential, Utc::now().timestamp())
}

/// Signs an outbound request with an explicit issued-at timestamp.
///
/// Signing is deterministic: the same inputs and `issued_at` always produce
/// the same token.
pub fn sign_request_at(
    app_key: &str,
    method: &str,
    path: &str,
    query: &str,
    credential: &Credential,
    issued_at: i64,
) -> Result<SignedToken> {
    if credential.shared_secret.is_empty() {
        return Err(SignError::MissingCredential);
    }

    let method_upper = method.to_ascii_uppercase();
    if !RECOGNIZED_METHODS.contains(&method_upper.as_str()) {
        return Err(SignError::InvalidInput(format!(
            "unrecognized HTTP method: {}",
            method
        )));
    }

    let query_hash = query_string_hash(&method_upper, path, query);
    let claims = Claims {
        iss: app_key.to_string(),
        iat: issued_at,
        exp: issued_at + TOKEN_LIFETIME_SECS,
        qsh: query_hash.clone(),
    };

    let raw = encode_compact(&claims, credential.shared_secret.as_bytes());

    Ok(SignedToken {
        issuer: claims.iss,
        issued_at,
        expires_at: issued_at + TOKEN_LIFETIME_SECS,
        query_hash,
        raw,
    })
}

/// Encodes claims as a compact HS256 JWT: `base64url(header).base64url(claims).base64url(sig)`.
fn encode_compact(claims: &Claims, secret: &[u8]) -> String {
    let header = Header {
        alg: "HS256",
        typ: "JWT",
    };
    let header_json =
        serde_json::to_vec(&header).expect("JWT header is a plain struct and always serializes");
    let claims_json =
        serde_json::to_vec(claims).expect("JWT claims are a plain struct and always serialize");

    let mut token = String::new();
    token.push_str(&URL_SAFE_NO_PAD.encode(header_json));
    token.push('.');
    token.push_str(&URL_SAFE_NO_PAD.encode(claims_json));

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(token.as_bytes());
    let signature = mac.finalize().into_bytes();

    token.push('.');
    token.push_str(&URL_SAFE_NO_PAD.encode(signature));
    token
}

/// Decodes and verifies a compact JWT, returning its claims.
///
/// Returns `None` for malformed tokens or signature mismatches. Never
/// panics. This is the counterpart used by tests and by anything that needs
/// to check a token the bridge minted.
pub fn decode_claims(token: &str, secret: &[u8]) -> Option<Claims> {
    let mut segments = token.split('.');
    let header = segments.next()?;
    let payload = segments.next()?;
    let signature = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let signed_portion_len = header.len() + 1 + payload.len();
    let signed_portion = &token[..signed_portion_len];

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(signed_portion.as_bytes());
    let expected = URL_SAFE_NO_PAD.decode(signature).ok()?;
    // Constant-time comparison via the HMAC library
    mac.verify_slice(&expected).ok()?;

    let claims_json = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&claims_json).ok()
}
