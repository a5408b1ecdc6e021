//! Installation credentials and request signing for Atlassian Connect.
//!
//! This module provides:
//! - Durable storage for the credential captured at install time
//! - Query-string-hash (QSH) canonicalization of HTTP requests
//! - Compact HS256 JWT signing for outbound Jira REST calls
//!
//! # Authentication Flow
//!
//! 1. Jira POSTs an install payload; [`CredentialStore::set`] persists it
//! 2. Each outbound REST call is canonicalized and hashed ([`query_string_hash`])
//! 3. [`sign_request`] mints a short-lived JWT carrying the QSH claim
//! 4. The token travels in an `Authorization: JWT <token>` header

pub mod credential;
pub mod jwt;
pub mod qsh;

pub use credential::{Credential, CredentialError, CredentialStore};
pub use jwt::{
    Claims, SignError, SignedToken, TOKEN_LIFETIME_SECS, decode_claims, sign_request,
    sign_request_at,
};
pub use qsh::{canonical_request, canonicalize_query, normalize_path, query_string_hash};
