//! Query-string hash (QSH) computation for Atlassian Connect tokens.
//!
//! The QSH binds a signed token to one specific HTTP request: it is the
//! SHA-256 digest of a canonical `METHOD&path&query` string. A token minted
//! for one endpoint therefore cannot be replayed against another.
//!
//! Canonicalization must match Atlassian's scheme bit-for-bit or Jira will
//! reject the request:
//! - the method is uppercased
//! - the path has redundant slashes collapsed and any trailing slash removed
//!   (unless the path is just `/`)
//! - query pairs are percent-decoded, re-escaped so that `&`, `=` and `%`
//!   cannot produce ordering ambiguity, sorted by key then value, and
//!   re-joined with `&`
//! - any `jwt` parameter is excluded from the hash

use sha2::{Digest, Sha256};

/// Percent-decodes a query component, leaving it untouched if the encoding
/// is invalid (malformed sequences are hashed as-is rather than rejected).
fn percent_decode(component: &str) -> String {
    match urlencoding::decode(component) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => component.to_string(),
    }
}

/// Escapes the characters that are significant to query-string structure.
///
/// Applied after decoding, so that a literal `&` inside a value cannot be
/// confused with a pair separator when the canonical string is rebuilt.
fn escape_component(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for c in component.chars() {
        match c {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            _ => out.push(c),
        }
    }
    out
}

/// Canonicalizes a query string for hashing.
///
/// Pairs are split on `&`, decoded, re-escaped, sorted lexicographically by
/// key then value, and re-joined. A key with no `=` is treated as having an
/// empty value. The `jwt` parameter never participates in its own hash.
///
/// Canonicalization is idempotent: applying it to its own output yields the
/// same string.
///
/// # Examples
///
/// ```
/// use jira_bridge::auth::canonicalize_query;
///
/// assert_eq!(canonicalize_query("b=2&a=1"), "a=1&b=2");
/// assert_eq!(canonicalize_query(""), "");
/// assert_eq!(canonicalize_query("jwt=abc&a=1"), "a=1");
/// ```
pub fn canonicalize_query(query: &str) -> String {
    let mut pairs: Vec<(String, String)> = Vec::new();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };

        let key = percent_decode(key);
        if key == "jwt" {
            continue;
        }
        let value = percent_decode(value);

        pairs.push((escape_component(&key), escape_component(&value)));
    }

    pairs.sort();

    let mut out = String::new();
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out
}

/// Normalizes a request path for hashing.
///
/// Collapses runs of slashes, ensures a leading slash, and strips any
/// trailing slash unless the whole path is `/`.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    out.push('/');

    let mut prev_slash = true;
    for c in path.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }

    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Builds the canonical request string `METHOD&path&query`.
pub fn canonical_request(method: &str, path: &str, query: &str) -> String {
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        normalize_path(path),
        canonicalize_query(query)
    )
}

/// Computes the QSH: the lowercase-hex SHA-256 digest of the canonical
/// request string.
///
/// # Examples
///
/// ```
/// use jira_bridge::auth::query_string_hash;
///
/// // The well-known hash of "GET&/&", used by Connect libraries as a
/// // fixed test vector.
/// assert_eq!(
///     query_string_hash("GET", "/", ""),
///     "c88caad15a1c1a900b8ac08aa9686f4e8184539bea1deda36e2f649430df3239"
/// );
/// ```
pub fn query_string_hash(method: &str, path: &str, query: &str) -> String {
    let canonical = canonical_request(method, path, query);
    hex::encode(Sha256::digest(canonical.as_bytes()))
}
