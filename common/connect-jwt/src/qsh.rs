//! Query string hash (QSH) computation.
//!
//! A request is reduced to `METHOD&PATH&QUERY` and hashed with SHA-256 so the
//! resulting token only authorizes that exact request.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::{Digest, Sha256};
use url::{form_urlencoded, Url};

/// The token travels in this parameter, so it never takes part in its own hash.
const JWT_PARAM: &str = "jwt";

/// Everything outside the RFC 3986 unreserved set.
const CANONICAL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Path component of the platform base URL with any trailing `/` removed.
///
/// `https://example.com/wiki/` yields `/wiki`, a bare host yields an empty
/// string. Unparseable input is treated as having no prefix.
pub fn base_path(base_url: &str) -> String {
    match Url::parse(base_url) {
        Ok(url) => url.path().trim_end_matches('/').to_string(),
        Err(_) => String::new(),
    }
}

/// Canonical form of the request path relative to `base_path`.
pub fn canonical_path(path: &str, base_path: &str) -> String {
    let prefix = base_path.trim_end_matches('/');
    let relative = match path.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() && (rest.is_empty() || rest.starts_with('/')) => rest,
        _ => path,
    };

    let mut canonical = String::with_capacity(relative.len() + 1);
    if !relative.starts_with('/') {
        canonical.push('/');
    }
    canonical.push_str(relative);
    canonical.replace('&', "%26")
}

/// Canonical form of a raw (still encoded) query string.
pub fn canonical_query(query: Option<&str>) -> String {
    let query = match query {
        Some(query) if !query.is_empty() => query,
        _ => return String::new(),
    };

    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        if name == JWT_PARAM {
            continue;
        }
        params
            .entry(encode_component(&name))
            .or_default()
            .push(encode_component(&value));
    }

    params
        .into_iter()
        .map(|(name, mut values)| {
            values.sort();
            format!("{name}={}", values.join(","))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The full `METHOD&PATH&QUERY` string fed into the digest.
pub fn canonical_request(method: &str, path: &str, query: Option<&str>, base_path: &str) -> String {
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        canonical_path(path, base_path),
        canonical_query(query)
    )
}

/// Lowercase hex SHA-256 of the canonical request.
pub fn query_string_hash(method: &str, path: &str, query: Option<&str>, base_path: &str) -> String {
    let canonical = canonical_request(method, path, query, base_path);
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, CANONICAL_ENCODE_SET).to_string()
}
