//! Secure-URL validation and endpoint extraction.
//!
//! # Design
//! Only `https://` URLs are accepted; anything else is rejected before a
//! socket is ever opened. The host is everything between the scheme prefix
//! and the first `/`, the path is the rest, and the port is always 443 —
//! this client speaks HTTPS and nothing else.

use crate::error::Error;

/// The only accepted URL scheme prefix.
const HTTPS_PREFIX: &str = "https://";

/// The port every connection targets.
pub const HTTPS_PORT: u16 = 443;

/// Host and port of the server a request targets. Immutable per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

/// Split an `https://` URL into its [`Endpoint`] and request path.
///
/// An empty path (e.g. `https://example.com`) defaults to `/`. URLs that do
/// not start with `https://` or have an empty host fail with
/// [`Error::InvalidUrl`].
pub fn split_secure_url(url: &str) -> Result<(Endpoint, String), Error> {
    let rest = url
        .strip_prefix(HTTPS_PREFIX)
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;

    let (host, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };

    if host.is_empty() {
        return Err(Error::InvalidUrl(url.to_string()));
    }

    let path = if path.is_empty() { "/" } else { path };
    let endpoint = Endpoint {
        host: host.to_string(),
        port: HTTPS_PORT,
    };
    Ok((endpoint, path.to_string()))
}
