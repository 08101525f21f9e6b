//! Error types for the HTTPS client.
//!
//! # Design
//! One variant per failure class, in roughly the order a request can hit
//! them: URL validation, connect, TLS handshake, send/receive, and finally
//! response parsing. Nothing is caught or retried internally — every error
//! is terminal for the call that produced it and propagates straight to the
//! caller.

use std::fmt;
use std::io;

/// Errors returned by [`HttpsClient`](crate::HttpsClient) operations.
#[derive(Debug)]
pub enum Error {
    /// The URL does not start with `https://` (or has an empty host).
    /// Raised before any socket operation.
    InvalidUrl(String),

    /// The request body could not be serialized to JSON.
    Serialize(String),

    /// DNS resolution, connect, or timeout failure while establishing the
    /// TCP connection.
    Network(io::Error),

    /// TLS handshake failure, including certificate and hostname
    /// verification errors.
    Tls(rustls::Error),

    /// Send or receive failure after the TLS session was established.
    Transport(io::Error),

    /// The response bytes contain no `\r\n\r\n` header/body delimiter and
    /// therefore do not form a complete HTTP response.
    MalformedResponse,

    /// The response could not be decoded: the header block or body is not
    /// valid UTF-8, or the body was declared JSON but does not parse as JSON.
    Decode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidUrl(url) => {
                write!(f, "invalid URL {url:?}: expected an https:// URL")
            }
            Error::Serialize(msg) => write!(f, "body serialization failed: {msg}"),
            Error::Network(e) => write!(f, "connection failed: {e}"),
            Error::Tls(e) => write!(f, "TLS handshake failed: {e}"),
            Error::Transport(e) => write!(f, "transport failed: {e}"),
            Error::MalformedResponse => {
                write!(f, "malformed response: missing header/body delimiter")
            }
            Error::Decode(msg) => write!(f, "response decoding failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Network(e) | Error::Transport(e) => Some(e),
            Error::Tls(e) => Some(e),
            _ => None,
        }
    }
}
