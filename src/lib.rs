//! Minimal blocking HTTP/1.1 client over TLS.
//!
//! # Overview
//! Issues one-shot GET and POST requests over HTTPS without a full HTTP
//! library: the request is assembled byte-by-byte, written over a freshly
//! established rustls session, and the response is read until the server
//! closes the connection, then split into status line, headers, and body
//! (decoded as JSON when the content type says so).
//!
//! # Design
//! - `HttpsClient` is stateless apart from a read-only timeout; each call
//!   owns exactly one connection, released on every exit path.
//! - Request building (`http::Request::to_bytes`) and response parsing
//!   (`http::parse_response`) are pure functions over bytes, so both are
//!   testable without a socket.
//! - The network sits behind the `transport::Transport` seam; tests swap in
//!   in-memory transports.
//! - Every request sends `Connection: close` and the response is delimited
//!   by stream closure. One request per connection, no reuse, no redirects,
//!   no chunked encoding, no compression.
//!
//! # Example
//! ```no_run
//! use minihttps::{Body, HttpsClient};
//!
//! let client = HttpsClient::new();
//! let response = client.get("https://jsonplaceholder.typicode.com/posts/1")?;
//! if let Body::Json(value) = &response.body {
//!     println!("{value}");
//! }
//! # Ok::<(), minihttps::Error>(())
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod url;

pub use client::{HttpsClient, DEFAULT_TIMEOUT};
pub use error::Error;
pub use http::{Body, Headers, Method, Request, Response};
pub use transport::{TlsTransport, Transport};
pub use url::{Endpoint, HTTPS_PORT};
