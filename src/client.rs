//! The public GET/POST client: orchestrates URL validation, request
//! building, the TLS exchange, and response parsing.
//!
//! # Design
//! `HttpsClient` holds only a read-only timeout and a stateless transport;
//! there is no shared mutable state between calls. Each `get`/`post` call
//! validates the URL first (no socket is touched for an invalid URL), then
//! opens exactly one TLS session, writes the serialized request, reads the
//! response until the server closes the connection, drops the session, and
//! parses the accumulated bytes. Strictly sequential, blocking, one attempt
//! per call.

use std::io::{Read, Write};
use std::time::Duration;

use serde::Serialize;

use crate::error::Error;
use crate::http::{parse_response, Request, Response};
use crate::transport::{read_to_close, TlsTransport, Transport};
use crate::url::{split_secure_url, Endpoint};

/// Connect/read timeout applied when none is given, matching the classic
/// 10-second default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTPS client for one-shot GET and POST requests.
///
/// Every call opens, uses, and closes a fresh TLS session; the session is
/// released on all exit paths, including errors mid-exchange.
#[derive(Debug, Clone)]
pub struct HttpsClient<T: Transport = TlsTransport> {
    transport: T,
    timeout: Duration,
}

impl HttpsClient<TlsTransport> {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            transport: TlsTransport::new(),
            timeout,
        }
    }
}

impl Default for HttpsClient<TlsTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> HttpsClient<T> {
    /// Build a client over a custom transport. This is the substitution
    /// point for tests and for alternative connection strategies.
    pub fn with_transport(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Issue a GET request. The URL must start with `https://`.
    pub fn get(&self, url: &str) -> Result<Response, Error> {
        let (endpoint, path) = split_secure_url(url)?;
        let request = Request::get(&endpoint.host, &path);
        self.exchange(&endpoint, &request)
    }

    /// Issue a POST request. The URL must start with `https://`.
    ///
    /// `Some(data)` is serialized to JSON and sent with
    /// `Content-Type: application/json` and a matching `Content-Length`;
    /// `None` sends a bodyless POST.
    pub fn post<B: Serialize>(&self, url: &str, data: Option<&B>) -> Result<Response, Error> {
        let (endpoint, path) = split_secure_url(url)?;
        let body = match data {
            Some(value) => {
                Some(serde_json::to_vec(value).map_err(|e| Error::Serialize(e.to_string()))?)
            }
            None => None,
        };
        let request = Request::post(&endpoint.host, &path, body);
        self.exchange(&endpoint, &request)
    }

    /// One request/response round-trip over a fresh connection.
    fn exchange(&self, endpoint: &Endpoint, request: &Request) -> Result<Response, Error> {
        let mut stream = self.transport.connect(endpoint, self.timeout)?;
        let raw = send_and_drain(&mut stream, &request.to_bytes());
        // The session ends here on success and failure alike; dropping the
        // stream closes the socket before the response is parsed.
        drop(stream);
        parse_response(&raw?)
    }
}

fn send_and_drain<S: Read + Write>(stream: &mut S, wire: &[u8]) -> Result<Vec<u8>, Error> {
    stream.write_all(wire).map_err(Error::Transport)?;
    stream.flush().map_err(Error::Transport)?;
    read_to_close(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts connect attempts and serves a canned response.
    struct CountingTransport {
        connects: Arc<AtomicUsize>,
        response: Vec<u8>,
    }

    struct CannedStream {
        response: Cursor<Vec<u8>>,
    }

    impl Read for CannedStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.response.read(buf)
        }
    }

    impl Write for CannedStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Transport for CountingTransport {
        type Stream = CannedStream;

        fn connect(&self, _endpoint: &Endpoint, _timeout: Duration) -> Result<CannedStream, Error> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(CannedStream {
                response: Cursor::new(self.response.clone()),
            })
        }
    }

    fn counting_client(response: &[u8]) -> (HttpsClient<CountingTransport>, Arc<AtomicUsize>) {
        let connects = Arc::new(AtomicUsize::new(0));
        let transport = CountingTransport {
            connects: Arc::clone(&connects),
            response: response.to_vec(),
        };
        (
            HttpsClient::with_transport(transport, DEFAULT_TIMEOUT),
            connects,
        )
    }

    #[test]
    fn invalid_url_get_performs_no_socket_operations() {
        let (client, connects) = counting_client(b"HTTP/1.1 200 OK\r\n\r\n");
        let err = client.get("http://example.com/").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
        assert_eq!(connects.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn invalid_url_post_performs_no_socket_operations() {
        let (client, connects) = counting_client(b"HTTP/1.1 200 OK\r\n\r\n");
        let err = client
            .post("ftp://example.com/", Some(&serde_json::json!({"a": 1})))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
        assert_eq!(connects.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn each_call_opens_exactly_one_connection() {
        let (client, connects) = counting_client(b"HTTP/1.1 200 OK\r\n\r\nok");
        client.get("https://example.com/a").unwrap();
        client.get("https://example.com/b").unwrap();
        assert_eq!(connects.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn malformed_response_surfaces_after_exchange() {
        let (client, connects) = counting_client(b"not an http response");
        let err = client.get("https://example.com/").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse));
        assert_eq!(connects.load(Ordering::SeqCst), 1);
    }
}
