//! Connection establishment and the read-until-close primitive.
//!
//! # Design
//! `Transport` is the seam between the client and the network: it turns an
//! [`Endpoint`] into a bidirectional byte stream. The production
//! implementation, [`TlsTransport`], opens a TCP connection with the
//! caller's timeout and completes a rustls handshake against the
//! `webpki-roots` trust anchors before returning, so certificate failures
//! surface at connect time rather than on the first read. Tests substitute
//! an in-memory transport.
//!
//! `read_to_close` is the only response-termination mechanism: it drains
//! the stream until a zero-length read. Every request sends
//! `Connection: close`, so a conforming server ends the response by closing
//! the connection. A server that keeps the connection open instead would
//! block this read until the socket timeout fires — a known limitation of
//! the close-delimited design, not a bug.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use crate::error::Error;
use crate::url::Endpoint;

/// Connection factory for a single request/response exchange.
///
/// Each call to `connect` yields a fresh stream; the caller drops it when
/// the exchange ends, which closes the underlying socket on every exit path.
pub trait Transport {
    type Stream: Read + Write;

    fn connect(&self, endpoint: &Endpoint, timeout: Duration) -> Result<Self::Stream, Error>;
}

/// TLS-over-TCP transport using the system-independent `webpki-roots`
/// anchor set. Hostname verification and SNI both use the endpoint host.
#[derive(Debug, Clone)]
pub struct TlsTransport {
    config: Arc<ClientConfig>,
}

impl TlsTransport {
    pub fn new() -> Self {
        let roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.into(),
        };
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for TlsTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for TlsTransport {
    type Stream = StreamOwned<ClientConnection, TcpStream>;

    fn connect(&self, endpoint: &Endpoint, timeout: Duration) -> Result<Self::Stream, Error> {
        let server_name = ServerName::try_from(endpoint.host.clone())
            .map_err(|_| Error::InvalidUrl(endpoint.host.clone()))?;

        let addr = (endpoint.host.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(Error::Network)?
            .next()
            .ok_or_else(|| {
                Error::Network(io::Error::new(
                    io::ErrorKind::NotFound,
                    "hostname resolved to no addresses",
                ))
            })?;

        let mut tcp = TcpStream::connect_timeout(&addr, timeout).map_err(Error::Network)?;
        tcp.set_read_timeout(Some(timeout)).map_err(Error::Network)?;
        tcp.set_write_timeout(Some(timeout)).map_err(Error::Network)?;

        let mut conn =
            ClientConnection::new(Arc::clone(&self.config), server_name).map_err(Error::Tls)?;
        // Drive the handshake to completion now so certificate and protocol
        // failures map to Error::Tls instead of a later read/write error.
        while conn.is_handshaking() {
            conn.complete_io(&mut tcp).map_err(classify_handshake_error)?;
        }

        Ok(StreamOwned::new(conn, tcp))
    }
}

/// rustls reports handshake failures through `io::Error` when driven via
/// `complete_io`; unwrap the TLS error back out so trust failures are
/// distinguishable from plain socket failures.
fn classify_handshake_error(err: io::Error) -> Error {
    match err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
    {
        Some(tls) => Error::Tls(tls.clone()),
        None => Error::Network(err),
    }
}

/// Drain `stream` into memory until a zero-length read signals closure.
///
/// A ragged EOF (peer closed without a TLS `close_notify`) is treated as
/// closure as well, matching how close-delimited HTTP responses are read in
/// practice.
pub fn read_to_close<S: Read>(stream: &mut S) -> Result<Vec<u8>, Error> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => raw.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(Error::Transport(e)),
        }
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_to_close_drains_until_eof() {
        let mut stream = Cursor::new(b"HTTP/1.1 200 OK\r\n\r\nhello".to_vec());
        let raw = read_to_close(&mut stream).unwrap();
        assert_eq!(raw, b"HTTP/1.1 200 OK\r\n\r\nhello");
    }

    #[test]
    fn read_to_close_empty_stream_yields_empty() {
        let mut stream = Cursor::new(Vec::new());
        assert_eq!(read_to_close(&mut stream).unwrap(), Vec::<u8>::new());
    }

    /// Yields one chunk, then fails with UnexpectedEof, like a peer that
    /// closed without sending close_notify.
    struct RaggedStream {
        data: Option<Vec<u8>>,
    }

    impl Read for RaggedStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.take() {
                Some(data) => {
                    buf[..data.len()].copy_from_slice(&data);
                    Ok(data.len())
                }
                None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "ragged eof")),
            }
        }
    }

    #[test]
    fn ragged_eof_is_treated_as_closure() {
        let mut stream = RaggedStream {
            data: Some(b"partial".to_vec()),
        };
        assert_eq!(read_to_close(&mut stream).unwrap(), b"partial");
    }

    /// Fails immediately with a non-EOF error.
    struct BrokenStream;

    impl Read for BrokenStream {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    #[test]
    fn read_failure_is_transport_error() {
        let err = read_to_close(&mut BrokenStream).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
