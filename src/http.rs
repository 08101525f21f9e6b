//! HTTP/1.1 message types: request building and response parsing.
//!
//! # Design
//! `Request` describes an outgoing message as plain data and turns it into
//! wire bytes in a single explicit step (`to_bytes`), so the builder can be
//! unit-tested without a socket. `parse_response` is the inverse for
//! incoming bytes: split on the first `\r\n\r\n`, take the status line,
//! collect the header fields, and decode the body as JSON or text depending
//! on the `Content-Type` header.
//!
//! JSON detection deliberately diverges from a raw substring scan of the
//! header block: the parsed header map is consulted with a case-insensitive
//! name lookup, and the value's media type is compared against
//! `application/json` ignoring parameters. `content-type:
//! application/json; charset=utf-8` is therefore recognized as JSON.

use crate::error::Error;

/// HTTP method for a request. This client issues only GET and POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Insertion-ordered header fields.
///
/// `insert` overwrites an existing field with the same exact name, so a
/// duplicate header's last occurrence wins. Names keep the case they were
/// inserted with; `get` looks names up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a field, replacing the value of an existing field whose name
    /// matches exactly. Last occurrence wins.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Case-insensitive lookup by field name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An outgoing HTTP/1.1 request described as plain data.
///
/// Built by [`Request::get`] / [`Request::post`]; serialized by
/// [`Request::to_bytes`]. Constructed fresh per call, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Build a GET request. GET never carries a body or body headers.
    pub fn get(host: &str, path: &str) -> Self {
        let mut headers = Headers::new();
        headers.insert("Host", host);
        headers.insert("Connection", "close");
        Self {
            method: Method::Get,
            path: path.to_string(),
            headers,
            body: None,
        }
    }

    /// Build a POST request with an optional, already-encoded JSON body.
    ///
    /// `Content-Length` is taken from the encoded byte length, so it can
    /// never disagree with what is sent on the wire.
    pub fn post(host: &str, path: &str, body: Option<Vec<u8>>) -> Self {
        let mut headers = Headers::new();
        headers.insert("Host", host);
        if let Some(body) = &body {
            headers.insert("Content-Type", "application/json");
            headers.insert("Content-Length", body.len().to_string());
        }
        headers.insert("Connection", "close");
        Self {
            method: Method::Post,
            path: path.to_string(),
            headers,
            body,
        }
    }

    /// Serialize to the exact byte sequence to transmit: request line,
    /// header lines in insertion order, blank line, then the body bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(self.method.as_str().as_bytes());
        out.push(b' ');
        out.extend_from_slice(self.path.as_bytes());
        out.extend_from_slice(b" HTTP/1.1\r\n");
        for (name, value) in self.headers.iter() {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"\r\n");
        if let Some(body) = &self.body {
            out.extend_from_slice(body);
        }
        out
    }
}

/// Decoded response body: JSON when the response declared a JSON content
/// type, plain text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Text(String),
}

/// A parsed HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// The first line of the response, e.g. `HTTP/1.1 200 OK`.
    pub status_line: String,
    /// Header fields, case as received. Duplicate names overwrite, last
    /// occurrence wins.
    pub headers: Headers,
    pub body: Body,
}

impl Response {
    /// The numeric status code from the status line, if it parses.
    pub fn status_code(&self) -> Option<u16> {
        self.status_line.split(' ').nth(1)?.parse().ok()
    }
}

/// Parse the complete byte sequence a server sent before closing the
/// connection.
///
/// Fails with [`Error::MalformedResponse`] when no `\r\n\r\n` delimiter is
/// present, and with [`Error::Decode`] when the header block or body is not
/// valid UTF-8 or a declared-JSON body does not parse.
pub fn parse_response(raw: &[u8]) -> Result<Response, Error> {
    let split = find_delimiter(raw).ok_or(Error::MalformedResponse)?;
    let header_block = &raw[..split];
    let body_bytes = &raw[split + 4..];

    let header_text = std::str::from_utf8(header_block)
        .map_err(|e| Error::Decode(format!("header block is not valid UTF-8: {e}")))?;

    let mut lines = header_text.split("\r\n");
    // split always yields at least one element
    let status_line = lines.next().unwrap_or_default().to_string();

    let mut headers = Headers::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(": ") {
            headers.insert(name, value);
        }
    }

    let text = String::from_utf8(body_bytes.to_vec())
        .map_err(|e| Error::Decode(format!("body is not valid UTF-8: {e}")))?;
    let body = if declares_json(&headers) {
        let value = serde_json::from_str(&text)
            .map_err(|e| Error::Decode(format!("body is not valid JSON: {e}")))?;
        Body::Json(value)
    } else {
        Body::Text(text)
    };

    Ok(Response {
        status_line,
        headers,
        body,
    })
}

/// Offset of the first `\r\n\r\n` in `raw`.
fn find_delimiter(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Whether the headers declare an `application/json` media type, ignoring
/// name case and any parameters such as `charset`.
fn declares_json(headers: &Headers) -> bool {
    headers
        .get("Content-Type")
        .and_then(|v| v.split(';').next())
        .map(|media| media.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}
