//! HTTP response finalization and wire encoding

use std::collections::HashMap;
use std::fmt::Write;

use chrono::Utc;

use super::constants::{headers, CRLF, HTTP_1_1};

/// Connection header value written on every response; this server never
/// keeps a connection alive.
const CONNECTION_CLOSED: &str = "Closed";

/// A structured HTTP response
///
/// Created empty per connection, mutated by the invoked handler (usually
/// through [`Context`](super::Context)) and by [`Response::finalize`].
/// A `status` of 0 means "unset"; the finalizer turns it into 200.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub headers: HashMap<String, String>,
    pub body: String,
    pub status: u16,
}

impl Response {
    /// Apply the mandatory framing headers and the default status.
    ///
    /// `Content-Length`, `Connection` and `Date` are always overwritten,
    /// even when the handler set them itself - well-formed framing is
    /// guaranteed here, not negotiated with the handler.
    pub fn finalize(&mut self) {
        self.headers
            .insert(headers::CONTENT_LENGTH.to_string(), self.body.len().to_string());
        self.headers
            .insert(headers::CONNECTION.to_string(), CONNECTION_CLOSED.to_string());
        self.headers.insert(headers::DATE.to_string(), Utc::now().to_rfc2822());

        if self.status == 0 {
            self.status = 200;
        }
    }

    /// Encode the response to raw wire bytes.
    ///
    /// Status line, then one line per header in unspecified map order, a
    /// blank line, then the body verbatim. No chunking, no compression, no
    /// validation of header values.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut wire = String::new();

        write!(&mut wire, "{} {}{}", HTTP_1_1, self.status, CRLF)
            .expect("write to String is infallible");

        for (name, value) in &self.headers {
            write!(&mut wire, "{}: {}{}", name, value, CRLF)
                .expect("write to String is infallible");
        }

        wire.push_str(CRLF);
        wire.push_str(&self.body);

        wire.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Request;

    #[test]
    fn test_finalize_defaults() {
        let mut response = Response { body: "hello".to_string(), ..Default::default() };
        response.finalize();

        assert_eq!(response.status, 200);
        assert_eq!(response.headers.get("Content-Length"), Some(&"5".to_string()));
        assert_eq!(response.headers.get("Connection"), Some(&"Closed".to_string()));
        assert!(response.headers.contains_key("Date"));
    }

    #[test]
    fn test_finalize_overwrites_framing_headers() {
        let mut response = Response::default();
        response.headers.insert("Content-Length".to_string(), "9999".to_string());
        response.headers.insert("Connection".to_string(), "keep-alive".to_string());
        response.body = "ab".to_string();
        response.status = 404;
        response.finalize();

        assert_eq!(response.headers.get("Content-Length"), Some(&"2".to_string()));
        assert_eq!(response.headers.get("Connection"), Some(&"Closed".to_string()));
        assert_eq!(response.status, 404);
    }

    #[test]
    fn test_content_length_counts_bytes_not_chars() {
        let mut response = Response { body: "héllo".to_string(), ..Default::default() };
        response.finalize();

        assert_eq!(response.headers.get("Content-Length"), Some(&"6".to_string()));
    }

    #[test]
    fn test_encode_single_header_response() {
        let mut response = Response::default();
        response.headers.insert("Content-Type".to_string(), "application/json".to_string());
        response.status = 200;
        response.body = "{\"foo\":\"bar\"}".to_string();

        let wire = response.to_bytes();
        assert_eq!(
            wire,
            b"HTTP/1.1 200\r\nContent-Type: application/json\r\n\r\n{\"foo\":\"bar\"}"
        );
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let mut response = Response::default();
        response.headers.insert("Content-Type".to_string(), "text/html".to_string());
        response.headers.insert("X-Custom".to_string(), "abc".to_string());
        response.body = "<h1>hi</h1>".to_string();
        response.finalize();

        let wire = response.to_bytes();
        // The request decoder understands the same framing, so reuse it to
        // pick the encoded response apart. Header order is unspecified, so
        // only presence and values are asserted.
        let decoded = Request::decode(&wire);

        assert_eq!(decoded.params, "<h1>hi</h1>");
        assert_eq!(decoded.header("Content-Type"), Some("text/html"));
        assert_eq!(decoded.header("X-Custom"), Some("abc"));
        assert_eq!(decoded.header("Connection"), Some("Closed"));

        let status_line = String::from_utf8_lossy(&wire);
        assert!(status_line.starts_with("HTTP/1.1 200\r\n"));
    }

    #[test]
    fn test_encode_empty_response() {
        let mut response = Response::default();
        response.finalize();

        let wire = String::from_utf8(response.to_bytes()).unwrap();
        assert!(wire.starts_with("HTTP/1.1 200\r\n"));
        assert!(wire.ends_with("\r\n\r\n"));
    }
}
