//! HTTP/1.1 protocol engine built from scratch on raw TCP sockets
//!
//! # Architecture
//!
//! - [`request`] - request decoding (headers, url-encoded and multipart bodies)
//! - [`response`] - response finalization and wire encoding
//! - [`context`] - per-connection aggregate handed to handlers
//! - [`router`] - exact-match route table with the 404 fallback
//! - [`server`] - per-connection handling and the accept loop

pub mod context;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use context::Context;
pub use request::Request;
pub use response::Response;
pub use router::{Handler, Method, Router};

use thiserror::Error;

/// Result type for HTTP operations
pub type HttpResult<T> = std::result::Result<T, HttpError>;

/// HTTP-specific error types
///
/// Decoding is deliberately infallible (malformed input degrades to a partial
/// request), so the only fallible surfaces are socket-level ones.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The listening socket could not be opened at startup. Fatal.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// Connection-level read/write failures
    #[error("connection error: {0}")]
    Connection(String),
    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP/1.1 wire-format constants
pub mod constants {
    /// HTTP version string written on every response status line
    pub const HTTP_1_1: &str = "HTTP/1.1";

    /// Line separator in the HTTP text framing
    pub const CRLF: &str = "\r\n";

    /// Separator between the header block and the body
    pub const DOUBLE_CRLF: &str = "\r\n\r\n";

    /// Hard cap on the bytes read for a single request (headers + body).
    /// A request larger than this is silently truncated.
    pub const READ_BUFFER_SIZE: usize = 2048;

    /// Common HTTP headers
    pub mod headers {
        pub const CONTENT_TYPE: &str = "Content-Type";
        pub const CONTENT_LENGTH: &str = "Content-Length";
        pub const CONNECTION: &str = "Connection";
        pub const DATE: &str = "Date";
        pub const LOCATION: &str = "Location";
    }

    /// Common content types
    pub mod content_types {
        pub const JSON: &str = "application/json; charset=utf-8";
        pub const HTML: &str = "text/html";
        pub const FORM: &str = "application/x-www-form-urlencoded";
        pub const MULTIPART: &str = "multipart/form-data";
    }
}
