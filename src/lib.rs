//! Skiff - a minimal HTTP/1.1 web framework
//!
//! Skiff is a small web framework built directly on `std::net` TCP sockets.
//! It accepts connections, decodes raw bytes into a structured [`Request`],
//! dispatches to a handler registered by method and path, lets the handler
//! populate the [`Response`] through a [`Context`], and encodes the result
//! back to wire bytes. One connection, one request, one response - no
//! keep-alive, no pipelining.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use skiff::{App, AppConfig, Logger};
//!
//! fn main() -> anyhow::Result<()> {
//!     env_logger::init();
//!
//!     let logger = Logger::with_file("skiff.log")?;
//!     let mut app = App::new(AppConfig::load()?, logger);
//!
//!     app.get("/", |ctx| {
//!         ctx.set_json(&serde_json::json!({ "foo": "bar" }));
//!     });
//!
//!     app.run()?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`app`] - registration API and the blocking accept loop
//! - [`http`] - the protocol engine: decoder, encoder, router, connection handling
//! - [`config`] - host/port/debug configuration with file and env sources
//! - [`logger`] - line-oriented file logger shared by all connection threads
//!
//! # Limitations
//!
//! Requests are read once into a fixed 2048-byte buffer; anything beyond that
//! is silently truncated. Routing is exact-match only - no path parameters,
//! no wildcards, no trailing-slash normalization.

pub mod app;
pub mod config;
pub mod http;
pub mod logger;

pub use app::App;
pub use config::AppConfig;
pub use http::{Context, Handler, HttpError, HttpResult, Method, Request, Response, Router};
pub use logger::{Level, Logger};
