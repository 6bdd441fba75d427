//! Exact-match route table with the built-in 404 fallback
//!
//! Paths are matched byte-for-byte: no patterns, no trailing-slash
//! normalization, no case-folding. The table is populated during setup and
//! frozen before the accept loop starts - [`crate::App::run`] consumes the
//! `App`, so registering after startup is impossible by construction.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use super::Context;

/// A route handler: all effects happen by mutating the [`Context`].
pub type Handler = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// The seven supported HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    POST,
    PUT,
    PATCH,
    OPTIONS,
    HEAD,
    DELETE,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::OPTIONS,
        Method::HEAD,
        Method::DELETE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
            Method::HEAD => "HEAD",
            Method::DELETE => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = ();

    /// Exact, case-sensitive match - anything else is simply "unsupported",
    /// which the router turns into the 404 fallback rather than an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "OPTIONS" => Ok(Method::OPTIONS),
            "HEAD" => Ok(Method::HEAD),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-method exact-match route tables
pub struct Router {
    tables: HashMap<Method, HashMap<String, Handler>>,
}

impl Router {
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        for method in Method::ALL {
            tables.insert(method, HashMap::new());
        }
        Self { tables }
    }

    /// Store `handler` under the exact `(method, path)` pair, overwriting
    /// any prior handler for that pair.
    pub fn register<F>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.tables
            .entry(method)
            .or_default()
            .insert(path.to_string(), Arc::new(handler));
    }

    /// Look up the handler for a decoded method string and url.
    ///
    /// Never fails: an unsupported method string (including the empty one
    /// from an unparsable request line) or an unregistered path yields the
    /// built-in 404 fallback.
    pub fn resolve(&self, method: &str, url: &str) -> Handler {
        let Ok(method) = method.parse::<Method>() else {
            return Self::not_found();
        };

        self.tables
            .get(&method)
            .and_then(|table| table.get(url))
            .cloned()
            .unwrap_or_else(Self::not_found)
    }

    /// The fallback handler for unregistered routes
    fn not_found() -> Handler {
        Arc::new(|ctx: &mut Context| {
            ctx.response.status = 404;
            ctx.response.body = "Page Not Found".to_string();
        })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
