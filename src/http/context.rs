//! Per-connection request/response aggregate handed to handlers

use serde::Serialize;

use super::constants::{content_types, headers};
use super::{Request, Response};

/// The exclusive per-connection pair of one [`Request`] and one [`Response`].
///
/// Handlers receive `&mut Context` and shape the response through the
/// methods below (or by mutating `response` directly). A context is never
/// shared across connections or threads.
///
/// # Example
///
/// ```rust,ignore
/// app.post("/login", |ctx| {
///     if ctx.request.map_params.contains_key("user") {
///         ctx.redirect_to("/admin");
///     } else {
///         ctx.set_html("<h1>Who are you?</h1>");
///     }
/// });
/// ```
#[derive(Debug, Default)]
pub struct Context {
    pub request: Request,
    pub response: Response,
}

impl Context {
    pub fn new(request: Request) -> Self {
        Self { request, response: Response::default() }
    }

    /// Serialize `data` as the JSON response body.
    ///
    /// On success sets `Content-Type: application/json; charset=utf-8` and
    /// defaults the status to 200 when still unset. A serialization failure
    /// is logged and converted to the fixed 500 response; it never reaches
    /// the caller.
    pub fn set_json<T: Serialize>(&mut self, data: &T) {
        let body = match serde_json::to_string(data) {
            Ok(body) => body,
            Err(e) => {
                log::error!("failed to serialize JSON response body: {}", e);
                self.internal_server_error();
                return;
            }
        };

        self.response
            .headers
            .insert(headers::CONTENT_TYPE.to_string(), content_types::JSON.to_string());
        self.response.body = body;

        if self.response.status == 0 {
            self.response.status = 200;
        }
    }

    /// Use `text` as an HTML response body.
    pub fn set_html(&mut self, text: &str) {
        self.response
            .headers
            .insert(headers::CONTENT_TYPE.to_string(), content_types::HTML.to_string());
        self.response.body = text.to_string();

        if self.response.status == 0 {
            self.response.status = 200;
        }
    }

    /// Redirect the client to `url` with a 301.
    ///
    /// The redirect always wins: the status is overwritten even when the
    /// handler already set one.
    pub fn redirect_to(&mut self, url: &str) {
        self.response.headers.insert(headers::LOCATION.to_string(), url.to_string());
        self.response.status = 301;
    }

    /// The fixed 500 response. Body never leaks internals.
    pub fn internal_server_error(&mut self) {
        self.response.status = 500;
        self.response.body = "Internal Server Error".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;

    /// A payload whose serialization always fails.
    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not serializable"))
        }
    }

    #[test]
    fn test_set_json() {
        let mut ctx = Context::default();
        ctx.set_json(&serde_json::json!({ "foo": "bar" }));

        assert_eq!(ctx.response.status, 200);
        assert_eq!(ctx.response.body, "{\"foo\":\"bar\"}");
        assert_eq!(
            ctx.response.headers.get("Content-Type"),
            Some(&"application/json; charset=utf-8".to_string())
        );
    }

    #[test]
    fn test_set_json_keeps_explicit_status() {
        let mut ctx = Context::default();
        ctx.response.status = 201;
        ctx.set_json(&serde_json::json!({ "created": true }));

        assert_eq!(ctx.response.status, 201);
    }

    #[test]
    fn test_set_json_serialization_failure_becomes_500() {
        let mut ctx = Context::default();
        ctx.set_json(&Unserializable);

        assert_eq!(ctx.response.status, 500);
        assert_eq!(ctx.response.body, "Internal Server Error");
    }

    #[test]
    fn test_set_html() {
        let mut ctx = Context::default();
        ctx.set_html("<h1>Hello</h1>");

        assert_eq!(ctx.response.status, 200);
        assert_eq!(ctx.response.body, "<h1>Hello</h1>");
        assert_eq!(ctx.response.headers.get("Content-Type"), Some(&"text/html".to_string()));
    }

    #[test]
    fn test_redirect_always_wins() {
        let mut ctx = Context::default();
        ctx.response.status = 200;
        ctx.response.body = "stale".to_string();
        ctx.redirect_to("/admin");

        assert_eq!(ctx.response.status, 301);
        assert_eq!(ctx.response.headers.get("Location"), Some(&"/admin".to_string()));
    }

    #[test]
    fn test_internal_server_error() {
        let mut ctx = Context::default();
        ctx.internal_server_error();

        assert_eq!(ctx.response.status, 500);
        assert_eq!(ctx.response.body, "Internal Server Error");
        assert!(ctx.response.headers.is_empty());
    }
}
