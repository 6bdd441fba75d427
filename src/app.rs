//! Registration API and the blocking accept loop

use std::net::TcpListener;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::http::{server, Context, HttpError, HttpResult, Method, Router};
use crate::logger::Logger;

/// The application: a route table under construction plus the pieces the
/// server needs to run.
///
/// Register handlers with the per-method functions, then call [`App::run`].
/// `run` consumes the `App`, so the route table is frozen before the first
/// connection is accepted - there is no way to register a route on a
/// running server.
///
/// # Example
///
/// ```rust,ignore
/// let logger = Logger::with_file("skiff.log")?;
/// let mut app = App::new(AppConfig::default(), logger);
///
/// app.get("/", |ctx| ctx.set_html("<h1>Hello</h1>"));
/// app.run()?;
/// ```
pub struct App {
    config: AppConfig,
    router: Router,
    logger: Logger,
}

impl App {
    pub fn new(config: AppConfig, logger: Logger) -> Self {
        Self { config, router: Router::new(), logger }
    }

    /// Handle GET requests for `path`
    pub fn get<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.router.register(Method::GET, path, handler);
    }

    /// Handle POST requests for `path`
    pub fn post<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.router.register(Method::POST, path, handler);
    }

    /// Handle PUT requests for `path`
    pub fn put<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.router.register(Method::PUT, path, handler);
    }

    /// Handle PATCH requests for `path`
    pub fn patch<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.router.register(Method::PATCH, path, handler);
    }

    /// Handle OPTIONS requests for `path`
    pub fn options<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.router.register(Method::OPTIONS, path, handler);
    }

    /// Handle HEAD requests for `path`
    pub fn head<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.router.register(Method::HEAD, path, handler);
    }

    /// Handle DELETE requests for `path`
    pub fn delete<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.router.register(Method::DELETE, path, handler);
    }

    /// Bind the configured address and serve forever.
    ///
    /// Binding failure is the one fatal error: it is logged at CRITICAL and
    /// returned so the process can exit. Once the listener is up this only
    /// returns on a listener-level failure; accept errors are logged and
    /// skipped inside the loop.
    pub fn run(self) -> HttpResult<()> {
        let addr = self.config.addr();
        self.logger.info(&format!("skiff.run started addr={}", addr));

        let listener = TcpListener::bind(&addr).map_err(|source| {
            self.logger
                .critical(&format!("failed to bind {}: cannot serve at all", addr));
            HttpError::Bind { addr, source }
        })?;

        server::serve(listener, Arc::new(self.router), self.logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::with_file(dir.path().join("app.log")).unwrap();
        App::new(AppConfig::default(), logger)
    }

    #[test]
    fn test_registration_reaches_the_router() {
        let mut app = test_app();
        app.get("/foo", |ctx| {
            ctx.response.status = 201;
        });

        let mut ctx = Context::default();
        app.router.resolve("GET", "/foo")(&mut ctx);
        assert_eq!(ctx.response.status, 201);
    }

    #[test]
    fn test_each_method_registers_in_its_own_table() {
        let mut app = test_app();
        app.get("/r", |ctx| ctx.response.body = "GET".to_string());
        app.post("/r", |ctx| ctx.response.body = "POST".to_string());
        app.put("/r", |ctx| ctx.response.body = "PUT".to_string());
        app.patch("/r", |ctx| ctx.response.body = "PATCH".to_string());
        app.options("/r", |ctx| ctx.response.body = "OPTIONS".to_string());
        app.head("/r", |ctx| ctx.response.body = "HEAD".to_string());
        app.delete("/r", |ctx| ctx.response.body = "DELETE".to_string());

        for method in Method::ALL {
            let mut ctx = Context::default();
            app.router.resolve(method.as_str(), "/r")(&mut ctx);
            assert_eq!(ctx.response.body, method.as_str());
        }
    }

    #[test]
    fn test_run_bind_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::with_file(dir.path().join("bind.log")).unwrap();

        // Occupy a port so the app's own bind must fail.
        let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = occupied.local_addr().unwrap().port();

        let config = AppConfig { port, ..Default::default() };
        let app = App::new(config, logger);

        match app.run() {
            Err(HttpError::Bind { addr, .. }) => assert_eq!(addr, format!("127.0.0.1:{}", port)),
            other => panic!("expected a bind error, got {:?}", other.map(|_| ())),
        }
    }
}
