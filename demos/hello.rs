//! Minimal Skiff application: a JSON endpoint, an HTML page and a form.
//!
//! Run with `cargo run --example hello`, then:
//!
//! ```text
//! curl -i http://127.0.0.1:4321/
//! curl -i http://127.0.0.1:4321/about
//! curl -i -d user=alice http://127.0.0.1:4321/login
//! ```

use skiff::{App, AppConfig, Logger};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let logger = Logger::create()?;
    let mut app = App::new(AppConfig::load()?, logger);

    app.get("/", |ctx| {
        ctx.set_json(&serde_json::json!({ "foo": "bar" }));
    });

    app.get("/about", |ctx| {
        ctx.set_html("<h1>Hello from Skiff</h1>");
    });

    app.post("/login", |ctx| {
        if ctx.request.map_params.contains_key("user") {
            ctx.redirect_to("/");
        } else {
            ctx.set_html("<h1>Who are you?</h1>");
        }
    });

    app.run()?;
    Ok(())
}
