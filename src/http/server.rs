//! Per-connection handling and the blocking accept loop
//!
//! One thread per accepted connection, no coordination between them. The
//! only shared state is the frozen [`Router`] (read-only behind an `Arc`)
//! and the [`Logger`] (serialized internally). A connection handles exactly
//! one request and then closes its socket.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crate::logger::Logger;

use super::constants::READ_BUFFER_SIZE;
use super::{Context, HttpResult, Request, Router};

/// Accept connections forever, spawning one handler thread per connection.
///
/// A failed accept is logged and the loop continues; transient accept
/// errors never stop the server.
pub(crate) fn serve(listener: TcpListener, router: Arc<Router>, logger: Logger) -> HttpResult<()> {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let router = Arc::clone(&router);
                let logger = logger.clone();
                thread::spawn(move || handle_connection(stream, &router, &logger));
            }
            Err(e) => {
                logger.error(&format!("failed to accept incoming connection: {}", e));
            }
        }
    }

    Ok(())
}

/// Serve a single connection: read, decode, dispatch, finalize, write, close.
///
/// The read is a single call into a fixed buffer of [`READ_BUFFER_SIZE`]
/// bytes - the hard cap on total request size; longer requests are silently
/// truncated. On a read failure the connection is abandoned without a
/// response. A panicking handler is contained here: it is logged and the
/// connection still gets the fixed 500 body.
fn handle_connection(mut stream: TcpStream, router: &Router, logger: &Logger) {
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    let read = match stream.read(&mut buffer) {
        Ok(read) => read,
        Err(e) => {
            logger.error(&format!("failed to read request data: {}", e));
            return;
        }
    };

    let request = Request::decode(&buffer[..read]);
    let mut ctx = Context::new(request);

    let handler = router.resolve(&ctx.request.method, &ctx.request.url);
    if catch_unwind(AssertUnwindSafe(|| handler(&mut ctx))).is_err() {
        logger.error(&format!(
            "handler for {} {} panicked",
            ctx.request.method, ctx.request.url
        ));
        ctx.internal_server_error();
    }

    ctx.response.finalize();
    logger.info(&format!(
        "{} request to {} {}",
        ctx.request.method, ctx.request.url, ctx.response.status
    ));

    if let Err(e) = stream.write_all(&ctx.response.to_bytes()).and_then(|_| stream.flush()) {
        logger.error(&format!("failed to write response: {}", e));
    }

    // Dropping the stream closes the connection; no keep-alive.
}
