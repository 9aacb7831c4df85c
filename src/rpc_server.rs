//! Tabstash native messaging host: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"tabgroup.save", "params":{"title":"...","tabs":[...]}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; stdout carries the protocol only.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;

use serde_json::{json, Value};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tabstash::app::App;
use tabstash::platform;
use tabstash::rpc_handler::handle_method;

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn send(out: &mut impl Write, message: &Value) -> io::Result<()> {
    writeln!(out, "{}", message)?;
    out.flush()
}

fn run(app: &Mutex<App>) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    send(&mut out, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}))?;

    let mut rate_limiter = RateLimiter::new(200);

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                send(&mut out, &json!({"id": null, "error": format!("parse error: {}", e)}))?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            warn!(%id, "rate limit exceeded");
            send(&mut out, &json!({"id": id, "error": "rate limit exceeded"}))?;
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(app, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                warn!(method, error = %err, "request failed");
                json!({"id": id, "error": err})
            }
        };
        send(&mut out, &response)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let data_dir = platform::resolve_data_dir();
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        error!(dir = %data_dir.display(), error = %e, "cannot create data directory");
        return ExitCode::FAILURE;
    }
    let db_path = data_dir.join(platform::DATABASE_FILE);

    let mut app = match App::new(&db_path.to_string_lossy()) {
        Ok(app) => app,
        Err(e) => {
            error!(db = %db_path.display(), error = %e, "failed to initialize Tabstash");
            return ExitCode::FAILURE;
        }
    };
    app.startup();
    info!(db = %db_path.display(), "tabstash host started");

    let app = Mutex::new(app);
    match run(&app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "stdio failure");
            ExitCode::FAILURE
        }
    }
}
