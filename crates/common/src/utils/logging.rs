use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(debug: bool) -> &'static str {
    if debug {
        "debug,tower_http=debug,sqlx=info,sea_orm=debug"
    } else {
        "info,tower_http=info,sqlx=warn"
    }
}

fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(debug)))
}

/// Initialize tracing subscriber with sensible defaults and stdout writer.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info` (or `debug` when the debug flag is on)
/// - Writes to stdout to improve visibility in environments that hide stderr
pub fn init_logging_default(debug: bool) {
    let _ = fmt()
        .with_env_filter(env_filter(debug))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
pub fn init_logging_json(debug: bool) {
    let _ = fmt()
        .with_env_filter(env_filter(debug))
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the output format from config.
pub fn init_logging(debug: bool, json: bool) {
    if json {
        init_logging_json(debug);
    } else {
        init_logging_default(debug);
    }
}
