use std::process::ExitCode;

use clap::Parser;
use configs::{AppConfig, CliArgs};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> ExitCode {
    // .env first so RUST_LOG and DB_DSN are visible to config resolution
    dotenv().ok();
    let args = CliArgs::parse();

    let cfg = match AppConfig::resolve(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging(args.debug, args.log_json);
            error!(service = "subs-api", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(cfg.logging.debug, cfg.logging.json);

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "subs-api",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "subs-api", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "subs-api",
        event = "start",
        %service_id,
        pid,
        version,
        host = %cfg.server.host,
        port = cfg.server.port,
        debug = cfg.logging.debug,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "subscription service starting"
    );

    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "subs-api", event = "stop", %service_id, pid, "server stopped normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "subs-api", event = "run_failed", error = %e, "server exited with error");
            ExitCode::FAILURE
        }
    }
}
