mod app;
mod cli;
mod commands;
mod shell;

use std::process::ExitCode;
use std::sync::Arc;

use ideas_common::IdeasError;
use ideas_core::Navigator;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::app::App;

const DEFAULT_DIRECTIVE: &str = "ideas=info";

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        std::path::PathBuf::from(".env"),
        // Workspace root, two levels up from crates/ideas-app/
        manifest_dir.join("..").join("..").join(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

/// A bare level applies to every `ideas*` target; anything else is taken
/// as a full filter directive.
fn log_directive(cli_level: Option<&str>, config_level: &str) -> String {
    match cli_level {
        Some(level) if level.contains('=') => level.to_string(),
        Some(level) => format!("ideas={level}"),
        None => format!("ideas={config_level}"),
    }
}

fn init_logging(directive: &str) {
    let directive = directive
        .parse::<Directive>()
        .or_else(|_| DEFAULT_DIRECTIVE.parse::<Directive>());
    let filter = match directive {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

fn main() -> ExitCode {
    // Environment changes happen before any runtime thread exists.
    load_dotenv();
    let args = cli::parse();

    let config = match ideas_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ideas: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&log_directive(
        args.log_level.as_deref(),
        config.logging.level.as_str(),
    ));
    tracing::info!("ideas v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = build_runtime()
        .map_err(IdeasError::from)
        .and_then(|runtime| runtime.block_on(run(&config, args.offline)));

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("ideas: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &ideas_config::IdeasConfig, offline: bool) -> Result<(), IdeasError> {
    let navigator: Arc<dyn Navigator> =
        Arc::new(|route: &str| tracing::info!(route, "navigate"));

    let app = if offline {
        tracing::info!("Using in-memory backend");
        App::offline(config, navigator)
    } else {
        tracing::info!(endpoint = %config.backend.endpoint, "Using remote backend");
        App::remote(config, navigator)?
    };

    let watchers = shell::spawn_watchers(&app);
    shell::preload(&app).await;
    let result = shell::run(&app).await;
    for task in watchers {
        task.abort();
    }
    result
}
