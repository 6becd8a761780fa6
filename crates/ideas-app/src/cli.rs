use std::path::PathBuf;

use clap::Parser;

/// ideas: keep a short list of ideas in a hosted backend.
#[derive(Parser, Debug)]
#[command(name = "ideas", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (e.g. `debug`, `ideas_backend=trace`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use an in-memory backend instead of the remote service.
    #[arg(long)]
    pub offline: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
