use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::{error, info};
use tutorpal::cli::{self, Args};
use tutorpal::config;

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match config::resolve_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let level = match config.log_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Logs go to stderr so tables on stdout stay pipeable
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    info!("Starting tutorpal...");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli::run(&args, &config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
