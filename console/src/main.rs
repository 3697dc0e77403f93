//! Terminal front end for the customer API.
//!
//! Each invocation logs in once, runs one command, and exits. The token is
//! never written anywhere.

mod cli;
mod commands;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use customer_core::RemoteApi;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.client_config(|key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(upstream = %config.base_url, "using customer API");

    let api = RemoteApi::new(&config);
    let mut stdout = io::stdout().lock();
    match commands::run(&api, &cli.username, &cli.password, &cli.command, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so command output stays clean.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("customer_console=debug,customer_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
