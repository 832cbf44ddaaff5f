//! Routewise CLI
//!
//! Geocoding, trip estimates, route optimization and place search from the
//! command line. Every subcommand is executed as a map tool call.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use anyhow::Context;
use clap::Parser;
use infrastructure::{AppConfig, build_map_tools, init_telemetry};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cli::{Cli, log_filter_from_verbosity};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let telemetry = match log_filter_from_verbosity(cli.verbose) {
        Some(filter) => config.telemetry.clone().with_log_filter(filter),
        None => config.telemetry.clone(),
    };
    init_telemetry(&telemetry)?;

    let raw_tool = cli.command.is_raw_tool();
    let call = cli
        .command
        .into_tool_call()
        .context("Tool call is not valid JSON")?;
    debug!(tool = call.name(), "Running");

    let tools = build_map_tools(&config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    let reply = tools.dispatch(call, &cancel).await;

    if raw_tool {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    if !reply.success {
        eprintln!("❌ {}", reply.text);
        std::process::exit(1);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reply.data)?);
    } else {
        println!("{}", reply.text);
    }
    Ok(())
}
