//! Dispatch Worker - load planning and route sequencing service
//!
//! Connects to NATS and answers planning requests, or runs a single request
//! from a file for offline use.

mod cli;

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use dispatch_worker::config::Config;
use dispatch_worker::handlers::{self, load::process_load_plan, route::process_route_plan};
use dispatch_worker::types::{LoadPlanRequest, RoutePlanRequest};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    std::fs::create_dir_all(&config.logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        &config.logs_dir,
        "dispatch-worker.log",
    );
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - stderr (stdout carries CLI results) and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,dispatch_worker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config).await,
        Command::PlanLoad { input } => {
            let request: LoadPlanRequest = read_request(&input)?;
            let result = process_load_plan(&request, &config.engine)?;
            print_json(&result)
        }
        Command::SequenceRoute { input } => {
            let request: RoutePlanRequest = read_request(&input)?;
            let result = process_route_plan(&request, &config.engine)?;
            print_json(&result)
        }
    }
}

async fn serve(config: &Config) -> Result<()> {
    info!("Starting Dispatch Worker...");

    // Connect to NATS (supports optional NATS_USER/NATS_PASSWORD auth).
    let nats_client = match (std::env::var("NATS_USER"), std::env::var("NATS_PASSWORD")) {
        (Ok(user), Ok(password)) if !user.is_empty() => {
            async_nats::ConnectOptions::new()
                .user_and_password(user, password)
                .connect(&config.nats_url)
                .await?
        }
        _ => async_nats::connect(&config.nats_url).await?,
    };
    info!("Connected to NATS at {}", config.nats_url);

    if let Err(e) = handlers::start_handlers(nats_client, config).await {
        error!("Handler error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Read one JSON request from a file, or stdin for "-"
fn read_request<T: DeserializeOwned>(input: &str) -> Result<T> {
    let raw = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read request from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read request file {}", input))?
    };

    serde_json::from_str(&raw).with_context(|| format!("Invalid request JSON in {}", input))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
