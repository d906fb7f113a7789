//! NATS message handlers

pub mod load;
pub mod ping;
pub mod route;

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subject};
use serde::Serialize;
use tokio::select;
use tracing::{error, info};

use crate::config::Config;

pub const PING_SUBJECT: &str = "dispatch.ping";
pub const LOAD_PLAN_SUBJECT: &str = "dispatch.load.plan";
pub const ROUTE_SEQUENCE_SUBJECT: &str = "dispatch.route.sequence";

/// Serialize `value` and publish it on the reply subject
pub(crate) async fn reply_json<T: Serialize>(client: &Client, reply: Subject, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    client.publish(reply, bytes.into()).await?;
    Ok(())
}

/// Subscribe every handler and run until one of them stops
pub async fn start_handlers(client: Client, config: &Config) -> Result<()> {
    let defaults = Arc::new(config.engine.clone());

    let client_ping = client.clone();
    let ping_sub = client.subscribe(PING_SUBJECT).await?;
    let ping_handle = tokio::spawn(async move {
        if let Err(e) = ping::handle_ping(client_ping, ping_sub).await {
            error!("Ping handler error: {}", e);
        }
    });

    let client_load = client.clone();
    let load_sub = client.subscribe(LOAD_PLAN_SUBJECT).await?;
    let load_defaults = Arc::clone(&defaults);
    let load_handle = tokio::spawn(async move {
        if let Err(e) = load::handle_load_plan(client_load, load_sub, load_defaults).await {
            error!("Load plan handler error: {}", e);
        }
    });

    let client_route = client.clone();
    let route_sub = client.subscribe(ROUTE_SEQUENCE_SUBJECT).await?;
    let route_defaults = Arc::clone(&defaults);
    let route_handle = tokio::spawn(async move {
        if let Err(e) = route::handle_route_sequence(client_route, route_sub, route_defaults).await {
            error!("Route sequence handler error: {}", e);
        }
    });

    info!("All handlers started, waiting for messages...");

    // Wait for any handler to finish (which means an error occurred)
    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = load_handle => {
            error!("Load plan handler finished: {:?}", result);
        }
        result = route_handle => {
            error!("Route sequence handler finished: {:?}", result);
        }
    }

    Ok(())
}
