//! Load planning handler

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::reply_json;
use crate::config::EngineDefaults;
use crate::error::ValidationError;
use crate::services::LoadPlanner;
use crate::types::{ErrorResponse, LoadMode, LoadPlanRequest, LoadResult, Request, SuccessResponse};

/// Validate a load request and run the planner on it
pub fn process_load_plan(
    request: &LoadPlanRequest,
    defaults: &EngineDefaults,
) -> Result<LoadResult, ValidationError> {
    let vehicle = request.vehicle()?;
    let mode = match request.optimization_mode.as_deref() {
        Some(name) => LoadMode::from_name(Some(name)),
        None => defaults.load_mode,
    };

    Ok(LoadPlanner::default().plan(vehicle, &request.shipments, mode))
}

/// Handle dispatch.load.plan messages
pub async fn handle_load_plan(
    client: Client,
    mut subscriber: Subscriber,
    defaults: Arc<EngineDefaults>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received load plan request");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                error!("Load plan message without reply subject");
                continue;
            }
        };

        let request: Request<LoadPlanRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse load plan request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = reply_json(&client, reply, &error).await;
                continue;
            }
        };

        match process_load_plan(&request.payload, &defaults) {
            Ok(result) => {
                let success = SuccessResponse::new(request.id, result);
                reply_json(&client, reply, &success).await?;
            }
            Err(e) => {
                warn!("Rejected load plan request {}: {}", request.id, e);
                let error = ErrorResponse::new(request.id, e.code(), e.to_string());
                reply_json(&client, reply, &error).await?;
            }
        }
    }

    Ok(())
}
