//! Route sequencing handler

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::reply_json;
use crate::config::EngineDefaults;
use crate::error::ValidationError;
use crate::services::sequence_route;
use crate::types::{ErrorResponse, Request, RoutePlanRequest, RouteResult, SuccessResponse};

/// Validate a route request, fill omitted options from `defaults` and sequence it
pub fn process_route_plan(
    request: &RoutePlanRequest,
    defaults: &EngineDefaults,
) -> Result<RouteResult, ValidationError> {
    let origin = request.origin()?;
    let stops = request.stops()?;

    let start_time = request.start_time.as_deref().unwrap_or(&defaults.start_time);
    let avg_speed_kmh = request.avg_speed_kmh.unwrap_or(defaults.avg_speed_kmh);
    let default_service = request
        .default_service_time
        .unwrap_or(defaults.default_service_minutes);

    sequence_route(origin, stops, start_time, avg_speed_kmh, default_service)
}

/// Handle dispatch.route.sequence messages
pub async fn handle_route_sequence(
    client: Client,
    mut subscriber: Subscriber,
    defaults: Arc<EngineDefaults>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received route sequence request");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                error!("Route sequence message without reply subject");
                continue;
            }
        };

        let request: Request<RoutePlanRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse route sequence request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = reply_json(&client, reply, &error).await;
                continue;
            }
        };

        match process_route_plan(&request.payload, &defaults) {
            Ok(result) => {
                let success = SuccessResponse::new(request.id, result);
                reply_json(&client, reply, &success).await?;
            }
            Err(e) => {
                warn!("Rejected route sequence request {}: {}", request.id, e);
                let error = ErrorResponse::new(request.id, e.code(), e.to_string());
                reply_json(&client, reply, &error).await?;
            }
        }
    }

    Ok(())
}
