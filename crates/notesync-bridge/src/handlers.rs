//! HTTP handlers for the UI bridge.
//!
//! Implements:
//! - POST /ipc - Accept one inbound message and dispatch it on its own task
//! - GET /events - Stream outbound messages as Server-Sent Events
//! - GET /health - Health check endpoint

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use notesync_core::Inbound;
use serde::Serialize;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::error::Result;
use crate::router::RequestRouter;
use crate::ui::BroadcastUi;

/// SSE event sent in place of messages a slow subscriber missed; its data is
/// the number of messages dropped.
pub const LAGGED_EVENT: &str = "lagged";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: RequestRouter,
    pub ui: Arc<BroadcastUi>,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
}

/// GET /health - Health check endpoint.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /ipc - Accept one inbound message.
///
/// Replies arrive later on `/events`; this only acknowledges receipt.
pub async fn ipc_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Inbound>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(inbound) = payload?;
    debug!("Received {} request", inbound.channel());
    state.router.spawn(inbound);
    Ok(StatusCode::ACCEPTED)
}

/// GET /events - Outbound messages, one SSE event per message named by its
/// channel.
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.ui.subscribe()).filter_map(|item| match item {
        Ok(message) => match Event::default().event(message.channel()).json_data(&message) {
            Ok(event) => Some(Ok::<_, Infallible>(event)),
            Err(err) => {
                warn!("Failed to encode {} event: {}", message.channel(), err);
                None
            }
        },
        // The UI cannot tell which replies or loading notifications it
        // missed, so it is told to resync.
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!("UI subscriber lagged, {} messages skipped", skipped);
            Some(Ok(Event::default()
                .event(LAGGED_EVENT)
                .data(skipped.to_string())))
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Build the bridge's HTTP router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ipc", post(ipc_handler))
        .route("/events", get(events_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
