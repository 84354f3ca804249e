//! HTTP routes.
//!
//! - GET /
//! - GET /health
//! - POST /fortune
//! - POST /ask

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::error::ApiError;
use super::validate::{validate, Inquiry};
use crate::completion::{ChatCompletion, ChatRequest};
use crate::persona::Persona;

/// Application state shared across handlers.
pub struct AppState {
    pub completer: Arc<dyn ChatCompletion>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(completer: Arc<dyn ChatCompletion>) -> Self {
        Self {
            completer,
            start_time: Instant::now(),
        }
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route(Persona::FortuneTeller.route(), post(fortune))
        .route(Persona::NaggingChatbot.route(), post(ask))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─── Response Types ────────────────────────────────────────────────────────

/// Static landing payload.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub usage: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub uptime_secs: u64,
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        status: "online",
        message: "The Magic Fortune Teller API is ready.",
        usage: "Send a POST request to /fortune with JSON body: {'name': 'Alice', 'question': '...'} \
                or to /ask with JSON body: {'name': 'Alice', 'message': '...'}",
    })
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.completer.model().to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn fortune(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    relay(Persona::FortuneTeller, &state, payload).await
}

async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    relay(Persona::NaggingChatbot, &state, payload).await
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Validate, call the model, shape the reply. Runs inside a `relay` span
/// carrying the request id and persona.
async fn relay(
    persona: Persona,
    state: &AppState,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("relay", %request_id, %persona);

    relay_in_span(persona, state, payload).instrument(span).await
}

async fn relay_in_span(
    persona: Persona,
    state: &AppState,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        warn!(%rejection, "Rejected non-JSON body");
        ApiError::BadRequest("Request must be valid JSON".to_string())
    })?;

    let inquiry = validate(persona, &body).inspect_err(|e| {
        warn!(error = %e, "Invalid request");
    })?;

    info!(
        seeker = inquiry.name,
        text_chars = inquiry.text.chars().count(),
        "Relaying to completion API"
    );

    let request = ChatRequest::new(
        persona.system_prompt(),
        persona.user_prompt(&inquiry.name, &inquiry.text),
    );

    match state.completer.complete(&request).await {
        Ok(reply) => {
            info!(reply_chars = reply.chars().count(), "Reply ready");
            Ok(Json(success_body(persona, inquiry, reply)))
        }
        Err(e) => {
            error!(error = %e, "Completion API error");
            Err(ApiError::Upstream(format!(
                "{}: {e}",
                persona.upstream_error_prefix()
            )))
        }
    }
}

fn success_body(persona: Persona, inquiry: Inquiry, reply: String) -> Value {
    let mut body = Map::new();
    body.insert("status".to_string(), Value::from("success"));
    body.insert("seeker".to_string(), Value::from(inquiry.name));
    body.insert(persona.text_field().to_string(), Value::from(inquiry.text));
    body.insert(persona.reply_field().to_string(), Value::from(reply));
    Value::Object(body)
}
