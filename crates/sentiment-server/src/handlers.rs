//! HTTP/WebSocket Handlers

use axum::{
    Json,
    extract::{State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::Response,
};
use serde::{Deserialize, Serialize};

use sentiment_core::{SentimentError, Session};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model_ready: bool,
    pub source: String,
    pub classifier: String,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub date: String,
    #[serde(deserialize_with = "sentiment_core::dataset::string_or_number")]
    pub volume: String,
    #[serde(deserialize_with = "sentiment_core::dataset::string_or_number")]
    pub rate: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub advice: &'static str,
    pub emoji: &'static str,
    pub css_class: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub started: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model_ready: state.advisor.ready().await,
        source: state.advisor.source_name().to_string(),
        classifier: state.advisor.classifier_name().to_string(),
    })
}

/// Current session snapshot
pub async fn status_handler(State(state): State<AppState>) -> Json<Session> {
    Json(state.advisor.session().await)
}

/// Classify one (date, volume, rate) observation
pub async fn classify_handler(
    State(state): State<AppState>,
    Json(payload): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, (StatusCode, Json<ErrorResponse>)> {
    let verdict = state
        .advisor
        .classify(&payload.date, &payload.volume, &payload.rate)
        .await
        .map_err(|e| {
            tracing::warn!("Classification failed: {}", e);
            error_response(&e)
        })?;

    Ok(Json(ClassifyResponse {
        label: verdict.label,
        confidence: verdict.confidence,
        advice: verdict.advice.advice,
        emoji: verdict.advice.emoji,
        css_class: verdict.advice.css_class,
    }))
}

/// Kick off a training run unless one is already in flight.
///
/// The claim is taken before the response is sent, so of two racing
/// requests exactly one gets 202 and the other 409.
pub async fn train_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TrainResponse>), (StatusCode, Json<ErrorResponse>)> {
    if !state.advisor.begin_run().await {
        return Err(error_response(&SentimentError::TrainingInProgress));
    }

    let advisor = state.advisor.clone();
    tokio::spawn(async move {
        if let Err(e) = advisor.run_pipeline().await {
            tracing::error!("Training run failed: {}", e);
        }
    });

    Ok((StatusCode::ACCEPTED, Json(TrainResponse { started: true })))
}

/// WebSocket stream of session snapshots, one per phase change
pub async fn status_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_status_stream(socket, state))
}

async fn handle_status_stream(mut socket: WebSocket, state: AppState) {
    let mut phases = state.advisor.subscribe();

    // Snapshot on connect, then one per phase change
    if send_snapshot(&mut socket, &state).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            changed = phases.changed() => {
                if changed.is_err() || send_snapshot(&mut socket, &state).await.is_err() {
                    break;
                }
            }
            // Keep reading the client side; a close frame or a dead
            // connection ends the stream instead of parking the task
            message = socket.recv() => {
                if client_disconnected(message) {
                    break;
                }
            }
        }
    }
}

/// Whether a frame read from the status stream means the client is gone
fn client_disconnected(message: Option<Result<Message, axum::Error>>) -> bool {
    match message {
        None | Some(Ok(Message::Close(_))) | Some(Err(_)) => true,
        Some(Ok(_)) => false,
    }
}

async fn send_snapshot(
    socket: &mut WebSocket,
    state: &AppState,
) -> Result<(), axum::Error> {
    let session = state.advisor.session().await;
    let payload = serde_json::json!({
        "type": "status",
        "session": session,
    });

    socket.send(Message::Text(payload.to_string().into())).await
}

fn error_response(error: &SentimentError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match error {
        SentimentError::InvalidDate(_) | SentimentError::InvalidNumber { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_INPUT")
        }
        SentimentError::NotReady => (StatusCode::SERVICE_UNAVAILABLE, "MODEL_NOT_READY"),
        SentimentError::TrainingInProgress => (StatusCode::CONFLICT, "TRAINING_IN_PROGRESS"),
        SentimentError::NoCandidates => (StatusCode::BAD_GATEWAY, "NO_USABLE_RESULT"),
        SentimentError::Source(_) => (StatusCode::BAD_GATEWAY, "SOURCE_ERROR"),
        SentimentError::Classifier(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "CLASSIFIER_ERROR")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    (
        status,
        Json(ErrorResponse {
            error: error.user_message(),
            code: code.into(),
        }),
    )
}
