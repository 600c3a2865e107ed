//! btc-sentiment HTTP Server
//!
//! Axum-based server exposing the market-sentiment pipeline: health and
//! session status, on-demand training, single-shot classification, and
//! a WebSocket stream of phase changes.

mod handlers;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sentiment_core::{AdvisorBuilder, HistorySource};
use sentiment_runtime::{
    BinanceSource, CoinGeckoSource, CryptoCompareSource, CsvHistorySource, MockClassifier,
    SourceChain,
};

use crate::handlers::{
    classify_handler, health_check, status_handler, status_stream_handler, train_handler,
};
use crate::state::AppState;

/// Days of history requested from the remote sources
const DEFAULT_HISTORY_DAYS: u32 = 365;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let days = std::env::var("HISTORY_DAYS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_HISTORY_DAYS);

    // One HTTP client shared by every remote source
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    // History sources, most preferred first
    let mut sources: Vec<Box<dyn HistorySource>> = Vec::new();

    match std::env::var("HISTORY_CSV") {
        Ok(path) => {
            tracing::info!("✓ Local history CSV configured: {}", path);
            sources.push(Box::new(CsvHistorySource::new(path)));
        }
        Err(_) => {
            tracing::info!("No HISTORY_CSV set - using remote sources only");
        }
    }

    sources.push(Box::new(CoinGeckoSource::new(client.clone(), days)));
    sources.push(Box::new(BinanceSource::new(client.clone(), days)));
    sources.push(Box::new(CryptoCompareSource::new(client, days)));

    let chain = SourceChain::new(sources);
    tracing::info!("History fallback chain ({} sources, {} days):", chain.len(), days);
    for name in chain.source_names() {
        tracing::info!("  • {}", name);
    }

    // Build the advisor around the mock classifier
    let advisor = Arc::new(
        AdvisorBuilder::new()
            .source(Arc::new(chain))
            .classifier(Arc::new(MockClassifier::new()))
            .build()?,
    );

    // Train in the background; the API answers 503 until this lands
    let startup_advisor = advisor.clone();
    tokio::spawn(async move {
        match startup_advisor.train().await {
            Ok(outcome) => {
                tracing::info!(
                    "✓ Startup training finished: {} examples ({} rows skipped)",
                    outcome.accepted(),
                    outcome.skipped.len()
                );
            }
            Err(e) => {
                tracing::warn!("⚠ Startup training failed: {}", e);
                tracing::warn!("  Retry with: curl -X POST <host>/api/train");
            }
        }
    });

    // Build application state
    let state = AppState { advisor };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & status
        .route("/health", get(health_check))
        .route("/api/status", get(status_handler))
        .route("/api/status/stream", get(status_stream_handler))

        // Pipeline API
        .route("/api/train", post(train_handler))
        .route("/api/classify", post(classify_handler))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 btc-sentiment server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health            - Health check");
    tracing::info!("  GET  /api/status        - Session snapshot");
    tracing::info!("  GET  /api/status/stream - WebSocket phase updates");
    tracing::info!("  POST /api/train         - Start (re)training");
    tracing::info!("  POST /api/classify      - Classify date/volume/rate");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
