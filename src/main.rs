//! Shanka · Flashcard Quiz Backend
//!
//! - Axum HTTP + WebSocket API
//! - Static SPA fallback (./static/index.html)
//! - Deck loaded once at startup from a flashcards JSON file
//!
//! Important env variables:
//!   PORT        : u16 (default 3000)
//!   DECK_PATH   : path to the flashcards JSON file (default ./static/flashcards.json)
//!   LOG_LEVEL   : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT  : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use shanka_backend::routes::build_router;
use shanka_backend::state::AppState;
use shanka_backend::telemetry;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (deck pool + session registry).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "shanka_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
