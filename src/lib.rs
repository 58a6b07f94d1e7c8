//! Shanka · Flashcard Quiz Backend
//!
//! Serves multiple-choice flashcard quiz sessions to browser clients over an
//! Axum HTTP + WebSocket API, with a static SPA fallback. The deck is a JSON
//! file of term/definition pairs, loaded once at startup; each session owns a
//! privately shuffled copy of it and walks it one question at a time.

pub mod deck;
pub mod domain;
pub mod engine;
pub mod logic;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod telemetry;
