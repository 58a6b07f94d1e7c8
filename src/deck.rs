//! Loading the flashcard deck (the one-shot data source).
//!
//! The deck is a JSON array of `{ "chinese": ..., "english": ... }` records.
//! The path comes from DECK_PATH (default `./static/flashcards.json`, so the
//! deck can sit next to the SPA it feeds). It is read once at startup and
//! never re-fetched; any failure is a `DataError` that the surfaces report to
//! clients instead of killing the process.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::domain::Card;

pub const DEFAULT_DECK_PATH: &str = "./static/flashcards.json";

/// The only error kind of the data source: unreachable, malformed, or empty.
#[derive(Debug, Error)]
pub enum DataError {
  #[error("flashcards file could not be read: {0}")]
  Unreachable(#[from] std::io::Error),
  #[error("flashcards file is not a valid card list: {0}")]
  Malformed(#[from] serde_json::Error),
  #[error("flashcards file contains no cards")]
  Empty,
}

/// Parse raw bytes into a non-empty card list.
pub fn parse_deck(bytes: &[u8]) -> Result<Vec<Card>, DataError> {
  let cards: Vec<Card> = serde_json::from_slice(bytes)?;
  if cards.is_empty() {
    return Err(DataError::Empty);
  }
  Ok(cards)
}

/// Read and parse the deck file, then permute it with a uniform shuffle
/// (Fisher–Yates via `SliceRandom`).
#[instrument(level = "info", skip(rng))]
pub fn load_deck(path: &str, rng: &mut impl Rng) -> Result<Vec<Card>, DataError> {
  let bytes = std::fs::read(path)?;
  let mut cards = parse_deck(&bytes)?;
  cards.shuffle(rng);
  info!(target: "quiz", %path, cards = cards.len(), "Loaded flashcard deck");
  Ok(cards)
}

/// Resolve the deck path from DECK_PATH (or the static default) and load it.
pub fn load_deck_from_env(rng: &mut impl Rng) -> Result<Vec<Card>, DataError> {
  let path = std::env::var("DECK_PATH").unwrap_or_else(|_| DEFAULT_DECK_PATH.to_string());
  load_deck(&path, rng).map_err(|e| {
    error!(target: "quiz", %path, error = %e, "Failed to load flashcard deck");
    e
  })
}
