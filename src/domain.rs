//! Domain models used by the backend: the flashcard record.

use serde::{Deserialize, Serialize};

/// A single flashcard. `zh` is the term shown to the user; `en` is the
/// definition that counts as the correct answer. The JSON deck file uses the
/// long field names (`chinese` / `english`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
  #[serde(rename = "chinese")]
  pub zh: String,
  #[serde(rename = "english")]
  pub en: String,
}

impl Card {
  pub fn new(zh: impl Into<String>, en: impl Into<String>) -> Self {
    Self { zh: zh.into(), en: en.into() }
  }
}
