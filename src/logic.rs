//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Each operation resolves the target session in the registry, applies the
//! engine, and maps ignored inputs (double answers, early advances, unknown
//! choices) to a `SessionError` that the surface renders as an in-band
//! message. Engine state is never corrupted by a bad request.

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::engine::QuizSession;
use crate::protocol::{to_answer_out, to_question_out, to_step_out, AnswerOut, QuestionOut, StepOut};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum SessionError {
  /// The deck never loaded; carries the data-source error message.
  #[error("{0}")]
  DeckUnavailable(String),
  #[error("unknown sessionId: {0}")]
  UnknownSession(String),
  /// Submission ignored: already answered, run finished, or choice not offered.
  #[error("answer ignored: question already resolved or choice not offered")]
  AnswerIgnored,
  /// Advance ignored: the active question has not been answered yet.
  #[error("advance ignored: current question is not answered")]
  AdvanceIgnored,
}

/// Start a run over the loaded pool and hand out its first question.
#[instrument(level = "info", skip(state))]
pub async fn start_session(state: &AppState) -> Result<(String, QuestionOut), SessionError> {
  let pool = match state.pool() {
    Ok(pool) => pool.clone(),
    Err(e) => {
      warn!(target: "quiz", error = %e, "Refusing to start a session without a deck");
      return Err(SessionError::DeckUnavailable(e.to_string()));
    }
  };

  let (session, first) = QuizSession::new(pool.as_slice(), &mut rand::thread_rng());
  let id = state.insert_session(session).await;
  let live_sessions = state.session_count().await;
  info!(target: "quiz", session = %id, cards = first.total, live_sessions, "Session started");
  Ok((id, to_question_out(&first)))
}

/// Resolve the active question of a session.
#[instrument(level = "info", skip(state, choice), fields(%session_id, choice_len = choice.len()))]
pub async fn submit_answer(
  state: &AppState,
  session_id: &str,
  choice: &str,
) -> Result<AnswerOut, SessionError> {
  let result = state
    .with_session(session_id, |s| s.submit_answer(choice))
    .await
    .ok_or_else(|| SessionError::UnknownSession(session_id.to_string()))?;

  match result {
    Some(r) => {
      info!(target: "quiz", session = %session_id, correct = r.correct, score = r.score_so_far, "Answer evaluated");
      Ok(to_answer_out(&r))
    }
    None => Err(SessionError::AnswerIgnored),
  }
}

/// Move a session to its next question, or to the finished summary.
#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn advance(state: &AppState, session_id: &str) -> Result<StepOut, SessionError> {
  let step = state
    .with_session(session_id, |s| s.advance(&mut rand::thread_rng()))
    .await
    .ok_or_else(|| SessionError::UnknownSession(session_id.to_string()))?;

  match step {
    Some(step) => {
      info!(target: "quiz", session = %session_id, "Advanced");
      Ok(to_step_out(&step))
    }
    None => Err(SessionError::AdvanceIgnored),
  }
}

/// Reset a session to a fresh, reshuffled run.
#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn restart(state: &AppState, session_id: &str) -> Result<QuestionOut, SessionError> {
  let first = state
    .with_session(session_id, |s| s.restart(&mut rand::thread_rng()))
    .await
    .ok_or_else(|| SessionError::UnknownSession(session_id.to_string()))?;

  info!(target: "quiz", session = %session_id, "Session restarted");
  Ok(to_question_out(&first))
}

/// Current step of a session, for clients that re-sync after a reload.
#[instrument(level = "debug", skip(state), fields(%session_id))]
pub async fn current_step(state: &AppState, session_id: &str) -> Result<StepOut, SessionError> {
  let step = state
    .with_session(session_id, |s| s.current_step())
    .await
    .ok_or_else(|| SessionError::UnknownSession(session_id.to_string()))?;
  Ok(to_step_out(&step))
}
