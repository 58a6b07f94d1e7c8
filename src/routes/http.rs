//! HTTP endpoint handlers. Thin wrappers that forward to shared logic and map
//! `SessionError`s onto status codes with a JSON message body.

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::logic::{self, SessionError};
use crate::protocol::*;
use crate::state::AppState;

fn error_response(e: SessionError) -> Response {
  let status = match &e {
    SessionError::DeckUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    SessionError::UnknownSession(_) => StatusCode::NOT_FOUND,
    SessionError::AnswerIgnored | SessionError::AdvanceIgnored => StatusCode::CONFLICT,
  };
  (status, Json(ErrorOut { message: e.to_string() })).into_response()
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_session(State(state): State<Arc<AppState>>) -> Response {
  match logic::start_session(&state).await {
    Ok((session_id, question)) => {
      info!(target: "quiz", session = %session_id, "HTTP session created");
      Json(SessionOut { session_id, question }).into_response()
    }
    Err(e) => error_response(e),
  }
}

#[instrument(level = "info", skip(state), fields(%q.session_id))]
pub async fn http_get_question(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionQuery>,
) -> Response {
  match logic::current_step(&state, &q.session_id).await {
    Ok(step) => Json(step).into_response(),
    Err(e) => error_response(e),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id, choice_len = body.choice.len()))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> Response {
  match logic::submit_answer(&state, &body.session_id, &body.choice).await {
    Ok(out) => {
      info!(target: "quiz", session = %body.session_id, correct = out.correct, "HTTP submit_answer evaluated");
      Json(out).into_response()
    }
    Err(e) => error_response(e),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id))]
pub async fn http_post_advance(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AdvanceIn>,
) -> Response {
  match logic::advance(&state, &body.session_id).await {
    Ok(step) => Json(step).into_response(),
    Err(e) => error_response(e),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id))]
pub async fn http_post_restart(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RestartIn>,
) -> Response {
  match logic::restart(&state, &body.session_id).await {
    Ok(question) => Json(question).into_response(),
    Err(e) => error_response(e),
  }
}
