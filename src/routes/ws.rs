//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to shared logic; we reply with a single JSON message per request.
//! A connection owns at most one quiz session, created by its `start` message.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic;
use crate::protocol::{AnswerOut, ClientWsMessage, ServerWsMessage, StepOut};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "shanka_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "shanka_backend", "WebSocket connected");
  // Session id for this connection, set once the client sends `start`.
  let mut session_id: Option<String> = None;

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "shanka_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut session_id).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "shanka_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "shanka_backend", "WebSocket disconnected");
}

fn step_msg(step: StepOut) -> ServerWsMessage {
  match step {
    StepOut::Question { question } => ServerWsMessage::Question { question },
    StepOut::Finished { score, total } => ServerWsMessage::Finished { score, total },
  }
}

fn answer_msg(out: AnswerOut) -> ServerWsMessage {
  ServerWsMessage::AnswerResult {
    correct: out.correct,
    correct_answer: out.correct_answer,
    score: out.score,
    total: out.total,
  }
}

fn error_msg(e: impl std::fmt::Display) -> ServerWsMessage {
  ServerWsMessage::Error { message: e.to_string() }
}

const NO_SESSION: &str = "No active session: send start first.";

#[instrument(level = "info", skip(state, session_id))]
async fn handle_client_ws(
  msg: ClientWsMessage,
  state: &AppState,
  session_id: &mut Option<String>,
) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Start => match logic::start_session(state).await {
      Ok((id, question)) => {
        info!(target: "quiz", session = %id, "WS session started");
        *session_id = Some(id);
        ServerWsMessage::Question { question }
      }
      Err(e) => error_msg(e),
    },

    ClientWsMessage::SubmitAnswer { choice } => match session_id.as_deref() {
      Some(id) => match logic::submit_answer(state, id, &choice).await {
        Ok(out) => answer_msg(out),
        Err(e) => error_msg(e),
      },
      None => error_msg(NO_SESSION),
    },

    ClientWsMessage::Advance => match session_id.as_deref() {
      Some(id) => match logic::advance(state, id).await {
        Ok(step) => step_msg(step),
        Err(e) => error_msg(e),
      },
      None => error_msg(NO_SESSION),
    },

    ClientWsMessage::Restart => match session_id.as_deref() {
      Some(id) => match logic::restart(state, id).await {
        Ok(question) => ServerWsMessage::Question { question },
        Err(e) => error_msg(e),
      },
      None => error_msg(NO_SESSION),
    },
  }
}
