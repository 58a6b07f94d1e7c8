//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable so backend and frontend evolve independently.

use serde::{Deserialize, Serialize};

use crate::engine::{AnswerResult, QuestionView, StepView};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Begin a quiz run over the loaded deck.
    Start,
    SubmitAnswer {
        choice: String,
    },
    Advance,
    Restart,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Question {
        question: QuestionOut,
    },
    AnswerResult {
        correct: bool,
        #[serde(rename = "correctAnswer")]
        correct_answer: String,
        score: usize,
        total: usize,
    },
    Finished {
        score: usize,
        total: usize,
    },
    Error {
        message: String,
    },
}

/// Question DTO shared by WS and HTTP. The correct answer stays server-side;
/// clients only learn it from an answer result.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub prompt: String,
    pub choices: Vec<String>,
    pub position: usize,
    pub total: usize,
}

/// Convert the engine's internal question view to the public DTO.
pub fn to_question_out(q: &QuestionView) -> QuestionOut {
    QuestionOut {
        prompt: q.prompt.clone(),
        choices: q.choices.clone(),
        position: q.position,
        total: q.total,
    }
}

pub fn to_answer_out(r: &AnswerResult) -> AnswerOut {
    AnswerOut {
        correct: r.correct,
        correct_answer: r.correct_answer.clone(),
        score: r.score_so_far,
        total: r.total,
    }
}

pub fn to_step_out(step: &StepView) -> StepOut {
    match step {
        StepView::Question(q) => StepOut::Question { question: to_question_out(q) },
        StepView::Finished(f) => StepOut::Finished { score: f.final_score, total: f.total },
    }
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct SessionOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub question: QuestionOut,
}

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Deserialize)]
pub struct AnswerIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub choice: String,
}
#[derive(Serialize)]
pub struct AnswerOut {
    pub correct: bool,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    pub score: usize,
    pub total: usize,
}

#[derive(Deserialize)]
pub struct AdvanceIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Deserialize)]
pub struct RestartIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Where an advance (or a state re-sync) landed: the next question or the end
/// of the run.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepOut {
    Question { question: QuestionOut },
    Finished { score: usize, total: usize },
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
