//! Quiz session engine: deck order, choice generation, scoring, progression.
//!
//! The engine does no I/O. Every operation takes the session plus an RNG and
//! returns a view struct that the route layers serialize; the surfaces never
//! reach into the state directly. Inputs the contract does not allow (a second
//! answer, an advance before answering, a choice that was never offered) are
//! ignored and reported as `None` so the caller can tell the client.
//!
//! Run life cycle:
//!   start → in progress (unanswered → answered, repeating) → finished.
//! `restart` is the only way out of the finished state.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::Card;

/// At most this many distractors accompany the correct answer.
const MAX_DISTRACTORS: usize = 3;

/// One multiple-choice question for the current deck position.
///
/// `correct_answer` stays on the server side; the wire DTO strips it and the
/// client only learns it from an `AnswerResult`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionView {
  pub prompt: String,
  pub choices: Vec<String>,
  pub correct_answer: String,
  pub position: usize,
  pub total: usize,
}

/// Outcome of a submitted answer. `score_so_far` already includes this answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerResult {
  pub correct: bool,
  pub correct_answer: String,
  pub score_so_far: usize,
  pub total: usize,
}

/// Terminal summary once the deck is exhausted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishedView {
  pub final_score: usize,
  pub total: usize,
}

/// What an advance (or a state re-sync) lands on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepView {
  Question(QuestionView),
  Finished(FinishedView),
}

/// Mutable state of one quiz run. Owned by the session registry and mutated
/// only through the operations below.
#[derive(Clone, Debug)]
pub struct QuizSession {
  deck: Vec<Card>,
  position: usize,
  score: usize,
  current_choices: Vec<String>,
  answered: bool,
}

impl QuizSession {
  /// Start a fresh run: shuffle a private copy of the pool and generate the
  /// first question. The pool must be non-empty (the deck loader guarantees
  /// this before any session is created).
  pub fn new(pool: &[Card], rng: &mut impl Rng) -> (Self, QuestionView) {
    debug_assert!(!pool.is_empty());
    let mut session = Self {
      deck: pool.to_vec(),
      position: 0,
      score: 0,
      current_choices: Vec::new(),
      answered: false,
    };
    session.deck.shuffle(rng);
    let first = session.generate_question(rng);
    (session, first)
  }

  /// Build the choice list for the card at `position` and clear the answered
  /// flag. Distractors are other cards' answers; anything equal to the correct
  /// answer is excluded from the pool, but distractors are NOT deduplicated
  /// against each other. Decks with fewer than four distinct answers simply
  /// yield a shorter list.
  fn generate_question(&mut self, rng: &mut impl Rng) -> QuestionView {
    let card = &self.deck[self.position];
    let correct = card.en.clone();
    let prompt = card.zh.clone();

    let mut distractors: Vec<String> = self
      .deck
      .iter()
      .filter(|c| c.en != correct)
      .map(|c| c.en.clone())
      .collect();
    distractors.shuffle(rng);
    distractors.truncate(MAX_DISTRACTORS);

    let mut choices = distractors;
    choices.push(correct.clone());
    choices.shuffle(rng);

    self.current_choices = choices.clone();
    self.answered = false;

    QuestionView {
      prompt,
      choices,
      correct_answer: correct,
      position: self.position,
      total: self.deck.len(),
    }
  }

  /// Resolve the active question. `None` means the submission was ignored:
  /// the question was already answered, the run is finished, or `choice` was
  /// never offered. Ignored submissions change nothing, so a double click on
  /// the same button cannot bump the score.
  pub fn submit_answer(&mut self, choice: &str) -> Option<AnswerResult> {
    if self.answered || self.is_finished() {
      return None;
    }
    if !self.current_choices.iter().any(|c| c == choice) {
      return None;
    }

    let correct_answer = self.deck[self.position].en.clone();
    let correct = choice == correct_answer;
    self.answered = true;
    if correct {
      self.score += 1;
    }
    Some(AnswerResult {
      correct,
      correct_answer,
      score_so_far: self.score,
      total: self.deck.len(),
    })
  }

  /// Move to the next position. Honored only once the active question has
  /// been answered; after the last card this yields the finished summary, and
  /// from then on only `restart` does anything.
  pub fn advance(&mut self, rng: &mut impl Rng) -> Option<StepView> {
    if !self.answered || self.is_finished() {
      return None;
    }
    self.position += 1;
    if self.position < self.deck.len() {
      Some(StepView::Question(self.generate_question(rng)))
    } else {
      self.current_choices.clear();
      Some(StepView::Finished(self.finished_view()))
    }
  }

  /// Reset to a fresh run over the same cards: new shuffle, zeroed score and
  /// position. Valid from any state, including finished.
  pub fn restart(&mut self, rng: &mut impl Rng) -> QuestionView {
    self.deck.shuffle(rng);
    self.position = 0;
    self.score = 0;
    self.generate_question(rng)
  }

  /// Current step without mutating anything, for surfaces that re-sync
  /// (e.g. a reloaded client asking where it was).
  pub fn current_step(&self) -> StepView {
    if self.is_finished() {
      return StepView::Finished(self.finished_view());
    }
    let card = &self.deck[self.position];
    StepView::Question(QuestionView {
      prompt: card.zh.clone(),
      choices: self.current_choices.clone(),
      correct_answer: card.en.clone(),
      position: self.position,
      total: self.deck.len(),
    })
  }

  fn finished_view(&self) -> FinishedView {
    FinishedView { final_score: self.score, total: self.deck.len() }
  }

  pub fn is_finished(&self) -> bool {
    self.position >= self.deck.len()
  }

  pub fn score(&self) -> usize {
    self.score
  }

  pub fn position(&self) -> usize {
    self.position
  }

  pub fn total(&self) -> usize {
    self.deck.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use std::collections::HashMap;

  fn pool() -> Vec<Card> {
    vec![
      Card::new("猫", "cat"),
      Card::new("狗", "dog"),
      Card::new("鸟", "bird"),
      Card::new("鱼", "fish"),
      Card::new("马", "horse"),
    ]
  }

  fn answer_by_prompt() -> HashMap<String, String> {
    pool().into_iter().map(|c| (c.zh, c.en)).collect()
  }

  #[test]
  fn choices_contain_correct_answer_exactly_once() {
    for seed in 0..20 {
      let mut rng = StdRng::seed_from_u64(seed);
      let (mut session, mut view) = QuizSession::new(&pool(), &mut rng);
      loop {
        let hits = view.choices.iter().filter(|c| **c == view.correct_answer).count();
        assert_eq!(hits, 1, "seed {seed}, position {}", view.position);

        session.submit_answer(&view.correct_answer).expect("submit");
        match session.advance(&mut rng).expect("advance") {
          StepView::Question(next) => view = next,
          StepView::Finished(_) => break,
        }
      }
    }
  }

  #[test]
  fn five_distinct_answers_give_four_choices() {
    let mut rng = StdRng::seed_from_u64(3);
    let (_, view) = QuizSession::new(&pool(), &mut rng);
    assert_eq!(view.choices.len(), 4);
    assert_eq!(view.total, 5);
  }

  #[test]
  fn question_matches_the_card_pairing() {
    let mut rng = StdRng::seed_from_u64(4);
    let (_, view) = QuizSession::new(&pool(), &mut rng);
    let expected = answer_by_prompt();
    assert_eq!(Some(&view.correct_answer), expected.get(&view.prompt));
  }

  #[test]
  fn small_decks_shrink_the_choice_list() {
    for n in 1..=4usize {
      let cards: Vec<Card> = pool().into_iter().take(n).collect();
      let mut rng = StdRng::seed_from_u64(n as u64);
      let (_, view) = QuizSession::new(&cards, &mut rng);
      assert_eq!(view.choices.len(), 1 + (n - 1).min(3), "deck of {n}");
    }
  }

  #[test]
  fn two_card_deck_offers_correct_plus_one_distractor() {
    let cards = vec![Card::new("猫", "cat"), Card::new("狗", "dog")];
    let mut rng = StdRng::seed_from_u64(5);
    let (_, view) = QuizSession::new(&cards, &mut rng);
    assert_eq!(view.choices.len(), 2);
    assert!(view.choices.contains(&"cat".to_string()));
    assert!(view.choices.contains(&"dog".to_string()));
  }

  #[test]
  fn duplicate_correct_answers_never_appear_as_distractors() {
    // Three cards share the answer "cat"; no copy of it may show up as a
    // distractor, and the question is still answerable.
    let cards = vec![
      Card::new("猫", "cat"),
      Card::new("小猫", "cat"),
      Card::new("猫咪", "cat"),
      Card::new("狗", "dog"),
      Card::new("鸟", "bird"),
    ];
    for seed in 0..10 {
      let mut rng = StdRng::seed_from_u64(seed);
      let (_, view) = QuizSession::new(&cards, &mut rng);
      let hits = view.choices.iter().filter(|c| **c == view.correct_answer).count();
      assert_eq!(hits, 1, "seed {seed}");
    }
  }

  #[test]
  fn correct_submission_scores_one_of_five() {
    let mut rng = StdRng::seed_from_u64(6);
    let (mut session, view) = QuizSession::new(&pool(), &mut rng);
    let result = session.submit_answer(&view.correct_answer).expect("submit");
    assert!(result.correct);
    assert_eq!(result.score_so_far, 1);
    assert_eq!(result.total, 5);
  }

  #[test]
  fn wrong_submission_reveals_the_expected_answer() {
    let mut rng = StdRng::seed_from_u64(7);
    let (mut session, view) = QuizSession::new(&pool(), &mut rng);
    let wrong = view
      .choices
      .iter()
      .find(|c| **c != view.correct_answer)
      .expect("a distractor")
      .clone();
    let result = session.submit_answer(&wrong).expect("submit");
    assert!(!result.correct);
    assert_eq!(result.correct_answer, view.correct_answer);
    assert_eq!(result.score_so_far, 0);
    assert_eq!(result.total, 5);
  }

  #[test]
  fn second_submission_is_ignored() {
    let mut rng = StdRng::seed_from_u64(8);
    let (mut session, view) = QuizSession::new(&pool(), &mut rng);
    session.submit_answer(&view.correct_answer).expect("first submit");
    assert!(session.submit_answer(&view.correct_answer).is_none());
    assert_eq!(session.score(), 1);
  }

  #[test]
  fn unoffered_choice_is_ignored_and_question_stays_open() {
    let mut rng = StdRng::seed_from_u64(9);
    let (mut session, view) = QuizSession::new(&pool(), &mut rng);
    assert!(session.submit_answer("volcano").is_none());
    assert_eq!(session.score(), 0);
    // Question is still unanswered afterwards.
    let result = session.submit_answer(&view.correct_answer).expect("real submit");
    assert!(result.correct);
  }

  #[test]
  fn advance_requires_an_answer() {
    let mut rng = StdRng::seed_from_u64(10);
    let (mut session, _) = QuizSession::new(&pool(), &mut rng);
    assert!(session.advance(&mut rng).is_none());
    assert_eq!(session.position(), 0);
  }

  #[test]
  fn full_run_counts_correct_submissions() {
    // Answer correctly on even positions, wrongly on odd ones; the final
    // score must equal the number of correct submissions.
    let mut rng = StdRng::seed_from_u64(11);
    let (mut session, mut view) = QuizSession::new(&pool(), &mut rng);
    let mut expected_score = 0;
    loop {
      let choice = if view.position % 2 == 0 {
        expected_score += 1;
        view.correct_answer.clone()
      } else {
        view
          .choices
          .iter()
          .find(|c| **c != view.correct_answer)
          .expect("a distractor")
          .clone()
      };
      let result = session.submit_answer(&choice).expect("submit");
      assert_eq!(result.score_so_far, expected_score);

      match session.advance(&mut rng).expect("advance") {
        StepView::Question(next) => view = next,
        StepView::Finished(done) => {
          assert_eq!(done.final_score, expected_score);
          assert_eq!(done.total, 5);
          break;
        }
      }
    }
    assert!(session.is_finished());
  }

  #[test]
  fn finished_run_ignores_further_input() {
    let mut rng = StdRng::seed_from_u64(12);
    let cards = vec![Card::new("猫", "cat"), Card::new("狗", "dog")];
    let (mut session, view) = QuizSession::new(&cards, &mut rng);
    session.submit_answer(&view.correct_answer).expect("submit");
    session.advance(&mut rng).expect("advance");
    let StepView::Question(second) = session.current_step() else {
      panic!("second question expected");
    };
    session.submit_answer(&second.correct_answer).expect("submit");
    assert!(matches!(session.advance(&mut rng), Some(StepView::Finished(_))));

    assert!(session.advance(&mut rng).is_none());
    assert!(session.submit_answer("cat").is_none());
    assert!(matches!(session.current_step(), StepView::Finished(_)));
  }

  #[test]
  fn restart_zeroes_score_and_position_from_any_state() {
    let mut rng = StdRng::seed_from_u64(13);
    let (mut session, view) = QuizSession::new(&pool(), &mut rng);
    session.submit_answer(&view.correct_answer).expect("submit");
    session.advance(&mut rng).expect("advance");
    assert_eq!(session.position(), 1);
    assert_eq!(session.score(), 1);

    let first = session.restart(&mut rng);
    assert_eq!(session.position(), 0);
    assert_eq!(session.score(), 0);
    assert_eq!(first.position, 0);
    assert_eq!(first.total, 5);
    assert_eq!(first.choices.len(), 4);
  }

  #[test]
  fn restart_leaves_the_finished_state() {
    let mut rng = StdRng::seed_from_u64(14);
    let cards = vec![Card::new("猫", "cat"), Card::new("狗", "dog")];
    let (mut session, view) = QuizSession::new(&cards, &mut rng);
    session.submit_answer(&view.correct_answer).expect("submit");
    session.advance(&mut rng).expect("advance");
    let StepView::Question(second) = session.current_step() else {
      panic!("second question expected");
    };
    session.submit_answer(&second.correct_answer).expect("submit");
    session.advance(&mut rng).expect("advance");
    assert!(session.is_finished());

    let first = session.restart(&mut rng);
    assert!(!session.is_finished());
    assert_eq!(first.position, 0);
    assert_eq!(session.total(), 2);
  }
}
