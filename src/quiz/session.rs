use chrono::{DateTime, Utc};

use crate::quiz::{Question, QuizResult};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    NotStarted,
    Active,
    Finished,
}

/// One linear pass through a fixed list of questions.
///
/// Answers are kept per question; a slot that was never submitted stays
/// `None` and counts as incorrect.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    user_answers: Vec<Option<usize>>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    state: SessionState,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        let user_answers = vec![None; questions.len()];
        Self {
            questions,
            current_index: 0,
            user_answers,
            start_time: None,
            end_time: None,
            state: SessionState::NotStarted,
        }
    }

    pub fn start(&mut self) {
        self.start_at(Utc::now());
    }

    /// Resets progress and answers and starts the clock at `now`.
    pub fn start_at(&mut self, now: DateTime<Utc>) {
        self.current_index = 0;
        self.user_answers = vec![None; self.questions.len()];
        self.start_time = Some(now);
        self.end_time = None;
        self.state = SessionState::Active;
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Records `selected` for the current question. Resubmitting overwrites.
    /// The index is not checked against the option count here.
    pub fn submit_answer(&mut self, selected: usize) {
        if let Some(slot) = self.user_answers.get_mut(self.current_index) {
            *slot = Some(selected);
        }
    }

    /// Moves to the next question. Returns `false` on the last one.
    pub fn next_question(&mut self) -> bool {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            return true;
        }
        false
    }

    pub fn calculate_score(&self) -> usize {
        self.user_answers
            .iter()
            .zip(&self.questions)
            .filter(|(answer, question)| **answer == Some(question.correct_index))
            .count()
    }

    pub fn finish(&mut self, user_name: Option<String>) -> QuizResult {
        self.finish_at(user_name, Utc::now())
    }

    pub fn finish_at(&mut self, user_name: Option<String>, now: DateTime<Utc>) -> QuizResult {
        self.end_time = Some(now);
        self.state = SessionState::Finished;

        let time_taken = match self.start_time {
            Some(start) => round_seconds(now - start),
            None => 0.0,
        };

        QuizResult::new(
            user_name,
            self.calculate_score(),
            self.questions.len(),
            time_taken,
            now.format(TIMESTAMP_FORMAT).to_string(),
        )
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.user_answers
    }

    pub fn answered_count(&self) -> usize {
        self.user_answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }
}

// Seconds with two decimals, never negative.
fn round_seconds(elapsed: chrono::Duration) -> f64 {
    let seconds = elapsed.num_milliseconds().max(0) as f64 / 1000.0;
    (seconds * 100.0).round() / 100.0
}
