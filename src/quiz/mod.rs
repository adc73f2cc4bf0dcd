pub mod repository;
pub mod session;
pub mod validate;

pub use repository::CsvRepository;
pub use session::{QuizSession, SessionState};

/// One multiple-choice item from the question bank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

impl Question {
    pub fn new(id: String, text: String, options: Vec<String>, correct_index: usize) -> Self {
        Self {
            id,
            text,
            options,
            correct_index,
            category: None,
            difficulty: None,
        }
    }

    /// A question is usable when it has a prompt, at least two options and
    /// a correct index that points at one of them.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty()
            && self.options.len() >= 2
            && self.correct_index < self.options.len()
    }
}

/// Outcome of one completed quiz run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizResult {
    pub user_name: Option<String>,
    pub score: usize,
    pub total_questions: usize,
    pub time_taken: f64,
    pub timestamp: String,
}

impl QuizResult {
    pub fn new(
        user_name: Option<String>,
        score: usize,
        total_questions: usize,
        time_taken: f64,
        timestamp: String,
    ) -> Self {
        Self {
            // An empty name means the user skipped the name prompt
            user_name: user_name.filter(|name| !name.is_empty()),
            score,
            total_questions,
            time_taken,
            timestamp,
        }
    }

    pub fn to_row(&self) -> ResultRow<'_> {
        ResultRow {
            user_name: self.user_name.as_deref().unwrap_or(""),
            score: self.score,
            total_questions: self.total_questions,
            time_taken: self.time_taken,
            timestamp: &self.timestamp,
        }
    }

    /// Share of correct answers, 0 for an empty quiz.
    pub fn percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.score as f64 * 100.0 / self.total_questions as f64
    }
}

/// Column layout of one line in the results file.
#[derive(Debug, PartialEq, serde::Serialize)]
pub struct ResultRow<'a> {
    pub user_name: &'a str,
    pub score: usize,
    pub total_questions: usize,
    pub time_taken: f64,
    pub timestamp: &'a str,
}
