use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, QuizError>;
