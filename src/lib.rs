pub mod config;
pub mod dialogue;
pub mod error;
pub mod quiz;
pub mod render;

pub use config::Config;
pub use error::QuizError;
