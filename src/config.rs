use std::path::PathBuf;

use crate::error::{QuizError, Result};

pub const DEFAULT_QUESTIONS_PATH: &str = "data/questions.csv";
pub const DEFAULT_RESULTS_PATH: &str = "data/results.csv";
pub const DEFAULT_CHOICE_SEPARATOR: &str = "||";

const QUESTIONS_PATH_VAR: &str = "QUIZ_QUESTIONS_PATH";
const RESULTS_PATH_VAR: &str = "QUIZ_RESULTS_PATH";
const CHOICE_SEPARATOR_VAR: &str = "QUIZ_CHOICE_SEPARATOR";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub questions_path: PathBuf,
    pub results_path: PathBuf,
    /// Splits the `choices` column into options. Must differ from the
    /// CSV field delimiter.
    pub choice_separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from(DEFAULT_QUESTIONS_PATH),
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
            choice_separator: DEFAULT_CHOICE_SEPARATOR.to_string(),
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv` first to pick up `.env`.
    /// The values are not checked here; call `validate` once every source
    /// has been merged.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(QUESTIONS_PATH_VAR) {
            config.questions_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(RESULTS_PATH_VAR) {
            config.results_path = PathBuf::from(path);
        }
        if let Some(separator) = lookup(CHOICE_SEPARATOR_VAR) {
            config.choice_separator = separator;
        }

        config
    }

    /// Replaces any value given on the command line.
    pub fn with_overrides(
        mut self,
        questions_path: Option<PathBuf>,
        results_path: Option<PathBuf>,
        choice_separator: Option<String>,
    ) -> Self {
        if let Some(path) = questions_path {
            self.questions_path = path;
        }
        if let Some(path) = results_path {
            self.results_path = path;
        }
        if let Some(separator) = choice_separator {
            self.choice_separator = separator;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.choice_separator.is_empty() {
            return Err(QuizError::Config(format!(
                "{} must not be empty",
                CHOICE_SEPARATOR_VAR
            )));
        }
        if self.choice_separator.contains(',') {
            return Err(QuizError::Config(format!(
                "{} must not contain the CSV delimiter ','",
                CHOICE_SEPARATOR_VAR
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = Config::from_lookup(lookup(&[]));
        assert!(config.validate().is_ok());
        assert_eq!(config, Config::default());
        assert_eq!(config.choice_separator, "||");
    }

    #[test]
    fn env_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("QUIZ_QUESTIONS_PATH", "/tmp/q.csv"),
            ("QUIZ_RESULTS_PATH", "/tmp/r.csv"),
            ("QUIZ_CHOICE_SEPARATOR", "##"),
        ]));
        assert_eq!(config.questions_path, PathBuf::from("/tmp/q.csv"));
        assert_eq!(config.results_path, PathBuf::from("/tmp/r.csv"));
        assert_eq!(config.choice_separator, "##");
    }

    #[test]
    fn empty_separator_is_rejected() {
        let err = Config::from_lookup(lookup(&[("QUIZ_CHOICE_SEPARATOR", "")]))
            .validate()
            .unwrap_err();
        assert!(matches!(err, QuizError::Config(_)));
    }

    #[test]
    fn comma_separator_is_rejected() {
        let err = Config::from_lookup(lookup(&[("QUIZ_CHOICE_SEPARATOR", ",")]))
            .validate()
            .unwrap_err();
        assert!(matches!(err, QuizError::Config(_)));
    }

    #[test]
    fn command_line_fixes_bad_env_separator() {
        let config = Config::from_lookup(lookup(&[
            ("QUIZ_QUESTIONS_PATH", "/tmp/q.csv"),
            ("QUIZ_CHOICE_SEPARATOR", ","),
        ]))
        .with_overrides(None, Some(PathBuf::from("/tmp/r.csv")), Some("##".to_string()));

        config.validate().unwrap();
        assert_eq!(config.questions_path, PathBuf::from("/tmp/q.csv"));
        assert_eq!(config.results_path, PathBuf::from("/tmp/r.csv"));
        assert_eq!(config.choice_separator, "##");
    }

    #[test]
    fn missing_overrides_keep_env_values() {
        let env = Config::from_lookup(lookup(&[("QUIZ_CHOICE_SEPARATOR", "##")]));
        assert_eq!(env.clone().with_overrides(None, None, None), env);
    }
}
