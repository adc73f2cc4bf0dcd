use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, info};

use crate::config::{Config, DEFAULT_CHOICE_SEPARATOR};
use crate::error::Result;
use crate::quiz::{Question, QuizResult};

pub const RESULT_COLUMNS: [&str; 5] = [
    "user_name",
    "score",
    "total_questions",
    "time_taken",
    "timestamp",
];

/// Reads the question bank and keeps the results log, both as CSV files.
///
/// Missing files read as empty. Rows that cannot be turned into a record
/// are dropped without being reported, and the rest of the file is still
/// read. Appends take no lock, so two processes writing the same results
/// file at once may interleave.
#[derive(Debug, Clone)]
pub struct CsvRepository {
    questions_path: PathBuf,
    results_path: PathBuf,
    choice_separator: String,
}

impl CsvRepository {
    pub fn new(questions_path: impl Into<PathBuf>, results_path: impl Into<PathBuf>) -> Self {
        Self {
            questions_path: questions_path.into(),
            results_path: results_path.into(),
            choice_separator: DEFAULT_CHOICE_SEPARATOR.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.questions_path, &config.results_path)
            .with_choice_separator(config.choice_separator.clone())
    }

    pub fn with_choice_separator(mut self, separator: impl Into<String>) -> Self {
        self.choice_separator = separator.into();
        self
    }

    pub fn questions_path(&self) -> &Path {
        &self.questions_path
    }

    pub fn results_path(&self) -> &Path {
        &self.results_path
    }

    /// Loads every valid question in file order.
    pub fn load_questions(&self) -> Result<Vec<Question>> {
        let Some(mut reader) = open_reader(&self.questions_path)? else {
            debug!("No question file at {}", self.questions_path.display());
            return Ok(Vec::new());
        };
        let columns = Columns::new(reader.headers()?);

        let mut questions = Vec::new();
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(_) => continue,
            };
            // Unparsable and invalid rows are skipped on purpose, not reported.
            if let Some(question) = self
                .parse_question(&columns, &record)
                .filter(Question::is_valid)
            {
                questions.push(question);
            }
        }

        debug!(
            "Loaded {} questions from {}",
            questions.len(),
            self.questions_path.display()
        );
        Ok(questions)
    }

    fn parse_question(&self, columns: &Columns, record: &StringRecord) -> Option<Question> {
        let options = columns
            .get(record, "choices")
            .map(|choices| {
                choices
                    .split(self.choice_separator.as_str())
                    .filter(|choice| !choice.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let correct_index = columns.get(record, "correct_index")?.trim().parse().ok()?;

        Some(Question {
            id: columns.get(record, "id").unwrap_or_default().to_string(),
            text: columns.get(record, "text").unwrap_or_default().to_string(),
            options,
            correct_index,
            category: columns.optional(record, "category"),
            difficulty: columns.optional(record, "difficulty"),
        })
    }

    /// Appends one row to the results file, writing the header first if the
    /// file does not exist yet.
    pub fn append_result(&self, result: &QuizResult) -> Result<()> {
        if let Some(parent) = self
            .results_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }
        self.ensure_results_header()?;

        let file = OpenOptions::new().append(true).open(&self.results_path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(result.to_row())?;
        writer.flush()?;

        info!(
            "Saved result {}/{} to {}",
            result.score,
            result.total_questions,
            self.results_path.display()
        );
        Ok(())
    }

    fn ensure_results_header(&self) -> Result<()> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.results_path)
        {
            Ok(file) => {
                let mut writer = WriterBuilder::new().from_writer(file);
                writer.write_record(RESULT_COLUMNS)?;
                writer.flush()?;
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Loads all stored results in file order.
    pub fn load_results(&self) -> Result<Vec<QuizResult>> {
        let Some(mut reader) = open_reader(&self.results_path)? else {
            return Ok(Vec::new());
        };
        let columns = Columns::new(reader.headers()?);

        let mut results = Vec::new();
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(_) => continue,
            };
            // Same contract as questions: a row with bad numbers is dropped.
            if let Some(result) = parse_result(&columns, &record) {
                results.push(result);
            }
        }

        debug!(
            "Loaded {} results from {}",
            results.len(),
            self.results_path.display()
        );
        Ok(results)
    }
}

fn parse_result(columns: &Columns, record: &StringRecord) -> Option<QuizResult> {
    Some(QuizResult::new(
        columns.optional(record, "user_name"),
        columns.parse_or(record, "score", 0)?,
        columns.parse_or(record, "total_questions", 0)?,
        columns.parse_or(record, "time_taken", 0.0)?,
        columns.get(record, "timestamp").unwrap_or_default().to_string(),
    ))
}

fn open_reader(path: &Path) -> Result<Option<csv::Reader<File>>> {
    match File::open(path) {
        Ok(file) => Ok(Some(ReaderBuilder::new().flexible(true).from_reader(file))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Header names of a CSV file, so fields are found by name rather than position.
struct Columns {
    names: Vec<String>,
}

impl Columns {
    fn new(headers: &StringRecord) -> Self {
        let names = headers
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').to_string())
            .collect();
        Self { names }
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|column| column == name)
    }

    /// `None` when the column is missing from the header or the row is short.
    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        record.get(self.index(name)?)
    }

    fn optional(&self, record: &StringRecord, name: &str) -> Option<String> {
        self.get(record, name)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Falls back to `default` only when the header lacks the column. A
    /// present but empty or malformed value yields `None`.
    fn parse_or<T: FromStr>(&self, record: &StringRecord, name: &str, default: T) -> Option<T> {
        match self.index(name) {
            None => Some(default),
            Some(idx) => record.get(idx)?.trim().parse().ok(),
        }
    }
}
