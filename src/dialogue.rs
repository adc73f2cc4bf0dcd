use std::io::{self, Write};

use dialoguer::{theme::ColorfulTheme, Input, Select};
use log::{error, info, warn};

use crate::quiz::validate::is_valid_selection;
use crate::quiz::{CsvRepository, QuizResult, QuizSession};
use crate::render;

pub type HandlerResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone, Default)]
pub enum State {
    #[default]
    Welcome,
    ReceiveName,
    Question {
        session: QuizSession,
        user_name: String,
    },
    Feedback {
        session: QuizSession,
        user_name: String,
        selected: usize,
    },
    Results(QuizResult),
    StoredResults,
    Exit,
}

const START_QUIZ: &str = "Start quiz";
const VIEW_RESULTS: &str = "View previous results";
const BACK_TO_START: &str = "Back to start";
const EXIT: &str = "Exit";
const NEXT_QUESTION: &str = "Next question";
const FINISH_QUIZ: &str = "Finish quiz";

const NO_QUESTIONS: &str = "No questions available. Please add questions to continue.";
const NO_SELECTION: &str = "Please select an answer before submitting.";

/// Drives the terminal screens until the user exits.
pub fn run(repo: &CsvRepository) -> HandlerResult {
    let theme = ColorfulTheme::default();
    let mut out = io::stdout();
    let mut state = State::default();

    loop {
        state = match state {
            State::Welcome => welcome(&theme, &mut out)?,
            State::ReceiveName => receive_name(&theme, &mut out, repo)?,
            State::Question { session, user_name } => {
                ask_question(&theme, &mut out, session, user_name)?
            }
            State::Feedback {
                session,
                user_name,
                selected,
            } => feedback(&theme, &mut out, session, user_name, selected)?,
            State::Results(result) => results(&theme, &mut out, repo, result)?,
            State::StoredResults => stored_results(&mut out, repo)?,
            State::Exit => return Ok(()),
        };
    }
}

fn welcome<W: Write>(theme: &ColorfulTheme, out: &mut W) -> HandlerResult<State> {
    render::render_welcome_to(out)?;

    let choices = [START_QUIZ, VIEW_RESULTS, EXIT];
    let choice = Select::with_theme(theme)
        .with_prompt("What would you like to do?")
        .items(&choices)
        .default(0)
        .interact_opt()?;

    Ok(match choice.map(|idx| choices[idx]) {
        Some(START_QUIZ) => State::ReceiveName,
        Some(VIEW_RESULTS) => State::StoredResults,
        _ => State::Exit,
    })
}

fn receive_name<W: Write>(
    theme: &ColorfulTheme,
    out: &mut W,
    repo: &CsvRepository,
) -> HandlerResult<State> {
    let name = Input::<String>::with_theme(theme)
        .with_prompt("Your name")
        .allow_empty(true)
        .interact_text()?;

    start_quiz(out, repo, &name)
}

/// Loads the question bank and opens a session, or returns to the welcome
/// screen when the bank has no usable questions.
pub fn start_quiz<W: Write>(out: &mut W, repo: &CsvRepository, name: &str) -> HandlerResult<State> {
    let questions = repo.load_questions()?;
    if questions.is_empty() {
        warn!(
            "No usable questions in {}",
            repo.questions_path().display()
        );
        render::render_notice_to(out, NO_QUESTIONS)?;
        return Ok(State::Welcome);
    }

    let user_name = name.trim().to_string();
    info!(
        "Starting quiz for {:?} with {} questions",
        user_name,
        questions.len()
    );

    let mut session = QuizSession::new(questions);
    session.start();
    Ok(State::Question { session, user_name })
}

fn ask_question<W: Write>(
    theme: &ColorfulTheme,
    out: &mut W,
    session: QuizSession,
    user_name: String,
) -> HandlerResult<State> {
    let Some(question) = session.current_question() else {
        return Ok(State::Welcome);
    };
    render::render_question_to(out, session.current_index(), session.len(), question)?;

    let selected = Select::with_theme(theme)
        .with_prompt("Your answer")
        .items(&question.options)
        .interact_opt()?;

    submit(out, session, user_name, selected)
}

/// Records a selection. A missing or out-of-range one keeps the user on the
/// same question.
pub fn submit<W: Write>(
    out: &mut W,
    mut session: QuizSession,
    user_name: String,
    selected: Option<usize>,
) -> HandlerResult<State> {
    let num_options = session
        .current_question()
        .map(|q| q.options.len())
        .unwrap_or_default();

    match selected {
        Some(selected) if is_valid_selection(Some(selected), num_options) => {
            session.submit_answer(selected);
            Ok(State::Feedback {
                session,
                user_name,
                selected,
            })
        }
        _ => {
            render::render_notice_to(out, NO_SELECTION)?;
            Ok(State::Question { session, user_name })
        }
    }
}

fn feedback<W: Write>(
    theme: &ColorfulTheme,
    out: &mut W,
    session: QuizSession,
    user_name: String,
    selected: usize,
) -> HandlerResult<State> {
    if let Some(question) = session.current_question() {
        render::render_feedback_to(
            out,
            question,
            selected,
            session.calculate_score(),
            session.answered_count(),
        )?;
    }

    let label = if session.is_last_question() {
        FINISH_QUIZ
    } else {
        NEXT_QUESTION
    };
    Select::with_theme(theme)
        .items(&[label])
        .default(0)
        .interact()?;

    Ok(advance(session, user_name))
}

/// Moves to the next question, or finishes the session after the last one.
pub fn advance(mut session: QuizSession, user_name: String) -> State {
    if session.next_question() {
        return State::Question { session, user_name };
    }

    let user_name = Some(user_name).filter(|name| !name.is_empty());
    let result = session.finish(user_name);
    info!(
        "Quiz finished: {}/{} in {:.2}s",
        result.score, result.total_questions, result.time_taken
    );
    State::Results(result)
}

fn results<W: Write>(
    theme: &ColorfulTheme,
    out: &mut W,
    repo: &CsvRepository,
    result: QuizResult,
) -> HandlerResult<State> {
    save_result(out, repo, &result)?;
    render::render_result_to(out, &result)?;

    let choices = [VIEW_RESULTS, BACK_TO_START, EXIT];
    let choice = Select::with_theme(theme)
        .items(&choices)
        .default(0)
        .interact_opt()?;

    Ok(match choice.map(|idx| choices[idx]) {
        Some(VIEW_RESULTS) => State::StoredResults,
        Some(BACK_TO_START) => State::Welcome,
        _ => State::Exit,
    })
}

/// Persists a finished attempt. A failed write is shown to the user and
/// does not stop the result from being displayed.
pub fn save_result<W: Write>(
    out: &mut W,
    repo: &CsvRepository,
    result: &QuizResult,
) -> io::Result<bool> {
    match repo.append_result(result) {
        Ok(()) => Ok(true),
        Err(err) => {
            error!("Could not save results: {}", err);
            render::render_error_to(out, &format!("Could not save results: {}", err))?;
            Ok(false)
        }
    }
}

fn stored_results<W: Write>(out: &mut W, repo: &CsvRepository) -> HandlerResult<State> {
    let results = repo.load_results()?;
    render::render_history_to(out, &results)?;
    Ok(State::Welcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Question;
    use std::fs;

    fn two_questions() -> Vec<Question> {
        vec![
            Question::new(
                "a".to_string(),
                "First?".to_string(),
                vec!["yes".to_string(), "no".to_string()],
                0,
            ),
            Question::new(
                "b".to_string(),
                "Second?".to_string(),
                vec!["yes".to_string(), "no".to_string()],
                1,
            ),
        ]
    }

    fn started() -> QuizSession {
        let mut session = QuizSession::new(two_questions());
        session.start();
        session
    }

    #[test]
    fn start_quiz_without_questions_returns_to_welcome() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CsvRepository::new(dir.path().join("q.csv"), dir.path().join("r.csv"));
        let mut out = Vec::new();

        let state = start_quiz(&mut out, &repo, "Ada").unwrap();
        assert!(matches!(state, State::Welcome));
        assert!(String::from_utf8(out).unwrap().contains(NO_QUESTIONS));
    }

    #[test]
    fn start_quiz_opens_active_session() {
        let dir = tempfile::tempdir().unwrap();
        let questions = dir.path().join("q.csv");
        fs::write(
            &questions,
            "id,text,choices,correct_index\nq1,Ready?,Yes||No,0\n",
        )
        .unwrap();
        let repo = CsvRepository::new(questions, dir.path().join("r.csv"));

        let state = start_quiz(&mut Vec::new(), &repo, "  Ada ").unwrap();
        match state {
            State::Question { session, user_name } => {
                assert_eq!(user_name, "Ada");
                assert!(session.is_active());
                assert_eq!(session.len(), 1);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn missing_selection_stays_on_question() {
        let mut out = Vec::new();
        let state = submit(&mut out, started(), "Ada".to_string(), None).unwrap();
        assert!(matches!(state, State::Question { .. }));
        assert!(String::from_utf8(out).unwrap().contains(NO_SELECTION));
    }

    #[test]
    fn cancelled_answer_repeats_the_same_question() {
        let mut session = started();
        session.next_question();

        let state = submit(&mut Vec::new(), session, "Ada".to_string(), None).unwrap();
        match state {
            State::Question { session, .. } => {
                assert_eq!(session.current_index(), 1);
                assert_eq!(session.answers(), &[None, None]);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn out_of_range_selection_stays_on_question() {
        let state = submit(&mut Vec::new(), started(), "Ada".to_string(), Some(7)).unwrap();
        match state {
            State::Question { session, .. } => assert_eq!(session.answered_count(), 0),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn valid_selection_moves_to_feedback() {
        let state = submit(&mut Vec::new(), started(), "Ada".to_string(), Some(0)).unwrap();
        match state {
            State::Feedback {
                session, selected, ..
            } => {
                assert_eq!(selected, 0);
                assert_eq!(session.calculate_score(), 1);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn advance_walks_to_results() {
        let mut session = started();
        session.submit_answer(0);

        let State::Question { mut session, user_name } = advance(session, "Ada".to_string()) else {
            panic!("expected the second question");
        };
        session.submit_answer(1);

        match advance(session, user_name) {
            State::Results(result) => {
                assert_eq!(result.score, 2);
                assert_eq!(result.total_questions, 2);
                assert_eq!(result.user_name.as_deref(), Some("Ada"));
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn advance_without_name_stores_none() {
        let mut session = QuizSession::new(two_questions()[..1].to_vec());
        session.start();

        match advance(session, String::new()) {
            State::Results(result) => assert_eq!(result.user_name, None),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn failed_save_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CsvRepository::new(dir.path().join("q.csv"), dir.path());
        let result = QuizResult::new(None, 1, 2, 3.0, String::new());
        let mut out = Vec::new();

        let saved = save_result(&mut out, &repo, &result).unwrap();
        assert!(!saved);
        assert!(String::from_utf8(out).unwrap().contains("Could not save results"));
    }

    #[test]
    fn successful_save_appends_row() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CsvRepository::new(dir.path().join("q.csv"), dir.path().join("r.csv"));
        let result = QuizResult::new(Some("Ada".to_string()), 1, 2, 3.0, String::new());

        assert!(save_result(&mut Vec::new(), &repo, &result).unwrap());
        assert_eq!(repo.load_results().unwrap(), vec![result]);
    }
}
