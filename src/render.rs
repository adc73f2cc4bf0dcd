//! Plain-text screens for the terminal dialogue.
//!
//! Every renderer writes to any `io::Write` so the screens can be checked in
//! tests without a terminal.

use std::io::{self, Write};

use dialoguer::console::style;

use crate::quiz::validate::{format_duration, is_correct};
use crate::quiz::{Question, QuizResult};

const HEADER_WIDTH: usize = 60;
const NO_NAME: &str = "—";

pub const TITLE: &str = "Code of Conduct & Ethics Quiz";
pub const DESCRIPTION: &str = "Reinforce your understanding of ethical standards, including \
conflicts of interest, data confidentiality, responsible use of technology, and reporting \
unethical behaviour.";

pub fn print_header_to<W: Write>(w: &mut W, title: &str) -> io::Result<()> {
    let border = "─".repeat(HEADER_WIDTH);
    writeln!(w, "┌{}┐", border)?;
    writeln!(w, "│ {:<width$} │", title, width = HEADER_WIDTH - 2)?;
    writeln!(w, "└{}┘", border)?;
    writeln!(w)
}

pub fn render_welcome_to<W: Write>(w: &mut W) -> io::Result<()> {
    print_header_to(w, TITLE)?;
    writeln!(w, "{}", DESCRIPTION)?;
    writeln!(w)
}

pub fn render_question_to<W: Write>(
    w: &mut W,
    position: usize,
    total: usize,
    question: &Question,
) -> io::Result<()> {
    writeln!(
        w,
        "\n{}",
        style(format!("Question {} of {}", position + 1, total)).bold()
    )?;
    writeln!(w, "{}", question.text)?;
    writeln!(w)
}

/// Shows every option with a mark: ✓ on the correct one, ✗ on a wrong pick.
pub fn render_feedback_to<W: Write>(
    w: &mut W,
    question: &Question,
    selected: usize,
    score: usize,
    answered: usize,
) -> io::Result<()> {
    for (idx, option) in question.options.iter().enumerate() {
        let mark = if idx == question.correct_index {
            style("✓").green().bold().to_string()
        } else if idx == selected {
            style("✗").red().bold().to_string()
        } else {
            " ".to_string()
        };
        writeln!(w, " {} {}", mark, option)?;
    }
    writeln!(w)?;

    if is_correct(selected, question.correct_index) {
        writeln!(w, "{}", style("Correct!").green())?;
    } else {
        writeln!(
            w,
            "{}",
            style("Incorrect. Review the correct answer above.").red()
        )?;
    }
    writeln!(w, "Score so far: {}/{}", score, answered)
}

pub fn render_result_to<W: Write>(w: &mut W, result: &QuizResult) -> io::Result<()> {
    print_header_to(w, "Results")?;
    writeln!(
        w,
        "Name:       {}",
        result.user_name.as_deref().unwrap_or(NO_NAME)
    )?;
    writeln!(
        w,
        "Score:      {}/{} ({:.0}%)",
        result.score,
        result.total_questions,
        result.percentage()
    )?;
    writeln!(w, "Time taken: {}", format_duration(result.time_taken))?;
    writeln!(w)
}

pub fn render_history_to<W: Write>(w: &mut W, results: &[QuizResult]) -> io::Result<()> {
    print_header_to(w, "Stored Results")?;
    if results.is_empty() {
        writeln!(w, "No results have been saved yet.")?;
        return writeln!(w);
    }

    writeln!(
        w,
        "{:<24} {:>8} {:<22} {:>9}",
        "Name", "Score", "Date", "Time"
    )?;
    writeln!(w, "{}", "─".repeat(66))?;
    for result in results {
        writeln!(
            w,
            "{:<24} {:>8} {:<22} {:>9}",
            result.user_name.as_deref().unwrap_or(NO_NAME),
            format!("{}/{}", result.score, result.total_questions),
            result.timestamp,
            format_duration(result.time_taken)
        )?;
    }
    writeln!(w)
}

pub fn render_notice_to<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(w, "{} {}", style("!").yellow().bold(), style(message).yellow())
}

pub fn render_error_to<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(w, "\n{} {}", style("✗").red().bold(), style(message).red())
}
