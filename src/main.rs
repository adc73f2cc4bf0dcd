use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use conduct_quiz::dialogue::{self, HandlerResult};
use conduct_quiz::quiz::CsvRepository;
use conduct_quiz::{render, Config};
use dotenv::dotenv;
use log::{error, info};

/// Multiple-choice compliance quiz for the terminal.
#[derive(Debug, Parser)]
#[command(name = "conduct-quiz", version)]
struct Cli {
    /// Question bank (overrides QUIZ_QUESTIONS_PATH)
    #[arg(long, global = true)]
    questions: Option<PathBuf>,

    /// Results log (overrides QUIZ_RESULTS_PATH)
    #[arg(long, global = true)]
    results: Option<PathBuf>,

    /// Separator between options in the `choices` column (overrides QUIZ_CHOICE_SEPARATOR)
    #[arg(long, global = true)]
    separator: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Take the quiz (default)
    Run,
    /// Print all stored results
    History,
    /// Count the valid questions in the question bank
    Check,
}

fn main() {
    // .env is optional
    dotenv().ok();
    pretty_env_logger::init();

    if let Err(err) = run(Cli::parse()) {
        error!("{}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> HandlerResult {
    let config = Config::from_env().with_overrides(cli.questions, cli.results, cli.separator);
    config.validate()?;

    let repo = CsvRepository::from_config(&config);
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            info!("Starting quiz...");
            dialogue::run(&repo)
        }
        Command::History => {
            let results = repo.load_results()?;
            render::render_history_to(&mut io::stdout(), &results)?;
            Ok(())
        }
        Command::Check => {
            let questions = repo.load_questions()?;
            println!(
                "{} valid questions in {}",
                questions.len(),
                config.questions_path.display()
            );
            Ok(())
        }
    }
}
