//! The `classkit quiz` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use classkit_core::config::load_config_from;
use classkit_core::input::Confirmation;
use classkit_core::quiz::{AnswerOutcome, Difficulty, QuizPhase, QuizSession, QUESTIONS_PER_SESSION};

use super::console::{prompt, prompt_confirmation};

pub fn execute(
    difficulty: Option<String>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let difficulty = difficulty
        .map(|d| d.parse::<Difficulty>())
        .transpose()?
        .or(config.default_difficulty);

    tracing::debug!(?difficulty, ?seed, "starting quiz");

    let session = match seed {
        Some(seed) => QuizSession::seeded(seed),
        None => QuizSession::new(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(session, difficulty, &mut stdin.lock(), &mut stdout.lock())
}

/// Drive a full quiz over `input`/`out`: menu, ten questions, results,
/// play-again prompt. `preset` skips the menu for the first round only.
pub fn run_session<I: BufRead, O: Write>(
    mut session: QuizSession,
    preset: Option<Difficulty>,
    input: &mut I,
    out: &mut O,
) -> Result<()> {
    let mut preset = preset;

    loop {
        let difficulty = match preset.take() {
            Some(difficulty) => difficulty,
            None => match choose_difficulty(input, out)? {
                Some(difficulty) => difficulty,
                None => return Ok(()),
            },
        };

        session.select_difficulty(difficulty);
        writeln!(out, "\nDifficulty: {difficulty}")?;

        if !play_round(&mut session, input, out)? {
            writeln!(out, "\nGoodbye!")?;
            return Ok(());
        }

        if let Some(result) = session.result() {
            writeln!(out, "\nFinal Score: {}/100", result.score)?;
            writeln!(out, "Rank: {}", result.grade)?;
        }

        match prompt_confirmation(input, out, "\nPlay again? (yes/no): ")? {
            Some(Confirmation::Confirmed) => session.replay(),
            _ => {
                writeln!(out, "Thanks for playing!")?;
                return Ok(());
            }
        }
    }
}

fn choose_difficulty<I: BufRead, O: Write>(input: &mut I, out: &mut O) -> Result<Option<Difficulty>> {
    writeln!(out, "\nDIFFICULTY LEVEL")?;
    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        writeln!(out, "  {}) {difficulty}", i + 1)?;
    }

    loop {
        let Some(choice) = prompt(input, out, "Choose 1-3: ")? else {
            return Ok(None);
        };
        match choice.parse::<Difficulty>() {
            Ok(difficulty) => return Ok(Some(difficulty)),
            Err(_) => writeln!(out, "Please choose easy, moderate or advanced.")?,
        }
    }
}

/// Ask questions until the session reaches its results. Returns `false` if
/// input ran out first.
fn play_round<I: BufRead, O: Write>(
    session: &mut QuizSession,
    input: &mut I,
    out: &mut O,
) -> Result<bool> {
    while session.phase() == QuizPhase::Problem {
        let Some(problem) = session.problem().copied() else {
            break;
        };

        let question = format!(
            "\nQuestion {}/{QUESTIONS_PER_SESSION}: {problem} ",
            session.answered() + 1
        );
        let Some(answer) = prompt(input, out, &question)? else {
            return Ok(false);
        };

        match session.submit_answer(&answer) {
            Ok(AnswerOutcome::Correct { points }) => writeln!(out, "Correct! Well done. (+{points})")?,
            Ok(AnswerOutcome::TryAgain) => writeln!(out, "Incorrect. Try again!")?,
            Ok(AnswerOutcome::Missed { correct_answer }) => {
                writeln!(out, "Wrong! The correct answer is {correct_answer}.")?
            }
            Err(e) if e.is_recoverable() => writeln!(out, "Please enter a valid number.")?,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(true)
}
