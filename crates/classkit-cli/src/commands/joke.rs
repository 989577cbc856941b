//! The `classkit joke` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use classkit_core::config::load_config_from;
use classkit_core::input::Confirmation;
use classkit_core::jokes::{ConsoleCommand, JokeBook};

use super::console::{prompt, prompt_confirmation};

pub fn execute(file: Option<PathBuf>, seed: Option<u64>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let path = file.unwrap_or(config.jokes_path);
    tracing::debug!(path = %path.display(), "loading jokes");

    let book = match JokeBook::load_source(&path) {
        Ok(book) => book,
        Err(e) => {
            eprintln!("Error: {e}");
            JokeBook::default()
        }
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&book, &mut rng, &mut stdin.lock(), &mut stdout.lock())
}

/// Wait for the trigger phrase, then tell jokes until the user says no.
pub fn run_session<R: Rng, I: BufRead, O: Write>(
    book: &JokeBook,
    rng: &mut R,
    input: &mut I,
    out: &mut O,
) -> Result<()> {
    if book.is_empty() {
        writeln!(out, "I guess you wanna have a bad day.. No jokes to tell, exiting.")?;
        return Ok(());
    }

    writeln!(out, "Type 'Alexa tell me a Joke', or 'quit'. Choose at your own risk.")?;

    loop {
        let Some(line) = prompt(input, out, "\nYou: ")? else {
            return Ok(());
        };
        match ConsoleCommand::parse(&line) {
            ConsoleCommand::TellJoke => return tell_jokes(book, rng, input, out),
            ConsoleCommand::Quit => {
                writeln!(out, "I guess you wanna have a bad day.. Bye!")?;
                return Ok(());
            }
            ConsoleCommand::Unrecognized => {
                writeln!(out, "Say 'Alexa tell me a Joke' to hear a joke, or 'quit' to exit.")?
            }
        }
    }
}

fn tell_jokes<R: Rng, I: BufRead, O: Write>(
    book: &JokeBook,
    rng: &mut R,
    input: &mut I,
    out: &mut O,
) -> Result<()> {
    while let Some(joke) = book.pick(rng) {
        let mut reveal = joke.reveal();

        let shown = reveal.advance();
        writeln!(out, "\n{}", shown.setup)?;
        if prompt(input, out, "Press Enter...")?.is_none() {
            return Ok(());
        }

        if let Some(punchline) = reveal.advance().punchline {
            writeln!(out, "{punchline}")?;
        }

        let again = prompt_confirmation(
            input,
            out,
            "\nHaving fun? Wanna hear another one? (yes/no): ",
        )?;
        if again != Some(Confirmation::Confirmed) {
            writeln!(out, "\nOkay then.. You can come back to me anytime.")?;
            return Ok(());
        }
    }

    Ok(())
}
