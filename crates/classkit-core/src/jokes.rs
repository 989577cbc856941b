//! Joke source loading and two-phase reveal.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{ClasskitError, Result};

/// Separates a joke's setup from its punchline.
pub const DELIMITER: char = '?';

/// Phrase that starts a joke session on the console.
pub const TRIGGER_PHRASE: &str = "alexa tell me a joke";

/// A setup/punchline pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joke {
    setup: String,
    punchline: String,
}

impl Joke {
    /// Split `line` on the first [`DELIMITER`]. Returns `None` if the line
    /// has no delimiter.
    pub fn parse(line: &str) -> Option<Self> {
        let (setup, punchline) = line.trim().split_once(DELIMITER)?;
        Some(Self {
            setup: format!("{setup}{DELIMITER}"),
            punchline: punchline.trim().to_string(),
        })
    }

    /// The setup, ending with its question mark.
    pub fn setup(&self) -> &str {
        &self.setup
    }

    pub fn punchline(&self) -> &str {
        &self.punchline
    }

    /// Begin revealing this joke.
    pub fn reveal(&self) -> Reveal<'_> {
        Reveal {
            joke: self,
            phase: RevealPhase::Hidden,
        }
    }
}

/// The in-memory joke collection.
#[derive(Debug, Clone, Default)]
pub struct JokeBook {
    jokes: Vec<Joke>,
}

impl JokeBook {
    pub fn new(jokes: Vec<Joke>) -> Self {
        Self { jokes }
    }

    /// Build a collection from file contents, keeping only lines that
    /// contain the delimiter.
    pub fn parse(content: &str) -> Self {
        let jokes = content.lines().filter_map(Joke::parse).collect();
        Self { jokes }
    }

    /// Load jokes from `path`.
    ///
    /// An empty result is not an error; callers check [`JokeBook::is_empty`]
    /// before telling jokes.
    pub fn load_source(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ClasskitError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        let book = Self::parse(&content);
        tracing::debug!(path = %path.display(), jokes = book.len(), "loaded joke source");
        Ok(book)
    }

    /// Pick one joke uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Joke> {
        self.jokes.choose(rng)
    }

    pub fn len(&self) -> usize {
        self.jokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jokes.is_empty()
    }

    pub fn jokes(&self) -> &[Joke] {
        &self.jokes
    }
}

/// How much of a joke has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Hidden,
    SetupShown,
    PunchlineShown,
}

/// The visible part of a joke after a reveal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revealed<'a> {
    pub setup: &'a str,
    pub punchline: Option<&'a str>,
}

/// Two-phase reveal of one joke: setup first, punchline on the next step.
#[derive(Debug, Clone)]
pub struct Reveal<'a> {
    joke: &'a Joke,
    phase: RevealPhase,
}

impl<'a> Reveal<'a> {
    /// Advance the reveal and return what is now visible. Once the
    /// punchline is out, further calls return the same thing.
    pub fn advance(&mut self) -> Revealed<'a> {
        self.phase = match self.phase {
            RevealPhase::Hidden => RevealPhase::SetupShown,
            RevealPhase::SetupShown | RevealPhase::PunchlineShown => RevealPhase::PunchlineShown,
        };
        self.visible()
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    fn visible(&self) -> Revealed<'a> {
        let joke = self.joke;
        Revealed {
            setup: joke.setup(),
            punchline: (self.phase == RevealPhase::PunchlineShown).then(|| joke.punchline()),
        }
    }
}

/// What the user asked for at the console's top-level prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    TellJoke,
    Quit,
    Unrecognized,
}

impl ConsoleCommand {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        if normalized == TRIGGER_PHRASE {
            ConsoleCommand::TellJoke
        } else if normalized == "quit" {
            ConsoleCommand::Quit
        } else {
            ConsoleCommand::Unrecognized
        }
    }
}
