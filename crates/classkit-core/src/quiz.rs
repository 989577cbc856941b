//! Arithmetic quiz engine.
//!
//! A [`QuizSession`] walks through ten addition/subtraction problems sized by
//! a [`Difficulty`] tier. Each question may be retried once: a first-try hit
//! is worth [`FIRST_TRY_POINTS`], a second-try hit [`RETRY_POINTS`], and a
//! second miss consumes the question for nothing.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{ClasskitError, Result};

/// Number of scored questions in one session.
pub const QUESTIONS_PER_SESSION: u32 = 10;
/// Points for answering correctly on the first attempt.
pub const FIRST_TRY_POINTS: u32 = 10;
/// Points for answering correctly on the retry.
pub const RETRY_POINTS: u32 = 5;

/// Difficulty tier, selecting how large the operands are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Moderate,
    Advanced,
}

impl Difficulty {
    /// All tiers in menu order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Moderate, Difficulty::Advanced];

    /// Inclusive range operands are drawn from.
    pub fn operand_range(self) -> RangeInclusive<i32> {
        match self {
            Difficulty::Easy => 0..=9,
            Difficulty::Moderate => 10..=99,
            Difficulty::Advanced => 1000..=9999,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Moderate => write!(f, "moderate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ClasskitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "moderate" | "2" => Ok(Difficulty::Moderate),
            "advanced" | "3" => Ok(Difficulty::Advanced),
            _ => Err(ClasskitError::invalid_input(
                s,
                "choose easy, moderate or advanced (1-3)",
            )),
        }
    }
}

/// Arithmetic operator of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
        }
    }

    pub fn apply(self, left: i32, right: i32) -> i32 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
        }
    }
}

/// A single quiz problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub left: i32,
    pub right: i32,
    pub operator: Operator,
}

impl Problem {
    pub fn new(left: i32, right: i32, operator: Operator) -> Self {
        Self {
            left,
            right,
            operator,
        }
    }

    /// The correct answer. Subtraction may be negative.
    pub fn answer(&self) -> i32 {
        self.operator.apply(self.left, self.right)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} =", self.left, self.operator.symbol(), self.right)
    }
}

/// Draw a problem for `difficulty`: both operands uniform over the tier's
/// range, operator uniform over `+` and `-`.
pub fn generate_problem<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Problem {
    let range = difficulty.operand_range();
    let left = rng.gen_range(range.clone());
    let right = rng.gen_range(range);
    let operator = if rng.gen_bool(0.5) {
        Operator::Add
    } else {
        Operator::Subtract
    };
    Problem::new(left, right, operator)
}

/// Final rank for a session score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizGrade {
    APlus,
    A,
    B,
    C,
    D,
}

impl fmt::Display for QuizGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuizGrade::APlus => "A+",
            QuizGrade::A => "A",
            QuizGrade::B => "B",
            QuizGrade::C => "C",
            QuizGrade::D => "D",
        };
        f.write_str(s)
    }
}

/// Map a final score to a rank.
///
/// A+ requires strictly more than 90; every other band is inclusive, so a
/// score of exactly 90 ranks A.
pub fn compute_grade(score: u32) -> QuizGrade {
    if score > 90 {
        QuizGrade::APlus
    } else if score >= 80 {
        QuizGrade::A
    } else if score >= 70 {
        QuizGrade::B
    } else if score >= 60 {
        QuizGrade::C
    } else {
        QuizGrade::D
    }
}

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for a difficulty choice.
    Menu,
    /// A problem is awaiting an answer.
    Problem,
    /// All questions are scored.
    Results,
}

/// What happened to a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Right answer; `points` were added to the score.
    Correct { points: u32 },
    /// Wrong on the first attempt; the same problem stays up for one retry.
    TryAgain,
    /// Wrong on the retry; the question is consumed with no points.
    Missed { correct_answer: i32 },
}

/// Score and rank of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub grade: QuizGrade,
}

/// State of one quiz run.
#[derive(Debug)]
pub struct QuizSession<R = StdRng> {
    rng: R,
    difficulty: Difficulty,
    score: u32,
    answered: u32,
    problem: Option<Problem>,
    retrying: bool,
    phase: QuizPhase,
}

impl QuizSession<StdRng> {
    /// A session seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A reproducible session.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for QuizSession<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            difficulty: Difficulty::default(),
            score: 0,
            answered: 0,
            problem: None,
            retrying: false,
            phase: QuizPhase::Menu,
        }
    }

    /// Start a fresh round at `difficulty` and return its first problem.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Problem {
        self.difficulty = difficulty;
        self.score = 0;
        self.answered = 0;
        self.retrying = false;
        self.phase = QuizPhase::Problem;
        let problem = generate_problem(difficulty, &mut self.rng);
        self.problem = Some(problem);
        tracing::debug!(%difficulty, "quiz started");
        problem
    }

    /// Check `raw` against the current problem.
    ///
    /// Text that is not a whole number is rejected with
    /// [`ClasskitError::InvalidInput`] and leaves the session untouched.
    pub fn submit_answer(&mut self, raw: &str) -> Result<AnswerOutcome> {
        let problem = match (self.phase, self.problem) {
            (QuizPhase::Problem, Some(problem)) => problem,
            _ => return Err(ClasskitError::NoActiveQuestion),
        };

        let answer: i32 = raw
            .trim()
            .parse()
            .map_err(|_| ClasskitError::invalid_input(raw, "please enter a valid number"))?;

        let correct_answer = problem.answer();
        let outcome = if answer == correct_answer {
            let points = if self.retrying {
                RETRY_POINTS
            } else {
                FIRST_TRY_POINTS
            };
            self.score += points;
            self.advance();
            AnswerOutcome::Correct { points }
        } else if !self.retrying {
            self.retrying = true;
            AnswerOutcome::TryAgain
        } else {
            self.advance();
            AnswerOutcome::Missed { correct_answer }
        };

        Ok(outcome)
    }

    fn advance(&mut self) {
        self.retrying = false;
        self.answered += 1;
        if self.answered >= QUESTIONS_PER_SESSION {
            self.problem = None;
            self.phase = QuizPhase::Results;
            tracing::debug!(score = self.score, "quiz finished");
        } else {
            self.problem = Some(generate_problem(self.difficulty, &mut self.rng));
        }
    }

    /// Go back to the difficulty menu, discarding any progress.
    pub fn replay(&mut self) {
        self.score = 0;
        self.answered = 0;
        self.problem = None;
        self.retrying = false;
        self.phase = QuizPhase::Menu;
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Questions consumed so far.
    pub fn answered(&self) -> u32 {
        self.answered
    }

    /// The problem awaiting an answer, if any.
    pub fn problem(&self) -> Option<&Problem> {
        self.problem.as_ref()
    }

    /// Whether the current problem already had one wrong answer.
    pub fn is_retrying(&self) -> bool {
        self.retrying
    }

    /// Score and rank once all questions are done.
    pub fn result(&self) -> Option<QuizResult> {
        (self.phase == QuizPhase::Results).then(|| QuizResult {
            score: self.score,
            grade: compute_grade(self.score),
        })
    }
}
