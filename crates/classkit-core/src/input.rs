//! Parsing helpers for raw text typed by the user.

use crate::error::{ClasskitError, Result};

/// Answer to a yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// Parse a yes/no answer. Returns `None` for anything else so the caller
    /// can ask again.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "yes" | "y" => Some(Confirmation::Confirmed),
            "no" | "n" => Some(Confirmation::Declined),
            _ => None,
        }
    }

    pub fn is_confirmed(self) -> bool {
        self == Confirmation::Confirmed
    }
}

/// Parse a mark for `field`, accepting whole numbers in `0..=max`.
///
/// Non-numeric text is an [`ClasskitError::InvalidInput`]; a number outside
/// the range (negative included) is a [`ClasskitError::Validation`].
pub fn parse_mark(field: &str, raw: &str, max: u32) -> Result<u32> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ClasskitError::invalid_input(raw, format!("{field} must be a whole number")))?;

    if value < 0 || value > i64::from(max) {
        return Err(ClasskitError::Validation(format!(
            "{field} must be between 0 and {max}, got {value}"
        )));
    }

    Ok(value as u32)
}
