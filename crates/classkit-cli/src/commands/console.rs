//! Line-oriented prompt helpers shared by the interactive commands.
//!
//! Everything is generic over `BufRead`/`Write` so sessions can be driven
//! from tests with in-memory buffers.

use std::io::{self, BufRead, Write};

use classkit_core::input::Confirmation;

/// Read one line without its line ending. `None` on end of input.
pub fn read_line<I: BufRead>(input: &mut I) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Print `message` without a newline and read the reply.
pub fn prompt<I: BufRead, O: Write>(
    input: &mut I,
    out: &mut O,
    message: &str,
) -> io::Result<Option<String>> {
    write!(out, "{message}")?;
    out.flush()?;
    read_line(input)
}

/// Ask a yes/no question until the reply is one or the other.
/// `None` on end of input.
pub fn prompt_confirmation<I: BufRead, O: Write>(
    input: &mut I,
    out: &mut O,
    question: &str,
) -> io::Result<Option<Confirmation>> {
    loop {
        let Some(reply) = prompt(input, out, question)? else {
            return Ok(None);
        };
        if let Some(confirmation) = Confirmation::parse(&reply) {
            return Ok(Some(confirmation));
        }
        writeln!(out, "Please type 'yes' or 'no'.")?;
    }
}
