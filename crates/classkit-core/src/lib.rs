//! classkit-core: quiz engine, joke teller, and student record store.
//!
//! Each component is a plain owned value (`QuizSession`, `JokeBook`,
//! `StudentStore`) that a presentation layer drives. The core only touches
//! the filesystem through explicit load/save calls that take a path.

pub mod config;
pub mod error;
pub mod input;
pub mod jokes;
pub mod quiz;
pub mod store;
pub mod students;

pub use error::{ClasskitError, Result};
