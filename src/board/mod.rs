//! Board data model
//!
//! A board is the set of categories (and their clues) extracted from one game
//! page, merged across every round found on that page.
//!
//! # Components
//!
//! - `Clue`: a single question/answer pair with an optional dollar value
//! - `Category`: a titled, ordered list of clues from one column of a round
//! - `Board`: category title -> clues in page order, the unit handed to storage

mod category;
mod clue;

pub use category::{Board, Category};
pub use clue::{Clue, ClueValue};
