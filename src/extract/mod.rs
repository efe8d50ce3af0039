//! Page extraction for game pages
//!
//! This module turns the markup of one game page into a [`Board`]. Extraction
//! never fails as a whole; problems are contained at the smallest safe unit:
//!
//! - an incomplete clue is dropped from its category
//! - a category with no surviving clues is left off the board
//! - a round whose grid is not 6 categories by 30 clue cells is discarded
//!
//! Extraction is a pure function of the markup and holds no state between calls.

mod clue;
mod round;

pub use clue::{parse_clue_answer, parse_clue_question, parse_clue_value, strip_tags};
pub use round::{extract_round, CATEGORIES_PER_ROUND, CLUES_PER_CATEGORY, CLUES_PER_ROUND};

use crate::board::Board;
use scraper::{Html, Selector};
use thiserror::Error;

/// Recoverable extraction failures
///
/// These never escape [`extract_board`]; they are logged and the affected
/// unit is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Malformed round: expected 6 categories and 30 clues, found {categories} and {clues}")]
    MalformedRound { categories: usize, clues: usize },

    #[error("Incomplete clue: missing {missing}")]
    IncompleteClue { missing: &'static str },
}

/// Extracts every surviving round of a page into a single board
///
/// # Arguments
///
/// * `html` - The raw markup of a game page
///
/// # Returns
///
/// The union (by category title) of all well-formed rounds, categories in
/// page order. A page with no usable round yields an empty board.
///
/// # Example
///
/// ```
/// use jarchive_scraper::extract::extract_board;
///
/// let board = extract_board("<html><body>no rounds here</body></html>");
/// assert!(board.is_empty());
/// ```
pub fn extract_board(html: &str) -> Board {
    let mut board = Board::new();
    for fragment in extract_rounds(html) {
        board.merge(fragment);
    }
    board
}

/// Extracts each round of a page separately, in page order
///
/// Malformed rounds are skipped, so the result may hold fewer entries than
/// the page has round tables. Rounds that survive but contribute no category
/// are returned as empty boards.
pub fn extract_rounds(html: &str) -> Vec<Board> {
    let document = Html::parse_document(html);
    let Ok(round_selector) = Selector::parse("table.round") else {
        return Vec::new();
    };

    document
        .select(&round_selector)
        .enumerate()
        .filter_map(|(index, round)| match extract_round(round) {
            Ok(board) => Some(board),
            Err(e) => {
                tracing::warn!(round = index, "Skipping round: {}", e);
                None
            }
        })
        .collect()
}
