//! Round table parsing
//!
//! A well-formed round is a 6x5 grid: six category title cells followed by
//! thirty clue cells in row-major order. Clues are assigned to categories by
//! column, so the grid shape must be exact before any slicing happens.

use crate::board::{Board, Category};
use crate::extract::clue::serialize_clue;
use crate::extract::ExtractError;
use scraper::{ElementRef, Selector};

/// Number of category columns in a round
pub const CATEGORIES_PER_ROUND: usize = 6;

/// Number of clue rows in a round
pub const CLUES_PER_CATEGORY: usize = 5;

/// Number of clue cells in a well-formed round
pub const CLUES_PER_ROUND: usize = CATEGORIES_PER_ROUND * CLUES_PER_CATEGORY;

fn select_all<'a>(node: ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => node.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Extracts the categories of one round table
///
/// # Errors
///
/// Returns `ExtractError::MalformedRound` if the round does not contain
/// exactly 6 category title cells and 30 clue cells. Incomplete clues are
/// dropped individually and never fail the round.
pub fn extract_round(round: ElementRef<'_>) -> Result<Board, ExtractError> {
    let titles: Vec<String> = select_all(round, "td.category_name")
        .into_iter()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .collect();
    let clue_nodes = select_all(round, "td.clue");

    if titles.len() != CATEGORIES_PER_ROUND || clue_nodes.len() != CLUES_PER_ROUND {
        return Err(ExtractError::MalformedRound {
            categories: titles.len(),
            clues: clue_nodes.len(),
        });
    }

    let mut board = Board::new();
    for (index, title) in titles.into_iter().enumerate() {
        let clues = clue_nodes
            .iter()
            .skip(index)
            .step_by(CATEGORIES_PER_ROUND)
            .filter_map(|node| match serialize_clue(*node) {
                Ok(clue) => Some(clue),
                Err(e) => {
                    tracing::debug!(category = %title, "Dropping clue: {}", e);
                    None
                }
            })
            .collect();

        let category = Category::new(title, clues);
        if category.is_empty() {
            tracing::debug!(category = %category.title, "Omitting category with no complete clues");
            continue;
        }
        board.insert(category);
    }

    Ok(board)
}
