//! Categories and boards
//!
//! A board keeps its categories in the order they appear on the page.
//! Category titles are treated as unique within a page. When two rounds on
//! the same page carry the same title, the later category's clues replace the
//! earlier ones in place, so the title keeps its first position.

use crate::board::Clue;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::slice;
use std::vec;

/// A titled column of clues from one round
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Category {
    pub title: String,
    pub clues: Vec<Clue>,
}

impl Category {
    pub fn new(title: impl Into<String>, clues: Vec<Clue>) -> Self {
        Self {
            title: title.into(),
            clues,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clues.is_empty()
    }
}

/// Category title -> clues, aggregated from one page in page order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    categories: Vec<Category>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a category, replacing the clues of any category with the same title
    ///
    /// Empty categories are ignored. A replaced category keeps its position.
    /// Returns the replaced clue list, if any.
    pub fn insert(&mut self, category: Category) -> Option<Vec<Clue>> {
        if category.is_empty() {
            return None;
        }

        match self.position(&category.title) {
            Some(index) => {
                tracing::debug!(title = %category.title, "Category title collision, later category wins");
                Some(std::mem::replace(
                    &mut self.categories[index].clues,
                    category.clues,
                ))
            }
            None => {
                self.categories.push(category);
                None
            }
        }
    }

    /// Merges another board into this one, later titles overwriting earlier ones
    pub fn merge(&mut self, other: Board) {
        for category in other {
            self.insert(category);
        }
    }

    pub fn get(&self, title: &str) -> Option<&[Clue]> {
        self.position(title)
            .map(|index| self.categories[index].clues.as_slice())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.position(title).is_some()
    }

    /// Number of categories on the board
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of clues across every category
    pub fn clue_count(&self) -> usize {
        self.categories.iter().map(|c| c.clues.len()).sum()
    }

    /// Titles in page order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.title.as_str())
    }

    pub fn iter(&self) -> slice::Iter<'_, Category> {
        self.categories.iter()
    }

    // A page carries at most a dozen or so categories
    fn position(&self, title: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.title == title)
    }
}

/// Serializes as a JSON object of title -> clues, keys in page order
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.title, &category.clues)?;
        }
        map.end()
    }
}

impl IntoIterator for Board {
    type Item = Category;
    type IntoIter = vec::IntoIter<Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.into_iter()
    }
}

impl<'a> IntoIterator for &'a Board {
    type Item = &'a Category;
    type IntoIter = slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

impl FromIterator<Category> for Board {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut board = Board::new();
        for category in iter {
            board.insert(category);
        }
        board
    }
}
