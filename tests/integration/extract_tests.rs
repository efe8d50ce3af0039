//! Integration tests for game page extraction
//!
//! These tests drive the public extraction API with markup shaped like the
//! archive's game pages, including the irregularities seen in practice.

use jarchive_scraper::extract::{extract_board, extract_rounds, strip_tags};
use jarchive_scraper::ClueValue;

struct Cell {
    question: Option<String>,
    answer: Option<String>,
    value: String,
}

impl Cell {
    fn complete(round: &str, row: usize, col: usize) -> Self {
        Self {
            question: Some(format!("{round} question {row}-{col}")),
            answer: Some(format!("{round} answer {row}-{col}")),
            value: format!("${}", (row + 1) * 400),
        }
    }

    fn render(&self) -> String {
        let hover = match &self.answer {
            Some(answer) => format!(
                r#"<div onmouseover="toggle('clue', 'clue_stuck', '&lt;em class=&quot;correct_response&quot;&gt;{answer}&lt;/em&gt;')">"#
            ),
            None => "<div>".to_string(),
        };
        let value_class = if self.value.starts_with("DD:") {
            "clue_value_daily_double"
        } else {
            "clue_value"
        };
        let question = match &self.question {
            Some(q) => format!(r#"<td class="clue_text">{q}</td>"#),
            None => String::new(),
        };
        format!(
            r#"<td class="clue"><table><tr><td>{hover}<table><tr><td class="{value_class}">{value}</td></tr></table></div></td></tr><tr>{question}</tr></table></td>"#,
            value = self.value
        )
    }
}

fn round_markup(round: &str, titles: usize, cell: impl Fn(usize, usize) -> Cell) -> String {
    let titles: Vec<String> = (0..titles).map(|col| format!("{round} TITLE {col}")).collect();
    titled_round_markup(&titles, cell)
}

fn titled_round_markup(titles: &[String], cell: impl Fn(usize, usize) -> Cell) -> String {
    let mut html = String::from(r#"<table class="round"><tr>"#);
    for title in titles {
        html.push_str(&format!(
            r#"<td class="category"><table><tr><td class="category_name">{title}</td></tr></table></td>"#
        ));
    }
    html.push_str("</tr>");
    for row in 0..5 {
        html.push_str("<tr>");
        for col in 0..6 {
            html.push_str(&cell(row, col).render());
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

fn well_formed(round: &str) -> String {
    round_markup(round, 6, |row, col| Cell::complete(round, row, col))
}

fn page(rounds: &[String]) -> String {
    format!(
        r#"<html><body><div id="jeopardy_round">{}</div></body></html>"#,
        rounds.concat()
    )
}

#[test]
fn test_board_shape_for_well_formed_round() {
    let board = extract_board(&page(&[well_formed("J")]));

    assert_eq!(board.len(), 6);
    assert_eq!(board.clue_count(), 30);
    for category in &board {
        assert!(category.clues.len() <= 5);
    }
}

#[test]
fn test_clues_are_sliced_by_column() {
    let board = extract_board(&page(&[well_formed("J")]));
    let clues = board.get("J TITLE 2").expect("category present");

    let questions: Vec<&str> = clues.iter().map(|c| c.question.as_str()).collect();
    assert_eq!(
        questions,
        vec![
            "J question 0-2",
            "J question 1-2",
            "J question 2-2",
            "J question 3-2",
            "J question 4-2",
        ]
    );
    assert_eq!(clues[0].answer, "J answer 0-2");
    assert_eq!(clues[0].value, Some(ClueValue::Amount(400)));
    assert_eq!(clues[4].value, Some(ClueValue::Amount(2000)));
}

#[test]
fn test_categories_keep_page_order() {
    let titles = [
        "TREES",
        "LITERARY LINES",
        "A TIME FOR US",
        "ZOOLOGY",
        "MUSICALS",
        "BREADBOX",
    ];
    let owned: Vec<String> = titles.iter().map(|t| t.to_string()).collect();
    let round = titled_round_markup(&owned, |row, col| Cell::complete("J", row, col));

    let board = extract_board(&page(&[round]));

    assert_eq!(board.titles().collect::<Vec<_>>(), titles);
    assert_eq!(board.get("ZOOLOGY").unwrap()[0].question, "J question 0-3");
}

#[test]
fn test_second_round_follows_first() {
    let html = page(&[well_formed("J"), well_formed("DJ")]);
    let board = extract_board(&html);

    let titles: Vec<&str> = board.titles().collect();
    assert_eq!(titles[0], "J TITLE 0");
    assert_eq!(titles[5], "J TITLE 5");
    assert_eq!(titles[6], "DJ TITLE 0");
    assert_eq!(titles[11], "DJ TITLE 5");
}

#[test]
fn test_malformed_round_does_not_affect_sibling() {
    let five_titles = round_markup("BAD", 5, |row, col| Cell::complete("BAD", row, col));
    let html = page(&[five_titles, well_formed("DJ")]);

    let board = extract_board(&html);
    assert_eq!(board.len(), 6);
    assert!(board.titles().all(|t| t.starts_with("DJ ")));
    assert_eq!(extract_rounds(&html).len(), 1);
}

#[test]
fn test_missing_answer_drops_only_that_clue() {
    let round = round_markup("J", 6, |row, col| {
        let mut cell = Cell::complete("J", row, col);
        if col == 0 && row == 3 {
            cell.answer = None;
        }
        if col == 1 {
            cell.question = None;
        }
        cell
    });
    let board = extract_board(&page(&[round]));

    assert_eq!(board.get("J TITLE 0").map(|c| c.len()), Some(4));
    assert!(!board.contains("J TITLE 1"));
    assert_eq!(board.len(), 5);
    assert_eq!(board.clue_count(), 24);
}

#[test]
fn test_daily_double_value() {
    let round = round_markup("J", 6, |row, col| {
        let mut cell = Cell::complete("J", row, col);
        if row == 2 && col == 4 {
            cell.value = "DD: $1,500".to_string();
        }
        cell
    });
    let board = extract_board(&page(&[round]));

    let clues = board.get("J TITLE 4").unwrap();
    assert_eq!(clues[2].value, Some(ClueValue::DailyDouble));
    assert_eq!(clues[1].value, Some(ClueValue::Amount(800)));
}

#[test]
fn test_markup_inside_answers_is_stripped() {
    let round = round_markup("J", 6, |row, col| {
        let mut cell = Cell::complete("J", row, col);
        if row == 0 && col == 0 {
            cell.answer = Some("&lt;i&gt;Moby-Dick&lt;/i&gt;".to_string());
        }
        cell
    });
    let board = extract_board(&page(&[round]));

    assert_eq!(board.get("J TITLE 0").unwrap()[0].answer, "Moby-Dick");
}

#[test]
fn test_strip_tags_removes_escapes() {
    assert_eq!(
        strip_tags(r#"  <i>the \"Iliad\"</i> "#),
        r#"the "Iliad""#
    );
}

#[test]
fn test_extraction_is_repeatable() {
    let html = page(&[well_formed("J"), well_formed("DJ")]);
    let first = extract_board(&html);
    let second = extract_board(&html);

    assert_eq!(first, second);
    assert_eq!(first.len(), 12);
}

#[test]
fn test_page_without_rounds() {
    assert!(extract_board("<html><body><h1>Not found</h1></body></html>").is_empty());
    assert!(extract_board("").is_empty());
}
