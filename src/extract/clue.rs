//! Clue cell parsing
//!
//! A clue cell holds three pieces of information:
//! - the value header (`td.clue_value` or `td.clue_value_daily_double`)
//! - the question text (`td.clue_text`)
//! - the correct response, embedded in the hover `div`'s `onmouseover`
//!   attribute as `<em class="correct_response">...</em>`

use crate::board::{Clue, ClueValue};
use crate::extract::ExtractError;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static CORRECT_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<em class="correct_response">(.+)</em>"#).expect("valid regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<.*?>|\\)").expect("valid regex"));

/// Removes markup tags and escaping backslashes, then trims whitespace
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").trim().to_string()
}

fn select_first<'a>(node: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    node.select(&selector).next()
}

/// Extracts the question text from a clue cell
///
/// Cells that also carry a hidden response cell (`id` ending in `_r`) are
/// skipped over so the response is never mistaken for the question.
pub fn parse_clue_question(clue_node: ElementRef<'_>) -> Option<String> {
    let selector = Selector::parse("td.clue_text").ok()?;

    let question_node = clue_node.select(&selector).find(|node| {
        !node
            .value()
            .attr("id")
            .is_some_and(|id| id.ends_with("_r"))
    })?;

    let question = strip_tags(&question_node.text().collect::<String>());
    (!question.is_empty()).then_some(question)
}

/// Extracts the correct response from a clue cell
///
/// The response normally lives inside the hover trigger's `onmouseover`
/// attribute. Newer pages render it as an inline `em.correct_response`
/// element instead, which is used as a fallback.
pub fn parse_clue_answer(clue_node: ElementRef<'_>) -> Option<String> {
    let from_hover = select_first(clue_node, "div[onmouseover]")
        .and_then(|div| div.value().attr("onmouseover"))
        .and_then(|attr| CORRECT_RESPONSE_RE.captures(attr))
        .and_then(|caps| caps.get(1))
        .map(|m| strip_tags(m.as_str()));

    let answer = match from_hover {
        Some(answer) if !answer.is_empty() => answer,
        _ => select_first(clue_node, "em.correct_response")
            .map(|em| strip_tags(&em.text().collect::<String>()))?,
    };

    (!answer.is_empty()).then_some(answer)
}

/// Extracts the value header of a clue cell
pub fn parse_clue_value(clue_node: ElementRef<'_>) -> Option<ClueValue> {
    if select_first(clue_node, "td.clue_value_daily_double").is_some() {
        return Some(ClueValue::DailyDouble);
    }

    select_first(clue_node, "td.clue_value")
        .and_then(|node| ClueValue::parse_amount(&node.text().collect::<String>()))
}

/// Builds a clue from a clue cell
///
/// # Errors
///
/// Returns `ExtractError::IncompleteClue` when either the question or the
/// answer is missing. A missing value is not an error.
pub fn serialize_clue(clue_node: ElementRef<'_>) -> Result<Clue, ExtractError> {
    let question =
        parse_clue_question(clue_node).ok_or(ExtractError::IncompleteClue { missing: "question" })?;
    let answer =
        parse_clue_answer(clue_node).ok_or(ExtractError::IncompleteClue { missing: "answer" })?;
    let value = parse_clue_value(clue_node);

    Clue::new(question, answer, value).ok_or(ExtractError::IncompleteClue {
        missing: "question or answer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::clue_cell;
    use scraper::Html;

    fn with_clue<T>(cell: &str, f: impl FnOnce(ElementRef<'_>) -> T) -> T {
        let html = format!("<table><tr>{}</tr></table>", cell);
        let document = Html::parse_fragment(&html);
        let selector = Selector::parse("td.clue").unwrap();
        let node = document.select(&selector).next().unwrap();
        f(node)
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<i>Newt</i> Gingrich"), "Newt Gingrich");
        assert_eq!(strip_tags(r"Ali\'s <b>lamp</b> "), "Ali's lamp");
        assert_eq!(strip_tags("<br />"), "");
    }

    #[test]
    fn test_parse_question() {
        let cell = clue_cell(
            "This Speaker of the House helped draft the \"Contract With America\"",
            "Newt Gingrich",
            "$200",
        );
        let question = with_clue(&cell, parse_clue_question);
        assert_eq!(
            question.as_deref(),
            Some("This Speaker of the House helped draft the \"Contract With America\"")
        );
    }

    #[test]
    fn test_parse_answer_from_hover() {
        let cell = clue_cell("question", "&lt;i&gt;Newt&lt;/i&gt; Gingrich", "$200");
        let answer = with_clue(&cell, parse_clue_answer);
        assert_eq!(answer.as_deref(), Some("Newt Gingrich"));
    }

    #[test]
    fn test_parse_answer_inline_fallback() {
        let cell = r#"<td class="clue"><table><tr><td class="clue_text" id="clue_J_1_1">Question</td></tr><tr><td class="clue_text" id="clue_J_1_1_r" style="display:none;"><em class="correct_response">Inline Answer</em></td></tr></table></td>"#;
        let (question, answer) = with_clue(cell, |node| {
            (parse_clue_question(node), parse_clue_answer(node))
        });
        assert_eq!(question.as_deref(), Some("Question"));
        assert_eq!(answer.as_deref(), Some("Inline Answer"));
    }

    #[test]
    fn test_parse_value() {
        let cell = clue_cell("q", "a", "$400");
        assert_eq!(with_clue(&cell, parse_clue_value), Some(ClueValue::Amount(400)));

        let daily_double = cell.replace("clue_value\"", "clue_value_daily_double\"");
        assert_eq!(
            with_clue(&daily_double, parse_clue_value),
            Some(ClueValue::DailyDouble)
        );
    }

    #[test]
    fn test_missing_answer_is_incomplete() {
        let cell = r#"<td class="clue"><table><tr><td class="clue_text">Only a question</td></tr></table></td>"#;
        let result = with_clue(cell, serialize_clue);
        assert_eq!(
            result,
            Err(ExtractError::IncompleteClue { missing: "answer" })
        );
    }

    #[test]
    fn test_empty_cell_is_incomplete() {
        let result = with_clue(r#"<td class="clue"></td>"#, serialize_clue);
        assert_eq!(
            result,
            Err(ExtractError::IncompleteClue { missing: "question" })
        );
    }

    #[test]
    fn test_complete_clue() {
        let cell = clue_cell("question", "answer", "$1,000");
        let clue = with_clue(&cell, serialize_clue).unwrap();
        assert_eq!(clue.question, "question");
        assert_eq!(clue.answer, "answer");
        assert_eq!(clue.value, Some(ClueValue::Amount(1000)));
    }
}
