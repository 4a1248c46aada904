//! Relative complexity scoring.
//!
//! The score ranks files against each other by size and by the density of
//! a few structural indicators. It is not a cyclomatic complexity
//! measurement.
//!
//! score = min(lines / 10, 50) + 2 * indicator matches, capped at 100

use lazy_static::lazy_static;
use regex::Regex;

/// Highest possible score.
pub const MAX_SCORE: u8 = 100;

/// Cap on the size component of the score.
const MAX_SIZE_POINTS: usize = 50;

lazy_static! {
    /// Definitions, control flow, error handling, async and annotations.
    static ref INDICATORS: Vec<Regex> = vec![
        Regex::new(r"class\s+\w+").unwrap(),
        Regex::new(r"function\s+\w+").unwrap(),
        Regex::new(r"def\s+\w+").unwrap(),
        Regex::new(r"if\s*\(").unwrap(),
        Regex::new(r"for\s*\(").unwrap(),
        Regex::new(r"while\s*\(").unwrap(),
        Regex::new(r"try\s*\{").unwrap(),
        Regex::new(r"catch\s*\(").unwrap(),
        Regex::new(r"except\s*:").unwrap(),
        Regex::new(r"async\s+").unwrap(),
        Regex::new(r"await\s+").unwrap(),
        Regex::new(r"Promise").unwrap(),
        Regex::new(r"@\w+").unwrap(),
        Regex::new(r"#\[.*\]").unwrap(),
    ];
}

/// Number of lines: newlines plus one, or zero for empty content.
pub fn line_count(content: &str) -> usize {
    if content.is_empty() {
        0
    } else {
        content.matches('\n').count() + 1
    }
}

/// Total non-overlapping matches of every indicator.
pub fn indicator_matches(content: &str) -> usize {
    INDICATORS
        .iter()
        .map(|re| re.find_iter(content).count())
        .sum()
}

/// Score `content` in `0..=100`.
pub fn score(content: &str) -> u8 {
    let size_points = (line_count(content) / 10).min(MAX_SIZE_POINTS);
    let total = size_points.saturating_add(indicator_matches(content).saturating_mul(2));
    total.min(MAX_SCORE as usize) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content() {
        assert_eq!(line_count(""), 0);
        assert_eq!(score(""), 0);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count("a"), 1);
        assert_eq!(line_count("a\n"), 2);
        assert_eq!(line_count("a\nb\nc"), 3);
    }

    #[test]
    fn test_size_component_is_capped() {
        let content = "x\n".repeat(1000);
        assert_eq!(score(&content), 50);
    }

    #[test]
    fn test_indicators_add_two_each() {
        // 1 line, one def and one decorator
        assert_eq!(score("@cache def load(): pass"), 4);
    }

    #[test]
    fn test_score_is_capped() {
        let content = "if (x) {}\n".repeat(200);
        assert_eq!(score(&content), MAX_SCORE);
    }

    #[test]
    fn test_rust_attributes_count() {
        assert_eq!(indicator_matches("#[derive(Debug)]"), 1);
    }
}
