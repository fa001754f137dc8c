//! Heuristic judgment of whether text looks like a database query.

use std::sync::LazyLock;

use regex::Regex;

/// Keywords scanned for, in their conventional uppercase forms.
pub const QUERY_KEYWORDS: [&str; 20] = [
    "SELECT",
    "FROM",
    "WHERE",
    "UPDATE",
    "INSERT",
    "DELETE",
    "JOIN",
    "GROUP BY",
    "ORDER BY",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "UNION",
    "CREATE",
    "ALTER",
    "DROP",
    "TRUNCATE",
    "EXPLAIN",
    "WITH",
    "INNER JOIN",
];

static KEYWORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"\b(?:{})\b", QUERY_KEYWORDS.join("|"));
    Regex::new(&pattern).expect("keyword pattern is valid")
});

/// Returns true when any keyword appears as a whole word or phrase.
///
/// Matching is bounded at word edges and case-sensitive on the uppercase
/// keyword forms: `SELECT` in a query matches, while the prose word
/// "select" and fragments like "selectively" do not. Lowercase queries fall
/// through to the extractor instead, which keeps prose from ever
/// misclassifying as executable.
///
/// This is a heuristic, not a parser: it validates nothing about syntax or
/// semantics, and an uppercase keyword mention inside prose still counts.
pub fn is_query(text: &str) -> bool {
    KEYWORD_PATTERN.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_text_matches() {
        assert!(is_query("SELECT * FROM orders WHERE id = 1"));
        assert!(is_query("EXPLAIN my_table"));
        assert!(is_query("GROUP BY region"));
        assert!(is_query("WITH totals AS (SELECT 1) SELECT * FROM totals"));
    }

    #[test]
    fn lowercase_prose_does_not_match() {
        assert!(!is_query("please select a good restaurant"));
        assert!(!is_query("we join forces and create order from chaos"));
    }

    #[test]
    fn keywords_match_whole_words_only() {
        assert!(!is_query("SELECTIVELY chosen"));
        assert!(!is_query("selectively"));
        assert!(!is_query("UNIONIZED workers"));
    }

    #[test]
    fn uppercase_mention_inside_prose_still_counts() {
        // Documented heuristic behavior, not a defect.
        assert!(is_query("never DROP the production table"));
    }

    #[test]
    fn empty_text_is_not_a_query() {
        assert!(!is_query(""));
    }
}
