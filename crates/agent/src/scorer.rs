//! Lexical relevance scoring between a query and an FAQ record.
//!
//! Words are compared by substring containment in either direction, so
//! "pass" and "password" count as a match both ways. Weights:
//!
//! | Evidence                              | Weight |
//! |---------------------------------------|--------|
//! | query word ↔ question word            | 2.0    |
//! | keyword contained in the query        | 1.0    |
//! | query word ↔ answer word              | 0.5    |
//!
//! Nothing is stemmed or stripped; punctuation stays attached to its word.

use supportbot_core::FaqRecord;

const QUESTION_WEIGHT: f64 = 2.0;
const KEYWORD_WEIGHT: f64 = 1.0;
const ANSWER_WEIGHT: f64 = 0.5;

/// Score how relevant `record` is to `query`. Non-negative, unbounded,
/// deterministic.
pub fn score(query: &str, record: &FaqRecord) -> f64 {
    let query = query.to_lowercase();
    let query_words: Vec<&str> = query.split_whitespace().collect();

    let question = record.question.to_lowercase();
    let answer = record.answer.to_lowercase();

    let mut total = QUESTION_WEIGHT * overlapping_pairs(&query_words, &question) as f64;

    let keyword_hits = record
        .keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty() && query.contains(k.as_str()))
        .count();
    total += KEYWORD_WEIGHT * keyword_hits as f64;

    total += ANSWER_WEIGHT * overlapping_pairs(&query_words, &answer) as f64;
    total
}

/// Count (query word, text word) pairs where either contains the other.
fn overlapping_pairs(query_words: &[&str], text: &str) -> usize {
    let text_words: Vec<&str> = text.split_whitespace().collect();
    query_words
        .iter()
        .map(|q| {
            text_words
                .iter()
                .filter(|w| w.contains(q) || q.contains(*w))
                .count()
        })
        .sum()
}
