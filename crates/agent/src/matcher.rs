//! Best-match selection over the FAQ corpus.

use supportbot_core::FaqRecord;
use tracing::debug;

use crate::scorer::score;

pub use supportbot_config::DEFAULT_MATCH_THRESHOLD;

/// Picks the highest-scoring record, if it clears the threshold.
#[derive(Debug, Clone, Copy)]
pub struct FaqMatcher {
    threshold: f64,
}

impl FaqMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scan the whole corpus and return the best record whose score is
    /// strictly greater than the threshold. Ties keep the earlier record.
    /// `None` is the no-match outcome, not an error.
    pub fn find_match<'a>(&self, query: &str, corpus: &'a [FaqRecord]) -> Option<&'a FaqRecord> {
        let mut best: Option<(&FaqRecord, f64)> = None;

        for record in corpus {
            let s = score(query, record);
            if best.is_none_or(|(_, top)| s > top) {
                best = Some((record, s));
            }
        }

        let (record, best_score) = best?;
        debug!(score = best_score, threshold = self.threshold, "Best FAQ candidate");

        (best_score > self.threshold).then_some(record)
    }

    /// The matched record's answer, or `None`.
    pub fn find_answer<'a>(&self, query: &str, corpus: &'a [FaqRecord]) -> Option<&'a str> {
        self.find_match(query, corpus).map(|r| r.answer.as_str())
    }
}

impl Default for FaqMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}
