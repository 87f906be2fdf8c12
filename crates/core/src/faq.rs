//! FAQ record: one question/answer pair from the static corpus.
//!
//! Records are immutable after load. A record's identity is its position in
//! the corpus; duplicate question text is allowed.

use serde::{Deserialize, Deserializer, Serialize};

/// A single FAQ entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqRecord {
    /// The canonical question text
    pub question: String,

    /// The canned answer returned on a match
    pub answer: String,

    /// Extra match terms. Accepts either a list or a single
    /// whitespace/comma separated string; absent means empty.
    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Vec<String>,
}

impl FaqRecord {
    /// Create a record without keywords.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            keywords: Vec::new(),
        }
    }

    /// Attach keywords (builder style).
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordsField {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let field = Option::<KeywordsField>::deserialize(deserializer)?;
    Ok(match field {
        None => Vec::new(),
        Some(KeywordsField::List(list)) => list,
        Some(KeywordsField::Joined(joined)) => joined
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect(),
    })
}
