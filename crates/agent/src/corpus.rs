//! FAQ corpus loading.
//!
//! The dataset is read once per process. Two formats are accepted, chosen
//! by file extension:
//!
//! - `.json`: a top-level array of `{question, answer, keywords?}` objects
//! - `.toml`: repeated `[[faqs]]` tables with the same fields

use serde::Deserialize;
use std::path::Path;
use supportbot_core::FaqRecord;
use supportbot_core::error::CorpusError;
use tracing::{info, warn};

/// The ordered, immutable set of FAQ records. A record's identity is its
/// position.
#[derive(Debug, Clone, Default)]
pub struct FaqCorpus {
    records: Vec<FaqRecord>,
}

impl FaqCorpus {
    pub fn new(records: Vec<FaqRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FaqRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load from `path`, degrading to an empty corpus on any failure.
    /// An empty corpus is valid input to the matcher; every query falls
    /// through to the AI.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match load_corpus(path.as_ref()) {
            Ok(corpus) => corpus,
            Err(e) => {
                warn!(error = %e, "FAQ dataset unavailable, continuing with an empty corpus");
                Self::default()
            }
        }
    }
}

impl From<Vec<FaqRecord>> for FaqCorpus {
    fn from(records: Vec<FaqRecord>) -> Self {
        Self::new(records)
    }
}

enum Format {
    Json,
    Toml,
}

#[derive(Deserialize)]
struct TomlDataset {
    #[serde(default)]
    faqs: Vec<FaqRecord>,
}

/// Read and parse the dataset at `path`.
pub fn load_corpus(path: &Path) -> Result<FaqCorpus, CorpusError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let format = match extension.as_deref() {
        Some("json") => Format::Json,
        Some("toml") => Format::Toml,
        _ => return Err(CorpusError::UnsupportedFormat(path.to_path_buf())),
    };

    let content = std::fs::read_to_string(path).map_err(|e| CorpusError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let parsed = match format {
        Format::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str::<TomlDataset>(&content)
            .map(|d| d.faqs)
            .map_err(|e| e.to_string()),
    };
    let records: Vec<FaqRecord> = parsed.map_err(|reason| CorpusError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    info!(path = %path.display(), count = records.len(), "Loaded FAQ dataset");
    Ok(FaqCorpus::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_json_array() {
        let file = write_temp(
            ".json",
            r#"[
                {"question": "How do I reset my password?", "answer": "Visit Settings.", "keywords": ["password", "reset"]},
                {"question": "Where is my order?", "answer": "Check Orders."}
            ]"#,
        );
        let corpus = load_corpus(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.records()[0].keywords, vec!["password", "reset"]);
        assert!(corpus.records()[1].keywords.is_empty());
    }

    #[test]
    fn loads_toml_tables() {
        let file = write_temp(
            ".toml",
            r#"
            [[faqs]]
            question = "Do you ship abroad?"
            answer = "Yes, to 40 countries."
            keywords = "shipping international"

            [[faqs]]
            question = "Can I get a refund?"
            answer = "Within 30 days."
            "#,
        );
        let corpus = load_corpus(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.records()[0].keywords, vec!["shipping", "international"]);
    }

    #[test]
    fn preserves_file_order() {
        let file = write_temp(
            ".json",
            r#"[{"question": "b", "answer": "1"}, {"question": "a", "answer": "2"}]"#,
        );
        let corpus = load_corpus(file.path()).unwrap();
        assert_eq!(corpus.records()[0].question, "b");
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = write_temp(".csv", "question,answer\n");
        assert!(matches!(
            load_corpus(file.path()),
            Err(CorpusError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn reports_parse_errors() {
        let file = write_temp(".json", "{not json");
        assert!(matches!(load_corpus(file.path()), Err(CorpusError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_corpus(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CorpusError::Read { .. }));
    }

    #[test]
    fn load_or_empty_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = FaqCorpus::load_or_empty(dir.path().join("missing.json"));
        assert!(corpus.is_empty());

        let bad = write_temp(".json", "[1, 2, 3]");
        assert!(FaqCorpus::load_or_empty(bad.path()).is_empty());
    }
}
