use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::embedding::EmbeddingPoint;
use crate::error::{Error, Result};
use crate::vectorizer::tfidf::{InverseDocumentFrequency, TFIDFEngine};
use crate::vectorizer::{DocumentVector, TFIDFVectorizer};

/// Everything a fitted vectorizer knows, in a JSON-friendly shape
#[derive(Debug, Serialize)]
pub struct VectorReport<'a> {
    pub documents: usize,
    pub vocabulary: Vec<&'a str>,
    pub idf: &'a InverseDocumentFrequency,
    pub vectors: Vec<&'a DocumentVector>,
}

impl<'a> VectorReport<'a> {
    pub fn new<E: TFIDFEngine>(vectorizer: &'a TFIDFVectorizer<E>) -> Self {
        Self {
            documents: vectorizer.doc_num(),
            vocabulary: vectorizer.vocabulary.iter().collect(),
            idf: &vectorizer.idf,
            vectors: vectorizer.vectors().collect(),
        }
    }
}

/// 2-D coordinates of every song
#[derive(Debug, Serialize)]
pub struct EmbeddingReport<'a> {
    pub seed: u64,
    pub perplexity: f64,
    pub points: &'a [EmbeddingPoint],
}

/// Pretty-print `value` as JSON into `path`
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), "Wrote JSON report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::corpus::{Corpus, Document};

    #[test]
    fn vector_report_round_trips_through_json() {
        let corpus = Corpus::from_documents([
            Document::new("a", "Pop", vec!["love".into(), "rain".into()]),
            Document::new("b", "Rock", vec!["rain".into()]),
        ])
        .unwrap();
        let vec: TFIDFVectorizer = TFIDFVectorizer::fit(&corpus).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.json");
        write_json(&path, &VectorReport::new(&vec)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["documents"], 2);
        assert_eq!(value["vocabulary"], serde_json::json!(["love", "rain"]));
        assert_eq!(value["vectors"][1]["name"], "b");
        assert_eq!(value["vectors"][1]["values"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn write_json_reports_bad_path() {
        let err = write_json(Path::new("/no/such/dir/out.json"), &1).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
