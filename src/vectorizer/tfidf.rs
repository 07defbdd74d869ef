use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vectorizer::corpus::{Corpus, Vocabulary};
use crate::vectorizer::token::TokenFrequency;

/// Corpus-wide IDF per vocabulary token, stored in vocabulary order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InverseDocumentFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    values: IndexMap<Box<str>, f64>,
    /// document count the values were computed from
    doc_num: u64,
}

impl InverseDocumentFrequency {
    /// IDF of `token`; tokens outside the vocabulary are an error, not 0.
    pub fn get(&self, token: &str) -> Result<f64> {
        self.values
            .get(token)
            .copied()
            .ok_or_else(|| Error::MissingVocabularyTerm(token.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_ref(), *v))
    }

    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// TF-IDF calculation strategy.
///
/// Both methods walk the vocabulary, so every TF vector and the IDF table
/// line up by dimension.
pub trait TFIDFEngine {
    /// IDF for every vocabulary token
    /// # Arguments
    /// * `corpus` - document count and document frequencies
    fn idf_vec(corpus: &Corpus) -> InverseDocumentFrequency;

    /// Dense TF vector of one document over the vocabulary
    /// # Arguments
    /// * `name` - document name, used in errors
    /// * `freq` - the document's token counts
    /// * `vocab` - the dimension order
    fn tf_vec(name: &str, freq: &TokenFrequency, vocab: &Vocabulary) -> Result<Vec<f64>> {
        let total = freq.token_sum();
        if total == 0 {
            return Err(Error::EmptyDocument {
                name: name.to_string(),
            });
        }
        let total = total as f64;
        Ok(vocab
            .iter()
            .map(|token| freq.token_count(token) as f64 / total)
            .collect())
    }
}

fn idf_with(corpus: &Corpus, formula: impl Fn(f64, f64) -> f64) -> InverseDocumentFrequency {
    let doc_num = corpus.get_doc_num();
    let values = corpus
        .vocabulary()
        .iter()
        .map(|token| {
            let doc_freq = corpus.get_term_count(token);
            debug_assert!(doc_freq >= 1 && doc_freq <= doc_num);
            (Box::<str>::from(token), formula(doc_num as f64, doc_freq as f64))
        })
        .collect();
    InverseDocumentFrequency { values, doc_num }
}

/// Textbook TF-IDF.
/// tf = count / total, idf = ln(N / df)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus) -> InverseDocumentFrequency {
        idf_with(corpus, |n, df| (n / df).ln())
    }
}

/// Smoothed IDF, ln((1 + N) / (1 + df)) + 1.
/// Terms found in every document keep a weight of 1 instead of 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothTFIDFEngine;

impl TFIDFEngine for SmoothTFIDFEngine {
    fn idf_vec(corpus: &Corpus) -> InverseDocumentFrequency {
        idf_with(corpus, |n, df| ((1.0 + n) / (1.0 + df)).ln() + 1.0)
    }
}
