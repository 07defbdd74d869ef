pub mod compare;
pub mod corpus;
pub mod scoring;
pub mod tfidf;
pub mod token;

use std::marker::PhantomData;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::vectorizer::compare::cosine_similarity;
use crate::vectorizer::corpus::{Corpus, Vocabulary};
use crate::vectorizer::scoring::{HitEntry, Hits};
use crate::vectorizer::tfidf::{DefaultTFIDFEngine, InverseDocumentFrequency, TFIDFEngine};

/// TF-IDF vector of one document.
/// `values[i]` is the weight of `vocabulary[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentVector {
    pub name: String,
    pub genre: String,
    pub values: Vec<f64>,
}

impl DocumentVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }
}

/// TF-IDF vectors of a whole corpus.
///
/// Holds the vocabulary the vectors are aligned to, the IDF table, and one
/// dense vector per document in corpus order. Fitting is a one-shot batch;
/// refit to pick up a changed corpus.
///
/// `E` picks the IDF formula, see [`TFIDFEngine`].
#[derive(Debug, Clone, Serialize)]
pub struct TFIDFVectorizer<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    pub vocabulary: Vocabulary,
    pub idf: InverseDocumentFrequency,
    pub documents: IndexMap<String, DocumentVector>,
    #[serde(skip)]
    _marker: PhantomData<E>,
}

impl<E> TFIDFVectorizer<E>
where
    E: TFIDFEngine,
{
    /// Compute TF, IDF and the combined vectors for every document.
    pub fn fit(corpus: &Corpus) -> Result<Self> {
        let vocabulary = corpus.vocabulary().clone();
        let idf = E::idf_vec(corpus);
        let idf_values: Vec<f64> = idf.iter().map(|(_, v)| v).collect();

        let mut documents = IndexMap::with_capacity(corpus.len());
        for doc in corpus.documents() {
            let tf = E::tf_vec(&doc.name, &doc.counts, &vocabulary)?;
            let values = tf.iter().zip(&idf_values).map(|(tf, idf)| tf * idf).collect();
            documents.insert(
                doc.name.clone(),
                DocumentVector {
                    name: doc.name.clone(),
                    genre: doc.genre.clone(),
                    values,
                },
            );
        }

        info!(
            documents = documents.len(),
            dimensions = vocabulary.len(),
            "Built TF-IDF vectors"
        );
        Ok(Self {
            vocabulary,
            idf,
            documents,
            _marker: PhantomData,
        })
    }

    pub fn vector(&self, name: &str) -> Result<&DocumentVector> {
        self.documents
            .get(name)
            .ok_or_else(|| Error::UnknownDocument(name.to_string()))
    }

    pub fn vectors(&self) -> impl Iterator<Item = &DocumentVector> {
        self.documents.values()
    }

    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    pub fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine similarity of two documents by name
    pub fn similarity(&self, a: &str, b: &str) -> Result<f64> {
        cosine_similarity(&self.vector(a)?.values, &self.vector(b)?.values)
    }

    /// N x N cosine similarity matrix in document order
    pub fn similarity_matrix(&self) -> Result<Vec<Vec<f64>>> {
        let vectors: Vec<&[f64]> = self.vectors().map(|v| v.values.as_slice()).collect();
        vectors
            .par_iter()
            .map(|a| vectors.iter().map(|b| cosine_similarity(a, b)).collect::<Result<Vec<f64>>>())
            .collect()
    }

    /// The `top_n` documents closest to `name`, excluding itself
    pub fn most_similar(&self, name: &str, top_n: usize) -> Result<Hits<String>> {
        let target = self.vector(name)?;
        let list = self
            .vectors()
            .filter(|v| v.name != target.name)
            .map(|v| {
                Ok(HitEntry {
                    key: v.name.clone(),
                    score: cosine_similarity(&target.values, &v.values)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let mut hits = Hits::new(list);
        hits.sort_by_score_desc().truncate(top_n);
        Ok(hits)
    }

    /// The `top_n` highest weighted terms of a document. Zero weights are left out.
    pub fn top_terms(&self, name: &str, top_n: usize) -> Result<Hits<String>> {
        let vector = self.vector(name)?;
        let list = vector
            .values
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > 0.0)
            .filter_map(|(idx, w)| {
                self.vocabulary.get(idx).map(|token| HitEntry {
                    key: token.to_string(),
                    score: *w,
                })
            })
            .collect();
        let mut hits = Hits::new(list);
        hits.sort_by_score_desc().truncate(top_n);
        Ok(hits)
    }

    /// Vectors as rows, in document order, for the embedding step
    pub fn matrix(&self) -> Vec<Vec<f64>> {
        self.vectors().map(|v| v.values.clone()).collect()
    }
}
