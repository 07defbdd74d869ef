pub mod load;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vectorizer::token::TokenFrequency;

/// One song: name, genre, tokens after stopword removal and their counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub genre: String,
    /// tokens in reading order
    pub tokens: Vec<String>,
    pub counts: TokenFrequency,
}

impl Document {
    pub fn new(name: impl Into<String>, genre: impl Into<String>, tokens: Vec<String>) -> Self {
        let mut counts = TokenFrequency::new();
        counts.add_tokens(&tokens);
        Self {
            name: name.into(),
            genre: genre.into(),
            tokens,
            counts,
        }
    }

    /// Build from already counted tokens
    pub fn with_counts(name: impl Into<String>, genre: impl Into<String>, tokens: Vec<String>, counts: TokenFrequency) -> Self {
        Self {
            name: name.into(),
            genre: genre.into(),
            tokens,
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Sorted set of every distinct token in a corpus.
/// Position in the set is the vector dimension of the token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    tokens: IndexSet<Box<str>>,
}

impl Vocabulary {
    /// Tokens must already be sorted and distinct
    fn from_sorted<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            tokens: tokens.into_iter().map(Box::<str>::from).collect(),
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get_index(index).map(|t| t.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Ordered collection of documents with the statistics IDF needs:
/// the document count and, per token, the number of documents containing it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    documents: IndexMap<String, Document>,
    /// token -> number of documents containing it, kept in token order
    term_counts: BTreeMap<Box<str>, u64>,
    /// built from `term_counts` on first use, reset by `add_document`
    #[serde(skip)]
    vocabulary: OnceLock<Vocabulary>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from documents in order
    pub fn from_documents<I>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut corpus = Self::new();
        for doc in documents {
            corpus.add_document(doc)?;
        }
        Ok(corpus)
    }

    /// Add a document's tokens to the corpus.
    /// Empty documents and duplicate names are rejected.
    pub fn add_document(&mut self, doc: Document) -> Result<&Document> {
        if doc.is_empty() {
            return Err(Error::EmptyDocument { name: doc.name });
        }
        if let Some(existing) = self.documents.get(&doc.name) {
            return Err(Error::DuplicateDocument {
                name: doc.name,
                genre: existing.genre.clone(),
            });
        }
        for term in doc.counts.token_set_ref_str() {
            self.term_counts
                .entry(term.into())
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
        self.vocabulary = OnceLock::new();

        let (idx, _) = self.documents.insert_full(doc.name.clone(), doc);
        Ok(&self.documents[idx])
    }

    /// Number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.documents.len() as u64
    }

    /// Number of documents containing `term`
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Sorted vocabulary of every document added so far
    pub fn vocabulary(&self) -> &Vocabulary {
        self.vocabulary
            .get_or_init(|| Vocabulary::from_sorted(self.term_counts.keys().map(|t| t.as_ref())))
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    pub fn document(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Distinct genres in first-seen order
    pub fn genres(&self) -> Vec<&str> {
        let mut genres: IndexSet<&str> = IndexSet::new();
        for doc in self.documents.values() {
            genres.insert(doc.genre.as_str());
        }
        genres.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, genre: &str, text: &str) -> Document {
        Document::new(name, genre, text.split_whitespace().map(String::from).collect())
    }

    #[test]
    fn vocabulary_is_sorted_and_shared() {
        let corpus = Corpus::from_documents([
            doc("SongA", "Pop", "zebra love rain"),
            doc("SongB", "Rock", "apple rain"),
        ])
        .unwrap();
        let vocab: Vec<&str> = corpus.vocabulary().iter().collect();
        assert_eq!(vocab, vec!["apple", "love", "rain", "zebra"]);
        assert_eq!(corpus.vocabulary().get(2), Some("rain"));
        assert_eq!(corpus.vocabulary().get(0), Some("apple"));
    }

    #[test]
    fn vocabulary_follows_later_documents() {
        let mut corpus = Corpus::new();
        corpus.add_document(doc("a", "Pop", "rain love")).unwrap();
        assert_eq!(corpus.vocabulary().len(), 2);
        corpus.add_document(doc("b", "Rap", "money apple rain")).unwrap();
        let vocab: Vec<&str> = corpus.vocabulary().iter().collect();
        assert_eq!(vocab, vec!["apple", "love", "money", "rain"]);
        assert_eq!(corpus.vocab_size(), 4);
    }

    #[test]
    fn term_counts_are_document_frequencies() {
        let corpus = Corpus::from_documents([
            doc("SongA", "Pop", "love love rain"),
            doc("SongB", "Rock", "rain rain love"),
            doc("SongC", "Rap", "money"),
        ])
        .unwrap();
        assert_eq!(corpus.get_doc_num(), 3);
        assert_eq!(corpus.get_term_count("love"), 2);
        assert_eq!(corpus.get_term_count("money"), 1);
        assert_eq!(corpus.get_term_count("absent"), 0);
        for term in corpus.vocabulary().iter() {
            let df = corpus.get_term_count(term);
            assert!(df >= 1 && df <= corpus.get_doc_num());
        }
    }

    #[test]
    fn rejects_empty_document() {
        let mut corpus = Corpus::new();
        let err = corpus.add_document(doc("Silence", "Pop", "")).unwrap_err();
        assert!(matches!(err, Error::EmptyDocument { .. }));
        assert!(corpus.is_empty());
    }

    #[test]
    fn rejects_duplicate_name() {
        let mut corpus = Corpus::new();
        corpus.add_document(doc("Hurt", "Country", "pain")).unwrap();
        let err = corpus.add_document(doc("Hurt", "Rock", "needle")).unwrap_err();
        match err {
            Error::DuplicateDocument { name, genre } => {
                assert_eq!(name, "Hurt");
                assert_eq!(genre, "Country");
            }
            other => panic!("unexpected error {other:?}"),
        }
        // the rejected document left no trace
        assert_eq!(corpus.get_term_count("needle"), 0);
        assert_eq!(corpus.vocab_size(), 1);
    }

    #[test]
    fn genres_in_first_seen_order() {
        let corpus = Corpus::from_documents([
            doc("a", "Rock", "x"),
            doc("b", "Pop", "y"),
            doc("c", "Rock", "z"),
        ])
        .unwrap();
        assert_eq!(corpus.genres(), vec!["Rock", "Pop"]);
    }
}
