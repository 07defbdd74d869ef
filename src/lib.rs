/// TF-IDF vectors, cosine similarity and t-SNE maps for a corpus of song
/// lyrics grouped by genre.
pub mod embedding;
pub mod error;
pub mod plot;
pub mod report;
pub mod stopwords;
pub mod utils;
pub mod vectorizer;

/// TF-IDF Vectorizer
/// The top-level struct of this crate. It turns a `Corpus` into one dense
/// TF-IDF vector per document and answers similarity questions about them.
///
/// It holds:
/// - The corpus vocabulary, which fixes the vector dimensions
/// - The IDF table
/// - One `DocumentVector` per document, in corpus order
///
/// `TFIDFVectorizer<E>` takes the TF-IDF calculation engine as its generic
/// parameter, `DefaultTFIDFEngine` unless stated otherwise.
pub use vectorizer::{DocumentVector, TFIDFVectorizer};

/// Corpus for TF-IDF Vectorizer
/// Owns the documents, the sorted vocabulary, and the number of documents
/// each token appears in, which is the base data for IDF.
///
/// `CorpusLoader` fills one from a `root/<genre>/<song>.txt` tree.
pub use vectorizer::corpus::{load::CorpusLoader, load::EmptyDocumentPolicy, Corpus, Document, Vocabulary};

/// Token Frequency structure
/// Token counts of one document and their total, the base data for TF.
pub use vectorizer::token::{count_terms, TokenFrequency, Tokenizer, WordTokenizer};

/// TF IDF Calculation Engine Trait
/// Plug a different IDF formula into `TFIDFVectorizer<E>`.
/// - `DefaultTFIDFEngine`: tf = count / total, idf = ln(N / df)
/// - `SmoothTFIDFEngine`: same tf, idf = ln((1 + N) / (1 + df)) + 1
pub use vectorizer::tfidf::{DefaultTFIDFEngine, InverseDocumentFrequency, SmoothTFIDFEngine, TFIDFEngine};

/// Similarity
/// Cosine similarity with a 0.0 fallback for zero vectors, plus ranked
/// results for nearest neighbours and top terms.
pub use vectorizer::compare::{cosine_similarity, Compare, DefaultCompare};
pub use vectorizer::scoring::{HitEntry, Hits};

/// 2-D embedding (t-SNE) and its plot
pub use embedding::{embed_2d, embed_documents, EmbeddingPoint, TsneParams};
pub use plot::{GenrePalette, ScatterPlot};

pub use error::{Error, Result};
pub use stopwords::StopWords;
