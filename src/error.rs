use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A document has no tokens left after stopword removal.
    #[error("document `{name}` has no tokens after stopword removal")]
    EmptyDocument { name: String },

    /// Genre without an entry in the colour palette.
    #[error("no colour assigned to genre `{0}`")]
    UnknownGenreColor(String),

    /// Vectors of different length met in one computation.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// IDF requested for a token outside the corpus vocabulary.
    #[error("token `{0}` is not in the vocabulary")]
    MissingVocabularyTerm(String),

    /// Two documents in one corpus share a name.
    #[error("document `{name}` already exists (genre `{genre}`)")]
    DuplicateDocument { name: String, genre: String },

    /// Lookup by a name the corpus does not contain.
    #[error("unknown document `{0}`")]
    UnknownDocument(String),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
