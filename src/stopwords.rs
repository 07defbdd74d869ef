//! Stopword resources.
//!
//! The English list is loaded once per process through [`init`]; every later
//! call hands back the same set.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use stop_words::{get, LANGUAGE};
use tracing::debug;

use crate::error::{Error, Result};

static ENGLISH: OnceLock<StopWords> = OnceLock::new();

/// A set of tokens excluded from term counting.
/// Matching is exact; lowercase the tokens before lookup if the tokenizer does.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// No stopwords at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_words<I, T>(words: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Read one stopword per line. Blank lines and `#` comments are ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        ))
    }

    /// Merge another set into this one
    pub fn extend(&mut self, other: &StopWords) -> &mut Self {
        self.words.extend(other.words.iter().cloned());
        self
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Load the English stopword list (the NLTK list, about 180 words).
/// Only the first call does any work.
pub fn init() -> &'static StopWords {
    ENGLISH.get_or_init(|| {
        let words: Vec<String> = get(LANGUAGE::English);
        debug!(count = words.len(), "Loaded English stopwords");
        StopWords::from_words(words)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let first = init() as *const StopWords;
        let second = init() as *const StopWords;
        assert_eq!(first, second);
        assert!(init().contains("the"));
        assert!(!init().contains("rain"));
    }

    #[test]
    fn english_list_keeps_lyric_words() {
        let words = init();
        for function_word in ["a", "and", "of", "you", "don't"] {
            assert!(words.contains(function_word), "{function_word}");
        }
        for lyric_word in ["home", "world", "man", "gone", "long", "love"] {
            assert!(!words.contains(lyric_word), "{lyric_word}");
        }
        assert!(words.len() < 200, "{} words", words.len());
    }

    #[test]
    fn from_file_skips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.txt");
        std::fs::write(&path, "# custom\nyeah\n\n  oh  \n").unwrap();
        let words = StopWords::from_file(&path).unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.contains("yeah"));
        assert!(words.contains("oh"));
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = StopWords::from_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
