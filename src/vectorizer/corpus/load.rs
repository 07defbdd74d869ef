use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::stopwords::StopWords;
use crate::vectorizer::corpus::{Corpus, Document};
use crate::vectorizer::token::{count_terms, Tokenizer, WordTokenizer};

/// What to do with a file that has no tokens left after stopword removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyDocumentPolicy {
    /// log a warning and leave it out of the corpus
    #[default]
    Skip,
    /// abort loading with `Error::EmptyDocument`
    Fail,
}

/// Reads a lyrics tree: `root/<genre>/<song>.<ext>`.
pub struct CorpusLoader<'s, T = WordTokenizer>
where
    T: Tokenizer,
{
    stopwords: &'s StopWords,
    tokenizer: T,
    extension: String,
    empty_policy: EmptyDocumentPolicy,
}

impl<'s> CorpusLoader<'s, WordTokenizer> {
    pub fn new(stopwords: &'s StopWords) -> Self {
        Self {
            stopwords,
            tokenizer: WordTokenizer::default(),
            extension: "txt".to_string(),
            empty_policy: EmptyDocumentPolicy::default(),
        }
    }
}

impl<'s, T> CorpusLoader<'s, T>
where
    T: Tokenizer,
{
    pub fn with_tokenizer<U: Tokenizer>(self, tokenizer: U) -> CorpusLoader<'s, U> {
        CorpusLoader {
            stopwords: self.stopwords,
            tokenizer,
            extension: self.extension,
            empty_policy: self.empty_policy,
        }
    }

    /// File extension to read, without the dot
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn empty_policy(mut self, policy: EmptyDocumentPolicy) -> Self {
        self.empty_policy = policy;
        self
    }

    /// Load every genre directory under `root`.
    /// Directories and files are visited in sorted order.
    pub fn load(&self, root: &Path) -> Result<Corpus> {
        let mut corpus = Corpus::new();
        let mut skipped = 0usize;

        for genre_dir in sorted_entries(root)? {
            if !genre_dir.is_dir() {
                debug!(path = %genre_dir.display(), "Skipping non-directory entry");
                continue;
            }
            let genre = file_name(&genre_dir);
            for path in sorted_entries(&genre_dir)? {
                if !path.is_file() || !self.matches_extension(&path) {
                    debug!(path = %path.display(), "Skipping entry");
                    continue;
                }
                let doc = self.read_document(&path, &genre)?;
                if doc.is_empty() {
                    match self.empty_policy {
                        EmptyDocumentPolicy::Skip => {
                            warn!(song = %doc.name, genre = %genre, "No tokens after stopword removal, skipping");
                            skipped += 1;
                            continue;
                        }
                        EmptyDocumentPolicy::Fail => {
                            return Err(Error::EmptyDocument { name: doc.name });
                        }
                    }
                }
                debug!(song = %doc.name, genre = %genre, tokens = doc.counts.token_sum(), "Read document");
                corpus.add_document(doc)?;
            }
        }

        info!(
            root = %root.display(),
            documents = corpus.len(),
            genres = corpus.genres().len(),
            vocabulary = corpus.vocab_size(),
            skipped,
            "Loaded corpus"
        );
        Ok(corpus)
    }

    /// Tokenize and count one file. The result may be empty.
    pub fn read_document(&self, path: &Path, genre: &str) -> Result<Document> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let text = String::from_utf8_lossy(&bytes);
        let (tokens, counts) = count_terms(text.lines(), self.stopwords, &self.tokenizer);
        Ok(Document::with_counts(song_name(path), genre, tokens, counts))
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }
}

/// Song name is the file name without its extension.
fn song_name(path: &Path) -> String {
    match path.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => file_name(path),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()).map_err(|e| Error::io(dir, e)))
        .collect::<Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_name_drops_only_the_extension() {
        assert_eq!(song_name(Path::new("/x/Rap God.txt")), "Rap God");
        assert_eq!(song_name(Path::new("/x/Mr. Brightside.txt")), "Mr. Brightside");
        assert_eq!(song_name(Path::new("/x/Ms. Jackson.lyrics.txt")), "Ms. Jackson.lyrics");
        assert_eq!(song_name(Path::new("/x/.hidden.txt")), ".hidden");
    }

    #[test]
    fn titles_sharing_a_prefix_stay_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let rock = dir.path().join("Rock");
        fs::create_dir(&rock).unwrap();
        fs::write(rock.join("Mr. Brightside.txt"), "jealousy turning saints").unwrap();
        fs::write(rock.join("Mr. Jones.txt"), "grey guitar dancing").unwrap();

        let stop = StopWords::empty();
        let corpus = CorpusLoader::new(&stop).load(dir.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.document("Mr. Brightside").unwrap().genre, "Rock");
        assert!(corpus.document("Mr. Jones").is_some());
    }

    #[test]
    fn extension_match_ignores_case_and_dot() {
        let stop = StopWords::empty();
        let loader = CorpusLoader::new(&stop).extension(".lyr");
        assert!(loader.matches_extension(Path::new("a/b.LYR")));
        assert!(!loader.matches_extension(Path::new("a/b.txt")));
        assert!(!loader.matches_extension(Path::new("a/b")));
    }
}
