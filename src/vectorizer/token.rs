use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stopwords::StopWords;

/// Splits raw text into word tokens.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Regex word tokenizer
/// Words are runs of Unicode letters, marks and digits ("beyoncé", "niño").
/// Keeps inner apostrophes and hyphens ("don't", "rock-n-roll"),
/// drops bare punctuation.
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    pattern: Regex,
    lowercase: bool,
}

const WORD_PATTERN: &str = r"[\p{L}\p{M}\p{N}]+(?:['’\-][\p{L}\p{M}\p{N}]+)*";

impl WordTokenizer {
    pub fn new(lowercase: bool) -> Self {
        Self {
            // constant pattern
            pattern: Regex::new(WORD_PATTERN).expect("word pattern compiles"),
            lowercase,
        }
    }
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| {
                let word = m.as_str().replace('’', "'");
                if self.lowercase {
                    word.to_lowercase()
                } else {
                    word
                }
            })
            .collect()
    }
}

/// Token frequency of one document.
/// Counts how often each token occurs and keeps the total token count,
/// which is the base data for TF.
///
/// # Examples
/// ```
/// use genre_tfidf::TokenFrequency;
/// let mut freq = TokenFrequency::new();
/// freq.add_tokens(&["love", "love", "rain"]);
/// assert_eq!(freq.token_count("love"), 2);
/// assert_eq!(freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

/// Adding tokens
impl TokenFrequency {
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// Add one occurrence of a token
    ///
    /// # Arguments
    /// * `token` - token to add
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        let count = self.token_count.entry(token.to_string()).or_insert(0);
        *count += 1;
        self.total_token_count += 1;
        self
    }

    /// Add several tokens
    ///
    /// # Arguments
    /// * `tokens` - slice of tokens to add
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }
}

/// TF calculation
impl TokenFrequency {
    /// Term frequency of every token, count / total.
    ///
    /// # Arguments
    /// * `name` - document name, used in the error
    ///
    /// # Returns
    /// * `IndexMap<String, f64>` - token to TF, summing to 1.0
    ///
    /// Fails with `EmptyDocument` when there are no tokens.
    pub fn tf_map(&self, name: &str) -> Result<IndexMap<String, f64>> {
        if self.total_token_count == 0 {
            return Err(Error::EmptyDocument {
                name: name.to_string(),
            });
        }
        let total = self.total_token_count as f64;
        Ok(self
            .token_count
            .iter()
            .map(|(token, &count)| (token.clone(), count as f64 / total))
            .collect())
    }
}

/// Statistics
impl TokenFrequency {
    /// Total number of counted tokens
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// Occurrences of `token`, 0 when absent
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        *self.token_count.get(token).unwrap_or(&0)
    }

    /// Distinct tokens in first-seen order
    #[inline]
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(|s| s.as_str()).collect()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_token_count == 0
    }
}

/// Tokenize `lines` one at a time and count every token not in `stopwords`.
///
/// # Returns
/// * `(Vec<String>, TokenFrequency)` - kept tokens in reading order and their counts
pub fn count_terms<'a, I, T>(lines: I, stopwords: &StopWords, tokenizer: &T) -> (Vec<String>, TokenFrequency)
where
    I: IntoIterator<Item = &'a str>,
    T: Tokenizer + ?Sized,
{
    let mut tokens = Vec::new();
    let mut freq = TokenFrequency::new();
    for line in lines {
        for token in tokenizer.tokenize(line.trim()) {
            if stopwords.contains(&token) {
                continue;
            }
            freq.add_token(&token);
            tokens.push(token);
        }
    }
    (tokens, freq)
}
