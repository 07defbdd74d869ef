use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use genre_tfidf::TsneParams;

/// Settings read from the environment (and `.env`, loaded in `main`).
/// Command line flags override every value here.
pub struct Config {
    /// GENRE_TFIDF_ROOT: corpus root directory
    pub root: Option<PathBuf>,
    /// GENRE_TFIDF_EXTENSION: lyrics file extension (default `txt`)
    pub extension: String,
    /// GENRE_TFIDF_SEED / _PERPLEXITY / _ITERATIONS
    pub tsne: TsneParams,
}

impl Config {
    pub fn load() -> Result<Self> {
        let defaults = TsneParams::default();
        Ok(Self {
            root: env::var("GENRE_TFIDF_ROOT").ok().map(PathBuf::from),
            extension: env::var("GENRE_TFIDF_EXTENSION").unwrap_or_else(|_| "txt".to_string()),
            tsne: TsneParams {
                seed: parse_var("GENRE_TFIDF_SEED")?.unwrap_or(defaults.seed),
                perplexity: parse_var("GENRE_TFIDF_PERPLEXITY")?.unwrap_or(defaults.perplexity),
                max_iter: parse_var("GENRE_TFIDF_ITERATIONS")?.unwrap_or(defaults.max_iter),
                ..defaults
            },
        })
    }

    /// The corpus root, from the flag or the environment
    pub fn require_root(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        match flag.or_else(|| self.root.clone()) {
            Some(root) => Ok(root),
            None => anyhow::bail!(
                "No corpus root given. Pass --root <DIR> or set GENRE_TFIDF_ROOT \
                 (one sub-directory per genre, one .txt file per song)."
            ),
        }
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse()
                .with_context(|| format!("{name} is set to `{raw}`, which is not a valid value"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}
