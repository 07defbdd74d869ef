use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use genre_tfidf::report::{write_json, EmbeddingReport, VectorReport};
use genre_tfidf::{
    embed_documents, stopwords, Corpus, CorpusLoader, DefaultTFIDFEngine, EmptyDocumentPolicy, GenrePalette,
    ScatterPlot, SmoothTFIDFEngine, StopWords, TFIDFEngine, TFIDFVectorizer, WordTokenizer,
};

mod config;

/// genre-tfidf: TF-IDF similarity and t-SNE maps for song lyrics.
///
/// Reads a directory with one sub-directory per genre and one text file per
/// song, builds TF-IDF vectors, and compares or plots them.
#[derive(Parser)]
#[command(name = "genre-tfidf", version, about)]
struct Cli {
    #[command(flatten)]
    corpus: CorpusArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Corpus root directory (or GENRE_TFIDF_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Lyrics file extension (default: txt, or GENRE_TFIDF_EXTENSION)
    #[arg(long, global = true)]
    extension: Option<String>,

    /// Built-in stopword list
    #[arg(long, value_enum, default_value_t = StopwordMode::English, global = true)]
    stopwords: StopwordMode,

    /// Extra stopwords, one per line
    #[arg(long, global = true)]
    stopword_file: Option<PathBuf>,

    /// Do not lowercase tokens
    #[arg(long, global = true)]
    keep_case: bool,

    /// IDF formula
    #[arg(long, value_enum, default_value_t = EngineKind::Standard, global = true)]
    engine: EngineKind,

    /// What to do with songs that have no tokens after stopword removal
    #[arg(long, value_enum, default_value_t = EmptyMode::Skip, global = true)]
    on_empty: EmptyMode,
}

#[derive(Clone, Copy, ValueEnum)]
enum StopwordMode {
    English,
    #[value(name = "none")]
    Off,
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineKind {
    /// idf = ln(N / df)
    Standard,
    /// idf = ln((1 + N) / (1 + df)) + 1
    Smooth,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmptyMode {
    Skip,
    Fail,
}

#[derive(Subcommand)]
enum Commands {
    /// Print cosine similarity for pairs of songs
    Similarity {
        /// A pair as "Song A=Song B" (repeatable)
        #[arg(long = "pair", value_parser = parse_pair, required_unless_present = "matrix")]
        pairs: Vec<(String, String)>,

        /// Print the full similarity matrix instead
        #[arg(long)]
        matrix: bool,
    },

    /// List the songs closest to one song
    Neighbors {
        song: String,

        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// List the highest weighted terms of one song
    Terms {
        song: String,

        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Render a t-SNE scatterplot coloured by genre
    Plot {
        /// SVG output path
        #[arg(long, default_value = "tsne.svg")]
        out: PathBuf,

        /// Also write the coordinates as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Print song names next to the points
        #[arg(long)]
        labels: bool,

        /// RNG seed (default: 42, or GENRE_TFIDF_SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// t-SNE perplexity (default: 30, or GENRE_TFIDF_PERPLEXITY)
        #[arg(long)]
        perplexity: Option<f64>,

        /// Optimization steps (default: 1000, or GENRE_TFIDF_ITERATIONS)
        #[arg(long)]
        iterations: Option<usize>,

        /// Image width in pixels
        #[arg(long, default_value = "960")]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value = "720")]
        height: u32,
    },

    /// Write vocabulary, IDF and all vectors as JSON
    Export {
        #[arg(long, default_value = "vectors.json")]
        out: PathBuf,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
            Ok((a.trim().to_string(), b.trim().to_string()))
        }
        _ => Err(format!("expected \"Song A=Song B\", got `{raw}`")),
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("genre_tfidf=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::Config::load()?;
    let corpus = load_corpus(&cli.corpus, &config)?;

    match cli.corpus.engine {
        EngineKind::Standard => run::<DefaultTFIDFEngine>(&corpus, cli.command, &config),
        EngineKind::Smooth => run::<SmoothTFIDFEngine>(&corpus, cli.command, &config),
    }
}

fn load_corpus(args: &CorpusArgs, config: &config::Config) -> Result<Corpus> {
    let root = config.require_root(args.root.clone())?;

    let mut stop = match args.stopwords {
        StopwordMode::English => stopwords::init().clone(),
        StopwordMode::Off => StopWords::empty(),
    };
    if let Some(path) = &args.stopword_file {
        stop.extend(&StopWords::from_file(path)?);
    }

    let policy = match args.on_empty {
        EmptyMode::Skip => EmptyDocumentPolicy::Skip,
        EmptyMode::Fail => EmptyDocumentPolicy::Fail,
    };
    let extension = args.extension.clone().unwrap_or_else(|| config.extension.clone());

    CorpusLoader::new(&stop)
        .with_tokenizer(WordTokenizer::new(!args.keep_case))
        .extension(extension)
        .empty_policy(policy)
        .load(&root)
        .with_context(|| format!("Failed to load corpus from {}", root.display()))
}

fn run<E: TFIDFEngine>(corpus: &Corpus, command: Commands, config: &config::Config) -> Result<()> {
    let vectorizer: TFIDFVectorizer<E> = TFIDFVectorizer::fit(corpus)?;
    if vectorizer.doc_num() == 0 {
        println!("{}", "Corpus is empty, nothing to compare.".dimmed());
    } else {
        println!(
            "{}",
            format!("{} songs, {} terms", vectorizer.doc_num(), vectorizer.dimensions()).dimmed()
        );
    }

    match command {
        Commands::Similarity { pairs, matrix } => {
            if matrix {
                print_matrix(&vectorizer)?;
            }
            for (a, b) in pairs {
                let score = vectorizer.similarity(&a, &b)?;
                println!("{} {} {}  {:.6}", a.bold(), "vs".dimmed(), b.bold(), score);
            }
        }

        Commands::Neighbors { song, top } => {
            let hits = vectorizer.most_similar(&song, top)?;
            println!("{} {}", "Closest to".bold(), song.bold());
            print!("{hits}");
        }

        Commands::Terms { song, top } => {
            let hits = vectorizer.top_terms(&song, top)?;
            println!("{} {}", "Top terms of".bold(), song.bold());
            if vectorizer.vector(&song)?.is_zero() {
                println!("{}", "  every term is shared by all songs (all weights are 0)".dimmed());
            }
            print!("{hits}");
        }

        Commands::Plot {
            out,
            json,
            labels,
            seed,
            perplexity,
            iterations,
            width,
            height,
        } => {
            let mut params = config.tsne.clone();
            params.seed = seed.unwrap_or(params.seed);
            params.perplexity = perplexity.unwrap_or(params.perplexity);
            params.max_iter = iterations.unwrap_or(params.max_iter);

            let points = embed_documents(&vectorizer, &params)?;
            let palette = GenrePalette::default();
            ScatterPlot::new(&palette)
                .size(width, height)
                .labels(labels)
                .title(format!("t-SNE of {} songs", points.len()))
                .write(&points, &out)?;
            if let Some(json) = json {
                let report = EmbeddingReport {
                    seed: params.seed,
                    perplexity: params.perplexity,
                    points: &points,
                };
                write_json(&json, &report)?;
            }
            println!("Scatterplot written to {}", out.display().to_string().bold());
        }

        Commands::Export { out } => {
            write_json(&out, &VectorReport::new(&vectorizer))?;
            println!("Vectors written to {}", out.display().to_string().bold());
        }
    }

    info!("Done");
    Ok(())
}

fn print_matrix<E: TFIDFEngine>(vectorizer: &TFIDFVectorizer<E>) -> Result<()> {
    let matrix = vectorizer.similarity_matrix()?;
    let names: Vec<&str> = vectorizer.vectors().map(|v| v.name.as_str()).collect();
    for (name, row) in names.iter().zip(&matrix) {
        let cells: Vec<String> = row.iter().map(|s| format!("{s:.3}")).collect();
        println!("{:<32} {}", name.bold(), cells.join(" "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_parsing() {
        assert_eq!(
            parse_pair("Till I Collapse = Rap God").unwrap(),
            ("Till I Collapse".to_string(), "Rap God".to_string())
        );
        assert!(parse_pair("Rap God").is_err());
        assert!(parse_pair("=Rap God").is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "genre-tfidf",
            "similarity",
            "--root",
            "/lyrics",
            "--pair",
            "Till I Collapse=Rap God",
            "--pair",
            "Till I Collapse=Billie Jean",
        ])
        .unwrap();
        assert_eq!(cli.corpus.root, Some(PathBuf::from("/lyrics")));
        match cli.command {
            Commands::Similarity { pairs, matrix } => {
                assert_eq!(pairs.len(), 2);
                assert!(!matrix);
            }
            _ => panic!("expected similarity"),
        }
    }

    #[test]
    fn plot_takes_size_and_tsne_overrides() {
        let cli = Cli::try_parse_from([
            "genre-tfidf",
            "plot",
            "--width",
            "400",
            "--seed",
            "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Plot {
                width,
                height,
                seed,
                perplexity,
                ..
            } => {
                assert_eq!((width, height), (400, 720));
                assert_eq!(seed, Some(7));
                assert_eq!(perplexity, None);
            }
            _ => panic!("expected plot"),
        }
    }

    #[test]
    fn similarity_needs_a_pair_or_matrix() {
        assert!(Cli::try_parse_from(["genre-tfidf", "similarity"]).is_err());
        assert!(Cli::try_parse_from(["genre-tfidf", "similarity", "--matrix"]).is_ok());
    }
}
