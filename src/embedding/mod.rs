pub mod tsne;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::vectorizer::tfidf::TFIDFEngine;
use crate::vectorizer::TFIDFVectorizer;

pub use tsne::TsneParams;

/// A document placed on the 2-D map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingPoint {
    pub name: String,
    pub genre: String,
    pub x: f64,
    pub y: f64,
}

/// Project N equal-length vectors to 2-D with t-SNE.
/// An empty input gives an empty output.
pub fn embed_2d(vectors: &[Vec<f64>], params: &TsneParams) -> Result<Vec<[f64; 2]>> {
    tsne::tsne_2d(vectors, params)
}

/// Embed every document of a fitted vectorizer, in document order.
pub fn embed_documents<E>(vectorizer: &TFIDFVectorizer<E>, params: &TsneParams) -> Result<Vec<EmbeddingPoint>>
where
    E: TFIDFEngine,
{
    let coords = embed_2d(&vectorizer.matrix(), params)?;
    info!(points = coords.len(), seed = params.seed, "Computed t-SNE embedding");
    Ok(vectorizer
        .vectors()
        .zip(coords)
        .map(|(doc, [x, y])| EmbeddingPoint {
            name: doc.name.clone(),
            genre: doc.genre.clone(),
            x,
            y,
        })
        .collect())
}
