use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};

/// Colour used for genres without an entry
pub const FALLBACK_COLOR: &str = "white";

/// Genre to colour mapping used by the scatterplot.
/// Colours are SVG/CSS colour names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenrePalette {
    colors: IndexMap<String, String>,
}

impl Default for GenrePalette {
    fn default() -> Self {
        Self::from_pairs([
            ("Blues", "blue"),
            ("Country", "red"),
            ("Metal", "gray"),
            ("Pop", "yellow"),
            ("Rap", "green"),
            ("Rock", "purple"),
        ])
    }
}

impl GenrePalette {
    pub fn from_pairs<I, G, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (G, C)>,
        G: Into<String>,
        C: Into<String>,
    {
        Self {
            colors: pairs.into_iter().map(|(g, c)| (g.into(), c.into())).collect(),
        }
    }

    /// Colour of `genre`, or `UnknownGenreColor`
    pub fn color(&self, genre: &str) -> Result<&str> {
        self.colors
            .get(genre)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownGenreColor(genre.to_string()))
    }

    /// Colour of `genre`, `FALLBACK_COLOR` when it has none
    pub fn color_or_fallback(&self, genre: &str) -> &str {
        match self.color(genre) {
            Ok(color) => color,
            Err(err) => {
                warn!(%err, fallback = FALLBACK_COLOR, "Using fallback colour");
                FALLBACK_COLOR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_genres() {
        let palette = GenrePalette::default();
        assert_eq!(palette.color("Blues").unwrap(), "blue");
        assert_eq!(palette.color("Country").unwrap(), "red");
        assert_eq!(palette.color("Metal").unwrap(), "gray");
        assert_eq!(palette.color("Pop").unwrap(), "yellow");
        assert_eq!(palette.color("Rap").unwrap(), "green");
        assert_eq!(palette.color("Rock").unwrap(), "purple");
    }

    #[test]
    fn unknown_genre() {
        let palette = GenrePalette::default();
        assert!(matches!(palette.color("Jazz"), Err(Error::UnknownGenreColor(g)) if g == "Jazz"));
        assert_eq!(palette.color_or_fallback("Jazz"), FALLBACK_COLOR);
        let custom = GenrePalette::from_pairs([("Jazz", "orange")]);
        assert_eq!(custom.color_or_fallback("Jazz"), "orange");
        assert_eq!(custom.color_or_fallback("Rap"), FALLBACK_COLOR);
    }
}
