use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use indexmap::IndexSet;
use tracing::info;

use crate::embedding::EmbeddingPoint;
use crate::error::{Error, Result};
use crate::plot::palette::GenrePalette;

const MARGIN: f64 = 40.0;
const LEGEND_WIDTH: f64 = 150.0;
const POINT_RADIUS: f64 = 4.0;

/// Scatterplot of embedded songs on a black background, coloured by genre.
#[derive(Debug, Clone)]
pub struct ScatterPlot<'p> {
    palette: &'p GenrePalette,
    width: u32,
    height: u32,
    labels: bool,
    title: Option<String>,
}

impl<'p> ScatterPlot<'p> {
    pub fn new(palette: &'p GenrePalette) -> Self {
        Self {
            palette,
            width: 960,
            height: 720,
            labels: false,
            title: None,
        }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Print song names next to the points. Gets crowded on large corpora.
    pub fn labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn render(&self, points: &[EmbeddingPoint]) -> String {
        let (w, h) = (self.width as f64, self.height as f64);
        let plot_w = (w - 2.0 * MARGIN - LEGEND_WIDTH).max(1.0);
        let plot_h = (h - 2.0 * MARGIN).max(1.0);
        let project = Projection::fit(points, plot_w, plot_h);

        let mut out = String::new();
        // writing to a String cannot fail
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="black"/>"#);
        if let Some(title) = &self.title {
            let _ = writeln!(
                out,
                r#"<text x="{:.1}" y="{:.1}" fill="white" font-family="sans-serif" font-size="16">{}</text>"#,
                MARGIN,
                MARGIN / 2.0 + 6.0,
                escape(title)
            );
        }

        for point in points {
            let (x, y) = project.apply(point.x, point.y);
            let (x, y) = (x + MARGIN, y + MARGIN);
            let color = self.palette.color_or_fallback(&point.genre);
            let _ = writeln!(
                out,
                r#"<circle cx="{x:.2}" cy="{y:.2}" r="{POINT_RADIUS}" fill="{}"><title>{} ({})</title></circle>"#,
                escape(color),
                escape(&point.name),
                escape(&point.genre)
            );
            if self.labels {
                let _ = writeln!(
                    out,
                    r#"<text x="{:.2}" y="{:.2}" fill="white" font-family="sans-serif" font-size="9">{}</text>"#,
                    x + POINT_RADIUS + 2.0,
                    y + 3.0,
                    escape(&point.name)
                );
            }
        }

        let genres: IndexSet<&str> = points.iter().map(|p| p.genre.as_str()).collect();
        let legend_x = w - LEGEND_WIDTH - MARGIN / 2.0;
        for (row, genre) in genres.iter().enumerate() {
            let y = MARGIN + row as f64 * 20.0;
            let _ = writeln!(
                out,
                r#"<circle cx="{:.1}" cy="{:.1}" r="6" fill="{}"/><text x="{:.1}" y="{:.1}" fill="white" font-family="sans-serif" font-size="12">{}</text>"#,
                legend_x,
                y,
                escape(self.palette.color_or_fallback(genre)),
                legend_x + 12.0,
                y + 4.0,
                escape(genre)
            );
        }
        out.push_str("</svg>\n");
        out
    }

    pub fn write(&self, points: &[EmbeddingPoint], path: &Path) -> Result<()> {
        fs::write(path, self.render(points)).map_err(|e| Error::io(path, e))?;
        info!(path = %path.display(), points = points.len(), "Wrote scatterplot");
        Ok(())
    }
}

/// Maps embedding coordinates into the plot area, y axis pointing up.
struct Projection {
    min: (f64, f64),
    scale: f64,
    offset: (f64, f64),
    height: f64,
}

impl Projection {
    fn fit(points: &[EmbeddingPoint], width: f64, height: f64) -> Self {
        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min = (min.0.min(p.x), min.1.min(p.y));
            max = (max.0.max(p.x), max.1.max(p.y));
        }
        if points.is_empty() {
            min = (0.0, 0.0);
            max = (0.0, 0.0);
        }
        let span = ((max.0 - min.0).max(max.1 - min.1)).max(f64::EPSILON);
        let scale = width.min(height) / span;
        // center the data inside the plot area
        let offset = (
            (width - (max.0 - min.0) * scale) / 2.0,
            (height - (max.1 - min.1) * scale) / 2.0,
        );
        Self {
            min,
            scale,
            offset,
            height,
        }
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let px = (x - self.min.0) * self.scale + self.offset.0;
        let py = (y - self.min.1) * self.scale + self.offset.1;
        (px, self.height - py)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(name: &str, genre: &str, x: f64, y: f64) -> EmbeddingPoint {
        EmbeddingPoint {
            name: name.to_string(),
            genre: genre.to_string(),
            x,
            y,
        }
    }

    #[test]
    fn one_circle_per_point_plus_legend() {
        let palette = GenrePalette::default();
        let points = vec![
            point("Rap God", "Rap", -3.0, 1.0),
            point("Billie Jean", "Pop", 2.0, -1.0),
            point("Lose Yourself", "Rap", 0.5, 0.5),
        ];
        let svg = ScatterPlot::new(&palette).render(&points);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        // 3 points + 2 legend swatches
        assert_eq!(svg.matches("<circle").count(), 5);
        assert!(svg.contains(r#"fill="green""#));
        assert!(svg.contains(r#"fill="yellow""#));
        assert!(svg.contains(r#"fill="black""#));
    }

    #[test]
    fn unknown_genre_uses_fallback_and_labels_escape() {
        let palette = GenrePalette::default();
        let points = vec![point("Tom & Jerry <live>", "Jazz", 0.0, 0.0)];
        let svg = ScatterPlot::new(&palette).labels(true).title("t-SNE").render(&points);
        assert!(svg.contains(r#"r="4" fill="white""#));
        assert!(svg.contains("Tom &amp; Jerry &lt;live&gt;"));
        assert!(!svg.contains("<live>"));
        assert!(svg.contains("t-SNE"));
    }

    #[test]
    fn points_stay_inside_canvas() {
        let palette = GenrePalette::default();
        let points = vec![point("a", "Pop", -100.0, 50.0), point("b", "Rock", 300.0, -20.0)];
        let plot = ScatterPlot::new(&palette).size(400, 300);
        let project = Projection::fit(&points, 400.0 - 2.0 * MARGIN - LEGEND_WIDTH, 300.0 - 2.0 * MARGIN);
        for p in &points {
            let (x, y) = project.apply(p.x, p.y);
            assert!(x >= -1e-9 && x <= 400.0 - 2.0 * MARGIN - LEGEND_WIDTH + 1e-9);
            assert!(y >= -1e-9 && y <= 300.0 - 2.0 * MARGIN + 1e-9);
        }
        assert!(plot.render(&points).contains(r#"width="400""#));
    }

    #[test]
    fn empty_plot_renders() {
        let palette = GenrePalette::default();
        let svg = ScatterPlot::new(&palette).render(&[]);
        assert_eq!(svg.matches("<circle").count(), 0);
    }
}
