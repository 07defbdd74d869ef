pub mod palette;
pub mod svg;

pub use palette::{GenrePalette, FALLBACK_COLOR};
pub use svg::ScatterPlot;
