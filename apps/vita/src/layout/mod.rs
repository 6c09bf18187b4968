// Page layout engine: glyph metrics, word wrap, page geometry, the explicit
// layout context, and the cell-based canvas the renderers draw through.

pub mod canvas;
pub mod context;
pub mod font_metrics;
pub mod geometry;
#[cfg(test)]
pub mod recording;
pub mod surface;
pub mod wrap;

// Re-export the API consumed by the renderers.
pub use canvas::{Advance, Align, Canvas, BLACK};
pub use context::LayoutContext;
pub use font_metrics::FontStyle;
pub use geometry::PageGeometry;
pub use surface::Surface;
