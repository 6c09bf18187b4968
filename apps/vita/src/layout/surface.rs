//! The drawing seam under `Canvas`.
//!
//! `Canvas` decides where things go; a `Surface` only puts marks on the page.
//! Coordinates are millimetres from the top-left corner of the current page.

use std::path::Path;

use crate::errors::VitaError;
use crate::layout::font_metrics::FontSpec;
use crate::layout::geometry::PageGeometry;

/// One positioned run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub x: f32,
    pub baseline: f32,
    pub font: FontSpec,
    /// 0 = black, 255 = white.
    pub gray: u8,
}

/// A page-oriented drawing backend. Implemented by the PDF writer and, in
/// tests, by a recorder that keeps every call for inspection.
pub trait Surface {
    /// Starts a new, empty page; all later calls draw on it.
    fn begin_page(&mut self, geometry: &PageGeometry);

    fn draw_text(&mut self, run: &TextRun<'_>);

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), gray: u8);

    /// Places the image file at `(x, y)` (top-left), scaled to `width`.
    fn draw_image(&mut self, path: &Path, x: f32, y: f32, width: f32) -> Result<(), VitaError>;
}
