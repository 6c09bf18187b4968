//! Cell-based text layout on top of a [`Surface`].
//!
//! # Model
//! - A *cell* is a one-line box `w × h` at the cursor. Text sits inside it with
//!   `cell_margin` horizontal padding, vertically centred.
//! - A *multi-cell* wraps text into as many `h`-high cells as it needs.
//! - Any cell that would cross the page-break trigger first moves to a new
//!   page (auto page break). Callers that want to keep a whole block together
//!   measure it first and call [`Canvas::ensure_room`].
//!
//! `measure_multi_cell` and `multi_cell` share `wrap_text` and the same width
//! rule, so the measured height is the drawn height.

use std::path::Path;

use tracing::debug;

use crate::errors::VitaError;
use crate::layout::context::LayoutContext;
use crate::layout::font_metrics::{FontSpec, FontStyle};
use crate::layout::geometry::{needs_page_break, PageGeometry};
use crate::layout::surface::{Surface, TextRun};
use crate::layout::wrap::{line_count, wrap_text};

/// Text colour for ordinary body text.
pub const BLACK: u8 = 0;

/// Horizontal alignment of text inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Where the cursor goes after a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Stay on the line, just right of the cell.
    Right,
    /// Next line, back at the left margin.
    NextLine,
}

pub struct Canvas<S: Surface> {
    surface: S,
    geometry: PageGeometry,
    font: FontSpec,
    text_gray: u8,
    draw_gray: u8,
    pages: usize,
}

impl<S: Surface> Canvas<S> {
    pub fn new(surface: S, geometry: PageGeometry) -> Self {
        Self {
            surface,
            geometry,
            font: FontSpec::new(FontStyle::Regular, 11.0),
            text_gray: BLACK,
            draw_gray: BLACK,
            pages: 0,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn set_font(&mut self, style: FontStyle, size_pt: f32) {
        self.font = FontSpec::new(style, size_pt);
    }

    pub fn set_text_gray(&mut self, gray: u8) {
        self.text_gray = gray;
    }

    pub fn set_draw_gray(&mut self, gray: u8) {
        self.draw_gray = gray;
    }

    /// Starts a new page and puts the cursor at the top-left of its content area.
    pub fn add_page(&mut self, ctx: &mut LayoutContext) {
        self.surface.begin_page(&self.geometry);
        self.pages += 1;
        ctx.start_page(&self.geometry);
        debug!(page = self.pages, "Started page");
    }

    /// Moves to a new page unless a block of `height` still fits below the cursor.
    /// Returns whether a page break happened.
    pub fn ensure_room(&mut self, ctx: &mut LayoutContext, height: f32) -> bool {
        if needs_page_break(ctx.y, height, self.geometry.page_break_trigger()) {
            self.add_page(ctx);
            true
        } else {
            false
        }
    }

    /// Draws one line of text in a `w × h` cell at the cursor.
    /// `w == 0` extends the cell to the right margin.
    pub fn cell(
        &mut self,
        ctx: &mut LayoutContext,
        w: f32,
        h: f32,
        text: &str,
        align: Align,
        advance: Advance,
    ) {
        if needs_page_break(ctx.y, h, self.geometry.page_break_trigger()) {
            let x = ctx.x;
            self.add_page(ctx);
            ctx.set_x(x);
        }

        let w = self.resolve_width(ctx, w);
        if !text.is_empty() {
            let text_w = self.font.measure(text);
            let pad = self.geometry.cell_margin;
            let x = match align {
                Align::Left => ctx.x + pad,
                Align::Center => ctx.x + (w - text_w) / 2.0,
                Align::Right => ctx.x + w - pad - text_w,
            };
            let baseline = ctx.y + 0.5 * h + 0.3 * self.font.size_mm();
            self.surface.draw_text(&TextRun {
                text,
                x,
                baseline,
                font: self.font,
                gray: self.text_gray,
            });
        }

        match advance {
            Advance::Right => ctx.x += w,
            Advance::NextLine => ctx.ln(h),
        }
    }

    /// Wraps `text` into `h`-high lines inside a column of width `w` starting at
    /// the cursor, then leaves the cursor at the left margin below the block.
    /// Returns the height drawn.
    pub fn multi_cell(&mut self, ctx: &mut LayoutContext, w: f32, h: f32, text: &str) -> f32 {
        let w = self.resolve_width(ctx, w);
        let lines = wrap_text(text, &self.font, self.text_width(w));
        let x0 = ctx.x;
        for line in &lines {
            ctx.set_x(x0);
            self.cell(ctx, w, h, line, Align::Left, Advance::Right);
            ctx.ln(h);
        }
        lines.len() as f32 * h
    }

    /// Height `multi_cell` would use for `text` in a column of width `w`,
    /// with the current font. Draws nothing.
    pub fn measure_multi_cell(&self, w: f32, h: f32, text: &str) -> f32 {
        line_count(text, &self.font, self.text_width(w)) as f32 * h
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.surface.draw_line((x1, y1), (x2, y2), self.draw_gray);
    }

    /// Places an image without moving the cursor.
    pub fn image(&mut self, path: &Path, x: f32, y: f32, width: f32) -> Result<(), VitaError> {
        self.surface.draw_image(path, x, y, width)
    }

    fn resolve_width(&self, ctx: &LayoutContext, w: f32) -> f32 {
        if w == 0.0 {
            self.geometry.right_edge() - ctx.x
        } else {
            w
        }
    }

    fn text_width(&self, cell_width: f32) -> f32 {
        cell_width - 2.0 * self.geometry.cell_margin
    }
}
