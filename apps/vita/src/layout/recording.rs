//! A `Surface` that records every drawing call, for layout tests.

use std::path::{Path, PathBuf};

use crate::errors::VitaError;
use crate::layout::font_metrics::FontSpec;
use crate::layout::geometry::PageGeometry;
use crate::layout::surface::{Surface, TextRun};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedText {
    pub page: usize,
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub font: FontSpec,
    pub gray: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Page(usize),
    Text(RecordedText),
    Line {
        page: usize,
        from: (f32, f32),
        to: (f32, f32),
        gray: u8,
    },
    Image {
        page: usize,
        path: PathBuf,
        x: f32,
        y: f32,
        width: f32,
    },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
    page: usize,
}

impl RecordingSurface {
    pub fn page_count(&self) -> usize {
        self.page
    }

    pub fn text_runs(&self) -> Vec<&RecordedText> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn text_runs_on_page(&self, page: usize) -> Vec<&RecordedText> {
        self.text_runs().into_iter().filter(|t| t.page == page).collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.text_runs().into_iter().map(|t| t.text.as_str()).collect()
    }

    /// First recorded run whose text equals `text`.
    pub fn find_text(&self, text: &str) -> Option<&RecordedText> {
        self.text_runs().into_iter().find(|t| t.text == text)
    }

    pub fn lines(&self) -> Vec<((f32, f32), (f32, f32))> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<(PathBuf, f32, f32, f32)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Image {
                    path, x, y, width, ..
                } => Some((path.clone(), *x, *y, *width)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn begin_page(&mut self, _geometry: &PageGeometry) {
        self.page += 1;
        self.ops.push(Op::Page(self.page));
    }

    fn draw_text(&mut self, run: &TextRun<'_>) {
        self.ops.push(Op::Text(RecordedText {
            page: self.page,
            text: run.text.to_string(),
            x: run.x,
            baseline: run.baseline,
            font: run.font,
            gray: run.gray,
        }));
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), gray: u8) {
        self.ops.push(Op::Line {
            page: self.page,
            from,
            to,
            gray,
        });
    }

    fn draw_image(&mut self, path: &Path, x: f32, y: f32, width: f32) -> Result<(), VitaError> {
        self.ops.push(Op::Image {
            page: self.page,
            path: path.to_path_buf(),
            x,
            y,
            width,
        });
        Ok(())
    }
}
