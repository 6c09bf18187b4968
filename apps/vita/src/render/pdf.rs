//! `Surface` backed by printpdf, embedding the DejaVu Sans faces.
//!
//! printpdf measures from the bottom-left corner; the layout works from the
//! top-left, so every y is flipped against the page height here.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use image::{DynamicImage, GenericImageView};
use printpdf::{
    Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use tracing::{debug, warn};

use crate::errors::VitaError;
use crate::layout::font_metrics::{get_metrics, Face};
use crate::layout::geometry::PageGeometry;
use crate::layout::surface::{Surface, TextRun};

const LAYER_NAME: &str = "Layer 1";
const IMAGE_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;
/// Stroke width for dividers and signature lines (0.2 mm).
const LINE_THICKNESS_PT: f32 = 0.567;

pub struct PdfSurface {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    layer: PdfLayerReference,
    page_height: f32,
    pages: usize,
}

impl PdfSurface {
    /// Creates a document whose first page is already allocated; the first
    /// `begin_page` call draws onto it.
    pub fn new(title: &str, geometry: &PageGeometry) -> Result<Self, VitaError> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(geometry.width),
            Mm(geometry.height),
            LAYER_NAME,
        );
        let regular = doc
            .add_external_font(Face::Regular.ttf_bytes())
            .map_err(|e| VitaError::Pdf(format!("cannot embed regular font: {e}")))?;
        let bold = doc
            .add_external_font(Face::Bold.ttf_bytes())
            .map_err(|e| VitaError::Pdf(format!("cannot embed bold font: {e}")))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            regular,
            bold,
            layer,
            page_height: geometry.height,
            pages: 0,
        })
    }

    /// Serializes the document to `path`, creating parent directories as needed.
    pub fn save(self, path: &Path) -> Result<(), VitaError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| VitaError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| VitaError::io(path, e))?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| VitaError::Pdf(format!("cannot write {}: {e}", path.display())))?;
        debug!(path = %path.display(), pages = self.pages, "Wrote PDF");
        Ok(())
    }

    fn font_ref(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        }
    }

    fn flip(&self, y: f32) -> Mm {
        Mm(self.page_height - y)
    }
}

fn gray_color(gray: u8) -> Color {
    let level = f32::from(gray) / 255.0;
    Color::Rgb(Rgb::new(level, level, level, None))
}

impl Surface for PdfSurface {
    fn begin_page(&mut self, geometry: &PageGeometry) {
        self.pages += 1;
        if self.pages > 1 {
            let (page, layer) =
                self.doc
                    .add_page(Mm(geometry.width), Mm(geometry.height), LAYER_NAME);
            self.layer = self.doc.get_page(page).get_layer(layer);
        }
        self.page_height = geometry.height;
    }

    fn draw_text(&mut self, run: &TextRun<'_>) {
        self.layer.set_fill_color(gray_color(run.gray));
        let face = run.font.style.face();
        let missing = get_metrics(face).missing_glyphs(run.text);
        if !missing.is_empty() {
            warn!(
                ?face,
                text = run.text,
                ?missing,
                "Font has no glyph for some characters, they are left out"
            );
        }
        let font = self.font_ref(face).clone();
        self.layer.use_text(
            run.text,
            run.font.size_pt,
            Mm(run.x),
            self.flip(run.baseline),
            &font,
        );
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), gray: u8) {
        self.layer.set_outline_color(gray_color(gray));
        self.layer.set_outline_thickness(LINE_THICKNESS_PT);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from.0), self.flip(from.1)), false),
                (Point::new(Mm(to.0), self.flip(to.1)), false),
            ],
            is_closed: false,
        });
    }

    fn draw_image(&mut self, path: &Path, x: f32, y: f32, width: f32) -> Result<(), VitaError> {
        let decoded = image::open(path).map_err(|e| VitaError::Image {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let (px_w, px_h) = decoded.dimensions();
        if px_w == 0 || px_h == 0 {
            return Err(VitaError::Image {
                path: path.to_path_buf(),
                message: "image has no pixels".to_string(),
            });
        }

        // Alpha channels are flattened; the PDF gets a plain RGB XObject.
        let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
        let natural_width_mm = px_w as f32 / IMAGE_DPI * MM_PER_INCH;
        let scale = width / natural_width_mm;
        let height = width * px_h as f32 / px_w as f32;

        Image::from_dynamic_image(&rgb).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(self.flip(y + height)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        Ok(())
    }
}
