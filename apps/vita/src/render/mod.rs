// Document renderers. Each one lays a `Cv` out onto a `Canvas`; the
// `render_*` functions wire that canvas to a PDF file.

pub mod cover_letter;
pub mod cv;
pub mod pdf;

use std::path::Path;

use crate::errors::VitaError;
use crate::layout::{Advance, Align, Canvas, FontStyle, LayoutContext, Surface};

pub use cover_letter::{render_cover_letter, CoverLetterOutcome};
pub use cv::render_cv;

/// Light grey for dividers and signature lines.
pub(crate) const RULE_GRAY: u8 = 200;
/// Grey for secondary text (job title, sender details).
pub(crate) const MUTED_GRAY: u8 = 100;

/// `path` if it is set and points at an existing file.
///
/// Missing assets are reported by the CLI before rendering; here they are just skipped.
pub(crate) fn existing_asset(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.exists())
}

/// Signature image at the left margin, a rule of the same width `drop` mm
/// further down, and the name centred beneath it.
pub(crate) fn draw_signature<S: Surface>(
    canvas: &mut Canvas<S>,
    ctx: &mut LayoutContext,
    image: &Path,
    width: f32,
    drop: f32,
    name: &str,
) -> Result<(), VitaError> {
    let x = ctx.left_margin();
    canvas.image(image, x, ctx.y, width)?;
    ctx.ln(drop);
    canvas.line(x, ctx.y, x + width, ctx.y);
    ctx.ln(2.0);
    canvas.set_font(FontStyle::Regular, 10.0);
    canvas.cell(ctx, width, 5.0, name, Align::Center, Advance::NextLine);
    Ok(())
}
