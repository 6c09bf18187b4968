//! CV layout: header, contact block, work history, education, skills, signature.
//!
//! # Pagination
//! Experience and education entries are measured before they are drawn
//! (`*_block_height`) and moved to a fresh page as a whole when they would
//! cross the page-break trigger. Section titles, skill categories, the
//! languages block and the signature use fixed look-ahead heights instead.
//! Everything else relies on the canvas' per-line auto page break.

use std::path::Path;

use tracing::{debug, info};

use crate::errors::VitaError;
use crate::layout::{Advance, Align, Canvas, FontStyle, LayoutContext, PageGeometry, Surface, BLACK};
use crate::models::{Cv, Education, Experience, SkillCategory};
use crate::render::pdf::PdfSurface;
use crate::render::{draw_signature, existing_asset, MUTED_GRAY, RULE_GRAY};

pub const EXPERIENCE_TITLE: &str = "BERUFLICHE LAUFBAHN";
pub const EDUCATION_TITLE: &str = "AUSBILDUNG";
pub const SKILLS_TITLE: &str = "KENNTNISSE & SKILLS";
pub const LANGUAGES_LABEL: &str = "Sprachen";
pub const BORN_LABEL: &str = "Geboren am";

const BULLET: &str = "•";

const MARGIN_MM: f32 = 10.0;
const HEADER_IMAGE_TOP: f32 = 10.0;

/// Row height of single-line entry cells (dates, titles, company).
const ROW_H: f32 = 6.0;
/// Line height of wrapped body text.
const LINE_H: f32 = 5.0;

/// Room a section title needs below it so it is not orphaned.
const SECTION_LOOKAHEAD: f32 = 30.0;
/// Date + title + company rows.
const ENTRY_HEADER_H: f32 = 18.0;
const ENTRY_TRAILING_SPACE: f32 = 3.0;
const COMPANY_GAP: f32 = 4.0;
/// Below this y the cursor counts as "top of page" and the company gap is dropped.
const PAGE_TOP_THRESHOLD: f32 = 30.0;

const BULLET_OFFSET: f32 = 2.0;
const BULLET_CELL_W: f32 = 4.0;
const BULLET_INDENT: f32 = 6.0;

const SKILL_LOOKAHEAD: f32 = 20.0;
const LANGUAGES_LOOKAHEAD: f32 = 15.0;

pub struct CvRenderer<'a> {
    cv: &'a Cv,
}

impl<'a> CvRenderer<'a> {
    pub fn new(cv: &'a Cv) -> Self {
        Self { cv }
    }

    pub fn geometry() -> PageGeometry {
        PageGeometry::a4(MARGIN_MM, MARGIN_MM, MARGIN_MM)
    }

    /// Lays the whole CV out onto `canvas`, starting with a fresh page.
    pub fn render<S: Surface>(&self, canvas: &mut Canvas<S>) -> Result<(), VitaError> {
        let cv = self.cv;
        let mut ctx = LayoutContext::new(canvas.geometry());
        canvas.add_page(&mut ctx);
        canvas.set_font(FontStyle::Regular, 11.0);
        canvas.set_draw_gray(RULE_GRAY);

        self.emit_header(canvas, &mut ctx)?;
        self.emit_contact_info(canvas, &mut ctx);

        emit_section_title(canvas, &mut ctx, EXPERIENCE_TITLE);
        let mut prev_company: Option<&str> = None;
        for exp in &cv.experiences {
            emit_experience(canvas, &mut ctx, exp, prev_company);
            prev_company = Some(exp.company.as_str());
        }

        ctx.ln(5.0);
        emit_section_title(canvas, &mut ctx, EDUCATION_TITLE);
        for edu in &cv.education {
            emit_education(canvas, &mut ctx, edu);
        }

        ctx.ln(5.0);
        emit_section_title(canvas, &mut ctx, SKILLS_TITLE);
        emit_skills(canvas, &mut ctx, &cv.skills, &cv.languages);

        ctx.ln(10.0);
        self.emit_signature(canvas, &mut ctx)
    }

    fn emit_header<S: Surface>(
        &self,
        canvas: &mut Canvas<S>,
        ctx: &mut LayoutContext,
    ) -> Result<(), VitaError> {
        let person = &self.cv.person;
        if let Some(image) = existing_asset(person.image_path.as_deref()) {
            let width = person.image_width;
            let x = canvas.geometry().right_edge() - width;
            canvas.image(image, x, HEADER_IMAGE_TOP, width)?;
        }

        canvas.set_font(FontStyle::Bold, 24.0);
        canvas.cell(ctx, 0.0, 10.0, &person.name, Align::Left, Advance::NextLine);

        canvas.set_font(FontStyle::Bold, 14.0);
        canvas.set_text_gray(MUTED_GRAY);
        canvas.cell(ctx, 0.0, 10.0, &person.title, Align::Left, Advance::NextLine);
        canvas.set_text_gray(BLACK);
        ctx.ln(5.0);
        Ok(())
    }

    fn emit_contact_info<S: Surface>(&self, canvas: &mut Canvas<S>, ctx: &mut LayoutContext) {
        let person = &self.cv.person;
        canvas.set_font(FontStyle::Regular, 10.0);
        let info = format!(
            "{}\n{} | {}\n{}\n{} {}",
            person.address,
            person.phone,
            person.email,
            person.linkedin,
            BORN_LABEL,
            person.birth_date
        );
        canvas.multi_cell(ctx, 0.0, LINE_H, &info);
        ctx.ln(5.0);

        let (left, right) = (canvas.geometry().left_margin, canvas.geometry().right_edge());
        canvas.line(left, ctx.y, right, ctx.y);
        ctx.ln(5.0);
    }

    /// Drawn only when the signature file exists; the CV has no textual fallback.
    fn emit_signature<S: Surface>(
        &self,
        canvas: &mut Canvas<S>,
        ctx: &mut LayoutContext,
    ) -> Result<(), VitaError> {
        let person = &self.cv.person;
        let Some(signature) = existing_asset(person.signature_path.as_deref()) else {
            return Ok(());
        };

        let width = person.signature_width;
        canvas.ensure_room(ctx, width / 2.0 + 15.0);
        draw_signature(canvas, ctx, signature, width, width / 2.0 + 2.0, &person.name)
    }
}

/// Renders `cv` and writes the PDF to `output`.
pub fn render_cv(cv: &Cv, output: &Path) -> Result<(), VitaError> {
    let geometry = CvRenderer::geometry();
    let surface = PdfSurface::new(&format!("CV {}", cv.person.name), &geometry)?;
    let mut canvas = Canvas::new(surface, geometry);
    CvRenderer::new(cv).render(&mut canvas)?;
    info!(pages = canvas.page_count(), "Laid out CV");
    canvas.into_surface().save(output)
}

// ────────────────────────────────────────────────────────────────────────────
// Block emitters
// ────────────────────────────────────────────────────────────────────────────

fn emit_section_title<S: Surface>(canvas: &mut Canvas<S>, ctx: &mut LayoutContext, title: &str) {
    canvas.ensure_room(ctx, SECTION_LOOKAHEAD);
    canvas.set_font(FontStyle::Bold, 16.0);
    canvas.cell(ctx, 0.0, 8.0, title, Align::Left, Advance::NextLine);
    ctx.ln(2.0);
}

/// Whether the extra gap between two experiences is inserted.
pub(crate) fn company_gap_applies(prev_company: Option<&str>, company: &str, cursor_y: f32) -> bool {
    company_changed(prev_company, company) && cursor_y > PAGE_TOP_THRESHOLD
}

fn company_changed(prev_company: Option<&str>, company: &str) -> bool {
    prev_company.is_some_and(|prev| prev != company)
}

/// Height an experience entry will occupy, measured with the body font.
pub(crate) fn experience_block_height<S: Surface>(
    canvas: &mut Canvas<S>,
    exp: &Experience,
    prev_company: Option<&str>,
) -> f32 {
    canvas.set_font(FontStyle::Regular, 11.0);
    let mut height = ENTRY_HEADER_H + measure_bullets(canvas, &exp.description) + ENTRY_TRAILING_SPACE;
    if company_changed(prev_company, &exp.company) {
        height += COMPANY_GAP;
    }
    height
}

/// Height an education entry will occupy, measured with the body font.
pub(crate) fn education_block_height<S: Surface>(canvas: &mut Canvas<S>, edu: &Education) -> f32 {
    canvas.set_font(FontStyle::Regular, 11.0);
    ENTRY_HEADER_H + measure_bullets(canvas, &edu.details) + ENTRY_TRAILING_SPACE
}

fn emit_experience<S: Surface>(
    canvas: &mut Canvas<S>,
    ctx: &mut LayoutContext,
    exp: &Experience,
    prev_company: Option<&str>,
) {
    let height = experience_block_height(canvas, exp, prev_company);
    if canvas.ensure_room(ctx, height) {
        debug!(page = ctx.page(), company = %exp.company, "Moved experience to next page");
    }

    if company_gap_applies(prev_company, &exp.company, ctx.y) {
        ctx.ln(COMPANY_GAP);
    }

    canvas.set_font(FontStyle::Bold, 11.0);
    canvas.cell(ctx, 0.0, ROW_H, &exp.date_range(), Align::Left, Advance::NextLine);

    canvas.set_font(FontStyle::Bold, 12.0);
    canvas.cell(ctx, 0.0, ROW_H, &exp.title.to_uppercase(), Align::Left, Advance::NextLine);

    // Printed for every entry, including repeats of the previous company.
    canvas.set_font(FontStyle::Italic, 11.0);
    canvas.cell(ctx, 0.0, ROW_H, &exp.company, Align::Left, Advance::NextLine);
    ctx.ln(1.0);

    canvas.set_font(FontStyle::Regular, 11.0);
    emit_bullets(canvas, ctx, &exp.description);
    ctx.ln(2.0);
}

fn emit_education<S: Surface>(canvas: &mut Canvas<S>, ctx: &mut LayoutContext, edu: &Education) {
    let height = education_block_height(canvas, edu);
    if canvas.ensure_room(ctx, height) {
        debug!(page = ctx.page(), institution = %edu.institution, "Moved education entry to next page");
    }

    canvas.set_font(FontStyle::Bold, 11.0);
    canvas.cell(ctx, 0.0, ROW_H, &edu.date_range(), Align::Left, Advance::NextLine);

    canvas.set_font(FontStyle::Bold, 12.0);
    canvas.cell(ctx, 0.0, ROW_H, &edu.degree.to_uppercase(), Align::Left, Advance::NextLine);

    canvas.set_font(FontStyle::Italic, 11.0);
    canvas.cell(ctx, 0.0, ROW_H, &edu.institution, Align::Left, Advance::NextLine);

    canvas.set_font(FontStyle::Regular, 11.0);
    emit_bullets(canvas, ctx, &edu.details);
    ctx.ln(3.0);
}

fn emit_skills<S: Surface>(
    canvas: &mut Canvas<S>,
    ctx: &mut LayoutContext,
    skills: &[SkillCategory],
    languages: &str,
) {
    canvas.set_font(FontStyle::Bold, 11.0);
    for category in skills {
        canvas.ensure_room(ctx, SKILL_LOOKAHEAD);
        canvas.cell(ctx, 0.0, ROW_H, &category.name, Align::Left, Advance::NextLine);
        canvas.set_font(FontStyle::Regular, 11.0);
        canvas.multi_cell(ctx, 0.0, LINE_H, &category.skills);
        ctx.ln(2.0);
        canvas.set_font(FontStyle::Bold, 11.0);
    }

    canvas.ensure_room(ctx, LANGUAGES_LOOKAHEAD);
    canvas.cell(ctx, 0.0, ROW_H, LANGUAGES_LABEL, Align::Left, Advance::NextLine);
    canvas.set_font(FontStyle::Regular, 11.0);
    canvas.multi_cell(ctx, 0.0, LINE_H, languages);
}

/// Bullet glyph in a narrow cell, then the text with a hanging indent.
fn emit_bullets<S: Surface>(canvas: &mut Canvas<S>, ctx: &mut LayoutContext, items: &[String]) {
    for item in items {
        ctx.set_x(ctx.left_margin() + BULLET_OFFSET);
        canvas.cell(ctx, BULLET_CELL_W, LINE_H, BULLET, Align::Left, Advance::Right);

        let indent = ctx.left_margin() + BULLET_INDENT;
        ctx.with_left_margin(indent, |ctx| {
            canvas.multi_cell(ctx, 0.0, LINE_H, item.trim());
        });
    }
}

/// Same column width `emit_bullets` ends up with at the base margin.
fn measure_bullets<S: Surface>(canvas: &Canvas<S>, items: &[String]) -> f32 {
    let width = canvas.geometry().content_width() - BULLET_INDENT;
    items
        .iter()
        .map(|item| canvas.measure_multi_cell(width, LINE_H, item.trim()))
        .sum()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
