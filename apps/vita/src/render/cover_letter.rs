//! Cover-letter layout: sender, recipient, date, subject, body, closing.

use std::path::Path;

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::errors::VitaError;
use crate::layout::{Advance, Align, Canvas, FontStyle, LayoutContext, PageGeometry, Surface, BLACK};
use crate::models::{CoverLetter, Cv};
use crate::render::pdf::PdfSurface;
use crate::render::{draw_signature, existing_asset, MUTED_GRAY, RULE_GRAY};

const SIDE_MARGIN_MM: f32 = 20.0;
const TOP_MARGIN_MM: f32 = 10.0;

const SMALL_ROW_H: f32 = 4.0;
const LINE_H: f32 = 5.0;
const PARAGRAPH_GAP: f32 = 2.5;
const UNSIGNED_GAP: f32 = 10.0;

const CLOSING_DE: &str = "Mit freundlichen Grüßen,";
const CLOSING_EN: &str = "Best regards,";

/// Result of a cover-letter render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverLetterOutcome {
    Rendered,
    /// The CV has no `cover_letter` section; nothing was drawn or written.
    NoCoverLetter,
}

pub struct CoverLetterRenderer<'a> {
    cv: &'a Cv,
    today: NaiveDate,
}

impl<'a> CoverLetterRenderer<'a> {
    /// `today` is printed when the person has no `signature_date`.
    pub fn new(cv: &'a Cv, today: NaiveDate) -> Self {
        Self { cv, today }
    }

    pub fn geometry() -> PageGeometry {
        PageGeometry::a4(SIDE_MARGIN_MM, TOP_MARGIN_MM, SIDE_MARGIN_MM)
    }

    pub fn render<S: Surface>(&self, canvas: &mut Canvas<S>) -> Result<CoverLetterOutcome, VitaError> {
        let Some(letter) = self.cv.cover_letter.as_ref() else {
            return Ok(CoverLetterOutcome::NoCoverLetter);
        };

        let mut ctx = LayoutContext::new(canvas.geometry());
        canvas.add_page(&mut ctx);
        canvas.set_draw_gray(RULE_GRAY);

        self.emit_sender(canvas, &mut ctx)?;
        emit_recipient(canvas, &mut ctx, letter);
        self.emit_date(canvas, &mut ctx);
        emit_subject(canvas, &mut ctx, &letter.title);
        emit_body(canvas, &mut ctx, &letter.text);
        self.emit_closing(canvas, &mut ctx)?;
        Ok(CoverLetterOutcome::Rendered)
    }

    fn emit_sender<S: Surface>(
        &self,
        canvas: &mut Canvas<S>,
        ctx: &mut LayoutContext,
    ) -> Result<(), VitaError> {
        let person = &self.cv.person;
        if let Some(image) = existing_asset(person.image_path.as_deref()) {
            let width = person.image_width;
            let x = canvas.geometry().right_edge() - width;
            canvas.image(image, x, TOP_MARGIN_MM, width)?;
        }

        ctx.set_y(TOP_MARGIN_MM);
        canvas.set_font(FontStyle::Bold, 11.0);
        canvas.cell(ctx, 0.0, LINE_H, &person.name, Align::Left, Advance::NextLine);

        canvas.set_font(FontStyle::Regular, 9.0);
        canvas.set_text_gray(MUTED_GRAY);
        for part in person.address.split(',') {
            canvas.cell(ctx, 0.0, SMALL_ROW_H, part.trim(), Align::Left, Advance::NextLine);
        }
        canvas.cell(ctx, 0.0, SMALL_ROW_H, &person.email, Align::Left, Advance::NextLine);
        canvas.cell(ctx, 0.0, SMALL_ROW_H, &person.phone, Align::Left, Advance::NextLine);
        canvas.set_text_gray(BLACK);
        ctx.ln(3.0);
        Ok(())
    }

    fn emit_date<S: Surface>(&self, canvas: &mut Canvas<S>, ctx: &mut LayoutContext) {
        ctx.ln(3.0);
        let date = letter_date(self.cv.person.signature_date.as_deref(), self.today);
        canvas.cell(ctx, 0.0, SMALL_ROW_H, &date, Align::Right, Advance::NextLine);
        ctx.ln(3.0);
    }

    fn emit_closing<S: Surface>(
        &self,
        canvas: &mut Canvas<S>,
        ctx: &mut LayoutContext,
    ) -> Result<(), VitaError> {
        let person = &self.cv.person;
        ctx.ln(5.0);
        canvas.cell(ctx, 0.0, LINE_H, closing_phrase(&self.cv.languages), Align::Left, Advance::NextLine);
        ctx.ln(3.0);

        match existing_asset(person.signature_path.as_deref()) {
            Some(signature) => {
                let width = person.signature_width;
                draw_signature(canvas, ctx, signature, width, width / 2.0 - 10.0, &person.name)
            }
            None => {
                ctx.ln(UNSIGNED_GAP);
                canvas.cell(ctx, 0.0, LINE_H, &person.name, Align::Left, Advance::NextLine);
                Ok(())
            }
        }
    }
}

/// Renders the cover letter of `cv` to `output`.
///
/// Writes nothing and returns [`CoverLetterOutcome::NoCoverLetter`] when the
/// CV carries no cover letter.
pub fn render_cover_letter(cv: &Cv, output: &Path) -> Result<CoverLetterOutcome, VitaError> {
    if cv.cover_letter.is_none() {
        info!("No cover letter data found in CV configuration");
        return Ok(CoverLetterOutcome::NoCoverLetter);
    }

    let geometry = CoverLetterRenderer::geometry();
    let surface = PdfSurface::new(&format!("Cover letter {}", cv.person.name), &geometry)?;
    let mut canvas = Canvas::new(surface, geometry);
    let outcome = CoverLetterRenderer::new(cv, Local::now().date_naive()).render(&mut canvas)?;
    info!(pages = canvas.page_count(), "Laid out cover letter");
    canvas.into_surface().save(output)?;
    Ok(outcome)
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks without person state
// ────────────────────────────────────────────────────────────────────────────

fn emit_recipient<S: Surface>(canvas: &mut Canvas<S>, ctx: &mut LayoutContext, letter: &CoverLetter) {
    ctx.ln(3.0);
    canvas.set_font(FontStyle::Regular, 9.0);

    let company = &letter.company;
    canvas.cell(ctx, 0.0, SMALL_ROW_H, &company.name, Align::Left, Advance::NextLine);
    if let Some(contact) = company.contact_person.as_deref().filter(|c| !c.is_empty()) {
        canvas.cell(ctx, 0.0, SMALL_ROW_H, contact, Align::Left, Advance::NextLine);
    }
    for line in company.address.split('\n') {
        canvas.cell(ctx, 0.0, SMALL_ROW_H, line.trim(), Align::Left, Advance::NextLine);
    }
}

fn emit_subject<S: Surface>(canvas: &mut Canvas<S>, ctx: &mut LayoutContext, title: &str) {
    ctx.ln(2.0);
    canvas.set_font(FontStyle::Bold, 11.0);
    canvas.cell(ctx, 0.0, 6.0, title, Align::Left, Advance::NextLine);
    ctx.ln(8.0);
}

/// Paragraphs are separated by a blank line in the source text.
fn emit_body<S: Surface>(canvas: &mut Canvas<S>, ctx: &mut LayoutContext, text: &str) {
    canvas.set_font(FontStyle::Regular, 10.0);
    ctx.set_x(ctx.left_margin());
    for paragraph in text.split("\n\n") {
        canvas.multi_cell(ctx, 0.0, LINE_H, paragraph.trim());
        ctx.ln(PARAGRAPH_GAP);
    }
}

/// English closing only for English-only letters. The check is
/// case-insensitive for "english" but case-sensitive for "German".
pub fn closing_phrase(languages: &str) -> &'static str {
    if languages.to_lowercase().contains("english") && !languages.contains("German") {
        CLOSING_EN
    } else {
        CLOSING_DE
    }
}

/// `signature_date` when set, otherwise `today` as e.g. "05. March 2025".
pub fn letter_date(signature_date: Option<&str>, today: NaiveDate) -> String {
    match signature_date.filter(|d| !d.is_empty()) {
        Some(date) => date.to_string(),
        None => today.format("%d. %B %Y").to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::recording::RecordingSurface;
    use crate::render::test_support::{cover_letter, minimal_cv};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
    }

    fn letter_cv() -> Cv {
        let mut cv = minimal_cv();
        cv.cover_letter = Some(cover_letter());
        cv
    }

    fn render(cv: &Cv) -> (CoverLetterOutcome, RecordingSurface) {
        let mut canvas = Canvas::new(RecordingSurface::default(), CoverLetterRenderer::geometry());
        let outcome = CoverLetterRenderer::new(cv, today()).render(&mut canvas).unwrap();
        (outcome, canvas.into_surface())
    }

    // ── closing phrase ──────────────────────────────────────────────────────

    #[test]
    fn test_closing_phrase_mixed_languages_is_german() {
        assert_eq!(closing_phrase("German, English"), CLOSING_DE);
    }

    #[test]
    fn test_closing_phrase_english_only() {
        assert_eq!(closing_phrase("English"), CLOSING_EN);
        assert_eq!(closing_phrase("english (C1)"), CLOSING_EN);
    }

    #[test]
    fn test_closing_phrase_german_check_is_case_sensitive() {
        assert_eq!(closing_phrase("english and German"), CLOSING_DE);
        assert_eq!(closing_phrase("english and german"), CLOSING_EN);
        assert_eq!(closing_phrase("Deutsch"), CLOSING_DE);
        assert_eq!(closing_phrase(""), CLOSING_DE);
    }

    // ── date ────────────────────────────────────────────────────────────────

    #[test]
    fn test_letter_date_prefers_signature_date() {
        assert_eq!(letter_date(Some("Berlin, 1. April 2025"), today()), "Berlin, 1. April 2025");
    }

    #[test]
    fn test_letter_date_falls_back_to_today() {
        assert_eq!(letter_date(None, today()), "05. March 2025");
        assert_eq!(letter_date(Some(""), today()), "05. March 2025");
    }

    // ── layout ──────────────────────────────────────────────────────────────

    #[test]
    fn test_no_cover_letter_draws_nothing() {
        let (outcome, surface) = render(&minimal_cv());
        assert_eq!(outcome, CoverLetterOutcome::NoCoverLetter);
        assert_eq!(surface.page_count(), 0);
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_block_order() {
        let (outcome, surface) = render(&letter_cv());
        assert_eq!(outcome, CoverLetterOutcome::Rendered);
        let texts = surface.texts();
        let expected = vec![
            "Erika Mustermann",
            "Hauptstraße 1",
            "10115 Berlin",
            "erika@example.com",
            "+49 30 1234567",
            "Beispiel AG",
            "Frau Schmidt",
            "Musterweg 5",
            "80331 München",
            "05. March 2025",
            "Bewerbung als Backend Engineer",
            "Sehr geehrte Frau Schmidt,",
            "hiermit bewerbe ich mich.",
            "Ich freue mich auf Ihre Antwort.",
            CLOSING_DE,
            "Erika Mustermann",
        ];
        assert_eq!(texts, expected);
        assert_eq!(surface.page_count(), 1);
    }

    #[test]
    fn test_sender_details_are_muted() {
        let (_, surface) = render(&letter_cv());
        assert_eq!(surface.find_text("Erika Mustermann").unwrap().gray, BLACK);
        assert_eq!(surface.find_text("erika@example.com").unwrap().gray, MUTED_GRAY);
        assert_eq!(surface.find_text("Beispiel AG").unwrap().gray, BLACK);
    }

    #[test]
    fn test_date_is_right_aligned() {
        let (_, surface) = render(&letter_cv());
        let run = surface.find_text("05. March 2025").unwrap();
        let width = run.font.measure("05. March 2025");
        assert!((run.x + width - (210.0 - SIDE_MARGIN_MM - 1.0)).abs() < 1e-3);
    }

    #[test]
    fn test_empty_contact_person_is_skipped() {
        let mut cv = letter_cv();
        if let Some(letter) = cv.cover_letter.as_mut() {
            letter.company.contact_person = Some(String::new());
        }
        let (_, surface) = render(&cv);
        let texts = surface.texts();
        let company = texts.iter().position(|t| *t == "Beispiel AG").unwrap();
        assert_eq!(texts[company + 1], "Musterweg 5");
    }

    #[test]
    fn test_paragraph_spacing() {
        let (_, surface) = render(&letter_cv());
        let first = surface.find_text("Sehr geehrte Frau Schmidt,").unwrap().baseline;
        let second = surface.find_text("hiermit bewerbe ich mich.").unwrap().baseline;
        assert!((second - first - (LINE_H + PARAGRAPH_GAP)).abs() < 1e-3);
    }

    #[test]
    fn test_unsigned_letter_ends_with_name_below_gap() {
        let (_, surface) = render(&letter_cv());
        let runs = surface.text_runs();
        let closing = runs[runs.len() - 2];
        let name = runs[runs.len() - 1];
        assert_eq!(closing.text, CLOSING_DE);
        assert!((name.baseline - closing.baseline - (LINE_H + 3.0 + UNSIGNED_GAP)).abs() < 1e-3);
        assert!((name.x - (SIDE_MARGIN_MM + 1.0)).abs() < 1e-3);
        assert!(surface.lines().is_empty());
    }

    #[test]
    fn test_signed_letter_draws_signature_block() {
        let signature = tempfile::NamedTempFile::new().unwrap();
        let mut cv = letter_cv();
        cv.person.signature_path = Some(signature.path().to_path_buf());
        cv.person.signature_width = 40.0;
        let (_, surface) = render(&cv);

        let images = surface.images();
        assert_eq!(images.len(), 1);
        let (_, x, y, width) = &images[0];
        assert_eq!(*x, SIDE_MARGIN_MM);
        assert_eq!(*width, 40.0);

        let lines = surface.lines();
        assert_eq!(lines.len(), 1);
        let (from, to) = lines[0];
        assert!((from.1 - (y + 40.0 / 2.0 - 10.0)).abs() < 1e-3);
        assert!((to.0 - from.0 - 40.0).abs() < 1e-3);
        assert_eq!(surface.texts().last(), Some(&"Erika Mustermann"));
    }

    #[test]
    fn test_english_letter_uses_english_closing() {
        let mut cv = letter_cv();
        cv.languages = "English (native)".to_string();
        let (_, surface) = render(&cv);
        assert!(surface.find_text(CLOSING_EN).is_some());
    }

    #[test]
    fn test_render_cover_letter_without_letter_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cl_minimal.pdf");
        let outcome = render_cover_letter(&minimal_cv(), &out).unwrap();
        assert_eq!(outcome, CoverLetterOutcome::NoCoverLetter);
        assert!(!out.exists());
    }

    #[test]
    fn test_render_cover_letter_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cl_minimal.pdf");
        let outcome = render_cover_letter(&letter_cv(), &out).unwrap();
        assert_eq!(outcome, CoverLetterOutcome::Rendered);
        assert!(std::fs::read(&out).unwrap().starts_with(b"%PDF"));
    }
}
