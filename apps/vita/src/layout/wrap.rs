//! Greedy word wrap shared by the measure pass and the draw pass.
//!
//! `Canvas::measure_multi_cell` and `Canvas::multi_cell` both call [`wrap_text`]
//! with the same font and width, which is what keeps a block's pre-computed
//! height equal to the height it actually occupies.

use crate::layout::font_metrics::FontSpec;

/// Splits `text` into printed lines no wider than `max_width` mm.
///
/// - explicit `\n` always starts a new line; an empty segment is an empty line
/// - words are separated by single spaces on output
/// - a word wider than the whole line is broken between characters
///
/// Empty input yields a single empty line (a multi-cell always occupies at least one row).
pub fn wrap_text(text: &str, font: &FontSpec, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in text.split('\n') {
        wrap_segment(segment.trim_end_matches('\r'), font, max_width, &mut lines);
    }
    lines
}

fn wrap_segment(segment: &str, font: &FontSpec, max_width: f32, out: &mut Vec<String>) {
    let space_w = font.space_width();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in segment.split_whitespace() {
        let word_w = font.measure(word);

        if !current.is_empty() && current_width + space_w + word_w > max_width {
            // Line full, start the next one.
            out.push(std::mem::take(&mut current));
            current_width = 0.0;
        }

        if current.is_empty() && word_w > max_width {
            // Word alone overflows: hard-break it, keep the remainder as the open line.
            let (full_lines, rest) = break_word(word, font, max_width);
            out.extend(full_lines);
            current_width = font.measure(&rest);
            current = rest;
            continue;
        }

        if current.is_empty() {
            current_width = word_w;
            current.push_str(word);
        } else {
            current_width += space_w + word_w;
            current.push(' ');
            current.push_str(word);
        }
    }

    // Push the final (possibly partial or empty) line.
    out.push(current);
}

/// Breaks an over-long word into full-width chunks plus a trailing remainder.
fn break_word(word: &str, font: &FontSpec, max_width: f32) -> (Vec<String>, String) {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let mut buf = [0u8; 4];
        let char_w = font.measure(c.encode_utf8(&mut buf));
        // Always keep at least one char per line so a tiny width cannot loop forever.
        if !current.is_empty() && width + char_w > max_width {
            chunks.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(c);
        width += char_w;
    }
    (chunks, current)
}

/// Number of printed lines `text` occupies at `max_width`.
pub fn line_count(text: &str, font: &FontSpec, max_width: f32) -> usize {
    wrap_text(text, font, max_width).len()
}
