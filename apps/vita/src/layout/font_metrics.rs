//! Glyph widths for the two embedded faces (DejaVu Sans / DejaVu Sans Bold).
//!
//! Widths are in em units (relative to font size) and are read from the same
//! TTF bytes the PDF embeds. ASCII 0x20..=0x7E is cached in a 95-slot table
//! per face, index = (char as usize) - 32; everything else is looked up in
//! the face directly.
//!
//! Characters the face has no glyph for are not drawn by the PDF writer, so
//! they measure as zero width here. Measuring and drawing therefore always
//! agree, and a wrapped block is exactly as tall as its measurement says.

use std::sync::OnceLock;

use tracing::error;

pub const MM_PER_PT: f32 = 25.4 / 72.0;

pub const REGULAR_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
pub const BOLD_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Per-character width used if an embedded face cannot be parsed.
const UNIFORM_WIDTH: f32 = 0.55;

// ────────────────────────────────────────────────────────────────────────────
// Font style
// ────────────────────────────────────────────────────────────────────────────

/// Style requested by the layout code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    /// There are no italic glyphs; rendered with the regular face.
    Italic,
}

/// The physical face that actually gets embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Regular,
    Bold,
}

impl FontStyle {
    pub fn face(self) -> Face {
        match self {
            FontStyle::Regular | FontStyle::Italic => Face::Regular,
            FontStyle::Bold => Face::Bold,
        }
    }
}

impl Face {
    /// TrueType data embedded into every generated PDF.
    pub fn ttf_bytes(self) -> &'static [u8] {
        match self {
            Face::Regular => REGULAR_TTF,
            Face::Bold => BOLD_TTF,
        }
    }
}

/// Current font selection: style plus size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub style: FontStyle,
    pub size_pt: f32,
}

impl FontSpec {
    pub const fn new(style: FontStyle, size_pt: f32) -> Self {
        Self { style, size_pt }
    }

    pub fn size_mm(&self) -> f32 {
        self.size_pt * MM_PER_PT
    }

    /// Rendered width of `s` in millimetres.
    pub fn measure(&self, s: &str) -> f32 {
        get_metrics(self.style.face()).measure_str(s) * self.size_mm()
    }

    pub fn space_width(&self) -> f32 {
        get_metrics(self.style.face()).space_width * self.size_mm()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Character widths for one face.
///
/// ASCII slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub face: Face,
    ascii: [f32; 95],
    /// `None` only when the embedded bytes failed to parse.
    parsed: Option<ttf_parser::Face<'static>>,
    pub space_width: f32,
}

impl FontMetricTable {
    fn load(face: Face) -> Self {
        match ttf_parser::Face::parse(face.ttf_bytes(), 0) {
            Ok(parsed) => Self::from_ttf(face, parsed),
            Err(err) => {
                error!(?face, error = %err, "Cannot parse embedded font, using uniform widths");
                Self {
                    face,
                    ascii: [UNIFORM_WIDTH; 95],
                    parsed: None,
                    space_width: UNIFORM_WIDTH,
                }
            }
        }
    }

    fn from_ttf(face: Face, parsed: ttf_parser::Face<'static>) -> Self {
        let mut ascii = [0.0; 95];
        for (slot, code) in ascii.iter_mut().zip(32u8..=126) {
            *slot = glyph_advance(&parsed, char::from(code)).unwrap_or(0.0);
        }
        Self {
            face,
            space_width: ascii[0],
            ascii,
            parsed: Some(parsed),
        }
    }

    /// Width of a single character in em units; zero when the face lacks it.
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.ascii[code - 32];
        }
        match &self.parsed {
            Some(parsed) => glyph_advance(parsed, c).unwrap_or(0.0),
            None => UNIFORM_WIDTH,
        }
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Characters of `s` the face cannot draw, in order of appearance.
    pub fn missing_glyphs(&self, s: &str) -> Vec<char> {
        let Some(parsed) = &self.parsed else {
            return Vec::new();
        };
        s.chars()
            .filter(|c| !c.is_control() && parsed.glyph_index(*c).is_none())
            .collect()
    }
}

fn glyph_advance(face: &ttf_parser::Face<'_>, c: char) -> Option<f32> {
    let glyph = face.glyph_index(c)?;
    let advance = face.glyph_hor_advance(glyph)?;
    Some(f32::from(advance) / f32::from(face.units_per_em()))
}

static REGULAR_METRICS: OnceLock<FontMetricTable> = OnceLock::new();
static BOLD_METRICS: OnceLock<FontMetricTable> = OnceLock::new();

/// Returns the metric table for a face, parsing the embedded font on first use.
pub fn get_metrics(face: Face) -> &'static FontMetricTable {
    let cell = match face {
        Face::Regular => &REGULAR_METRICS,
        Face::Bold => &BOLD_METRICS,
    };
    cell.get_or_init(|| FontMetricTable::load(face))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
