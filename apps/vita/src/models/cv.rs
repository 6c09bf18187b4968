use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

pub const DEFAULT_END_DATE: &str = "Heute";
pub const DEFAULT_IMAGE_WIDTH_MM: f32 = 32.0;
pub const DEFAULT_SIGNATURE_WIDTH_MM: f32 = 40.0;

#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    pub name: String,
    pub title: String,
    pub address: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub birth_date: String,
    #[serde(default)]
    pub image_path: Option<PathBuf>,
    #[serde(default = "default_image_width")]
    pub image_width: f32,
    #[serde(default)]
    pub signature_path: Option<PathBuf>,
    #[serde(default = "default_signature_width")]
    pub signature_width: f32,
    #[serde(default, deserialize_with = "optional_text_or_integer")]
    pub signature_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Experience {
    #[serde(deserialize_with = "text_or_integer")]
    pub start_date: String,
    #[serde(default = "default_end_date", deserialize_with = "text_or_integer")]
    pub end_date: String,
    pub title: String,
    pub company: String,
    pub description: Vec<String>,
}

impl Experience {
    pub fn date_range(&self) -> String {
        format!("{} - {}", self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Education {
    #[serde(deserialize_with = "text_or_integer")]
    pub start_date: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub end_date: String,
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub details: Vec<String>,
}

impl Education {
    pub fn date_range(&self) -> String {
        format!("{} - {}", self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: String,
}

/// Recipient of a cover letter.
#[derive(Debug, Clone, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    /// Multi-line postal address; one printed line per line break.
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverLetter {
    pub company: Company,
    /// Subject line.
    pub title: String,
    /// Body text. Paragraphs are separated by a blank line.
    pub text: String,
}

/// Root document: everything needed to render a CV and, optionally, a cover letter.
#[derive(Debug, Clone, Deserialize)]
pub struct Cv {
    /// Accepted for compatibility with existing documents; the rendered
    /// headings and labels are fixed.
    #[serde(default)]
    pub section_titles: Option<HashMap<String, String>>,
    #[serde(default)]
    pub labels: Option<HashMap<String, String>>,
    pub person: Person,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<SkillCategory>,
    pub languages: String,
    #[serde(default)]
    pub cover_letter: Option<CoverLetter>,
}

fn default_end_date() -> String {
    DEFAULT_END_DATE.to_string()
}

fn default_image_width() -> f32 {
    DEFAULT_IMAGE_WIDTH_MM
}

fn default_signature_width() -> f32 {
    DEFAULT_SIGNATURE_WIDTH_MM
}

// ────────────────────────────────────────────────────────────────────────────
// Scalar coercion
// ────────────────────────────────────────────────────────────────────────────

/// YAML reads `2019` as an integer; dates and phone numbers are kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrInteger {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<TextOrInteger> for String {
    fn from(value: TextOrInteger) -> Self {
        match value {
            TextOrInteger::Text(s) => s,
            TextOrInteger::Signed(n) => n.to_string(),
            TextOrInteger::Unsigned(n) => n.to_string(),
        }
    }
}

fn text_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrInteger::deserialize(deserializer).map(String::from)
}

fn optional_text_or_integer<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<TextOrInteger>::deserialize(deserializer).map(|v| v.map(String::from))
}
