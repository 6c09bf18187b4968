//! Command-line surface: flag parsing, per-config overrides and the
//! single-file / batch dispatch loop.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::errors::VitaError;
use crate::loader::load_cv_data;
use crate::models::Cv;
use crate::output::{batch_outputs, discover_configs, single_outputs, OutputPaths};
use crate::render::{render_cover_letter, render_cv, CoverLetterOutcome};

#[derive(Parser, Debug)]
#[command(name = "vita", version)]
#[command(about = "Generate a CV PDF and/or cover letter from YAML", long_about = None)]
pub struct Args {
    /// Output PDF path (single config) or output directory (batch)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to the YAML configuration file or directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to an override profile image
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Width of the profile image in mm
    #[arg(long, value_parser = parse_width)]
    pub image_width: Option<f32>,

    /// Path to an override signature image
    #[arg(long)]
    pub signature: Option<PathBuf>,

    /// Width of the signature image in mm
    #[arg(long, value_parser = parse_width)]
    pub signature_width: Option<f32>,

    /// Type of document to generate
    #[arg(long = "type", value_enum, default_value_t = DocumentKind::Both)]
    pub kind: DocumentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentKind {
    Cv,
    #[value(name = "cover_letter", alias = "cover-letter")]
    CoverLetter,
    Both,
}

impl DocumentKind {
    fn includes_cv(self) -> bool {
        matches!(self, DocumentKind::Cv | DocumentKind::Both)
    }

    fn includes_cover_letter(self) -> bool {
        matches!(self, DocumentKind::CoverLetter | DocumentKind::Both)
    }
}

fn parse_width(raw: &str) -> Result<f32, String> {
    let width: f32 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if width.is_finite() && width > 0.0 {
        Ok(width)
    } else {
        Err(format!("width must be a positive number of millimetres, got {raw}"))
    }
}

/// Person fields replaced from the command line after loading.
#[derive(Debug, Clone, Default)]
pub struct AssetOverrides {
    pub image: Option<PathBuf>,
    pub image_width: Option<f32>,
    pub signature: Option<PathBuf>,
    pub signature_width: Option<f32>,
}

impl AssetOverrides {
    pub fn from_args(args: &Args) -> Self {
        Self {
            image: args.image.clone(),
            image_width: args.image_width,
            signature: args.signature.clone(),
            signature_width: args.signature_width,
        }
    }

    pub fn apply(&self, cv: &mut Cv) {
        let person = &mut cv.person;
        if let Some(image) = &self.image {
            person.image_path = Some(image.clone());
        }
        if let Some(width) = self.image_width {
            person.image_width = width;
        }
        if let Some(signature) = &self.signature {
            person.signature_path = Some(signature.clone());
        }
        if let Some(width) = self.signature_width {
            person.signature_width = width;
        }
    }
}

/// Configured assets that do not exist on disk. Rendering skips them.
pub fn missing_assets(cv: &Cv) -> Vec<(&'static str, &Path)> {
    let person = &cv.person;
    [
        ("Image", person.image_path.as_deref()),
        ("Signature", person.signature_path.as_deref()),
    ]
    .into_iter()
    .filter_map(|(kind, path)| path.filter(|p| !p.exists()).map(|p| (kind, p)))
    .collect()
}

/// What happened to one config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileReport {
    pub cv_written: bool,
    pub cover_letter_written: bool,
    /// A cover letter was requested but the document has no `cover_letter` section.
    pub cover_letter_missing: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub cvs_written: usize,
    pub cover_letters_written: usize,
}

impl BatchSummary {
    fn record(&mut self, report: FileReport) {
        self.processed += 1;
        self.cvs_written += usize::from(report.cv_written);
        self.cover_letters_written += usize::from(report.cover_letter_written);
    }
}

/// Runs one invocation. Flags win over the environment defaults in `config`.
///
/// In batch mode a failing config is logged and skipped; with a single config
/// its error is returned.
pub fn run(args: &Args, config: &Config) -> Result<BatchSummary> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config.default_config_path.clone());
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.default_output_path.clone());
    let overrides = AssetOverrides::from_args(args);

    let configs = discover_configs(&config_path)
        .with_context(|| format!("Failed to read config directory {}", config_path.display()))?;
    let batch = configs.is_batch();
    if configs.from_directory && configs.paths.is_empty() {
        warn!("No YAML files found in {}", config_path.display());
    }

    let mut summary = BatchSummary::default();
    for path in &configs.paths {
        let outputs = if batch {
            batch_outputs(&output, path)
        } else {
            single_outputs(&output)
        };

        match process_config(path, &outputs, &overrides, args.kind) {
            Ok(report) => summary.record(report),
            Err(err) if batch => {
                summary.failed += 1;
                let is_config_error = err
                    .downcast_ref::<VitaError>()
                    .is_some_and(VitaError::is_config_error);
                if is_config_error {
                    error!("Error loading config {}: {err:#}", path.display());
                } else {
                    error!("Error rendering {}: {err:#}", path.display());
                }
            }
            Err(err) => return Err(err),
        }
    }

    if batch {
        info!(
            processed = summary.processed,
            failed = summary.failed,
            cvs = summary.cvs_written,
            cover_letters = summary.cover_letters_written,
            "Batch finished"
        );
    }
    Ok(summary)
}

fn process_config(
    path: &Path,
    outputs: &OutputPaths,
    overrides: &AssetOverrides,
    kind: DocumentKind,
) -> Result<FileReport> {
    info!("Loading data from {}...", path.display());
    let mut cv = load_cv_data(path)?;

    overrides.apply(&mut cv);
    for (asset, missing) in missing_assets(&cv) {
        warn!("{asset} file not found at {}", missing.display());
    }

    let mut report = FileReport::default();

    if kind.includes_cv() {
        info!("Rendering CV to {}...", outputs.cv.display());
        render_cv(&cv, &outputs.cv)
            .with_context(|| format!("Failed to render CV to {}", outputs.cv.display()))?;
        info!("Successfully generated CV at {}", outputs.cv.display());
        report.cv_written = true;
    }

    if kind.includes_cover_letter() {
        if cv.cover_letter.is_some() {
            let target = &outputs.cover_letter;
            info!("Rendering Cover Letter to {}...", target.display());
            let outcome = render_cover_letter(&cv, target).with_context(|| {
                format!("Failed to render cover letter to {}", target.display())
            })?;
            if outcome == CoverLetterOutcome::Rendered {
                info!("Successfully generated Cover Letter at {}", target.display());
                report.cover_letter_written = true;
            }
        } else {
            info!("No cover letter data found in {}", path.display());
            report.cover_letter_missing = true;
        }
    }

    Ok(report)
}
