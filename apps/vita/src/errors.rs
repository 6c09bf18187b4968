use std::path::PathBuf;

use thiserror::Error;

/// Error type shared by the loader, the layout engine and the PDF surface.
///
/// The CLI layer wraps these in `anyhow` with per-file context.
#[derive(Debug, Error)]
pub enum VitaError {
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Image error for {}: {message}", path.display())]
    Image { path: PathBuf, message: String },

    #[error("PDF error: {0}")]
    Pdf(String),
}

impl VitaError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VitaError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the input document rather than by rendering.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            VitaError::ConfigNotFound(_) | VitaError::Yaml { .. } | VitaError::Validation(_)
        )
    }
}
