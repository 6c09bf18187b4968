//! Config discovery and output file naming.
//!
//! - Single-file mode writes the CV to the literal `--output` path and the
//!   cover letter next to it as `cl_<base>.pdf`.
//! - Batch mode (directory input or several configs) derives
//!   `cv_<base>.pdf` / `cl_<base>.pdf` from each config file name.
//!
//! `<base>` never keeps a leading `cv_` or a trailing `.pdf`, so names like
//! `cv_cv_x.pdf` cannot come out of either mode.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::VitaError;

const CV_PREFIX: &str = "cv_";
const CL_PREFIX: &str = "cl_";
const PDF_SUFFIX: &str = ".pdf";

/// Where the two documents for one config go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub cv: PathBuf,
    pub cover_letter: PathBuf,
}

/// Config files selected by `--config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSet {
    pub paths: Vec<PathBuf>,
    /// `--config` named a directory.
    pub from_directory: bool,
}

impl ConfigSet {
    pub fn is_batch(&self) -> bool {
        self.from_directory || self.paths.len() > 1
    }
}

/// A directory yields its `*.yaml` / `*.yml` files (non-recursive, sorted by
/// name); anything else is taken as a single config path and checked later by
/// the loader.
pub fn discover_configs(config: &Path) -> Result<ConfigSet, VitaError> {
    if !config.is_dir() {
        return Ok(ConfigSet {
            paths: vec![config.to_path_buf()],
            from_directory: false,
        });
    }

    let entries = fs::read_dir(config).map_err(|e| VitaError::io(config, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| VitaError::io(config, e))?.path();
        if path.is_file() && is_yaml(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(ConfigSet {
        paths,
        from_directory: true,
    })
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

/// Output paths for one config of a batch run.
pub fn batch_outputs(output: &Path, config_path: &Path) -> OutputPaths {
    let dir = batch_output_dir(output);
    let stem = config_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = document_base(&stem);

    OutputPaths {
        cv: dir.join(format!("{CV_PREFIX}{base}{PDF_SUFFIX}")),
        cover_letter: dir.join(format!("{CL_PREFIX}{base}{PDF_SUFFIX}")),
    }
}

/// Output paths when a single config file is rendered.
pub fn single_outputs(output: &Path) -> OutputPaths {
    let name = output
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = document_base(&name);
    let dir = output.parent().unwrap_or_else(|| Path::new(""));

    OutputPaths {
        cv: output.to_path_buf(),
        cover_letter: dir.join(format!("{CL_PREFIX}{base}{PDF_SUFFIX}")),
    }
}

/// Parent of `output` when it names a PDF file, otherwise `output` itself.
/// An empty result becomes the current directory.
fn batch_output_dir(output: &Path) -> PathBuf {
    let dir = if output.to_string_lossy().ends_with(PDF_SUFFIX) {
        output.parent().unwrap_or_else(|| Path::new("")).to_path_buf()
    } else {
        output.to_path_buf()
    };
    if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir
    }
}

fn document_base(name: &str) -> &str {
    let name = name.strip_prefix(CV_PREFIX).unwrap_or(name);
    name.strip_suffix(PDF_SUFFIX).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── naming ──────────────────────────────────────────────────────────────

    #[test]
    fn test_document_base_strips_prefix_and_suffix() {
        assert_eq!(document_base("cv_erika.pdf"), "erika");
        assert_eq!(document_base("erika.pdf"), "erika");
        assert_eq!(document_base("cv_erika"), "erika");
        assert_eq!(document_base("erika"), "erika");
    }

    #[test]
    fn test_batch_outputs_from_pdf_output() {
        let paths = batch_outputs(Path::new("out/cv.pdf"), Path::new("data/erika.yaml"));
        assert_eq!(paths.cv, PathBuf::from("out/cv_erika.pdf"));
        assert_eq!(paths.cover_letter, PathBuf::from("out/cl_erika.pdf"));
    }

    #[test]
    fn test_batch_outputs_from_directory_output() {
        let paths = batch_outputs(Path::new("build/pdfs"), Path::new("data/max.yml"));
        assert_eq!(paths.cv, PathBuf::from("build/pdfs/cv_max.pdf"));
        assert_eq!(paths.cover_letter, PathBuf::from("build/pdfs/cl_max.pdf"));
    }

    #[test]
    fn test_batch_outputs_bare_pdf_name_uses_current_dir() {
        let paths = batch_outputs(Path::new("cv.pdf"), Path::new("erika.yaml"));
        assert_eq!(paths.cv, PathBuf::from("./cv_erika.pdf"));
    }

    #[test]
    fn test_batch_config_with_cv_prefix_is_not_doubled() {
        let paths = batch_outputs(Path::new("out"), Path::new("data/cv_erika.yaml"));
        assert_eq!(paths.cv, PathBuf::from("out/cv_erika.pdf"));
        assert_eq!(paths.cover_letter, PathBuf::from("out/cl_erika.pdf"));
    }

    #[test]
    fn test_single_outputs_keep_literal_cv_path() {
        let paths = single_outputs(Path::new("data/cv.pdf"));
        assert_eq!(paths.cv, PathBuf::from("data/cv.pdf"));
        assert_eq!(paths.cover_letter, PathBuf::from("data/cl_cv.pdf"));

        let paths = single_outputs(Path::new("out/cv_erika.pdf"));
        assert_eq!(paths.cv, PathBuf::from("out/cv_erika.pdf"));
        assert_eq!(paths.cover_letter, PathBuf::from("out/cl_erika.pdf"));
    }

    #[test]
    fn test_no_output_name_contains_double_cv_prefix() {
        let outputs = ["cv.pdf", "cv_cv.pdf", "out/cv_x.pdf", "out", "cv_"];
        let configs = ["cv.yaml", "cv_cv.yaml", "cv_x.yml", "plain.yaml"];
        for output in outputs {
            let single = single_outputs(Path::new(output));
            for config in configs {
                let batch = batch_outputs(Path::new(output), Path::new(config));
                for path in [&batch.cv, &batch.cover_letter, &single.cover_letter] {
                    let name = path.file_name().unwrap().to_string_lossy();
                    assert!(!name.starts_with("cv_cv_"), "{output} + {config} -> {name}");
                }
            }
        }
    }

    // ── discovery ───────────────────────────────────────────────────────────

    #[test]
    fn test_discover_configs_lists_yaml_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta.yaml", "alpha.yml", "notes.txt", "beta.yaml"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.yaml")).unwrap();

        let set = discover_configs(dir.path()).unwrap();
        assert!(set.from_directory);
        assert!(set.is_batch());
        let names: Vec<_> = set
            .paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha.yml", "beta.yaml", "zeta.yaml"]);
    }

    #[test]
    fn test_discover_configs_single_file_is_not_batch() {
        let set = discover_configs(Path::new("data/erika.yaml")).unwrap();
        assert_eq!(set.paths, vec![PathBuf::from("data/erika.yaml")]);
        assert!(!set.is_batch());
    }

    #[test]
    fn test_empty_directory_is_still_batch() {
        let dir = tempfile::tempdir().unwrap();
        let set = discover_configs(dir.path()).unwrap();
        assert!(set.paths.is_empty());
        assert!(set.is_batch());
    }
}
