//! YAML loading and schema validation for CV documents.
//!
//! Three failure classes, all fatal for the document:
//! - the path does not exist (`ConfigNotFound`)
//! - the file is not YAML (`Yaml`)
//! - the YAML does not fit the schema, or fails the semantic checks (`Validation`)

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::VitaError;
use crate::models::Cv;

/// Reads and validates the CV document at `path`.
pub fn load_cv_data(path: &Path) -> Result<Cv, VitaError> {
    if !path.exists() {
        return Err(VitaError::ConfigNotFound(path.to_path_buf()));
    }

    let raw = fs::read_to_string(path).map_err(|e| VitaError::io(path, e))?;
    let cv = parse_cv(&raw).map_err(|e| match e {
        ParseFailure::Syntax(source) => VitaError::Yaml {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Schema(source) => {
            VitaError::Validation(format!("{}: {source}", path.display()))
        }
    })?;

    validate_cv(&cv)?;
    debug!(
        path = %path.display(),
        experiences = cv.experiences.len(),
        education = cv.education.len(),
        skills = cv.skills.len(),
        cover_letter = cv.cover_letter.is_some(),
        "Loaded CV document"
    );
    Ok(cv)
}

#[derive(Debug)]
enum ParseFailure {
    Syntax(serde_yaml::Error),
    Schema(serde_yaml::Error),
}

/// Two-step parse so that broken YAML and schema mismatches are reported differently.
fn parse_cv(raw: &str) -> Result<Cv, ParseFailure> {
    let value: serde_yaml::Value = serde_yaml::from_str(raw).map_err(ParseFailure::Syntax)?;
    serde_yaml::from_value(value).map_err(ParseFailure::Schema)
}

/// Semantic checks that the schema alone cannot express.
pub fn validate_cv(cv: &Cv) -> Result<(), VitaError> {
    let mut problems = Vec::new();

    if cv.person.name.trim().is_empty() {
        problems.push("person.name must not be empty".to_string());
    }
    if !is_positive_width(cv.person.image_width) {
        problems.push(format!(
            "person.image_width must be a positive number, got {}",
            cv.person.image_width
        ));
    }
    if !is_positive_width(cv.person.signature_width) {
        problems.push(format!(
            "person.signature_width must be a positive number, got {}",
            cv.person.signature_width
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(VitaError::Validation(problems.join("; ")))
    }
}

fn is_positive_width(width: f32) -> bool {
    width.is_finite() && width > 0.0
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) const MINIMAL_YAML: &str = r#"
person:
  name: Erika Mustermann
  title: Softwareentwicklerin
  address: Hauptstraße 1, 10115 Berlin
  phone: "+49 30 1234567"
  email: erika@example.com
  linkedin: linkedin.com/in/erika
  birth_date: 01.01.1990
experiences:
  - start_date: 03/2021
    title: Senior Engineer
    company: ACME GmbH
    description:
      - Built the billing pipeline
education:
  - start_date: 2010
    end_date: 2014
    degree: B.Sc. Informatik
    institution: TU Berlin
skills:
  - name: Sprachen & Frameworks
    skills: Rust, Python, TypeScript
languages: German
"#;

    fn write_yaml(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal_document() {
        let file = write_yaml(MINIMAL_YAML);
        let cv = load_cv_data(file.path()).unwrap();
        assert_eq!(cv.person.name, "Erika Mustermann");
        assert_eq!(cv.experiences.len(), 1);
        assert_eq!(cv.experiences[0].end_date, "Heute");
        assert_eq!(cv.education[0].start_date, "2010");
        assert_eq!(cv.languages, "German");
        assert!(cv.cover_letter.is_none());
    }

    #[test]
    fn test_missing_file_is_config_not_found() {
        let err = load_cv_data(Path::new("/definitely/not/here/cv.yaml")).unwrap_err();
        assert!(matches!(err, VitaError::ConfigNotFound(_)));
    }

    #[test]
    fn test_broken_yaml_is_syntax_error() {
        let file = write_yaml("person: [unclosed\n");
        let err = load_cv_data(file.path()).unwrap_err();
        assert!(matches!(err, VitaError::Yaml { .. }), "got {err:?}");
    }

    #[test]
    fn test_missing_person_is_validation_error() {
        let file = write_yaml("experiences: []\neducation: []\nskills: []\nlanguages: German\n");
        let err = load_cv_data(file.path()).unwrap_err();
        match err {
            VitaError::Validation(msg) => assert!(msg.contains("person"), "got {msg}"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape_is_validation_error() {
        let broken = MINIMAL_YAML.replace(
            "    description:\n      - Built the billing pipeline\n",
            "    description: 42\n",
        );
        let file = write_yaml(&broken);
        let err = load_cv_data(file.path()).unwrap_err();
        assert!(matches!(err, VitaError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn test_cover_letter_section_is_parsed() {
        let with_letter = format!(
            "{MINIMAL_YAML}cover_letter:\n  company:\n    name: Beispiel AG\n    address: |\n      Musterweg 5\n      80331 München\n  title: Bewerbung als Engineer\n  text: |\n    Sehr geehrte Damen und Herren,\n\n    hiermit bewerbe ich mich.\n"
        );
        let file = write_yaml(&with_letter);
        let cv = load_cv_data(file.path()).unwrap();
        let letter = cv.cover_letter.expect("cover letter present");
        assert_eq!(letter.company.name, "Beispiel AG");
        assert!(letter.company.contact_person.is_none());
        assert_eq!(letter.company.address.lines().count(), 2);
    }

    #[test]
    fn test_non_positive_signature_width_rejected() {
        let file = write_yaml(&MINIMAL_YAML.replace(
            "  birth_date: 01.01.1990\n",
            "  birth_date: 01.01.1990\n  signature_width: 0\n",
        ));
        let err = load_cv_data(file.path()).unwrap_err();
        match err {
            VitaError::Validation(msg) => assert!(msg.contains("signature_width")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_name_rejected() {
        let file = write_yaml(&MINIMAL_YAML.replace("Erika Mustermann", "\"  \""));
        assert!(matches!(
            load_cv_data(file.path()).unwrap_err(),
            VitaError::Validation(_)
        ));
    }
}
