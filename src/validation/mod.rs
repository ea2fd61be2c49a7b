//! Validation system for dtk projects.
//!
//! Runs a suite of checks against a discovered project and reports errors
//! and warnings. Used by `dtk validate` and before every `dtk build`.

mod checks;
mod diagnostic;

pub use diagnostic::{Diagnostic, Severity, ValidationResult};

use crate::dictionary::TokenStore;
use crate::discovery::Project;
use crate::error::Result;
use crate::output::plural;
use crate::transform::TransformPipeline;

/// Checks on the manifest alone. Errors here stop a build before any
/// output is touched.
pub fn validate_manifest(project: &Project) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_duplicate_themes(project));
    result.merge(checks::check_unknown_exclusions(project));
    result.merge(checks::check_selectors(project));

    result
}

/// Checks on the loaded token sets.
pub fn validate_tokens(
    project: &Project,
    store: &TokenStore,
    pipeline: &TransformPipeline,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_missing_sets(store));
    result.merge(checks::check_invalid_sets(store));
    result.merge(checks::check_tokens(project, store, pipeline));

    result
}

/// Every check.
pub fn validate_project(
    project: &Project,
    store: &TokenStore,
    pipeline: &TransformPipeline,
) -> ValidationResult {
    let mut result = validate_manifest(project);
    result.merge(validate_tokens(project, store, pipeline));
    result
}

/// Load the project's token sets and run every check.
pub fn validate(project: &Project) -> Result<ValidationResult> {
    let store = project.load_store()?;
    Ok(validate_project(project, &store, &project.pipeline()))
}

/// One-line outcome, e.g. `validation failed: 1 error, 2 warnings`.
pub fn summary(result: &ValidationResult) -> String {
    let errors = result.error_count();
    let warnings = result.warning_count();

    if errors > 0 {
        format!(
            "validation failed: {}, {}",
            plural(errors, "error", "errors"),
            plural(warnings, "warning", "warnings")
        )
    } else if warnings > 0 {
        format!("validation passed ({})", plural(warnings, "warning", "warnings"))
    } else {
        "validation passed".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &std::path::Path, path: &str, content: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_clean_project() {
        let dir = tempdir().unwrap();
        write(dir.path(), "tokens/$metadata.json", r#"{"tokenSetOrder": ["root"]}"#);
        write(dir.path(), "tokens/root.json", r#"{"a": {"value": "1"}}"#);

        let result = validate(&discover(dir.path()).unwrap()).unwrap();
        assert!(result.is_ok());
        assert_eq!(summary(&result), "validation passed");
    }

    #[test]
    fn test_reports_missing_and_invalid_sets() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "tokens/$metadata.json",
            r#"{"tokenSetOrder": ["core", "light", "dark"]}"#,
        );
        write(dir.path(), "tokens/core.json", r#"{"a": {"value": "1"}}"#);
        write(dir.path(), "tokens/light.json", "{");

        let result = validate(&discover(dir.path()).unwrap()).unwrap();
        assert_eq!(
            result.codes(),
            vec!["dtk::validate::missing-set", "dtk::validate::invalid-set"]
        );
        assert_eq!(summary(&result), "validation failed: 1 error, 1 warning");
    }

    #[test]
    fn test_manifest_errors_are_separate() {
        let dir = tempdir().unwrap();
        write(dir.path(), "dtk.yaml", "themes:\n  - name: a\n  - name: a\n");
        write(dir.path(), "tokens/$metadata.json", r#"{"sets": ["a"]}"#);
        write(dir.path(), "tokens/a.json", "{}");

        let project = discover(dir.path()).unwrap();
        assert!(validate_manifest(&project).has_errors());
    }
}
