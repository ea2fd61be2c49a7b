//! Project checks.
//!
//! Each check returns a `ValidationResult`. Manifest checks only look at the
//! manifest and metadata; token checks need the loaded store.

use std::collections::HashSet;

use crate::dictionary::{Dictionary, TokenStore};
use crate::discovery::Project;
use crate::transform::TransformPipeline;

use super::diagnostic::{Diagnostic, ValidationResult};

/// Two themes with the same name would write the same files.
pub fn check_duplicate_themes(project: &Project) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut seen = HashSet::new();

    for theme in &project.manifest.themes {
        if !seen.insert(theme.name.as_str()) {
            result.push(
                Diagnostic::error(
                    "dtk::validate::duplicate-theme",
                    format!("Theme '{}' is declared more than once", theme.name),
                )
                .with_help("Theme names must be unique; each one owns <name>.css and <name>.json"),
            );
        }
    }

    result
}

/// Exclusions must name sets exactly; a typo silently includes the set.
pub fn check_unknown_exclusions(project: &Project) -> ValidationResult {
    let mut result = ValidationResult::new();

    for theme in &project.manifest.themes {
        for set in &theme.exclude {
            if !project.metadata.contains(set) {
                let mut diagnostic = Diagnostic::warning(
                    "dtk::validate::unknown-exclusion",
                    format!("Theme '{}' excludes unknown token set '{}'", theme.name, set),
                );
                if let Some(similar) = closest_set(project, set) {
                    diagnostic = diagnostic.with_help(format!("Did you mean '{}'?", similar));
                }
                result.push(diagnostic);
            }
        }
    }

    result
}

/// Selector keys must name a theme; themes without one render under `:root`.
pub fn check_selectors(project: &Project) -> ValidationResult {
    let mut result = ValidationResult::new();
    let themes = project.manifest.effective_themes();

    for key in project.manifest.selectors.keys() {
        if !themes.iter().any(|t| &t.name == key) {
            result.push(
                Diagnostic::warning(
                    "dtk::validate::unknown-selector",
                    format!("Selector configured for undeclared theme '{}'", key),
                )
                .with_help("The selector is ignored"),
            );
        }
    }

    for theme in themes.iter().filter(|t| !t.structural) {
        if !project.manifest.selectors.contains_key(&theme.name) {
            result.push(
                Diagnostic::warning(
                    "dtk::validate::missing-selector",
                    format!("Theme '{}' has no selector", theme.name),
                )
                .with_help("Its sheet is scoped to :root"),
            );
        }
    }

    result
}

/// Sets listed in the metadata without a file on disk.
pub fn check_missing_sets(store: &TokenStore) -> ValidationResult {
    store
        .missing()
        .into_iter()
        .map(|set| {
            Diagnostic::warning(
                "dtk::validate::missing-set",
                format!("Token set '{}' has no file", set),
            )
            .with_help(format!("Expected {}", store.source_path(set)))
        })
        .collect()
}

/// Sets whose file is not valid JSON. Every theme including them fails.
pub fn check_invalid_sets(store: &TokenStore) -> ValidationResult {
    store
        .invalid()
        .into_iter()
        .map(|(set, message)| {
            Diagnostic::error(
                "dtk::validate::invalid-set",
                format!("Token set '{}' is not valid JSON: {}", set, message),
            )
            .with_help(format!("Check {}", store.source_path(set)))
        })
        .collect()
}

/// Unresolved aliases and composites that render empty, per theme build.
/// A token reported by several themes is reported once.
pub fn check_tokens(
    project: &Project,
    store: &TokenStore,
    pipeline: &TransformPipeline,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for theme in project.themes() {
        let Ok(dictionary) = Dictionary::build(store, &theme.sets) else {
            continue;
        };

        for diagnostic in dictionary.diagnostics().iter() {
            if seen.insert((diagnostic.code.clone(), diagnostic.message.clone())) {
                result.push(diagnostic.clone());
            }
        }

        let mut tokens = dictionary.into_tokens();
        pipeline.apply_all(&mut tokens);

        for token in tokens.iter().filter(|t| t.value.is_empty()) {
            let message = format!(
                "Token '{}' renders empty and is left out of every output",
                token.dotted_path()
            );
            if seen.insert(("dtk::validate::empty-token".to_string(), message.clone())) {
                result.push(
                    Diagnostic::warning("dtk::validate::empty-token", message).with_help(format!(
                        "Check the {} fields in {}",
                        token.token_type.as_deref().unwrap_or("value"),
                        token.file_path
                    )),
                );
            }
        }
    }

    result
}

/// A metadata set that differs from `name` only in case or separators.
fn closest_set<'a>(project: &'a Project, name: &str) -> Option<&'a str> {
    let normalize = |s: &str| {
        s.chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect::<String>()
    };
    let wanted = normalize(name);
    project
        .metadata
        .sets()
        .iter()
        .find(|set| normalize(set.as_str()) == wanted)
        .map(String::as_str)
}
