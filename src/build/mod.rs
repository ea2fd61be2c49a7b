//! Build orchestration.
//!
//! One run, strictly in order:
//!
//! 1. validate the project, aborting on manifest errors
//! 2. clear previously generated CSS files and JSON documents
//! 3. for each theme: build its dictionary, transform it, write
//!    `<css>/<theme>.css` and, unless structural, `<json>/<theme>.json`
//! 4. merge the per-theme JSON documents into the combined document
//!
//! A failing theme is recorded and the loop moves on. The merge is skipped
//! when any non-structural theme failed, and a failing merge is recorded
//! too. CSS already on disk stays there.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::dictionary::{Dictionary, TokenStore};
use crate::discovery::Project;
use crate::error::{DtkError, Result};
use crate::format::{
    merge_documents, nested_json, write_document, CssFormatter, CssOptions, MergeOptions,
};
use crate::output::{display_path, plural, Printer};
use crate::theme::css_includes;
use crate::transform::TransformPipeline;
use crate::types::Theme;
use crate::validation::{validate_manifest, validate_tokens, ValidationResult};

/// In-memory artifacts for one theme.
#[derive(Debug, Clone)]
pub struct ThemeOutput {
    pub theme: String,
    pub css: String,
    /// `None` for structural themes.
    pub json: Option<Value>,
    /// Properties written to the CSS sheet.
    pub css_tokens: usize,
}

/// A theme whose files were written.
#[derive(Debug, Clone)]
pub struct BuiltTheme {
    pub name: String,
    pub css_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub css_tokens: usize,
}

/// Outcome of a full run.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub built: Vec<BuiltTheme>,
    /// Themes that failed, with the reason.
    pub failures: Vec<(String, DtkError)>,
    /// Path of the combined document when the merge ran and succeeded.
    pub combined: Option<PathBuf>,
    pub merge_error: Option<DtkError>,
    /// Non-fatal project diagnostics found before building.
    pub diagnostics: ValidationResult,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.merge_error.is_none()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len() + usize::from(self.merge_error.is_some())
    }
}

/// Builds every theme of a project.
#[derive(Debug)]
pub struct Builder {
    project: Project,
    themes: Vec<Theme>,
    store: TokenStore,
    pipeline: TransformPipeline,
    css: CssFormatter,
}

impl Builder {
    /// Resolve themes and read every token set once.
    pub fn new(project: Project) -> Result<Self> {
        let themes = project.themes();
        let store = project.load_store()?;
        let pipeline = project.pipeline();

        let css_config = &project.manifest.css;
        let css = CssFormatter::new(CssOptions {
            prefix: pipeline.prefix().map(str::to_string),
            output_references: css_config.output_references,
            references: css_config.references.clone(),
            naming: css_config.naming,
        });

        Ok(Self {
            project,
            themes,
            store,
            pipeline,
            css,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }

    /// Build one theme without touching the filesystem.
    pub fn build_theme(&self, theme: &Theme) -> Result<ThemeOutput> {
        let dictionary = Dictionary::build(&self.store, &theme.sets)?;
        let mut tokens = dictionary.into_tokens();
        self.pipeline.apply_all(&mut tokens);

        let sheet: Vec<_> = tokens
            .iter()
            .filter(|t| css_includes(theme, &self.themes, &t.file_path))
            .filter(|t| !t.value.is_empty())
            .cloned()
            .collect();
        let css = self.css.format(&sheet, theme.selector.as_deref());

        let json = (!theme.structural).then(|| nested_json(&tokens));

        Ok(ThemeOutput {
            theme: theme.name.clone(),
            css,
            json,
            css_tokens: sheet.len(),
        })
    }

    /// Run the whole build, writing every artifact.
    ///
    /// Returns `Err` only when the manifest checks fail or the CSS directory
    /// cannot be prepared; everything later lands in the report.
    pub fn run(&self, printer: &Printer) -> Result<BuildReport> {
        let manifest_checks = validate_manifest(&self.project);
        if manifest_checks.has_errors() {
            printer.diagnostics(&manifest_checks);
            return Err(DtkError::Config {
                message: format!(
                    "manifest has {}",
                    plural(manifest_checks.error_count(), "error", "errors")
                ),
                help: Some("Run `dtk validate` for details".to_string()),
            });
        }

        let mut diagnostics = manifest_checks;
        diagnostics.merge(validate_tokens(&self.project, &self.store, &self.pipeline));
        printer.diagnostics(&diagnostics);

        let mut report = BuildReport {
            diagnostics,
            ..Default::default()
        };

        let css_dir = self.project.css_dir();
        let json_dir = self.project.json_dir();

        let removed = clean_output_dir(&css_dir)?;
        if removed > 0 {
            printer.info(
                "Cleaning",
                &format!("{} in {}", plural(removed, "file", "files"), display_path(&css_dir)),
            );
        }

        let combined = &self.project.manifest.json.combined;
        let removed = remove_documents(&json_dir, &self.themes, combined)?;
        if removed > 0 {
            printer.info(
                "Cleaning",
                &format!("{} in {}", plural(removed, "file", "files"), display_path(&json_dir)),
            );
        }

        for theme in &self.themes {
            printer.status(
                "Building",
                &format!("{} ({})", theme.name, plural(theme.sets.len(), "set", "sets")),
            );
            match self.write_theme(theme, &css_dir, &json_dir) {
                Ok(built) => report.built.push(built),
                Err(e) => {
                    printer.error("error", &format!("theme '{}': {}", theme.name, e));
                    report.failures.push((theme.name.clone(), e));
                }
            }
        }

        let failed: Vec<&str> = self
            .themes
            .iter()
            .filter(|t| !t.structural)
            .filter(|t| report.failures.iter().any(|(name, _)| *name == t.name))
            .map(|t| t.name.as_str())
            .collect();
        let documents: Vec<String> = report
            .built
            .iter()
            .filter(|b| b.json_path.is_some())
            .map(|b| b.name.clone())
            .collect();

        if !failed.is_empty() {
            let e = DtkError::Merge {
                message: format!(
                    "skipped {}: {} failed ({})",
                    combined,
                    plural(failed.len(), "theme", "themes"),
                    failed.join(", ")
                ),
                help: Some("Fix the failing themes and rebuild".to_string()),
            };
            printer.error("error", &e.to_string());
            report.merge_error = Some(e);
        } else if !documents.is_empty() {
            let options = MergeOptions {
                combined: combined.clone(),
                keep_file_tag: self.project.manifest.json.keep_file_tag,
            };
            match merge_documents(&json_dir, &documents, &options) {
                Ok(path) => {
                    printer.status(
                        "Merged",
                        &format!(
                            "{} into {}",
                            plural(documents.len(), "theme", "themes"),
                            display_path(&path)
                        ),
                    );
                    report.combined = Some(path);
                }
                Err(e) => {
                    printer.error("error", &e.to_string());
                    report.merge_error = Some(e);
                }
            }
        }

        Ok(report)
    }

    fn write_theme(&self, theme: &Theme, css_dir: &Path, json_dir: &Path) -> Result<BuiltTheme> {
        let output = self.build_theme(theme)?;

        let css_path = css_dir.join(theme.css_file());
        fs::write(&css_path, &output.css).map_err(|e| DtkError::Io {
            path: css_path.clone(),
            message: format!("Failed to write stylesheet: {}", e),
        })?;

        let json_path = match &output.json {
            Some(document) => {
                let path = json_dir.join(theme.json_file());
                write_document(&path, document)?;
                Some(path)
            }
            None => None,
        };

        Ok(BuiltTheme {
            name: output.theme,
            css_path,
            json_path,
            css_tokens: output.css_tokens,
        })
    }
}

/// Remove every file directly inside `dir`, creating `dir` if needed.
/// Returns the number of files removed.
pub fn clean_output_dir(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| DtkError::Io {
            path: dir.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
        return Ok(0);
    }

    let entries = fs::read_dir(dir).map_err(|e| DtkError::Io {
        path: dir.to_path_buf(),
        message: format!("Failed to read output directory: {}", e),
    })?;

    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path).map_err(|e| DtkError::Io {
                path: path.clone(),
                message: format!("Failed to remove stale output: {}", e),
            })?;
            removed += 1;
        }
    }

    Ok(removed)
}

/// Remove per-theme documents and the combined document left by an earlier
/// run, so a merge only ever sees documents written by this one.
fn remove_documents(dir: &Path, themes: &[Theme], combined: &str) -> Result<usize> {
    let stale = themes
        .iter()
        .map(|t| dir.join(t.json_file()))
        .chain(std::iter::once(dir.join(combined)));

    let mut removed = 0;
    for path in stale {
        if path.is_file() {
            fs::remove_file(&path).map_err(|e| DtkError::Io {
                path: path.clone(),
                message: format!("Failed to remove stale output: {}", e),
            })?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = tempdir().unwrap();
        for (path, content) in files {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_root_theme_end_to_end() {
        let dir = project(&[
            ("dtk.yaml", "css:\n  prefix: --rolo\n"),
            ("tokens/$metadata.json", r#"{"tokenSetOrder": ["root"]}"#),
            ("tokens/root.json", r#"{"spacing": {"sm": {"value": "2*8"}}}"#),
        ]);

        let builder = Builder::new(discover(dir.path()).unwrap()).unwrap();
        let report = builder.run(&Printer::quiet()).unwrap();

        assert!(report.is_success());
        assert_eq!(
            read(&dir.path().join("css/root.css")),
            ":root {\n  --rolo-spacing-sm: 16px;\n}\n"
        );
        assert!(report.combined.is_none());
        assert!(!dir.path().join("doc/root.json").exists());
    }

    const THEMED_MANIFEST: &str = r#"
css:
  prefix: rolo
selectors:
  light: ":root, .light"
  dark: .dark
themes:
  - name: light
    exclude: [dark]
  - name: dark
    exclude: [light]
  - name: root
    exclude: [light, dark]
    filter: fallback
    structural: true
"#;

    fn themed_project() -> TempDir {
        project(&[
            ("dtk.yaml", THEMED_MANIFEST),
            (
                "tokens/$metadata.json",
                r#"{"tokenSetOrder": ["core", "semantics/color", "light", "dark"]}"#,
            ),
            (
                "tokens/core.json",
                r##"{"color": {"base": {"white": {"value": "#FFFFFF", "type": "color"},
                                       "black": {"value": "#000", "type": "color"}}},
                    "spacing": {"sm": {"value": "2*8"}}}"##,
            ),
            (
                "tokens/semantics/color.json",
                r#"{"color": {"surface": {"value": "{color.base.white}", "type": "color"}}}"#,
            ),
            (
                "tokens/light.json",
                r#"{"color": {"text": {"value": "{color.base.black}", "type": "color"}}}"#,
            ),
            (
                "tokens/dark.json",
                r#"{"color": {"text": {"value": "{color.base.white}", "type": "color"}}}"#,
            ),
        ])
    }

    #[test]
    fn test_themed_build_writes_filtered_sheets() {
        let dir = themed_project();
        let builder = Builder::new(discover(dir.path()).unwrap()).unwrap();
        let report = builder.run(&Printer::quiet()).unwrap();

        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(report.built.len(), 3);

        let dark = read(&dir.path().join("css/dark.css"));
        insta::assert_snapshot!(dark.trim_end(), @r"
.dark {
  --rolo-color-text: #ffffff;
}
");

        let root = read(&dir.path().join("css/root.css"));
        insta::assert_snapshot!(root.trim_end(), @r"
:root {
  --rolo-color-base-white: #ffffff;
  --rolo-color-base-black: #000000;
  --rolo-spacing-sm: 16px;
  --rolo-color-surface: var(--rolo-color-base-white);
}
");
    }

    #[test]
    fn test_themed_build_merges_documents() {
        let dir = themed_project();
        let builder = Builder::new(discover(dir.path()).unwrap()).unwrap();
        let report = builder.run(&Printer::quiet()).unwrap();

        let combined_path = report.combined.unwrap();
        assert_eq!(combined_path, dir.path().join("doc/combined.json"));
        let combined: Value = serde_json::from_str(&read(&combined_path)).unwrap();

        assert_eq!(
            combined["dark"]["color"]["text"],
            json!("#ffffff")
        );
        assert_eq!(combined["light"]["color"]["text"], json!("#000000"));
        assert_eq!(combined["light"]["spacing"]["sm"], json!("16px"));
        assert!(combined.get("root").is_none());
        assert!(combined["light"].get("nameOfFile").is_none());
        assert!(!dir.path().join("doc/light.json").exists());
    }

    #[test]
    fn test_stale_css_is_removed() {
        let dir = themed_project();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/obsolete.css"), ":root {}\n").unwrap();

        let builder = Builder::new(discover(dir.path()).unwrap()).unwrap();
        builder.run(&Printer::quiet()).unwrap();

        assert!(!dir.path().join("css/obsolete.css").exists());
        assert!(dir.path().join("css/light.css").exists());
    }

    #[test]
    fn test_failed_theme_does_not_stop_others() {
        let dir = project(&[
            (
                "dtk.yaml",
                "themes:\n  - name: light\n    exclude: [dark]\n  - name: dark\n    exclude: [light]\n",
            ),
            (
                "tokens/$metadata.json",
                r#"{"tokenSetOrder": ["light", "dark"]}"#,
            ),
            ("tokens/light.json", r#"{"a": {"value": "1"}}"#),
            ("tokens/dark.json", "{ broken"),
        ]);

        let builder = Builder::new(discover(dir.path()).unwrap()).unwrap();
        let report = builder.run(&Printer::quiet()).unwrap();

        assert_eq!(report.built.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "dark");
        assert!(matches!(report.merge_error, Some(DtkError::Merge { .. })));
        assert!(dir.path().join("css/light.css").exists());
        assert_eq!(report.failure_count(), 2);
    }

    fn light_dark_project(light: &str, dark: &str) -> TempDir {
        project(&[
            (
                "dtk.yaml",
                "themes:\n  - name: light\n    exclude: [dark]\n  - name: dark\n    exclude: [light]\n",
            ),
            ("tokens/$metadata.json", r#"{"tokenSetOrder": ["light", "dark"]}"#),
            ("tokens/light.json", light),
            ("tokens/dark.json", dark),
        ])
    }

    fn rebuild(dir: &TempDir) -> BuildReport {
        let builder = Builder::new(discover(dir.path()).unwrap()).unwrap();
        builder.run(&Printer::quiet()).unwrap()
    }

    #[test]
    fn test_documents_from_earlier_run_are_not_merged() {
        let dir = light_dark_project("{ broken", r#"{"a": {"value": "OLD"}}"#);
        let first = rebuild(&dir);
        assert!(first.merge_error.is_some());
        assert!(dir.path().join("doc/dark.json").exists());

        fs::write(dir.path().join("tokens/light.json"), r#"{"a": {"value": "NEW"}}"#).unwrap();
        fs::write(dir.path().join("tokens/dark.json"), "{ broken").unwrap();
        let second = rebuild(&dir);

        assert_eq!(second.failures.len(), 1);
        assert_eq!(second.failures[0].0, "dark");
        assert!(second.combined.is_none());
        assert!(matches!(second.merge_error, Some(DtkError::Merge { .. })));
        assert!(!dir.path().join("doc/dark.json").exists());
        assert!(!dir.path().join("doc/combined.json").exists());
    }

    #[test]
    fn test_failed_rebuild_removes_previous_combined() {
        let dir = light_dark_project(r#"{"a": {"value": "1"}}"#, r#"{"a": {"value": "2"}}"#);
        let first = rebuild(&dir);
        assert!(first.is_success());
        assert!(dir.path().join("doc/combined.json").exists());

        fs::write(dir.path().join("tokens/dark.json"), "{ broken").unwrap();
        let second = rebuild(&dir);

        assert!(!second.is_success());
        assert!(!dir.path().join("doc/combined.json").exists());
        assert!(dir.path().join("doc/light.json").exists());
    }

    #[test]
    fn test_duplicate_theme_names_abort() {
        let dir = project(&[
            ("dtk.yaml", "themes:\n  - name: light\n  - name: light\n"),
            ("tokens/$metadata.json", r#"{"tokenSetOrder": ["light"]}"#),
            ("tokens/light.json", r#"{"a": {"value": "1"}}"#),
        ]);

        let builder = Builder::new(discover(dir.path()).unwrap()).unwrap();
        assert!(matches!(
            builder.run(&Printer::quiet()),
            Err(DtkError::Config { .. })
        ));
        assert!(!dir.path().join("css").exists());
    }

    #[test]
    fn test_build_theme_in_memory() {
        let dir = themed_project();
        let builder = Builder::new(discover(dir.path()).unwrap()).unwrap();
        let light = &builder.themes()[0];

        let output = builder.build_theme(light).unwrap();
        assert_eq!(output.css, ":root, .light {\n  --rolo-color-text: #000000;\n}\n");
        assert_eq!(output.css_tokens, 1);
        assert!(output.json.is_some());
        assert!(!dir.path().join("css").exists());
    }

    #[test]
    fn test_clean_output_dir_creates_missing() {
        let dir = tempdir().unwrap();
        let css = dir.path().join("css");
        assert_eq!(clean_output_dir(&css).unwrap(), 0);
        assert!(css.is_dir());
    }
}
