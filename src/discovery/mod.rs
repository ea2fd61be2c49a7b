//! Project discovery: manifest, metadata, and token directory layout.
//!
//! A project is a directory with an optional `dtk.yaml` manifest and a
//! token directory holding `$metadata.json` plus one JSON file per set.
//!
//! # Example
//!
//! ```ignore
//! use dtk::discovery::discover;
//!
//! let project = discover("./design")?;
//! for theme in project.themes() {
//!     println!("{}: {} sets", theme.name, theme.sets.len());
//! }
//! ```

mod manifest;
mod metadata;
mod scanner;

use std::path::{Path, PathBuf};

use crate::dictionary::TokenStore;
use crate::error::Result;
use crate::theme::ThemeResolver;
use crate::transform::TransformPipeline;
use crate::types::Theme;

pub use manifest::{CssConfig, JsonConfig, Manifest, DEFAULT_REFERENCE_SOURCES};
pub use metadata::Metadata;
pub use scanner::{scan_token_sets, set_name};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "dtk.yaml";

/// A loaded project.
#[derive(Debug, Clone)]
pub struct Project {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if no dtk.yaml was found).
    pub manifest: Manifest,

    /// Whether a dtk.yaml manifest was found.
    pub has_manifest: bool,

    /// The global token set list.
    pub metadata: Metadata,
}

impl Project {
    /// Assemble a project from already loaded parts.
    pub fn from_parts(root: impl Into<PathBuf>, manifest: Manifest, metadata: Metadata) -> Self {
        Self {
            root: root.into(),
            manifest,
            has_manifest: false,
            metadata,
        }
    }

    /// Resolve every theme against the metadata. Recomputed on each call.
    pub fn themes(&self) -> Vec<Theme> {
        ThemeResolver::new(self.metadata.sets(), &self.manifest.selectors)
            .resolve_all(&self.manifest.effective_themes())
    }

    pub fn tokens_dir(&self) -> PathBuf {
        self.root.join(&self.manifest.tokens)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.tokens_dir().join(&self.manifest.metadata)
    }

    pub fn css_dir(&self) -> PathBuf {
        self.root.join(&self.manifest.css.output)
    }

    pub fn json_dir(&self) -> PathBuf {
        self.root.join(&self.manifest.json.output)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILENAME)
    }

    /// Read every metadata set once. Provenance paths are reported relative
    /// to the project root.
    pub fn load_store(&self) -> Result<TokenStore> {
        Ok(TokenStore::load(&self.tokens_dir(), self.metadata.sets())?
            .with_label(&self.manifest.tokens))
    }

    /// The transform pipeline configured by the manifest.
    pub fn pipeline(&self) -> TransformPipeline {
        TransformPipeline::new(&self.manifest.transforms)
            .with_prefix(self.manifest.css.prefix.as_deref())
            .with_naming(self.manifest.css.naming)
    }

    /// Token sets present on disk, whether or not the metadata lists them.
    pub fn scan_sets(&self) -> Vec<String> {
        scan_token_sets(&self.tokens_dir(), &self.manifest)
    }
}

/// Load a project from its root directory.
///
/// The manifest is optional; the metadata is not. Without metadata no
/// theme can be resolved, so a missing or malformed metadata file fails
/// the whole run.
pub fn discover(root: impl AsRef<Path>) -> Result<Project> {
    discover_with(root, |_| {})
}

/// Like [`discover`], with a hook to adjust the manifest before the
/// metadata is read. Command-line overrides go through here.
pub fn discover_with(
    root: impl AsRef<Path>,
    overrides: impl FnOnce(&mut Manifest),
) -> Result<Project> {
    let root = root.as_ref().to_path_buf();

    let manifest_path = root.join(MANIFEST_FILENAME);
    let (mut manifest, has_manifest) = if manifest_path.exists() {
        (Manifest::load(&manifest_path)?, true)
    } else {
        (Manifest::default(), false)
    };
    overrides(&mut manifest);

    let mut project = Project::from_parts(root, manifest, Metadata::default());
    project.has_manifest = has_manifest;
    project.metadata = Metadata::load(&project.metadata_path())?;

    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_metadata(root: &Path, json: &str) {
        fs::create_dir_all(root.join("tokens")).unwrap();
        fs::write(root.join("tokens/$metadata.json"), json).unwrap();
    }

    #[test]
    fn test_discover_without_manifest() {
        let dir = tempdir().unwrap();
        write_metadata(dir.path(), r#"{"tokenSetOrder": ["root"]}"#);

        let project = discover(dir.path()).unwrap();

        assert!(!project.has_manifest);
        assert_eq!(project.metadata.sets(), &["root"]);
        let themes = project.themes();
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].name, "root");
        assert_eq!(themes[0].sets, vec!["root"]);
    }

    #[test]
    fn test_discover_with_manifest() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("dtk.yaml"),
            r#"
tokens: design
selectors:
  dark: .dark
themes:
  - name: light
    exclude: [dark]
  - name: dark
    exclude: [light]
"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("design")).unwrap();
        fs::write(
            dir.path().join("design/$metadata.json"),
            r#"{"tokenSetOrder": ["core", "light", "dark"]}"#,
        )
        .unwrap();

        let project = discover(dir.path()).unwrap();
        assert!(project.has_manifest);

        let themes = project.themes();
        assert_eq!(themes[0].sets, vec!["core", "light"]);
        assert_eq!(themes[1].sets, vec!["core", "dark"]);
        assert_eq!(themes[1].selector.as_deref(), Some(".dark"));
        assert_eq!(themes[0].selector, None);
    }

    #[test]
    fn test_discover_missing_metadata_is_fatal() {
        let dir = tempdir().unwrap();
        assert!(discover(dir.path()).is_err());
    }

    #[test]
    fn test_discover_invalid_manifest_is_fatal() {
        let dir = tempdir().unwrap();
        write_metadata(dir.path(), r#"{"tokenSetOrder": []}"#);
        fs::write(dir.path().join("dtk.yaml"), "themes: [").unwrap();
        assert!(discover(dir.path()).is_err());
    }

    #[test]
    fn test_overrides_apply_before_metadata() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("design")).unwrap();
        fs::write(
            dir.path().join("design/$metadata.json"),
            r#"{"tokenSetOrder": ["core"]}"#,
        )
        .unwrap();

        let project = discover_with(dir.path(), |m| m.tokens = PathBuf::from("design")).unwrap();
        assert_eq!(project.metadata.sets(), &["core"]);
    }

    #[test]
    fn test_project_paths() {
        let project = Project::from_parts("/p", Manifest::default(), Metadata::default());
        assert_eq!(project.tokens_dir(), PathBuf::from("/p/tokens"));
        assert_eq!(project.metadata_path(), PathBuf::from("/p/tokens/$metadata.json"));
        assert_eq!(project.css_dir(), PathBuf::from("/p/css"));
        assert_eq!(project.json_dir(), PathBuf::from("/p/doc"));
    }

    #[test]
    fn test_load_store_reports_relative_provenance() {
        let dir = tempdir().unwrap();
        write_metadata(dir.path(), r#"{"tokenSetOrder": ["core", "absent"]}"#);
        fs::write(dir.path().join("tokens/core.json"), r#"{"a": {"value": "1"}}"#).unwrap();

        let project = discover(dir.path()).unwrap();
        let store = project.load_store().unwrap();

        assert_eq!(store.source_path("core"), "tokens/core.json");
        assert_eq!(store.missing(), vec!["absent"]);
    }

    #[test]
    fn test_pipeline_uses_manifest_prefix() {
        let mut manifest = Manifest::default();
        manifest.css.prefix = Some("--rolo".to_string());
        let project = Project::from_parts("/p", manifest, Metadata::default());
        assert_eq!(project.pipeline().prefix(), Some("rolo"));
    }
}
