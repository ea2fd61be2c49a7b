//! Project manifest (dtk.yaml) parsing.
//!
//! The manifest names the token directory, the output directories, the
//! formatting modes, and the themes with their exclusion lists. Every field
//! has a default, so an empty file is a valid manifest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DtkError, Result};
use crate::theme::ThemeConfig;
use crate::transform::{NameStyle, TransformOptions};
use crate::types::CssFilter;

/// Token set paths whose aliases are emitted as `var()` references.
pub const DEFAULT_REFERENCE_SOURCES: &[&str] = &[
    "semantics/color",
    "semantics/typography",
    "semantics/shadow",
    "semantics/mutable",
];

/// Project manifest loaded from dtk.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Directory holding the token set files.
    pub tokens: PathBuf,

    /// Metadata file name inside the token directory.
    pub metadata: String,

    pub css: CssConfig,

    pub json: JsonConfig,

    pub transforms: TransformOptions,

    /// Theme name -> CSS selector.
    pub selectors: BTreeMap<String, String>,

    /// Themes in output order.
    pub themes: Vec<ThemeConfig>,

    /// Patterns for token files to ignore when scanning the token directory.
    pub excludes: Vec<String>,
}

/// CSS output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    pub output: PathBuf,
    /// Custom-property prefix, e.g. `rolo` for `--rolo-spacing-sm`.
    pub prefix: Option<String>,
    /// Emit `var()` references for aliased tokens from reference sources.
    pub output_references: bool,
    /// Substrings of source file paths whose aliases stay references.
    pub references: Vec<String>,
    pub naming: NameStyle,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("css"),
            prefix: None,
            output_references: true,
            references: DEFAULT_REFERENCE_SOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            naming: NameStyle::default(),
        }
    }
}

/// JSON output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    pub output: PathBuf,
    /// File name of the merged document.
    pub combined: String,
    /// Keep the `nameOfFile` tag on each merged theme document.
    pub keep_file_tag: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("doc"),
            combined: "combined.json".to_string(),
            keep_file_tag: false,
        }
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            tokens: PathBuf::from("tokens"),
            metadata: "$metadata.json".to_string(),
            css: CssConfig::default(),
            json: JsonConfig::default(),
            transforms: TransformOptions::default(),
            selectors: BTreeMap::new(),
            themes: vec![],
            excludes: vec![],
        }
    }
}

impl Manifest {
    /// Load manifest from a dtk.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DtkError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| DtkError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check dtk.yaml syntax".to_string()),
        })
    }

    /// Declared themes, or a single structural `root` theme covering every
    /// set when none are declared.
    pub fn effective_themes(&self) -> Vec<ThemeConfig> {
        if self.themes.is_empty() {
            vec![ThemeConfig::new("root")
                .with_filter(CssFilter::Fallback)
                .structural()]
        } else {
            self.themes.clone()
        }
    }

    /// Check if a token file should be ignored based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }
}

/// Simple glob matching: `**/dir/*`, `*suffix`, `dir/*`, or substring.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(rest) = pattern.strip_prefix("**/") {
        return match rest.strip_suffix("/*") {
            Some(dir) => path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir)),
            None => path.contains(rest),
        };
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !suffix.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(dir) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
    }

    path.contains(pattern)
}
