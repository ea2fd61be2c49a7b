//! Theme definitions.

use serde::{Deserialize, Serialize};

/// Selector used when a theme has none configured.
pub const DEFAULT_SELECTOR: &str = ":root";

/// Which properties of a theme's dictionary go into its CSS sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CssFilter {
    /// Only properties whose source file path contains the theme name.
    #[default]
    Namespace,
    /// Only properties not claimed by any other declared theme.
    Fallback,
    /// Every property.
    All,
}

/// A resolved theme: which token sets it loads and where it renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    /// Included token sets, in metadata order.
    pub sets: Vec<String>,
    /// CSS selector, `None` when no selector is configured.
    pub selector: Option<String>,
    pub filter: CssFilter,
    /// Structural themes only seed CSS defaults and get no JSON document.
    pub structural: bool,
}

impl Theme {
    /// The selector to scope this theme's CSS block with.
    pub fn effective_selector(&self) -> &str {
        self.selector.as_deref().unwrap_or(DEFAULT_SELECTOR)
    }

    /// File name of the theme's CSS sheet.
    pub fn css_file(&self) -> String {
        format!("{}.css", self.name)
    }

    /// File name of the theme's intermediate JSON document.
    pub fn json_file(&self) -> String {
        format!("{}.json", self.name)
    }
}
