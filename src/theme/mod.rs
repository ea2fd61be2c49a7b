//! Theme membership resolution.
//!
//! A theme never lists the sets it loads. It names the sets it excludes, and
//! its inclusion list is recomputed on every run as the metadata's global set
//! list minus those exclusions. Metadata order is kept because later sets
//! override earlier ones on duplicate token paths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{CssFilter, Theme};

/// A theme as declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub name: String,
    /// Token set names to leave out. Matched exactly, never by substring.
    pub exclude: Vec<String>,
    pub filter: CssFilter,
    /// Seeds CSS defaults only; no JSON document, no combined entry.
    pub structural: bool,
}

impl ThemeConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn excluding<I, S>(mut self, sets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(sets.into_iter().map(Into::into));
        self
    }

    pub fn with_filter(mut self, filter: CssFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn structural(mut self) -> Self {
        self.structural = true;
        self
    }
}

/// `all_sets - excluded`, in `all_sets` order.
pub fn included_sets(all_sets: &[String], excluded: &[String]) -> Vec<String> {
    all_sets
        .iter()
        .filter(|set| !excluded.contains(set))
        .cloned()
        .collect()
}

/// Look up a theme's selector. Unknown themes get `None`.
pub fn selector_for(selectors: &BTreeMap<String, String>, theme: &str) -> Option<String> {
    selectors.get(theme).cloned()
}

/// Turns theme declarations into resolved themes against one set list.
#[derive(Debug, Clone, Copy)]
pub struct ThemeResolver<'a> {
    all_sets: &'a [String],
    selectors: &'a BTreeMap<String, String>,
}

impl<'a> ThemeResolver<'a> {
    pub fn new(all_sets: &'a [String], selectors: &'a BTreeMap<String, String>) -> Self {
        Self {
            all_sets,
            selectors,
        }
    }

    pub fn resolve(&self, config: &ThemeConfig) -> Theme {
        Theme {
            name: config.name.clone(),
            sets: included_sets(self.all_sets, &config.exclude),
            selector: selector_for(self.selectors, &config.name),
            filter: config.filter,
            structural: config.structural,
        }
    }

    /// Resolve every declaration, keeping declaration order.
    pub fn resolve_all(&self, configs: &[ThemeConfig]) -> Vec<Theme> {
        configs.iter().map(|c| self.resolve(c)).collect()
    }
}

/// Decide whether a property from `file_path` belongs in `theme`'s CSS sheet.
///
/// `themes` is the full declared list; the fallback filter keeps only files
/// that no other theme's name appears in.
pub fn css_includes(theme: &Theme, themes: &[Theme], file_path: &str) -> bool {
    match theme.filter {
        CssFilter::All => true,
        CssFilter::Namespace => file_path.contains(&theme.name),
        CssFilter::Fallback => {
            file_path.contains(&theme.name)
                || !themes
                    .iter()
                    .filter(|other| other.name != theme.name)
                    .any(|other| file_path.contains(&other.name))
        }
    }
}
