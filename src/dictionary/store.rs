//! Token set storage.
//!
//! Every set named in the metadata is read and parsed once per run. Theme
//! builds then borrow the parsed trees; nothing is written back.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{DtkError, Result};

#[derive(Debug)]
enum SetSource {
    Loaded(Value),
    Missing,
    Invalid(String),
}

/// Parsed token sets keyed by set name.
#[derive(Debug)]
pub struct TokenStore {
    root: PathBuf,
    label: PathBuf,
    order: Vec<String>,
    sets: HashMap<String, SetSource>,
}

impl TokenStore {
    /// Read every set under `root`.
    ///
    /// A set with no file is recorded as missing and a set with invalid JSON
    /// is recorded as invalid; both only affect themes that include them.
    /// Any other read failure aborts.
    pub fn load(root: &Path, set_names: &[String]) -> Result<Self> {
        let mut store = Self::empty(root);

        for name in set_names {
            if store.sets.contains_key(name) {
                continue;
            }
            let path = store.file_path(name);
            let source = match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(tree) => SetSource::Loaded(tree),
                    Err(e) => SetSource::Invalid(e.to_string()),
                },
                Err(e) if e.kind() == ErrorKind::NotFound => SetSource::Missing,
                Err(e) => {
                    return Err(DtkError::Io {
                        path,
                        message: format!("Failed to read token set: {}", e),
                    })
                }
            };
            store.insert(name.clone(), source);
        }

        Ok(store)
    }

    /// Build a store from in-memory trees.
    pub fn from_values<I, S>(root: impl AsRef<Path>, sets: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut store = Self::empty(root.as_ref());
        for (name, tree) in sets {
            store.insert(name.into(), SetSource::Loaded(tree));
        }
        store
    }

    fn empty(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            label: root.to_path_buf(),
            order: Vec::new(),
            sets: HashMap::new(),
        }
    }

    fn insert(&mut self, name: String, source: SetSource) {
        if self.sets.insert(name.clone(), source).is_none() {
            self.order.push(name);
        }
    }

    /// Where the set's file lives: `<root>/<set>.json`.
    pub fn file_path(&self, set: &str) -> PathBuf {
        self.root.join(format!("{}.json", set))
    }

    /// Report provenance relative to `label` instead of the read root,
    /// e.g. `tokens` rather than an absolute project path.
    pub fn with_label(mut self, label: impl Into<PathBuf>) -> Self {
        self.label = label.into();
        self
    }

    /// Provenance string recorded on every token loaded from `set`.
    pub fn source_path(&self, set: &str) -> String {
        self.label
            .join(format!("{}.json", set))
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// The parsed tree for `set`, `None` if the set has no file or was never
    /// requested.
    pub fn get(&self, set: &str) -> Result<Option<&Value>> {
        match self.sets.get(set) {
            Some(SetSource::Loaded(tree)) => Ok(Some(tree)),
            Some(SetSource::Missing) | None => Ok(None),
            Some(SetSource::Invalid(message)) => Err(DtkError::Parse {
                message: format!("Invalid token set '{}': {}", set, message),
                help: Some(format!("Check {}", self.file_path(set).display())),
            }),
        }
    }

    /// Sets that had no file, in request order.
    pub fn missing(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|name| matches!(self.sets.get(*name), Some(SetSource::Missing)))
            .map(String::as_str)
            .collect()
    }

    /// Sets whose file could not be parsed, with the parser's message.
    pub fn invalid(&self) -> Vec<(&str, &str)> {
        self.order
            .iter()
            .filter_map(|name| match self.sets.get(name) {
                Some(SetSource::Invalid(message)) => Some((name.as_str(), message.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
