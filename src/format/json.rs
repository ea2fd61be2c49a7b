//! Nested JSON documents and the combined theme merge.
//!
//! Each token's path segments, camel-cased, become nested keys and the last
//! segment holds the rendered value. After every theme is built the
//! per-theme documents are folded into a single object keyed by theme name.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{DtkError, Result};
use crate::transform::kebab_to_camel;
use crate::types::Token;

/// Key added to each merged document when the file tag is kept.
pub const FILE_TAG: &str = "nameOfFile";

/// Build the nested document for a property list.
///
/// Keys keep first-encounter order. A path that is both a leaf and a prefix
/// of another path always ends up a container.
pub fn nested_json(tokens: &[Token]) -> Value {
    let mut root = Map::new();

    for token in tokens {
        let Some(value) = token.value.to_json() else {
            continue;
        };
        let keys: Vec<String> = token.path.iter().map(|s| kebab_to_camel(s)).collect();
        insert_path(&mut root, &keys, value);
    }

    Value::Object(root)
}

fn insert_path(node: &mut Map<String, Value>, keys: &[String], value: Value) {
    let Some((last, parents)) = keys.split_last() else {
        return;
    };

    let mut node = node;
    for key in parents {
        let slot = node
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        node = match slot {
            Value::Object(map) => map,
            _ => return,
        };
    }

    match node.get(last) {
        Some(Value::Object(_)) => {}
        _ => {
            node.insert(last.clone(), value);
        }
    }
}

/// Write a document pretty-printed with a trailing newline.
pub fn write_document(path: &Path, document: &Value) -> Result<()> {
    let mut json = serde_json::to_string_pretty(document).map_err(|e| DtkError::Build {
        message: format!("Failed to serialize {}: {}", path.display(), e),
        help: None,
    })?;
    json.push('\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DtkError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    fs::write(path, json).map_err(|e| DtkError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write JSON document: {}", e),
    })
}

/// Settings for [`merge_documents`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// File name of the merged document inside the JSON directory.
    pub combined: String,
    /// Keep the [`FILE_TAG`] key in each merged document.
    pub keep_file_tag: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            combined: "combined.json".to_string(),
            keep_file_tag: false,
        }
    }
}

/// Fold `<dir>/<theme>.json` for every theme into `<dir>/<combined>`, then
/// delete the per-theme files.
///
/// Nothing is written or deleted unless every document reads and parses.
pub fn merge_documents(dir: &Path, themes: &[String], options: &MergeOptions) -> Result<PathBuf> {
    let mut combined = Map::new();

    for theme in themes {
        let mut document = read_document(&dir.join(format!("{}.json", theme)))?;
        if options.keep_file_tag {
            if let Value::Object(map) = &mut document {
                map.insert(FILE_TAG.to_string(), Value::String(theme.clone()));
            }
        }
        combined.insert(theme.clone(), document);
    }

    let combined_path = dir.join(&options.combined);
    write_document(&combined_path, &Value::Object(combined)).map_err(|e| DtkError::Merge {
        message: e.to_string(),
        help: None,
    })?;

    for theme in themes {
        let path = dir.join(format!("{}.json", theme));
        if path == combined_path {
            continue;
        }
        fs::remove_file(&path).map_err(|e| DtkError::Merge {
            message: format!("Failed to remove {}: {}", path.display(), e),
            help: None,
        })?;
    }

    Ok(combined_path)
}

fn read_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| DtkError::Merge {
        message: format!("Failed to read {}: {}", path.display(), e),
        help: Some("The theme's JSON build may have failed".to_string()),
    })?;

    serde_json::from_str(&content).map_err(|e| DtkError::Merge {
        message: format!("Invalid JSON in {}: {}", path.display(), e),
        help: None,
    })
}
