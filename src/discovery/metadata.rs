//! Token set metadata (`$metadata.json`).
//!
//! The metadata maps group names to lists of token set names, e.g.
//! `{"tokenSetOrder": ["core", "light", "dark"]}`. All lists are flattened
//! in document order into the global set list every theme is cut from.

use std::path::Path;

use serde_json::Value;

use crate::error::{DtkError, Result};

/// The global, ordered token set list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    sets: Vec<String>,
}

impl Metadata {
    /// Load metadata from a file. Any failure here is fatal for the run.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DtkError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read token metadata: {}", e),
        })?;

        Self::parse(&content).map_err(|e| match e {
            DtkError::Parse { message, .. } => DtkError::Parse {
                message,
                help: Some(format!("Check {}", path.display())),
            },
            other => other,
        })
    }

    /// Parse metadata JSON. Array values are flattened, string values kept,
    /// anything else ignored. Repeated names keep their first position.
    pub fn parse(content: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(content).map_err(|e| DtkError::Parse {
            message: format!("Invalid token metadata: {}", e),
            help: None,
        })?;

        let Value::Object(groups) = document else {
            return Err(DtkError::Parse {
                message: "Token metadata must be a JSON object".to_string(),
                help: Some(r#"Expected e.g. {"tokenSetOrder": ["core", "light"]}"#.to_string()),
            });
        };

        let mut sets = Vec::new();
        for value in groups.values() {
            match value {
                Value::Array(items) => sets.extend(items.iter().filter_map(Value::as_str)),
                Value::String(s) => sets.push(s.as_str()),
                _ => {}
            }
        }

        Ok(Self::from_sets(sets))
    }

    pub fn from_sets<I, S>(sets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for set in sets {
            let set = set.into();
            if !unique.contains(&set) {
                unique.push(set);
            }
        }
        Self { sets: unique }
    }

    /// Set names in discovery order.
    pub fn sets(&self) -> &[String] {
        &self.sets
    }

    pub fn contains(&self, set: &str) -> bool {
        self.sets.iter().any(|s| s == set)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
