//! Token dictionary construction.
//!
//! Builds one theme's flat property list from its ordered token sets:
//! flatten each set, merge with later-wins override semantics, resolve
//! aliases, then lift each value into a [`TokenValue`].
//!
//! # Example
//!
//! ```ignore
//! use dtk::dictionary::{Dictionary, TokenStore};
//!
//! let store = TokenStore::load(Path::new("tokens"), &sets)?;
//! let dictionary = Dictionary::build(&store, &theme.sets)?;
//! for token in dictionary.tokens() {
//!     println!("{} = {:?}", token.dotted_path(), token.value);
//! }
//! ```

mod alias;
mod flatten;
mod store;

use std::collections::HashMap;

use crate::error::Result;
use crate::types::{Token, TokenValue};
use crate::validation::{Diagnostic, ValidationResult};

pub use alias::{is_alias, references, single_alias, Unresolved};
pub use flatten::{flatten, RawToken};
pub use store::TokenStore;

use alias::AliasResolver;

/// A theme's resolved, flattened token list.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    tokens: Vec<Token>,
    index: HashMap<String, usize>,
    diagnostics: ValidationResult,
}

impl Dictionary {
    /// Build from the store's sets, in the given order.
    ///
    /// Sets without a file are skipped. A set with invalid JSON fails the
    /// whole dictionary.
    pub fn build(store: &TokenStore, sets: &[String]) -> Result<Self> {
        let mut raw = Vec::new();
        for set in sets {
            if let Some(tree) = store.get(set)? {
                let file_path = store.source_path(set);
                raw.extend(flatten(tree, &file_path));
            }
        }
        Ok(Self::from_raw(raw))
    }

    /// Merge and resolve raw tokens. Later tokens override earlier ones with
    /// the same path but keep the earlier position.
    pub fn from_raw(raw: impl IntoIterator<Item = RawToken>) -> Self {
        let mut merged: Vec<RawToken> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for token in raw {
            let key = token.path.join(".");
            match index.get(&key) {
                Some(&i) => merged[i] = token,
                None => {
                    index.insert(key, merged.len());
                    merged.push(token);
                }
            }
        }

        let values: Vec<_> = merged.iter().map(|t| t.value.clone()).collect();
        let mut resolver = AliasResolver::new(&values, &index);
        let mut diagnostics = ValidationResult::new();
        let mut tokens = Vec::with_capacity(merged.len());

        for (i, raw) in merged.into_iter().enumerate() {
            let (resolved, unresolved) = resolver.resolve_token(i);
            let dotted = raw.path.join(".");
            for problem in unresolved {
                diagnostics.push(unresolved_diagnostic(&dotted, &raw.file_path, problem));
            }

            let value = TokenValue::from_json(raw.token_type.as_deref(), &resolved);
            let mut token = Token::new(raw.path, value, raw.file_path).with_original(raw.value);
            token.token_type = raw.token_type;
            token.description = raw.description;
            tokens.push(token);
        }

        Self {
            tokens,
            index,
            diagnostics,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Look up a token by dotted path.
    pub fn get(&self, path: &str) -> Option<&Token> {
        self.index.get(path).map(|&i| &self.tokens[i])
    }

    /// Alias problems found while resolving.
    pub fn diagnostics(&self) -> &ValidationResult {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn unresolved_diagnostic(path: &str, file_path: &str, problem: Unresolved) -> Diagnostic {
    match problem {
        Unresolved::Missing(reference) => Diagnostic::warning(
            "dtk::alias::missing",
            format!("Token '{}' references unknown token '{{{}}}'", path, reference),
        )
        .with_help(format!("Defined in {}", file_path)),
        Unresolved::Cycle(reference) => Diagnostic::warning(
            "dtk::alias::cycle",
            format!("Token '{}' has a circular reference through '{{{}}}'", path, reference),
        )
        .with_help("Circular aliases are left unresolved"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> TokenStore {
        TokenStore::from_values(
            "tokens",
            vec![
                (
                    "core",
                    json!({
                        "color": {"base": {"blue": {"value": "#0000FF", "type": "color"}}},
                        "spacing": {"sm": {"value": "2*8", "type": "spacing"}}
                    }),
                ),
                (
                    "light",
                    json!({
                        "color": {"background": {"value": "{color.base.blue}", "type": "color"}},
                        "spacing": {"sm": {"value": "4*2", "type": "spacing"}}
                    }),
                ),
            ],
        )
    }

    #[test]
    fn test_later_set_overrides_in_place() {
        let sets = vec!["core".to_string(), "light".to_string()];
        let dictionary = Dictionary::build(&store(), &sets).unwrap();

        let paths: Vec<String> = dictionary.tokens().iter().map(Token::dotted_path).collect();
        assert_eq!(
            paths,
            vec!["color.base.blue", "spacing.sm", "color.background"]
        );

        let spacing = dictionary.get("spacing.sm").unwrap();
        assert_eq!(spacing.value, TokenValue::Scalar("4*2".to_string()));
        assert!(spacing.file_path.ends_with("light.json"));
    }

    #[test]
    fn test_alias_resolved_and_original_kept() {
        let sets = vec!["core".to_string(), "light".to_string()];
        let dictionary = Dictionary::build(&store(), &sets).unwrap();

        let background = dictionary.get("color.background").unwrap();
        assert_eq!(background.value, TokenValue::Scalar("#0000FF".to_string()));
        assert_eq!(background.original_str(), Some("{color.base.blue}"));
        assert!(dictionary.diagnostics().is_ok());
    }

    #[test]
    fn test_missing_sets_are_skipped() {
        let sets = vec!["core".to_string(), "absent".to_string()];
        let dictionary = Dictionary::build(&store(), &sets).unwrap();
        assert_eq!(dictionary.len(), 2);
    }

    #[test]
    fn test_unresolved_alias_reported() {
        let raw = flatten(&json!({"a": {"value": "{missing.token}"}}), "tokens/core.json");
        let dictionary = Dictionary::from_raw(raw);
        assert_eq!(dictionary.diagnostics().warning_count(), 1);
        assert_eq!(
            dictionary.get("a").unwrap().value,
            TokenValue::Scalar("{missing.token}".to_string())
        );
    }

    #[test]
    fn test_each_cycle_member_is_reported() {
        let raw = flatten(
            &json!({"a": {"value": "{b}"}, "b": {"value": "{a}"}}),
            "tokens/core.json",
        );
        let dictionary = Dictionary::from_raw(raw);
        let messages: Vec<&str> = dictionary
            .diagnostics()
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("Token 'a'"));
        assert!(messages[1].starts_with("Token 'b'"));
    }
}
