//! Flattening nested token trees into path-addressed raw tokens.

use serde_json::{Map, Value};

/// A token as written in a set file, before alias resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawToken {
    pub path: Vec<String>,
    pub value: Value,
    pub token_type: Option<String>,
    pub description: Option<String>,
    pub file_path: String,
}

/// Walk a token tree and collect its leaves in document order.
///
/// An object with a `value` (or `$value`) key is a token; any other object
/// is a group whose keys become path segments. Group-level `$type` is
/// inherited by tokens that declare no type of their own.
pub fn flatten(tree: &Value, file_path: &str) -> Vec<RawToken> {
    let mut out = Vec::new();
    if let Value::Object(root) = tree {
        let mut path = Vec::new();
        walk(root, &mut path, None, file_path, &mut out);
    }
    out
}

fn walk(
    group: &Map<String, Value>,
    path: &mut Vec<String>,
    inherited_type: Option<&str>,
    file_path: &str,
    out: &mut Vec<RawToken>,
) {
    let group_type = string_field(group, &["$type"]);
    let inherited_type = group_type.as_deref().or(inherited_type);

    for (key, child) in group {
        if key.starts_with('$') {
            continue;
        }
        let Value::Object(node) = child else {
            continue;
        };

        path.push(key.clone());
        if let Some(value) = node.get("value").or_else(|| node.get("$value")) {
            out.push(RawToken {
                path: path.clone(),
                value: value.clone(),
                token_type: string_field(node, &["type", "$type"])
                    .or_else(|| inherited_type.map(str::to_string)),
                description: string_field(node, &["description", "$description"]),
                file_path: file_path.to_string(),
            });
        } else {
            walk(node, path, inherited_type, file_path, out);
        }
        path.pop();
    }
}

fn string_field(node: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| node.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}
