//! Alias references (`{group.token}`) and their resolution.

use std::collections::HashMap;

use serde_json::Value;

/// Why a reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
    /// No token has this path.
    Missing(String),
    /// The reference leads back to a token already being resolved.
    Cycle(String),
}

/// Every `{...}` reference in `s`, in order of appearance.
pub fn references(s: &str) -> Vec<&str> {
    let mut refs = Vec::new();
    let mut rest = s;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        let inner = &after[..close];
        if !inner.is_empty() && !inner.contains('{') {
            refs.push(inner);
        }
        rest = &after[close + 1..];
    }
    refs
}

/// Whether `s` contains at least one alias reference.
pub fn is_alias(s: &str) -> bool {
    !references(s).is_empty()
}

/// The reference when `s` is exactly one alias and nothing else.
pub fn single_alias(s: &str) -> Option<&str> {
    let inner = s.trim().strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains('{') || inner.contains('}') {
        None
    } else {
        Some(inner)
    }
}

/// Resolves aliases against a dictionary's raw values.
///
/// Results are memoised per token together with the references that token
/// left unresolved, so each chain is walked once and a cached hit still
/// reports its problems. A value resolved while a cycle was detected depends
/// on where the walk entered the cycle and is never cached.
pub(crate) struct AliasResolver<'a> {
    raw: &'a [Value],
    index: &'a HashMap<String, usize>,
    cache: Vec<Option<(Value, Vec<Unresolved>)>>,
    visiting: Vec<usize>,
    unresolved: Vec<Unresolved>,
    cycles: usize,
}

impl<'a> AliasResolver<'a> {
    pub fn new(raw: &'a [Value], index: &'a HashMap<String, usize>) -> Self {
        Self {
            raw,
            index,
            cache: vec![None; raw.len()],
            visiting: Vec::new(),
            unresolved: Vec::new(),
            cycles: 0,
        }
    }

    /// Resolve the token at `idx`, returning its value and the references
    /// that had to be left as written.
    pub fn resolve_token(&mut self, idx: usize) -> (Value, Vec<Unresolved>) {
        self.unresolved.clear();
        let value = self.resolve_index(idx);
        (value, std::mem::take(&mut self.unresolved))
    }

    fn resolve_index(&mut self, idx: usize) -> Value {
        if let Some((value, unresolved)) = &self.cache[idx] {
            self.unresolved.extend(unresolved.iter().cloned());
            return value.clone();
        }

        let first = self.unresolved.len();
        let cycles = self.cycles;
        self.visiting.push(idx);
        let raw = self.raw[idx].clone();
        let value = self.resolve_value(&raw);
        self.visiting.pop();

        if self.cycles == cycles {
            let unresolved = self.unresolved[first..].to_vec();
            self.cache[idx] = Some((value.clone(), unresolved));
        }
        value
    }

    fn resolve_value(&mut self, value: &Value) -> Value {
        match value {
            Value::String(s) => self.resolve_string(s),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.resolve_value(v)).collect()),
            Value::Object(obj) => Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), self.resolve_value(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn resolve_string(&mut self, s: &str) -> Value {
        if let Some(reference) = single_alias(s) {
            return self
                .lookup(reference)
                .unwrap_or_else(|| Value::String(s.to_string()));
        }

        if !is_alias(s) {
            return Value::String(s.to_string());
        }

        let mut out = s.to_string();
        for reference in references(s) {
            if let Some(target) = self.lookup(reference) {
                let text = match target {
                    Value::String(t) => t,
                    other => other.to_string(),
                };
                out = out.replacen(&format!("{{{}}}", reference), &text, 1);
            }
        }
        Value::String(out)
    }

    fn lookup(&mut self, reference: &str) -> Option<Value> {
        let index = self.index;
        let idx = index.get(reference).or_else(|| {
            reference
                .strip_suffix(".value")
                .and_then(|r| index.get(r))
        });
        let Some(&idx) = idx else {
            self.unresolved.push(Unresolved::Missing(reference.to_string()));
            return None;
        };

        if self.visiting.contains(&idx) {
            self.unresolved.push(Unresolved::Cycle(reference.to_string()));
            self.cycles += 1;
            return None;
        }

        Some(self.resolve_index(idx))
    }
}
