//! Name transforms.
//!
//! Custom-property names are built by kebab-casing the prefix and path
//! segments. Nested JSON keys use [`kebab_to_camel`] on each path segment.

use serde::{Deserialize, Serialize};

/// Naming convention for CSS custom properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStyle {
    /// `--rolo-color-background-primary`
    #[default]
    Kebab,
    /// `--roloColorBackgroundPrimary`
    Camel,
}

/// Convert a hyphenated identifier to camelCase.
///
/// Each run of hyphens followed by a character is dropped and the character
/// upper-cased. A trailing run of hyphens has nothing to attach to and is
/// kept, which makes the function idempotent.
pub fn kebab_to_camel(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '-' {
            out.push(c);
            continue;
        }

        let mut run = 1;
        while chars.peek() == Some(&'-') {
            chars.next();
            run += 1;
        }

        match chars.next() {
            Some(next) => out.extend(next.to_uppercase()),
            None => out.extend(std::iter::repeat('-').take(run)),
        }
    }

    out
}

/// Convert arbitrary text to kebab-case.
///
/// Words break on any non-alphanumeric character, on a lower-case letter or
/// digit followed by an upper-case letter (`fontSize`), and before the last
/// capital of an acronym (`HTMLParser` → `html-parser`).
pub fn kebab_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        // A non-empty word means chars[i - 1] was alphanumeric and kept.
        if !current.is_empty() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let camel_hump = (prev.is_ascii_lowercase() || prev.is_ascii_digit())
                && c.is_ascii_uppercase();
            let acronym_end = prev.is_ascii_uppercase()
                && c.is_ascii_uppercase()
                && next.is_some_and(|n| n.is_ascii_lowercase());
            if camel_hump || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c.to_ascii_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}

/// Build a custom-property name (without the leading `--`) from an optional
/// prefix and a token path.
pub fn custom_property_name(prefix: Option<&str>, path: &[String], style: NameStyle) -> String {
    let joined = prefix
        .into_iter()
        .chain(path.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    let name = kebab_case(&joined);

    match style {
        NameStyle::Kebab => name,
        NameStyle::Camel => kebab_to_camel(&name),
    }
}
