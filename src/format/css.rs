//! Reference-aware CSS custom-property formatter.
//!
//! Renders a theme's property list as one selector-scoped block:
//!
//! ```text
//! .dark {
//!   --rolo-color-background: var(--rolo-color-base-gray-900);
//!   --rolo-spacing-sm: 16px;
//! }
//! ```
//!
//! Aliased tokens from referenceable sources keep pointing at the aliased
//! property through `var()`, so two themes can share property names while
//! redirecting to different underlying values.

use crate::dictionary::single_alias;
use crate::discovery::DEFAULT_REFERENCE_SOURCES;
use crate::transform::{custom_property_name, NameStyle};
use crate::types::{Token, DEFAULT_SELECTOR};

/// Options for one CSS sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssOptions {
    /// Custom-property prefix without leading dashes.
    pub prefix: Option<String>,
    /// Emit `var()` references for aliased tokens.
    pub output_references: bool,
    /// Substrings of source file paths whose aliases may become references.
    pub references: Vec<String>,
    /// Naming convention of the declared properties; references follow it.
    pub naming: NameStyle,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
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

impl CssOptions {
    pub fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix
            .map(|p| p.trim_start_matches('-').to_string())
            .filter(|p| !p.is_empty());
        self
    }

    pub fn with_references(mut self, output_references: bool) -> Self {
        self.output_references = output_references;
        self
    }

    pub fn with_naming(mut self, naming: NameStyle) -> Self {
        self.naming = naming;
        self
    }
}

/// Formats property lists into CSS blocks.
#[derive(Debug, Clone, Default)]
pub struct CssFormatter {
    options: CssOptions,
}

impl CssFormatter {
    pub fn new(options: CssOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CssOptions {
        &self.options
    }

    /// Render `tokens` under `selector` (`:root` when `None`). Tokens whose
    /// value rendered empty are left out.
    pub fn format(&self, tokens: &[Token], selector: Option<&str>) -> String {
        let selector = selector.unwrap_or(DEFAULT_SELECTOR);
        let mut output = format!("{} {{\n", selector);

        for token in tokens {
            if let Some(declaration) = self.declaration(token) {
                output.push_str("  ");
                output.push_str(&declaration);
                output.push('\n');
            }
        }

        output.push_str("}\n");
        output
    }

    /// A single `--name: value;` line, without indentation.
    pub fn declaration(&self, token: &Token) -> Option<String> {
        let rendered = token.value.render()?;
        let value = self.reference(token, &rendered).unwrap_or(rendered);
        Some(format!("--{}: {};", token.name, value))
    }

    /// The `var()` form of the token's alias, when it qualifies.
    fn reference(&self, token: &Token, rendered: &str) -> Option<String> {
        if !self.options.output_references {
            return None;
        }

        let original = token.original_str()?;
        if original == rendered {
            return None;
        }
        let alias = single_alias(original)?;

        if !self.is_reference_source(&token.file_path) {
            return None;
        }

        let alias = alias.strip_suffix(".value").unwrap_or(alias);
        let slug = [slugify_alias(alias)];
        let name =
            custom_property_name(self.options.prefix.as_deref(), &slug, self.options.naming);
        Some(format!("var(--{})", name))
    }

    fn is_reference_source(&self, file_path: &str) -> bool {
        self.options
            .references
            .iter()
            .any(|source| file_path.contains(source.as_str()))
    }
}

/// Turn alias text back into a custom-property name:
/// `{color.baseGray.900}` → `color-base-gray-900`.
pub fn slugify_alias(alias: &str) -> String {
    let mut slug = String::with_capacity(alias.len() + 4);
    for c in alias.chars() {
        match c {
            '{' | '}' => {}
            '.' => slug.push('-'),
            c if c.is_ascii_uppercase() => {
                slug.push('-');
                slug.push(c.to_ascii_lowercase());
            }
            c => slug.push(c),
        }
    }
    slug
}
