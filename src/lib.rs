//! dtk - Design token build pipeline
//!
//! A library for turning design-token sets into per-theme CSS custom
//! property sheets and a combined, theme-keyed JSON document.

pub mod build;
pub mod cli;
pub mod dictionary;
pub mod discovery;
pub mod error;
pub mod format;
pub mod output;
pub mod theme;
pub mod transform;
pub mod types;
pub mod validation;

pub use build::{BuildReport, Builder, BuiltTheme, ThemeOutput};
pub use dictionary::{Dictionary, TokenStore};
pub use discovery::{discover, discover_with, Manifest, Metadata, Project};
pub use error::{DtkError, Result};
pub use format::{CssFormatter, CssOptions, MergeOptions};
pub use theme::{included_sets, ThemeConfig, ThemeResolver};
pub use transform::{NameStyle, Rounding, TransformOptions, TransformPipeline, ValueTransform};
pub use types::{
    Colour, CssFilter, ShadowSpec, Theme, Token, TokenValue, TypographySpec, DEFAULT_SELECTOR,
};
pub use validation::{validate, validate_project, Diagnostic, Severity, ValidationResult};
