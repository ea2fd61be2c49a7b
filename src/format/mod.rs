//! Output formatters.
//!
//! - [`css`] renders a selector-scoped custom-property block per theme.
//! - [`json`] renders nested documents and merges them into one file.

pub mod css;
pub mod json;

pub use css::{slugify_alias, CssFormatter, CssOptions};
pub use json::{merge_documents, nested_json, write_document, MergeOptions, FILE_TAG};
