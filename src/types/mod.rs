//! Core domain types for dtk.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `Token` / `TokenValue` - a design token and its tagged value
//! - `Colour` - RGBA colours with canonical CSS rendering
//! - `Theme` - a named selection of token sets and its CSS scope

mod colour;
mod theme;
mod token;

pub use colour::Colour;
pub use theme::{CssFilter, Theme, DEFAULT_SELECTOR};
pub use token::{
    ShadowSpec, Token, TokenValue, TypographySpec, TYPE_BOX_SHADOW, TYPE_COLOR,
    TYPE_LINE_HEIGHTS, TYPE_TYPOGRAPHY,
};
