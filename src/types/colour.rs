//! Colour parsing and CSS rendering.
//!
//! Colour tokens are normalised to one canonical CSS form: lowercase
//! `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise.

use std::fmt;
use std::str::FromStr;

use crate::error::{DtkError, Result};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse any supported CSS colour notation.
    ///
    /// Supports `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, `rgb(r, g, b)` and
    /// `rgba(r, g, b, a)` with a fractional alpha.
    pub fn parse_css(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::from_hex(s);
        }

        let lower = s.to_ascii_lowercase();
        let args = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| invalid(s))?;

        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(invalid(s));
        }

        let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid(s));
        let r = channel(parts[0])?;
        let g = channel(parts[1])?;
        let b = channel(parts[2])?;
        let a = match parts.get(3) {
            Some(p) => {
                let alpha: f64 = p.parse().map_err(|_| invalid(s))?;
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(invalid(s));
                }
                (alpha * 255.0).round() as u8
            }
            None => 255,
        };

        Ok(Self::new(r, g, b, a))
    }

    /// Parse a hex colour string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() {
            return Err(invalid(s));
        }

        match hex.len() {
            3 | 4 => {
                let mut nibbles = [15u8; 4];
                for (slot, c) in nibbles.iter_mut().zip(hex.chars()) {
                    *slot = parse_hex_digit(c)?;
                }
                let [r, g, b, a] = nibbles.map(|n| n << 4 | n);
                Ok(Self::new(r, g, b, a))
            }
            6 | 8 => {
                let r = parse_hex_byte(&hex[0..2])?;
                let g = parse_hex_byte(&hex[2..4])?;
                let b = parse_hex_byte(&hex[4..6])?;
                let a = if hex.len() == 8 {
                    parse_hex_byte(&hex[6..8])?
                } else {
                    255
                };
                Ok(Self::new(r, g, b, a))
            }
            _ => Err(invalid(s)),
        }
    }

    /// Check if the colour is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Alpha as a fraction rounded to two decimals.
    fn alpha_fraction(self) -> f64 {
        (f64::from(self.a) / 255.0 * 100.0).round() / 100.0
    }
}

impl FromStr for Colour {
    type Err = DtkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_css(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                self.alpha_fraction()
            )
        }
    }
}

fn invalid(s: &str) -> DtkError {
    DtkError::Parse {
        message: format!("Invalid colour: {}", s),
        help: Some("Use #RGB, #RRGGBB, #RRGGBBAA, rgb() or rgba() notation".to_string()),
    }
}

/// Parse a single hex digit.
fn parse_hex_digit(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| DtkError::Parse {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| DtkError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}
