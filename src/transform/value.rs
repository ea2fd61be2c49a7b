//! Value transform rules.
//!
//! Each rule is a matcher over the token plus an evaluator producing the new
//! value. Rules never touch `path` or `original`.

use serde::{Deserialize, Serialize};

use crate::types::{
    Colour, ShadowSpec, Token, TokenValue, TypographySpec, TYPE_BOX_SHADOW, TYPE_COLOR,
    TYPE_LINE_HEIGHTS, TYPE_TYPOGRAPHY,
};

use super::ValueTransform;

/// Rounding strategy for formula results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// `round(n * 10) / 10`
    #[default]
    Direct,
    /// `round(round(n * 100) / 10) / 10`. Double rounding: can land on a
    /// different tenth than `Direct` when the hundredths digit is 4 and a
    /// later digit pushes it to 5 (e.g. 0.149 → 0.2 instead of 0.1).
    Hundredths,
}

impl Rounding {
    /// Round to the nearest tenth.
    pub fn round_tenth(self, n: f64) -> f64 {
        match self {
            Rounding::Direct => js_round(n * 10.0) / 10.0,
            Rounding::Hundredths => js_round(js_round(n * 100.0) / 10.0) / 10.0,
        }
    }
}

/// Half-up rounding, matching what design tools emit (`-0.5` → `0`).
fn js_round(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Parse a loosely written number by keeping only digits, `.` and `-`.
///
/// Absent or unparseable input counts as zero.
pub fn remove_non_numeric(s: Option<&str>) -> f64 {
    let Some(s) = s else {
        return 0.0;
    };
    let kept: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    kept.parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Print a number the way a CSS author writes it: `16`, `1.5`, never `-0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Canonicalises colour tokens (`#FFF` → `#ffffff`, alpha → `rgba()`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ColourCss;

impl ValueTransform for ColourCss {
    fn name(&self) -> &'static str {
        "color/css"
    }

    fn matches(&self, token: &Token) -> bool {
        token.is_type(TYPE_COLOR)
            && token
                .value
                .as_scalar()
                .is_some_and(|s| Colour::parse_css(s).is_ok())
    }

    fn apply(&self, token: &Token) -> TokenValue {
        match token.value.as_scalar().map(Colour::parse_css) {
            Some(Ok(colour)) => TokenValue::Scalar(colour.to_string()),
            _ => token.value.clone(),
        }
    }
}

/// Evaluates `A*B` products into pixel values: `"2*8"` → `"16px"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formula {
    pub rounding: Rounding,
}

impl ValueTransform for Formula {
    fn name(&self) -> &'static str {
        "value/formula"
    }

    fn matches(&self, token: &Token) -> bool {
        token.value.as_scalar().is_some_and(|s| s.contains('*'))
    }

    fn apply(&self, token: &Token) -> TokenValue {
        let Some(expr) = token.value.as_scalar() else {
            return token.value.clone();
        };
        let mut operands = expr.split('*');
        let a = remove_non_numeric(operands.next());
        let b = remove_non_numeric(operands.next());
        TokenValue::Scalar(format!("{}px", format_number(self.rounding.round_tenth(a * b))))
    }
}

/// Percentage passthrough. Line heights take their description instead,
/// letting a percentage token carry a hand-written override.
#[derive(Debug, Clone, Copy, Default)]
pub struct Percent;

impl ValueTransform for Percent {
    fn name(&self) -> &'static str {
        "value/percent"
    }

    fn matches(&self, token: &Token) -> bool {
        token.value.as_scalar().is_some_and(|s| s.contains('%'))
    }

    fn apply(&self, token: &Token) -> TokenValue {
        if !token.is_type(TYPE_LINE_HEIGHTS) {
            return token.value.clone();
        }
        match &token.description {
            Some(description) => TokenValue::Scalar(description.clone()),
            None => TokenValue::Empty,
        }
    }
}

/// Folds a typography composite into the `font` shorthand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Typography;

impl Typography {
    fn shorthand(spec: &TypographySpec) -> Option<String> {
        let size = spec.font_size.as_deref()?;
        let line_height = spec.line_height.as_deref()?;
        let family = spec.font_family.as_deref()?;
        Some(format!("400 {}/{} {}", size, line_height, family))
    }
}

impl ValueTransform for Typography {
    fn name(&self) -> &'static str {
        "value/typography"
    }

    fn matches(&self, token: &Token) -> bool {
        token.is_type(TYPE_TYPOGRAPHY) && matches!(token.value, TokenValue::Typography(_))
    }

    fn apply(&self, token: &Token) -> TokenValue {
        match &token.value {
            TokenValue::Typography(spec) => {
                Self::shorthand(spec).map_or(TokenValue::Empty, TokenValue::Scalar)
            }
            other => other.clone(),
        }
    }
}

/// Renders one or more shadow layers into a `box-shadow` value.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxShadow {
    /// Prefix the whole result with `inset `.
    pub inset: bool,
}

impl BoxShadow {
    fn layer(spec: &ShadowSpec) -> Option<String> {
        Some(format!(
            "{}px {}px {}px {}px {}",
            spec.x.as_deref()?,
            spec.y.as_deref()?,
            spec.blur.as_deref()?,
            format_number(remove_non_numeric(spec.spread.as_deref())),
            spec.color.as_deref()?,
        ))
    }

    fn finish(&self, rendered: String) -> TokenValue {
        if self.inset {
            TokenValue::Scalar(format!("inset {}", rendered))
        } else {
            TokenValue::Scalar(rendered)
        }
    }
}

impl ValueTransform for BoxShadow {
    fn name(&self) -> &'static str {
        "value/box-shadow"
    }

    fn matches(&self, token: &Token) -> bool {
        token.is_type(TYPE_BOX_SHADOW)
    }

    fn apply(&self, token: &Token) -> TokenValue {
        match &token.value {
            TokenValue::Shadow(spec) => Self::layer(spec)
                .map_or(TokenValue::Empty, |layer| self.finish(layer)),
            TokenValue::ShadowList(specs) => specs
                .iter()
                .map(Self::layer)
                .collect::<Option<Vec<_>>>()
                .map_or(TokenValue::Empty, |layers| self.finish(layers.join(", "))),
            TokenValue::Scalar(s) => self.finish(s.clone()),
            other => other.clone(),
        }
    }
}
