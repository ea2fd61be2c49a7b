//! Value and name transforms applied while building a theme.
//!
//! A [`TransformPipeline`] holds an ordered list of value rules. Every rule
//! whose matcher accepts a token rewrites its value, in registration order,
//! and later rules see the output of earlier ones:
//!
//! 1. `color/css` - canonical colour notation
//! 2. `value/formula` - `2*8` → `16px`
//! 3. `value/percent` - percentage passthrough, line-height descriptions
//! 4. `value/typography` - `font` shorthand
//! 5. `value/box-shadow` - shadow layers
//!
//! The name transform then assigns each token its custom-property name.

mod name;
mod value;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Token, TokenValue};

pub use name::{custom_property_name, kebab_case, kebab_to_camel, NameStyle};
pub use value::{
    format_number, remove_non_numeric, BoxShadow, ColourCss, Formula, Percent, Rounding,
    Typography,
};

/// A value rule: a pure matcher and an evaluator producing the new value.
pub trait ValueTransform: fmt::Debug + Send + Sync {
    /// Identifier used in diagnostics and `dtk list`.
    fn name(&self) -> &'static str;

    fn matches(&self, token: &Token) -> bool;

    fn apply(&self, token: &Token) -> TokenValue;
}

/// Formatting modes for the value rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Prefix box-shadow output with `inset `.
    pub shadow_inset: bool,
    /// Rounding strategy for formula results.
    pub rounding: Rounding,
}

/// Ordered transform pipeline, constructed once per build.
#[derive(Debug)]
pub struct TransformPipeline {
    rules: Vec<Box<dyn ValueTransform>>,
    prefix: Option<String>,
    naming: NameStyle,
}

impl TransformPipeline {
    /// The standard rule list configured with `options`.
    pub fn new(options: &TransformOptions) -> Self {
        let rules: Vec<Box<dyn ValueTransform>> = vec![
            Box::new(ColourCss),
            Box::new(Formula {
                rounding: options.rounding,
            }),
            Box::new(Percent),
            Box::new(Typography),
            Box::new(BoxShadow {
                inset: options.shadow_inset,
            }),
        ];

        Self {
            rules,
            prefix: None,
            naming: NameStyle::default(),
        }
    }

    /// Set the custom-property prefix. Leading dashes are ignored.
    pub fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix
            .map(|p| p.trim_start_matches('-').to_string())
            .filter(|p| !p.is_empty());
        self
    }

    pub fn with_naming(mut self, naming: NameStyle) -> Self {
        self.naming = naming;
        self
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Rule identifiers in application order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every matching value rule over the token.
    pub fn transform_value(&self, token: &mut Token) {
        for rule in &self.rules {
            if rule.matches(token) {
                token.value = rule.apply(token);
            }
        }
    }

    /// Assign the token's custom-property name.
    pub fn transform_name(&self, token: &mut Token) {
        token.name = custom_property_name(self.prefix.as_deref(), &token.path, self.naming);
    }

    /// Transform every token in place.
    pub fn apply_all(&self, tokens: &mut [Token]) {
        for token in tokens {
            self.transform_value(token);
            self.transform_name(token);
        }
    }
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new(&TransformOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TYPE_BOX_SHADOW, TYPE_COLOR, TYPE_LINE_HEIGHTS};
    use serde_json::json;

    fn token(path: &[&str], value: TokenValue) -> Token {
        Token::new(
            path.iter().map(|s| s.to_string()).collect(),
            value,
            "tokens/root.json",
        )
    }

    #[test]
    fn test_rule_order() {
        let pipeline = TransformPipeline::default();
        assert_eq!(
            pipeline.rule_names(),
            vec![
                "color/css",
                "value/formula",
                "value/percent",
                "value/typography",
                "value/box-shadow"
            ]
        );
    }

    #[test]
    fn test_formula_and_name() {
        let pipeline = TransformPipeline::default().with_prefix(Some("--rolo"));
        let mut tokens = vec![token(&["spacing", "sm"], TokenValue::Scalar("2*8".into()))];
        pipeline.apply_all(&mut tokens);

        assert_eq!(tokens[0].value, TokenValue::Scalar("16px".to_string()));
        assert_eq!(tokens[0].name, "rolo-spacing-sm");
        assert_eq!(tokens[0].path, vec!["spacing", "sm"]);
    }

    #[test]
    fn test_formula_runs_before_percent() {
        // Formula runs first and removes the percent sign before the
        // line-height rule would swap in the description.
        let pipeline = TransformPipeline::default();
        let mut t = token(&["lh"], TokenValue::Scalar("2*50%".into()))
            .with_type(TYPE_LINE_HEIGHTS)
            .with_description("1.2");
        pipeline.transform_value(&mut t);
        assert_eq!(t.value, TokenValue::Scalar("100px".to_string()));
    }

    #[test]
    fn test_original_is_untouched() {
        let pipeline = TransformPipeline::default();
        let mut t = token(&["c"], TokenValue::Scalar("#ABCDEF".into()))
            .with_type(TYPE_COLOR)
            .with_original(json!("{color.base.blue}"));
        pipeline.transform_value(&mut t);
        assert_eq!(t.value, TokenValue::Scalar("#abcdef".to_string()));
        assert_eq!(t.original_str(), Some("{color.base.blue}"));
    }

    #[test]
    fn test_options_select_variants() {
        let options = TransformOptions {
            shadow_inset: true,
            rounding: Rounding::Hundredths,
        };
        let pipeline = TransformPipeline::new(&options);
        let mut shadow = token(
            &["shadow"],
            TokenValue::from_json(
                Some(TYPE_BOX_SHADOW),
                &json!({"x": 0, "y": 0, "blur": 2, "color": "#000"}),
            ),
        )
        .with_type(TYPE_BOX_SHADOW);
        pipeline.transform_value(&mut shadow);
        assert_eq!(
            shadow.value,
            TokenValue::Scalar("inset 0px 0px 2px 0px #000".to_string())
        );
    }

    #[test]
    fn test_camel_naming() {
        let pipeline = TransformPipeline::default()
            .with_prefix(Some("rolo"))
            .with_naming(NameStyle::Camel);
        let mut t = token(&["font", "size-lg"], TokenValue::Scalar("20px".into()));
        pipeline.transform_name(&mut t);
        assert_eq!(t.name, "roloFontSizeLg");
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: TransformOptions = serde_yaml::from_str("shadow_inset: true").unwrap();
        assert!(options.shadow_inset);
        assert_eq!(options.rounding, Rounding::Direct);
    }
}
