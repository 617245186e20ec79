//! CSS Parser using lightningcss
//!
//! Parses CSS stylesheets into simple-selector rules.

use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;

use crate::sheet::{Declaration, Rule, SelectorStyleSheet, SimpleSelector};
use crate::CssError;

/// CSS Parser
#[derive(Debug, Default)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a CSS stylesheet
    pub fn parse(&self, css: &str) -> Result<SelectorStyleSheet, CssError> {
        // lightningcss lines are zero-based
        let stylesheet = StyleSheet::parse(css, ParserOptions::default()).map_err(|e| {
            CssError::ParseError {
                line: e.loc.as_ref().map_or(0, |loc| loc.line + 1),
                message: e.kind.to_string(),
            }
        })?;

        let mut result = SelectorStyleSheet::new();
        for rule in stylesheet.rules.0.iter() {
            if let Some(converted) = self.convert_rule(rule) {
                result.push(converted);
            }
        }

        tracing::debug!("Parsed stylesheet: {} rule(s)", result.len());
        Ok(result)
    }

    fn convert_rule(&self, rule: &CssRule) -> Option<Rule> {
        match rule {
            CssRule::Style(style_rule) => {
                let text = match style_rule.selectors.to_css_string(PrinterOptions::default()) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::debug!("Skipping rule with unprintable selector: {:?}", e);
                        return None;
                    }
                };
                let selectors = self.convert_selectors(&text);
                let declarations = self.convert_declarations(&style_rule.declarations);
                if selectors.is_empty() || declarations.is_empty() {
                    return None;
                }

                Some(Rule {
                    selectors,
                    declarations,
                })
            }
            // Media queries, keyframes and the like do not apply
            _ => None,
        }
    }

    fn convert_selectors(&self, text: &str) -> Vec<SimpleSelector> {
        text.split(',')
            .filter_map(|raw| {
                let selector = SimpleSelector::parse(raw);
                if selector.is_none() {
                    tracing::debug!("Skipping unsupported selector {:?}", raw.trim());
                }
                selector
            })
            .collect()
    }

    fn convert_declarations(&self, declarations: &DeclarationBlock) -> Vec<Declaration> {
        let mut result = Vec::new();

        for decl in declarations.declarations.iter() {
            if let Some(converted) = self.convert_declaration(decl, false) {
                result.push(converted);
            }
        }

        for decl in declarations.important_declarations.iter() {
            if let Some(converted) = self.convert_declaration(decl, true) {
                result.push(converted);
            }
        }

        result
    }

    fn convert_declaration(&self, decl: &Property<'_>, important: bool) -> Option<Declaration> {
        let property = decl.property_id().name().to_string();
        match decl.value_to_css_string(PrinterOptions::default()) {
            Ok(value) => Some(Declaration {
                property,
                value: value.trim().to_string(),
                important,
            }),
            Err(e) => {
                tracing::debug!("Skipping declaration {}: {:?}", property, e);
                None
            }
        }
    }
}
