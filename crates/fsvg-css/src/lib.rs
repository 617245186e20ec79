//! fSVG CSS - selector stylesheets
//!
//! Parses `<style>` content with lightningcss into rules keyed by simple
//! `tag`/`.class` selectors and answers the document cascade's stylesheet
//! lookups.

mod parser;
mod sheet;

pub use parser::CssParser;
pub use sheet::{Declaration, Rule, SelectorStyleSheet, SimpleSelector, Specificity};

/// Parse a CSS stylesheet
pub fn parse_stylesheet(css: &str) -> Result<SelectorStyleSheet, CssError> {
    CssParser::new().parse(css)
}

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },
}
