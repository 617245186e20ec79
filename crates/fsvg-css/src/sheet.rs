//! Simple-selector stylesheet
//!
//! Matching is limited to the `(tag, class)` key the document cascade
//! provides: `*`, `tag`, `.class` and `tag.class`.

use fsvg_dom::StyleSheet;

/// Selector specificity (a, b, c)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(pub u32, pub u32, pub u32);

/// `*`, `tag`, `.class` or `tag.class`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSelector {
    pub tag: Option<String>,
    pub class: Option<String>,
}

fn is_ident(text: &str) -> bool {
    !text.is_empty()
        && !text.starts_with(|c: char| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

impl SimpleSelector {
    pub fn universal() -> Self {
        Self {
            tag: None,
            class: None,
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            class: None,
        }
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self {
            tag: None,
            class: Some(class.into()),
        }
    }

    /// Parse one selector of a list; `None` if it needs more than a tag
    /// and a single class
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (tag, class) = match text.split_once('.') {
            Some((tag, class)) => (tag, Some(class)),
            None => (text, None),
        };

        let tag = match tag {
            "*" => None,
            "" if class.is_some() => None,
            tag if is_ident(tag) => Some(tag.to_string()),
            _ => return None,
        };
        let class = match class {
            Some(class) if is_ident(class) => Some(class.to_string()),
            Some(_) => return None,
            None => None,
        };
        Some(Self { tag, class })
    }

    pub fn specificity(&self) -> Specificity {
        Specificity(0, self.class.is_some() as u32, self.tag.is_some() as u32)
    }

    /// `class` is the element's class attribute, possibly several names
    pub fn matches(&self, tag_name: &str, class: Option<&str>) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(tag_name) {
                return false;
            }
        }
        match &self.class {
            Some(wanted) => class.is_some_and(|names| names.split_whitespace().any(|n| n == wanted)),
            None => true,
        }
    }
}

/// CSS declaration (property: value)
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// CSS rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub selectors: Vec<SimpleSelector>,
    pub declarations: Vec<Declaration>,
}

impl Rule {
    /// Highest specificity among the selectors matching the element
    fn match_specificity(&self, tag_name: &str, class: Option<&str>) -> Option<Specificity> {
        self.selectors
            .iter()
            .filter(|s| s.matches(tag_name, class))
            .map(SimpleSelector::specificity)
            .max()
    }
}

/// Parsed stylesheet
#[derive(Debug, Clone, Default)]
pub struct SelectorStyleSheet {
    rules: Vec<Rule>,
}

impl SelectorStyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Winning declaration: `!important` first, then specificity, then
    /// source order
    pub fn winning_declaration(
        &self,
        tag_name: &str,
        class: Option<&str>,
        property: &str,
    ) -> Option<&Declaration> {
        let mut best: Option<(bool, Specificity, usize, &Declaration)> = None;
        let mut order = 0usize;

        for rule in &self.rules {
            let specificity = rule.match_specificity(tag_name, class);
            for decl in &rule.declarations {
                order += 1;
                let Some(specificity) = specificity else {
                    continue;
                };
                if !decl.property.eq_ignore_ascii_case(property) {
                    continue;
                }
                let candidate = (decl.important, specificity, order, decl);
                let wins = best
                    .as_ref()
                    .is_none_or(|b| (candidate.0, candidate.1, candidate.2) > (b.0, b.1, b.2));
                if wins {
                    best = Some(candidate);
                }
            }
        }

        best.map(|(_, _, _, decl)| decl)
    }
}

impl StyleSheet for SelectorStyleSheet {
    fn lookup(&self, tag_name: &str, class: Option<&str>, property: &str) -> Option<String> {
        self.winning_declaration(tag_name, class, property)
            .map(|decl| decl.value.clone())
    }
}
