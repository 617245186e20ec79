//! Element Attributes
//!
//! Two independent tiers per element: the style tier (declarations from the
//! `style` attribute) and the markup tier (every attribute as written).

use std::collections::HashMap;
use std::fmt;

use tiny_skia::Transform;
use url::Url;

use crate::error::{DomError, DomResult};
use crate::transform::parse_transform;

/// Attribute tier selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeTier {
    /// Inline `style` declarations
    Style,
    /// Plain markup attributes
    Markup,
    /// Style tier first, then markup tier
    Auto,
}

impl fmt::Display for AttributeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Style => write!(f, "style"),
            Self::Markup => write!(f, "markup"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Named attribute value, parsed into typed forms on demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleAttribute {
    name: String,
    value: String,
}

impl StyleAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw text
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Leading number of the value; a unit suffix such as `px` is ignored.
    pub fn number(&self) -> DomResult<f64> {
        leading_number(&self.value).ok_or_else(|| DomError::InvalidNumber(self.value.clone()))
    }

    /// Comma and/or whitespace separated list of numbers
    pub fn numbers(&self) -> DomResult<Vec<f64>> {
        self.value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>().map_err(|_| DomError::InvalidNumber(s.to_string())))
            .collect()
    }

    /// Resolve the value as a URL reference.
    ///
    /// Without a base only absolute URLs resolve.
    pub fn url(&self, base: Option<&Url>) -> DomResult<Url> {
        let text = self.value.trim();
        let parsed = match base {
            Some(base) => base.join(text),
            None => Url::parse(text),
        };
        parsed.map_err(|source| DomError::InvalidBase {
            value: text.to_string(),
            source,
        })
    }

    /// Parse the value as a transform list
    pub fn transform(&self) -> DomResult<Transform> {
        Ok(parse_transform(&self.value)?)
    }
}

/// Numeric prefix of `text`, e.g. `12.5` for `"12.5px"`
fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let mut end = 0;
    for (idx, ch) in trimmed.char_indices() {
        let accept = match ch {
            '0'..='9' | '.' => true,
            '+' | '-' => idx == 0 || matches!(trimmed[..idx].chars().last(), Some('e' | 'E')),
            'e' | 'E' => idx > 0,
            _ => false,
        };
        if !accept {
            break;
        }
        end = idx + ch.len_utf8();
    }

    // Back off a dangling exponent marker ("2em" -> "2")
    let mut candidate = &trimmed[..end];
    while !candidate.is_empty() {
        if let Ok(v) = candidate.parse::<f64>() {
            return v.is_finite().then_some(v);
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    None
}

/// Split a `style` attribute into `(name, value)` declarations.
///
/// Empty declarations and declarations without a name are skipped.
pub fn parse_style_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Per-element dual-tier attribute map
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    style: HashMap<String, StyleAttribute>,
    markup: HashMap<String, StyleAttribute>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tier(&self, tier: AttributeTier) -> DomResult<&HashMap<String, StyleAttribute>> {
        match tier {
            AttributeTier::Style => Ok(&self.style),
            AttributeTier::Markup => Ok(&self.markup),
            AttributeTier::Auto => Err(DomError::InvalidAttributeTier(tier)),
        }
    }

    fn tier_mut(&mut self, tier: AttributeTier) -> DomResult<&mut HashMap<String, StyleAttribute>> {
        match tier {
            AttributeTier::Style => Ok(&mut self.style),
            AttributeTier::Markup => Ok(&mut self.markup),
            AttributeTier::Auto => Err(DomError::InvalidAttributeTier(tier)),
        }
    }

    /// Membership test; `Auto` checks both tiers
    pub fn contains(&self, tier: AttributeTier, name: &str) -> bool {
        match tier {
            AttributeTier::Style => self.style.contains_key(name),
            AttributeTier::Markup => self.markup.contains_key(name),
            AttributeTier::Auto => self.style.contains_key(name) || self.markup.contains_key(name),
        }
    }

    /// Tier an existing attribute lives in; `Auto` prefers the style tier
    pub fn locate(&self, tier: AttributeTier, name: &str) -> Option<AttributeTier> {
        match tier {
            AttributeTier::Auto if self.style.contains_key(name) => Some(AttributeTier::Style),
            AttributeTier::Auto if self.markup.contains_key(name) => Some(AttributeTier::Markup),
            AttributeTier::Auto => None,
            concrete => self.contains(concrete, name).then_some(concrete),
        }
    }

    /// Declare a new attribute. Fails if the name is already present.
    pub fn insert(&mut self, tier: AttributeTier, name: &str, value: &str) -> DomResult<()> {
        let map = self.tier_mut(tier)?;
        if map.contains_key(name) {
            return Err(DomError::AttributeExists {
                name: name.to_string(),
                tier,
            });
        }
        map.insert(name.to_string(), StyleAttribute::new(name, value));
        Ok(())
    }

    /// Change an existing attribute. Fails if the name was never declared.
    pub fn update(&mut self, tier: AttributeTier, name: &str, value: &str) -> DomResult<()> {
        let target = self.locate(tier, name).ok_or_else(|| DomError::AttributeMissing {
            name: name.to_string(),
            tier,
        })?;
        if let Some(attr) = self.tier_mut(target)?.get_mut(name) {
            attr.set_value(value);
        }
        Ok(())
    }

    /// Remove an attribute; absent names are a no-op.
    pub fn remove(&mut self, tier: AttributeTier, name: &str) -> DomResult<Option<StyleAttribute>> {
        Ok(self.tier_mut(tier)?.remove(name))
    }

    /// Insert or overwrite, used while loading
    pub(crate) fn put(&mut self, tier: AttributeTier, name: &str, value: &str) -> DomResult<()> {
        self.tier_mut(tier)?
            .insert(name.to_string(), StyleAttribute::new(name, value));
        Ok(())
    }

    pub fn get(&self, tier: AttributeTier, name: &str) -> Option<&StyleAttribute> {
        match tier {
            AttributeTier::Auto => self.style.get(name).or_else(|| self.markup.get(name)),
            concrete => self.tier(concrete).ok()?.get(name),
        }
    }

    /// Style-tier value, ignoring cascade and animation
    pub fn style(&self, name: &str) -> Option<&StyleAttribute> {
        self.style.get(name)
    }

    /// Markup-tier value, ignoring cascade and animation
    pub fn markup(&self, name: &str) -> Option<&StyleAttribute> {
        self.markup.get(name)
    }

    pub fn style_names(&self) -> impl Iterator<Item = &str> {
        self.style.keys().map(String::as_str)
    }

    pub fn markup_names(&self) -> impl Iterator<Item = &str> {
        self.markup.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.style.len() + self.markup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.style.is_empty() && self.markup.is_empty()
    }
}
