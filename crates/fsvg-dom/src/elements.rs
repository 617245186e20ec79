//! Concrete element kinds

use std::any::Any;

use tiny_skia::Transform;

use crate::animation::{
    InterpolatedTrack, SetTrack, TrackBinding, parse_attribute_type, parse_clock_value,
};
use crate::attribute::{AttributeStore, StyleAttribute};
use crate::document::Document;
use crate::error::{DomError, DomResult};
use crate::node::ElementKind;
use crate::NodeId;

/// Behaviour for a tag name; unknown tags become [`ForeignElement`]
pub fn create_kind(tag_name: &str) -> Box<dyn ElementKind> {
    match tag_name {
        "svg" => Box::new(Group::svg()),
        "g" => Box::new(Group::g()),
        "rect" => Box::new(RectElement::default()),
        "set" => Box::new(SetElement),
        "animate" => Box::new(AnimateElement),
        other => Box::new(ForeignElement::new(other)),
    }
}

/// Number with a fallback for absent or empty values. An idle animation
/// track over a missing static value resolves to `""`.
fn number_or(attr: Option<StyleAttribute>, default: f64) -> DomResult<f64> {
    match attr {
        Some(attr) if !attr.is_empty() => attr.number(),
        _ => Ok(default),
    }
}

fn presentation_number(document: &Document, node: NodeId, name: &str, default: f64) -> DomResult<f64> {
    number_or(document.resolve_presentation(node, name)?, default)
}

/// `<svg>` and `<g>`: containers carrying a transform
#[derive(Debug, Clone)]
pub struct Group {
    tag: &'static str,
    transform: Transform,
}

impl Group {
    pub fn svg() -> Self {
        Self {
            tag: "svg",
            transform: Transform::identity(),
        }
    }

    pub fn g() -> Self {
        Self {
            tag: "g",
            transform: Transform::identity(),
        }
    }

    /// Transform from the last build
    pub fn transform(&self) -> Transform {
        self.transform
    }
}

impl ElementKind for Group {
    fn tag_name(&self) -> &str {
        self.tag
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build(&mut self, document: &Document, node: NodeId) -> DomResult<()> {
        self.transform = match document.resolve_presentation(node, "transform")? {
            Some(attr) => attr.transform()?,
            None => Transform::identity(),
        };
        Ok(())
    }
}

/// `<rect>`
#[derive(Debug, Clone, PartialEq)]
pub struct RectElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Cascaded, so it may come from an ancestor or the stylesheet
    pub stroke_width: f64,
}

impl Default for RectElement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            stroke_width: 1.0,
        }
    }
}

impl ElementKind for RectElement {
    fn tag_name(&self) -> &str {
        "rect"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build(&mut self, document: &Document, node: NodeId) -> DomResult<()> {
        self.x = presentation_number(document, node, "x", 0.0)?;
        self.y = presentation_number(document, node, "y", 0.0)?;
        self.width = presentation_number(document, node, "width", 0.0)?;
        self.height = presentation_number(document, node, "height", 0.0)?;
        self.stroke_width = number_or(document.style(node, "stroke-width")?, 1.0)?;
        Ok(())
    }
}

fn required<'a>(attributes: &'a AttributeStore, tag: &str, name: &str) -> DomResult<&'a str> {
    attributes
        .markup(name)
        .map(|attr| attr.as_str().trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| DomError::Animation(format!("<{}> requires {}", tag, name)))
}

fn begin_time(attributes: &AttributeStore) -> DomResult<f64> {
    attributes
        .markup("begin")
        .map_or(Ok(0.0), |attr| parse_clock_value(attr.as_str()))
}

/// `<set>`: discrete value over an interval
#[derive(Debug, Clone, Copy, Default)]
pub struct SetElement;

impl ElementKind for SetElement {
    fn tag_name(&self) -> &str {
        "set"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn track_binding(&self, attributes: &AttributeStore) -> DomResult<Option<TrackBinding>> {
        let attribute = required(attributes, "set", "attributeName")?;
        let to = required(attributes, "set", "to")?;
        let tier = parse_attribute_type(attributes.markup("attributeType").map(|a| a.as_str()))?;
        let duration = match attributes.markup("dur").map(|a| a.as_str().trim()) {
            None | Some("") | Some("indefinite") => None,
            Some(dur) => Some(parse_clock_value(dur)?),
        };

        Ok(Some(TrackBinding {
            attribute: attribute.to_string(),
            tier,
            track: Box::new(SetTrack {
                to: to.to_string(),
                begin: begin_time(attributes)?,
                duration,
            }),
        }))
    }
}

/// `<animate>`: interpolated value over an interval
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimateElement;

impl ElementKind for AnimateElement {
    fn tag_name(&self) -> &str {
        "animate"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn track_binding(&self, attributes: &AttributeStore) -> DomResult<Option<TrackBinding>> {
        let attribute = required(attributes, "animate", "attributeName")?;
        let to = required(attributes, "animate", "to")?;
        let tier = parse_attribute_type(attributes.markup("attributeType").map(|a| a.as_str()))?;
        let duration = parse_clock_value(required(attributes, "animate", "dur")?)?;
        if duration <= 0.0 {
            return Err(DomError::Animation(format!("<animate> dur must be positive, got {}", duration)));
        }
        let freeze = attributes
            .markup("fill")
            .is_some_and(|attr| attr.as_str().trim() == "freeze");

        Ok(Some(TrackBinding {
            attribute: attribute.to_string(),
            tier,
            track: Box::new(InterpolatedTrack {
                from: attributes.markup("from").map(|attr| attr.as_str().to_string()),
                to: to.to_string(),
                begin: begin_time(attributes)?,
                duration,
                freeze,
            }),
        }))
    }
}

/// Element from another vocabulary; keeps its qualified name, namespace
/// and text
#[derive(Debug, Clone, Default)]
pub struct ForeignElement {
    tag: String,
    namespace: Option<String>,
    text: String,
}

impl ForeignElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            namespace: None,
            text: String::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Namespace URI the element was declared in, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Tag name without its prefix
    pub fn local_name(&self) -> &str {
        self.tag.split_once(':').map_or(self.tag.as_str(), |(_, local)| local)
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl ElementKind for ForeignElement {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn on_text(&mut self, text: &str) {
        self.text.push_str(text);
    }
}
