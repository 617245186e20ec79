//! Loader hooks
//!
//! A streaming reader drives element construction through four hooks on
//! [`Document`]: start, text, end, child complete. [`TreeBuilder`] keeps the
//! open-element stack and calls them in that order.

use crate::attribute::{AttributeTier, parse_style_declarations};
use crate::document::Document;
use crate::elements::{ForeignElement, create_kind};
use crate::error::{DomError, DomResult};
use crate::node::{ElementKind, XmlBase};
use crate::NodeId;

/// Attribute as read from markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    pub name: String,
    pub value: String,
}

impl RawAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Document {
    /// Populate a freshly created element from its start tag.
    ///
    /// Every raw attribute lands in the markup tier; `style` declarations
    /// additionally fill the style tier. A malformed `xml:base` fails the
    /// element before anything is stored.
    pub fn on_element_start(
        &mut self,
        node: NodeId,
        attributes: &[RawAttribute],
        parent: Option<NodeId>,
    ) -> DomResult<()> {
        self.node(node)?;
        if let Some(parent) = parent {
            self.node(parent)?;
        }

        let mut xml_base = None;
        let mut declarations = Vec::new();
        for attr in attributes {
            match attr.name.as_str() {
                "xml:base" => xml_base = Some(XmlBase::parse(attr.value.trim())?),
                "style" => declarations.extend(parse_style_declarations(&attr.value)),
                _ => {}
            }
        }

        let element = self.node_mut(node)?;
        element.parent = parent;
        element.in_document = true;
        element.xml_base = xml_base;
        for (name, value) in &declarations {
            element.attributes.put(AttributeTier::Style, name, value)?;
        }
        for attr in attributes {
            element.attributes.put(AttributeTier::Markup, &attr.name, &attr.value)?;
            if attr.name == "class" && !attr.value.trim().is_empty() {
                element.class = Some(attr.value.trim().to_string());
            }
        }

        if let Some(id) = attributes.iter().find(|attr| attr.name == "id") {
            let id = id.value.trim();
            if !id.is_empty() {
                self.retarget_id(node, id)?;
            }
        }
        if parent.is_none() && self.root_element.is_none() {
            self.root_element = Some(node);
        }
        Ok(())
    }

    /// Character content inside `node`
    pub fn on_text(&mut self, node: NodeId, text: &str) -> DomResult<()> {
        self.node(node)?.kind_mut().on_text(text);
        Ok(())
    }

    /// End tag of `node`; rebuilds when the kind or the config asks for it
    pub fn on_element_end(&mut self, node: NodeId) -> DomResult<()> {
        let forced = self.node(node)?.kind_mut().on_element_end();
        if forced || self.config.rebuild_on_element_end {
            self.rebuild(node)?;
        }
        Ok(())
    }

    /// `child` is complete; append it to `parent`
    pub fn on_child_complete(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.add_child(parent, child)
    }

    /// Namespace URI in scope for `qualified_name`: the matching `xmlns` or
    /// `xmlns:prefix` declaration on the element itself, else on the
    /// nearest ancestor declaring it
    pub fn namespace_for(
        &self,
        parent: Option<NodeId>,
        attributes: &[RawAttribute],
        qualified_name: &str,
    ) -> DomResult<Option<String>> {
        let declaration = match qualified_name.split_once(':') {
            Some((prefix, _)) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        if let Some(attr) = attributes.iter().find(|attr| attr.name == declaration) {
            return Ok(Some(attr.value.trim().to_string()));
        }

        let mut current = parent;
        while let Some(node) = current {
            let element = self.node(node)?;
            if let Some(attr) = element.attributes.markup(&declaration) {
                return Ok(Some(attr.as_str().trim().to_string()));
            }
            current = element.parent;
        }
        Ok(None)
    }
}

/// Drives the loader hooks from start/text/end events
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    document: &'a mut Document,
    open: Vec<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(document: &'a mut Document) -> Self {
        Self {
            document,
            open: Vec::new(),
        }
    }

    /// Open an element of the given kind below the current one
    pub fn start(&mut self, kind: Box<dyn ElementKind>, attributes: &[RawAttribute]) -> DomResult<NodeId> {
        let node = self.document.create_element(kind);
        let parent = self.open.last().copied();
        self.document.on_element_start(node, attributes, parent)?;
        self.open.push(node);
        Ok(node)
    }

    /// Open an element, picking its kind from the tag name. Foreign
    /// elements record the namespace in scope.
    pub fn start_tag(&mut self, tag_name: &str, attributes: &[RawAttribute]) -> DomResult<NodeId> {
        let kind = create_kind(tag_name);
        let kind: Box<dyn ElementKind> = if kind.as_any().is::<ForeignElement>() {
            let parent = self.open.last().copied();
            let namespace = self.document.namespace_for(parent, attributes, tag_name)?;
            Box::new(ForeignElement::new(tag_name).with_namespace(namespace))
        } else {
            kind
        };
        self.start(kind, attributes)
    }

    /// Text of the innermost open element; ignored outside any element
    pub fn text(&mut self, text: &str) -> DomResult<()> {
        if let Some(&node) = self.open.last() {
            self.document.on_text(node, text)?;
        }
        Ok(())
    }

    /// Close the innermost open element
    pub fn end(&mut self) -> DomResult<NodeId> {
        let node = self.open.pop().ok_or(DomError::UnbalancedEnd)?;
        self.document.on_element_end(node)?;
        if let Some(&parent) = self.open.last() {
            self.document.on_child_complete(parent, node)?;
        }
        Ok(node)
    }

    /// Number of open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn document(&self) -> &Document {
        self.document
    }
}
