//! Document - arena, id registry, clock and base URL
//!
//! The document is the explicit handle every node operation goes through.
//! Attribute mutation lives here because changing `id` must retarget the
//! registry in the same step.

use std::collections::HashMap;
use std::fmt;

use url::Url;

use crate::attribute::{AttributeTier, StyleAttribute};
use crate::cascade::StyleSheet;
use crate::config::DocumentConfig;
use crate::error::{DomError, DomResult};
use crate::node::{ElementKind, Node};
use crate::NodeId;

/// SVG document
pub struct Document {
    pub(crate) nodes: Vec<Node>,
    /// id -> element
    pub(crate) registry: HashMap<String, NodeId>,
    pub(crate) root_element: Option<NodeId>,
    pub(crate) current_time: f64,
    pub(crate) stylesheet: Option<Box<dyn StyleSheet>>,
    pub(crate) config: DocumentConfig,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            nodes: Vec::new(),
            registry: HashMap::new(),
            root_element: None,
            current_time: config.start_time,
            stylesheet: None,
            config,
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Allocate a detached, attribute-less element
    pub fn create_element(&mut self, kind: Box<dyn ElementKind>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind));
        id
    }

    pub fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes.get(id.index()).ok_or(DomError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(DomError::UnknownNode(id))
    }

    /// Number of allocated nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_element(&self) -> Option<NodeId> {
        self.root_element
    }

    /// Make `node` the document root and bring its subtree into the document
    pub fn set_root_element(&mut self, node: NodeId) -> DomResult<()> {
        self.node(node)?;
        self.root_element = Some(node);
        self.adopt_subtree(node);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Map `id` to `node`
    pub fn set_element(&mut self, id: &str, node: NodeId) {
        self.registry.insert(id.to_string(), node);
    }

    /// Forget `id`
    pub fn remove_element(&mut self, id: &str) -> Option<NodeId> {
        self.registry.remove(id)
    }

    /// Get element by id
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.registry.get(id).copied()
    }

    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    /// Change the identity of `node`, keeping the registry consistent.
    ///
    /// An empty id clears the identity.
    pub(crate) fn retarget_id(&mut self, node: NodeId, new_id: &str) -> DomResult<()> {
        let element = self.node_mut(node)?;
        let old = element.id.take();
        element.id = (!new_id.is_empty()).then(|| new_id.to_string());
        if !element.in_document {
            return Ok(());
        }

        if let Some(old) = old {
            if self.registry.get(&old) == Some(&node) {
                self.registry.remove(&old);
            }
        }
        if !new_id.is_empty() {
            self.registry.insert(new_id.to_string(), node);
        }
        tracing::debug!("Registry: {:?} now identified as {:?}", node, new_id);
        Ok(())
    }

    /// Mark the subtree at `node` as part of the document and register
    /// every id found in it
    pub(crate) fn adopt_subtree(&mut self, node: NodeId) {
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            let Some(element) = self.nodes.get_mut(current.index()) else {
                continue;
            };
            element.in_document = true;
            if let Some(id) = element.id.clone() {
                self.registry.insert(id, current);
            }
            pending.extend(element.children.iter().copied());
        }
    }

    // ------------------------------------------------------------------
    // Clock, base URL, stylesheet
    // ------------------------------------------------------------------

    /// Animation clock (seconds)
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Move the clock without rebuilding; see [`Document::update_time`]
    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = time;
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.config.base_url.as_ref()
    }

    pub fn set_base_url(&mut self, url: Option<Url>) {
        self.config.base_url = url;
    }

    pub fn stylesheet(&self) -> Option<&dyn StyleSheet> {
        self.stylesheet.as_deref()
    }

    pub fn set_stylesheet(&mut self, stylesheet: Option<Box<dyn StyleSheet>>) {
        self.stylesheet = stylesheet;
    }

    /// Effective base URI of `node`: its own `xml:base` (resolved against
    /// what it inherits), else the parent's, else the document's.
    pub fn base_uri(&self, node: NodeId) -> DomResult<Option<Url>> {
        let element = self.node(node)?;
        let inherited = match element.parent {
            Some(parent) => self.base_uri(parent)?,
            None => self.base_url().cloned(),
        };
        Ok(match &element.xml_base {
            Some(base) => base.resolve(inherited.as_ref()),
            None => inherited,
        })
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Declare a new attribute on `node`.
    ///
    /// Fails with `AttributeExists` if the tier already holds `name`;
    /// `Auto` is rejected. Adding `id` retargets the registry.
    pub fn add_attribute(
        &mut self,
        node: NodeId,
        tier: AttributeTier,
        name: &str,
        value: &str,
    ) -> DomResult<()> {
        let element = self.node(node)?;
        if tier == AttributeTier::Auto {
            return Err(DomError::InvalidAttributeTier(tier));
        }
        if element.attributes.contains(tier, name) {
            return Err(DomError::AttributeExists {
                name: name.to_string(),
                tier,
            });
        }

        if name == "id" {
            self.retarget_id(node, value)?;
        }
        self.node_mut(node)?.attributes.insert(tier, name, value)
    }

    /// Change an attribute previously declared with
    /// [`add_attribute`](Self::add_attribute).
    ///
    /// `Auto` targets the style tier when it holds `name`, else the markup
    /// tier. Setting `id` retargets the registry.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        tier: AttributeTier,
        name: &str,
        value: &str,
    ) -> DomResult<()> {
        if self.node(node)?.attributes.locate(tier, name).is_none() {
            return Err(DomError::AttributeMissing {
                name: name.to_string(),
                tier,
            });
        }

        if name == "id" {
            self.retarget_id(node, value)?;
        }
        self.node_mut(node)?.attributes.update(tier, name, value)
    }

    pub fn has_attribute(&self, node: NodeId, tier: AttributeTier, name: &str) -> DomResult<bool> {
        Ok(self.node(node)?.attributes.contains(tier, name))
    }

    /// Remove an attribute; no-op if absent. `Auto` is rejected.
    ///
    /// Removing `id` falls back to the `id` left in the other tier, or
    /// clears the identity.
    pub fn remove_attribute(&mut self, node: NodeId, tier: AttributeTier, name: &str) -> DomResult<()> {
        let removed = self.node_mut(node)?.attributes.remove(tier, name)?;
        if name == "id" && removed.is_some() {
            let remaining = self
                .node(node)?
                .attributes
                .get(AttributeTier::Auto, "id")
                .map(|attr| attr.as_str().trim().to_string())
                .unwrap_or_default();
            self.retarget_id(node, &remaining)?;
        }
        Ok(())
    }

    /// Style-tier value bypassing cascade and animation
    pub fn raw_style(&self, node: NodeId, name: &str) -> DomResult<Option<&StyleAttribute>> {
        Ok(self.node(node)?.attributes.style(name))
    }

    /// Markup-tier value bypassing cascade and animation
    pub fn raw_markup(&self, node: NodeId, name: &str) -> DomResult<Option<&StyleAttribute>> {
        Ok(self.node(node)?.attributes.markup(name))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("root_element", &self.root_element)
            .field("registry", &self.registry)
            .field("current_time", &self.current_time)
            .field("has_stylesheet", &self.stylesheet.is_some())
            .finish()
    }
}
