//! Rebuild and clock updates

use std::collections::HashSet;

use crate::document::Document;
use crate::error::DomResult;
use crate::node::XmlBase;
use crate::NodeId;

impl Document {
    /// Re-derive identity of `node` from its presentation attributes, then
    /// run the element's own `build`. Children are not visited.
    ///
    /// Identity fields absent from the markup tier are left as they are.
    pub fn build_node(&mut self, node: NodeId) -> DomResult<()> {
        if let Some(id) = self.resolve_presentation(node, "id")? {
            let id = id.as_str().trim();
            if self.node(node)?.id().unwrap_or("") != id {
                self.retarget_id(node, id)?;
            }
        }
        if let Some(class) = self.resolve_presentation(node, "class")? {
            let class = (!class.is_empty()).then(|| class.as_str().trim().to_string());
            self.node_mut(node)?.class = class;
        }
        if let Some(base) = self.resolve_presentation(node, "xml:base")? {
            let xml_base = match base.is_empty() {
                true => None,
                false => Some(XmlBase::parse(base.as_str().trim())?),
            };
            self.node_mut(node)?.xml_base = xml_base;
        }

        let element = self.node(node)?;
        let mut kind = element.kind_mut();
        kind.build(self, node)
    }

    /// Rebuild `node` and its whole subtree
    pub fn rebuild(&mut self, node: NodeId) -> DomResult<()> {
        self.build_node(node)?;
        let children = self.node(node)?.children.clone();
        for child in children {
            self.rebuild(child)?;
        }
        Ok(())
    }

    /// Advance the clock to `time` and rebuild every element whose
    /// appearance may have changed. Returns whether any did.
    ///
    /// An element is rebuilt when it carries tracks, when its kind asks
    /// for it, or when its parent was rebuilt. Cascaded values flow down
    /// from animated ancestors.
    pub fn update_time(&mut self, time: f64) -> DomResult<bool> {
        self.current_time = time;
        let Some(root) = self.root_element else {
            return Ok(false);
        };

        let mut rebuilt = HashSet::new();
        for node in self.descendants(root)? {
            let element = self.node(node)?;
            let kind_changed = element.kind_mut().update_time(self, node, time)?;
            let parent_rebuilt = element.parent.is_some_and(|parent| rebuilt.contains(&parent));
            if kind_changed || parent_rebuilt || !element.tracks.is_empty() {
                self.build_node(node)?;
                rebuilt.insert(node);
            }
        }

        tracing::debug!("Clock at {}s: {} element(s) rebuilt", time, rebuilt.len());
        Ok(!rebuilt.is_empty())
    }
}
