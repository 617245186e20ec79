//! Tree manager
//!
//! Structural operations on the arena: child lists, ancestry, append,
//! remove and swap.

use crate::attribute::AttributeTier;
use crate::document::Document;
use crate::error::{DomError, DomResult};
use crate::NodeId;

impl Document {
    /// Ordered immediate children
    pub fn children(&self, node: NodeId) -> DomResult<&[NodeId]> {
        Ok(&self.node(node)?.children)
    }

    /// Append the immediate children of `node` to `out`
    pub fn collect_children(&self, node: NodeId, out: &mut Vec<NodeId>) -> DomResult<()> {
        out.extend_from_slice(&self.node(node)?.children);
        Ok(())
    }

    pub fn child_count(&self, node: NodeId) -> DomResult<usize> {
        Ok(self.node(node)?.children.len())
    }

    pub fn child_at(&self, node: NodeId, index: usize) -> DomResult<Option<NodeId>> {
        Ok(self.node(node)?.children.get(index).copied())
    }

    /// `node` and every node below it, in document order
    pub fn descendants(&self, node: NodeId) -> DomResult<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            out.push(current);
            pending.extend(self.node(current)?.children.iter().rev().copied());
        }
        Ok(out)
    }

    /// Nodes from the root down to `node`, inclusive
    pub fn path_to_root(&self, node: NodeId) -> DomResult<Vec<NodeId>> {
        let mut path = vec![node];
        let mut current = self.node(node)?.parent;
        while let Some(parent) = current {
            path.push(parent);
            current = self.node(parent)?.parent;
        }
        path.reverse();
        Ok(path)
    }

    /// Topmost structural ancestor (or `node` itself)
    pub fn root_of(&self, node: NodeId) -> DomResult<NodeId> {
        let mut current = node;
        while let Some(parent) = self.node(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// Immediate child whose id is `id`
    pub fn child_by_id(&self, node: NodeId, id: &str) -> DomResult<Option<NodeId>> {
        let element = self.node(node)?;
        for &child in &element.children {
            if self.node(child)?.id() == Some(id) {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    pub fn index_of(&self, parent: NodeId, child: NodeId) -> DomResult<Option<usize>> {
        Ok(self.node(parent)?.children.iter().position(|&c| c == child))
    }

    /// Whether `ancestor` is `node` or one of its structural ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> DomResult<bool> {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.node(id)?.parent;
        }
        Ok(false)
    }

    /// Exchange two children and rebuild `parent`.
    ///
    /// Out-of-range indices leave the tree untouched.
    pub fn swap_children(&mut self, parent: NodeId, i: usize, j: usize) -> DomResult<()> {
        let element = self.node_mut(parent)?;
        let len = element.children.len();
        if i >= len || j >= len {
            return Ok(());
        }
        element.children.swap(i, j);
        self.rebuild(parent)
    }

    /// Append `child` to `parent`.
    ///
    /// A child that already has a parent is moved. The subtree joins the
    /// document if `parent` is in it, and an animation-bearing child
    /// registers its track on `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(child)?;
        if self.is_ancestor_or_self(child, parent)? {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        let element = self.node(child)?;
        let binding = element.kind().track_binding(&element.attributes)?;
        let old_parent = element.parent;

        if let Some(old_parent) = old_parent {
            let old = self.node_mut(old_parent)?;
            old.children.retain(|&c| c != child);
            old.tracks.remove_source(child);
        }
        self.node_mut(child)?.parent = Some(parent);

        let target = self.node_mut(parent)?;
        target.children.push(child);
        if let Some(mut binding) = binding {
            if binding.tier == AttributeTier::Auto {
                binding.tier = if target.attributes.contains(AttributeTier::Style, &binding.attribute) {
                    AttributeTier::Style
                } else {
                    AttributeTier::Markup
                };
            }
            tracing::debug!(
                "Track: {:?} animates {} ({}) on {:?}",
                child,
                binding.attribute,
                binding.tier,
                parent
            );
            target.tracks.add(child, binding);
        }

        if target.in_document {
            self.adopt_subtree(child);
        }
        tracing::debug!("Appended {:?} to {:?}", child, parent);
        Ok(())
    }

    /// Detach `child` from `parent`.
    ///
    /// Ids in the detached subtree stay registered.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let index = self
            .index_of(parent, child)?
            .ok_or(DomError::NotAChild { parent, child })?;

        let element = self.node_mut(parent)?;
        element.children.remove(index);
        element.tracks.remove_source(child);
        self.node_mut(child)?.parent = None;
        tracing::debug!("Removed {:?} from {:?}", child, parent);
        Ok(())
    }
}
