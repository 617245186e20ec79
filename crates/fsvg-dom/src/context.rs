//! Parent context overrides
//!
//! Lets a node be resolved as if it were parented elsewhere (template
//! instances referencing shared subtrees) without touching the tree. The
//! stack is owned by the caller and only read during resolution.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::NodeId;
use crate::error::{DomError, DomResult};

/// Per-node stacks of override parents
#[derive(Debug, Default, Clone)]
pub struct ContextStack {
    frames: HashMap<NodeId, Vec<NodeId>>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `node` as if `context` were its parent until popped
    pub fn push_context(&mut self, node: NodeId, context: NodeId) {
        self.frames.entry(node).or_default().push(context);
    }

    /// Remove the most recent override of `node`
    pub fn pop_context(&mut self, node: NodeId) -> DomResult<NodeId> {
        let frames = self
            .frames
            .get_mut(&node)
            .ok_or(DomError::ContextUnderflow(node))?;
        let context = frames.pop().ok_or(DomError::ContextUnderflow(node))?;
        if frames.is_empty() {
            self.frames.remove(&node);
        }
        Ok(context)
    }

    /// Active override of `node`, if any
    pub fn current_context(&self, node: NodeId) -> Option<NodeId> {
        self.frames.get(&node).and_then(|frames| frames.last().copied())
    }

    /// Push an override that is popped when the guard drops
    pub fn scoped(&mut self, node: NodeId, context: NodeId) -> ContextGuard<'_> {
        self.push_context(node, context);
        ContextGuard { stack: self, node }
    }

    pub fn depth(&self, node: NodeId) -> usize {
        self.frames.get(&node).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Scoped override; pops its frame on drop
#[derive(Debug)]
pub struct ContextGuard<'a> {
    stack: &'a mut ContextStack,
    node: NodeId,
}

impl ContextGuard<'_> {
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Deref for ContextGuard<'_> {
    type Target = ContextStack;

    fn deref(&self) -> &ContextStack {
        self.stack
    }
}

impl DerefMut for ContextGuard<'_> {
    fn deref_mut(&mut self) -> &mut ContextStack {
        self.stack
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        if self.stack.pop_context(self.node).is_err() {
            tracing::warn!("Context guard for {:?} dropped after its frame was popped", self.node);
        }
    }
}
