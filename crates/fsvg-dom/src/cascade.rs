//! Style cascade
//!
//! Resolution order for one property of one node, first hit wins:
//!
//! 1. style tier (animation track, then static value)
//! 2. markup tier (animation track, then static value)
//! 3. the document stylesheet, if the node hangs below the document root;
//!    its answer is final
//! 4. the context override or structural parent, when recursive
//!
//! "Not found" is `Ok(None)`; the caller supplies the property default.

use std::fmt;

use crate::attribute::{AttributeTier, StyleAttribute};
use crate::context::ContextStack;
use crate::document::Document;
use crate::error::{DomError, DomResult};
use crate::node::Node;
use crate::NodeId;

/// Selector-based rules consulted by cascade step 3
pub trait StyleSheet: fmt::Debug {
    /// Value of `property` for an element with this tag and class
    fn lookup(&self, tag_name: &str, class: Option<&str>, property: &str) -> Option<String>;
}

impl Document {
    /// Full cascade with animation, walking ancestors
    pub fn style(&self, node: NodeId, name: &str) -> DomResult<Option<StyleAttribute>> {
        self.resolve_style(node, name, true, true)
    }

    /// Cascade without context overrides
    pub fn resolve_style(
        &self,
        node: NodeId,
        name: &str,
        recursive: bool,
        evaluate_animation: bool,
    ) -> DomResult<Option<StyleAttribute>> {
        self.resolve_style_in(&ContextStack::new(), node, name, recursive, evaluate_animation)
    }

    /// Cascade honouring the overrides in `contexts`.
    ///
    /// During the ancestor walk an override of the current node takes the
    /// place of its structural parent.
    pub fn resolve_style_in(
        &self,
        contexts: &ContextStack,
        node: NodeId,
        name: &str,
        recursive: bool,
        evaluate_animation: bool,
    ) -> DomResult<Option<StyleAttribute>> {
        let mut current = node;
        let mut hops = 0;

        loop {
            let element = self.node(current)?;

            for tier in [AttributeTier::Style, AttributeTier::Markup] {
                if let Some(found) = self.tier_value(element, tier, name, evaluate_animation)? {
                    tracing::trace!("Cascade: {} on {:?} from {:?} ({})", name, node, current, tier);
                    return Ok(Some(found));
                }
            }

            if let Some(sheet) = self.stylesheet.as_deref() {
                if self.root_element.is_some() && Some(self.root_of(current)?) == self.root_element {
                    let found = sheet
                        .lookup(element.tag_name(), element.class(), name)
                        .map(|value| StyleAttribute::new(name, value));
                    tracing::trace!("Cascade: {} on {:?} from stylesheet: {:?}", name, node, found);
                    return Ok(found);
                }
            }

            if !recursive {
                return Ok(None);
            }
            let Some(next) = contexts.current_context(current).or(element.parent) else {
                tracing::trace!("Cascade: {} on {:?} not found", name, node);
                return Ok(None);
            };

            hops += 1;
            if hops > self.nodes.len() {
                return Err(DomError::ResolutionCycle(current));
            }
            current = next;
        }
    }

    /// Markup tier only: track, then static value. No stylesheet, no
    /// ancestors.
    pub fn resolve_presentation(&self, node: NodeId, name: &str) -> DomResult<Option<StyleAttribute>> {
        self.tier_value(self.node(node)?, AttributeTier::Markup, name, true)
    }

    fn tier_value(
        &self,
        element: &Node,
        tier: AttributeTier,
        name: &str,
        evaluate_animation: bool,
    ) -> DomResult<Option<StyleAttribute>> {
        let stored = element.attributes.get(tier, name);
        if evaluate_animation {
            if let Some(track) = element.tracks.get(name, tier) {
                let base = stored.map_or("", StyleAttribute::as_str);
                let value = track.evaluate(base, self.current_time)?;
                return Ok(Some(StyleAttribute::new(name, value)));
            }
        }
        Ok(stored.cloned())
    }
}
