//! DOM errors
//!
//! Every failure in this crate is synchronous and reported to the immediate
//! caller. "Not found" during style resolution is not an error.

use crate::NodeId;
use crate::attribute::AttributeTier;
use crate::transform::TransformError;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomError {
    /// `add` on a name that is already present in the tier
    #[error("Attribute {name} ({tier}) already exists")]
    AttributeExists { name: String, tier: AttributeTier },

    /// `set` on a name that was never added to the tier
    #[error("Could not find attribute {name} ({tier}). Make sure to create attribute before setting it")]
    AttributeMissing { name: String, tier: AttributeTier },

    /// Tier selector not valid for the requested operation
    #[error("Invalid attribute tier {0} for this operation")]
    InvalidAttributeTier(AttributeTier),

    /// `remove_child` with a node that is not a child
    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Appending would make a node its own ancestor
    #[error("Cannot append {child:?} to {parent:?}: hierarchy request error")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// NodeId not allocated by this document
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),

    /// `pop_context` on an empty stack
    #[error("Context stack of {0:?} is empty")]
    ContextUnderflow(NodeId),

    /// Ancestor resolution came back to a node it already visited
    #[error("Style resolution revisited {0:?}; context overrides form a cycle")]
    ResolutionCycle(NodeId),

    /// Loader closed an element that was never started
    #[error("Element end without a matching start")]
    UnbalancedEnd,

    /// Malformed `xml:base`
    #[error("Malformed base URI {value:?}: {source}")]
    InvalidBase {
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// Malformed numeric attribute value
    #[error("Invalid number {0:?}")]
    InvalidNumber(String),

    /// Animation element with unusable timing or target
    #[error("Animation error: {0}")]
    Animation(String),

    /// Transform list grammar error
    #[error(transparent)]
    Transform(#[from] TransformError),
}
