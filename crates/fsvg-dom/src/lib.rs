//! fSVG DOM - SVG Document Object Model
//!
//! Mutable SVG element tree with two attribute tiers (inline style and
//! markup), an id registry, a four-step style cascade and the transform
//! list grammar.

mod animation;
mod attribute;
mod build;
mod cascade;
mod config;
mod context;
mod document;
mod elements;
mod error;
mod loader;
mod node;
mod transform;
mod tree;

pub use animation::{
    AnimationTrack, InterpolatedTrack, SetTrack, Track, TrackBinding, TrackManager, lerp,
    parse_attribute_type, parse_clock_value,
};
pub use attribute::{AttributeStore, AttributeTier, StyleAttribute, parse_style_declarations};
pub use cascade::StyleSheet;
pub use config::DocumentConfig;
pub use context::{ContextGuard, ContextStack};
pub use document::Document;
pub use elements::{AnimateElement, ForeignElement, Group, RectElement, SetElement, create_kind};
pub use error::{DomError, DomResult};
pub use loader::{RawAttribute, TreeBuilder};
pub use node::{ElementKind, Node, XmlBase};
pub use transform::{TransformError, parse_single_transform, parse_transform};

pub use tiny_skia::Transform;
pub use url::Url;

/// Node identifier (index into the document arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena slot
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
