//! DOM Node
//!
//! A node owns its attribute tiers, its ordered child list and the tracks
//! its animation children registered. Parent and child links are
//! [`NodeId`]s into the owning [`Document`](crate::Document) arena.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;

use url::Url;

use crate::animation::{TrackBinding, TrackManager};
use crate::attribute::AttributeStore;
use crate::error::{DomError, DomResult};
use crate::{Document, NodeId};

/// Behaviour of a concrete element type.
///
/// The shared cascade, tree and identity logic lives on [`Document`];
/// implementors only add what is specific to their tag.
pub trait ElementKind: fmt::Debug {
    fn tag_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    /// Recompute derived state from current attribute values.
    ///
    /// Runs during rebuild, after `id`/`class`/`xml:base` were re-derived.
    fn build(&mut self, _document: &Document, _node: NodeId) -> DomResult<()> {
        Ok(())
    }

    /// Clock moved to `time`; return `true` if the element needs a rebuild
    fn update_time(&mut self, _document: &Document, _node: NodeId, _time: f64) -> DomResult<bool> {
        Ok(false)
    }

    /// Animation-bearing kinds describe the track they drive
    fn track_binding(&self, _attributes: &AttributeStore) -> DomResult<Option<TrackBinding>> {
        Ok(None)
    }

    /// Character content inside the element
    fn on_text(&mut self, _text: &str) {}

    /// Loader finished the element; return `true` to force a rebuild
    fn on_element_end(&mut self) -> bool {
        false
    }
}

/// `xml:base` override
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlBase {
    Absolute(Url),
    /// Resolved against the parent's base on demand
    Relative(String),
}

const PLACEHOLDER_BASE: &str = "http://fsvg.invalid/";

impl XmlBase {
    pub fn parse(value: &str) -> DomResult<Self> {
        let invalid = |source| DomError::InvalidBase {
            value: value.to_string(),
            source,
        };

        match Url::parse(value) {
            Ok(url) => Ok(Self::Absolute(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                // Validate the reference by resolving it somewhere
                let placeholder = Url::parse(PLACEHOLDER_BASE).map_err(invalid)?;
                placeholder.join(value).map_err(invalid)?;
                Ok(Self::Relative(value.to_string()))
            }
            Err(err) => Err(invalid(err)),
        }
    }

    /// Apply this override on top of the inherited base
    pub fn resolve(&self, inherited: Option<&Url>) -> Option<Url> {
        match self {
            Self::Absolute(url) => Some(url.clone()),
            Self::Relative(reference) => inherited.and_then(|base| base.join(reference).ok()),
        }
    }
}

/// Element node
pub struct Node {
    pub(crate) tag: Box<str>,
    pub(crate) id: Option<String>,
    pub(crate) class: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attributes: AttributeStore,
    pub(crate) xml_base: Option<XmlBase>,
    pub(crate) tracks: TrackManager,
    /// Reachable from the document; only such nodes touch the id registry
    pub(crate) in_document: bool,
    pub(crate) kind: RefCell<Box<dyn ElementKind>>,
}

impl Node {
    pub(crate) fn new(kind: Box<dyn ElementKind>) -> Self {
        Self {
            tag: kind.tag_name().into(),
            id: None,
            class: None,
            parent: None,
            children: Vec::new(),
            attributes: AttributeStore::new(),
            xml_base: None,
            tracks: TrackManager::new(),
            in_document: false,
            kind: RefCell::new(kind),
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn xml_base(&self) -> Option<&XmlBase> {
        self.xml_base.as_ref()
    }

    pub fn tracks(&self) -> &TrackManager {
        &self.tracks
    }

    pub fn in_document(&self) -> bool {
        self.in_document
    }

    /// Borrow the element behaviour.
    ///
    /// Panics if called from inside that same element's `build`.
    pub fn kind(&self) -> Ref<'_, dyn ElementKind> {
        Ref::map(self.kind.borrow(), |kind| &**kind)
    }

    /// Borrow the behaviour as a concrete kind
    pub fn kind_as<T: ElementKind + 'static>(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.kind.borrow(), |kind| kind.as_any().downcast_ref::<T>()).ok()
    }

    pub(crate) fn kind_mut(&self) -> RefMut<'_, Box<dyn ElementKind>> {
        self.kind.borrow_mut()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("tag", &self.tag)
            .field("id", &self.id)
            .field("class", &self.class)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
