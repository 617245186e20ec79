//! Comprehensive tests for fsvg-dom
//!
//! Loads small documents through the tree builder and checks tree
//! structure, identity, the cascade and rebuild behaviour.

use fsvg_dom::{
    AttributeTier, ContextStack, Document, DocumentConfig, DomError, Group, NodeId, RawAttribute,
    RectElement, StyleSheet, TreeBuilder, Url,
};

fn attrs(pairs: &[(&str, &str)]) -> Vec<RawAttribute> {
    pairs.iter().map(|(n, v)| RawAttribute::new(*n, *v)).collect()
}

/// `<svg id="root" fill="black"><g id="layer" fill="green"><rect id="box"/></g><g id="palette" fill="purple"/></svg>`
fn sample() -> (Document, NodeId, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let mut builder = TreeBuilder::new(&mut doc);

    let root = builder
        .start_tag("svg", &attrs(&[("id", "root"), ("fill", "black")]))
        .unwrap();
    let layer = builder
        .start_tag("g", &attrs(&[("id", "layer"), ("fill", "green")]))
        .unwrap();
    let rect = builder
        .start_tag("rect", &attrs(&[("id", "box"), ("x", "1"), ("width", "10px")]))
        .unwrap();
    builder.end().unwrap();
    builder.end().unwrap();
    let palette = builder
        .start_tag("g", &attrs(&[("id", "palette"), ("fill", "purple")]))
        .unwrap();
    builder.end().unwrap();
    builder.end().unwrap();

    doc.rebuild(root).unwrap();
    (doc, root, layer, rect, palette)
}

// ============================================================================
// TREE
// ============================================================================

#[test]
fn test_loaded_structure() {
    let (doc, root, layer, rect, palette) = sample();

    assert_eq!(doc.root_element(), Some(root));
    assert_eq!(doc.children(root).unwrap(), &[layer, palette]);
    assert_eq!(doc.children(layer).unwrap(), &[rect]);
    assert_eq!(doc.path_to_root(rect).unwrap(), vec![root, layer, rect]);
    assert_eq!(doc.child_by_id(root, "layer").unwrap(), Some(layer));
    // Immediate children only
    assert_eq!(doc.child_by_id(root, "box").unwrap(), None);
    assert_eq!(doc.index_of(root, palette).unwrap(), Some(1));
    assert_eq!(doc.index_of(layer, palette).unwrap(), None);
}

#[test]
fn test_collect_children_appends() {
    let (doc, root, layer, rect, palette) = sample();
    let mut out = vec![rect];
    doc.collect_children(root, &mut out).unwrap();
    assert_eq!(out, vec![rect, layer, palette]);
}

#[test]
fn test_registry_after_load() {
    let (doc, root, layer, rect, palette) = sample();
    assert_eq!(doc.element_by_id("root"), Some(root));
    assert_eq!(doc.element_by_id("layer"), Some(layer));
    assert_eq!(doc.element_by_id("box"), Some(rect));
    assert_eq!(doc.element_by_id("palette"), Some(palette));
    assert_eq!(doc.registry_len(), 4);
}

#[test]
fn test_swap_twice_restores_order() {
    let (mut doc, root, layer, _, palette) = sample();
    doc.swap_children(root, 0, 1).unwrap();
    assert_eq!(doc.children(root).unwrap(), &[palette, layer]);
    doc.swap_children(root, 0, 1).unwrap();
    assert_eq!(doc.children(root).unwrap(), &[layer, palette]);
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

#[test]
fn test_add_twice_and_set_missing() {
    let (mut doc, _, _, rect, _) = sample();

    doc.add_attribute(rect, AttributeTier::Style, "x", "1").unwrap();
    assert!(matches!(
        doc.add_attribute(rect, AttributeTier::Style, "x", "2"),
        Err(DomError::AttributeExists { .. })
    ));
    assert!(matches!(
        doc.set_attribute(rect, AttributeTier::Style, "y", "2"),
        Err(DomError::AttributeMissing { .. })
    ));
    assert!(doc.has_attribute(rect, AttributeTier::Auto, "x").unwrap());
}

#[test]
fn test_set_auto_prefers_style_tier() {
    let (mut doc, _, _, rect, _) = sample();
    doc.add_attribute(rect, AttributeTier::Style, "opacity", "1").unwrap();
    doc.add_attribute(rect, AttributeTier::Markup, "opacity", "1").unwrap();

    doc.set_attribute(rect, AttributeTier::Auto, "opacity", "0.25").unwrap();

    assert_eq!(doc.raw_style(rect, "opacity").unwrap().unwrap().as_str(), "0.25");
    assert_eq!(doc.raw_markup(rect, "opacity").unwrap().unwrap().as_str(), "1");
}

#[test]
fn test_set_id_retargets_registry() {
    let (mut doc, _, _, rect, _) = sample();

    doc.set_attribute(rect, AttributeTier::Markup, "id", "panel").unwrap();

    assert_eq!(doc.element_by_id("panel"), Some(rect));
    assert_eq!(doc.element_by_id("box"), None);
    assert_eq!(doc.node(rect).unwrap().id(), Some("panel"));
    assert_eq!(doc.registry_len(), 4);
}

#[test]
fn test_remove_attribute() {
    let (mut doc, _, layer, _, _) = sample();
    doc.remove_attribute(layer, AttributeTier::Markup, "fill").unwrap();
    doc.remove_attribute(layer, AttributeTier::Markup, "fill").unwrap();
    assert!(!doc.has_attribute(layer, AttributeTier::Markup, "fill").unwrap());
    assert!(matches!(
        doc.remove_attribute(layer, AttributeTier::Auto, "fill"),
        Err(DomError::InvalidAttributeTier(AttributeTier::Auto))
    ));
}

// ============================================================================
// CASCADE
// ============================================================================

#[test]
fn test_markup_only_value_resolves_without_recursion() {
    let (doc, _, layer, _, _) = sample();
    let fill = doc.resolve_style(layer, "fill", false, false).unwrap().unwrap();
    assert_eq!(fill.as_str(), "green");
}

#[test]
fn test_absent_property_not_found() {
    let (doc, _, _, rect, _) = sample();
    assert_eq!(doc.resolve_style(rect, "marker-start", true, true).unwrap(), None);
}

#[test]
fn test_inherits_nearest_ancestor() {
    let (doc, _, _, rect, _) = sample();
    assert_eq!(doc.style(rect, "fill").unwrap().unwrap().as_str(), "green");
}

#[test]
fn test_context_override_beats_structural_parent() {
    let (doc, _, _, rect, palette) = sample();
    let mut contexts = ContextStack::new();

    {
        let guard = contexts.scoped(rect, palette);
        let fill = doc.resolve_style_in(&guard, rect, "fill", true, true).unwrap().unwrap();
        assert_eq!(fill.as_str(), "purple");
    }

    let fill = doc.resolve_style_in(&contexts, rect, "fill", true, true).unwrap().unwrap();
    assert_eq!(fill.as_str(), "green");
    assert!(contexts.is_empty());
}

#[test]
fn test_context_push_pop_by_hand() {
    let (doc, _, _, rect, palette) = sample();
    let mut contexts = ContextStack::new();

    contexts.push_context(rect, palette);
    let fill = doc.resolve_style_in(&contexts, rect, "fill", true, true).unwrap().unwrap();
    assert_eq!(fill.as_str(), "purple");
    assert_eq!(contexts.pop_context(rect).unwrap(), palette);

    let fill = doc.resolve_style_in(&contexts, rect, "fill", true, true).unwrap().unwrap();
    assert_eq!(fill.as_str(), "green");
}

#[derive(Debug)]
struct ClassSheet;

impl StyleSheet for ClassSheet {
    fn lookup(&self, _tag_name: &str, class: Option<&str>, property: &str) -> Option<String> {
        match (class, property) {
            (Some("hot"), "fill") => Some("orange".into()),
            _ => None,
        }
    }
}

#[test]
fn test_stylesheet_short_circuits_ancestors() {
    let (mut doc, _, _, rect, _) = sample();
    doc.set_stylesheet(Some(Box::new(ClassSheet)));

    // Ancestors define fill, but the stylesheet answers first
    assert_eq!(doc.style(rect, "fill").unwrap(), None);

    doc.add_attribute(rect, AttributeTier::Markup, "class", "hot").unwrap();
    doc.build_node(rect).unwrap();
    assert_eq!(doc.style(rect, "fill").unwrap().unwrap().as_str(), "orange");

    // Local tiers still win over the stylesheet
    doc.add_attribute(rect, AttributeTier::Style, "fill", "white").unwrap();
    assert_eq!(doc.style(rect, "fill").unwrap().unwrap().as_str(), "white");
}

#[test]
fn test_detached_subtree_skips_stylesheet() {
    let (mut doc, _, layer, rect, _) = sample();
    doc.set_stylesheet(Some(Box::new(ClassSheet)));
    doc.remove_child(layer, rect).unwrap();
    doc.add_attribute(rect, AttributeTier::Markup, "stroke", "gray").unwrap();

    assert_eq!(doc.style(rect, "stroke").unwrap().unwrap().as_str(), "gray");
    assert_eq!(doc.style(rect, "fill").unwrap(), None);
}

// ============================================================================
// ANIMATION
// ============================================================================

fn animated() -> (Document, NodeId, NodeId) {
    let mut doc = Document::new();
    let mut builder = TreeBuilder::new(&mut doc);
    let root = builder.start_tag("svg", &[]).unwrap();
    let rect = builder
        .start_tag("rect", &attrs(&[("fill", "blue"), ("x", "0")]))
        .unwrap();
    builder
        .start_tag(
            "set",
            &attrs(&[("attributeName", "fill"), ("to", "red"), ("begin", "2s")]),
        )
        .unwrap();
    builder.end().unwrap();
    builder
        .start_tag(
            "animate",
            &attrs(&[
                ("attributeName", "x"),
                ("attributeType", "XML"),
                ("from", "0"),
                ("to", "100"),
                ("dur", "10s"),
                ("fill", "freeze"),
            ]),
        )
        .unwrap();
    builder.end().unwrap();
    builder.end().unwrap();
    builder.end().unwrap();
    doc.rebuild(root).unwrap();
    (doc, root, rect)
}

#[test]
fn test_track_overrides_static_value() {
    let (mut doc, _, rect) = animated();

    // Track exists: found even before the set begins, yielding the base
    assert_eq!(doc.style(rect, "fill").unwrap().unwrap().as_str(), "blue");

    doc.set_current_time(3.0);
    assert_eq!(doc.style(rect, "fill").unwrap().unwrap().as_str(), "red");
    assert_eq!(
        doc.resolve_style(rect, "fill", false, false).unwrap().unwrap().as_str(),
        "blue"
    );
    assert_eq!(doc.raw_markup(rect, "fill").unwrap().unwrap().as_str(), "blue");
}

#[test]
fn test_tier_with_neither_track_nor_value_falls_through() {
    let (mut doc, root, rect) = animated();
    doc.add_attribute(root, AttributeTier::Markup, "stroke", "navy").unwrap();
    doc.set_current_time(3.0);

    assert_eq!(doc.style(rect, "stroke").unwrap().unwrap().as_str(), "navy");
}

#[test]
fn test_update_time_rebuilds_geometry() {
    let (mut doc, _, rect) = animated();

    assert!(doc.update_time(5.0).unwrap());
    let x = doc.node(rect).unwrap().kind_as::<RectElement>().unwrap().x;
    assert_eq!(x, 50.0);

    doc.update_time(20.0).unwrap();
    let x = doc.node(rect).unwrap().kind_as::<RectElement>().unwrap().x;
    assert_eq!(x, 100.0);
}

#[test]
fn test_removing_animation_drops_track() {
    let (mut doc, _, rect) = animated();
    let set = doc.child_at(rect, 0).unwrap().unwrap();
    doc.set_current_time(3.0);

    doc.remove_child(rect, set).unwrap();
    assert_eq!(doc.style(rect, "fill").unwrap().unwrap().as_str(), "blue");
    assert_eq!(doc.node(rect).unwrap().tracks().len(), 1);
}

#[test]
fn test_animated_attribute_without_static_value() {
    let mut doc = Document::new();
    let mut builder = TreeBuilder::new(&mut doc);
    let root = builder.start_tag("svg", &[]).unwrap();
    let rect = builder.start_tag("rect", &[]).unwrap();
    builder
        .start_tag(
            "set",
            &attrs(&[("attributeName", "width"), ("to", "5"), ("begin", "2s")]),
        )
        .unwrap();
    builder.end().unwrap();
    builder.end().unwrap();
    builder.end().unwrap();

    // Idle track over no static value: found, but empty
    doc.rebuild(root).unwrap();
    assert_eq!(doc.resolve_presentation(rect, "width").unwrap().unwrap().as_str(), "");
    assert_eq!(doc.node(rect).unwrap().kind_as::<RectElement>().unwrap().width, 0.0);

    doc.update_time(1.0).unwrap();
    assert_eq!(doc.node(rect).unwrap().kind_as::<RectElement>().unwrap().width, 0.0);

    doc.update_time(3.0).unwrap();
    assert_eq!(doc.node(rect).unwrap().kind_as::<RectElement>().unwrap().width, 5.0);
}

#[test]
fn test_update_time_refreshes_values_cascaded_from_animated_ancestor() {
    let mut doc = Document::new();
    let mut builder = TreeBuilder::new(&mut doc);
    let root = builder
        .start_tag("svg", &attrs(&[("stroke-width", "1")]))
        .unwrap();
    builder
        .start_tag(
            "set",
            &attrs(&[("attributeName", "stroke-width"), ("to", "7"), ("begin", "1s")]),
        )
        .unwrap();
    builder.end().unwrap();
    let g = builder.start_tag("g", &[]).unwrap();
    let rect = builder.start_tag("rect", &[]).unwrap();
    builder.end().unwrap();
    builder.end().unwrap();
    builder.end().unwrap();
    doc.rebuild(root).unwrap();

    let stroke = |doc: &Document| doc.node(rect).unwrap().kind_as::<RectElement>().unwrap().stroke_width;
    assert_eq!(stroke(&doc), 1.0);

    doc.update_time(2.0).unwrap();
    assert_eq!(doc.style(rect, "stroke-width").unwrap().unwrap().as_str(), "7");
    assert_eq!(stroke(&doc), 7.0);
    assert_eq!(doc.children(g).unwrap(), &[rect]);
}

/// `<rect fill="green" style="fill: blue"><set attributeType="CSS" .../></rect>`
fn style_animated(style: Option<&str>) -> (Document, NodeId) {
    let mut doc = Document::new();
    let mut builder = TreeBuilder::new(&mut doc);
    let root = builder.start_tag("svg", &[]).unwrap();
    let mut rect_attrs = attrs(&[("fill", "green")]);
    if let Some(style) = style {
        rect_attrs.push(RawAttribute::new("style", style));
    }
    let rect = builder.start_tag("rect", &rect_attrs).unwrap();
    builder
        .start_tag(
            "set",
            &attrs(&[
                ("attributeName", "fill"),
                ("attributeType", "CSS"),
                ("to", "red"),
                ("begin", "1s"),
            ]),
        )
        .unwrap();
    builder.end().unwrap();
    builder.end().unwrap();
    builder.end().unwrap();
    doc.rebuild(root).unwrap();
    (doc, rect)
}

#[test]
fn test_style_track_beats_static_style_value() {
    let (mut doc, rect) = style_animated(Some("fill: blue"));

    // Before the set begins the style tier yields its static value
    assert_eq!(doc.style(rect, "fill").unwrap().unwrap().as_str(), "blue");

    doc.set_current_time(2.0);
    assert_eq!(doc.style(rect, "fill").unwrap().unwrap().as_str(), "red");
    assert_eq!(doc.raw_style(rect, "fill").unwrap().unwrap().as_str(), "blue");
    assert_eq!(
        doc.resolve_style(rect, "fill", false, false).unwrap().unwrap().as_str(),
        "blue"
    );
}

#[test]
fn test_style_track_beats_markup_value() {
    let (mut doc, rect) = style_animated(None);
    doc.set_current_time(2.0);

    assert_eq!(doc.style(rect, "fill").unwrap().unwrap().as_str(), "red");
    assert_eq!(doc.resolve_presentation(rect, "fill").unwrap().unwrap().as_str(), "green");
    assert_eq!(
        doc.resolve_style(rect, "fill", false, false).unwrap().unwrap().as_str(),
        "green"
    );
}

// ============================================================================
// REBUILD
// ============================================================================

#[test]
fn test_rect_geometry_from_presentation() {
    let (mut doc, _, layer, rect, _) = sample();
    doc.add_attribute(layer, AttributeTier::Style, "stroke-width", "3").unwrap();
    doc.rebuild(rect).unwrap();

    let node = doc.node(rect).unwrap();
    let shape = node.kind_as::<RectElement>().unwrap();
    assert_eq!(shape.x, 1.0);
    assert_eq!(shape.width, 10.0);
    assert_eq!(shape.height, 0.0);
    assert_eq!(shape.stroke_width, 3.0);
}

#[test]
fn test_group_transform_after_rebuild() {
    let (mut doc, _, layer, _, _) = sample();
    doc.add_attribute(layer, AttributeTier::Markup, "transform", "translate(5, 6)").unwrap();
    doc.rebuild(layer).unwrap();

    let node = doc.node(layer).unwrap();
    let transform = node.kind_as::<Group>().unwrap().transform();
    assert_eq!((transform.tx, transform.ty), (5.0, 6.0));
}

#[test]
fn test_rebuild_is_idempotent() {
    let (mut doc, root, layer, rect, palette) = sample();
    doc.add_attribute(layer, AttributeTier::Markup, "class", "tiles").unwrap();

    doc.rebuild(root).unwrap();
    let first: Vec<_> = [root, layer, rect, palette]
        .iter()
        .map(|&n| format!("{:?} {:?}", doc.node(n).unwrap(), doc.node(n).unwrap().kind()))
        .collect();
    let registry = doc.registry_len();

    doc.rebuild(root).unwrap();
    let second: Vec<_> = [root, layer, rect, palette]
        .iter()
        .map(|&n| format!("{:?} {:?}", doc.node(n).unwrap(), doc.node(n).unwrap().kind()))
        .collect();

    assert_eq!(first, second);
    assert_eq!(registry, doc.registry_len());
    assert_eq!(doc.node(layer).unwrap().class(), Some("tiles"));
}

// ============================================================================
// BASE URI
// ============================================================================

#[test]
fn test_base_uri_inheritance() {
    let config = DocumentConfig {
        base_url: Some(Url::parse("http://example.com/art/index.svg").unwrap()),
        ..Default::default()
    };
    let mut doc = Document::with_config(config);
    let mut builder = TreeBuilder::new(&mut doc);
    let root = builder.start_tag("svg", &[]).unwrap();
    let g = builder
        .start_tag("g", &attrs(&[("xml:base", "icons/")]))
        .unwrap();
    let rect = builder.start_tag("rect", &[]).unwrap();
    builder.end().unwrap();
    builder.end().unwrap();
    builder.end().unwrap();

    assert_eq!(
        doc.base_uri(root).unwrap().unwrap().as_str(),
        "http://example.com/art/index.svg"
    );
    assert_eq!(
        doc.base_uri(rect).unwrap().unwrap().as_str(),
        "http://example.com/art/icons/"
    );

    doc.set_attribute(g, AttributeTier::Markup, "xml:base", "http://cdn.example.org/")
        .unwrap();
    doc.rebuild(g).unwrap();
    assert_eq!(
        doc.base_uri(rect).unwrap().unwrap().as_str(),
        "http://cdn.example.org/"
    );

    let href = fsvg_dom::StyleAttribute::new("href", "star.png");
    let base = doc.base_uri(rect).unwrap();
    assert_eq!(
        href.url(base.as_ref()).unwrap().as_str(),
        "http://cdn.example.org/star.png"
    );
}

#[test]
fn test_rebuild_on_element_end_config() {
    let config = DocumentConfig {
        rebuild_on_element_end: true,
        ..Default::default()
    };
    let mut doc = Document::with_config(config);
    let mut builder = TreeBuilder::new(&mut doc);
    builder.start_tag("svg", &[]).unwrap();
    let rect = builder
        .start_tag("rect", &attrs(&[("width", "8")]))
        .unwrap();
    builder.end().unwrap();
    builder.end().unwrap();

    let node = doc.node(rect).unwrap();
    assert_eq!(node.kind_as::<RectElement>().unwrap().width, 8.0);
}
