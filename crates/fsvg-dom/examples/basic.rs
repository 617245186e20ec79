//! Example: Build a small animated document and resolve styles

use fsvg_dom::{ContextStack, Document, RawAttribute, RectElement, TreeBuilder};
use tracing_subscriber::EnvFilter;

fn attrs(pairs: &[(&str, &str)]) -> Vec<RawAttribute> {
    pairs.iter().map(|(n, v)| RawAttribute::new(*n, *v)).collect()
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new();
    let mut builder = TreeBuilder::new(&mut doc);

    let root = builder.start_tag("svg", &attrs(&[("id", "canvas"), ("fill", "black")]))?;
    builder.start_tag("g", &attrs(&[("id", "layer"), ("transform", "translate(10) scale(2)")]))?;
    let rect = builder.start_tag(
        "rect",
        &attrs(&[("id", "box"), ("width", "40"), ("height", "20"), ("style", "stroke-width: 2")]),
    )?;
    builder.start_tag(
        "animate",
        &attrs(&[("attributeName", "width"), ("to", "80"), ("dur", "4s"), ("fill", "freeze")]),
    )?;
    builder.end()?;
    builder.end()?;
    builder.end()?;
    let swatch = builder.start_tag("g", &attrs(&[("id", "swatch"), ("fill", "tomato")]))?;
    builder.end()?;
    builder.end()?;

    doc.rebuild(root)?;
    println!("fill of #box: {:?}", doc.style(rect, "fill")?.map(|a| a.as_str().to_string()));

    let mut contexts = ContextStack::new();
    {
        let guard = contexts.scoped(rect, swatch);
        let fill = doc.resolve_style_in(&guard, rect, "fill", true, true)?;
        println!("fill of #box under #swatch: {:?}", fill.map(|a| a.as_str().to_string()));
    }

    for t in [0.0, 1.0, 2.0, 5.0] {
        doc.update_time(t)?;
        let node = doc.node(rect)?;
        if let Some(shape) = node.kind_as::<RectElement>() {
            println!("t={}s width={} stroke-width={}", t, shape.width, shape.stroke_width);
        }
    }

    Ok(())
}
