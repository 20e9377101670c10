//! Markup serialization of a surface tree.

use peniko::Color;
use sketchplane_core::surface::{GroupId, MemorySurface, NodeAttrs, NodeRecord};
use std::fmt::{self, Write};

/// Serialize the whole surface into an `<svg>` document.
pub fn render_markup(surface: &MemorySurface, width: f64, height: f64) -> String {
    let mut out = String::new();
    // Writing into a String never fails.
    let _ = write_markup(&mut out, surface, width, height);
    out
}

/// Serialize the surface into `out`.
pub fn write_markup<W: Write>(
    out: &mut W,
    surface: &MemorySurface,
    width: f64,
    height: f64,
) -> fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#
    )?;
    for group in surface.groups_in(None) {
        write_group(out, surface, group.id, 1)?;
    }
    writeln!(out, "</svg>")
}

fn write_group<W: Write>(
    out: &mut W,
    surface: &MemorySurface,
    group: GroupId,
    depth: usize,
) -> fmt::Result {
    let Some(record) = surface.group(group) else {
        return Ok(());
    };
    let pad = "  ".repeat(depth);
    writeln!(out, r#"{pad}<g class="{}">"#, record.class)?;
    for node in surface.nodes_in(group) {
        if node.visible {
            write_node(out, node, depth + 1)?;
        }
    }
    for child in surface.groups_in(Some(group)) {
        write_group(out, surface, child.id, depth + 1)?;
    }
    writeln!(out, "{pad}</g>")
}

fn write_node<W: Write>(out: &mut W, node: &NodeRecord, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    match node.attrs {
        NodeAttrs::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
            stroke_width,
        } => writeln!(
            out,
            r#"{pad}<circle class="{}" cx="{cx}" cy="{cy}" r="{r}" fill="{}" stroke="{}" stroke-width="{stroke_width}"/>"#,
            node.class,
            css_color(fill),
            css_color(stroke),
        ),
        NodeAttrs::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            stroke_width,
        } => writeln!(
            out,
            r#"{pad}<rect class="{}" x="{x}" y="{y}" width="{width}" height="{height}" fill="{}" stroke="{}" stroke-width="{stroke_width}"/>"#,
            node.class,
            fill.map_or_else(|| "none".to_string(), css_color),
            css_color(stroke),
        ),
    }
}

fn css_color(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("rgb({},{},{})", rgba.r, rgba.g, rgba.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use sketchplane_core::{
        Construction, Engine, EventKind, InputEvent, MemorySurface, PointConstruction,
        RectangleConstruction,
    };

    fn send(engine: &mut Engine<MemorySurface>, kind: EventKind, x: f64, y: f64) {
        let mut event = InputEvent::mouse(kind, Point::new(x, y));
        engine.dispatch(&mut event);
    }

    #[test]
    fn test_committed_point_serializes_as_circle() {
        let mut engine = Engine::new(MemorySurface::new());
        let task = Construction::Point(PointConstruction::new(engine.plane_group()));
        engine.enqueue_task(task);
        send(&mut engine, EventKind::MouseMove, 50.0, 60.0);
        send(&mut engine, EventKind::MouseDown, 50.0, 60.0);
        send(&mut engine, EventKind::MouseUp, 50.0, 60.0);

        let svg = render_markup(engine.surface(), 800.0, 600.0);
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"<g class="canvas">"#));
        assert!(svg.contains(r#"<g class="geometric-plane">"#));
        assert!(svg.contains(r#"cx="50" cy="60""#));
        assert!(svg.contains(r#"fill="rgb(0,0,0)""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_committed_rectangle_serializes_with_handles() {
        let mut engine = Engine::new(MemorySurface::new());
        let task = Construction::Rectangle(RectangleConstruction::new(engine.plane_group()));
        engine.enqueue_task(task);
        send(&mut engine, EventKind::MouseUp, 10.0, 10.0);
        send(&mut engine, EventKind::MouseMove, 110.0, 60.0);
        send(&mut engine, EventKind::MouseUp, 110.0, 60.0);

        let svg = render_markup(engine.surface(), 800.0, 600.0);
        assert!(svg.contains(r#"x="10" y="10" width="100" height="50""#));
        assert!(svg.contains(r#"fill="none""#));
        // Four corner handles render as circles.
        assert_eq!(svg.matches("<circle").count(), 4);
    }

    #[test]
    fn test_hidden_nodes_are_skipped() {
        use sketchplane_core::{NodeAttrs, Surface};

        let mut surface = MemorySurface::new();
        let group = surface.create_group(None, "canvas");
        let node = surface.create_node(
            group,
            "block-point",
            NodeAttrs::Circle {
                cx: 1.0,
                cy: 1.0,
                r: 3.0,
                fill: Color::from_rgba8(0, 0, 0, 255),
                stroke: Color::from_rgba8(0, 0, 0, 255),
                stroke_width: 1.0,
            },
        );

        // Nodes are created hidden and must not serialize until shown.
        let svg = render_markup(&surface, 100.0, 100.0);
        assert!(!svg.contains("<circle"));

        surface.set_visible(node, true);
        let svg = render_markup(&surface, 100.0, 100.0);
        assert!(svg.contains("<circle"));
    }
}
