use crate::scene::{Primitive, Scene};
use crate::view::TreemapView;
use std::fmt::Write as _;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a scene as a standalone SVG document.
pub fn to_svg(scene: &Scene) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = scene.width,
        h = scene.height
    );
    for p in &scene.primitives {
        match p {
            Primitive::Rect { bounds, fill, stroke, class, tile } => {
                let _ = write!(
                    svg,
                    r#"  <rect class="{class}" x="{}" y="{}" width="{}" height="{}" fill="{fill}""#,
                    bounds.x0,
                    bounds.y0,
                    bounds.width(),
                    bounds.height()
                );
                if let Some(stroke) = stroke {
                    let _ = write!(svg, r#" stroke="{stroke}""#);
                }
                if let Some(t) = tile {
                    let _ = write!(
                        svg,
                        r#" data-name="{}" data-category="{}" data-value="{}""#,
                        escape(&t.name),
                        escape(&t.category),
                        t.value
                    );
                }
                svg.push_str("/>\n");
            }
            Primitive::Text { x, y, text, font_size, fill } => {
                let _ = writeln!(
                    svg,
                    r#"  <text x="{x}" y="{y}" font-size="{font_size}px" fill="{fill}" font-family="sans-serif">{}</text>"#,
                    escape(text)
                );
            }
        }
    }
    svg.push_str("</svg>\n");
    svg
}

pub fn to_json(view: &TreemapView) -> serde_json::Value {
    serde_json::json!({
        "width": view.width,
        "height": view.height,
        "tiles": view.tiles.iter().map(|t| serde_json::json!({
            "name": t.name,
            "category": t.category,
            "value": t.value,
            "fill": t.fill.to_hex(),
            "label": t.label,
            "x0": t.bounds.x0,
            "y0": t.bounds.y0,
            "x1": t.bounds.x1,
            "y1": t.bounds.y1,
        })).collect::<Vec<_>>()
    })
}

pub fn to_csv(view: &TreemapView, mut w: impl std::io::Write) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record(["name", "category", "value", "fill", "x0", "y0", "x1", "y1"])?;
    for t in &view.tiles {
        writer.write_record([
            t.name.clone(),
            t.category.clone(),
            t.value.to_string(),
            t.fill.to_hex(),
            t.bounds.x0.to_string(),
            t.bounds.y0.to_string(),
            t.bounds.x1.to_string(),
            t.bounds.y1.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
