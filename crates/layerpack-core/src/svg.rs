//! SVG rendering of a packing result as two orthographic views.

use crate::types::{PackResult, Placement};
use std::fmt::{self, Write};

const MARGIN: f64 = 20.0;
const VIEW_SPACING: f64 = 40.0;
/// Longest container side is drawn this many pixels long
const TARGET_SIZE: f64 = 400.0;

/// Draws a top view (x by z) and a front view (x by y) side by side.
pub fn render_svg(result: &PackResult) -> Result<String, fmt::Error> {
    let container = &result.container;
    let wall = container.wall_thickness as f64;
    let outer_w = container.width as f64 + 2.0 * wall;
    let outer_h = container.height as f64 + 2.0 * wall;
    let outer_l = container.length as f64 + 2.0 * wall;

    let longest = outer_w.max(outer_h).max(outer_l).max(1.0);
    let scale = TARGET_SIZE / longest;

    let svg_width = 2.0 * MARGIN + VIEW_SPACING + 2.0 * outer_w * scale;
    let svg_height = 3.0 * MARGIN + outer_h.max(outer_l) * scale + 20.0;

    let mut svg = String::new();
    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )?;
    writeln!(
        &mut svg,
        r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##
    )?;

    let top_x = MARGIN;
    let front_x = MARGIN + outer_w * scale + VIEW_SPACING;
    let view_y = MARGIN + 10.0;

    write_view(
        &mut svg,
        "Top (x/z)",
        (top_x, view_y),
        (outer_w * scale, outer_l * scale),
        scale,
        &result.placements,
        |p| (p.x as f64, p.z as f64, p.width as f64, p.length as f64),
    )?;
    write_view(
        &mut svg,
        "Front (x/y)",
        (front_x, view_y),
        (outer_w * scale, outer_h * scale),
        scale,
        &result.placements,
        // Container floor at the bottom of the view
        |p| {
            let top = p.y as f64 + p.height as f64;
            (p.x as f64, outer_h - top, p.width as f64, p.height as f64)
        },
    )?;

    writeln!(
        &mut svg,
        r##"  <text x="{}" y="{}" font-family="Arial" font-size="12" fill="#666">Boxes: {} placed, {} left over | Utilization: {:.1}%</text>"##,
        MARGIN,
        svg_height - MARGIN / 2.0,
        result.summary.packed_boxes,
        result.summary.leftover_boxes,
        result.summary.volume_utilization
    )?;
    writeln!(&mut svg, "</svg>")?;

    Ok(svg)
}

/// One projection: the container outline plus every placement flattened
/// onto the two axes chosen by `project`.
fn write_view(
    svg: &mut String,
    label: &str,
    origin: (f64, f64),
    size: (f64, f64),
    scale: f64,
    placements: &[Placement],
    project: impl Fn(&Placement) -> (f64, f64, f64, f64),
) -> fmt::Result {
    let (ox, oy) = origin;
    writeln!(
        svg,
        r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#ffffff" stroke="#333" stroke-width="2"/>"##,
        ox, oy, size.0, size.1
    )?;
    writeln!(
        svg,
        r##"  <text x="{}" y="{}" font-family="Arial" font-size="14" fill="#333">{}</text>"##,
        ox,
        oy - 5.0,
        label
    )?;

    for placement in placements {
        let (a, b, len_a, len_b) = project(placement);
        writeln!(
            svg,
            r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#4CAF50" stroke="#2E7D32" stroke-width="1" opacity="0.35"><title>{}</title></rect>"##,
            ox + a * scale,
            oy + b * scale,
            len_a * scale,
            len_b * scale,
            escape(&placement.item_id)
        )?;
    }

    Ok(())
}

/// Escapes text for SVG character data and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Container, Item, PackOptions, PackRequest};
    use crate::Packer;

    fn packed(ids: &[&str], wall_thickness: u32) -> PackResult {
        let items = ids
            .iter()
            .map(|id| Item {
                id: id.to_string(),
                width: 5,
                height: 5,
                length: 5,
                quantity: 1,
            })
            .collect();
        let request = PackRequest {
            container: Container {
                id: "crate".to_string(),
                width: 10,
                height: 10,
                length: 10,
                wall_thickness,
            },
            items,
            options: PackOptions::default(),
        };
        Packer::new(request).unwrap().pack().unwrap()
    }

    #[test]
    fn test_item_ids_are_escaped() {
        let result = packed(&["A&B <fragile>", "say \"hi\""], 0);
        let svg = render_svg(&result).unwrap();

        assert!(svg.contains("<title>A&amp;B &lt;fragile&gt;</title>"));
        assert!(svg.contains("<title>say &quot;hi&quot;</title>"));
        assert!(!svg.contains("<fragile>"));
        assert!(!svg.contains("A&B"));
    }

    #[test]
    fn test_one_rect_per_placement_in_each_view() {
        let result = packed(&["a", "b", "c"], 1);
        assert_eq!(result.placements.len(), 3);
        let svg = render_svg(&result).unwrap();

        // Background plus one outline per view
        let frame_rects = 3;
        assert_eq!(svg.matches("<rect").count(), frame_rects + 2 * 3);
        assert_eq!(svg.matches("<title>").count(), 2 * 3);
        assert_eq!(svg.matches("</title></rect>").count(), 2 * 3);
        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<svg ").count(), 1);
    }

    #[test]
    fn test_huge_dimensions_do_not_overflow() {
        let mut result = packed(&["a"], 0);
        result.container.height = u32::MAX;
        result.container.wall_thickness = u32::MAX;
        result.placements[0].y = u32::MAX;
        result.placements[0].height = u32::MAX;

        let svg = render_svg(&result).unwrap();
        assert!(svg.contains("Front (x/y)"));
    }

    #[test]
    fn test_escape_leaves_plain_text_alone() {
        assert_eq!(escape("pallet-7"), "pallet-7");
        assert_eq!(escape("<&>\""), "&lt;&amp;&gt;&quot;");
    }
}
