use super::{Canvas, Color};
use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::ops::Op;
use printpdf::{LineDashPattern, Pt};

fn corner(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Fills a rectangle whose top-left corner is at (`x`, `y`).
pub(in crate::render) fn fill_rect(canvas: &mut Canvas, x: f32, y: f32, width: f32, height: f32, color: Color) {
    // Rectangles cannot be drawn within a text section.
    canvas.close_text_section_if_open();
    let pdf_y = canvas.pdf_y(y, height);

    let polygon = Polygon {
        rings: vec![PolygonRing {
            points: vec![
                corner(x, pdf_y),
                corner(x + width, pdf_y),
                corner(x + width, pdf_y + height),
                corner(x, pdf_y + height),
            ],
        }],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    };
    canvas.set_fill_color(color);
    canvas.ops.push(Op::DrawPolygon { polygon });
}

/// Strokes the outline of a rectangle whose top-left corner is at (`x`, `y`).
pub(in crate::render) fn stroke_rect(
    canvas: &mut Canvas,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    color: Color,
    thickness: f32,
) {
    canvas.close_text_section_if_open();
    let pdf_y = canvas.pdf_y(y, height);

    canvas.ops.push(Op::SetOutlineThickness { pt: Pt(thickness) });
    canvas.ops.push(Op::SetOutlineColor { col: color.to_pdf() });
    canvas.ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    corner(x, pdf_y),
                    corner(x + width, pdf_y),
                    corner(x + width, pdf_y + height),
                    corner(x, pdf_y + height),
                ],
            }],
            mode: PaintMode::Stroke,
            winding_order: WindingOrder::NonZero,
        },
    });
}

/// A dashed straight line between two top-left-origin points.
pub(in crate::render) fn dashed_line(canvas: &mut Canvas, from: (f32, f32), to: (f32, f32), color: Color) {
    canvas.close_text_section_if_open();
    let height = canvas.page_height_pt;

    canvas.ops.push(Op::SetOutlineThickness { pt: Pt(0.75) });
    canvas.ops.push(Op::SetOutlineColor { col: color.to_pdf() });
    canvas.ops.push(Op::SetLineDashPattern {
        dash: LineDashPattern {
            dash_1: Some(3),
            gap_1: Some(3),
            dash_2: None,
            gap_2: None,
            dash_3: None,
            gap_3: None,
            offset: 0,
        },
    });
    canvas.ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![corner(from.0, height - from.1), corner(to.0, height - to.1)],
            }],
            mode: PaintMode::Stroke,
            winding_order: WindingOrder::NonZero,
        },
    });
    canvas.ops.push(Op::SetLineDashPattern {
        dash: LineDashPattern::default(),
    });
}
