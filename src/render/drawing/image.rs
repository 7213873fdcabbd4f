use super::Canvas;
use printpdf::Pt;
use printpdf::ops::Op;
use printpdf::xobject::XObjectTransform;
use printpdf::XObjectId;

/// A decoded image registered with the document, with its pixel size.
#[derive(Debug, Clone)]
pub(in crate::render) struct PlacedImage {
    pub id: XObjectId,
    pub width_px: u32,
    pub height_px: u32,
}

/// Draws `image` scaled into the box whose top-left corner is at (`x`, `y`).
pub(in crate::render) fn draw_image(canvas: &mut Canvas, image: &PlacedImage, x: f32, y: f32, width: f32, height: f32) {
    // Images cannot be drawn within a text section.
    canvas.close_text_section_if_open();

    let pdf_y = canvas.pdf_y(y, height);
    let transform = XObjectTransform {
        translate_x: Some(Pt(x)),
        translate_y: Some(Pt(pdf_y)),
        scale_x: Some(width / image.width_px as f32),
        scale_y: Some(height / image.height_px as f32),
        rotate: None,
        dpi: Some(72.0),
    };
    canvas.ops.push(Op::UseXobject {
        id: image.id.clone(),
        transform,
    });
}
