use super::{Canvas, Color};
use printpdf::ops::Op;
use printpdf::{BuiltinFont, Pt, TextItem, TextMatrix};

/// Average Helvetica advance as a fraction of the font size. Good enough to
/// centre short labels without font metrics.
const AVG_ADVANCE: f32 = 0.52;

#[derive(Debug, Clone, Copy)]
pub(in crate::render) struct TextStyle {
    pub size: f32,
    pub font: BuiltinFont,
    pub color: Color,
}

impl TextStyle {
    /// Estimated rendered width of `text` in this style.
    pub fn approx_width(&self, text: &str) -> f32 {
        let factor = match self.font {
            BuiltinFont::HelveticaBold => AVG_ADVANCE * 1.08,
            _ => AVG_ADVANCE,
        };
        text.chars().count() as f32 * self.size * factor
    }
}

/// Writes one line of text with its baseline `size * 0.8` below `top`.
pub(in crate::render) fn draw_text(canvas: &mut Canvas, text: &str, x: f32, top: f32, style: TextStyle) {
    if text.is_empty() {
        return;
    }

    canvas.open_text_section();
    canvas.set_fill_color(style.color);
    canvas.ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(style.size),
        font: style.font,
    });

    let baseline_y = top + style.size * 0.8;
    let pdf_y = canvas.page_height_pt - baseline_y;
    canvas.ops.push(Op::SetTextMatrix {
        matrix: TextMatrix::Translate(Pt(x), Pt(pdf_y)),
    });
    canvas.ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_string())],
        font: style.font,
    });
}

/// Writes `text` horizontally centred in the span starting at `left`.
/// Text wider than the span is truncated with an ellipsis first.
pub(in crate::render) fn draw_text_centered(
    canvas: &mut Canvas,
    text: &str,
    left: f32,
    width: f32,
    top: f32,
    style: TextStyle,
) {
    let fitted = fit_to_width(text, width, &style);
    let x = left + ((width - style.approx_width(&fitted)) / 2.0).max(0.0);
    draw_text(canvas, &fitted, x, top, style);
}

fn fit_to_width(text: &str, width: f32, style: &TextStyle) -> String {
    if style.approx_width(text) <= width {
        return text.to_string();
    }
    let ellipsis = style.approx_width("...");
    let mut fitted = text.to_string();
    while !fitted.is_empty() && style.approx_width(&fitted) + ellipsis > width {
        fitted.pop();
    }
    format!("{}...", fitted.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> TextStyle {
        TextStyle {
            size: 10.0,
            font: BuiltinFont::Helvetica,
            color: Color::rgb(0, 0, 0),
        }
    }

    #[test]
    fn long_text_is_truncated_to_fit() {
        let fitted = fit_to_width("A very long listing name indeed", 60.0, &body());
        assert!(fitted.ends_with("..."));
        assert!(body().approx_width(&fitted) <= 60.0);
    }

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(fit_to_width("Cafe", 100.0, &body()), "Cafe");
    }

    #[test]
    fn empty_text_emits_nothing() {
        let mut canvas = Canvas::new(842.0);
        draw_text(&mut canvas, "", 0.0, 0.0, body());
        assert!(canvas.into_ops().is_empty());
    }
}
