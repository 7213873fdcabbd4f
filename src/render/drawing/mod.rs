//! Low-level `printpdf` drawing on a single page.
//!
//! Callers position everything from the top-left corner in points; the
//! helpers convert to the PDF bottom-left origin.

use printpdf::Op;
use printpdf::Rgb;

pub(super) mod image;
pub(super) mod rect;
pub(super) mod text;

/// A color in 0-255 RGB components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub(super) fn to_pdf(self) -> printpdf::color::Color {
        printpdf::color::Color::Rgb(Rgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            None,
        ))
    }
}

/// Operation buffer and graphics state for one page.
pub(super) struct Canvas {
    pub page_height_pt: f32,
    pub ops: Vec<Op>,
    is_text_section_open: bool,
    current_fill_color: Option<Color>,
}

impl Canvas {
    pub fn new(page_height_pt: f32) -> Self {
        Self {
            page_height_pt,
            ops: Vec::new(),
            is_text_section_open: false,
            current_fill_color: None,
        }
    }

    /// Flip a top-left `y` of a box with `height` into PDF space.
    pub fn pdf_y(&self, y: f32, height: f32) -> f32 {
        self.page_height_pt - (y + height)
    }

    pub fn close_text_section_if_open(&mut self) {
        if self.is_text_section_open {
            self.ops.push(Op::EndTextSection);
            self.is_text_section_open = false;
        }
    }

    fn open_text_section(&mut self) {
        if !self.is_text_section_open {
            self.ops.push(Op::StartTextSection);
            self.is_text_section_open = true;
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.current_fill_color != Some(color) {
            self.ops.push(Op::SetFillColor { col: color.to_pdf() });
            self.current_fill_color = Some(color);
        }
    }

    pub fn into_ops(mut self) -> Vec<Op> {
        self.close_text_section_if_open();
        self.ops
    }
}
