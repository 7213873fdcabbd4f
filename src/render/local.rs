//! In-process PDF rendering with `lopdf`.
//!
//! The composed sheet is reduced to text: each grid cell is flattened to
//! lines and set in the builtin Helvetica face inside its quarter of an A4
//! page, with dashed cut guides through the page centre.

use super::{A4_HEIGHT_PT, A4_WIDTH_PT, BackendError, RenderBackend, run_blocking};
use crate::markup::{GRID_CELLS, PrintSheet, flatten_to_lines};
use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use standee_types::{ListingRecord, RenderArtifact};

/// 0.3in top/bottom, 0.35in left/right.
const MARGIN_Y: f32 = 21.6;
const MARGIN_X: f32 = 25.2;
/// 0.2in between cells.
const GAP: f32 = 14.4;
const CELL_PADDING: f32 = 14.0;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const LINE_SPACING: f32 = 1.35;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.52;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPdfBackend;

impl LocalPdfBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RenderBackend for LocalPdfBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn render(
        &self,
        sheet: &PrintSheet,
        _listing: &ListingRecord,
    ) -> Result<RenderArtifact, BackendError> {
        let cells: Vec<Vec<String>> = sheet.cells().into_iter().map(flatten_to_lines).collect();
        if cells.is_empty() {
            return Err(BackendError::Render("print sheet has no grid cells".to_string()));
        }
        let bytes = run_blocking(move || render_cells(&cells)).await?;
        Ok(RenderArtifact::pdf(bytes, self.name()))
    }
}

/// Lays out up to four cells of text lines on a single A4 page.
pub(crate) fn render_cells(cells: &[Vec<String>]) -> Result<Vec<u8>, BackendError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = cut_guides();
    let cell_w = (A4_WIDTH_PT - 2.0 * MARGIN_X - GAP) / 2.0;
    let cell_h = (A4_HEIGHT_PT - 2.0 * MARGIN_Y - GAP) / 2.0;

    for (index, lines) in cells.iter().take(GRID_CELLS).enumerate() {
        let col = (index % 2) as f32;
        let row = (index / 2) as f32;
        let left = MARGIN_X + col * (cell_w + GAP);
        let top = A4_HEIGHT_PT - MARGIN_Y - row * (cell_h + GAP);
        operations.extend(cell_text(lines, left, top, cell_w, cell_h));
    }

    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| BackendError::Render(format!("content stream: {}", e)))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), A4_WIDTH_PT.into(), A4_HEIGHT_PT.into()],
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| BackendError::Render(format!("writing PDF: {}", e)))?;
    Ok(out)
}

fn cut_guides() -> Vec<Operation> {
    let mid_x = A4_WIDTH_PT / 2.0;
    let mid_y = A4_HEIGHT_PT / 2.0;
    vec![
        Operation::new("q", vec![]),
        Operation::new("G", vec![0.8_f32.into()]),
        Operation::new("w", vec![0.75_f32.into()]),
        Operation::new("d", vec![Object::Array(vec![3.into(), 3.into()]), 0.into()]),
        Operation::new("m", vec![0.into(), mid_y.into()]),
        Operation::new("l", vec![A4_WIDTH_PT.into(), mid_y.into()]),
        Operation::new("S", vec![]),
        Operation::new("m", vec![mid_x.into(), 0.into()]),
        Operation::new("l", vec![mid_x.into(), A4_HEIGHT_PT.into()]),
        Operation::new("S", vec![]),
        Operation::new("Q", vec![]),
    ]
}

/// Text operations for one cell. The first line is set as a title; lines
/// that would overflow the cell bottom are dropped.
fn cell_text(lines: &[String], left: f32, top: f32, width: f32, height: f32) -> Vec<Operation> {
    let mut ops = vec![Operation::new("BT", vec![])];
    let bottom = top - height + CELL_PADDING;
    let mut y = top - CELL_PADDING;
    let usable = width - 2.0 * CELL_PADDING;

    'lines: for (i, line) in lines.iter().enumerate() {
        let size = if i == 0 { TITLE_SIZE } else { BODY_SIZE };
        for wrapped in wrap(line, usable, size) {
            y -= size * LINE_SPACING;
            if y < bottom {
                break 'lines;
            }
            ops.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
            ops.push(Operation::new(
                "Tm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), (left + CELL_PADDING).into(), y.into()],
            ));
            ops.push(Operation::new(
                "Tj",
                vec![Object::String(win_ansi(&wrapped), StringFormat::Literal)],
            ));
        }
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// Greedy word wrap by estimated glyph width. Words longer than a line
/// are split.
fn wrap(line: &str, width: f32, size: f32) -> Vec<String> {
    let max_chars = ((width / (size * AVG_GLYPH_WIDTH)) as usize).max(1);
    let mut out = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            out.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > max_chars && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Encodes text for a WinAnsi Type1 font. Characters outside Latin-1 become
/// `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            0x2013 => 0x96,
            0x2014 => 0x97,
            0x2022 => 0x95,
            0x2018 => 0x91,
            0x2019 => 0x92,
            0x201c => 0x93,
            0x201d => 0x94,
            0x20ac => 0x80,
            _ => b'?',
        })
        .collect()
}
