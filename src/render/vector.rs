//! Direct vector drawing with `printpdf`.
//!
//! Ignores the sheet markup entirely and draws four standee units at fixed
//! positions on a blank A4 page from the listing fields, each with a QR code
//! for the listing's reference link.

use super::drawing::image::{PlacedImage, draw_image};
use super::drawing::rect::{dashed_line, fill_rect, stroke_rect};
use super::drawing::text::{TextStyle, draw_text_centered};
use super::drawing::{Canvas, Color};
use super::{A4_HEIGHT_PT, A4_WIDTH_PT, BackendError, RenderBackend, run_blocking};
use crate::code::generate_code_image;
use crate::markup::{GRID_CELLS, PrintSheet};
use async_trait::async_trait;
use printpdf::image::RawImage;
use printpdf::xobject::XObject;
use printpdf::{BuiltinFont, Mm, PdfDocument, PdfPage, PdfSaveOptions, XObjectId};
use standee_types::{ListingRecord, RenderArtifact};

const MARGIN_Y: f32 = 21.6;
const MARGIN_X: f32 = 25.2;
const GAP: f32 = 14.4;
const BAND_HEIGHT: f32 = 56.0;
const CODE_SIZE: f32 = 150.0;

const INK: Color = Color::rgb(0x1f, 0x29, 0x37);
const BRAND: Color = Color::rgb(0x1e, 0x3a, 0x8a);
const MUTED: Color = Color::rgb(0x6b, 0x72, 0x80);
const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
const GUIDE: Color = Color::rgb(0xcc, 0xcc, 0xcc);

/// The listing fields a unit shows.
#[derive(Debug, Clone)]
struct UnitContent {
    name: String,
    category: String,
    manager: String,
    short_id: String,
    reference_link: String,
}

impl From<&ListingRecord> for UnitContent {
    fn from(listing: &ListingRecord) -> Self {
        Self {
            name: listing.name.clone(),
            category: listing.category.clone(),
            manager: listing.manager_name.clone(),
            short_id: listing.short_id().to_string(),
            reference_link: listing.reference_link.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VectorBackend;

impl VectorBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RenderBackend for VectorBackend {
    fn name(&self) -> &'static str {
        "vector"
    }

    async fn render(
        &self,
        _sheet: &PrintSheet,
        listing: &ListingRecord,
    ) -> Result<RenderArtifact, BackendError> {
        let content = UnitContent::from(listing);
        let bytes = run_blocking(move || Ok(draw_sheet(&content, &listing_code))).await?;
        Ok(RenderArtifact::pdf(bytes, self.name()))
    }
}

/// Produces the code PNG for the unit at a grid index.
type CodeSource<'a> = &'a dyn Fn(usize, &str) -> Result<Vec<u8>, String>;

fn listing_code(_index: usize, link: &str) -> Result<Vec<u8>, String> {
    generate_code_image(link).map_err(|e| e.to_string())
}

/// Code images already registered with the document, keyed by PNG bytes so
/// identical units share one XObject.
#[derive(Default)]
struct CodeImages {
    registered: Vec<(Vec<u8>, PlacedImage)>,
}

impl CodeImages {
    fn place(&mut self, doc: &mut PdfDocument, png: Vec<u8>) -> Result<PlacedImage, String> {
        if let Some((_, placed)) = self.registered.iter().find(|(bytes, _)| *bytes == png) {
            return Ok(placed.clone());
        }

        let mut warnings = Vec::new();
        let raw = RawImage::decode_from_bytes(&png, &mut warnings)
            .map_err(|e| format!("Failed to decode code image: {}", e))?;
        let placed = PlacedImage {
            id: XObjectId::new(),
            width_px: raw.width as u32,
            height_px: raw.height as u32,
        };
        doc.resources
            .xobjects
            .map
            .insert(placed.id.clone(), XObject::Image(raw));
        self.registered.push((png, placed.clone()));
        Ok(placed)
    }
}

fn draw_sheet(content: &UnitContent, code_source: CodeSource<'_>) -> Vec<u8> {
    let mut doc = PdfDocument::new("Table Standee");
    let mut images = CodeImages::default();

    let mut canvas = Canvas::new(A4_HEIGHT_PT);
    let cell_w = (A4_WIDTH_PT - 2.0 * MARGIN_X - GAP) / 2.0;
    let cell_h = (A4_HEIGHT_PT - 2.0 * MARGIN_Y - GAP) / 2.0;

    for index in 0..GRID_CELLS {
        let left = MARGIN_X + (index % 2) as f32 * (cell_w + GAP);
        let top = MARGIN_Y + (index / 2) as f32 * (cell_h + GAP);

        let code = code_source(index, &content.reference_link)
            .and_then(|png| images.place(&mut doc, png));
        if let Err(e) = &code {
            log::warn!("No code image for unit {} of listing {}: {}", index + 1, content.short_id, e);
        }
        draw_unit(&mut canvas, content, code.as_ref().ok(), left, top, cell_w, cell_h);
    }

    dashed_line(&mut canvas, (0.0, A4_HEIGHT_PT / 2.0), (A4_WIDTH_PT, A4_HEIGHT_PT / 2.0), GUIDE);
    dashed_line(&mut canvas, (A4_WIDTH_PT / 2.0, 0.0), (A4_WIDTH_PT / 2.0, A4_HEIGHT_PT), GUIDE);

    doc.pages
        .push(PdfPage::new(Mm(210.0), Mm(297.0), canvas.into_ops()));
    let mut warnings = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}

/// One standee unit. A missing code image leaves its region blank.
fn draw_unit(
    canvas: &mut Canvas,
    content: &UnitContent,
    code: Option<&PlacedImage>,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
) {
    stroke_rect(canvas, left, top, width, height, BRAND, 1.5);
    fill_rect(canvas, left, top, width, BAND_HEIGHT, BRAND);

    let inner = width - 24.0;
    let inner_left = left + 12.0;
    let title = TextStyle { size: 16.0, font: BuiltinFont::HelveticaBold, color: WHITE };
    let body = TextStyle { size: 11.0, font: BuiltinFont::Helvetica, color: INK };
    let caption = TextStyle { size: 9.0, font: BuiltinFont::Helvetica, color: MUTED };

    draw_text_centered(canvas, &content.name, inner_left, inner, top + (BAND_HEIGHT - 16.0) / 2.0, title);

    let mut y = top + BAND_HEIGHT + 14.0;
    if !content.category.is_empty() {
        draw_text_centered(canvas, &content.category, inner_left, inner, y, body);
        y += 18.0;
    }
    if !content.manager.is_empty() {
        let manager = format!("Managed by {}", content.manager);
        draw_text_centered(canvas, &manager, inner_left, inner, y, caption);
        y += 16.0;
    }

    let code_top = y + 8.0;
    let code_size = CODE_SIZE.min(width - 60.0);
    match code {
        Some(image) => {
            let code_left = left + (width - code_size) / 2.0;
            draw_image(canvas, image, code_left, code_top, code_size, code_size);
            draw_text_centered(canvas, "Scan to explore", inner_left, inner, code_top + code_size + 8.0, body);
        }
        None => log::debug!("Code region omitted for unit at ({:.0}, {:.0})", left, top),
    }

    let id_line = format!("ID: {}", content.short_id);
    draw_text_centered(canvas, &id_line, inner_left, inner, top + height - 20.0, caption);
}
