//! Markup handling between template substitution and rendering.
//!
//! - [`extract`]: isolates the printable unit and its style block from a
//!   fully rendered template.
//! - [`grid`]: composes four copies of a unit into an A4 print sheet.
//! - [`text`]: flattens markup into plain text lines for renderers that
//!   cannot lay out HTML.
//!
//! None of this is a markup parser. Boundaries are found with narrowly
//! scoped textual rules over explicit markers, and input without the
//! markers degrades to treating the whole document as the unit.

pub mod extract;
pub mod grid;
pub mod text;

pub use extract::{NON_PRINTABLE_MARKER, UNIT_START_MARKER, extract_unit, strip_non_printable};
pub use grid::{GRID_CELLS, compose_grid};
pub use text::flatten_to_lines;

use std::ops::Range;

/// The markup of one printable instance plus the style block it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    pub markup: String,
    /// The first `<style>` element of the source document, verbatim. Empty
    /// when the document had none.
    pub style_block: String,
}

/// A complete, standalone print document holding [`GRID_CELLS`] copies of
/// one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSheet {
    markup: String,
    /// Byte ranges of each cell's inner markup, recorded at composition.
    cells: Vec<Range<usize>>,
}

impl PrintSheet {
    pub(crate) fn new(markup: String, cells: Vec<Range<usize>>) -> Self {
        Self { markup, cells }
    }

    pub fn as_str(&self) -> &str {
        &self.markup
    }

    pub fn into_string(self) -> String {
        self.markup
    }

    /// The inner markup of each grid cell, in document order.
    ///
    /// Cells are the spans written by [`compose_grid`], so a unit whose own
    /// `div`s do not balance still yields every copy.
    pub fn cells(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter_map(|span| self.markup.get(span.clone()))
            .collect()
    }
}

impl AsRef<str> for PrintSheet {
    fn as_ref(&self) -> &str {
        &self.markup
    }
}
