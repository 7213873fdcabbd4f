use super::{PrintSheet, RenderedUnit};

/// Number of unit copies on one sheet (2 columns x 2 rows).
pub const GRID_CELLS: usize = 4;

const CELL_OPEN_TAG: &str = r#"<div class="grid-item">"#;

const SHEET_STYLE: &str = r#"<style>
        @page {
            size: A4 portrait;
            margin: 0.3in 0.35in;
        }

        body {
            margin: 0;
            padding: 0;
            background: white;
        }

        .grid-container {
            width: 100%;
            display: grid;
            grid-template-columns: repeat(2, 1fr);
            grid-template-rows: repeat(2, 1fr);
            gap: 0.2in;
            page-break-inside: avoid;
        }

        .grid-item {
            display: flex;
            justify-content: center;
            align-items: center;
        }

        .grid-item .page {
            width: 3.8in !important;
            height: 5.7in !important;
            margin: 0;
            transform: scale(0.95);
            transform-origin: center center;
        }

        .cutting-guide {
            position: fixed;
            background: none;
            z-index: 1000;
            pointer-events: none;
        }

        .cutting-guide.horizontal {
            height: 0;
            width: 100%;
            left: 0;
            top: 50%;
            border-top: 1px dashed #cccccc;
        }

        .cutting-guide.vertical {
            width: 0;
            height: 100%;
            top: 0;
            left: 50%;
            border-left: 1px dashed #cccccc;
        }
    </style>"#;

/// Builds the 2x2 print sheet for `unit`.
///
/// The output depends only on the unit: the unit's style block is embedded
/// once in the head and the unit markup is copied verbatim into each cell.
pub fn compose_grid(unit: &RenderedUnit) -> PrintSheet {
    let mut out = String::with_capacity(
        SHEET_STYLE.len() + unit.style_block.len() + GRID_CELLS * (unit.markup.len() + 64) + 512,
    );

    out.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
         <title>Table Standee - 2x2 Grid</title>\n",
    );
    if !unit.style_block.is_empty() {
        out.push_str("    ");
        out.push_str(&unit.style_block);
        out.push('\n');
    }
    out.push_str("    ");
    out.push_str(SHEET_STYLE);
    out.push_str("\n</head>\n<body>\n");
    out.push_str("    <div class=\"cutting-guide horizontal\"></div>\n");
    out.push_str("    <div class=\"cutting-guide vertical\"></div>\n\n");
    out.push_str("    <div class=\"grid-container\">\n");
    let mut cells = Vec::with_capacity(GRID_CELLS);
    for _ in 0..GRID_CELLS {
        out.push_str("        ");
        out.push_str(CELL_OPEN_TAG);
        let start = out.len();
        out.push_str(&unit.markup);
        cells.push(start..out.len());
        out.push_str("</div>\n");
    }
    out.push_str("    </div>\n</body>\n</html>");

    PrintSheet::new(out, cells)
}
