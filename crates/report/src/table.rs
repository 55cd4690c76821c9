//! Checklist table flowing across pages

use crate::config::{rgb, LayoutConfig};
use crate::layout::PageFlow;
use crate::schema::{ChecklistItem, ChecklistStatus};
use crate::Result;
use pdf_core::{Align, Color, FontWeight, PdfDocument, RectStyle};

pub(crate) const TABLE_HEADINGS: [&str; 4] = ["Section", "Inspection Item", "Status", "Comments"];

/// Share of the font size from the top of a text line to its baseline
const ASCENT_RATIO: f64 = 0.8;

/// Text color of a status cell
pub fn status_color(status: ChecklistStatus) -> Color {
    match status {
        ChecklistStatus::Good | ChecklistStatus::Ok => Color::from_rgb(22, 128, 61),
        ChecklistStatus::NeedsAttention => Color::from_rgb(183, 121, 31),
        ChecklistStatus::Poor => Color::from_rgb(180, 0, 0),
        ChecklistStatus::NotApplicable => Color::from_rgb(110, 118, 135),
    }
}

/// A row with its cells already wrapped
struct PreparedRow {
    cells: [Vec<String>; 4],
    status: Option<ChecklistStatus>,
    height: f64,
}

impl PreparedRow {
    fn line_count(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Keep the first `lines` lines of every cell and return the rest as a
    /// continuation row with the same status
    fn split_off(&mut self, lines: usize, config: &LayoutConfig) -> PreparedRow {
        let mut rest: [Vec<String>; 4] = Default::default();
        for (cell, tail) in self.cells.iter_mut().zip(rest.iter_mut()) {
            if cell.len() > lines {
                *tail = cell.split_off(lines);
            }
        }
        self.height = config.table_row_height(self.line_count());

        let rest_lines = rest.iter().map(Vec::len).max().unwrap_or(0);
        PreparedRow {
            cells: rest,
            status: self.status,
            height: config.table_row_height(rest_lines),
        }
    }
}

/// Draw the table from the cursor down, repeating the header on every page
///
/// Rows keep their input order. An empty checklist draws the header only.
/// A row taller than an empty page is split between lines and continues
/// below the repeated header.
pub fn render(flow: &mut PageFlow<'_>, items: &[ChecklistItem]) -> Result<()> {
    let config = flow.config();

    let header = prepare_header(flow.canvas_mut(), config);
    let rows: Vec<PreparedRow> = items
        .iter()
        .map(|item| prepare_row(flow.canvas_mut(), config, item))
        .collect();
    let page_room = config.content_bottom() - config.content_top - header.height;

    // Never leave the header alone at the bottom of a page
    let first_height = rows.first().map_or(0.0, |row| {
        if row.height > page_room {
            config.table_row_height(1)
        } else {
            row.height
        }
    });
    flow.ensure_space(header.height + first_height)?;
    draw_row(flow, &header, None)?;

    for (index, mut row) in rows.into_iter().enumerate() {
        let fill = (index % 2 == 1).then(|| rgb(config.alternate_row_color));
        let mut fresh_page = false;

        loop {
            if flow.fits(row.height) || (fresh_page && row.height <= page_room) {
                draw_row(flow, &row, fill)?;
                break;
            }

            if row.height > page_room {
                let total = row.line_count();
                let mut lines = 0;
                while lines < total && flow.fits(config.table_row_height(lines + 1)) {
                    lines += 1;
                }
                if fresh_page {
                    lines = lines.max(1);
                }
                if lines >= total {
                    draw_row(flow, &row, fill)?;
                    break;
                }
                if lines > 0 {
                    let rest = row.split_off(lines, config);
                    draw_row(flow, &row, fill)?;
                    row = rest;
                }
            }

            flow.new_page()?;
            draw_row(flow, &header, None)?;
            fresh_page = true;
        }
    }

    Ok(())
}

fn prepare_header(canvas: &mut PdfDocument, config: &LayoutConfig) -> PreparedRow {
    canvas.set_font(FontWeight::Bold, config.table_font_size);
    let texts = TABLE_HEADINGS.map(str::to_string);
    wrap_cells(canvas, config, texts, None)
}

fn prepare_row(canvas: &mut PdfDocument, config: &LayoutConfig, item: &ChecklistItem) -> PreparedRow {
    canvas.set_font(FontWeight::Regular, config.table_font_size);
    let note = if item.note.trim().is_empty() {
        "-".to_string()
    } else {
        item.note.clone()
    };
    let texts = [
        item.section.clone(),
        item.label.clone(),
        item.status.label().to_string(),
        note,
    ];
    wrap_cells(canvas, config, texts, Some(item.status))
}

fn wrap_cells(
    canvas: &PdfDocument,
    config: &LayoutConfig,
    texts: [String; 4],
    status: Option<ChecklistStatus>,
) -> PreparedRow {
    let widths = config.column_widths();
    let padding = config.table_cell_padding;

    let mut cells: [Vec<String>; 4] = Default::default();
    for (i, text) in texts.iter().enumerate() {
        cells[i] = canvas.wrap_text(text, widths[i] - 2.0 * padding);
    }

    let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
    PreparedRow {
        cells,
        status,
        height: config.table_row_height(lines),
    }
}

/// Draw one row at the cursor and advance past it; `status == None` marks the header
fn draw_row(flow: &mut PageFlow<'_>, row: &PreparedRow, fill: Option<Color>) -> Result<()> {
    let config = flow.config();
    let page = flow.page();
    let top = flow.cursor_y();
    let widths = config.column_widths();
    let padding = config.table_cell_padding;
    let font_size = config.table_font_size as f64;
    let line_step = font_size * config.table_line_height;
    let is_header = row.status.is_none();

    let canvas = flow.canvas_mut();
    let background = if is_header {
        Some(rgb(config.primary_color))
    } else {
        fill
    };
    if let Some(color) = background {
        canvas.set_fill_color(color);
        canvas.draw_rect(
            page,
            config.margin_left,
            top,
            config.content_width(),
            row.height,
            RectStyle::Fill,
        )?;
    }

    let weight = if is_header {
        FontWeight::Bold
    } else {
        FontWeight::Regular
    };
    canvas.set_font(weight, config.table_font_size);

    let mut x = config.margin_left;
    for (column, lines) in row.cells.iter().enumerate() {
        let color = match (is_header, column, row.status) {
            (true, _, _) => Color::white(),
            (false, 2, Some(status)) => status_color(status),
            _ => rgb(config.table_text_color),
        };
        canvas.set_text_color(color);

        for (i, line) in lines.iter().enumerate() {
            let baseline = top + padding + font_size * ASCENT_RATIO + i as f64 * line_step;
            canvas.insert_text(line, page, x + padding, baseline, Align::Left)?;
        }
        x += widths[column];
    }

    flow.advance(row.height);
    Ok(())
}
