//! Layout configuration

use crate::schema::StatusVocabulary;
use crate::{ReportError, Result};
use pdf_core::{Color, A4_HEIGHT, A4_WIDTH};
use serde::{Deserialize, Serialize};

/// Photos laid out per report
pub const DEFAULT_MAX_IMAGES: usize = 10;

/// Page geometry, colours and section metrics of the report
///
/// All distances are in points, with y measured from the page top. Colours are
/// 0-255 RGB triples. Every field has a default, so a JSON document only needs
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,

    /// Left edge of body content
    pub margin_left: f64,
    pub margin_right: f64,
    /// First y available to body content below the header band
    pub content_top: f64,
    /// Distance from the page bottom that content must stay above
    pub bottom_margin: f64,

    pub frame_inset: f64,
    pub frame_radius: f64,
    pub frame_line_width: f64,
    pub band_inset: f64,
    pub band_height: f64,
    pub company_font_size: f32,
    pub header_font_size: f32,
    /// Address lines printed in the band
    pub address_max_lines: usize,

    pub primary_color: [u8; 3],
    pub body_text_color: [u8; 3],
    pub muted_color: [u8; 3],
    pub error_color: [u8; 3],

    pub title_font_size: f32,
    pub body_font_size: f32,
    pub section_heading_font_size: f32,
    /// Spacing between summary lines
    pub summary_line_spacing: f64,
    /// X of the right-hand summary column
    pub summary_second_column_x: f64,
    /// Chrono format string for the inspection date
    pub date_format: String,

    pub table_start_y: f64,
    pub table_font_size: f32,
    pub table_cell_padding: f64,
    pub table_line_height: f64,
    pub section_column_width: f64,
    pub item_column_width: f64,
    pub status_column_width: f64,
    pub table_text_color: [u8; 3],
    pub alternate_row_color: [u8; 3],

    /// Gap between the table and the recommendation heading
    pub recommendation_gap: f64,
    /// Gap between the recommendation heading and its first line
    pub recommendation_heading_gap: f64,
    pub recommendation_line_height: f64,

    pub card_width: f64,
    pub card_height: f64,
    pub card_gap_x: f64,
    pub card_gap_y: f64,
    pub card_inset: f64,
    pub card_radius: f64,
    pub card_border_color: [u8; 3],
    /// Space reserved above the first gallery row for its heading
    pub gallery_heading_height: f64,

    pub signature_block_height: f64,
    pub signature_line_width: f64,
    pub signature_line_color: [u8; 3],

    pub watermark_font_size: f32,
    pub watermark_color: [u8; 3],
    pub watermark_opacity: f32,
    /// Counter-clockwise degrees; negative values slope the text downward
    pub watermark_angle: f64,

    pub max_images: usize,
    pub status_vocabulary: StatusVocabulary,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin_left: 30.0,
            margin_right: 30.0,
            content_top: 130.0,
            bottom_margin: 40.0,
            frame_inset: 20.0,
            frame_radius: 10.0,
            frame_line_width: 1.2,
            band_inset: 28.0,
            band_height: 82.0,
            company_font_size: 20.0,
            header_font_size: 10.0,
            address_max_lines: 2,
            primary_color: [20, 48, 95],
            body_text_color: [60, 72, 94],
            muted_color: [130, 140, 168],
            error_color: [180, 0, 0],
            title_font_size: 16.0,
            body_font_size: 10.0,
            section_heading_font_size: 11.0,
            summary_line_spacing: 14.0,
            summary_second_column_x: 250.0,
            date_format: "%d %b %Y, %H:%M UTC".to_string(),
            table_start_y: 236.0,
            table_font_size: 8.5,
            table_cell_padding: 5.5,
            table_line_height: 1.15,
            section_column_width: 130.0,
            item_column_width: 130.0,
            status_column_width: 85.0,
            table_text_color: [33, 37, 41],
            alternate_row_color: [250, 252, 255],
            recommendation_gap: 16.0,
            recommendation_heading_gap: 15.0,
            recommendation_line_height: 12.0,
            card_width: 250.0,
            card_height: 150.0,
            card_gap_x: 18.0,
            card_gap_y: 22.0,
            card_inset: 6.0,
            card_radius: 8.0,
            card_border_color: [216, 224, 240],
            gallery_heading_height: 18.0,
            signature_block_height: 75.0,
            signature_line_width: 200.0,
            signature_line_color: [130, 140, 168],
            watermark_font_size: 52.0,
            watermark_color: [221, 230, 244],
            watermark_opacity: 0.35,
            watermark_angle: -30.0,
            max_images: DEFAULT_MAX_IMAGES,
            status_vocabulary: StatusVocabulary::Standard,
        }
    }
}

impl LayoutConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the geometry leaves room for every section
    pub fn validate(&self) -> Result<()> {
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(ReportError::Config("page size must be positive".to_string()));
        }
        if self.content_top >= self.content_bottom() {
            return Err(ReportError::Config(
                "content top must be above the bottom margin".to_string(),
            ));
        }
        if self.comments_column_width() <= 2.0 * self.table_cell_padding {
            return Err(ReportError::Config(
                "table columns leave no room for comments".to_string(),
            ));
        }
        if self.margin_left + 2.0 * self.card_width + self.card_gap_x > self.page_width {
            return Err(ReportError::Config(
                "two gallery cards do not fit across the page".to_string(),
            ));
        }
        let usable = self.content_bottom() - self.content_top;
        if self.gallery_heading_height + self.card_height + self.card_gap_y > usable
            || self.signature_block_height > usable
        {
            return Err(ReportError::Config(
                "sections do not fit on an empty page".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.watermark_opacity) {
            return Err(ReportError::Config(
                "watermark opacity must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Lowest y content may reach
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.bottom_margin
    }

    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Width left for the comments column
    pub fn comments_column_width(&self) -> f64 {
        self.content_width()
            - self.section_column_width
            - self.item_column_width
            - self.status_column_width
    }

    /// Column widths in display order
    pub fn column_widths(&self) -> [f64; 4] {
        [
            self.section_column_width,
            self.item_column_width,
            self.status_column_width,
            self.comments_column_width(),
        ]
    }

    /// Height of a table row whose tallest cell has `lines` lines
    pub fn table_row_height(&self, lines: usize) -> f64 {
        lines.max(1) as f64 * self.table_font_size as f64 * self.table_line_height
            + 2.0 * self.table_cell_padding
    }

    /// Single-line body rows that fit below a table header drawn at `start_y`
    pub fn rows_fitting(&self, start_y: f64) -> usize {
        let row_height = self.table_row_height(1);
        let bottom = self.content_bottom();
        let mut y = start_y + row_height;
        let mut rows = 0;
        while y + row_height <= bottom {
            y += row_height;
            rows += 1;
        }
        rows
    }

    /// Pages touched by a table of `rows` single-line rows
    pub fn table_pages(&self, rows: usize) -> usize {
        let first = self.rows_fitting(self.table_start_y);
        if rows <= first {
            return 1;
        }
        let per_page = self.rows_fitting(self.content_top).max(1);
        1 + (rows - first).div_ceil(per_page)
    }

    /// Gallery rows that fit on a page with nothing else on it
    pub fn card_rows_per_page(&self) -> usize {
        let pitch = self.card_height + self.card_gap_y;
        let mut y = self.content_top + self.gallery_heading_height;
        let mut rows = 0;
        while y + pitch <= self.content_bottom() {
            y += pitch;
            rows += 1;
        }
        rows
    }
}

/// Convert a 0-255 triple to a canvas color
pub(crate) fn rgb(color: [u8; 3]) -> Color {
    Color::from_rgb(color[0], color[1], color[2])
}
