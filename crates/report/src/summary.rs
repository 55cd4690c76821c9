//! Vehicle summary and recommendation sections

use crate::config::rgb;
use crate::layout::PageFlow;
use crate::schema::InspectionReport;
use crate::Result;
use pdf_core::{Align, FontWeight};

pub(crate) const REPORT_TITLE: &str = "Pre-Purchase Vehicle Inspection Report";
pub(crate) const RECOMMENDATION_HEADING: &str = "Recommendation";
pub(crate) const NO_RECOMMENDATION: &str = "No recommendation provided.";
const MISSING: &str = "-";

/// Title and vehicle details on page 1, leaving the cursor at the table start
pub fn render_summary(flow: &mut PageFlow<'_>, report: &InspectionReport) -> Result<()> {
    let config = flow.config();
    let page = flow.page();
    let left = config.margin_left;
    let right = config.summary_second_column_x;
    let top = flow.cursor_y();
    let spacing = config.summary_line_spacing;

    let date = report
        .inspected_at
        .map(|at| at.format(&config.date_format).to_string());
    let mileage = report.mileage.as_deref().map(|m| format!("{m} km"));
    let verdict = report.overall_verdict.to_string();

    let canvas = flow.canvas_mut();
    canvas.set_text_color(rgb(config.primary_color));
    canvas.set_font(FontWeight::Bold, config.title_font_size);
    canvas.insert_text(REPORT_TITLE, page, left, top + 4.0, Align::Left)?;

    canvas.set_font(FontWeight::Regular, config.body_font_size);
    let first = top + 20.0;
    let lines: [(f64, usize, &str, Option<&str>); 8] = [
        (left, 0, "Date", date.as_deref()),
        (left, 1, "Vehicle", report.vehicle_label.as_deref()),
        (left, 2, "Registration", report.vehicle_registration.as_deref()),
        (left, 3, "VIN", report.vin.as_deref()),
        (right, 3, "Mileage", mileage.as_deref()),
        (left, 4, "Transmission", report.transmission.as_deref()),
        (right, 4, "Fuel Type", report.fuel_type.as_deref()),
        (left, 5, "Overall Verdict", Some(verdict.as_str())),
    ];
    for (x, row, label, value) in lines {
        let text = format!("{label}: {}", value.unwrap_or(MISSING));
        canvas.insert_text(&text, page, x, first + row as f64 * spacing, Align::Left)?;
    }

    flow.move_to(config.table_start_y.max(first + 5.0 * spacing));
    Ok(())
}

/// Heading and wrapped paragraph, continuing on new pages line by line
pub fn render_recommendation(flow: &mut PageFlow<'_>, text: &str) -> Result<()> {
    let config = flow.config();
    let line_height = config.recommendation_line_height;
    let first_gap = config.recommendation_heading_gap;
    let body = if text.trim().is_empty() {
        NO_RECOMMENDATION
    } else {
        text
    };

    flow.canvas_mut()
        .set_font(FontWeight::Regular, config.body_font_size);
    let lines = flow
        .canvas()
        .wrap_text(body, config.content_width() - 10.0);

    // Keep the heading with the first line
    flow.ensure_space(config.recommendation_gap + first_gap)?;
    flow.advance(config.recommendation_gap);

    let page = flow.page();
    let y = flow.cursor_y();
    let canvas = flow.canvas_mut();
    canvas.set_text_color(rgb(config.primary_color));
    canvas.set_font(FontWeight::Bold, config.section_heading_font_size);
    canvas.insert_text(RECOMMENDATION_HEADING, page, config.margin_left, y, Align::Left)?;

    let mut gap = first_gap;
    for line in &lines {
        if !flow.fits(gap) {
            flow.new_page()?;
            gap = line_height;
        }
        flow.advance(gap);

        let page = flow.page();
        let y = flow.cursor_y();
        let canvas = flow.canvas_mut();
        canvas.set_text_color(rgb(config.body_text_color));
        canvas.set_font(FontWeight::Regular, config.body_font_size);
        canvas.insert_text(line, page, config.margin_left, y, Align::Left)?;

        gap = line_height;
    }

    // Room for descenders below the last baseline
    let tail = line_height.min(config.content_bottom() - flow.cursor_y());
    flow.advance(tail.max(0.0));
    Ok(())
}
