//! Signature block closing the report

use crate::config::rgb;
use crate::layout::PageFlow;
use crate::schema::IssuerProfile;
use crate::Result;
use pdf_core::{fit_centered, Align, FontWeight, ImageScaleMode, ImageXObject};

pub(crate) const INSPECTOR_FALLBACK: &str = "Inspector";

/// Distance from the block top to the signature rule
const RULE_OFFSET: f64 = 45.0;
const SIGNATURE_WIDTH: f64 = 120.0;
const SIGNATURE_HEIGHT: f64 = 36.0;

/// Signature rule, optional signature image, inspector name and company
///
/// Starts a new page first when the block does not fit.
pub fn render(
    flow: &mut PageFlow<'_>,
    issuer: &IssuerProfile,
    signature: Option<&ImageXObject>,
) -> Result<()> {
    let config = flow.config();
    flow.ensure_space(config.signature_block_height)?;

    let page = flow.page();
    let left = config.margin_left;
    let line_y = flow.cursor_y() + RULE_OFFSET;
    let canvas = flow.canvas_mut();

    canvas.set_draw_color(rgb(config.signature_line_color));
    canvas.set_line_width(1.0);
    canvas.draw_line(page, left, line_y, left + config.signature_line_width, line_y)?;

    if let Some(image) = signature {
        let (x, y, w, h) = fit_centered(
            image.width,
            image.height,
            left + 4.0,
            line_y - SIGNATURE_HEIGHT - 6.0,
            SIGNATURE_WIDTH,
            SIGNATURE_HEIGHT,
        );
        canvas.insert_image(image, page, x, y, w, h, ImageScaleMode::Stretch)?;
    }

    canvas.set_text_color(rgb(config.primary_color));
    canvas.set_font(FontWeight::Regular, config.body_font_size);
    let name = issuer.inspector().unwrap_or(INSPECTOR_FALLBACK);
    canvas.insert_text(name, page, left, line_y + 14.0, Align::Left)?;
    if let Some(company) = issuer.company() {
        canvas.insert_text(company, page, left, line_y + 28.0, Align::Left)?;
    }

    flow.advance(config.signature_block_height);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::header::HeaderBand;
    use crate::layout::CancellationToken;
    use pdf_core::DrawOp;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_block_layout() {
        let config = LayoutConfig::default();
        let issuer = IssuerProfile {
            company_name: Some("Acme Motors".to_string()),
            inspector_name: Some("Jane Doe".to_string()),
            ..IssuerProfile::default()
        };
        let token = CancellationToken::new();
        let mut flow =
            PageFlow::begin(&config, HeaderBand::new(&issuer, None, &config), &token).unwrap();
        flow.move_to(400.0);
        let before = flow.canvas().page_ops(1).unwrap().len();

        render(&mut flow, &issuer, None).unwrap();

        let ops = &flow.canvas().page_ops(1).unwrap()[before..];
        assert!(matches!(
            ops[0],
            DrawOp::Line { x1, y1, x2, .. } if x1 == 30.0 && y1 == 445.0 && x2 == 230.0
        ));
        let texts: Vec<&str> = ops.iter().filter_map(DrawOp::text).collect();
        assert_eq!(texts, vec!["Jane Doe", "Acme Motors"]);
        assert_eq!(flow.cursor_y(), 475.0);
    }

    #[test]
    fn test_fallback_name_and_page_break() {
        let config = LayoutConfig::default();
        let issuer = IssuerProfile::default();
        let token = CancellationToken::new();
        let mut flow =
            PageFlow::begin(&config, HeaderBand::new(&issuer, None, &config), &token).unwrap();
        flow.move_to(760.0);

        render(&mut flow, &issuer, None).unwrap();

        assert_eq!(flow.page(), 2);
        let texts: Vec<&str> = flow
            .canvas()
            .page_ops(2)
            .unwrap()
            .iter()
            .filter_map(DrawOp::text)
            .collect();
        assert!(texts.contains(&INSPECTOR_FALLBACK));
    }

    #[test]
    fn test_blank_names_are_not_drawn() {
        let config = LayoutConfig::default();
        let issuer = IssuerProfile {
            company_name: Some("  ".to_string()),
            inspector_name: Some(String::new()),
            ..IssuerProfile::default()
        };
        let token = CancellationToken::new();
        let mut flow =
            PageFlow::begin(&config, HeaderBand::new(&issuer, None, &config), &token).unwrap();
        flow.move_to(400.0);
        let before = flow.canvas().page_ops(1).unwrap().len();

        render(&mut flow, &issuer, None).unwrap();

        let texts: Vec<&str> = flow.canvas().page_ops(1).unwrap()[before..]
            .iter()
            .filter_map(DrawOp::text)
            .collect();
        assert_eq!(texts, vec![INSPECTOR_FALLBACK]);
    }

    #[test]
    fn test_signature_image_sits_above_rule() {
        let config = LayoutConfig::default();
        let issuer = IssuerProfile::default();
        let signature = ImageXObject {
            width: 300,
            height: 90,
            color_space: "DeviceGray".to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data: vec![7; 3],
        };
        let token = CancellationToken::new();
        let mut flow =
            PageFlow::begin(&config, HeaderBand::new(&issuer, None, &config), &token).unwrap();
        flow.move_to(400.0);

        render(&mut flow, &issuer, Some(&signature)).unwrap();

        let bottom = flow
            .canvas()
            .page_ops(1)
            .unwrap()
            .iter()
            .find(|op| matches!(op, DrawOp::Image { .. }))
            .map(DrawOp::bottom)
            .unwrap();
        assert!(bottom <= 445.0);
    }
}
