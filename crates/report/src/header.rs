//! Page frame and header band

use crate::config::{rgb, LayoutConfig};
use crate::schema::IssuerProfile;
use crate::Result;
use pdf_core::{fit_centered, Align, Color, FontWeight, ImageScaleMode, ImageXObject, PdfDocument, RectStyle};

const COMPANY_FALLBACK: &str = "Company Name";

const LOGO_BOX_WIDTH: f64 = 68.0;
const LOGO_BOX_HEIGHT: f64 = 52.0;
const LOGO_BOX_RADIUS: f64 = 8.0;
const LOGO_PADDING: f64 = 4.0;

/// Branding drawn at the top of every page
pub struct HeaderBand<'a> {
    issuer: &'a IssuerProfile,
    logo: Option<&'a ImageXObject>,
    config: &'a LayoutConfig,
}

impl<'a> HeaderBand<'a> {
    pub fn new(issuer: &'a IssuerProfile, logo: Option<&'a ImageXObject>, config: &'a LayoutConfig) -> Self {
        Self {
            issuer,
            logo,
            config,
        }
    }

    /// Paint the page background, frame and header band on `page`
    pub fn draw(&self, canvas: &mut PdfDocument, page: usize) -> Result<()> {
        let config = self.config;
        let width = config.page_width;
        let height = config.page_height;
        let primary = rgb(config.primary_color);

        canvas.set_fill_color(Color::white());
        canvas.draw_rect(page, 0.0, 0.0, width, height, RectStyle::Fill)?;

        canvas.set_draw_color(primary);
        canvas.set_line_width(config.frame_line_width);
        let inset = config.frame_inset;
        canvas.draw_rounded_rect(
            page,
            inset,
            inset,
            width - 2.0 * inset,
            height - 2.0 * inset,
            config.frame_radius,
            RectStyle::Stroke,
        )?;

        let band = config.band_inset;
        canvas.set_fill_color(primary);
        canvas.draw_rect(page, band, band, width - 2.0 * band, config.band_height, RectStyle::Fill)?;

        let text_x = band + 12.0;
        canvas.set_text_color(Color::white());
        canvas.set_font(FontWeight::Bold, config.company_font_size);
        let company = self.issuer.company().unwrap_or(COMPANY_FALLBACK);
        canvas.insert_text(company, page, text_x, band + 32.0, Align::Left)?;

        if let Some(logo) = self.logo {
            self.draw_logo(canvas, page, logo)?;
        }

        canvas.set_font(FontWeight::Regular, config.header_font_size);
        let line_height = config.header_font_size as f64;
        if let Some(address) = self.issuer.company_address.as_deref() {
            let lines = canvas.wrap_text(address, width - 180.0);
            for (i, line) in lines.iter().take(config.address_max_lines).enumerate() {
                canvas.insert_text(line, page, text_x, band + 48.0 + i as f64 * line_height, Align::Left)?;
            }
        }

        let contact = format!(
            "Inspector: {} | WhatsApp: {}",
            self.issuer.inspector().unwrap_or(""),
            self.issuer.contact_phone.as_deref().unwrap_or("")
        );
        canvas.insert_text(&contact, page, text_x, band + config.band_height - 10.0, Align::Left)?;

        Ok(())
    }

    /// White rounded box at the right of the band holding the logo
    fn draw_logo(&self, canvas: &mut PdfDocument, page: usize, logo: &ImageXObject) -> Result<()> {
        let box_x = self.config.page_width - self.config.band_inset - 16.0 - LOGO_BOX_WIDTH;
        let box_y = self.config.band_inset + 10.0;

        canvas.set_fill_color(Color::white());
        canvas.set_draw_color(Color::white());
        canvas.draw_rounded_rect(
            page,
            box_x,
            box_y,
            LOGO_BOX_WIDTH,
            LOGO_BOX_HEIGHT,
            LOGO_BOX_RADIUS,
            RectStyle::FillStroke,
        )?;

        let (x, y, w, h) = fit_centered(
            logo.width,
            logo.height,
            box_x + LOGO_PADDING,
            box_y + LOGO_PADDING,
            LOGO_BOX_WIDTH - 2.0 * LOGO_PADDING,
            LOGO_BOX_HEIGHT - 2.0 * LOGO_PADDING,
        );
        canvas.insert_image(logo, page, x, y, w, h, ImageScaleMode::Stretch)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_core::DrawOp;

    fn issuer() -> IssuerProfile {
        IssuerProfile {
            company_name: Some("Acme Motors".to_string()),
            company_address: Some(
                "Plot 14, Industrial Layout, Opposite the Old Market Road, Ikeja, Lagos State, Nigeria, West Africa"
                    .to_string(),
            ),
            inspector_name: Some("Jane Doe".to_string()),
            contact_phone: Some("0800 000 0000".to_string()),
            ..IssuerProfile::default()
        }
    }

    fn texts(canvas: &PdfDocument, page: usize) -> Vec<String> {
        canvas
            .page_ops(page)
            .unwrap()
            .iter()
            .filter_map(DrawOp::text)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_header_text() {
        let config = LayoutConfig::default();
        let issuer = issuer();
        let mut canvas = PdfDocument::new();
        let page = canvas.add_blank_page().unwrap();

        HeaderBand::new(&issuer, None, &config).draw(&mut canvas, page).unwrap();

        let texts = texts(&canvas, page);
        assert_eq!(texts[0], "Acme Motors");
        assert_eq!(
            texts.last().unwrap(),
            "Inspector: Jane Doe | WhatsApp: 0800 000 0000"
        );
        // Company name, at most two address lines, contact line
        assert!(texts.len() <= 4);
    }

    #[test]
    fn test_company_fallback_and_no_logo() {
        let config = LayoutConfig::default();
        let issuer = IssuerProfile::default();
        let mut canvas = PdfDocument::new();
        let page = canvas.add_blank_page().unwrap();

        HeaderBand::new(&issuer, None, &config).draw(&mut canvas, page).unwrap();

        let ops = canvas.page_ops(page).unwrap();
        assert_eq!(ops.iter().filter_map(DrawOp::text).next(), Some(COMPANY_FALLBACK));
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::Image { .. })));
    }

    #[test]
    fn test_blank_company_name_uses_fallback() {
        let config = LayoutConfig::default();
        let issuer = IssuerProfile {
            company_name: Some(String::new()),
            ..IssuerProfile::default()
        };
        let mut canvas = PdfDocument::new();
        let page = canvas.add_blank_page().unwrap();

        HeaderBand::new(&issuer, None, &config).draw(&mut canvas, page).unwrap();

        let texts = texts(&canvas, page);
        assert_eq!(texts[0], COMPANY_FALLBACK);
        assert!(!texts.iter().any(String::is_empty));
    }

    #[test]
    fn test_logo_is_fitted_inside_box() {
        let config = LayoutConfig::default();
        let issuer = issuer();
        let logo = ImageXObject {
            width: 200,
            height: 100,
            color_space: "DeviceGray".to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data: vec![0; 4],
        };
        let mut canvas = PdfDocument::new();
        let page = canvas.add_blank_page().unwrap();

        HeaderBand::new(&issuer, Some(&logo), &config).draw(&mut canvas, page).unwrap();

        let image = canvas
            .page_ops(page)
            .unwrap()
            .iter()
            .find_map(|op| match op {
                DrawOp::Image { x, y, width, height, .. } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .unwrap();
        // 60x44 box at (W-108, 42): a 2:1 logo becomes 60x30, centred vertically
        assert!((image.0 - (config.page_width - 108.0)).abs() < 1e-9);
        assert!((image.1 - 49.0).abs() < 1e-9);
        assert!((image.2 - 60.0).abs() < 1e-9);
        assert!((image.3 - 30.0).abs() < 1e-9);
    }
}
