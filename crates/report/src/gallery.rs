//! Two-column photo gallery

use crate::assets::ImagePlacementError;
use crate::config::rgb;
use crate::layout::PageFlow;
use crate::Result;
use pdf_core::{fit_centered, Align, FontWeight, ImageScaleMode, ImageXObject, RectStyle};

pub(crate) const GALLERY_HEADING: &str = "Inspection Image Attachments";
pub(crate) const IMAGE_UNAVAILABLE: &str = "Image preview unavailable";

const COLUMNS: usize = 2;

/// Lay photos out in rows of two cards
///
/// Nothing is drawn when there are no photos. The heading stays on the same
/// page as the first row. A failed photo still gets its card, with a notice
/// in place of the picture.
pub fn render(
    flow: &mut PageFlow<'_>,
    photos: &[std::result::Result<ImageXObject, ImagePlacementError>],
) -> Result<()> {
    if photos.is_empty() {
        return Ok(());
    }

    let config = flow.config();
    let pitch = config.card_height + config.card_gap_y;

    for (row_index, row) in photos.chunks(COLUMNS).enumerate() {
        let first_row = row_index == 0;
        let heading = if first_row {
            config.gallery_heading_height
        } else {
            0.0
        };
        flow.ensure_space(heading + pitch)?;

        if first_row {
            let page = flow.page();
            let y = flow.cursor_y() + heading - 10.0;
            let canvas = flow.canvas_mut();
            canvas.set_text_color(rgb(config.primary_color));
            canvas.set_font(FontWeight::Bold, config.section_heading_font_size);
            canvas.insert_text(GALLERY_HEADING, page, config.margin_left, y, Align::Left)?;
            flow.advance(heading);
        }

        for (column, photo) in row.iter().enumerate() {
            let x = config.margin_left + column as f64 * (config.card_width + config.card_gap_x);
            draw_card(flow, x, photo)?;
        }

        flow.advance(pitch);
    }

    Ok(())
}

fn draw_card(
    flow: &mut PageFlow<'_>,
    x: f64,
    photo: &std::result::Result<ImageXObject, ImagePlacementError>,
) -> Result<()> {
    let config = flow.config();
    let page = flow.page();
    let y = flow.cursor_y();
    let canvas = flow.canvas_mut();

    canvas.set_draw_color(rgb(config.card_border_color));
    canvas.set_line_width(1.0);
    canvas.draw_rounded_rect(
        page,
        x,
        y,
        config.card_width,
        config.card_height,
        config.card_radius,
        RectStyle::Stroke,
    )?;

    match photo {
        Ok(image) => {
            let inset = config.card_inset;
            let (ix, iy, iw, ih) = fit_centered(
                image.width,
                image.height,
                x + inset,
                y + inset,
                config.card_width - 2.0 * inset,
                config.card_height - 2.0 * inset,
            );
            canvas.insert_image(image, page, ix, iy, iw, ih, ImageScaleMode::Stretch)?;
        }
        Err(_) => {
            canvas.set_text_color(rgb(config.error_color));
            canvas.set_font(FontWeight::Regular, config.body_font_size);
            canvas.insert_text(IMAGE_UNAVAILABLE, page, x + 10.0, y + 20.0, Align::Left)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::header::HeaderBand;
    use crate::layout::CancellationToken;
    use crate::schema::IssuerProfile;
    use pdf_core::DrawOp;
    use pretty_assertions::assert_eq;

    fn photo(width: u32, height: u32) -> std::result::Result<ImageXObject, ImagePlacementError> {
        Ok(ImageXObject {
            width,
            height,
            color_space: "DeviceGray".to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data: vec![width as u8, height as u8],
        })
    }

    fn cards(flow: &PageFlow<'_>, page: usize) -> Vec<(f64, f64)> {
        let config = flow.config();
        flow.canvas()
            .page_ops(page)
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { x, y, width, height, .. }
                    if *width == config.card_width && *height == config.card_height =>
                {
                    Some((*x, *y))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_no_photos_draws_nothing() {
        let config = LayoutConfig::default();
        let issuer = IssuerProfile::default();
        let token = CancellationToken::new();
        let mut flow =
            PageFlow::begin(&config, HeaderBand::new(&issuer, None, &config), &token).unwrap();
        let before = flow.canvas().page_ops(1).unwrap().len();
        let cursor = flow.cursor_y();

        render(&mut flow, &[]).unwrap();

        assert_eq!(flow.canvas().page_ops(1).unwrap().len(), before);
        assert_eq!(flow.cursor_y(), cursor);
    }

    #[test]
    fn test_odd_count_leaves_second_slot_empty() {
        let config = LayoutConfig::default();
        let issuer = IssuerProfile::default();
        let token = CancellationToken::new();
        let mut flow =
            PageFlow::begin(&config, HeaderBand::new(&issuer, None, &config), &token).unwrap();

        render(&mut flow, &[photo(10, 10), photo(20, 10), photo(30, 10)]).unwrap();

        let cards = cards(&flow, 1);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].1, cards[1].1);
        assert_eq!(cards[2].0, config.margin_left);
        assert!(cards[2].1 > cards[0].1);
        let headings = flow
            .canvas()
            .page_ops(1)
            .unwrap()
            .iter()
            .filter(|op| op.text() == Some(GALLERY_HEADING))
            .count();
        assert_eq!(headings, 1);
    }

    #[test]
    fn test_failed_photo_gets_placeholder_in_its_card() {
        let config = LayoutConfig::default();
        let issuer = IssuerProfile::default();
        let token = CancellationToken::new();
        let mut flow =
            PageFlow::begin(&config, HeaderBand::new(&issuer, None, &config), &token).unwrap();

        let photos = vec![
            photo(10, 10),
            Err(ImagePlacementError::Decode("bad".to_string())),
        ];
        render(&mut flow, &photos).unwrap();

        let ops = flow.canvas().page_ops(1).unwrap();
        assert_eq!(cards(&flow, 1).len(), 2);
        assert_eq!(ops.iter().filter(|op| matches!(op, DrawOp::Image { .. })).count(), 1);
        assert_eq!(ops.iter().filter(|op| op.text() == Some(IMAGE_UNAVAILABLE)).count(), 1);
    }

    #[test]
    fn test_photo_is_fitted_and_centred() {
        let config = LayoutConfig::default();
        let issuer = IssuerProfile::default();
        let token = CancellationToken::new();
        let mut flow =
            PageFlow::begin(&config, HeaderBand::new(&issuer, None, &config), &token).unwrap();

        render(&mut flow, &[photo(100, 100)]).unwrap();

        let card = cards(&flow, 1)[0];
        let (x, y, w, h) = flow
            .canvas()
            .page_ops(1)
            .unwrap()
            .iter()
            .find_map(|op| match op {
                DrawOp::Image { x, y, width, height, .. } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .unwrap();
        // Square photo in a 238x138 inner box
        assert!((w - 138.0).abs() < 1e-9);
        assert!((h - 138.0).abs() < 1e-9);
        assert!((x - (card.0 + 6.0 + 50.0)).abs() < 1e-9);
        assert!((y - (card.1 + 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rows_break_onto_new_pages() {
        let config = LayoutConfig::default();
        let issuer = IssuerProfile::default();
        let token = CancellationToken::new();
        let mut flow =
            PageFlow::begin(&config, HeaderBand::new(&issuer, None, &config), &token).unwrap();

        let photos: Vec<_> = (0..10).map(|i| photo(10 + i, 10)).collect();
        render(&mut flow, &photos).unwrap();

        // Three rows per empty page: 6 + 4
        assert_eq!(flow.page(), 2);
        assert_eq!(cards(&flow, 1).len(), 6);
        assert_eq!(cards(&flow, 2).len(), 4);
    }
}
