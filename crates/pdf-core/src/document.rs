//! PDF Document canvas

use crate::font::{FontWeight, StandardFont};
use crate::image::{generate_image_operators, ImageScaleMode, ImageXObject};
use crate::text::{generate_text_operators, word_wrap, TextRenderContext};
use crate::{Align, PdfError, Result, A4_HEIGHT, A4_WIDTH};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Bezier control distance for quarter circles
const KAPPA: f64 = 0.552_284_75;

/// Share of the font size between the baseline and the visual middle of a line
const MID_LINE_RATIO: f64 = 0.35;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Red color
    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// How a rectangle is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectStyle {
    /// Fill with the current fill color
    Fill,
    /// Outline with the current draw color and line width
    Stroke,
    /// Fill, then outline
    FillStroke,
}

/// A buffered drawing operation
///
/// Coordinates use the canvas convention: points, origin at the top-left of
/// the page, y growing downward. Text `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f64,
        y: f64,
        font: StandardFont,
        size: f32,
        color: Color,
        /// Counter-clockwise rotation in degrees
        rotation: Option<f64>,
        opacity: Option<f32>,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        style: RectStyle,
        fill: Color,
        stroke: Color,
        line_width: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        line_width: f64,
    },
    Image {
        /// Index into the document's image table
        image: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl DrawOp {
    /// The text of a text operation
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Lowest point this operation reaches, measured from the page top
    pub fn bottom(&self) -> f64 {
        match self {
            DrawOp::Text { y, .. } => *y,
            DrawOp::Rect { y, height, .. } | DrawOp::Image { y, height, .. } => y + height,
            DrawOp::Line { y1, y2, .. } => y1.max(*y2),
        }
    }
}

/// PDF document canvas providing high-level drawing operations
pub struct PdfDocument {
    /// Page width in points
    width: f64,
    /// Page height in points
    height: f64,
    /// Buffered operations per page (index 0 = page 1)
    pages: Vec<Vec<DrawOp>>,
    /// Registered images
    images: Vec<ImageXObject>,
    /// Image data hash -> index in `images`
    image_index: HashMap<u64, usize>,
    /// Current font face
    current_font: StandardFont,
    /// Current font size
    current_font_size: f32,
    /// Current text color
    current_text_color: Color,
    /// Current fill color
    current_fill_color: Color,
    /// Current stroke color
    current_draw_color: Color,
    /// Current stroke width
    current_line_width: f64,
    /// Document title for the Info dictionary
    title: Option<String>,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    /// Create an empty A4 portrait document
    pub fn new() -> Self {
        Self::with_page_size(A4_WIDTH, A4_HEIGHT)
    }

    /// Create an empty document whose pages all share one size
    pub fn with_page_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pages: Vec::new(),
            images: Vec::new(),
            image_index: HashMap::new(),
            current_font: StandardFont::Helvetica,
            current_font_size: 12.0,
            current_text_color: Color::default(),
            current_fill_color: Color::default(),
            current_draw_color: Color::default(),
            current_line_width: 1.0,
            title: None,
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page width in points
    pub fn page_width(&self) -> f64 {
        self.width
    }

    /// Page height in points
    pub fn page_height(&self) -> f64 {
        self.height
    }

    /// Set the title written to the document Info dictionary
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Add a blank page to the end of the document
    ///
    /// # Returns
    /// New page number (1-indexed)
    pub fn add_blank_page(&mut self) -> Result<usize> {
        self.pages.push(Vec::new());
        Ok(self.pages.len())
    }

    /// Buffered operations of a page (1-indexed)
    pub fn page_ops(&self, page: usize) -> Result<&[DrawOp]> {
        self.check_page(page)?;
        Ok(&self.pages[page - 1])
    }

    /// Registered images, indexed by `DrawOp::Image::image`
    pub fn images(&self) -> &[ImageXObject] {
        &self.images
    }

    /// Set the current font weight and size
    pub fn set_font(&mut self, weight: FontWeight, size: f32) {
        self.current_font = StandardFont::from_weight(weight);
        self.current_font_size = size;
    }

    /// Set the font weight (keeps current size)
    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.current_font = StandardFont::from_weight(weight);
    }

    /// Set only the font size (keeps current weight)
    pub fn set_font_size(&mut self, size: f32) {
        self.current_font_size = size;
    }

    /// Current font size
    pub fn font_size(&self) -> f32 {
        self.current_font_size
    }

    /// Set the text color
    ///
    /// # Example
    /// ```ignore
    /// doc.set_text_color(Color::red());
    /// doc.set_text_color(Color::from_rgb(20, 48, 95));
    /// ```
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Set the fill color used by filled shapes
    pub fn set_fill_color(&mut self, color: Color) {
        self.current_fill_color = color;
    }

    /// Set the stroke color used by outlines and lines
    pub fn set_draw_color(&mut self, color: Color) {
        self.current_draw_color = color;
    }

    /// Set the stroke width in points
    pub fn set_line_width(&mut self, width: f64) {
        self.current_line_width = width;
    }

    /// Get current font's text width for a string, in points
    pub fn get_text_width(&self, text: &str) -> f64 {
        self.current_font
            .text_width_points(text, self.current_font_size)
    }

    /// Split text into lines that fit `max_width` with the current font
    pub fn wrap_text(&self, text: &str, max_width: f64) -> Vec<String> {
        let font = self.current_font;
        let size = self.current_font_size;
        word_wrap(text, max_width, |s| font.text_width_points(s, size))
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Baseline Y coordinate in points (from top)
    /// * `align` - Alignment relative to `x`
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        self.check_page(page)?;

        // Skip empty text - nothing to render
        if text.is_empty() {
            return Ok(());
        }

        let width = self.get_text_width(text);
        let start_x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };

        self.push_op(
            page,
            DrawOp::Text {
                text: text.to_string(),
                x: start_x,
                y,
                font: self.current_font,
                size: self.current_font_size,
                color: self.current_text_color,
                rotation: None,
                opacity: None,
            },
        );

        Ok(())
    }

    /// Insert text wrapped to `max_width`, one line every `line_height` points
    ///
    /// # Returns
    /// Number of lines drawn
    pub fn insert_text_wrapped(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        max_width: f64,
        line_height: f64,
    ) -> Result<usize> {
        let lines = self.wrap_text(text, max_width);
        for (i, line) in lines.iter().enumerate() {
            self.insert_text(line, page, x, y + i as f64 * line_height, Align::Left)?;
        }
        Ok(lines.len())
    }

    /// Insert text rotated about its own center
    ///
    /// # Arguments
    /// * `cx`, `cy` - Center of the text in points (from top)
    /// * `degrees` - Counter-clockwise rotation
    /// * `opacity` - Fill opacity (0.0 - 1.0), `None` for opaque
    pub fn insert_text_rotated(
        &mut self,
        text: &str,
        page: usize,
        cx: f64,
        cy: f64,
        degrees: f64,
        opacity: Option<f32>,
    ) -> Result<()> {
        self.check_page(page)?;

        if text.is_empty() {
            return Ok(());
        }

        let half_width = self.get_text_width(text) / 2.0;
        let drop = self.current_font_size as f64 * MID_LINE_RATIO;
        let (sin, cos) = degrees.to_radians().sin_cos();

        // Walk back from the center along the (y-down) baseline direction and
        // down by half the glyph height to find the text origin.
        let x = cx - half_width * cos + drop * sin;
        let y = cy + half_width * sin + drop * cos;

        self.push_op(
            page,
            DrawOp::Text {
                text: text.to_string(),
                x,
                y,
                font: self.current_font,
                size: self.current_font_size,
                color: self.current_text_color,
                rotation: Some(degrees),
                opacity: opacity.map(|o| o.clamp(0.0, 1.0)),
            },
        );

        Ok(())
    }

    /// Draw a rectangle with its top-left corner at (x, y)
    pub fn draw_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: RectStyle,
    ) -> Result<()> {
        self.draw_rounded_rect(page, x, y, width, height, 0.0, style)
    }

    /// Draw a rectangle with rounded corners
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rounded_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        style: RectStyle,
    ) -> Result<()> {
        self.check_page(page)?;

        let radius = radius.max(0.0).min(width / 2.0).min(height / 2.0);
        self.push_op(
            page,
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                radius,
                style,
                fill: self.current_fill_color,
                stroke: self.current_draw_color,
                line_width: self.current_line_width,
            },
        );

        Ok(())
    }

    /// Draw a straight line
    pub fn draw_line(&mut self, page: usize, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        self.check_page(page)?;

        self.push_op(
            page,
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color: self.current_draw_color,
                line_width: self.current_line_width,
            },
        );

        Ok(())
    }

    /// Register an image with the document, deduplicated by content
    ///
    /// # Returns
    /// Index of the image in the document's image table
    pub fn register_image(&mut self, image: &ImageXObject) -> usize {
        let mut hasher = DefaultHasher::new();
        image.data.hash(&mut hasher);
        let data_hash = hasher.finish();

        if let Some(&index) = self.image_index.get(&data_hash) {
            return index;
        }

        self.images.push(image.clone());
        let index = self.images.len() - 1;
        self.image_index.insert(data_hash, index);
        index
    }

    /// Insert a decoded image
    ///
    /// The image is scaled into the `width` x `height` box according to
    /// `mode` and anchored at the box's top-left corner.
    ///
    /// # Returns
    /// Actual (width, height) drawn
    #[allow(clippy::too_many_arguments)]
    pub fn insert_image(
        &mut self,
        image: &ImageXObject,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<(f64, f64)> {
        self.check_page(page)?;

        let (actual_width, actual_height) = crate::image::calculate_scaled_dimensions(
            image.width,
            image.height,
            width,
            height,
            mode,
        );

        let index = self.register_image(image);
        self.push_op(
            page,
            DrawOp::Image {
                image: index,
                x,
                y,
                width: actual_width,
                height: actual_height,
            },
        );

        Ok((actual_width, actual_height))
    }

    /// Insert an image from encoded bytes (JPEG, PNG or WEBP)
    ///
    /// Fails with `PdfError::ImageError` when the data cannot be read; nothing
    /// is drawn in that case.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_image_bytes(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<(f64, f64)> {
        self.check_page(page)?;
        let image = ImageXObject::from_bytes(data, None)?;
        self.insert_image(&image, page, x, y, width, height, mode)
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut doc = self.build_document()?;
        doc.save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.build_document()?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page == 0 || page > self.pages.len() {
            return Err(PdfError::InvalidPage(page, self.pages.len()));
        }
        Ok(())
    }

    fn push_op(&mut self, page: usize, op: DrawOp) {
        self.pages[page - 1].push(op);
    }

    /// Assemble the lopdf object graph from the buffered pages
    fn build_document(&self) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in StandardFont::ALL {
            let font_id = doc.add_object(font.to_pdf_dict());
            fonts.set(font.resource_name(), Object::Reference(font_id));
        }

        let image_ids: Vec<ObjectId> = self
            .images
            .iter()
            .map(|image| doc.add_object(image.to_pdf_stream()))
            .collect();

        // One ExtGState per distinct opacity, quantized to 1/1000
        let mut graphics_states: BTreeMap<u16, (String, ObjectId)> = BTreeMap::new();
        for op in self.pages.iter().flatten() {
            if let DrawOp::Text {
                opacity: Some(opacity),
                ..
            } = op
            {
                let key = opacity_key(*opacity);
                if !graphics_states.contains_key(&key) {
                    let alpha = key as f64 / 1000.0;
                    let id = doc.add_object(dictionary! {
                        "Type" => "ExtGState",
                        "ca" => alpha,
                        "CA" => alpha,
                    });
                    let name = format!("GS{}", graphics_states.len() + 1);
                    graphics_states.insert(key, (name, id));
                }
            }
        }

        let mut kids = Vec::with_capacity(self.pages.len());
        for ops in &self.pages {
            let content = self.encode_page(ops, &graphics_states);

            let mut encoder =
                flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            std::io::Write::write_all(&mut encoder, &content)?;
            let compressed = encoder.finish()?;
            let contents_id = doc.add_object(
                Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed)
                    .with_compression(false),
            );

            let mut resources = Dictionary::new();
            resources.set("Font", Object::Dictionary(fonts.clone()));

            let used_images: BTreeSet<usize> = ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Image { image, .. } => Some(*image),
                    _ => None,
                })
                .collect();
            if !used_images.is_empty() {
                let mut xobjects = Dictionary::new();
                for index in used_images {
                    xobjects.set(image_name(index), Object::Reference(image_ids[index]));
                }
                resources.set("XObject", Object::Dictionary(xobjects));
            }

            let used_states: BTreeSet<u16> = ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text {
                        opacity: Some(opacity),
                        ..
                    } => Some(opacity_key(*opacity)),
                    _ => None,
                })
                .collect();
            if !used_states.is_empty() {
                let mut states = Dictionary::new();
                for key in used_states {
                    if let Some((name, id)) = graphics_states.get(&key) {
                        states.set(name.as_str(), Object::Reference(*id));
                    }
                }
                resources.set("ExtGState", Object::Dictionary(states));
            }

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::from(0.0),
                    Object::from(0.0),
                    Object::from(self.width),
                    Object::from(self.height),
                ],
                "Resources" => resources,
                "Contents" => contents_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = &self.title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title.as_str()),
                "Producer" => Object::string_literal("pdf-core"),
            });
            doc.trailer.set("Info", info_id);
        }

        Ok(doc)
    }

    /// Encode one page's operations into a content stream
    fn encode_page(&self, ops: &[DrawOp], graphics_states: &BTreeMap<u16, (String, ObjectId)>) -> Vec<u8> {
        let mut content = Vec::new();

        for op in ops {
            match op {
                DrawOp::Text {
                    text,
                    x,
                    y,
                    font,
                    size,
                    color,
                    rotation,
                    opacity,
                } => {
                    let ctx = TextRenderContext {
                        font_name: font.resource_name(),
                        font_size: *size,
                        color: *color,
                        rotation: *rotation,
                        graphics_state: opacity
                            .and_then(|o| graphics_states.get(&opacity_key(o)))
                            .map(|(name, _)| name.clone()),
                    };
                    content.extend(generate_text_operators(text, *x, self.height - y, &ctx));
                }
                DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    radius,
                    style,
                    fill,
                    stroke,
                    line_width,
                } => {
                    let pdf_y = self.height - y - height;
                    let mut ops = String::from("q\n");
                    ops.push_str(&format!("{} {} {} rg\n", fill.r, fill.g, fill.b));
                    ops.push_str(&format!("{} {} {} RG\n", stroke.r, stroke.g, stroke.b));
                    ops.push_str(&format!("{line_width:.2} w\n"));
                    if *radius > 0.0 {
                        ops.push_str(&rounded_rect_path(*x, pdf_y, *width, *height, *radius));
                    } else {
                        ops.push_str(&format!(
                            "{x:.2} {pdf_y:.2} {width:.2} {height:.2} re\n"
                        ));
                    }
                    ops.push_str(match style {
                        RectStyle::Fill => "f\n",
                        RectStyle::Stroke => "S\n",
                        RectStyle::FillStroke => "B\n",
                    });
                    ops.push_str("Q\n");
                    content.extend(ops.into_bytes());
                }
                DrawOp::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                    line_width,
                } => {
                    let ops = format!(
                        "q\n{} {} {} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                        color.r,
                        color.g,
                        color.b,
                        line_width,
                        x1,
                        self.height - y1,
                        x2,
                        self.height - y2
                    );
                    content.extend(ops.into_bytes());
                }
                DrawOp::Image {
                    image,
                    x,
                    y,
                    width,
                    height,
                } => {
                    let pdf_y = self.height - y - height;
                    content.extend(generate_image_operators(
                        &image_name(*image),
                        *x,
                        pdf_y,
                        *width,
                        *height,
                    ));
                }
            }
        }

        content
    }
}

fn image_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

fn opacity_key(opacity: f32) -> u16 {
    (opacity.clamp(0.0, 1.0) * 1000.0).round() as u16
}

/// Closed path for a rounded rectangle in PDF coordinates (y up)
fn rounded_rect_path(x: f64, y: f64, width: f64, height: f64, r: f64) -> String {
    let k = KAPPA * r;
    let (x0, y0, x1, y1) = (x, y, x + width, y + height);

    let mut path = String::new();
    path.push_str(&format!("{:.2} {:.2} m\n", x0 + r, y0));
    path.push_str(&format!("{:.2} {:.2} l\n", x1 - r, y0));
    path.push_str(&format!(
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
        x1 - r + k,
        y0,
        x1,
        y0 + r - k,
        x1,
        y0 + r
    ));
    path.push_str(&format!("{:.2} {:.2} l\n", x1, y1 - r));
    path.push_str(&format!(
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
        x1,
        y1 - r + k,
        x1 - r + k,
        y1,
        x1 - r,
        y1
    ));
    path.push_str(&format!("{:.2} {:.2} l\n", x0 + r, y1));
    path.push_str(&format!(
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
        x0 + r - k,
        y1,
        x0,
        y1 - r + k,
        x0,
        y1 - r
    ));
    path.push_str(&format!("{:.2} {:.2} l\n", x0, y0 + r));
    path.push_str(&format!(
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
        x0,
        y0 + r - k,
        x0 + r - k,
        y0,
        x0 + r,
        y0
    ));
    path.push_str("h\n");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_page() -> (PdfDocument, usize) {
        let mut doc = PdfDocument::new();
        let page = doc.add_blank_page().unwrap();
        (doc, page)
    }

    #[test]
    fn test_new_document_is_empty_a4() {
        let doc = PdfDocument::new();
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.page_width(), A4_WIDTH);
        assert_eq!(doc.page_height(), A4_HEIGHT);
    }

    #[test]
    fn test_add_blank_page_numbers_from_one() {
        let mut doc = PdfDocument::new();
        assert_eq!(doc.add_blank_page().unwrap(), 1);
        assert_eq!(doc.add_blank_page().unwrap(), 2);
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_invalid_page_is_rejected() {
        let (mut doc, _) = doc_with_page();
        let err = doc.insert_text("x", 2, 0.0, 0.0, Align::Left).unwrap_err();
        assert!(matches!(err, PdfError::InvalidPage(2, 1)));
        assert!(doc.page_ops(0).is_err());
    }

    #[test]
    fn test_insert_text_alignment() {
        let (mut doc, page) = doc_with_page();
        doc.set_font(FontWeight::Regular, 10.0);
        let width = doc.get_text_width("Centered");
        doc.insert_text("Centered", page, 300.0, 100.0, Align::Center)
            .unwrap();
        doc.insert_text("Right", page, 300.0, 120.0, Align::Right)
            .unwrap();

        let ops = doc.page_ops(page).unwrap();
        match &ops[0] {
            DrawOp::Text { x, y, .. } => {
                assert!((x - (300.0 - width / 2.0)).abs() < 1e-9);
                assert_eq!(*y, 100.0);
            }
            other => panic!("unexpected op {other:?}"),
        }
        assert_eq!(ops[1].text(), Some("Right"));
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let (mut doc, page) = doc_with_page();
        doc.insert_text("", page, 10.0, 10.0, Align::Left).unwrap();
        assert!(doc.page_ops(page).unwrap().is_empty());
    }

    #[test]
    fn test_insert_text_wrapped_counts_lines() {
        let (mut doc, page) = doc_with_page();
        doc.set_font(FontWeight::Regular, 10.0);
        let lines = doc
            .insert_text_wrapped("one two three four five six", page, 30.0, 50.0, 60.0, 12.0)
            .unwrap();
        assert!(lines > 1);
        let ops = doc.page_ops(page).unwrap();
        assert_eq!(ops.len(), lines);
        assert_eq!(ops.last().unwrap().bottom(), 50.0 + (lines - 1) as f64 * 12.0);
    }

    #[test]
    fn test_rotated_text_without_rotation_is_centered() {
        let (mut doc, page) = doc_with_page();
        doc.set_font(FontWeight::Regular, 20.0);
        let width = doc.get_text_width("Mark");
        doc.insert_text_rotated("Mark", page, 100.0, 200.0, 0.0, Some(0.5))
            .unwrap();

        match &doc.page_ops(page).unwrap()[0] {
            DrawOp::Text {
                x,
                y,
                rotation,
                opacity,
                ..
            } => {
                assert!((x - (100.0 - width / 2.0)).abs() < 1e-9);
                assert!((y - 207.0).abs() < 1e-9);
                assert_eq!(*rotation, Some(0.0));
                assert_eq!(*opacity, Some(0.5));
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_rounded_rect_radius_is_clamped() {
        let (mut doc, page) = doc_with_page();
        doc.draw_rounded_rect(page, 0.0, 0.0, 10.0, 4.0, 8.0, RectStyle::Stroke)
            .unwrap();
        match &doc.page_ops(page).unwrap()[0] {
            DrawOp::Rect { radius, .. } => assert_eq!(*radius, 2.0),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_register_image_deduplicates() {
        let mut doc = PdfDocument::new();
        let image = ImageXObject {
            width: 1,
            height: 1,
            color_space: "DeviceGray".to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data: vec![1, 2, 3],
        };
        assert_eq!(doc.register_image(&image), 0);
        assert_eq!(doc.register_image(&image), 0);
        assert_eq!(doc.images().len(), 1);
    }

    #[test]
    fn test_insert_image_bytes_rejects_garbage() {
        let (mut doc, page) = doc_with_page();
        let result = doc.insert_image_bytes(
            b"garbage bytes",
            page,
            0.0,
            0.0,
            10.0,
            10.0,
            ImageScaleMode::FitBox,
        );
        assert!(matches!(result, Err(PdfError::ImageError(_))));
        assert!(doc.page_ops(page).unwrap().is_empty());
    }

    #[test]
    fn test_rounded_rect_path_is_closed() {
        let path = rounded_rect_path(0.0, 0.0, 100.0, 50.0, 10.0);
        assert!(path.starts_with("10.00 0.00 m"));
        assert_eq!(path.matches(" c\n").count(), 4);
        assert!(path.ends_with("h\n"));
    }

    #[test]
    fn test_opacity_key_quantizes() {
        assert_eq!(opacity_key(0.35), 350);
        assert_eq!(opacity_key(2.0), 1000);
    }
}
