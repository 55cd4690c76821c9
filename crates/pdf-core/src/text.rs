//! Text rendering utilities

use crate::document::Color;
use crate::font::encode_literal;
use crate::Align;

/// Context for rendering text
pub(crate) struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: &'static str,
    /// Font size in points
    pub font_size: f32,
    /// Text color (RGB)
    pub color: Color,
    /// Counter-clockwise rotation in degrees
    pub rotation: Option<f64>,
    /// ExtGState resource carrying the opacity (e.g., "GS1")
    pub graphics_state: Option<String>,
}

/// Calculate X offset for text alignment
///
/// # Arguments
/// * `text_width` - Width of text in points
/// * `container_width` - Available width for alignment
/// * `align` - Desired alignment
pub fn calculate_x_offset(text_width: f64, container_width: f64, align: Align) -> f64 {
    match align {
        Align::Left => 0.0,
        Align::Center => (container_width - text_width) / 2.0,
        Align::Right => container_width - text_width,
    }
}

/// Generate PDF operators for text insertion
///
/// `x`/`y` are PDF coordinates (from bottom-left) of the text origin. Rotated
/// text is positioned with a text matrix (`Tm`) instead of `Td`.
pub(crate) fn generate_text_operators(
    text: &str,
    x: f64,
    y: f64,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let mut ops = Vec::new();

    let wrapped = ctx.graphics_state.is_some();
    if let Some(gs) = &ctx.graphics_state {
        ops.extend_from_slice(format!("q\n/{gs} gs\n").as_bytes());
    }

    ops.extend_from_slice(b"BT\n");
    ops.extend_from_slice(
        format!("{} {} {} rg\n", ctx.color.r, ctx.color.g, ctx.color.b).as_bytes(),
    );
    ops.extend_from_slice(format!("/{} {} Tf\n", ctx.font_name, ctx.font_size).as_bytes());

    match ctx.rotation {
        Some(degrees) => {
            let (sin, cos) = degrees.to_radians().sin_cos();
            ops.extend_from_slice(
                format!(
                    "{:.4} {:.4} {:.4} {:.4} {:.2} {:.2} Tm\n",
                    cos, sin, -sin, cos, x, y
                )
                .as_bytes(),
            );
        }
        None => {
            ops.extend_from_slice(format!("{x:.2} {y:.2} Td\n").as_bytes());
        }
    }

    ops.extend_from_slice(&encode_literal(text));
    ops.extend_from_slice(b" Tj\nET\n");

    if wrapped {
        ops.extend_from_slice(b"Q\n");
    }

    ops
}

/// Split text into lines no wider than `max_width`
///
/// Greedy line filling over whitespace-separated words; explicit newlines
/// start a new paragraph, and a single word wider than the line is broken
/// between characters. `measure` returns the rendered width of a string.
/// The same input always yields the same lines.
pub fn word_wrap<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current_line = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{current_line} {word}")
            };

            if measure(&candidate) <= max_width {
                current_line = candidate;
                continue;
            }

            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }

            if measure(word) <= max_width {
                current_line = word.to_string();
            } else {
                // Break an over-long word between characters
                for c in word.chars() {
                    current_line.push(c);
                    if measure(&current_line) > max_width && current_line.chars().count() > 1 {
                        current_line.pop();
                        lines.push(std::mem::take(&mut current_line));
                        current_line.push(c);
                    }
                }
            }
        }

        lines.push(current_line);
    }

    // Drop trailing empty paragraphs but keep at least one line
    while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is 1pt wide
    fn chars(s: &str) -> f64 {
        s.chars().count() as f64
    }

    fn ctx(rotation: Option<f64>, graphics_state: Option<&str>) -> TextRenderContext {
        TextRenderContext {
            font_name: "F1",
            font_size: 12.0,
            color: Color::black(),
            rotation,
            graphics_state: graphics_state.map(str::to_string),
        }
    }

    #[test]
    fn test_x_offset_left() {
        assert_eq!(calculate_x_offset(100.0, 500.0, Align::Left), 0.0);
    }

    #[test]
    fn test_x_offset_center() {
        assert_eq!(calculate_x_offset(100.0, 500.0, Align::Center), 200.0);
    }

    #[test]
    fn test_x_offset_right() {
        assert_eq!(calculate_x_offset(100.0, 500.0, Align::Right), 400.0);
    }

    #[test]
    fn test_word_wrap() {
        let lines = word_wrap("Hello world this is a test", 12.0, chars);
        assert_eq!(lines, vec!["Hello world", "this is a", "test"]);
    }

    #[test]
    fn test_word_wrap_single_line() {
        assert_eq!(word_wrap("Short", 100.0, chars), vec!["Short"]);
    }

    #[test]
    fn test_word_wrap_empty() {
        assert_eq!(word_wrap("", 10.0, chars), vec![""]);
    }

    #[test]
    fn test_word_wrap_whitespace_only() {
        assert_eq!(word_wrap("   ", 10.0, chars), vec![""]);
    }

    #[test]
    fn test_word_wrap_exact_fit() {
        assert_eq!(word_wrap("Hello world", 11.0, chars), vec!["Hello world"]);
    }

    #[test]
    fn test_word_wrap_just_over() {
        assert_eq!(word_wrap("Hello world", 10.0, chars), vec!["Hello", "world"]);
    }

    #[test]
    fn test_word_wrap_long_word_is_broken() {
        let lines = word_wrap("Supercalifragilistic", 8.0, chars);
        assert_eq!(lines, vec!["Supercal", "ifragili", "stic"]);
        assert!(lines.iter().all(|l| chars(l) <= 8.0));
    }

    #[test]
    fn test_word_wrap_keeps_newlines() {
        let lines = word_wrap("first\nsecond line", 20.0, chars);
        assert_eq!(lines, vec!["first", "second line"]);
    }

    #[test]
    fn test_word_wrap_is_deterministic() {
        let text = "Brake pads worn close to the minimum, replace within 1,000 km";
        assert_eq!(word_wrap(text, 17.0, chars), word_wrap(text, 17.0, chars));
    }

    #[test]
    fn test_generate_text_operators_plain() {
        let ops = generate_text_operators("Hello", 100.0, 700.0, &ctx(None, None));
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.starts_with("BT\n"));
        assert!(ops_str.contains("/F1 12 Tf"));
        assert!(ops_str.contains("100.00 700.00 Td"));
        assert!(ops_str.contains("(Hello) Tj"));
        assert!(ops_str.ends_with("ET\n"));
    }

    #[test]
    fn test_generate_text_operators_rotated_with_opacity() {
        let ops = generate_text_operators("Mark", 10.0, 20.0, &ctx(Some(90.0), Some("GS1")));
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.starts_with("q\n/GS1 gs\n"));
        assert!(ops_str.contains("0.0000 1.0000 -1.0000 0.0000 10.00 20.00 Tm"));
        assert!(!ops_str.contains("Td"));
        assert!(ops_str.ends_with("Q\n"));
    }

    #[test]
    fn test_generate_text_operators_with_color() {
        let mut context = ctx(None, None);
        context.color = Color::red();
        let ops = generate_text_operators("A", 0.0, 0.0, &context);
        assert!(String::from_utf8(ops).unwrap().contains("1 0 0 rg"));
    }
}
