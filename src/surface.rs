use crate::bound::Bound;
use crate::symbol::TextStyle;

/// Pixel extent of a block of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

impl TextExtent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Read-only text metrics query against a drawing surface.
pub trait TextMeasure {
    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtent;
}

/// A surface labels can be drawn onto.
pub trait Canvas: TextMeasure {
    fn draw_text(&mut self, text: &str, bound: &Bound, style: &TextStyle);
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtent {
        (**self).measure_text(text, style)
    }
}

pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').map(|line| line.trim_end_matches('\r')).collect()
}

/// Extent of `text` given a per-line width function.
pub(crate) fn block_extent(
    text: &str,
    style: &TextStyle,
    mut line_width: impl FnMut(&str) -> f64,
) -> TextExtent {
    if text.is_empty() || style.font_size <= 0.0 {
        return TextExtent::new(0.0, 0.0);
    }
    let lines = split_lines(text);
    let width = lines
        .iter()
        .map(|line| line_width(line))
        .fold(0.0, f64::max);
    let height = lines.len() as f64 * style.font_size * style.line_height;
    TextExtent::new(width, height)
}

/// Deterministic metrics from calibrated per-character width factors.
/// Needs no fonts installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMetrics;

impl ApproxMetrics {
    pub fn line_width(line: &str, font_size: f64) -> f64 {
        line.chars()
            .map(|ch| char_width_factor(ch) as f64 * font_size)
            .sum()
    }
}

impl TextMeasure for ApproxMetrics {
    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtent {
        block_extent(text, style, |line| Self::line_width(line, style.font_size))
    }
}

pub(crate) fn char_width_factor(ch: char) -> f32 {
    // Calibrated against a sans-serif stack at a 16px baseline.
    match ch {
        ' ' => 0.306,
        '\t' => 1.224,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        'A' => 0.652,
        'B' => 0.648,
        'C' => 0.734,
        'D' => 0.723,
        'E' => 0.594,
        'F' => 0.575,
        'G' | 'H' => 0.742,
        'I' => 0.272,
        'J' => 0.557,
        'K' => 0.648,
        'L' => 0.559,
        'M' => 0.903,
        'N' => 0.763,
        'O' => 0.754,
        'P' => 0.623,
        'Q' => 0.755,
        'R' => 0.637,
        'S' => 0.633,
        'T' => 0.599,
        'U' => 0.746,
        'V' => 0.661,
        'W' => 0.958,
        'X' => 0.655,
        'Y' => 0.646,
        'Z' => 0.621,
        'a' => 0.550,
        'b' => 0.603,
        'c' => 0.547,
        'd' => 0.609,
        'e' => 0.570,
        'f' => 0.340,
        'g' | 'h' => 0.600,
        'i' => 0.235,
        'j' => 0.227,
        'k' => 0.522,
        'l' => 0.239,
        'm' => 0.867,
        'n' => 0.585,
        'o' => 0.574,
        'p' => 0.595,
        'q' => 0.585,
        'r' => 0.364,
        's' => 0.523,
        't' => 0.305,
        'u' => 0.585,
        'v' => 0.545,
        'w' => 0.811,
        'x' => 0.538,
        'y' => 0.545,
        'z' => 0.520,
        '0'..='9' => 0.556,
        '-' | '_' => 0.400,
        '\'' | '"' | '`' => 0.250,
        _ if ch.is_whitespace() => 0.306,
        _ if ch.is_ascii() => 0.560,
        // CJK and other wide scripts.
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_extent() {
        let extent = ApproxMetrics.measure_text("", &TextStyle::default());
        assert!(extent.is_empty());
    }

    #[test]
    fn multi_line_text_uses_widest_line() {
        let style = TextStyle {
            font_size: 10.0,
            line_height: 1.5,
            ..TextStyle::default()
        };
        let one = ApproxMetrics.measure_text("Harbour", &style);
        let two = ApproxMetrics.measure_text("Harbour\nNo", &style);
        assert_eq!(one.width, two.width);
        assert_eq!(one.height, 15.0);
        assert_eq!(two.height, 30.0);
    }

    #[test]
    fn width_scales_with_font_size() {
        let small = ApproxMetrics::line_width("Oslo", 10.0);
        let large = ApproxMetrics::line_width("Oslo", 20.0);
        assert!((large - 2.0 * small).abs() < 1e-9);
        assert!(ApproxMetrics::line_width("WW", 10.0) > ApproxMetrics::line_width("ii", 10.0));
    }
}
