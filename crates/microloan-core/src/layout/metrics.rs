use crate::error::MicroloanError;
use crate::layout::geometry::FontStyle;
use crate::layout::glyphs::{encode_winansi, glyph_width};
use crate::MicroloanResult;

/// Measures rendered text width in points.
pub trait FontMetrics {
    fn measure(&self, text: &str, style: FontStyle) -> f32;
}

/// AFM widths of the base-14 Helvetica faces, measured on the encoded bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl FontMetrics for HelveticaMetrics {
    fn measure(&self, text: &str, style: FontStyle) -> f32 {
        let units: u32 = encode_winansi(text)
            .into_iter()
            .map(|b| u32::from(glyph_width(b, style.bold)))
            .sum();
        units as f32 * style.size / 1000.0
    }
}

/// Greedy word wrap to `max_width` points.
///
/// Explicit newlines start a new line. A word wider than the whole line is
/// split at character boundaries. Fails only when not even one character fits.
pub fn wrap_text(
    metrics: &dyn FontMetrics,
    text: &str,
    style: FontStyle,
    max_width: f32,
) -> MicroloanResult<Vec<String>> {
    if !(max_width > 0.0) {
        return Err(MicroloanError::LayoutOverflow(format!(
            "no horizontal room for text (width {max_width:.2}pt)"
        )));
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in words(paragraph) {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if metrics.measure(&candidate, style) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if metrics.measure(word, style) <= max_width {
                current = word.to_string();
                continue;
            }
            for ch in word.chars() {
                let mut next = current.clone();
                next.push(ch);
                if metrics.measure(&next, style) <= max_width {
                    current = next;
                    continue;
                }
                if current.is_empty() {
                    return Err(MicroloanError::LayoutOverflow(format!(
                        "glyph '{ch}' is wider than {max_width:.2}pt"
                    )));
                }
                lines.push(std::mem::replace(&mut current, ch.to_string()));
            }
        }
        lines.push(current);
    }
    Ok(lines)
}

/// Split on breaking whitespace. No-break spaces stay inside their word so
/// grouped amounts like `80 000` never wrap.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() && c != '\u{a0}')
        .filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is 10pt wide regardless of style.
    struct Monospace;

    impl FontMetrics for Monospace {
        fn measure(&self, text: &str, _style: FontStyle) -> f32 {
            text.chars().count() as f32 * 10.0
        }
    }

    #[test]
    fn test_helvetica_measure() {
        let m = HelveticaMetrics;
        let w = m.measure("Hi", FontStyle::regular(10.0));
        assert!((w - (7.22 + 2.22)).abs() < 1e-4);
        let bold = m.measure("Hi", FontStyle::bold(10.0));
        assert!(bold > w);
    }

    #[test]
    fn test_cyrillic_measured_after_transliteration() {
        let m = HelveticaMetrics;
        let style = FontStyle::regular(10.0);
        assert_eq!(m.measure("Щ", style), m.measure("Shch", style));
    }

    #[test]
    fn test_wrap_by_width() {
        let lines = wrap_text(&Monospace, "aa bb cc", FontStyle::regular(10.0), 50.0).unwrap();
        assert_eq!(lines, vec!["aa bb", "cc"]);
    }

    #[test]
    fn test_wrap_splits_long_word() {
        let lines = wrap_text(&Monospace, "abcdefg h", FontStyle::regular(10.0), 30.0).unwrap();
        assert_eq!(lines, vec!["abc", "def", "g h"]);
    }

    #[test]
    fn test_no_break_space_holds_amount_together() {
        let lines = wrap_text(&Monospace, "ab 80\u{a0}000", FontStyle::regular(10.0), 60.0).unwrap();
        assert_eq!(lines, vec!["ab", "80\u{a0}000"]);
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        let lines = wrap_text(&Monospace, "", FontStyle::regular(10.0), 30.0).unwrap();
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_wrap_overflow() {
        let style = FontStyle::regular(10.0);
        assert!(matches!(
            wrap_text(&Monospace, "a", style, 5.0),
            Err(MicroloanError::LayoutOverflow(_))
        ));
        assert!(matches!(
            wrap_text(&Monospace, "a", style, 0.0),
            Err(MicroloanError::LayoutOverflow(_))
        ));
    }
}
