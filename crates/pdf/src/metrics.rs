//! Glyph widths and text encoding for the standard Helvetica fonts.
//!
//! Widths are the AFM advance widths (1/1000 em) for printable ASCII.
//! Characters outside that range are measured with [`FALLBACK_WIDTH`].

use crate::writer::Font;

/// Width used for characters without an entry in the tables.
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica widths for 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold widths for 0x20..=0x7E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Advance width of one character, in 1/1000 em.
pub fn char_width(c: char, font: Font) -> u16 {
    let table = match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    };
    match c as u32 {
        code @ 0x20..=0x7E => table[(code - 0x20) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of a string in points at the given font size.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c, font) as u32).sum();
    units as f32 * size / 1000.0
}

/// Shorten `text` with a trailing "..." so that it fits `max_width`.
///
/// Returns the text unchanged when it already fits.
pub fn truncate_to_width(text: &str, font: Font, size: f32, max_width: f32) -> String {
    if text_width(text, font, size) <= max_width {
        return text.to_string();
    }

    let ellipsis = "...";
    let budget = max_width - text_width(ellipsis, font, size);
    let mut out = String::new();
    let mut width = 0.0;

    for c in text.chars() {
        let w = char_width(c, font) as f32 * size / 1000.0;
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }

    out.push_str(ellipsis);
    out
}

/// Encode text for a WinAnsiEncoding font.
///
/// Latin-1 maps directly; the common typographic punctuation WinAnsi places
/// in 0x80..0x9F is mapped too. Anything else becomes '?'.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\t' => b' ',
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_width() {
        assert_eq!(char_width(' ', Font::Regular), 278);
        assert_eq!(char_width('W', Font::Regular), 944);
        assert_eq!(char_width('i', Font::Regular), 222);
        assert_eq!(char_width('i', Font::Bold), 278);
        assert_eq!(char_width('~', Font::Bold), 584);
        assert_eq!(char_width('é', Font::Regular), FALLBACK_WIDTH);
    }

    #[test]
    fn test_text_width() {
        // "Hi" = 722 + 222 units at 10pt
        let width = text_width("Hi", Font::Regular, 10.0);
        assert!((width - 9.44).abs() < 1e-4);
        assert_eq!(text_width("", Font::Bold, 12.0), 0.0);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", Font::Regular, 8.0, 100.0), "short");

        let long = "a fairly long cell value that will not fit";
        let cut = truncate_to_width(long, Font::Regular, 8.0, 60.0);
        assert!(cut.ends_with("..."));
        assert!(cut.len() < long.len());
        assert!(text_width(&cut, Font::Regular, 8.0) <= 60.0);
    }

    #[test]
    fn test_to_win_ansi() {
        assert_eq!(to_win_ansi("Abc"), b"Abc".to_vec());
        assert_eq!(to_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(to_win_ansi("• “x”"), vec![0x95, b' ', 0x93, b'x', 0x94]);
        assert_eq!(to_win_ansi("数据"), b"??".to_vec());
    }
}
