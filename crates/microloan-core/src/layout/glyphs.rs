//! WinAnsi encoding and glyph widths for the base-14 Helvetica faces.
//!
//! The PDF output uses the standard Helvetica fonts so nothing has to be
//! embedded. Those fonts only cover cp1252, so Cyrillic is transliterated
//! (ICAO passport rules) and a few symbols get ASCII stand-ins. Layout measures
//! the encoded bytes, so what is measured is exactly what is drawn.

/// Encode `text` into WinAnsi bytes, transliterating what the encoding lacks.
pub fn encode_winansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        encode_char(ch, &mut out);
    }
    out
}

fn encode_char(ch: char, out: &mut Vec<u8>) {
    let lower = ch.to_lowercase().next().unwrap_or(ch);
    if let Some(latin) = transliterate(lower) {
        let bytes = latin.as_bytes();
        match bytes.split_first() {
            Some((first, rest)) if lower != ch => {
                out.push(first.to_ascii_uppercase());
                out.extend_from_slice(rest);
            }
            _ => out.extend_from_slice(bytes),
        }
        return;
    }
    let byte = match ch {
        '\u{0000}'..='\u{007F}' => ch as u8,
        '\u{00A0}'..='\u{00FF}' => ch as u8,
        '\u{20AC}' => 0x80,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2122}' => 0x99,
        '№' => {
            out.extend_from_slice(b"No");
            return;
        }
        '₽' => {
            out.extend_from_slice(b"RUB");
            return;
        }
        '─' | '━' => b'-',
        '═' => b'=',
        '│' | '║' => b'|',
        '┌' | '┐' | '└' | '┘' | '├' | '┤' | '┬' | '┴' | '┼' => b'+',
        _ => b'?',
    };
    out.push(byte);
}

// Lowercase Cyrillic to Latin, ICAO Doc 9303.
fn transliterate(lower: char) -> Option<&'static str> {
    let latin = match lower {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' | 'й' => "i",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' => "ie",
        'ы' => "y",
        'ь' => "",
        'ю' => "iu",
        'я' => "ia",
        _ => return None,
    };
    Some(latin)
}

/// Advance width of one WinAnsi byte in 1/1000 em.
pub fn glyph_width(byte: u8, bold: bool) -> u16 {
    match byte {
        32..=126 => {
            let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
            table[(byte - 32) as usize]
        }
        0xA0 => 278,
        0x97 => 1000,
        0x85 => 1000,
        0xA9 | 0xAE => 737,
        0x91 | 0x92 => {
            if bold {
                278
            } else {
                222
            }
        }
        0x95 => 350,
        _ => 556,
    }
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
