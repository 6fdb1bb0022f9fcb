//! Pinyin tone-mark conversion.
//!
//! Spreadsheet pinyin is written with diacritics (`māo`, `gǒu`). The flashcard
//! importer wants numbered tones instead (`mao1`, `gou3`). We decompose every
//! character into its base letter plus combining mark and swap the four tone
//! marks for their digit.

use unicode_normalization::UnicodeNormalization;

/// Combining tone marks and the digit each one becomes.
pub const TONE_MARKS: [(char, u8); 4] = [
    // high (macron)
    ('\u{0304}', 1),
    // rising (acute)
    ('\u{0301}', 2),
    // falling-rising (caron)
    ('\u{030C}', 3),
    // falling (grave)
    ('\u{0300}', 4),
];

/// Returns the tone digit for a combining mark, or `None` for anything else.
pub fn tone_digit(mark: char) -> Option<u8> {
    TONE_MARKS
        .iter()
        .find(|(candidate, _)| *candidate == mark)
        .map(|(_, digit)| *digit)
}

/// Converts diacritic pinyin to numbered pinyin.
///
/// Unrecognised characters (including other combining marks such as the
/// diaeresis in `ü`) pass through untouched.
pub fn convert_pinyin(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfd() {
        match tone_digit(c) {
            Some(digit) => out.push(char::from(b'0' + digit)),
            None => out.push(c),
        }
    }
    out
}
