//! Number formats for list levels
//!
//! `NumberFormat` is the single closed set of formats shared by the renderer,
//! the attribute emitter and the stylesheet emitter. Every mapping from a format
//! to text, to its WordprocessingML keyword, or to a CSS counter style lives
//! here as an exhaustive match.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number format types for list items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum NumberFormat {
    /// Decimal numbers: 1, 2, 3, ...
    #[default]
    Decimal,
    /// Decimal padded to two digits: 01, 02, ... 10, 11
    DecimalZero,
    /// Lowercase letters: a, b, ... z, a, b, ...
    LowerLetter,
    /// Uppercase letters: A, B, ... Z, A, B, ...
    UpperLetter,
    /// Lowercase roman numerals: i, ii, iii, ...
    LowerRoman,
    /// Uppercase roman numerals: I, II, III, ...
    UpperRoman,
    /// Bullet glyph, independent of the counter
    Bullet,
    /// No number displayed
    None,
}

/// A value outside the range a format can express
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("value {value} cannot be rendered as {format}")]
pub struct FormatRangeViolation {
    pub format: NumberFormat,
    pub value: u32,
}

/// Largest value expressible with standard subtractive roman numerals
pub const MAX_ROMAN: u32 = 3999;

impl NumberFormat {
    /// All formats, in declaration order
    pub const ALL: [NumberFormat; 8] = [
        NumberFormat::Decimal,
        NumberFormat::DecimalZero,
        NumberFormat::LowerLetter,
        NumberFormat::UpperLetter,
        NumberFormat::LowerRoman,
        NumberFormat::UpperRoman,
        NumberFormat::Bullet,
        NumberFormat::None,
    ];

    /// Parse a `w:numFmt` keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "decimal" => Some(NumberFormat::Decimal),
            "decimalZero" => Some(NumberFormat::DecimalZero),
            "lowerLetter" => Some(NumberFormat::LowerLetter),
            "upperLetter" => Some(NumberFormat::UpperLetter),
            "lowerRoman" => Some(NumberFormat::LowerRoman),
            "upperRoman" => Some(NumberFormat::UpperRoman),
            "bullet" => Some(NumberFormat::Bullet),
            "none" => Some(NumberFormat::None),
            _ => None,
        }
    }

    /// The `w:numFmt` keyword for this format, used as the format-name attribute
    pub fn keyword(&self) -> &'static str {
        match self {
            NumberFormat::Decimal => "decimal",
            NumberFormat::DecimalZero => "decimalZero",
            NumberFormat::LowerLetter => "lowerLetter",
            NumberFormat::UpperLetter => "upperLetter",
            NumberFormat::LowerRoman => "lowerRoman",
            NumberFormat::UpperRoman => "upperRoman",
            NumberFormat::Bullet => "bullet",
            NumberFormat::None => "none",
        }
    }

    /// The CSS `counter()` style equivalent to this format
    pub fn css_counter_style(&self) -> &'static str {
        match self {
            NumberFormat::Decimal => "decimal",
            NumberFormat::DecimalZero => "decimal-leading-zero",
            NumberFormat::LowerLetter => "lower-alpha",
            NumberFormat::UpperLetter => "upper-alpha",
            NumberFormat::LowerRoman => "lower-roman",
            NumberFormat::UpperRoman => "upper-roman",
            NumberFormat::Bullet => "disc",
            NumberFormat::None => "none",
        }
    }

    /// Check if this format is a bullet (non-numbering) format
    pub fn is_bullet(&self) -> bool {
        matches!(self, NumberFormat::Bullet)
    }

    /// Check if this format shows no glyph at all
    pub fn is_hidden(&self) -> bool {
        matches!(self, NumberFormat::None)
    }

    /// Format a number according to this format.
    ///
    /// Bullet and none formats produce an empty token; the bullet glyph is
    /// supplied by the level definition. Letters and roman numerals reject
    /// values they cannot express; callers fall back to the decimal text.
    pub fn format(&self, value: u32) -> Result<String, FormatRangeViolation> {
        let violation = FormatRangeViolation { format: *self, value };
        match self {
            NumberFormat::Decimal => Ok(value.to_string()),
            NumberFormat::DecimalZero => Ok(format!("{:02}", value)),
            NumberFormat::LowerLetter => format_letter(value, false).ok_or(violation),
            NumberFormat::UpperLetter => format_letter(value, true).ok_or(violation),
            NumberFormat::LowerRoman => format_roman(value, false).ok_or(violation),
            NumberFormat::UpperRoman => format_roman(value, true).ok_or(violation),
            NumberFormat::Bullet | NumberFormat::None => Ok(String::new()),
        }
    }

    /// Format a number, substituting the plain integer for out-of-range values
    pub fn format_or_decimal(&self, value: u32) -> (String, Option<FormatRangeViolation>) {
        match self.format(value) {
            Ok(text) => (text, None),
            Err(violation) => (value.to_string(), Some(violation)),
        }
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Format a number as a single letter (a, b, ... z, a, ...).
///
/// The sequence wraps after 26 instead of continuing with "aa". Returns `None`
/// for zero.
pub fn format_letter(value: u32, uppercase: bool) -> Option<String> {
    if value == 0 {
        return None;
    }

    let base = if uppercase { b'A' } else { b'a' };
    let c = (base + ((value - 1) % 26) as u8) as char;
    Some(c.to_string())
}

const ROMAN_NUMERALS: [(u32, &str); 13] = [
    (1000, "m"),
    (900, "cm"),
    (500, "d"),
    (400, "cd"),
    (100, "c"),
    (90, "xc"),
    (50, "l"),
    (40, "xl"),
    (10, "x"),
    (9, "ix"),
    (5, "v"),
    (4, "iv"),
    (1, "i"),
];

/// Format a number as roman numerals. Defined for 1..=3999 only.
pub fn format_roman(value: u32, uppercase: bool) -> Option<String> {
    if value == 0 || value > MAX_ROMAN {
        return None;
    }

    let mut result = String::new();
    let mut n = value;

    for (num, roman) in ROMAN_NUMERALS {
        while n >= num {
            result.push_str(roman);
            n -= num;
        }
    }

    if uppercase {
        Some(result.to_uppercase())
    } else {
        Some(result)
    }
}

/// Parse a canonical roman numeral (either case) back to its value
pub fn parse_roman(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }

    let lower = text.to_ascii_lowercase();
    let mut rest = lower.as_str();
    let mut value = 0;

    for (num, roman) in ROMAN_NUMERALS {
        while let Some(stripped) = rest.strip_prefix(roman) {
            value += num;
            rest = stripped;
        }
    }

    if !rest.is_empty() {
        return None;
    }

    // Reject non-canonical spellings such as "iiii" or "vx"
    match format_roman(value, false) {
        Some(canonical) if canonical == lower => Some(value),
        _ => None,
    }
}
