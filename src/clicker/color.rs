//! Hex color parsing, blending, and contrast helpers.
//!
//! Every color that enters the game state goes through [`HexColor::parse`],
//! so the state only ever holds normalized `#rrggbb` values.

use std::fmt;
use std::str::FromStr;

/// Colors offered in the assignment palette from the start.
pub const DEFAULT_COLORS: &[&str] = &[
    "#ff6b6b", // Red
    "#4ecdc4", // Teal
    "#45b7d1", // Blue
    "#96ceb4", // Green
    "#feca57", // Yellow
    "#ff9ff3", // Pink
    "#54a0ff", // Light Blue
    "#5f27cd", // Purple
];

/// Colors unlocked once enough colors have been discovered.
pub const SPECIAL_COLORS: &[&str] = &["#ffffff", "#000000"];

/// Discovered color count that unlocks [`SPECIAL_COLORS`].
pub const COLORS_NEEDED_FOR_SPECIAL: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color {0:?}: expected 3 or 6 hex digits")]
    InvalidHex(String),
}

/// A normalized 24-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Text color to draw on top of a swatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contrast {
    Black,
    White,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb`, `rgb` or `rrggbb` (any case).
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(input.to_string());
        let digits = input.strip_prefix('#').unwrap_or(input);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map_err(|_| invalid());
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());

        match digits.len() {
            3 => Ok(Self::new(
                nibble(0)? * 0x11,
                nibble(1)? * 0x11,
                nibble(2)? * 0x11,
            )),
            6 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?)),
            _ => Err(invalid()),
        }
    }

    /// Componentwise floor average of two colors.
    pub fn blend(self, other: HexColor) -> HexColor {
        let avg = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        HexColor::new(
            avg(self.r, other.r),
            avg(self.g, other.g),
            avg(self.b, other.b),
        )
    }

    /// Relative luminance with sRGB gamma correction, in `0.0..=1.0`.
    pub fn luminance(self) -> f64 {
        let linear = |c: u8| {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    pub fn contrast(self) -> Contrast {
        if self.luminance() > 0.5 {
            Contrast::Black
        } else {
            Contrast::White
        }
    }

    /// CSS `rgba(...)` form with the given opacity.
    pub fn to_rgba(self, opacity: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, opacity)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HexColor::parse(s)
    }
}

/// Strict check: a leading `#` followed by exactly 3 or 6 hex digits.
pub fn is_valid_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Normalize to lowercase `#rrggbb`.
pub fn normalize_hex_color(color: &str) -> Result<String, ColorError> {
    Ok(HexColor::parse(color)?.to_string())
}

/// Blend two color strings. Both are normalized before averaging.
pub fn blend_colors(a: &str, b: &str) -> Result<String, ColorError> {
    Ok(HexColor::parse(a)?.blend(HexColor::parse(b)?).to_string())
}

pub fn contrast_color(background: &str) -> Result<Contrast, ColorError> {
    Ok(HexColor::parse(background)?.contrast())
}

/// Palette offered for assignment given how many colors were discovered.
pub fn available_palette(discovered: usize) -> Vec<HexColor> {
    let special = if discovered >= COLORS_NEEDED_FOR_SPECIAL {
        SPECIAL_COLORS
    } else {
        &[]
    };
    DEFAULT_COLORS
        .iter()
        .chain(special.iter())
        .filter_map(|c| HexColor::parse(c).ok())
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_color() -> impl Strategy<Value = HexColor> {
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| HexColor::new(r, g, b))
    }

    proptest! {
        #[test]
        fn prop_blend_with_self_is_identity(c in arb_color()) {
            prop_assert_eq!(c.blend(c), c);
        }

        #[test]
        fn prop_blend_is_commutative(a in arb_color(), b in arb_color()) {
            prop_assert_eq!(a.blend(b), b.blend(a));
        }

        #[test]
        fn prop_blend_channels_between_inputs(a in arb_color(), b in arb_color()) {
            let m = a.blend(b);
            prop_assert!(m.r >= a.r.min(b.r) && m.r <= a.r.max(b.r));
            prop_assert!(m.g >= a.g.min(b.g) && m.g <= a.g.max(b.g));
            prop_assert!(m.b >= a.b.min(b.b) && m.b <= a.b.max(b.b));
        }

        #[test]
        fn prop_display_parses_back(c in arb_color()) {
            let s = c.to_string();
            prop_assert!(is_valid_hex_color(&s));
            prop_assert_eq!(HexColor::parse(&s).unwrap(), c);
        }

        #[test]
        fn prop_uppercase_input_normalizes(c in arb_color()) {
            let upper = c.to_string().to_uppercase();
            prop_assert_eq!(normalize_hex_color(&upper).unwrap(), c.to_string());
        }

        #[test]
        fn prop_luminance_in_unit_range(c in arb_color()) {
            let l = c.luminance();
            prop_assert!((0.0..=1.0 + 1e-9).contains(&l));
        }
    }
}
