//! Hex color values as they appear in palettes and theme files.
//!
//! Supports two formats:
//!
//! - RGB hex: `"#6559d1"` (6 digits)
//! - RGBA hex: `"#8a76ff20"` (8 digits, trailing alpha byte)
//!
//! Parsing is case-insensitive. The canonical form is lowercase, which is
//! what [`HexColor`]'s `Display` produces and what palette membership uses.
//!
//! # Example
//!
//! ```rust
//! use hexguard::HexColor;
//!
//! let brand = HexColor::parse("#6559D1").unwrap();
//! assert_eq!(brand.to_string(), "#6559d1");
//!
//! let selection = HexColor::parse("#8a76ff20").unwrap();
//! assert_eq!(selection.alpha(), Some(0x20));
//! assert_eq!(selection.base().to_string(), "#8a76ff");
//! ```

use std::fmt;
use std::str::FromStr;

/// A parsed sRGB hex color with an optional alpha byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
    alpha: Option<u8>,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor::rgb(0, 0, 0);
    pub const WHITE: HexColor = HexColor::rgb(255, 255, 255);

    /// Creates an opaque color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha: None,
        }
    }

    /// Parses a color from a string value.
    ///
    /// Accepts `#rrggbb` and `#rrggbbaa`. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("Invalid hex color: {} (missing '#')", s))?;
        Self::parse_hex(hex)
    }

    /// Parses the digits of a hex color (without the # prefix).
    fn parse_hex(hex: &str) -> Result<Self, String> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("Invalid hex: {}", hex));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("Invalid hex: {}", hex))
        };

        match hex.len() {
            // 6-digit hex: #rrggbb
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            // 8-digit hex: #rrggbbaa
            8 => Ok(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                alpha: Some(channel(6)?),
            }),
            _ => Err(format!(
                "Invalid hex color: #{} (must be 6 or 8 digits)",
                hex
            )),
        }
    }

    /// Returns the red, green and blue channels.
    pub fn channels(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Returns the alpha byte, if the color was written with one.
    pub fn alpha(&self) -> Option<u8> {
        self.alpha
    }

    /// Returns the opaque base color (alpha dropped).
    pub fn base(&self) -> Self {
        Self::rgb(self.r, self.g, self.b)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if let Some(a) = self.alpha {
            write!(f, "{:02x}", a)?;
        }
        Ok(())
    }
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// True when `s` is exactly `#` followed by six hex digits.
pub fn is_hex_shape(s: &str) -> bool {
    digits_of_len(s, 6)
}

/// True when `s` is exactly `#` followed by eight hex digits.
pub fn is_extended_shape(s: &str) -> bool {
    digits_of_len(s, 8)
}

fn digits_of_len(s: &str, len: usize) -> bool {
    s.strip_prefix('#')
        .is_some_and(|hex| hex.len() == len && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Truncates a color reference to its `#rrggbb` prefix and lowercases it.
///
/// This is the key used for palette membership. It does not validate: a
/// short or malformed value simply produces a key no palette will contain.
pub fn base_key(value: &str) -> String {
    value.chars().take(7).collect::<String>().to_lowercase()
}
