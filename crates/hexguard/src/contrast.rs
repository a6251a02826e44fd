//! WCAG 2.x contrast ratios for foreground/background pairs.
//!
//! Pass/fail decisions compare against fixed minimums, so the computation
//! follows the W3C definition exactly:
//!
//! - channels are normalised to `[0, 1]` and linearised with the piecewise
//!   sRGB curve (threshold `0.03928`)
//! - relative luminance is `0.2126 R + 0.7152 G + 0.0722 B`
//! - contrast ratio is `(L_lighter + 0.05) / (L_darker + 0.05)`
//!
//! The ratio lies in `[1.0, 21.0]` and does not depend on argument order.
//! Alpha bytes are ignored; colors are measured as opaque.

use std::fmt;

use serde::Deserialize;

use crate::color::HexColor;
use crate::palette::Palette;

/// WCAG AA minimum for normal-size text.
pub const AA_NORMAL_TEXT: f64 = 4.5;

/// Relaxed minimum for de-emphasized text such as comments.
pub const AA_RELAXED: f64 = 3.0;

/// Linearises one sRGB channel byte.
fn channel_to_linear(c: u8) -> f64 {
    let v = c as f64 / 255.0;
    if v <= 0.03928 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a color, in `[0.0, 1.0]`.
pub fn relative_luminance(color: HexColor) -> f64 {
    let (r, g, b) = color.channels();
    0.2126 * channel_to_linear(r) + 0.7152 * channel_to_linear(g) + 0.0722 * channel_to_linear(b)
}

/// Contrast ratio between two colors, in `[1.0, 21.0]`.
pub fn contrast_ratio(a: HexColor, b: HexColor) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// One accessibility requirement: `foreground` on `background` must reach `min_ratio`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastAssertion {
    pub name: String,
    pub background: HexColor,
    pub foreground: HexColor,
    pub min_ratio: f64,
}

impl ContrastAssertion {
    pub fn new(
        name: impl Into<String>,
        background: HexColor,
        foreground: HexColor,
        min_ratio: f64,
    ) -> Self {
        Self {
            name: name.into(),
            background,
            foreground,
            min_ratio,
        }
    }

    /// Computes the ratio and compares it to the minimum.
    pub fn check(self) -> ContrastCheck {
        let ratio = contrast_ratio(self.background, self.foreground);
        let passed = ratio >= self.min_ratio;
        ContrastCheck {
            assertion: self,
            ratio,
            passed,
        }
    }
}

/// The measured result of a [`ContrastAssertion`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastCheck {
    pub assertion: ContrastAssertion,
    pub ratio: f64,
    pub passed: bool,
}

// ─── Palette-relative assertions ────────────────────────────────────────────

/// A color in an assertion: either a literal or a palette token path.
///
/// Strings starting with `#` are literals; anything else is looked up in
/// the palette, e.g. `dark.background.primary`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ColorRef {
    Hex(HexColor),
    Token(String),
}

impl TryFrom<String> for ColorRef {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let s = s.trim();
        if s.starts_with('#') {
            HexColor::parse(s).map(ColorRef::Hex)
        } else if s.is_empty() {
            Err("empty color reference".to_string())
        } else {
            Ok(ColorRef::Token(s.to_string()))
        }
    }
}

impl ColorRef {
    /// Resolves the reference against a palette.
    pub fn resolve(&self, palette: &Palette) -> Result<HexColor, String> {
        match self {
            ColorRef::Hex(c) => Ok(*c),
            ColorRef::Token(path) => {
                let value = palette
                    .lookup(path)
                    .ok_or_else(|| format!("token '{}' not found in palette", path))?;
                HexColor::parse(value).map_err(|e| format!("token '{}': {}", path, e))
            }
        }
    }
}

impl fmt::Display for ColorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorRef::Hex(c) => write!(f, "{}", c),
            ColorRef::Token(path) => f.write_str(path),
        }
    }
}

/// An assertion as declared in configuration, before palette resolution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContrastSpec {
    pub name: String,
    pub background: ColorRef,
    pub foreground: ColorRef,
    #[serde(default = "default_min_ratio")]
    pub min_ratio: f64,
}

fn default_min_ratio() -> f64 {
    AA_NORMAL_TEXT
}

impl ContrastSpec {
    /// Resolves both colors against `palette`.
    pub fn resolve(&self, palette: &Palette) -> Result<ContrastAssertion, String> {
        Ok(ContrastAssertion::new(
            self.name.clone(),
            self.background.resolve(palette)?,
            self.foreground.resolve(palette)?,
            self.min_ratio,
        ))
    }
}

/// Result of one declared assertion.
#[derive(Debug, Clone, PartialEq)]
pub enum ContrastOutcome {
    Measured(ContrastCheck),
    /// A token path did not resolve to a color; counts as a failure.
    Unresolved { name: String, diagnostic: String },
}

impl ContrastOutcome {
    pub fn passed(&self) -> bool {
        match self {
            ContrastOutcome::Measured(check) => check.passed,
            ContrastOutcome::Unresolved { .. } => false,
        }
    }
}

/// Resolves and checks every contrast pair, preserving order.
pub fn check_all(specs: &[ContrastSpec], palette: &Palette) -> Vec<ContrastOutcome> {
    specs
        .iter()
        .map(|spec| match spec.resolve(palette) {
            Ok(assertion) => ContrastOutcome::Measured(assertion.check()),
            Err(diagnostic) => {
                tracing::warn!(name = %spec.name, error = %diagnostic, "unresolved contrast pair");
                ContrastOutcome::Unresolved {
                    name: spec.name.clone(),
                    diagnostic,
                }
            }
        })
        .collect()
}
