//! Theme validation against the master palette.
//!
//! Every color a theme references must be sanctioned: its `#rrggbb` base has
//! to appear in the palette's [`ColorSet`] or in the [`AllowList`]. Two
//! regions of a theme document are checked, in this order:
//!
//! 1. `colors`: the flat role → hex mapping, in document order
//! 2. `tokenColors`: each rule's `settings.foreground`, by position
//!
//! Validation never stops at the first finding. Each file is independent:
//! a missing file is skipped, a file that does not parse is reported as
//! malformed, and neither affects the files after it.
//!
//! # Alpha Policy
//!
//! Themes often carry 8-digit colors (`#8a76ff20`) for translucent UI
//! surfaces. [`AlphaPolicy`] decides what these must satisfy:
//!
//! | Policy | `#8a76ff20` passes when |
//! |--------|-------------------------|
//! | [`StrictBaseOnly`](AlphaPolicy::StrictBaseOnly) (default) | `#8a76ff` is sanctioned |
//! | [`AcceptExtendedAlpha`](AlphaPolicy::AcceptExtendedAlpha) | always (any 8 hex digits) |
//!
//! 6-digit colors are treated the same under both policies.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::color::is_extended_shape;
use crate::document::DocumentFormat;
use crate::palette::{AllowList, ColorSet};

/// How 8-digit (alpha-suffixed) color values are validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum AlphaPolicy {
    /// The alpha byte is dropped and the base color must be sanctioned.
    #[default]
    #[serde(rename = "strict", alias = "strict_base_only")]
    StrictBaseOnly,
    /// Any well-formed 8-digit value is accepted without a membership check.
    #[serde(rename = "extended", alias = "accept_extended_alpha")]
    AcceptExtendedAlpha,
}

impl AlphaPolicy {
    /// Returns the policy name as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlphaPolicy::StrictBaseOnly => "strict",
            AlphaPolicy::AcceptExtendedAlpha => "extended",
        }
    }
}

impl FromStr for AlphaPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" | "strictbaseonly" | "strict_base_only" => Ok(AlphaPolicy::StrictBaseOnly),
            "extended" | "acceptextendedalpha" | "accept_extended_alpha" => {
                Ok(AlphaPolicy::AcceptExtendedAlpha)
            }
            _ => Err(format!(
                "Unknown alpha policy: {} (expected 'strict' or 'extended')",
                s
            )),
        }
    }
}

impl fmt::Display for AlphaPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Theme documents ────────────────────────────────────────────────────────

/// One entry of a theme's `tokenColors` sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRule {
    /// The rule's `name`, when it has a string one.
    pub name: Option<String>,
    /// `settings.foreground`, when it is a string.
    pub foreground: Option<String>,
}

/// The parts of a theme document that reference colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeDocument {
    /// `colors` entries with string values, in document order.
    pub colors: Vec<(String, String)>,
    /// `tokenColors` rules, in document order.
    pub token_colors: Vec<TokenRule>,
}

#[derive(Deserialize)]
struct RawTheme {
    #[serde(default)]
    colors: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, rename = "tokenColors")]
    token_colors: Option<Vec<RawTokenRule>>,
}

#[derive(Deserialize)]
struct RawTokenRule {
    #[serde(default)]
    name: Option<serde_json::Value>,
    #[serde(default)]
    settings: Option<RawSettings>,
}

#[derive(Deserialize)]
struct RawSettings {
    #[serde(default)]
    foreground: Option<serde_json::Value>,
}

fn string_of(value: Option<serde_json::Value>) -> Option<String> {
    match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    }
}

impl ThemeDocument {
    /// Parses theme content. Both regions are optional.
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self, String> {
        let raw: RawTheme = format.parse_as(content)?;

        let colors = raw
            .colors
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| string_of(Some(value)).map(|v| (key, v)))
            .collect();

        let token_colors = raw
            .token_colors
            .unwrap_or_default()
            .into_iter()
            .map(|rule| TokenRule {
                name: string_of(rule.name),
                foreground: string_of(rule.settings.and_then(|s| s.foreground)),
            })
            .collect();

        Ok(Self {
            colors,
            token_colors,
        })
    }
}

// ─── Findings ───────────────────────────────────────────────────────────────

/// Where in a theme an offending color was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A key of the flat `colors` mapping.
    ColorKey(String),
    /// A position in `tokenColors`.
    TokenIndex(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::ColorKey(key) => f.write_str(key),
            Location::TokenIndex(index) => write!(f, "tokenColors[{}]", index),
        }
    }
}

/// A referenced color that is neither in the palette nor allow-listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File identifier (file name for files on disk).
    pub file: String,
    pub location: Location,
    /// The value as written in the theme.
    pub value: String,
}

/// Result of validating one theme file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file does not exist. Not a finding.
    Skipped,
    /// The file could not be read or parsed; no checks ran.
    Malformed { diagnostic: String },
    /// The file was checked.
    Checked {
        /// Number of color references examined.
        checked: usize,
        violations: Vec<Violation>,
    },
}

impl FileOutcome {
    /// True unless the file was malformed or had violations.
    pub fn passed(&self) -> bool {
        match self {
            FileOutcome::Skipped => true,
            FileOutcome::Malformed { .. } => false,
            FileOutcome::Checked { violations, .. } => violations.is_empty(),
        }
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            FileOutcome::Checked { violations, .. } => violations,
            _ => &[],
        }
    }
}

/// A validated theme file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Short identifier (the file name).
    pub id: String,
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

// ─── Validator ──────────────────────────────────────────────────────────────

/// Checks theme documents against a color set, an allow-list and an alpha policy.
#[derive(Debug, Clone, Copy)]
pub struct ThemeColorValidator<'a> {
    colors: &'a ColorSet,
    allow: &'a AllowList,
    policy: AlphaPolicy,
}

impl<'a> ThemeColorValidator<'a> {
    pub fn new(colors: &'a ColorSet, allow: &'a AllowList, policy: AlphaPolicy) -> Self {
        Self {
            colors,
            allow,
            policy,
        }
    }

    pub fn policy(&self) -> AlphaPolicy {
        self.policy
    }

    /// True when `value` passes membership under the configured policy.
    pub fn is_sanctioned(&self, value: &str) -> bool {
        if self.colors.accepts(value, self.allow) {
            return true;
        }
        self.policy == AlphaPolicy::AcceptExtendedAlpha && is_extended_shape(value)
    }

    /// Validates an already-parsed document, identified by `file` in findings.
    pub fn validate_document(&self, file: &str, theme: &ThemeDocument) -> FileOutcome {
        let mut checked = 0;
        let mut violations = Vec::new();

        for (key, value) in &theme.colors {
            if !value.starts_with('#') {
                continue;
            }
            checked += 1;
            if !self.is_sanctioned(value) {
                debug!(file, key = %key, value = %value, "unknown color");
                violations.push(Violation {
                    file: file.to_string(),
                    location: Location::ColorKey(key.clone()),
                    value: value.clone(),
                });
            }
        }

        for (index, rule) in theme.token_colors.iter().enumerate() {
            let Some(value) = rule.foreground.as_deref() else {
                continue;
            };
            if !value.starts_with('#') {
                continue;
            }
            checked += 1;
            if !self.is_sanctioned(value) {
                debug!(file, index, value = %value, "unknown token color");
                violations.push(Violation {
                    file: file.to_string(),
                    location: Location::TokenIndex(index),
                    value: value.to_string(),
                });
            }
        }

        FileOutcome::Checked {
            checked,
            violations,
        }
    }

    /// Reads, parses and validates the theme at `path`.
    pub fn validate_file<P: AsRef<Path>>(&self, path: P) -> FileReport {
        let path = path.as_ref();
        let id = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());

        let outcome = self.outcome_for(&id, path);
        FileReport {
            id,
            path: path.to_path_buf(),
            outcome,
        }
    }

    fn outcome_for(&self, id: &str, path: &Path) -> FileOutcome {
        if !path.exists() {
            debug!(path = %path.display(), "theme file missing, skipping");
            return FileOutcome::Skipped;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read theme");
                return FileOutcome::Malformed {
                    diagnostic: format!("failed to read: {}", e),
                };
            }
        };

        match ThemeDocument::parse(&content, DocumentFormat::from_path(path)) {
            Ok(theme) => self.validate_document(id, &theme),
            Err(message) => {
                warn!(path = %path.display(), error = %message, "malformed theme document");
                FileOutcome::Malformed {
                    diagnostic: message,
                }
            }
        }
    }
}
