//! Run configuration.
//!
//! A run is described by a small YAML (or JSON) file, by default
//! `hexguard.yaml` in the working directory:
//!
//! ```yaml
//! palette:
//!   path: colors.json
//!   root: colors
//!
//! themes:
//!   - vscode/themes/sentinel-dark-color-theme.json
//!   - vscode/themes/sentinel-light-color-theme.json
//!
//! alpha_policy: strict
//!
//! allow:
//!   - "#1a1a1a"
//!   - "#362d59"
//!
//! contrast:
//!   - name: "Dark: Primary text on background"
//!     background: dark.background.primary
//!     foreground: dark.foreground.primary
//!   - name: "Dark: Comments on background"
//!     background: dark.background.primary
//!     foreground: dark.syntax.comment
//!     min_ratio: 3.0
//! ```
//!
//! Every section is optional. Relative paths resolve against the directory
//! holding the configuration file. Themes are validated in the order listed.
//!
//! Without a configuration file, [`Config::default_for`] checks the Sentinel
//! theme layout: the three VS Code themes under `vscode/themes/`, the
//! built-in UI allow-list, and the five WCAG pairs of the dark and light
//! palettes.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::color::{is_extended_shape, is_hex_shape};
use crate::contrast::{ColorRef, ContrastSpec, AA_NORMAL_TEXT, AA_RELAXED};
use crate::document::DocumentFormat;
use crate::error::{HexguardError, Result};
use crate::palette::AllowList;
use crate::validate::AlphaPolicy;

/// File names probed by [`Config::discover`], in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &["hexguard.yaml", "hexguard.yml", "hexguard.json"];

/// Theme files checked when no configuration file exists.
pub const DEFAULT_THEMES: &[&str] = &[
    "vscode/themes/sentinel-dark-color-theme.json",
    "vscode/themes/sentinel-light-color-theme.json",
    "vscode/themes/sentinel-midnight-color-theme.json",
];

/// Editor chrome, terminal and syntax colors accepted without being in the
/// palette, used when no configuration file exists.
pub const DEFAULT_ALLOWED_UI_COLORS: &[&str] = &[
    // Grays and neutrals
    "#1a1a1a", "#141119", "#2a2438", "#3f3f46", "#71717a", "#a1a1aa", "#d1d5db", "#e4e4e7",
    "#f9fafb", "#f8fafc", "#fefefe", "#6b7280", "#9ca3af", "#374151", "#1f2937", "#6a6772",
    "#302e36", "#3e3b45", "#b8b8c8",
    // Editor UI
    "#362d59", "#f8f8f9", "#d9008d", "#3f00a7", "#8a76ff", "#998bff", "#e5e7eb",
    // Terminal ANSI bright
    "#f87171", "#34d399", "#fbbf24", "#3b82f6", "#f472b6", "#06b6d4", "#818cf8", "#d8ab5a",
    "#67e8f9", "#0891b2",
    // Errors and warnings
    "#ef4444", "#f59e0b", "#ffd00e",
    // Brand
    "#6559d1", "#e1567c", "#f4834f", "#226dfc",
    // Syntax
    "#ff9838", "#10b981", "#7c3aed", "#a794ff", "#cdcbff", "#bab6ff", "#ebd0a3", "#f4e4c9",
    "#e1bd7d", "#b5006f", "#bf8600", "#c97c00",
];

/// Contrast pairs checked when no configuration file exists.
pub fn default_contrast() -> Vec<ContrastSpec> {
    let pair = |name: &str, background: &str, foreground: &str, min_ratio: f64| ContrastSpec {
        name: name.to_string(),
        background: ColorRef::Token(background.to_string()),
        foreground: ColorRef::Token(foreground.to_string()),
        min_ratio,
    };
    vec![
        pair(
            "Dark: Primary text on background",
            "dark.background.primary",
            "dark.foreground.primary",
            AA_NORMAL_TEXT,
        ),
        pair(
            "Dark: Secondary text on background",
            "dark.background.primary",
            "dark.foreground.secondary",
            AA_NORMAL_TEXT,
        ),
        pair(
            "Dark: Comments on background",
            "dark.background.primary",
            "dark.syntax.comment",
            AA_RELAXED,
        ),
        pair(
            "Light: Primary text on background",
            "light.background.primary",
            "light.foreground.primary",
            AA_NORMAL_TEXT,
        ),
        pair(
            "Light: Secondary text on background",
            "light.background.primary",
            "light.foreground.secondary",
            AA_NORMAL_TEXT,
        ),
    ]
}

/// Where the master palette lives and which subtree holds the colors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaletteConfig {
    #[serde(default = "default_palette_path")]
    pub path: PathBuf,
    /// Dotted path of the subtree to extract from; empty for the whole document.
    ///
    /// When unset, the `colors` subtree is used if present, else the whole
    /// document. A configured root that does not exist is an error.
    #[serde(default)]
    pub root: Option<String>,
}

fn default_palette_path() -> PathBuf {
    PathBuf::from("colors.json")
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            path: default_palette_path(),
            root: None,
        }
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub palette: PaletteConfig,
    /// Theme documents, validated in this order.
    #[serde(default)]
    pub themes: Vec<PathBuf>,
    /// Extra sanctioned colors (`#rrggbb` or `#rrggbbaa`).
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub alpha_policy: AlphaPolicy,
    #[serde(default)]
    pub contrast: Vec<ContrastSpec>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Config {
    /// Built-in configuration rooted at `base_dir`, used when no file exists.
    pub fn default_for(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            palette: PaletteConfig::default(),
            themes: DEFAULT_THEMES.iter().map(PathBuf::from).collect(),
            allow: DEFAULT_ALLOWED_UI_COLORS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            alpha_policy: AlphaPolicy::default(),
            contrast: default_contrast(),
            base_dir: base_dir.into(),
        }
    }

    /// Parses configuration content; relative paths resolve against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`HexguardError::Parse`] on malformed content and
    /// [`HexguardError::Config`] if an allow-list entry is not a hex color.
    pub fn parse(content: &str, format: DocumentFormat, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut config: Config = format
            .parse_as(content)
            .map_err(|message| HexguardError::parse(None, message))?;
        config.base_dir = base_dir.into();
        config.check()?;
        Ok(config)
    }

    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| HexguardError::io(path, e))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::parse(&content, DocumentFormat::from_path(path), base_dir).map_err(|e| match e {
            HexguardError::Parse { message, .. } => {
                HexguardError::parse(Some(path.to_path_buf()), message)
            }
            other => other,
        })
    }

    /// Loads the first of [`CONFIG_FILE_NAMES`] found in `dir`, or the defaults.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "using configuration file");
                return Self::from_file(candidate);
            }
        }
        debug!(dir = %dir.display(), "no configuration file, using defaults");
        Ok(Self::default_for(dir))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolves a configured path against [`base_dir`](Self::base_dir).
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn palette_path(&self) -> PathBuf {
        self.resolve(&self.palette.path)
    }

    /// Theme paths, resolved, in declared order.
    pub fn theme_paths(&self) -> Vec<PathBuf> {
        self.themes.iter().map(|p| self.resolve(p)).collect()
    }

    pub fn allow_list(&self) -> AllowList {
        self.allow.iter().collect()
    }

    fn check(&self) -> Result<()> {
        for color in &self.allow {
            let color = color.trim();
            if !is_hex_shape(color) && !is_extended_shape(color) {
                return Err(HexguardError::Config(format!(
                    "allow-list entry '{}' is not a 6- or 8-digit hex color",
                    color
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default_for("/work");
        assert_eq!(config.palette_path(), PathBuf::from("/work/colors.json"));
        assert_eq!(config.palette.root, None);
        assert_eq!(
            config.theme_paths()[0],
            PathBuf::from("/work/vscode/themes/sentinel-dark-color-theme.json")
        );
        assert_eq!(config.themes.len(), 3);
        assert_eq!(config.alpha_policy, AlphaPolicy::StrictBaseOnly);
    }

    #[test]
    fn test_default_allow_list_is_valid() {
        let config = Config::default_for("/work");
        assert!(config.check().is_ok());
        let allow = config.allow_list();
        assert_eq!(allow.len(), DEFAULT_ALLOWED_UI_COLORS.len());
        assert!(allow.contains("#362d59"));
    }

    #[test]
    fn test_default_contrast_pairs() {
        let contrast = default_contrast();
        assert_eq!(contrast.len(), 5);
        assert_eq!(
            contrast[2].foreground,
            ColorRef::Token("dark.syntax.comment".to_string())
        );
        assert_eq!(contrast[2].min_ratio, AA_RELAXED);
        assert!(contrast
            .iter()
            .enumerate()
            .all(|(i, c)| i == 2 || c.min_ratio == AA_NORMAL_TEXT));
    }

    #[test]
    fn test_config_file_replaces_defaults() {
        let config = Config::parse("themes: [only.json]\n", DocumentFormat::Yaml, "").unwrap();
        assert_eq!(config.themes, vec![PathBuf::from("only.json")]);
        assert!(config.allow.is_empty());
        assert!(config.contrast.is_empty());
        assert_eq!(config.palette.root, None);
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r##"
palette:
  path: design/colors.json
  root: ""
themes:
  - themes/dark.json
  - /abs/light.json
alpha_policy: extended
allow:
  - "#1A1A1A"
contrast:
  - name: Primary
    background: dark.background.primary
    foreground: "#ffffff"
"##;
        let config = Config::parse(yaml, DocumentFormat::Yaml, "/repo").unwrap();
        assert_eq!(
            config.palette_path(),
            PathBuf::from("/repo/design/colors.json")
        );
        assert_eq!(config.palette.root.as_deref(), Some(""));
        assert_eq!(
            config.theme_paths(),
            vec![
                PathBuf::from("/repo/themes/dark.json"),
                PathBuf::from("/abs/light.json")
            ]
        );
        assert_eq!(config.alpha_policy, AlphaPolicy::AcceptExtendedAlpha);
        assert!(config.allow_list().contains("#1a1a1a"));
        assert_eq!(config.contrast.len(), 1);
        assert_eq!(
            config.contrast[0].background,
            ColorRef::Token("dark.background.primary".to_string())
        );
        assert_eq!(config.contrast[0].min_ratio, AA_NORMAL_TEXT);
    }

    #[test]
    fn test_parse_json() {
        let json = r##"{"themes": ["a.json"], "alpha_policy": "strict"}"##;
        let config = Config::parse(json, DocumentFormat::Json, "").unwrap();
        assert_eq!(config.themes, vec![PathBuf::from("a.json")]);
    }

    #[test]
    fn test_rejects_bad_allow_entry() {
        let err = Config::parse("allow: [\"#fff\"]\n", DocumentFormat::Yaml, "").unwrap_err();
        assert!(matches!(err, HexguardError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = Config::parse("themez: []\n", DocumentFormat::Yaml, "").unwrap_err();
        assert!(matches!(err, HexguardError::Parse { .. }));
    }

    #[test]
    fn test_rejects_unknown_alpha_policy() {
        assert!(Config::parse("alpha_policy: lenient\n", DocumentFormat::Yaml, "").is_err());
    }

    #[test]
    fn test_discover_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.base_dir(), dir.path());
        assert_eq!(config.contrast.len(), 5);
    }

    #[test]
    fn test_discover_prefers_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hexguard.yaml"), "themes: [from-yaml.json]\n").unwrap();
        std::fs::write(dir.path().join("hexguard.json"), r#"{"themes": ["from-json.json"]}"#)
            .unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.themes, vec![PathBuf::from("from-yaml.json")]);
    }

    #[test]
    fn test_from_file_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hexguard.yaml");
        std::fs::write(&path, "themes: [unclosed\n").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("hexguard.yaml"));
    }
}
