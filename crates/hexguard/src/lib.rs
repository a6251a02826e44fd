//! # hexguard - Palette Consistency and Contrast Checks for Themes
//!
//! `hexguard` checks that every color referenced by a set of theme files comes
//! from a single master palette, and that chosen foreground/background pairs
//! meet WCAG AA contrast minimums.
//!
//! ## Core Concepts
//!
//! - [`Palette`]: the master palette, loaded once; its [`ColorSet`] is the flat
//!   set of sanctioned `#rrggbb` colors
//! - [`AllowList`]: colors accepted even though the palette does not own them
//! - [`ThemeColorValidator`]: checks a theme's `colors` and `tokenColors`
//!   against `ColorSet ∪ AllowList` under an [`AlphaPolicy`]
//! - [`contrast_ratio`]: the WCAG relative-luminance contrast ratio
//! - [`Report`]: ordered results, rendered text, and the pass/fail signal
//!
//! ## Data Flow
//!
//! ```text
//! palette document ──► ColorExtractor ──► ColorSet ──┐
//!                                                    ├─► ThemeColorValidator (per file) ──┐
//!                                         AllowList ─┘                                    ├─► Reporter
//! contrast pairs ──────────────────────► contrast_ratio ─────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hexguard::{AllowList, AlphaPolicy, ColorSet, DocumentFormat, Node, ThemeColorValidator, ThemeDocument};
//!
//! let palette = Node::parse(r##"{"brand": {"primary": "#6559d1"}}"##, DocumentFormat::Json).unwrap();
//! let colors = ColorSet::from_node(&palette);
//! let allow = AllowList::new();
//! let validator = ThemeColorValidator::new(&colors, &allow, AlphaPolicy::default());
//!
//! let theme = ThemeDocument::parse(
//!     r##"{"colors": {"editor.background": "#123456"}}"##,
//!     DocumentFormat::Json,
//! ).unwrap();
//!
//! let outcome = validator.validate_document("dark.json", &theme);
//! assert_eq!(outcome.violations().len(), 1);
//! assert_eq!(outcome.violations()[0].value, "#123456");
//! ```
//!
//! ## Contrast
//!
//! ```rust
//! use hexguard::{contrast_ratio, ContrastAssertion, HexColor, AA_NORMAL_TEXT};
//!
//! let ratio = contrast_ratio(HexColor::BLACK, HexColor::WHITE);
//! assert!((ratio - 21.0).abs() < 1e-9);
//!
//! let bg = HexColor::parse("#0d0a10").unwrap();
//! let check = ContrastAssertion::new("Same color", bg, bg, AA_NORMAL_TEXT).check();
//! assert!(!check.passed);
//! ```

pub mod color;
pub mod config;
pub mod contrast;
pub mod document;
mod error;
pub mod extract;
pub mod palette;
pub mod report;
mod run;
pub mod validate;

pub use color::{base_key, is_extended_shape, is_hex_shape, HexColor};
pub use config::{
    default_contrast, Config, PaletteConfig, CONFIG_FILE_NAMES, DEFAULT_ALLOWED_UI_COLORS,
    DEFAULT_THEMES,
};
pub use contrast::{
    check_all, contrast_ratio, relative_luminance, ColorRef, ContrastAssertion, ContrastCheck,
    ContrastOutcome, ContrastSpec, AA_NORMAL_TEXT, AA_RELAXED,
};
pub use document::{DocumentFormat, Node};
pub use error::{HexguardError, Result};
pub use extract::{walk, ColorExtractor, NodeVisitor, PaletteWarning};
pub use palette::{AllowList, ColorSet, Palette, PaletteLoader, DEFAULT_PALETTE_ROOT};
pub use report::{PaletteSummary, Report, Reporter};
pub use run::run;
pub use validate::{
    AlphaPolicy, FileOutcome, FileReport, Location, ThemeColorValidator, ThemeDocument, TokenRule,
    Violation,
};
