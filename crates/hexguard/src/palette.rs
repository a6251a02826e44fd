//! The master palette and the color sets derived from it.
//!
//! A [`Palette`] is loaded once per run. Its [`ColorSet`] is the flat,
//! read-only set of sanctioned colors that every theme is checked against,
//! together with an [`AllowList`] of colors the design system does not own.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::color::base_key;
use crate::document::Node;
use crate::error::{HexguardError, Result};
use crate::extract::{ColorExtractor, PaletteWarning};

/// Flat set of lowercase `#rrggbb` colors derived from a palette.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSet {
    colors: BTreeSet<String>,
}

impl ColorSet {
    /// Builds the set from a palette tree.
    pub fn from_node(node: &Node) -> Self {
        let (colors, _) = ColorExtractor::extract(node);
        Self { colors }
    }

    pub fn contains(&self, color: &str) -> bool {
        self.colors.contains(color)
    }

    /// True when the color's `#rrggbb` base is in this set or in `allow`.
    pub fn accepts(&self, color: &str, allow: &AllowList) -> bool {
        let key = base_key(color);
        self.contains(&key) || allow.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterates colors in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.colors.iter().map(String::as_str)
    }
}

/// Colors accepted by validation even though the palette does not define them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    colors: BTreeSet<String>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a color, normalised to its lowercase `#rrggbb` base.
    pub fn add(mut self, color: &str) -> Self {
        self.colors.insert(base_key(color.trim()));
        self
    }

    pub fn contains(&self, color: &str) -> bool {
        self.colors.contains(color)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        iter.into_iter()
            .fold(AllowList::new(), |list, c| list.add(c.as_ref()))
    }
}

/// A loaded master palette.
#[derive(Debug, Clone)]
pub struct Palette {
    source_path: Option<PathBuf>,
    document: Node,
    colors: ColorSet,
    warnings: Vec<PaletteWarning>,
}

impl Palette {
    /// Builds a palette from an already-parsed tree.
    ///
    /// `root` selects a subtree by dotted path (for example `colors`); an
    /// empty root uses the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`HexguardError::Palette`] if `root` does not resolve to a mapping.
    pub fn from_node(node: Node, root: &str) -> Result<Self> {
        let document = match node.get_path(root) {
            Some(sub @ Node::Mapping(_)) => sub.clone(),
            Some(_) => {
                return Err(HexguardError::Palette(format!(
                    "root '{}' is not a mapping",
                    root
                )))
            }
            None => {
                return Err(HexguardError::Palette(format!(
                    "root '{}' not found in palette",
                    root
                )))
            }
        };

        let (colors, warnings) = ColorExtractor::extract(&document);
        for w in &warnings {
            warn!(path = %w.path, value = %w.value, "palette leaf is not a 6- or 8-digit hex color");
        }

        Ok(Self {
            source_path: None,
            document,
            colors: ColorSet { colors },
            warnings,
        })
    }

    /// The tree the color set was extracted from (after `root` selection).
    pub fn document(&self) -> &Node {
        &self.document
    }

    pub fn colors(&self) -> &ColorSet {
        &self.colors
    }

    pub fn warnings(&self) -> &[PaletteWarning] {
        &self.warnings
    }

    /// Source file path, if loaded through [`PaletteLoader`].
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Looks up a single color by dotted token path, e.g. `dark.background.primary`.
    pub fn lookup(&self, token_path: &str) -> Option<&str> {
        self.document.get_path(token_path).and_then(Node::as_str)
    }
}

/// Subtree preferred when no root is configured.
pub const DEFAULT_PALETTE_ROOT: &str = "colors";

/// Loads the master palette document from disk.
///
/// Without an explicit [`root`](Self::root), colors come from the
/// [`DEFAULT_PALETTE_ROOT`] mapping when the document has one, and from the
/// whole document otherwise. An explicit root must exist.
#[derive(Debug, Clone, Default)]
pub struct PaletteLoader {
    root: Option<String>,
}

impl PaletteLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subtree colors are extracted from. Empty means the whole document.
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    fn select_root<'a>(&'a self, node: &Node) -> &'a str {
        match &self.root {
            Some(root) => root.as_str(),
            None if matches!(node.get_path(DEFAULT_PALETTE_ROOT), Some(Node::Mapping(_))) => {
                DEFAULT_PALETTE_ROOT
            }
            None => {
                debug!(root = DEFAULT_PALETTE_ROOT, "no default root, using whole palette");
                ""
            }
        }
    }

    /// Reads, parses and extracts the palette at `path`.
    ///
    /// # Errors
    ///
    /// A missing or unparsable palette is fatal for the run, since nothing
    /// can be validated without it.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Palette> {
        let path = path.as_ref();
        let node = Node::from_file(path)?;
        let root = self.select_root(&node);
        let mut palette = Palette::from_node(node, root)?;
        palette.source_path = Some(path.to_path_buf());
        debug!(
            path = %path.display(),
            colors = palette.colors.len(),
            "loaded master palette"
        );
        Ok(palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentFormat;

    fn json(s: &str) -> Node {
        Node::parse(s, DocumentFormat::Json).unwrap()
    }

    #[test]
    fn test_color_set_accepts_alpha_variant() {
        let set = ColorSet::from_node(&json(r##"{"brand": {"primary": "#6559d1"}}"##));
        let allow = AllowList::new();
        assert!(set.accepts("#6559D1", &allow));
        assert!(set.accepts("#6559d180", &allow));
        assert!(!set.accepts("#123456", &allow));
    }

    #[test]
    fn test_allow_list_extends_membership() {
        let set = ColorSet::default();
        let allow: AllowList = ["#1A1A1A", "#ef4444"].into_iter().collect();
        assert_eq!(allow.len(), 2);
        assert!(set.accepts("#1a1a1a", &allow));
        assert!(set.accepts("#EF4444CC", &allow));
        assert!(!set.accepts("#000000", &allow));
    }

    #[test]
    fn test_palette_root_selection() {
        let node = json(
            r##"{"name": "Sentinel", "colors": {"dark": {"background": {"primary": "#0d0a10"}}}}"##,
        );
        let palette = Palette::from_node(node, "colors").unwrap();
        assert_eq!(palette.colors().len(), 1);
        assert_eq!(palette.lookup("dark.background.primary"), Some("#0d0a10"));
        assert_eq!(palette.lookup("dark.background"), None);
    }

    #[test]
    fn test_palette_empty_root_uses_whole_document() {
        let node = json(r##"{"brand": {"primary": "#6559d1"}}"##);
        let palette = Palette::from_node(node, "").unwrap();
        assert!(palette.colors().contains("#6559d1"));
    }

    #[test]
    fn test_palette_missing_root() {
        let node = json(r##"{"brand": {"primary": "#6559d1"}}"##);
        let err = Palette::from_node(node, "colors").unwrap_err();
        assert!(matches!(err, HexguardError::Palette(_)));
    }

    #[test]
    fn test_palette_root_not_mapping() {
        let node = json(r##"{"colors": "#6559d1"}"##);
        assert!(Palette::from_node(node, "colors").is_err());
    }

    #[test]
    fn test_palette_keeps_warnings() {
        let node = json(r##"{"colors": {"bad": "#12", "good": "#123456"}}"##);
        let palette = Palette::from_node(node, "colors").unwrap();
        assert_eq!(palette.warnings().len(), 1);
        assert_eq!(palette.colors().len(), 1);
    }

    #[test]
    fn test_loader_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.yaml");
        std::fs::write(&path, "colors:\n  brand:\n    primary: \"#6559D1\"\n").unwrap();

        let palette = PaletteLoader::new().load(&path).unwrap();
        assert!(palette.colors().contains("#6559d1"));
        assert_eq!(palette.source_path(), Some(path.as_path()));
    }

    #[test]
    fn test_loader_default_root_falls_back_to_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.json");
        std::fs::write(&path, r##"{"brand": {"primary": "#6559d1"}}"##).unwrap();

        let palette = PaletteLoader::new().load(&path).unwrap();
        assert!(palette.colors().contains("#6559d1"));
        assert_eq!(palette.lookup("brand.primary"), Some("#6559d1"));
    }

    #[test]
    fn test_loader_default_root_prefers_colors_subtree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.json");
        std::fs::write(
            &path,
            r##"{"accent": "#ff0000", "colors": {"brand": {"primary": "#6559d1"}}}"##,
        )
        .unwrap();

        let palette = PaletteLoader::new().load(&path).unwrap();
        assert_eq!(palette.colors().len(), 1);
        assert!(!palette.colors().contains("#ff0000"));
    }

    #[test]
    fn test_loader_explicit_root_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.json");
        std::fs::write(&path, r##"{"brand": {"primary": "#6559d1"}}"##).unwrap();

        let err = PaletteLoader::new().root("colors").load(&path).unwrap_err();
        assert!(matches!(err, HexguardError::Palette(_)));
    }

    #[test]
    fn test_loader_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PaletteLoader::new()
            .load(dir.path().join("nope.json"))
            .unwrap_err();
        assert!(matches!(err, HexguardError::Io { .. }));
    }
}
