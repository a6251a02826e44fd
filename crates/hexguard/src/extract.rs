//! Color extraction from arbitrarily nested palette documents.
//!
//! The walk is split in two: [`walk`] drives a depth-first traversal over a
//! [`Node`] tree and reports every string leaf to a [`NodeVisitor`] together
//! with its token path; [`ColorExtractor`] is the visitor that keeps the
//! leaves that look like colors.
//!
//! ```text
//! {"brand": {"primary": "#6559D1", "accent": ["#E1567C", "#f4834f80"]}}
//!     │
//!     ▼ walk()
//! brand.primary    = "#6559D1"
//! brand.accent.0   = "#E1567C"
//! brand.accent.1   = "#f4834f80"
//!     │
//!     ▼ ColorExtractor
//! {"#6559d1", "#e1567c", "#f4834f"}
//! ```

use std::collections::BTreeSet;

use crate::color::{base_key, is_extended_shape, is_hex_shape};
use crate::document::Node;

/// Receives string leaves during a [`walk`].
pub trait NodeVisitor {
    /// Called once per [`Node::Scalar`], in document order.
    ///
    /// `path` holds the mapping keys (and sequence indices) leading to the leaf.
    fn visit_scalar(&mut self, path: &[String], value: &str);
}

/// Walks `node` depth-first, reporting every scalar leaf to `visitor`.
pub fn walk<V: NodeVisitor + ?Sized>(node: &Node, visitor: &mut V) {
    let mut path = Vec::new();
    walk_inner(node, &mut path, visitor);
}

fn walk_inner<V: NodeVisitor + ?Sized>(node: &Node, path: &mut Vec<String>, visitor: &mut V) {
    match node {
        Node::Scalar(value) => visitor.visit_scalar(path, value),
        Node::Mapping(entries) => {
            for (key, child) in entries {
                path.push(key.clone());
                walk_inner(child, path, visitor);
                path.pop();
            }
        }
        Node::Sequence(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(index.to_string());
                walk_inner(child, path, visitor);
                path.pop();
            }
        }
        Node::Other => {}
    }
}

/// A `#`-prefixed leaf that is not a 6- or 8-digit hex color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteWarning {
    /// Dotted token path of the leaf.
    pub path: String,
    /// The leaf value as written.
    pub value: String,
}

/// Collects hex color leaves into a flat, lowercase set.
///
/// 8-digit values are reduced to their `#rrggbb` base, so every collected
/// color has the shape `#[0-9a-f]{6}`.
#[derive(Debug, Default)]
pub struct ColorExtractor {
    colors: BTreeSet<String>,
    warnings: Vec<PaletteWarning>,
}

impl ColorExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks `node` and returns the collected colors and warnings.
    pub fn extract(node: &Node) -> (BTreeSet<String>, Vec<PaletteWarning>) {
        let mut extractor = Self::new();
        walk(node, &mut extractor);
        (extractor.colors, extractor.warnings)
    }
}

impl NodeVisitor for ColorExtractor {
    fn visit_scalar(&mut self, path: &[String], value: &str) {
        if !value.starts_with('#') {
            return;
        }
        if is_hex_shape(value) || is_extended_shape(value) {
            self.colors.insert(base_key(value));
        } else {
            self.warnings.push(PaletteWarning {
                path: path.join("."),
                value: value.to_string(),
            });
        }
    }
}
