//! Safe navigation over loosely-typed, tree-shaped values.
//!
//! Raw k6 summaries may omit any key at any depth. Instead of repeating
//! defensive access chains per field, every read goes through [`navigate`] or
//! [`number_or_zero`], which treat a missing segment the same as a missing
//! leaf.

/// A node of a tree-shaped document that can be walked by string keys.
pub trait TreeNode {
    /// Child stored under `key`, if this node is a mapping that has one.
    fn child(&self, key: &str) -> Option<&Self>;

    /// Numeric value of a leaf, if this node is a number.
    fn as_number(&self) -> Option<f64>;
}

impl TreeNode for serde_json::Value {
    fn child(&self, key: &str) -> Option<&Self> {
        self.as_object()?.get(key)
    }

    fn as_number(&self) -> Option<f64> {
        self.as_f64()
    }
}

/// Follow `path` from `root`, returning `None` as soon as a segment is absent.
pub fn navigate<'a, T: TreeNode>(root: &'a T, path: &[&str]) -> Option<&'a T> {
    path.iter().try_fold(root, |node, key| node.child(key))
}

/// Read the number at `path`, substituting `0.0` when any segment is missing
/// or the leaf is not numeric.
pub fn number_or_zero<T: TreeNode>(root: &T, path: &[&str]) -> f64 {
    navigate(root, path)
        .and_then(TreeNode::as_number)
        .unwrap_or(0.0)
}

/// Whether a node exists at `path`.
pub fn contains<T: TreeNode>(root: &T, path: &[&str]) -> bool {
    navigate(root, path).is_some()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
