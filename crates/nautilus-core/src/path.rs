//! Textual path resolution
//!
//! A raw path is turned into an [`FsPath`] in one of two ways:
//!
//! * [`FsPath::lexical`] collapses `.`, `..` and empty components purely on
//!   the text, never looking at the tree.
//! * [`FsPath::eager`] walks the real tree component by component and records
//!   whether the walk reached an existing node.
//!
//! Both start from the components of the current directory when the path is
//! relative, and both check every raw component against [`is_valid_name`].

use std::fmt;

use tracing::trace;

use crate::tree::{FsTree, NodeId};

/// A path component or user name is valid when every character is
/// alphanumeric, a space, `-`, `.` or `_`.
pub fn is_valid_name(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '.' | '_'))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SemanticStatus {
    Pending,
    Success,
    Error,
}

/// Which algorithm produced an [`FsPath`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Lexical,
    Eager(SemanticStatus),
}

/// Absolute location split into ancestor names and a final component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsPath {
    levels: Vec<String>,
    file_name: Option<String>,
    valid: bool,
    resolution: Resolution,
}

impl FsPath {
    pub fn root() -> Self {
        Self {
            levels: Vec::new(),
            file_name: None,
            valid: true,
            resolution: Resolution::Lexical,
        }
    }

    /// Resolves `raw` on its text alone. `..` above the root is dropped.
    pub fn lexical(tree: &FsTree, pwd: NodeId, raw: &str) -> Self {
        let (components, valid) = Self::split(tree, pwd, raw);

        let mut collected: Vec<String> = Vec::new();
        for component in components {
            match component.as_str() {
                ".." => {
                    collected.pop();
                }
                "." | "" => {}
                _ => collected.push(component),
            }
        }

        let mut path = Self::from_components(collected);
        path.valid = valid;
        path
    }

    /// Resolves `raw` by walking the tree. The walk stops at the first
    /// component that does not exist and the status becomes `Error`.
    pub fn eager(tree: &FsTree, pwd: NodeId, raw: &str) -> Self {
        let (components, valid) = Self::split(tree, pwd, raw);

        let mut status = SemanticStatus::Pending;
        let mut current = tree.root();
        for component in &components {
            match component.as_str() {
                ".." => {
                    if let Ok(parent) = tree.node(current).map(|node| node.parent()) {
                        current = parent.unwrap_or(current);
                    }
                }
                "." | "" => {}
                name => match tree.child(current, name) {
                    Some(child) => current = child,
                    None => {
                        trace!(raw, missing = name, "eager resolution failed");
                        status = SemanticStatus::Error;
                        break;
                    }
                },
            }
        }

        let mut path = if status == SemanticStatus::Pending {
            status = SemanticStatus::Success;
            // `..` followed real parents; levels come from the node itself.
            Self::from_node(tree, current)
        } else {
            Self::root()
        };
        path.valid = valid;
        path.resolution = Resolution::Eager(status);
        path
    }

    /// Canonical path of an attached node.
    pub fn from_node(tree: &FsTree, id: NodeId) -> Self {
        let mut names: Vec<String> = std::iter::once(id)
            .chain(tree.ancestors(id))
            .filter_map(|n| tree.node(n).ok().and_then(|node| node.name().map(str::to_string)))
            .collect();
        names.reverse();

        let mut path = Self::from_components(names);
        path.resolution = Resolution::Eager(SemanticStatus::Success);
        path
    }

    fn from_components(mut components: Vec<String>) -> Self {
        let file_name = components.pop();
        Self {
            levels: components,
            file_name,
            valid: true,
            resolution: Resolution::Lexical,
        }
    }

    /// Raw absolute component list plus the validity of the typed part.
    fn split(tree: &FsTree, pwd: NodeId, raw: &str) -> (Vec<String>, bool) {
        let (mut components, relative) = match raw.strip_prefix('/') {
            Some(rest) => (Vec::new(), rest),
            None => (Self::from_node(tree, pwd).components(), raw),
        };
        let typed: Vec<String> = relative.split('/').map(str::to_string).collect();
        let valid = typed.iter().all(|c| is_valid_name(c));
        components.extend(typed);
        (components, valid)
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Final component, `None` when the path denotes the root.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Every component satisfied the naming rule.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// False only for an eager resolution that did not reach a node.
    pub fn exists(&self) -> bool {
        !matches!(
            self.resolution,
            Resolution::Eager(SemanticStatus::Error | SemanticStatus::Pending)
        )
    }

    pub fn is_root(&self) -> bool {
        self.levels.is_empty() && self.file_name.is_none()
    }

    pub fn components(&self) -> Vec<String> {
        self.levels
            .iter()
            .cloned()
            .chain(self.file_name.clone())
            .collect()
    }

    /// Node reached after walking `levels` only. It may be a file when the
    /// path is malformed; callers check.
    pub fn get_parent_node(&self, tree: &FsTree) -> Option<NodeId> {
        if !self.exists() {
            return None;
        }
        self.levels
            .iter()
            .try_fold(tree.root(), |current, name| tree.child(current, name))
    }

    /// Node the whole path denotes, `None` when any component is missing.
    pub fn get_node(&self, tree: &FsTree) -> Option<NodeId> {
        if self.is_root() {
            return self.exists().then(|| tree.root());
        }
        let parent = self.get_parent_node(tree)?;
        tree.child(parent, self.file_name.as_deref()?)
    }
}

impl fmt::Display for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "/");
        }
        for component in self.components() {
            write!(f, "/{component}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;

    /// `/a/b/c` (dirs), `/a/f` (file), `/x` (dir).
    fn sample() -> (FsTree, NodeId, NodeId, NodeId) {
        let mut tree = FsTree::new(Mode::DEFAULT_DIRECTORY, "root");
        let root = tree.root();
        let a = tree.create_node("a", Mode::DEFAULT_DIRECTORY, "root", root).unwrap();
        let b = tree.create_node("b", Mode::DEFAULT_DIRECTORY, "root", a).unwrap();
        let c = tree.create_node("c", Mode::DEFAULT_DIRECTORY, "root", b).unwrap();
        tree.create_node("f", Mode::DEFAULT_FILE, "root", a).unwrap();
        tree.create_node("x", Mode::DEFAULT_DIRECTORY, "root", root).unwrap();
        (tree, a, b, c)
    }

    #[test]
    fn test_name_rule() {
        assert!(is_valid_name("hello world-1.txt_"));
        assert!(is_valid_name(".."));
        assert!(is_valid_name(""));
        assert!(!is_valid_name("a*b"));
        assert!(!is_valid_name("tab\there"));
    }

    #[test]
    fn test_lexical_absolute_and_relative() {
        let (tree, a, _, _) = sample();
        let root = tree.root();

        let path = FsPath::lexical(&tree, root, "/a/b/c");
        assert_eq!(path.levels(), ["a", "b"]);
        assert_eq!(path.file_name(), Some("c"));
        assert_eq!(path.resolution(), Resolution::Lexical);

        let path = FsPath::lexical(&tree, a, "b/./c");
        assert_eq!(path.to_string(), "/a/b/c");
    }

    #[test]
    fn test_lexical_dotdot_never_climbs_above_root() {
        let (tree, a, _, _) = sample();
        let path = FsPath::lexical(&tree, a, "../../../x");
        assert_eq!(path.to_string(), "/x");
        let path = FsPath::lexical(&tree, a, "..//..");
        assert!(path.is_root());
        assert_eq!(path.get_node(&tree), Some(tree.root()));
    }

    #[test]
    fn test_lexical_does_not_need_existence() {
        let (tree, _, _, _) = sample();
        let path = FsPath::lexical(&tree, tree.root(), "/ghost/../a/new");
        assert_eq!(path.to_string(), "/a/new");
        assert!(path.get_node(&tree).is_none());
        assert!(path.get_parent_node(&tree).is_some());
    }

    #[test]
    fn test_invalid_component_still_collapses() {
        let (tree, _, _, _) = sample();
        let path = FsPath::lexical(&tree, tree.root(), "/a/b*d/../b");
        assert!(!path.is_valid());
        assert_eq!(path.to_string(), "/a/b");
    }

    #[test]
    fn test_eager_success_rederives_lineage() {
        let (tree, _, b, c) = sample();
        let path = FsPath::eager(&tree, b, "c/../../b/c");
        assert_eq!(path.resolution(), Resolution::Eager(SemanticStatus::Success));
        assert_eq!(path.get_node(&tree), Some(c));
        assert_eq!(path.to_string(), "/a/b/c");
    }

    #[test]
    fn test_eager_stops_at_first_missing_component() {
        let (tree, _, _, _) = sample();
        // A lexical collapse would land on /a, the tree walk cannot.
        let path = FsPath::eager(&tree, tree.root(), "/ghost/../a");
        assert_eq!(path.resolution(), Resolution::Eager(SemanticStatus::Error));
        assert!(!path.exists());
        assert_eq!(path.get_node(&tree), None);

        let lexical = FsPath::lexical(&tree, tree.root(), "/ghost/../a");
        assert!(lexical.get_node(&tree).is_some());
    }

    #[test]
    fn test_eager_finds_no_children_under_a_file() {
        let (tree, a, _, _) = sample();
        let path = FsPath::eager(&tree, tree.root(), "/a/f/b");
        assert!(!path.exists());

        let back_out = FsPath::eager(&tree, tree.root(), "/a/f/..");
        assert_eq!(back_out.get_node(&tree), Some(a));
    }

    #[test]
    fn test_eager_dotdot_at_root_is_noop() {
        let (tree, _, _, _) = sample();
        let path = FsPath::eager(&tree, tree.root(), "../../x");
        assert!(path.exists());
        assert_eq!(path.to_string(), "/x");
    }

    #[test]
    fn test_from_node_round_trips_absolute_paths() {
        let (tree, _, _, _) = sample();
        for raw in ["/a", "/a/b", "/a/b/c", "/a/f", "/x"] {
            let node = FsPath::lexical(&tree, tree.root(), raw)
                .get_node(&tree)
                .unwrap();
            assert_eq!(FsPath::from_node(&tree, node).to_string(), raw);
        }
        assert_eq!(FsPath::from_node(&tree, tree.root()).to_string(), "/");
    }

    #[test]
    fn test_parent_lookup_through_a_file() {
        let (tree, _, _, _) = sample();
        let path = FsPath::lexical(&tree, tree.root(), "/a/f/g");
        let parent = path.get_parent_node(&tree).unwrap();
        assert!(!tree.is_dir(parent));
        assert_eq!(path.get_node(&tree), None);
    }
}
