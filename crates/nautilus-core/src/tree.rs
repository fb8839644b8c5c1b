//! In-memory filesystem tree for Nautilus Core

use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::error::{ShellError, ShellResult};
use crate::mode::Mode;

/// Opaque identifier of a node in an [`FsTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// A file or directory. Files carry metadata only.
#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    name: Option<String>,
    mode: Mode,
    owner: String,
    parent: Option<NodeId>,
    children: BTreeMap<String, NodeId>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// `None` only for the root.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    /// Children sorted by name.
    pub fn children(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Arena of nodes. A parent owns its children: the `children` map of a
/// node and the `parent` field of each child are only changed together.
#[derive(Debug)]
pub struct FsTree {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_node_id: u64,
}

impl FsTree {
    pub fn new(root_mode: Mode, root_owner: &str) -> Self {
        let root = NodeId(0);
        let root_node = Node {
            id: root,
            name: None,
            mode: Mode::new(root_mode.bits() | Mode::DIRECTORY_BIT),
            owner: root_owner.to_string(),
            parent: None,
            children: BTreeMap::new(),
        };
        let mut nodes = HashMap::new();
        nodes.insert(root, root_node);
        Self {
            nodes,
            root,
            next_node_id: 1,
        }
    }

    fn allocate_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root
    }

    pub fn node(&self, id: NodeId) -> ShellResult<&Node> {
        self.nodes.get(&id).ok_or(ShellError::FileNotFound)
    }

    fn node_mut(&mut self, id: NodeId) -> ShellResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(ShellError::FileNotFound)
    }

    /// Number of nodes still held by the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn is_dir(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(Node::is_dir)
    }

    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes.get(&parent).and_then(|node| node.child(name))
    }

    /// Creates a node and registers it under `parent`.
    ///
    /// An existing sibling with the same name is never overwritten.
    pub fn create_node(
        &mut self,
        name: &str,
        mode: Mode,
        owner: &str,
        parent: NodeId,
    ) -> ShellResult<NodeId> {
        self.check_attachable(parent, name)?;

        let id = self.allocate_node_id();
        let node = Node {
            id,
            name: Some(name.to_string()),
            mode,
            owner: owner.to_string(),
            parent: Some(parent),
            children: BTreeMap::new(),
        };
        self.nodes.insert(id, node);
        self.node_mut(parent)?.children.insert(name.to_string(), id);
        trace!(?id, ?parent, name, "node created");
        Ok(id)
    }

    fn check_attachable(&self, parent: NodeId, name: &str) -> ShellResult<()> {
        let parent_node = self.node(parent)?;
        if !parent_node.is_dir() {
            return Err(ShellError::NotADirectory);
        }
        if parent_node.children.contains_key(name) {
            return Err(ShellError::FileExists);
        }
        Ok(())
    }

    /// Unlinks `id` from its parent. The node and its subtree stay in the
    /// arena, unreachable from the root. Detaching the root is a no-op.
    pub fn detach(&mut self, id: NodeId) -> ShellResult<()> {
        let node = self.node_mut(id)?;
        let Some(parent) = node.parent.take() else {
            return Ok(());
        };
        let name = node.name.clone().unwrap_or_default();
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.remove(&name);
        }
        trace!(?id, ?parent, "node detached");
        Ok(())
    }

    /// Moves `id` under `new_parent`, keeping its name.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> ShellResult<()> {
        let name = self
            .node(id)?
            .name
            .clone()
            .ok_or(ShellError::OperationNotPermitted)?;
        if self.node(id)?.parent == Some(new_parent) {
            return Ok(());
        }
        if new_parent == id || self.ancestors(new_parent).contains(&id) {
            return Err(ShellError::OperationNotPermitted);
        }
        self.check_attachable(new_parent, &name)?;

        self.detach(id)?;
        self.node_mut(new_parent)?.children.insert(name, id);
        self.node_mut(id)?.parent = Some(new_parent);
        Ok(())
    }

    /// Detaches `id` and drops it together with its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> ShellResult<()> {
        if self.is_root(id) {
            return Err(ShellError::OperationNotPermitted);
        }
        self.detach(id)?;
        for dead in self.descendants(id) {
            self.nodes.remove(&dead);
        }
        Ok(())
    }

    /// Parent first, root last; `id` itself is not included.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.nodes.get(&id).and_then(|node| node.parent);
        while let Some(ancestor) = current {
            ancestors.push(ancestor);
            current = self.nodes.get(&ancestor).and_then(|node| node.parent);
        }
        ancestors
    }

    /// `id` followed by every node below it, pre-order, siblings by name.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            order.push(current);
            stack.extend(node.children.values().rev().copied());
        }
        order
    }

    /// True when the parent chain of `id` ends at the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_root(id) || self.ancestors(id).last() == Some(&self.root)
    }

    pub fn set_mode(&mut self, id: NodeId, mode: Mode) -> ShellResult<()> {
        self.node_mut(id)?.mode = mode;
        Ok(())
    }

    pub fn set_owner(&mut self, id: NodeId, owner: &str) -> ShellResult<()> {
        self.node_mut(id)?.owner = owner.to_string();
        Ok(())
    }
}
