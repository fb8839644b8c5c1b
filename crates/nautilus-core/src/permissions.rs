//! Permission checks against owner/other mode columns

use crate::mode::{Class, Perm};
use crate::tree::{FsTree, Node, NodeId};

/// The superuser bypasses every permission check.
pub const SUPERUSER: &str = "root";

pub fn is_superuser(actor: &str) -> bool {
    actor == SUPERUSER
}

/// Whether `actor` may perform `perm` on `node`.
pub fn doable(perm: Perm, node: &Node, actor: &str) -> bool {
    if is_superuser(actor) {
        return true;
    }
    let class = if actor == node.owner() {
        Class::Owner
    } else {
        Class::Other
    };
    node.mode().allows(class, perm)
}

/// Whether every strict ancestor of `id`, root included, grants `perm` to
/// `actor`. The node itself is not inspected.
pub fn ancestors_doable(perm: Perm, tree: &FsTree, id: NodeId, actor: &str) -> bool {
    if is_superuser(actor) {
        return true;
    }
    tree.ancestors(id)
        .into_iter()
        .filter_map(|ancestor| tree.node(ancestor).ok())
        .all(|ancestor| doable(perm, ancestor, actor))
}
