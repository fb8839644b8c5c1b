//! Per-shell session state

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::ShellConfig;
use crate::error::{ShellError, ShellResult};
use crate::mode::{Mode, Perm};
use crate::path::FsPath;
use crate::permissions::{self, SUPERUSER};
use crate::tree::{FsTree, Node, NodeId};

/// Everything a command handler may read or change.
#[derive(Debug)]
pub struct Session {
    tree: FsTree,
    pwd: NodeId,
    effective_user: String,
    users: BTreeSet<String>,
    directory_mode: Mode,
    file_mode: Mode,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&ShellConfig::default())
    }
}

impl Session {
    pub fn new(config: &ShellConfig) -> Self {
        let tree = FsTree::new(config.root_mode, SUPERUSER);
        let mut users: BTreeSet<String> = config.users.iter().cloned().collect();
        users.insert(SUPERUSER.to_string());
        Self {
            pwd: tree.root(),
            tree,
            effective_user: SUPERUSER.to_string(),
            users,
            directory_mode: config.directory_mode,
            file_mode: config.file_mode,
        }
    }

    pub fn tree(&self) -> &FsTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut FsTree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn pwd(&self) -> NodeId {
        self.pwd
    }

    pub fn pwd_path(&self) -> FsPath {
        FsPath::from_node(&self.tree, self.pwd)
    }

    pub(crate) fn set_pwd(&mut self, dir: NodeId) {
        debug!(from = %self.pwd_path(), to = %FsPath::from_node(&self.tree, dir), "changing directory");
        self.pwd = dir;
    }

    pub fn effective_user(&self) -> &str {
        &self.effective_user
    }

    pub fn is_superuser(&self) -> bool {
        permissions::is_superuser(&self.effective_user)
    }

    pub(crate) fn switch_user(&mut self, user: &str) -> ShellResult<()> {
        if !self.users.contains(user) {
            return Err(ShellError::InvalidUser);
        }
        debug!(from = %self.effective_user, to = user, "switching user");
        self.effective_user = user.to_string();
        Ok(())
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(String::as_str)
    }

    pub fn has_user(&self, user: &str) -> bool {
        self.users.contains(user)
    }

    /// Returns false when the user was already registered.
    pub(crate) fn add_user(&mut self, user: &str) -> bool {
        self.users.insert(user.to_string())
    }

    /// The superuser is never removed.
    pub(crate) fn remove_user(&mut self, user: &str) -> bool {
        user != SUPERUSER && self.users.remove(user)
    }

    pub fn directory_mode(&self) -> Mode {
        self.directory_mode
    }

    pub fn file_mode(&self) -> Mode {
        self.file_mode
    }

    /// Lexical resolution relative to the current directory.
    pub fn resolve(&self, raw: &str) -> FsPath {
        FsPath::lexical(&self.tree, self.pwd, raw)
    }

    /// Eager resolution relative to the current directory.
    pub fn resolve_existing(&self, raw: &str) -> FsPath {
        FsPath::eager(&self.tree, self.pwd, raw)
    }

    pub fn node(&self, id: NodeId) -> ShellResult<&Node> {
        self.tree.node(id)
    }

    /// Whether the effective user may perform `perm` on `id`.
    pub fn can(&self, perm: Perm, id: NodeId) -> bool {
        self.tree
            .node(id)
            .is_ok_and(|node| permissions::doable(perm, node, &self.effective_user))
    }

    /// Whether the effective user may perform `perm` on every ancestor of `id`.
    pub fn can_reach(&self, perm: Perm, id: NodeId) -> bool {
        permissions::ancestors_doable(perm, &self.tree, id, &self.effective_user)
    }

    /// `Permission denied` unless every listed check passes.
    pub(crate) fn require(&self, checks: &[bool]) -> ShellResult<()> {
        if checks.iter().all(|ok| *ok) {
            Ok(())
        } else {
            Err(ShellError::PermissionDenied)
        }
    }
}
