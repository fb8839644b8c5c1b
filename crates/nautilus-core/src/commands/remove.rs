use std::io::Write;

use tracing::debug;

use crate::args::Args;
use crate::error::{ShellError, ShellResult};
use crate::mode::Perm;
use crate::session::Session;

pub(super) fn rm(session: &mut Session, args: &Args, _out: &mut dyn Write) -> ShellResult<()> {
    let path = session.resolve(args.required("path")?);
    if !path.is_valid() {
        return Err(ShellError::InvalidSyntax);
    }
    let target = path
        .get_node(session.tree())
        .ok_or(ShellError::NoSuchFile)?;
    let node = session.node(target)?;
    if node.is_dir() {
        return Err(ShellError::IsADirectory);
    }
    let parent_writable = node
        .parent()
        .is_some_and(|parent| session.can(Perm::Write, parent));
    session.require(&[
        session.can(Perm::Write, target),
        session.can_reach(Perm::Execute, target),
        parent_writable,
    ])?;

    session.tree_mut().remove(target)?;
    debug!(path = %path, "removed file");
    Ok(())
}

pub(super) fn rmdir(session: &mut Session, args: &Args, _out: &mut dyn Write) -> ShellResult<()> {
    let path = session.resolve(args.required("dir")?);
    if !path.is_valid() {
        return Err(ShellError::InvalidSyntax);
    }
    let target = path
        .get_node(session.tree())
        .ok_or(ShellError::FileNotFound)?;
    let node = session.node(target)?;
    if !node.is_dir() {
        return Err(ShellError::NotADirectory);
    }
    let parent = node.parent().ok_or(ShellError::OperationNotPermitted)?;
    session.require(&[
        session.can(Perm::Write, parent),
        session.can_reach(Perm::Execute, target),
    ])?;
    if target == session.pwd() {
        return Err(ShellError::CannotRemovePwd);
    }
    if node.child_count() > 0 {
        return Err(ShellError::DirectoryNotEmpty);
    }

    session.tree_mut().remove(target)?;
    debug!(path = %path, "removed directory");
    Ok(())
}
