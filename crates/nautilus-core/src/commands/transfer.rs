use std::io::Write;

use tracing::debug;

use crate::args::Args;
use crate::error::{ShellError, ShellResult};
use crate::mode::Perm;
use crate::session::Session;
use crate::tree::NodeId;

pub(super) fn cp(session: &mut Session, args: &Args, _out: &mut dyn Write) -> ShellResult<()> {
    copy(session, args)?;
    Ok(())
}

/// `mv` is a copy followed by removal of the source. A copy whose source
/// turns out not to be removable is taken back.
pub(super) fn mv(session: &mut Session, args: &Args, _out: &mut dyn Write) -> ShellResult<()> {
    let copied = copy(session, args)?;

    let source = session
        .resolve(args.required("src")?)
        .get_node(session.tree())
        .ok_or(ShellError::NoSuchFile)
        .and_then(|src| {
            session.require(&[session.can(Perm::Write, src)])?;
            Ok(src)
        });
    match source {
        Ok(src) => {
            session.tree_mut().remove(src)?;
            debug!(src = args.value("src"), dst = args.value("dst"), "moved");
            Ok(())
        }
        Err(err) => {
            session.tree_mut().remove(copied)?;
            Err(err)
        }
    }
}

/// Creates a node at `dst` with the mode and owner of `src`.
fn copy(session: &mut Session, args: &Args) -> ShellResult<NodeId> {
    let src_path = session.resolve(args.required("src")?);
    let dst_path = session.resolve(args.required("dst")?);
    if !src_path.is_valid() || !dst_path.is_valid() {
        return Err(ShellError::InvalidSyntax);
    }

    let tree = session.tree();
    if let Some(existing) = dst_path.get_node(tree) {
        return Err(if tree.is_dir(existing) {
            ShellError::DestinationIsDirectory
        } else {
            ShellError::FileExists
        });
    }

    let src = src_path.get_node(tree).ok_or(ShellError::NoSuchFile)?;
    if tree.is_dir(src) {
        return Err(ShellError::SourceIsDirectory);
    }
    session.require(&[session.can(Perm::Read, src)])?;
    session.require(&[session.can_reach(Perm::Execute, src)])?;

    let target_dir = dst_path
        .get_parent_node(tree)
        .filter(|dir| tree.is_dir(*dir))
        .ok_or(ShellError::FileNotFound)?;
    session.require(&[
        session.can(Perm::Write, target_dir),
        session.can(Perm::Execute, target_dir),
        session.can_reach(Perm::Execute, target_dir),
    ])?;

    // The root always exists, so a missing destination has a final name.
    let name = dst_path.file_name().ok_or(ShellError::DestinationIsDirectory)?;
    let (mode, owner) = {
        let node = session.node(src)?;
        (node.mode(), node.owner().to_string())
    };
    let copied = session.tree_mut().create_node(name, mode, &owner, target_dir)?;
    debug!(src = %src_path, dst = %dst_path, "copied");
    Ok(copied)
}
