use std::io::Write;

use tracing::debug;

use crate::args::Args;
use crate::error::{ShellError, ShellResult};
use crate::mode::Perm;
use crate::session::Session;
use crate::tree::NodeId;

/// A new entry may go into `dir` when it is a directory the actor can
/// write and reach.
fn check_creatable(session: &Session, dir: NodeId) -> ShellResult<()> {
    if !session.tree().is_dir(dir) {
        return Err(ShellError::NotADirectory);
    }
    session.require(&[
        session.can(Perm::Write, dir),
        session.can_reach(Perm::Execute, dir),
    ])
}

pub(super) fn mkdir(session: &mut Session, args: &Args, _out: &mut dyn Write) -> ShellResult<()> {
    let parents = args.flag("parents");
    let path = session.resolve(args.required("dir")?);
    if !path.is_valid() {
        return Err(ShellError::InvalidSyntax);
    }

    let owner = session.effective_user().to_string();
    let mode = session.directory_mode();
    let mut parent = session.root();
    for name in path.levels() {
        parent = match session.tree().child(parent, name) {
            Some(child) => child,
            None if parents => {
                check_creatable(session, parent)?;
                let created = session.tree_mut().create_node(name, mode, &owner, parent)?;
                debug!(name = %name, owner = %owner, "created intermediate directory");
                created
            }
            None => return Err(ShellError::AncestorMissing),
        };
    }
    check_creatable(session, parent)?;

    let Some(name) = path.file_name() else {
        return Err(ShellError::FileExists);
    };
    match session.tree().child(parent, name) {
        Some(existing) if parents && session.tree().is_dir(existing) => return Ok(()),
        Some(_) => return Err(ShellError::FileExists),
        None => {}
    }
    session.tree_mut().create_node(name, mode, &owner, parent)?;
    debug!(path = %path, owner = %owner, "created directory");
    Ok(())
}

pub(super) fn touch(session: &mut Session, args: &Args, _out: &mut dyn Write) -> ShellResult<()> {
    let path = session.resolve(args.required("file")?);
    if !path.is_valid() {
        return Err(ShellError::InvalidSyntax);
    }
    let parent = path
        .get_parent_node(session.tree())
        .ok_or(ShellError::AncestorMissing)?;
    if !session.tree().is_dir(parent) {
        return Err(ShellError::NotADirectory);
    }
    session.require(&[
        session.can(Perm::Write, parent),
        session.can(Perm::Execute, parent),
        session.can_reach(Perm::Execute, parent),
    ])?;

    // Without timestamps, touching an existing entry changes nothing.
    let Some(name) = path.file_name() else {
        return Ok(());
    };
    if session.tree().child(parent, name).is_some() {
        return Ok(());
    }
    let owner = session.effective_user().to_string();
    let mode = session.file_mode();
    session.tree_mut().create_node(name, mode, &owner, parent)?;
    debug!(path = %path, owner = %owner, "created file");
    Ok(())
}
