use std::io::Write;

use crate::args::Args;
use crate::error::{ShellError, ShellResult};
use crate::mode::Perm;
use crate::session::Session;

pub(super) fn pwd(session: &mut Session, _args: &Args, out: &mut dyn Write) -> ShellResult<()> {
    writeln!(out, "{}", session.pwd_path())?;
    Ok(())
}

/// `cd` is the one command that resolves eagerly: `..` must follow the
/// parents that actually exist.
pub(super) fn cd(session: &mut Session, args: &Args, _out: &mut dyn Write) -> ShellResult<()> {
    let path = session.resolve_existing(args.required("dir")?);
    if !path.is_valid() {
        return Err(ShellError::InvalidSyntax);
    }
    let target = path
        .get_node(session.tree())
        .ok_or(ShellError::FileNotFound)?;
    if !session.tree().is_dir(target) {
        return Err(ShellError::DestinationIsFile);
    }
    session.require(&[session.can(Perm::Execute, target)])?;

    session.set_pwd(target);
    Ok(())
}
