use std::io::Write;

use tracing::{debug, warn};

use crate::args::Args;
use crate::error::{ShellError, ShellResult};
use crate::path::is_valid_name;
use crate::permissions::SUPERUSER;
use crate::session::Session;

const ROOT_REMOVAL_WARNING: &str = "\
WARNING: You are just about to delete the root account
Usually this is never required as it may render the whole system unusable
Stopping now without having performed any action";

fn user_name<'a>(args: &'a Args) -> ShellResult<&'a str> {
    let user = args.required("user")?;
    if user.is_empty() || !is_valid_name(user) {
        return Err(ShellError::InvalidSyntax);
    }
    Ok(user)
}

fn require_superuser(session: &Session) -> ShellResult<()> {
    if session.is_superuser() {
        Ok(())
    } else {
        Err(ShellError::OperationNotPermitted)
    }
}

pub(super) fn adduser(session: &mut Session, args: &Args, _out: &mut dyn Write) -> ShellResult<()> {
    let user = user_name(args)?;
    require_superuser(session)?;
    if !session.add_user(user) {
        return Err(ShellError::UserExists);
    }
    debug!(user, "user added");
    Ok(())
}

pub(super) fn deluser(session: &mut Session, args: &Args, out: &mut dyn Write) -> ShellResult<()> {
    let user = user_name(args)?;
    require_superuser(session)?;
    if !session.has_user(user) {
        return Err(ShellError::UserNotFound);
    }
    if user == SUPERUSER {
        warn!("refusing to delete the superuser");
        writeln!(out, "{ROOT_REMOVAL_WARNING}")?;
        return Ok(());
    }
    session.remove_user(user);
    debug!(user, "user removed");
    Ok(())
}

pub(super) fn su(session: &mut Session, args: &Args, _out: &mut dyn Write) -> ShellResult<()> {
    let user = args.value("user").unwrap_or(SUPERUSER);
    if user.is_empty() || !is_valid_name(user) {
        return Err(ShellError::InvalidSyntax);
    }
    session.switch_user(user)
}
