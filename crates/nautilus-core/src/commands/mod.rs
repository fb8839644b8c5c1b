//! Built-in commands and their dispatch table
//!
//! Each handler receives the session, the bound argument record and the
//! output sink. Checks run in a fixed order per command and the first
//! failing one is the error reported to the user.

use std::io::Write;

use crate::args::{Args, Param};
use crate::error::ShellResult;
use crate::session::Session;

mod attributes;
mod create;
mod list;
mod navigation;
mod remove;
mod transfer;
mod users;

pub type Handler = fn(&mut Session, &Args, &mut dyn Write) -> ShellResult<()>;

#[derive(Clone, Copy)]
pub enum Action {
    Run(Handler),
    /// Ends the session after printing a farewell.
    Exit,
}

pub struct CommandSpec {
    pub name: &'static str,
    pub params: &'static [Param],
    pub action: Action,
}

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "exit",
        params: &[],
        action: Action::Exit,
    },
    CommandSpec {
        name: "pwd",
        params: &[],
        action: Action::Run(navigation::pwd),
    },
    CommandSpec {
        name: "cd",
        params: &[Param::text("dir")],
        action: Action::Run(navigation::cd),
    },
    CommandSpec {
        name: "mkdir",
        params: &[Param::flag("parents", "p"), Param::text("dir")],
        action: Action::Run(create::mkdir),
    },
    CommandSpec {
        name: "touch",
        params: &[Param::text("file")],
        action: Action::Run(create::touch),
    },
    CommandSpec {
        name: "cp",
        params: &[Param::text("src"), Param::text("dst")],
        action: Action::Run(transfer::cp),
    },
    CommandSpec {
        name: "mv",
        params: &[Param::text("src"), Param::text("dst")],
        action: Action::Run(transfer::mv),
    },
    CommandSpec {
        name: "rm",
        params: &[Param::text("path")],
        action: Action::Run(remove::rm),
    },
    CommandSpec {
        name: "rmdir",
        params: &[Param::text("dir")],
        action: Action::Run(remove::rmdir),
    },
    CommandSpec {
        name: "chmod",
        params: &[
            Param::flag("recursive", "r"),
            Param::text("mode"),
            Param::text("path"),
        ],
        action: Action::Run(attributes::chmod),
    },
    CommandSpec {
        name: "chown",
        params: &[
            Param::flag("recursive", "r"),
            Param::text("user"),
            Param::text("path"),
        ],
        action: Action::Run(attributes::chown),
    },
    CommandSpec {
        name: "adduser",
        params: &[Param::text("user")],
        action: Action::Run(users::adduser),
    },
    CommandSpec {
        name: "deluser",
        params: &[Param::text("user")],
        action: Action::Run(users::deluser),
    },
    CommandSpec {
        name: "su",
        params: &[Param::optional("user")],
        action: Action::Run(users::su),
    },
    CommandSpec {
        name: "ls",
        params: &[
            Param::flag("all", "a"),
            Param::flag("directory", "d"),
            Param::flag("long", "l"),
            Param::optional("path"),
        ],
        action: Action::Run(list::ls),
    },
];

pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|command| command.name == name)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_command_is_registered_once() {
        let mut names: Vec<_> = COMMANDS.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COMMANDS.len());
        for name in ["cd", "mkdir", "touch", "cp", "mv", "rm", "rmdir", "chmod", "chown", "ls"] {
            assert!(lookup(name).is_some(), "{name} missing");
        }
        assert!(lookup("format").is_none());
    }
}
