//! Line-oriented command runner

use std::io::{self, Write};

use tracing::debug;

use crate::args::Args;
use crate::commands::{self, Action};
use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::session::Session;

/// Whether the shell should keep reading input after a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Runs command lines against a [`Session`], writing all command output and
/// error reports to `out`.
pub struct Shell<W: Write> {
    session: Session,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(config: &ShellConfig, out: W) -> Self {
        Self::with_session(Session::new(config), out)
    }

    pub fn with_session(session: Session, out: W) -> Self {
        Self { session, out }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// `<user>:<pwd>$ `
    pub fn prompt(&self) -> String {
        format!(
            "{}:{}$ ",
            self.session.effective_user(),
            self.session.pwd_path()
        )
    }

    /// Runs one line. Command failures are reported on the output and do not
    /// end the session; only a failing writer is returned as an error.
    pub fn run_line(&mut self, line: &str) -> io::Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
        let Some(command) = commands::lookup(name) else {
            writeln!(self.out, "{name}: Command not found")?;
            return Ok(Flow::Continue);
        };
        debug!(command = name, args = rest, "running command");

        let result = Args::parse(command.params, rest).and_then(|args| match command.action {
            Action::Run(handler) => {
                handler(&mut self.session, &args, &mut self.out)?;
                Ok(Flow::Continue)
            }
            Action::Exit => Ok(Flow::Exit),
        });
        match result {
            Ok(Flow::Exit) => {
                writeln!(self.out, "bye, {}", self.session.effective_user())?;
                Ok(Flow::Exit)
            }
            Ok(Flow::Continue) => Ok(Flow::Continue),
            Err(ShellError::Io(err)) => Err(err),
            Err(err) => {
                writeln!(self.out, "{name}: {err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Runs lines until one of them exits, returning how the input ended.
    pub fn run_lines<'a, I>(&mut self, lines: I) -> io::Result<Flow>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for line in lines {
            if self.run_line(line)? == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }
}
