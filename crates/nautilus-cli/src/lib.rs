//! Nautilus CLI library

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use nautilus_core::{Flow, Shell, ShellConfig};
use tracing::{debug, info};

// Re-export CLI types for testing
pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "nautilus")]
#[command(about = "Shell over an in-memory Unix-like filesystem")]
#[command(version, author, long_about = None)]
pub struct Cli {
    /// JSON file with session settings (modes, extra users)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run commands from a file instead of standard input
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Print the prompt and each command when running a script
    #[arg(long, requires = "script")]
    pub echo: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn level(&self) -> tracing::Level {
        match self.log_level.as_str() {
            "error" => tracing::Level::ERROR,
            "warn" => tracing::Level::WARN,
            "info" => tracing::Level::INFO,
            "debug" => tracing::Level::DEBUG,
            "trace" => tracing::Level::TRACE,
            _ => tracing::Level::WARN,
        }
    }

    pub fn load_config(&self) -> Result<ShellConfig> {
        match &self.config {
            Some(path) => {
                info!("Loading config from {}", path.display());
                ShellConfig::load(path)
                    .with_context(|| format!("failed to load config {}", path.display()))
            }
            None => Ok(ShellConfig::default()),
        }
    }

    pub fn prompt_style(&self) -> PromptStyle {
        match (&self.script, self.echo) {
            (None, _) => PromptStyle::Interactive,
            (Some(_), true) => PromptStyle::Echo,
            (Some(_), false) => PromptStyle::Silent,
        }
    }
}

/// How prompts appear in the output stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptStyle {
    /// Prompt before each line is read.
    Interactive,
    /// Prompt followed by the line just read.
    Echo,
    /// No prompts.
    Silent,
}

/// Feeds `input` to `shell` line by line until `exit` or end of input.
pub fn drive<R, W>(shell: &mut Shell<W>, mut input: R, style: PromptStyle) -> Result<Flow>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        if style == PromptStyle::Interactive {
            let prompt = shell.prompt();
            let out = shell.output_mut();
            write!(out, "{prompt}")?;
            out.flush()?;
        }

        line.clear();
        if input.read_line(&mut line).context("failed to read input")? == 0 {
            debug!("end of input");
            return Ok(Flow::Continue);
        }
        if style == PromptStyle::Echo {
            let prompt = shell.prompt();
            writeln!(shell.output_mut(), "{prompt}{}", line.trim_end())?;
        }

        let flow = shell.run_line(&line)?;
        shell.output_mut().flush()?;
        if flow == Flow::Exit {
            return Ok(Flow::Exit);
        }
    }
}
