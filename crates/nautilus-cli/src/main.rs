use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use nautilus_cli::{drive, Cli, Parser};
use nautilus_core::Shell;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with command output
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(cli.level())
        .init();

    let config = cli.load_config()?;
    let mut shell = Shell::new(&config, io::stdout().lock());
    let style = cli.prompt_style();

    match &cli.script {
        Some(path) => {
            info!("Running script {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            drive(&mut shell, BufReader::new(file), style)?;
        }
        None => {
            drive(&mut shell, io::stdin().lock(), style)?;
        }
    }

    Ok(())
}
