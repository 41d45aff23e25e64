//! External media player
//!
//! The player gets the proxy URL as its only argument, e.g. `mpv <url>`.

use std::process::Stdio;

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::info;

pub struct Player {
    program: String,
    url: String,
    verbose: bool,
}

impl Player {
    pub fn new(program: impl Into<String>, url: impl Into<String>, verbose: bool) -> Self {
        Self {
            program: program.into(),
            url: url.into(),
            verbose,
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.arg(&self.url).kill_on_drop(true);
        if !self.verbose {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        command
    }

    /// Run the player until it exits
    ///
    /// Dropping the returned future kills the player.
    pub async fn run(&self) -> Result<()> {
        info!(program = %self.program, url = %self.url, "Starting player");

        let status = self
            .command()
            .status()
            .await
            .with_context(|| format!("Failed to start player {}", self.program))?;

        if !status.success() {
            bail!("Player {} exited with {status}", self.program);
        }
        Ok(())
    }
}
