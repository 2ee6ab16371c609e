//! Dry-run runner: print instead of execute

use super::{CommandRunner, RunOutcome, ToolStatus};
use crate::command::ImputeCommand;
use crate::Result;
use anyhow::Context;
use std::io::Write;
use std::time::Duration;

/// Writes each command line to a sink and reports success
pub struct DryRunRunner<W: Write> {
    out: W,
}

impl DryRunRunner<std::io::Stdout> {
    /// Print to stdout
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> DryRunRunner<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CommandRunner for DryRunRunner<W> {
    fn run(&mut self, cmd: &ImputeCommand) -> Result<RunOutcome> {
        writeln!(self.out, "{}", cmd.render()).context("Failed to write dry-run command")?;
        self.out.flush().context("Failed to flush dry-run output")?;
        Ok(RunOutcome {
            status: ToolStatus::Success,
            elapsed: Duration::ZERO,
        })
    }
}
