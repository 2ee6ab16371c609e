//! Real subprocess runner

use super::{CommandRunner, RunOutcome, ToolStatus};
use crate::command::ImputeCommand;
use crate::Result;
use log::{debug, trace};
use std::process::{Command, ExitStatus};
use std::time::Instant;

/// Spawns the tool and waits for it
///
/// stdout and stderr are inherited so impute2's own progress output reaches
/// the job log. There is no timeout; a hung tool hangs the worker.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, cmd: &ImputeCommand) -> Result<RunOutcome> {
        trace!("exec {}", cmd.render());
        let start = Instant::now();

        let status = match Command::new(cmd.program()).args(cmd.args()).status() {
            Ok(status) => status_from_exit(status),
            Err(e) => {
                debug!("Failed to start {}: {}", cmd.program().to_string_lossy(), e);
                ToolStatus::Failed {
                    code: None,
                    signal: None,
                    message: Some(format!(
                        "failed to start {}: {}",
                        cmd.program().to_string_lossy(),
                        e
                    )),
                }
            }
        };

        Ok(RunOutcome {
            status,
            elapsed: start.elapsed(),
        })
    }
}

fn status_from_exit(status: ExitStatus) -> ToolStatus {
    if status.success() {
        return ToolStatus::Success;
    }

    #[cfg(unix)]
    let signal = {
        use std::os::unix::process::ExitStatusExt;
        status.signal()
    };
    #[cfg(not(unix))]
    let signal = None;

    ToolStatus::Failed {
        code: status.code(),
        signal,
        message: None,
    }
}
