//! Command runner abstraction
//!
//! A runner executes one [`ImputeCommand`] and blocks until it finishes. The
//! dispatcher only sees the [`RunOutcome`], which lets the same loop drive the
//! real impute2 binary, a dry run, or a scripted mock in tests.
//!
//! # Runners
//!
//! - **process**: spawns the program with inherited stdio and waits
//! - **dry_run**: prints the command line and reports success
//! - **mock**: records commands and replays scripted statuses
//!
//! A tool that fails, crashes, or cannot be started is a *failed run*, not a
//! runner error. `Err` is reserved for problems that make further dispatching
//! pointless.

pub mod dry_run;
pub mod mock;
pub mod process;

use crate::command::ImputeCommand;
use crate::Result;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// How an external tool run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolStatus {
    Success,
    Failed {
        /// Exit code, if the process exited normally
        code: Option<i32>,
        /// Terminating signal, if it was killed
        signal: Option<i32>,
        /// Spawn failure or other detail
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl ToolStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolStatus::Success)
    }

    /// Failure with an exit code
    pub fn exit_code(code: i32) -> Self {
        if code == 0 {
            ToolStatus::Success
        } else {
            ToolStatus::Failed {
                code: Some(code),
                signal: None,
                message: None,
            }
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStatus::Success => write!(f, "success"),
            ToolStatus::Failed { code: Some(code), .. } => write!(f, "exit code {}", code),
            ToolStatus::Failed { signal: Some(signal), .. } => write!(f, "killed by signal {}", signal),
            ToolStatus::Failed { message: Some(message), .. } => write!(f, "{}", message),
            ToolStatus::Failed { .. } => write!(f, "failed"),
        }
    }
}

/// Result of running one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: ToolStatus,
    pub elapsed: Duration,
}

/// Executes impute2 invocations synchronously
pub trait CommandRunner {
    /// Run `cmd` to completion
    fn run(&mut self, cmd: &ImputeCommand) -> Result<RunOutcome>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&mut self, cmd: &ImputeCommand) -> Result<RunOutcome> {
        (**self).run(cmd)
    }
}
