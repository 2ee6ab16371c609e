//! Mock runner for testing
//!
//! Records every command it is asked to run and answers with scripted
//! statuses, so dispatch-loop tests are fast and deterministic.
//!
//! # Example
//!
//! ```
//! use impute_dispatch::runner::mock::MockRunner;
//! use impute_dispatch::runner::ToolStatus;
//!
//! let runner = MockRunner::new();
//! runner.push_status(ToolStatus::exit_code(1));
//!
//! // Handles share state, so keep one for inspection
//! let observed = runner.clone();
//! assert!(observed.recorded().is_empty());
//! ```

use super::{CommandRunner, RunOutcome, ToolStatus};
use crate::command::ImputeCommand;
use crate::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock command runner
///
/// Clones share the recorded commands and the status script.
#[derive(Clone, Default)]
pub struct MockRunner {
    /// Statuses to return, in order; success once exhausted
    script: Arc<Mutex<VecDeque<ToolStatus>>>,

    /// Every command run so far
    recorded: Arc<Mutex<Vec<ImputeCommand>>>,

    /// Return `Err` from the n-th call (0-based)
    fail_at: Arc<Mutex<Option<usize>>>,
}

impl MockRunner {
    /// Create a runner that succeeds every command
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a status for the next unanswered run
    pub fn push_status(&self, status: ToolStatus) {
        self.script.lock().unwrap().push_back(status);
    }

    /// Make the n-th call return a runner error
    pub fn set_fail_at(&self, call: usize) {
        *self.fail_at.lock().unwrap() = Some(call);
    }

    /// Commands run so far
    pub fn recorded(&self) -> Vec<ImputeCommand> {
        self.recorded.lock().unwrap().clone()
    }

    /// Rendered command lines run so far
    pub fn recorded_lines(&self) -> Vec<String> {
        self.recorded().iter().map(ImputeCommand::render).collect()
    }
}

impl CommandRunner for MockRunner {
    fn run(&mut self, cmd: &ImputeCommand) -> Result<RunOutcome> {
        let call = {
            let mut recorded = self.recorded.lock().unwrap();
            recorded.push(cmd.clone());
            recorded.len() - 1
        };

        if *self.fail_at.lock().unwrap() == Some(call) {
            anyhow::bail!("mock runner error on call {}", call);
        }

        let status = self.script.lock().unwrap().pop_front().unwrap_or(ToolStatus::Success);
        Ok(RunOutcome {
            status,
            elapsed: Duration::from_millis(1),
        })
    }
}
