//! Chunk dispatcher
//!
//! The dispatcher is the whole of a worker's job: walk the chunk indices this
//! rank owns, build the impute2 invocation for each, and run it to completion
//! before moving on.
//!
//! # Loop
//!
//! ```text
//! index = rank
//! while index < chunks.len():
//!     parse line  -> skip or abort on malformed
//!     build command
//!     run and wait
//!     index += size
//! ```
//!
//! Workers never exchange messages. Tool failures are logged and counted but do
//! not stop the loop; whether they change the exit status is a policy switch.
//!
//! # Example
//!
//! ```
//! use impute_dispatch::chunk::ChunkList;
//! use impute_dispatch::collective::WorkerIdentity;
//! use impute_dispatch::config::{DispatchConfig, DispatchPolicy, ImputeParams, InputPaths, OutputConfig};
//! use impute_dispatch::dispatcher::Dispatcher;
//! use impute_dispatch::runner::mock::MockRunner;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let config = Arc::new(DispatchConfig {
//!     inputs: InputPaths {
//!         chunks: PathBuf::from("chunks.txt"),
//!         map: PathBuf::from("map.txt"),
//!         ref_haplotypes: PathBuf::from("ref.hap"),
//!         ref_legend: PathBuf::from("ref.legend"),
//!         sample_haplotypes: PathBuf::from("sample.haps"),
//!         output_prefix: PathBuf::from("out"),
//!     },
//!     impute: ImputeParams::default(),
//!     policy: DispatchPolicy::default(),
//!     output: OutputConfig::default(),
//! });
//!
//! let runner = MockRunner::new();
//! let identity = WorkerIdentity::new(1, 2)?;
//! let mut dispatcher = Dispatcher::new(identity, config, runner.clone());
//!
//! let chunks = ChunkList::from_lines(["1 100", "101 200", "201 300", "301 400"]);
//! let report = dispatcher.run(&chunks)?;
//!
//! assert_eq!(report.stats.dispatched, 2);
//! assert!(runner.recorded_lines()[0].contains("-int 101 200"));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod stats;

pub use stats::DispatchStats;

use crate::chunk::{ChunkDescriptor, ChunkList};
use crate::collective::WorkerIdentity;
use crate::command::ImputeCommand;
use crate::config::{DispatchConfig, DispatchPolicy, MalformedPolicy};
use crate::runner::{CommandRunner, ToolStatus};
use crate::schedule;
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What happened to one owned chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkOutcome {
    /// The tool was run
    Ran(ToolStatus),
    /// The line was malformed and skipped
    Skipped(String),
}

/// Record for one owned chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkRecord {
    /// Line index in the chunk file
    pub index: usize,
    pub start: Option<String>,
    pub end: Option<String>,
    pub output: Option<PathBuf>,
    pub outcome: ChunkOutcome,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

/// Why a worker stopped before its last chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbortReason {
    pub index: usize,
    pub line: String,
    pub reason: String,
}

/// Result of one worker's dispatch pass
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub identity: WorkerIdentity,
    pub host: String,
    pub total_chunks: usize,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub stats: DispatchStats,
    pub records: Vec<ChunkRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<AbortReason>,
}

impl DispatchReport {
    /// Whether this worker should exit with failure
    pub fn is_failure(&self, policy: &DispatchPolicy) -> bool {
        self.aborted.is_some() || (policy.fail_on_tool_error && self.stats.failed > 0)
    }
}

fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Runs this worker's share of the chunk list
pub struct Dispatcher<R: CommandRunner> {
    identity: WorkerIdentity,
    config: Arc<DispatchConfig>,
    runner: R,
}

impl<R: CommandRunner> Dispatcher<R> {
    pub fn new(identity: WorkerIdentity, config: Arc<DispatchConfig>, runner: R) -> Self {
        Self {
            identity,
            config,
            runner,
        }
    }

    /// Process every chunk owned by this worker, in increasing index order
    ///
    /// Returns `Err` only if the runner itself fails; tool failures and
    /// malformed lines are reported in the returned [`DispatchReport`].
    pub fn run(&mut self, chunks: &ChunkList) -> Result<DispatchReport> {
        let started = Utc::now();
        let clock = Instant::now();
        let total = chunks.len();
        let assigned = schedule::assigned_count(self.identity, total);
        let mut stats = DispatchStats::new(assigned);
        let mut records = Vec::with_capacity(assigned);
        let mut aborted = None;

        info!(
            "{}: {} of {} chunks assigned (malformed lines: {})",
            self.identity, assigned, total, self.config.policy.malformed
        );

        for index in schedule::assigned_indices(self.identity, total) {
            let line = chunks.get(index).unwrap_or_default();

            let chunk = match ChunkDescriptor::parse(line) {
                Ok(chunk) => chunk,
                Err(e) => match self.config.policy.malformed {
                    MalformedPolicy::Skip => {
                        warn!("{}: skipping chunk {} {:?}: {}", self.identity, index, line, e);
                        stats.record_skip();
                        records.push(ChunkRecord {
                            index,
                            start: None,
                            end: None,
                            output: None,
                            outcome: ChunkOutcome::Skipped(e.to_string()),
                            elapsed: Duration::ZERO,
                        });
                        continue;
                    }
                    MalformedPolicy::Abort => {
                        error!("{}: malformed chunk {} {:?}: {}", self.identity, index, line, e);
                        aborted = Some(AbortReason {
                            index,
                            line: line.to_string(),
                            reason: e.to_string(),
                        });
                        break;
                    }
                },
            };

            let cmd = ImputeCommand::build(&self.config.inputs, &self.config.impute, &chunk);
            info!(
                "{}: chunk {} [{} {}] -> {}",
                self.identity,
                index,
                chunk.start,
                chunk.end,
                cmd.output().display()
            );
            debug!("{}", cmd.render());

            let outcome = self
                .runner
                .run(&cmd)
                .with_context(|| format!("Failed to run chunk {} ({} {})", index, chunk.start, chunk.end))?;

            if outcome.status.is_success() {
                debug!(
                    "{}: chunk {} finished in {:.1}s",
                    self.identity,
                    index,
                    outcome.elapsed.as_secs_f64()
                );
            } else {
                warn!(
                    "{}: chunk {} [{} {}] failed: {}",
                    self.identity, index, chunk.start, chunk.end, outcome.status
                );
            }
            stats.record_run(outcome.status.is_success());

            records.push(ChunkRecord {
                index,
                start: Some(chunk.start),
                end: Some(chunk.end),
                output: Some(cmd.output().to_path_buf()),
                outcome: ChunkOutcome::Ran(outcome.status),
                elapsed: outcome.elapsed,
            });
        }

        Ok(DispatchReport {
            identity: self.identity,
            host: host_name(),
            total_chunks: total,
            started,
            finished: Utc::now(),
            elapsed: clock.elapsed(),
            stats,
            records,
            aborted,
        })
    }
}

fn host_name() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string())
}
