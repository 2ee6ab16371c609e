//! Configuration module
//!
//! Handles CLI argument parsing, the optional TOML parameter file, and validation.
//! The resolved [`DispatchConfig`] is immutable once built and is shared by the
//! dispatcher, the command builder, and the output writers.

pub mod cli;
pub mod toml;
pub mod validator;

use crate::collective::WorkerIdentity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Complete dispatch configuration
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub inputs: InputPaths,
    pub impute: ImputeParams,
    pub policy: DispatchPolicy,
    pub output: OutputConfig,
}

/// The six positional inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    /// Chunk list, one `<start> <end>` pair per line
    pub chunks: PathBuf,
    /// Genetic map (`-m`)
    pub map: PathBuf,
    /// Reference haplotypes (`-h`)
    pub ref_haplotypes: PathBuf,
    /// Reference legend (`-l`)
    pub ref_legend: PathBuf,
    /// Pre-phased sample haplotypes (`-known_haps_g`)
    pub sample_haplotypes: PathBuf,
    /// Prefix every per-chunk output file starts with
    pub output_prefix: PathBuf,
}

/// Parameters forwarded to impute2 on every invocation
///
/// The defaults reproduce the fixed command template byte for byte; a parameter
/// file may override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImputeParams {
    /// Program to execute (name on `PATH` or explicit path)
    #[serde(default = "default_program")]
    pub program: String,
    /// Effective population size (`-Ne`)
    #[serde(default = "default_ne")]
    pub ne: u32,
    /// Flanking buffer (`-buffer`)
    #[serde(default = "default_buffer")]
    pub buffer: String,
    /// Hard-call probability threshold (`-call_thresh`)
    #[serde(default = "default_call_thresh")]
    pub call_thresh: f64,
    /// Pass `-allow_large_regions`
    #[serde(default = "default_allow_large_regions")]
    pub allow_large_regions: bool,
    /// Extra arguments appended before `-o`
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_program() -> String {
    "impute2".to_string()
}

fn default_ne() -> u32 {
    20000
}

fn default_buffer() -> String {
    "250kb".to_string()
}

fn default_call_thresh() -> f64 {
    0.9
}

fn default_allow_large_regions() -> bool {
    true
}

impl Default for ImputeParams {
    fn default() -> Self {
        Self {
            program: default_program(),
            ne: default_ne(),
            buffer: default_buffer(),
            call_thresh: default_call_thresh(),
            allow_large_regions: default_allow_large_regions(),
            extra_args: Vec::new(),
        }
    }
}

/// What a worker does with a chunk line that is not exactly two tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Log a warning, count the line, keep going
    Skip,
    /// Stop this worker's loop and exit with failure
    Abort,
}

impl Default for MalformedPolicy {
    fn default() -> Self {
        Self::Skip
    }
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedPolicy::Skip => write!(f, "skip"),
            MalformedPolicy::Abort => write!(f, "abort"),
        }
    }
}

/// Dispatch loop behavior
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchPolicy {
    #[serde(default)]
    pub malformed: MalformedPolicy,
    /// Exit non-zero when any impute2 run of this worker failed
    #[serde(default)]
    pub fail_on_tool_error: bool,
    /// Print commands instead of running them
    #[serde(default)]
    pub dry_run: bool,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Per-worker JSON summary; `{rank}` is replaced by the worker rank
    pub summary_json: Option<PathBuf>,
}

impl OutputConfig {
    /// Resolve the summary path for one worker
    ///
    /// Without a `{rank}` placeholder the path is used as is by a lone worker;
    /// in a larger collective the rank is inserted before the extension
    /// (`summary.json` becomes `summary.3.json`).
    pub fn summary_path_for(&self, identity: WorkerIdentity) -> Option<PathBuf> {
        self.summary_json.as_deref().map(|p| expand_rank(p, identity))
    }
}

fn expand_rank(path: &Path, identity: WorkerIdentity) -> PathBuf {
    let rank = identity.rank().to_string();
    let raw = path.to_string_lossy();
    if raw.contains("{rank}") {
        return PathBuf::from(raw.replace("{rank}", &rank));
    }
    if identity.size() == 1 {
        return path.to_path_buf();
    }

    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(&rank);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}
