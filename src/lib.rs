//! impute-dispatch - run impute2 over a chunk list across ranked workers
//!
//! A fixed collective of worker processes (started by `mpirun`, `srun`, or a job
//! script) each read the same chunk file. Chunk `i` belongs to the worker whose
//! rank is `i % size`; every worker runs impute2 once per owned chunk, one at a
//! time, writing `<prefix>.pos<start>-<end>.best_guess_haps_imputation.impute2`.
//!
//! # Architecture
//!
//! - **config**: CLI, TOML parameter file, validation
//! - **collective**: rank/size discovery and the membership guard
//! - **chunk**: chunk file loading and line parsing
//! - **schedule**: round-robin ownership
//! - **command**: impute2 argv construction
//! - **runner**: subprocess, dry-run, and mock execution
//! - **dispatcher**: the per-worker loop
//! - **output**: text and JSON summaries

pub mod chunk;
pub mod collective;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod output;
pub mod runner;
pub mod schedule;

// Re-export commonly used types
pub use chunk::{ChunkDescriptor, ChunkList};
pub use collective::WorkerIdentity;
pub use config::DispatchConfig;
pub use dispatcher::Dispatcher;

/// Result type used throughout impute-dispatch
pub type Result<T> = anyhow::Result<T>;
