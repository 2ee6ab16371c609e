//! CLI argument parsing using clap

use super::{InputPaths, MalformedPolicy};
use crate::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Program name shown in the usage line
pub const PROGRAM_NAME: &str = "impute-dispatch";

/// Positional parameters, in order
pub const POSITIONAL_NAMES: [&str; 6] = [
    "chunks file",
    "map file",
    "ref haplotypes file",
    "ref legend file",
    "phased sample haps file",
    "prefix for output files",
];

/// Usage line naming all six positional parameters
pub fn usage() -> String {
    let params: Vec<String> = POSITIONAL_NAMES.iter().map(|p| format!("<{}>", p)).collect();
    format!("{} {}", PROGRAM_NAME, params.join(" "))
}

/// impute-dispatch - run impute2 over a chunk list, round-robin across ranked workers
///
/// Every worker reads the same chunk file and runs the chunks whose line index
/// modulo the worker count equals its rank.
#[derive(Parser, Debug)]
#[command(name = "impute-dispatch")]
#[command(version, about, long_about = None)]
#[command(override_usage = "impute-dispatch [OPTIONS] <chunks file> <map file> <ref haplotypes file> <ref legend file> <phased sample haps file> <prefix for output files>")]
pub struct Cli {
    /// The six positional inputs (count is checked by `inputs()`)
    #[arg(value_name = "ARGS", num_args = 0.., allow_hyphen_values = true)]
    pub positional: Vec<PathBuf>,

    // === Collective Options ===
    /// Rank of this worker (requires --size); overrides launcher environment
    #[arg(long, env = "IMPUTE_DISPATCH_RANK")]
    pub rank: Option<usize>,

    /// Number of workers (requires --rank)
    #[arg(long, env = "IMPUTE_DISPATCH_SIZE")]
    pub size: Option<usize>,

    // === impute2 Options ===
    /// TOML parameter file ([impute] and [policy] tables)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// impute2 executable (name on PATH or explicit path)
    #[arg(long = "impute2", value_name = "PROGRAM")]
    pub program: Option<String>,

    // === Policy Options ===
    /// What to do with chunk lines that are not exactly two tokens
    #[arg(long, value_enum)]
    pub malformed: Option<MalformedArg>,

    /// Exit non-zero if any impute2 run of this worker fails
    #[arg(long)]
    pub fail_on_tool_error: bool,

    /// Print the commands this worker would run without running them
    #[arg(long)]
    pub dry_run: bool,

    // === Output Options ===
    /// Per-worker JSON summary path; "{rank}" is replaced by the worker rank,
    /// otherwise multi-worker runs insert ".<rank>" before the extension
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output (same as -vv)
    #[arg(long)]
    pub debug: bool,
}

/// Malformed chunk line handling
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MalformedArg {
    /// Warn and continue with the next chunk
    Skip,
    /// Stop this worker and exit with failure
    Abort,
}

impl From<MalformedArg> for MalformedPolicy {
    fn from(arg: MalformedArg) -> Self {
        match arg {
            MalformedArg::Skip => MalformedPolicy::Skip,
            MalformedArg::Abort => MalformedPolicy::Abort,
        }
    }
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The six positional inputs, or `None` when the count is wrong
    pub fn inputs(&self) -> Option<InputPaths> {
        match self.positional.as_slice() {
            [chunks, map, ref_haplotypes, ref_legend, sample_haplotypes, output_prefix] => {
                Some(InputPaths {
                    chunks: chunks.clone(),
                    map: map.clone(),
                    ref_haplotypes: ref_haplotypes.clone(),
                    ref_legend: ref_legend.clone(),
                    sample_haplotypes: sample_haplotypes.clone(),
                    output_prefix: output_prefix.clone(),
                })
            }
            _ => None,
        }
    }

    /// Explicit `(rank, size)` pair, if one was given
    ///
    /// The pair is checked here rather than by clap so that a wrong
    /// positional count still reaches the usage message.
    pub fn fixed_rank(&self) -> Result<Option<(usize, usize)>> {
        match (self.rank, self.size) {
            (Some(rank), Some(size)) => Ok(Some((rank, size))),
            (None, None) => Ok(None),
            (Some(_), None) => anyhow::bail!("--rank requires --size (or IMPUTE_DISPATCH_SIZE)"),
            (None, Some(_)) => anyhow::bail!("--size requires --rank (or IMPUTE_DISPATCH_RANK)"),
        }
    }

    /// Log filter level derived from `-v` and `--debug`
    pub fn log_level(&self) -> &'static str {
        let count = if self.debug { self.verbose.max(2) } else { self.verbose };
        match count {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once(PROGRAM_NAME).chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_six_positionals_map_in_order() {
        let cli = parse(&["chunks.txt", "map.txt", "ref.hap", "ref.legend", "sample.haps", "out"]);
        let inputs = cli.inputs().unwrap();
        assert_eq!(inputs.chunks, PathBuf::from("chunks.txt"));
        assert_eq!(inputs.map, PathBuf::from("map.txt"));
        assert_eq!(inputs.ref_haplotypes, PathBuf::from("ref.hap"));
        assert_eq!(inputs.ref_legend, PathBuf::from("ref.legend"));
        assert_eq!(inputs.sample_haplotypes, PathBuf::from("sample.haps"));
        assert_eq!(inputs.output_prefix, PathBuf::from("out"));
    }

    #[test]
    fn test_wrong_positional_count() {
        assert!(parse(&["a", "b", "c"]).inputs().is_none());
        assert!(parse(&["a", "b", "c", "d", "e", "f", "g", "h"]).inputs().is_none());
        assert!(parse(&[]).inputs().is_none());
    }

    #[test]
    fn test_usage_names_all_parameters() {
        let usage = usage();
        assert!(usage.starts_with(PROGRAM_NAME));
        for name in POSITIONAL_NAMES {
            assert!(usage.contains(&format!("<{}>", name)), "missing {}", name);
        }
    }

    #[test]
    fn test_rank_requires_size() {
        let cli = parse(&["--rank", "1", "a"]);
        assert!(cli.inputs().is_none());
        assert!(cli.fixed_rank().is_err());

        assert!(parse(&["--size", "2", "a", "b", "c", "d", "e", "f"]).fixed_rank().is_err());

        let cli = parse(&["--rank", "1", "--size", "4", "a"]);
        assert_eq!(cli.fixed_rank().unwrap(), Some((1, 4)));
    }

    #[test]
    fn test_hyphen_leading_positionals() {
        let cli = parse(&["chunks.txt", "map.txt", "ref.hap", "ref.legend", "sample.haps", "-out", "--dry-run"]);
        let inputs = cli.inputs().unwrap();
        assert_eq!(inputs.output_prefix, PathBuf::from("-out"));
        assert!(cli.dry_run);

        let cli = parse(&["-v", "--", "-c", "map.txt", "ref.hap", "ref.legend", "sample.haps", "out"]);
        assert_eq!(cli.inputs().unwrap().chunks, PathBuf::from("-c"));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&[]).log_level(), "warn");
        assert_eq!(parse(&["-v"]).log_level(), "info");
        assert_eq!(parse(&["-vv"]).log_level(), "debug");
        assert_eq!(parse(&["--debug"]).log_level(), "debug");
        assert_eq!(parse(&["-vvvv"]).log_level(), "trace");
    }
}
