//! TOML parameter file parsing
//!
//! The parameter file carries the impute2 settings and the dispatch policy:
//!
//! ```toml
//! [impute]
//! program = "/appl/impute-2.3.2/impute2"
//! ne = 20000
//! buffer = "250kb"
//! call_thresh = 0.9
//!
//! [policy]
//! malformed = "abort"
//! fail_on_tool_error = true
//! ```
//!
//! CLI flags take precedence over the file, which takes precedence over defaults.

use super::*;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;

/// On-disk parameter file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamsFile {
    #[serde(default)]
    pub impute: ImputeParams,
    #[serde(default)]
    pub policy: DispatchPolicy,
}

/// Parse TOML parameter file
pub fn parse_toml_file(path: &Path) -> Result<ParamsFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML parameter file contents
pub fn parse_toml_string(contents: &str) -> Result<ParamsFile> {
    let params: ParamsFile = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(params)
}

/// Merge CLI arguments with the parameter file (CLI takes precedence)
pub fn merge_cli_with_params(cli: &Cli, inputs: InputPaths, params: ParamsFile) -> DispatchConfig {
    let ParamsFile { mut impute, mut policy } = params;

    if let Some(ref program) = cli.program {
        impute.program = program.clone();
    }
    if let Some(malformed) = cli.malformed {
        policy.malformed = malformed.into();
    }
    if cli.fail_on_tool_error {
        policy.fail_on_tool_error = true;
    }
    if cli.dry_run {
        policy.dry_run = true;
    }

    DispatchConfig {
        inputs,
        impute,
        policy,
        output: OutputConfig {
            summary_json: cli.summary_json.clone(),
        },
    }
}

/// Build the full configuration from CLI arguments and the optional parameter file
pub fn build_config(cli: &Cli, inputs: InputPaths) -> Result<DispatchConfig> {
    let params = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => ParamsFile::default(),
    };

    Ok(merge_cli_with_params(cli, inputs, params))
}
