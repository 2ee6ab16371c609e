//! impute-dispatch CLI entry point

use anyhow::{Context, Result};
use impute_dispatch::chunk::ChunkList;
use impute_dispatch::collective::{env::EnvCollective, fixed::FixedCollective, Collective, Membership};
use impute_dispatch::config::cli::{usage, Cli};
use impute_dispatch::config::{toml::build_config, validator::validate_config, InputPaths};
use impute_dispatch::dispatcher::Dispatcher;
use impute_dispatch::output;
use impute_dispatch::runner::{dry_run::DryRunRunner, process::ProcessRunner, CommandRunner};
use log::{debug, warn};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Wrong argument count is a usage request, not a failure
    let inputs = match cli.inputs() {
        Some(inputs) => inputs,
        None => {
            println!("\nUsage:");
            println!("{}\n", usage());
            return ExitCode::SUCCESS;
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level())).init();

    match run(&cli, inputs) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, inputs: InputPaths) -> Result<ExitCode> {
    let config = build_config(cli, inputs)?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Configuration: {:?}", config);

    let collective: Box<dyn Collective> = match cli.fixed_rank()? {
        Some((rank, size)) => Box::new(FixedCollective::new(rank, size)),
        None => Box::new(EnvCollective::new()),
    };
    let membership = Membership::join(collective).context("Failed to join worker collective")?;
    let identity = membership.identity();

    if identity.is_root() {
        println!("myrank={} nproc={}", identity.rank(), identity.size());
    }

    // Every worker reads the chunk file itself and fails on its own
    let chunks = match ChunkList::load(&config.inputs.chunks) {
        Ok(chunks) => chunks,
        Err(e) => {
            eprintln!("ERROR: {:#}\n", anyhow::Error::from(e));
            membership.finalize()?;
            return Ok(ExitCode::FAILURE);
        }
    };
    debug!("{}: loaded {} chunks from {}", identity, chunks.len(), config.inputs.chunks.display());

    let config = Arc::new(config);
    let runner: Box<dyn CommandRunner> = if config.policy.dry_run {
        Box::new(DryRunRunner::stdout())
    } else {
        Box::new(ProcessRunner::new())
    };

    let mut dispatcher = Dispatcher::new(identity, config.clone(), runner);
    let report = dispatcher.run(&chunks)?;

    output::text::log_summary(&report);
    if let Some(path) = config.output.summary_path_for(identity) {
        if let Err(e) = output::json::write_summary(&report, &path) {
            warn!("{}: {:#}", identity, e);
        }
    }

    membership.finalize()?;

    if report.is_failure(&config.policy) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
