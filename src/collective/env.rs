//! Launcher-environment membership
//!
//! MPI launchers and Slurm export each process's rank and the world size before
//! `exec`. Reading them gives the same (rank, size) an MPI_Init would, without
//! linking an MPI library.

use super::{Collective, IdentityError, WorkerIdentity};
use crate::Result;
use log::{debug, info};

/// Rank/size variable pairs, checked in order
pub const LAUNCHER_VARS: [(&str, &str, &str); 3] = [
    ("Open MPI", "OMPI_COMM_WORLD_RANK", "OMPI_COMM_WORLD_SIZE"),
    ("PMI", "PMI_RANK", "PMI_SIZE"),
    ("Slurm", "SLURM_PROCID", "SLURM_NTASKS"),
];

type Lookup = Box<dyn Fn(&str) -> Option<String>>;

/// Collective discovered from the launcher environment
///
/// With no launcher variables present the process is a singleton collective.
pub struct EnvCollective {
    lookup: Lookup,
    launcher: Option<&'static str>,
}

impl EnvCollective {
    /// Read from the process environment
    pub fn new() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    /// Read from an arbitrary lookup (tests, embedding)
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        Self {
            lookup: Box::new(lookup),
            launcher: None,
        }
    }

    fn parse_var(&self, var: &str, value: &str) -> std::result::Result<usize, IdentityError> {
        value.trim().parse().map_err(|_| IdentityError::InvalidVar {
            var: var.to_string(),
            value: value.to_string(),
        })
    }

    fn discover(&mut self) -> std::result::Result<WorkerIdentity, IdentityError> {
        for (launcher, rank_var, size_var) in LAUNCHER_VARS {
            let rank = (self.lookup)(rank_var);
            let size = (self.lookup)(size_var);
            match (rank, size) {
                (Some(rank), Some(size)) => {
                    let rank = self.parse_var(rank_var, &rank)?;
                    let size = self.parse_var(size_var, &size)?;
                    self.launcher = Some(launcher);
                    debug!("Found {} launcher variables {}={} {}={}", launcher, rank_var, rank, size_var, size);
                    return WorkerIdentity::new(rank, size);
                }
                (Some(_), None) => {
                    return Err(IdentityError::MissingPair {
                        present: rank_var.to_string(),
                        missing: size_var.to_string(),
                    });
                }
                (None, Some(_)) => {
                    return Err(IdentityError::MissingPair {
                        present: size_var.to_string(),
                        missing: rank_var.to_string(),
                    });
                }
                (None, None) => {}
            }
        }

        info!("No launcher environment found, running as a single worker");
        Ok(WorkerIdentity::singleton())
    }
}

impl Default for EnvCollective {
    fn default() -> Self {
        Self::new()
    }
}

impl Collective for EnvCollective {
    /// Launcher that supplied the identity once joined
    fn name(&self) -> &'static str {
        self.launcher.unwrap_or("environment")
    }

    fn join(&mut self) -> Result<WorkerIdentity> {
        Ok(self.discover()?)
    }

    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}
