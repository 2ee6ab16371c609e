//! Collective membership
//!
//! A collective is the fixed group of worker processes started together by a
//! launcher (`mpirun`, `srun`, or a job script). Membership gives each process a
//! [`WorkerIdentity`] once at startup; after that the workers never talk to each
//! other again.
//!
//! # Backends
//!
//! - [`fixed::FixedCollective`]: rank and size supplied on the command line
//! - [`env::EnvCollective`]: rank and size published by the launcher in the
//!   environment (Open MPI, MPICH/Intel MPI PMI, Slurm)
//!
//! # Lifecycle
//!
//! [`Membership::join`] joins the collective and holds it until
//! [`Membership::finalize`] is called or the guard is dropped. Either way the
//! backend's `finalize` runs exactly once, so every exit path after a successful
//! join leaves the collective.

pub mod env;
pub mod fixed;

use crate::Result;
use log::{debug, warn};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Identity of one worker in the collective
///
/// Always `size >= 1` and `rank < size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerIdentity {
    rank: usize,
    size: usize,
}

impl WorkerIdentity {
    /// Create an identity, rejecting an empty collective or an out-of-range rank
    pub fn new(rank: usize, size: usize) -> std::result::Result<Self, IdentityError> {
        if size == 0 {
            return Err(IdentityError::ZeroSize);
        }
        if rank >= size {
            return Err(IdentityError::RankOutOfRange { rank, size });
        }
        Ok(Self { rank, size })
    }

    /// Identity of a process running alone
    pub fn singleton() -> Self {
        Self { rank: 0, size: 1 }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_root(&self) -> bool {
        self.rank == 0
    }
}

impl fmt::Display for WorkerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rank {}/{}", self.rank, self.size)
    }
}

/// Errors establishing a worker identity
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("collective size must be at least 1")]
    ZeroSize,
    #[error("rank {rank} is out of range for collective of size {size}")]
    RankOutOfRange { rank: usize, size: usize },
    #[error("environment variable {var} has invalid value {value:?}")]
    InvalidVar { var: String, value: String },
    #[error("environment variable {present} is set but {missing} is not")]
    MissingPair { present: String, missing: String },
}

/// A membership protocol that assigns rank and size
pub trait Collective {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Join the collective and learn this worker's identity
    fn join(&mut self) -> Result<WorkerIdentity>;

    /// Leave the collective
    fn finalize(&mut self) -> Result<()>;
}

/// Joined collective; finalizes exactly once
pub struct Membership {
    collective: Option<Box<dyn Collective>>,
    identity: WorkerIdentity,
}

impl Membership {
    /// Join `collective`
    ///
    /// If joining fails the collective is not held and nothing is finalized.
    pub fn join(mut collective: Box<dyn Collective>) -> Result<Self> {
        let identity = collective.join()?;
        debug!("Joined {} collective as {}", collective.name(), identity);
        Ok(Self {
            collective: Some(collective),
            identity,
        })
    }

    pub fn identity(&self) -> WorkerIdentity {
        self.identity
    }

    /// Leave the collective
    pub fn finalize(mut self) -> Result<()> {
        self.leave()
    }

    fn leave(&mut self) -> Result<()> {
        match self.collective.take() {
            Some(mut collective) => {
                debug!("Leaving {} collective as {}", collective.name(), self.identity);
                collective.finalize()
            }
            None => Ok(()),
        }
    }
}

impl Drop for Membership {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            warn!("Failed to leave collective as {}: {:#}", self.identity, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingCollective {
        identity: WorkerIdentity,
        joins: Arc<AtomicUsize>,
        finalizes: Arc<AtomicUsize>,
        fail_join: bool,
    }

    impl Collective for CountingCollective {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn join(&mut self) -> Result<WorkerIdentity> {
            self.joins.fetch_add(1, Ordering::SeqCst);
            if self.fail_join {
                anyhow::bail!("join refused");
            }
            Ok(self.identity)
        }

        fn finalize(&mut self) -> Result<()> {
            self.finalizes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn counting(fail_join: bool) -> (Box<dyn Collective>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let joins = Arc::new(AtomicUsize::new(0));
        let finalizes = Arc::new(AtomicUsize::new(0));
        let collective = CountingCollective {
            identity: WorkerIdentity::new(2, 4).unwrap(),
            joins: joins.clone(),
            finalizes: finalizes.clone(),
            fail_join,
        };
        (Box::new(collective), joins, finalizes)
    }

    #[test]
    fn test_identity_validation() {
        assert_eq!(WorkerIdentity::new(0, 0), Err(IdentityError::ZeroSize));
        assert_eq!(
            WorkerIdentity::new(4, 4),
            Err(IdentityError::RankOutOfRange { rank: 4, size: 4 })
        );

        let identity = WorkerIdentity::new(3, 4).unwrap();
        assert_eq!(identity.rank(), 3);
        assert_eq!(identity.size(), 4);
        assert!(!identity.is_root());
        assert_eq!(identity.to_string(), "rank 3/4");

        assert!(WorkerIdentity::singleton().is_root());
        assert_eq!(WorkerIdentity::singleton().size(), 1);
    }

    #[test]
    fn test_explicit_finalize_runs_once() {
        let (collective, joins, finalizes) = counting(false);
        let membership = Membership::join(collective).unwrap();
        assert_eq!(membership.identity(), WorkerIdentity::new(2, 4).unwrap());

        membership.finalize().unwrap();
        assert_eq!(joins.load(Ordering::SeqCst), 1);
        assert_eq!(finalizes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_finalizes_once() {
        let (collective, _joins, finalizes) = counting(false);
        {
            let _membership = Membership::join(collective).unwrap();
            assert_eq!(finalizes.load(Ordering::SeqCst), 0);
        }
        assert_eq!(finalizes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_join_does_not_finalize() {
        let (collective, joins, finalizes) = counting(true);
        assert!(Membership::join(collective).is_err());
        assert_eq!(joins.load(Ordering::SeqCst), 1);
        assert_eq!(finalizes.load(Ordering::SeqCst), 0);
    }
}
