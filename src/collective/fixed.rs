//! Command-line supplied rank and size

use super::{Collective, WorkerIdentity};
use crate::Result;

/// Collective whose identity was decided by whoever started the process
///
/// Used when workers are launched by a plain job script that hands each
/// process `--rank` and `--size`. There is nothing to tear down.
#[derive(Debug, Clone)]
pub struct FixedCollective {
    rank: usize,
    size: usize,
}

impl FixedCollective {
    pub fn new(rank: usize, size: usize) -> Self {
        Self { rank, size }
    }
}

impl Collective for FixedCollective {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn join(&mut self) -> Result<WorkerIdentity> {
        Ok(WorkerIdentity::new(self.rank, self.size)?)
    }

    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_join() {
        let mut collective = FixedCollective::new(1, 3);
        let identity = collective.join().unwrap();
        assert_eq!(identity.rank(), 1);
        assert_eq!(identity.size(), 3);
        assert!(collective.finalize().is_ok());
    }

    #[test]
    fn test_fixed_rejects_bad_rank() {
        let mut collective = FixedCollective::new(3, 3);
        let err = collective.join().unwrap_err();
        assert!(err.to_string().contains("out of range"));

        let mut collective = FixedCollective::new(0, 0);
        assert!(collective.join().is_err());
    }
}
