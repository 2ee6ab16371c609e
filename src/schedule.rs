//! Round-robin chunk ownership
//!
//! Chunk `i` belongs to the worker with rank `i % size`. Each worker walks its
//! own indices `rank, rank + size, rank + 2*size, ...` in increasing order and
//! needs no coordination with the others.

use crate::collective::WorkerIdentity;

/// Indices owned by `identity` in a list of `total` chunks
pub fn assigned_indices(identity: WorkerIdentity, total: usize) -> impl Iterator<Item = usize> {
    (identity.rank()..total).step_by(identity.size())
}

/// Number of chunks owned by `identity`
pub fn assigned_count(identity: WorkerIdentity, total: usize) -> usize {
    let (rank, size) = (identity.rank(), identity.size());
    if rank >= total {
        0
    } else {
        (total - rank + size - 1) / size
    }
}

/// Rank owning chunk `index`
pub fn owner_of(index: usize, size: usize) -> usize {
    index % size
}
