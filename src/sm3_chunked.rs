//! Partitioned SM3.
//!
//! Large messages are cut into contiguous block ranges that are compressed on
//! rayon's thread pool. Every range starts from the initial value rather than
//! from the state left by the previous range, and the resulting states are
//! XORed together. With a single non-empty range this is plain SM3; with two
//! or more the digest is NOT the SM3 digest of the message. Callers that need
//! interoperable digests must use [`sm3`](crate::sm3).

use crate::sm3_impl::{compress_blocks, padded_len, IV};
use crate::*;
use log::*;
use rayon::prelude::*;

/// Padded messages up to this many bytes are hashed sequentially.
pub const DEFAULT_THRESHOLD: usize = 1024 * 1024;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChunkConfig {
    /// Padded length (bytes) above which the message is partitioned.
    pub threshold: usize,
    /// Number of partitions; `None` uses one per rayon worker thread.
    pub partitions: Option<usize>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        ChunkConfig {
            threshold: DEFAULT_THRESHOLD,
            partitions: None,
        }
    }
}

impl ChunkConfig {
    pub fn partition_count(&self) -> usize {
        self.partitions
            .unwrap_or_else(rayon::current_num_threads)
            .max(1)
    }
}

/// Block ranges of each partition: `block_count / n` blocks per partition,
/// the last one also taking the remainder. Empty ranges are left out.
pub fn partition_blocks(block_count: usize, n: usize) -> Vec<Range<usize>> {
    let n = n.max(1);
    let per_partition = block_count / n;
    // every range but the last would be empty
    if per_partition == 0 {
        return if block_count == 0 {
            Vec::new()
        } else {
            vec![0..block_count]
        };
    }
    (0..n)
        .map(|t| {
            let start = t * per_partition;
            let end = if t == n - 1 {
                block_count
            } else {
                (t + 1) * per_partition
            };
            start..end
        })
        .filter(|range| !range.is_empty())
        .collect()
}

/// Hash `input`, partitioning it when its padded length exceeds
/// `config.threshold`.
pub fn hash_chunked(input: &[u8], config: &ChunkConfig) -> Digest {
    if padded_len(input.len()) <= config.threshold {
        return sm3(input);
    }

    let preprocessed = pad_message(input);
    let block_count = preprocessed.len() / SM3_BLOCK_SIZE;
    let ranges = partition_blocks(block_count, config.partition_count());
    debug!(
        "Hashing {} blocks in {} partitions",
        block_count,
        ranges.len()
    );

    // each task owns its state and returns it; merged after the join
    let partial_states: Vec<[u32; 8]> = ranges
        .into_par_iter()
        .map(|range| {
            trace!("Compressing blocks {:?}", range);
            let mut state = IV;
            compress_blocks(
                &mut state,
                &preprocessed[range.start * SM3_BLOCK_SIZE..range.end * SM3_BLOCK_SIZE],
            );
            state
        })
        .collect();

    let merged = partial_states
        .iter()
        .fold([0u32; 8], |mut acc, state| {
            for (a, s) in acc.iter_mut().zip(state.iter()) {
                *a ^= s;
            }
            acc
        });
    Digest::from_state(&merged)
}

fn hash_chunked_default(input: &[u8]) -> Digest {
    hash_chunked(input, &ChunkConfig::default())
}

pub const HASH: Hash = hash_chunked_default;
