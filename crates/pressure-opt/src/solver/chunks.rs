//! Static partition of the first-level target range.

use std::ops::Range;

/// Split `0..num_targets` into `num_chunks` contiguous ranges.
///
/// Every chunk gets `num_targets / num_chunks` targets; the remainder goes to
/// the last chunk. With more chunks than targets the leading chunks are empty.
pub fn partition_targets(num_targets: usize, num_chunks: usize) -> Vec<Range<usize>> {
    assert!(num_chunks > 0, "num_chunks must be at least 1");
    let per_chunk = num_targets / num_chunks;
    (0..num_chunks)
        .map(|k| {
            let begin = k * per_chunk;
            let end = if k + 1 == num_chunks {
                num_targets
            } else {
                begin + per_chunk
            };
            begin..end
        })
        .collect()
}
