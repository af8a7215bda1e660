//! Contiguous near-even partitioning of the question sequence.
//!
//! When the combined prompt does not fit one generation call, the
//! enriched questions are split into `k` contiguous slices so each slice
//! maps to exactly one sub-call. Slices stay contiguous to preserve
//! section locality inside each partial prompt.

use crate::core::error::DomainError;
use std::ops::Range;

/// Split `len` items into `k` contiguous, near-even index ranges.
///
/// With `base = len / k` and `remainder = len % k`, the first
/// `remainder` ranges hold `base + 1` items and the rest hold `base`.
/// The ranges cover `0..len` without gaps or overlap.
pub fn slice_ranges(len: usize, k: usize) -> Result<Vec<Range<usize>>, DomainError> {
    if k < 2 {
        return Err(DomainError::InvalidSplitCount(k));
    }

    let base = len / k;
    let remainder = len % k;

    let mut ranges = Vec::with_capacity(k);
    let mut start = 0;
    for i in 0..k {
        let size = base + usize::from(i < remainder);
        ranges.push(start..start + size);
        start += size;
    }
    Ok(ranges)
}
