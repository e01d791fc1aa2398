//! Row-range work partitioning.

use smallvec::SmallVec;

use crate::foundation::core::Rect;

/// Half-open row span `[min_row, max_row)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RowRange {
    pub(crate) min_row: u32,
    pub(crate) max_row: u32, // exclusive
}

impl RowRange {
    pub(crate) fn len(self) -> usize {
        (self.max_row - self.min_row) as usize
    }
}

pub(crate) type RowPlan = SmallVec<[RowRange; 16]>;

/// Split `rect`'s rows into contiguous, disjoint ranges covering `[rect.y, rect.bottom())`.
///
/// At most `concurrency` ranges are produced, and fewer when a range would drop below
/// `min_rows_per_partition` rows (buffer acquisition and bin clearing are paid per range).
/// Rows divide evenly; the last range absorbs the remainder. Empty rects produce no ranges.
pub(crate) fn partition_rows(
    rect: Rect,
    concurrency: usize,
    min_rows_per_partition: usize,
) -> RowPlan {
    let rows = rect.height as usize;
    if rect.is_empty() {
        return RowPlan::new();
    }

    let by_overhead = (rows / min_rows_per_partition.max(1)).max(1);
    let parts = concurrency.max(1).min(by_overhead).min(rows);
    let base = (rows / parts) as u32;

    let mut plan = RowPlan::with_capacity(parts);
    let mut start = rect.y;
    for i in 0..parts {
        let end = if i + 1 == parts {
            rect.bottom()
        } else {
            start + base
        };
        plan.push(RowRange {
            min_row: start,
            max_row: end,
        });
        start = end;
    }
    plan
}

#[cfg(test)]
#[path = "../tests/unit/partition.rs"]
mod tests;
