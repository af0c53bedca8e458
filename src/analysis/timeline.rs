//! Time bucketing for the throughput, bug and work-mix trend series.
//!
//! The selected range is split into at most six contiguous buckets, sized
//! as evenly as possible with the remainder given to the earliest buckets.

use super::round;
use crate::models::{Bucket, CountPoint, MixPoint, Task, TypeCounts};
use chrono::{Duration, NaiveDate};

/// Maximum number of buckets in a series.
pub const MAX_BUCKETS: u32 = 6;

/// How a date range is split into buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketPlan {
    start: NaiveDate,
    total_days: u32,
    sizes: Vec<u32>,
    /// Inclusive end offset of each bucket, counted from `start`.
    ends: Vec<u32>,
}

impl BucketPlan {
    /// Plan buckets for the inclusive range `[start, end]`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let span = (end - start).num_days() + 1;
        let total_days = span.max(1) as u32;
        let count = MAX_BUCKETS.min(total_days);
        let base = total_days / count;
        let remainder = total_days % count;

        let sizes: Vec<u32> = (0..count)
            .map(|i| if i < remainder { base + 1 } else { base })
            .collect();

        let ends = sizes
            .iter()
            .scan(0u32, |covered, size| {
                *covered += size;
                Some(*covered - 1)
            })
            .collect();

        Self {
            start,
            total_days,
            sizes,
            ends,
        }
    }

    pub fn total_days(&self) -> u32 {
        self.total_days
    }

    pub fn bucket_count(&self) -> u32 {
        self.sizes.len() as u32
    }

    #[cfg(test)]
    fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    /// Bucket index for a date, or `None` when it falls outside the range.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.start).num_days();
        if offset < 0 || offset >= self.total_days as i64 {
            return None;
        }
        self.ends.iter().position(|&end| end as i64 >= offset)
    }

    /// Date bounds and labels of every bucket.
    pub fn buckets(&self) -> Vec<Bucket> {
        self.sizes
            .iter()
            .zip(&self.ends)
            .map(|(&days, &end)| {
                let last = self.start + Duration::days(end as i64);
                let first = last - Duration::days(days as i64 - 1);
                Bucket {
                    start: first,
                    end: last,
                    days,
                    label: label(first, last),
                }
            })
            .collect()
    }

    /// Count the given completion dates per bucket.
    pub fn count_series<I>(&self, dates: I) -> Vec<CountPoint>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut counts = vec![0usize; self.sizes.len()];
        for date in dates {
            if let Some(i) = self.index_of(date) {
                counts[i] += 1;
            }
        }

        let max = counts.iter().copied().max().unwrap_or(0);
        self.buckets()
            .into_iter()
            .zip(counts)
            .map(|(bucket, count)| CountPoint {
                bucket,
                count,
                height: bar_height(count, max),
            })
            .collect()
    }

    /// Break completed tasks down by type per bucket, keyed on end date.
    pub fn mix_series(&self, tasks: &[&Task]) -> Vec<MixPoint> {
        let mut counts = vec![TypeCounts::default(); self.sizes.len()];
        for task in tasks {
            if let Some(i) = self.index_of(task.end_date) {
                counts[i].add(task.task_type);
            }
        }

        let max = counts.iter().map(TypeCounts::total).max().unwrap_or(0);
        self.buckets()
            .into_iter()
            .zip(counts)
            .map(|(bucket, counts)| {
                let total = counts.total();
                MixPoint {
                    bucket,
                    counts,
                    total,
                    height: bar_height(total, max),
                }
            })
            .collect()
    }
}

/// Bar height relative to the tallest bucket, 0-100.
pub fn bar_height(count: usize, max: usize) -> u32 {
    round(count as f64 / max.max(1) as f64 * 100.0) as u32
}

fn label(first: NaiveDate, last: NaiveDate) -> String {
    if first == last {
        first.format("%b %d").to_string()
    } else {
        format!("{} - {}", first.format("%b %d"), last.format("%b %d"))
    }
}
