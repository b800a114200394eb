//! Job-level progress from per-chunk reports.
//!
//! Chunks report `(done, total)` pixel counts every
//! [`DEFAULT_PROGRESS_INTERVAL`] pixels. The aggregator keeps the latest
//! fraction per chunk and reports the truncated average as a percentage.
//! Because it works from absolute per-chunk state rather than deltas, late
//! or reordered reports can never move the percentage backwards.

/// Pixels a chunk processes between two progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100_000;

/// One progress report from a running chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub chunk: usize,
    pub done: usize,
    pub total: usize,
}

impl ProgressEvent {
    #[inline]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.done as f64 / self.total as f64
        }
    }
}

/// Combines per-chunk progress into one monotonic percentage.
///
/// ```
/// use oklab_recolor::{ProgressAggregator, ProgressEvent};
///
/// let mut progress = ProgressAggregator::new(2);
/// let pct = progress.record(ProgressEvent { chunk: 0, done: 50, total: 100 });
/// assert_eq!(pct, Some(25));
/// assert_eq!(progress.complete(0), Some(50));
/// assert_eq!(progress.complete(1), Some(100));
/// ```
#[derive(Debug, Clone)]
pub struct ProgressAggregator {
    fractions: Vec<f64>,
    percent: u8,
}

impl ProgressAggregator {
    pub fn new(chunks: usize) -> Self {
        Self {
            fractions: vec![0.0; chunks],
            percent: 0,
        }
    }

    /// Current job-level percentage, 0..=100.
    #[inline]
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Apply a chunk report. Returns the new percentage if it went up.
    ///
    /// Reports for unknown chunks are ignored.
    pub fn record(&mut self, event: ProgressEvent) -> Option<u8> {
        self.update(event.chunk, event.fraction())
    }

    /// Mark a chunk finished. Returns the new percentage if it went up.
    pub fn complete(&mut self, chunk: usize) -> Option<u8> {
        self.update(chunk, 1.0)
    }

    fn update(&mut self, chunk: usize, fraction: f64) -> Option<u8> {
        let slot = self.fractions.get_mut(chunk)?;
        // a chunk's fraction only moves forward
        if fraction <= *slot {
            return None;
        }
        *slot = fraction.min(1.0);

        let sum: f64 = self.fractions.iter().sum();
        let percent = (sum / self.fractions.len() as f64 * 100.0).trunc() as u8;
        if percent > self.percent {
            self.percent = percent;
            Some(percent)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(chunk: usize, done: usize, total: usize) -> ProgressEvent {
        ProgressEvent { chunk, done, total }
    }

    #[test]
    fn test_average_of_fractions_truncated() {
        let mut agg = ProgressAggregator::new(3);
        // 1/3 of one chunk = 11.1% of the job
        assert_eq!(agg.record(event(0, 1, 3)), Some(11));
        assert_eq!(agg.record(event(1, 2, 3)), Some(33));
        assert_eq!(agg.percent(), 33);
    }

    #[test]
    fn test_out_of_order_reports_never_regress() {
        let mut agg = ProgressAggregator::new(2);
        assert_eq!(agg.record(event(0, 80, 100)), Some(40));
        // a stale report from the same chunk
        assert_eq!(agg.record(event(0, 20, 100)), None);
        assert_eq!(agg.percent(), 40);
        // a report arriving after the chunk already completed
        assert_eq!(agg.complete(0), Some(50));
        assert_eq!(agg.record(event(0, 90, 100)), None);
        assert_eq!(agg.percent(), 50);
    }

    #[test]
    fn test_completion_reaches_100() {
        let mut agg = ProgressAggregator::new(7);
        let mut seen = Vec::new();
        for chunk in (0..7).rev() {
            if let Some(p) = agg.complete(chunk) {
                seen.push(p);
            }
        }
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_chunk_event_counts_as_done() {
        assert_eq!(event(0, 0, 0).fraction(), 1.0);
    }

    #[test]
    fn test_unknown_chunk_ignored() {
        let mut agg = ProgressAggregator::new(1);
        assert_eq!(agg.record(event(5, 1, 1)), None);
        assert_eq!(agg.percent(), 0);
    }
}
