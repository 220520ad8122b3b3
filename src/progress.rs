//! # Progress Reporting Module
//!
//! One extraction request reports a single 0-1 progress fraction to its
//! caller. The two OCR passes run concurrently and each owns a sub-window of
//! that range, so the reporter clamps delivered values to a monotonically
//! non-decreasing sequence regardless of how the passes interleave.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type ProgressCallback = dyn Fn(f64) + Send + Sync;

/// Monotonic progress reporter with sub-range scaling.
///
/// Cloning (or slicing) a reporter shares the underlying callback and the
/// high-water mark, so all windows of one request feed a single
/// non-decreasing progression.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Arc<ProgressCallback>,
    high_water: Arc<AtomicU64>,
    offset: f64,
    span: f64,
}

impl ProgressReporter {
    /// Create a reporter delivering fractions in [0, 1] to `callback`.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
            high_water: Arc::new(AtomicU64::new(0)),
            offset: 0.0,
            span: 1.0,
        }
    }

    /// A reporter that discards all updates.
    pub fn disabled() -> Self {
        Self::new(|_| {})
    }

    /// A view of this reporter covering the sub-range
    /// `[offset, offset + span]` of the parent's range.
    pub fn slice(&self, offset: f64, span: f64) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
            high_water: Arc::clone(&self.high_water),
            offset: self.offset + offset * self.span,
            span: span * self.span,
        }
    }

    /// Report completion of `fraction` (0-1) of this reporter's window.
    ///
    /// The value is scaled into the window, then delivered only if it
    /// advances the request-wide high-water mark. Stale or duplicate values
    /// from an interleaved concurrent pass are dropped.
    pub fn report(&self, fraction: f64) {
        let value = (self.offset + fraction.clamp(0.0, 1.0) * self.span).clamp(0.0, 1.0);
        // Non-negative f64 bit patterns order the same way the values do, so
        // the high-water mark can live in an AtomicU64.
        let bits = value.to_bits();
        let advanced = self
            .high_water
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (bits > current).then_some(bits)
            })
            .is_ok();

        if advanced {
            (self.callback)(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recording_reporter() -> (ProgressReporter, Arc<Mutex<Vec<f64>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reporter = ProgressReporter::new(move |fraction| sink.lock().push(fraction));
        (reporter, seen)
    }

    #[test]
    fn test_reports_are_scaled_into_slice_windows() {
        let (reporter, seen) = recording_reporter();
        let first = reporter.slice(0.0, 0.5);
        let second = reporter.slice(0.5, 0.5);

        first.report(0.5);
        first.report(1.0);
        second.report(0.5);
        second.report(1.0);

        assert_eq!(*seen.lock(), vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_stale_reports_are_suppressed() {
        let (reporter, seen) = recording_reporter();
        let first = reporter.slice(0.0, 0.5);
        let second = reporter.slice(0.5, 0.5);

        // The second pass races ahead; the first pass's late reports must
        // not move the bar backwards.
        second.report(0.8);
        first.report(0.2);
        first.report(1.0);
        second.report(1.0);

        let seen = seen.lock();
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]), "{:?}", seen);
        assert_eq!(*seen, vec![0.9, 1.0]);
    }

    #[test]
    fn test_nested_slices_compose() {
        let (reporter, seen) = recording_reporter();
        let outer = reporter.slice(0.5, 0.5);
        let inner = outer.slice(0.5, 0.5);

        inner.report(1.0);

        assert_eq!(*seen.lock(), vec![1.0]);
    }

    #[test]
    fn test_fractions_are_clamped() {
        let (reporter, seen) = recording_reporter();
        reporter.report(3.0);
        assert_eq!(*seen.lock(), vec![1.0]);
    }
}
