//! # Frame Counter Sequence Tracker
//!
//! Stateful gap detector over the wrapper frame counters. Broadcast meters
//! transmit on a fixed interval with no retransmission, so a jump in the
//! counter means frames were lost on the wire. This is advisory telemetry:
//! a gap never rejects the frame that revealed it.

/// Tracks the last seen frame counter for one meter.
///
/// One tracker per meter; the caller serializes frame arrivals. A fresh
/// tracker has no baseline and reports the first frame as lossless.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTracker {
    last_frame_counter: Option<u32>,
}

impl SequenceTracker {
    /// Creates a tracker with no prior frame seen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes a frame counter and returns how many frames were missed
    /// since the previous one.
    ///
    /// Counter arithmetic is wraparound-safe: a genuine 32-bit wrap shows up
    /// as a small forward delta and advances the baseline. A duplicate or
    /// out-of-order counter (backward jump) reports zero lost frames and
    /// leaves the baseline untouched.
    pub fn observe(&mut self, counter: u32) -> u32 {
        let lost = match self.last_frame_counter {
            None => 0,
            Some(last) => {
                let delta = counter.wrapping_sub(last);
                if delta == 0 || delta > u32::MAX / 2 {
                    // Duplicate or regression; keep the existing baseline.
                    return 0;
                }
                delta - 1
            }
        };
        self.last_frame_counter = Some(counter);
        lost
    }

    /// The last frame counter observed, if any.
    pub fn last_frame_counter(&self) -> Option<u32> {
        self.last_frame_counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_establishes_baseline() {
        let mut tracker = SequenceTracker::new();
        assert_eq!(tracker.observe(17), 0);
        assert_eq!(tracker.last_frame_counter(), Some(17));
    }

    #[test]
    fn test_gap_arithmetic() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(5);
        assert_eq!(tracker.observe(8), 2);
        assert_eq!(tracker.observe(9), 0);
    }

    #[test]
    fn test_consecutive_frames_report_no_loss() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(5);
        assert_eq!(tracker.observe(6), 0);
    }

    #[test]
    fn test_duplicate_does_not_regress() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(10);
        assert_eq!(tracker.observe(10), 0);
        assert_eq!(tracker.last_frame_counter(), Some(10));
    }

    #[test]
    fn test_out_of_order_does_not_regress() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(10);
        assert_eq!(tracker.observe(7), 0);
        assert_eq!(tracker.last_frame_counter(), Some(10));
    }

    #[test]
    fn test_counter_wraparound() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(u32::MAX);
        assert_eq!(tracker.observe(0), 0);
        assert_eq!(tracker.last_frame_counter(), Some(0));

        let mut tracker = SequenceTracker::new();
        tracker.observe(u32::MAX - 1);
        assert_eq!(tracker.observe(2), 3);
    }
}
