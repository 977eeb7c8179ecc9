//! A single accumulating timer segment and its display formatting.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a [`Timer`].
///
/// Ids are allocated from a process-wide counter, so every timer ever created
/// gets a distinct one. They exist only to key list rows in a view and carry
/// no meaning beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    fn next() -> Self {
        Self(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer_{}", self.0)
    }
}

/// An elapsed duration plus whatever was saved from earlier segments.
///
/// The stopwatch's active timer accumulates into `elapsed` while running and
/// folds it into `saved` on stop. Laps are timers created with a fixed
/// `elapsed` and never touched again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    id: TimerId,
    elapsed: Duration,
    saved: Duration,
}

impl Timer {
    /// Create a zeroed timer.
    pub fn new() -> Self {
        Self::with_elapsed(Duration::ZERO)
    }

    /// Create a timer whose current segment already holds `initial`.
    pub fn with_elapsed(initial: Duration) -> Self {
        Self {
            id: TimerId::next(),
            elapsed: initial,
            saved: Duration::ZERO,
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Duration of the current segment.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Overwrite the current segment's duration.
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Duration accumulated by previous segments.
    pub fn saved(&self) -> Duration {
        self.saved
    }

    /// `elapsed + saved`.
    pub fn total(&self) -> Duration {
        self.elapsed + self.saved
    }

    /// The total formatted by [`format_display`].
    pub fn display(&self) -> String {
        format_display(self.total())
    }

    /// Fold the current segment into `saved` and zero it.
    ///
    /// A second call with no elapsed time in between changes nothing.
    pub fn save_time(&mut self) {
        self.saved += self.elapsed;
        self.elapsed = Duration::ZERO;
    }

    /// Zero both the current segment and the saved time.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.saved = Duration::ZERO;
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a duration as `MM : SS : CC` (minutes, seconds, hundredths).
///
/// Hundredths are truncated, never rounded. The minutes field is total
/// minutes, so unlike a clock-style `mm` it does not wrap at the hour: one
/// hour and one second shows as `60 : 01 : 00`. It widens beyond two digits
/// once it reaches 100.
pub fn format_display(d: Duration) -> String {
    let total_secs = d.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let hundredths = d.subsec_millis() / 10;
    format!("{:02} : {:02} : {:02}", minutes, seconds, hundredths)
}
