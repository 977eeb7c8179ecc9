//! The repeating sample loop that refreshes a running stopwatch.
//!
//! A [`Sampler`] is started when the stopwatch starts and hands back a
//! [`SamplerHandle`]. Every interval it delivers a [`Tick`] to whoever drives
//! the store, which feeds it to [`TimerStore::measure`](crate::TimerStore::measure).
//! Stopping or resetting cancels the handle.
//!
//! Each start is stamped with a fresh generation. A tick carries the
//! generation it was produced for, and the store drops ticks from any
//! generation other than the one currently running. Ticks that were already
//! queued when the loop was cancelled are therefore never applied.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// One sample request from a running sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tick {
    /// The run this tick belongs to.
    pub generation: u64,
}

/// Starts repeating sample loops.
pub trait Sampler: Send + 'static {
    /// Handle that stops the loop it was returned for.
    type Handle: SamplerHandle;

    /// Begin producing a [`Tick`] for `generation` every `interval`.
    fn start(&mut self, interval: Duration, generation: u64) -> Self::Handle;
}

/// Cancellation handle for a running sample loop.
pub trait SamplerHandle: Send + 'static {
    /// Stop the loop. Any tick it still manages to deliver after this call
    /// belongs to a retired generation and is ignored by the store.
    fn cancel(self);
}

#[derive(Debug, Default)]
struct ManualState {
    active: Option<(u64, Duration)>,
    starts: usize,
    cancels: usize,
}

/// A sampler that never ticks on its own.
///
/// It records which loop is active so tests can fabricate the tick the real
/// loop would have produced. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ManualSampler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualSampler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The tick the active loop would deliver next, if a loop is active.
    pub fn tick(&self) -> Option<Tick> {
        self.lock().active.map(|(generation, _)| Tick { generation })
    }

    /// Whether a loop is currently active.
    pub fn is_active(&self) -> bool {
        self.lock().active.is_some()
    }

    /// Interval of the active loop.
    pub fn interval(&self) -> Option<Duration> {
        self.lock().active.map(|(_, interval)| interval)
    }

    /// Number of loops started so far.
    pub fn starts(&self) -> usize {
        self.lock().starts
    }

    /// Number of loops cancelled so far.
    pub fn cancels(&self) -> usize {
        self.lock().cancels
    }
}

impl Sampler for ManualSampler {
    type Handle = ManualSamplerHandle;

    fn start(&mut self, interval: Duration, generation: u64) -> ManualSamplerHandle {
        let mut state = self.lock();
        state.active = Some((generation, interval));
        state.starts += 1;
        ManualSamplerHandle {
            state: self.state.clone(),
            generation,
        }
    }
}

/// Handle returned by [`ManualSampler::start`].
#[derive(Debug)]
pub struct ManualSamplerHandle {
    state: Arc<Mutex<ManualState>>,
    generation: u64,
}

impl SamplerHandle for ManualSamplerHandle {
    fn cancel(self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if matches!(state.active, Some((g, _)) if g == self.generation) {
            state.active = None;
        }
        state.cancels += 1;
    }
}
