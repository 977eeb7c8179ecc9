//! The stopwatch state machine: one active timer, a list of laps, and the
//! sample loop that keeps the active timer current while running.

use crate::clock::Clock;
use crate::controls::Controls;
use crate::sampler::{Sampler, SamplerHandle, Tick};
use crate::timer::{Timer, TimerId};
use std::time::{Duration, Instant};

/// How often a running stopwatch re-reads the clock.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(10);

/// Shortest interval a store will hand to its sampler.
pub const MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(1);

/// One row of the lap list as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapEntry {
    /// Id of the lap's timer, stable for the lifetime of the lap.
    pub id: TimerId,
    /// 1-based position in the order laps were taken.
    pub number: usize,
    /// `"Lap N: MM : SS : CC"`.
    pub text: String,
}

/// Owns the stopwatch state.
///
/// The store is a plain value: construct it, keep it, and call its actions
/// from whatever drives input. All derived values are computed on read, so a
/// view can re-render from `&TimerStore` at any time.
///
/// # State machine
///
/// | action | stopped | running |
/// |---|---|---|
/// | [`start_timer`](Self::start_timer) | record start, start sampler | no-op |
/// | [`measure`](Self::measure) | ignored | elapsed = now - start |
/// | [`stop_timer`](Self::stop_timer) | save (no-op) | sample, save, cancel sampler |
/// | [`lap_timer`](Self::lap_timer) | append lap | sample, append lap |
/// | [`reset_timer`](Self::reset_timer) | zero, clear laps | zero, clear laps, cancel sampler |
///
/// `is_running()` is true exactly when a start instant is recorded and a
/// sampler handle is held.
pub struct TimerStore<C: Clock, S: Sampler> {
    clock: C,
    sampler: S,
    interval: Duration,
    active: Timer,
    laps: Vec<Timer>,
    started_at: Option<Instant>,
    run: Option<S::Handle>,
    generation: u64,
}

impl<C: Clock, S: Sampler> TimerStore<C, S> {
    /// Create a stopped store with a zeroed active timer.
    pub fn new(clock: C, sampler: S) -> Self {
        Self {
            clock,
            sampler,
            interval: DEFAULT_SAMPLE_INTERVAL,
            active: Timer::new(),
            laps: Vec::new(),
            started_at: None,
            run: None,
            generation: 0,
        }
    }

    /// Set the sampling interval used by subsequent starts.
    ///
    /// Intervals below [`MIN_SAMPLE_INTERVAL`] are raised to it.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_SAMPLE_INTERVAL);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    // --- Actions ---

    /// Begin running. Returns `false` (and changes nothing) if already running.
    pub fn start_timer(&mut self) -> bool {
        if self.is_running() {
            log::debug!("start ignored: already running");
            return false;
        }
        self.generation += 1;
        let now = self.clock.now();
        self.started_at = Some(now);
        self.run = Some(self.sampler.start(self.interval, self.generation));
        self.active.set_elapsed(Duration::ZERO);
        log::debug!(
            "started (generation {}, saved {:?})",
            self.generation,
            self.active.saved()
        );
        true
    }

    /// Apply one sample from the running loop.
    ///
    /// Returns `false` when stopped or when `tick` belongs to a loop that
    /// has since been cancelled.
    pub fn measure(&mut self, tick: Tick) -> bool {
        if tick.generation != self.generation {
            return false;
        }
        self.sample()
    }

    /// Stop running, folding the current segment into the saved time.
    ///
    /// Valid in any state. Returns whether the stopwatch was running.
    pub fn stop_timer(&mut self) -> bool {
        self.sample();
        self.active.save_time();
        let was_running = self.halt();
        if was_running {
            log::debug!("stopped at {}", self.active.display());
        }
        was_running
    }

    /// Record a lap covering the time since the previous lap (or start).
    ///
    /// The lap's duration is the active total minus the sum of earlier laps.
    /// Valid in any state; returns the new lap's id.
    pub fn lap_timer(&mut self) -> TimerId {
        self.sample();
        let lap = Timer::with_elapsed(
            self.active
                .total()
                .saturating_sub(self.cumulative_lap_time()),
        );
        let id = lap.id();
        log::debug!("lap {} recorded: {}", self.laps.len() + 1, lap.display());
        self.laps.push(lap);
        id
    }

    /// Zero the active timer, drop all laps, and stop.
    ///
    /// Returns whether there was anything to clear.
    pub fn reset_timer(&mut self) -> bool {
        let dirty = self.is_running() || self.has_started() || !self.laps.is_empty();
        self.active.reset();
        self.laps.clear();
        self.halt();
        if dirty {
            log::debug!("reset");
        }
        dirty
    }

    /// Re-read the clock into the active timer if running.
    fn sample(&mut self) -> bool {
        match self.started_at {
            Some(started_at) => {
                let now = self.clock.now();
                self.active
                    .set_elapsed(now.saturating_duration_since(started_at));
                true
            }
            None => false,
        }
    }

    /// Cancel the sample loop and clear the start instant.
    fn halt(&mut self) -> bool {
        self.started_at = None;
        match self.run.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    // --- Derived values ---

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Instant the current run began, if running.
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Generation of the current (or most recent) run.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn active_timer(&self) -> &Timer {
        &self.active
    }

    /// Completed laps, oldest first.
    pub fn laps(&self) -> &[Timer] {
        &self.laps
    }

    /// The active timer's formatted total.
    pub fn main_display(&self) -> String {
        self.active.display()
    }

    /// Whether any time is on the clock.
    pub fn has_started(&self) -> bool {
        self.active.total() != Duration::ZERO
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    /// Sum of all lap totals.
    pub fn cumulative_lap_time(&self) -> Duration {
        self.laps.iter().map(Timer::total).sum()
    }

    /// Laps newest first, each labelled with its 1-based chronological number.
    pub fn lap_view(&self) -> Vec<LapEntry> {
        self.laps
            .iter()
            .enumerate()
            .map(|(i, lap)| LapEntry {
                id: lap.id(),
                number: i + 1,
                text: format!("Lap {}: {}", i + 1, lap.display()),
            })
            .rev()
            .collect()
    }

    /// Actions that make sense right now.
    pub fn controls(&self) -> Controls {
        Controls::for_state(self.is_running(), self.has_started())
    }
}

impl<C: Clock, S: Sampler> Drop for TimerStore<C, S> {
    fn drop(&mut self) {
        self.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::controls::Control;
    use crate::sampler::ManualSampler;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn store() -> (TimerStore<ManualClock, ManualSampler>, ManualClock, ManualSampler) {
        let clock = ManualClock::new();
        let sampler = ManualSampler::new();
        let store = TimerStore::new(clock.clone(), sampler.clone());
        (store, clock, sampler)
    }

    fn run_for(
        store: &mut TimerStore<ManualClock, ManualSampler>,
        clock: &ManualClock,
        sampler: &ManualSampler,
        d: Duration,
    ) {
        let step = ms(10);
        let mut left = d;
        while left > Duration::ZERO {
            let s = step.min(left);
            clock.advance(s);
            left -= s;
            if let Some(tick) = sampler.tick() {
                store.measure(tick);
            }
        }
    }

    #[test]
    fn starts_stopped() {
        let (store, _, sampler) = store();
        assert!(!store.is_running());
        assert!(store.started_at().is_none());
        assert!(!store.has_started());
        assert_eq!(store.main_display(), "00 : 00 : 00");
        assert!(!sampler.is_active());
    }

    #[test]
    fn start_records_instant_and_starts_sampler() {
        let (mut store, clock, sampler) = store();
        assert!(store.start_timer());
        assert!(store.is_running());
        assert_eq!(store.started_at(), Some(clock.now()));
        assert!(sampler.is_active());
        assert_eq!(sampler.interval(), Some(DEFAULT_SAMPLE_INTERVAL));
    }

    #[test]
    fn start_twice_keeps_first_instant() {
        let (mut store, clock, sampler) = store();
        store.start_timer();
        let first = store.started_at();
        clock.advance(ms(50));
        assert!(!store.start_timer());
        assert_eq!(store.started_at(), first);
        assert_eq!(sampler.starts(), 1);
    }

    #[test]
    fn measure_updates_elapsed_while_running() {
        let (mut store, clock, sampler) = store();
        store.start_timer();
        clock.advance(ms(1234));
        assert!(store.measure(sampler.tick().unwrap()));
        assert_eq!(store.active_timer().elapsed(), ms(1234));
        assert_eq!(store.main_display(), "00 : 01 : 23");
        assert!(store.has_started());
    }

    #[test]
    fn stop_saves_time_and_cancels_sampler() {
        let (mut store, clock, sampler) = store();
        store.start_timer();
        run_for(&mut store, &clock, &sampler, ms(300));
        assert!(store.stop_timer());
        assert!(!store.is_running());
        assert!(store.started_at().is_none());
        assert!(!sampler.is_active());
        assert_eq!(store.active_timer().elapsed(), Duration::ZERO);
        assert_eq!(store.active_timer().saved(), ms(300));
    }

    #[test]
    fn stale_tick_after_stop_is_ignored() {
        let (mut store, clock, sampler) = store();
        store.start_timer();
        let in_flight = sampler.tick().unwrap();
        clock.advance(ms(100));
        store.stop_timer();
        clock.advance(ms(100));
        assert!(!store.measure(in_flight));
        assert_eq!(store.active_timer().total(), ms(100));
    }

    #[test]
    fn tick_from_previous_run_is_ignored_after_restart() {
        let (mut store, clock, sampler) = store();
        store.start_timer();
        let old = sampler.tick().unwrap();
        store.stop_timer();
        store.start_timer();
        clock.advance(ms(40));
        assert!(!store.measure(old));
        assert_eq!(store.active_timer().elapsed(), Duration::ZERO);
        assert!(store.measure(sampler.tick().unwrap()));
        assert_eq!(store.active_timer().elapsed(), ms(40));
    }

    #[test]
    fn restart_accumulates_on_saved_time() {
        let (mut store, clock, sampler) = store();
        store.start_timer();
        run_for(&mut store, &clock, &sampler, ms(200));
        store.stop_timer();
        clock.advance(ms(5000));
        store.start_timer();
        run_for(&mut store, &clock, &sampler, ms(100));
        assert_eq!(store.active_timer().total(), ms(300));
    }

    #[test]
    fn stop_when_stopped_is_harmless() {
        let (mut store, _, sampler) = store();
        assert!(!store.stop_timer());
        assert!(!store.is_running());
        assert_eq!(sampler.cancels(), 0);
    }

    #[test]
    fn laps_slice_the_running_total() {
        let (mut store, clock, sampler) = store();
        store.start_timer();
        run_for(&mut store, &clock, &sampler, ms(1000));
        store.lap_timer();
        run_for(&mut store, &clock, &sampler, ms(500));
        store.lap_timer();
        run_for(&mut store, &clock, &sampler, ms(250));
        store.lap_timer();

        let totals: Vec<_> = store.laps().iter().map(Timer::total).collect();
        assert_eq!(totals, vec![ms(1000), ms(500), ms(250)]);
        assert_eq!(store.cumulative_lap_time(), store.active_timer().total());
        assert_eq!(store.lap_count(), 3);
    }

    #[test]
    fn lap_samples_the_clock_first() {
        let (mut store, clock, _) = store();
        store.start_timer();
        clock.advance(ms(77));
        store.lap_timer();
        assert_eq!(store.laps()[0].total(), ms(77));
    }

    #[test]
    fn lap_while_stopped_records_remaining_slice() {
        let (mut store, clock, sampler) = store();
        store.start_timer();
        run_for(&mut store, &clock, &sampler, ms(400));
        store.lap_timer();
        run_for(&mut store, &clock, &sampler, ms(100));
        store.stop_timer();
        store.lap_timer();
        store.lap_timer();

        let totals: Vec<_> = store.laps().iter().map(Timer::total).collect();
        assert_eq!(totals, vec![ms(400), ms(100), Duration::ZERO]);
    }

    #[test]
    fn lap_view_is_newest_first_with_chronological_labels() {
        let (mut store, clock, sampler) = store();
        store.start_timer();
        run_for(&mut store, &clock, &sampler, ms(1500));
        let first = store.lap_timer();
        run_for(&mut store, &clock, &sampler, ms(2250));
        let second = store.lap_timer();

        let view = store.lap_view();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].id, second);
        assert_eq!(view[0].number, 2);
        assert_eq!(view[0].text, "Lap 2: 00 : 02 : 25");
        assert_eq!(view[1].id, first);
        assert_eq!(view[1].text, "Lap 1: 00 : 01 : 50");
    }

    #[test]
    fn reset_clears_everything() {
        let (mut store, clock, sampler) = store();
        store.start_timer();
        run_for(&mut store, &clock, &sampler, ms(600));
        store.lap_timer();
        store.lap_timer();
        assert!(store.reset_timer());
        assert!(store.laps().is_empty());
        assert!(!store.is_running());
        assert!(store.started_at().is_none());
        assert!(!sampler.is_active());
        assert_eq!(store.active_timer().total(), Duration::ZERO);
        assert!(!store.reset_timer());
    }

    #[test]
    fn controls_follow_state() {
        let (mut store, clock, sampler) = store();
        assert!(store.controls().offers(Control::Start));
        store.start_timer();
        assert!(store.controls().offers(Control::Lap));
        run_for(&mut store, &clock, &sampler, ms(10));
        store.stop_timer();
        let controls: Vec<_> = store.controls().iter().collect();
        assert_eq!(controls, vec![Control::Reset, Control::Start]);
    }

    #[test]
    fn custom_interval_is_passed_to_sampler() {
        let clock = ManualClock::new();
        let sampler = ManualSampler::new();
        let mut store = TimerStore::new(clock, sampler.clone()).with_interval(ms(50));
        store.start_timer();
        assert_eq!(sampler.interval(), Some(ms(50)));
    }

    #[test]
    fn zero_interval_is_raised_to_minimum() {
        let clock = ManualClock::new();
        let sampler = ManualSampler::new();
        let mut store = TimerStore::new(clock, sampler.clone()).with_interval(Duration::ZERO);
        assert_eq!(store.interval(), MIN_SAMPLE_INTERVAL);
        assert!(store.start_timer());
        assert_eq!(sampler.interval(), Some(MIN_SAMPLE_INTERVAL));
    }

    #[test]
    fn dropping_a_running_store_cancels_sampler() {
        let (mut store, _, sampler) = store();
        store.start_timer();
        drop(store);
        assert!(!sampler.is_active());
    }

    #[test]
    fn start_lap_stop_end_to_end() {
        let (mut store, clock, sampler) = store();
        store.start_timer();
        run_for(&mut store, &clock, &sampler, ms(250));
        store.lap_timer();
        store.stop_timer();
        assert_eq!(store.lap_count(), 1);
        assert_eq!(store.laps()[0].total(), ms(250));
        assert!(!store.is_running());
    }
}
