//! State model for the **lapwatch** stopwatch.
//!
//! `lapwatch-core` holds everything about the stopwatch that is not drawing
//! or terminal handling: the accumulating [`Timer`], the [`TimerStore`]
//! state machine with its laps, and the two seams the store needs from its
//! environment, a [`Clock`] and a [`Sampler`].
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Timer`] | Elapsed + saved duration with `MM : SS : CC` display |
//! | [`TimerStore`] | Start / stop / lap / reset state machine |
//! | [`Clock`] | Monotonic "now" source ([`SystemClock`], [`ManualClock`]) |
//! | [`Sampler`] | Starts the repeating sample loop and returns a cancel handle |
//! | [`Controls`] | Which actions to offer in the current state |
//!
//! # Example
//!
//! ```
//! use lapwatch_core::{ManualClock, ManualSampler, TimerStore};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let sampler = ManualSampler::new();
//! let mut store = TimerStore::new(clock.clone(), sampler.clone());
//!
//! store.start_timer();
//! clock.advance(Duration::from_millis(1500));
//! store.measure(sampler.tick().unwrap());
//! store.lap_timer();
//! store.stop_timer();
//!
//! assert_eq!(store.main_display(), "00 : 01 : 50");
//! assert_eq!(store.lap_view()[0].text, "Lap 1: 00 : 01 : 50");
//! ```

pub mod clock;
pub mod controls;
pub mod sampler;
pub mod store;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controls::{Control, Controls};
pub use sampler::{ManualSampler, ManualSamplerHandle, Sampler, SamplerHandle, Tick};
pub use store::{LapEntry, TimerStore, DEFAULT_SAMPLE_INTERVAL, MIN_SAMPLE_INTERVAL};
pub use timer::{format_display, Timer, TimerId};
