//! Tokio-backed sample loop.

use futures::StreamExt;
use lapwatch_core::{Sampler, SamplerHandle, Tick, MIN_SAMPLE_INTERVAL};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;

/// A [`Sampler`] that spawns one tokio task per run.
///
/// Each task drives a [`tokio::time::interval`] and forwards a [`Tick`] into
/// the channel returned by [`Ticker::channel`]. The first tick fires
/// immediately. Ticks missed while the runtime was busy are skipped rather
/// than delivered in a burst.
///
/// Intervals below [`MIN_SAMPLE_INTERVAL`] are raised to it, since a tokio
/// interval cannot have a zero period. Starting requires a tokio runtime
/// context.
#[derive(Debug, Clone)]
pub struct Ticker {
    tx: mpsc::UnboundedSender<Tick>,
}

impl Ticker {
    /// Create a ticker and the receiver its ticks arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Sampler for Ticker {
    type Handle = TickerHandle;

    fn start(&mut self, interval: Duration, generation: u64) -> TickerHandle {
        let interval = interval.max(MIN_SAMPLE_INTERVAL);
        let tx = self.tx.clone();
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let handle = tokio::spawn(async move {
            let mut ticks = IntervalStream::new(timer);
            while ticks.next().await.is_some() {
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });
        log::trace!("ticker {generation} started every {interval:?}");

        TickerHandle {
            abort: handle.abort_handle(),
            generation,
        }
    }
}

/// Stops the task behind one [`Ticker`] run.
#[derive(Debug)]
pub struct TickerHandle {
    abort: AbortHandle,
    generation: u64,
}

impl SamplerHandle for TickerHandle {
    fn cancel(self) {
        self.abort.abort();
        log::trace!("ticker {} cancelled", self.generation);
    }
}
