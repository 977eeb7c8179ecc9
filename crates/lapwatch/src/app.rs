use crate::keys;
use crate::ticker::Ticker;
use crate::view;
use crossterm::event::Event;
use lapwatch_core::{Clock, Sampler, SystemClock, Tick, TimerStore};
use ratatui::Frame;

/// Everything that can happen to the stopwatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Start,
    Stop,
    Lap,
    Reset,
    /// Start when stopped, stop when running.
    Toggle,
    /// A tick from the running sample loop.
    Sample(Tick),
    /// Suspend the process (Unix job control).
    Suspend,
    Quit,
}

/// What the runtime should do after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    Suspend,
}

impl Command {
    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

/// The stopwatch application: a [`TimerStore`] plus update and view.
///
/// `App` never touches the terminal. The [`Program`](crate::Program) feeds
/// it messages and asks it to draw; the
/// [`TestProgram`](crate::testing::TestProgram) does the same headlessly.
pub struct App<C: Clock = SystemClock, S: Sampler = Ticker> {
    store: TimerStore<C, S>,
}

impl<C: Clock, S: Sampler> App<C, S> {
    pub fn new(store: TimerStore<C, S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TimerStore<C, S> {
        &self.store
    }

    /// Translate a terminal event into a message, if it maps to one.
    pub fn on_event(&self, event: &Event) -> Option<Msg> {
        match event {
            Event::Key(key) => keys::map_key(*key, &self.store.controls()),
            _ => None,
        }
    }

    pub fn update(&mut self, msg: Msg) -> Command {
        match msg {
            Msg::Start => {
                if self.store.start_timer() {
                    log::info!("stopwatch started");
                }
            }
            Msg::Stop => {
                if self.store.stop_timer() {
                    log::info!("stopwatch stopped at {}", self.store.main_display());
                }
            }
            Msg::Toggle => {
                let next = if self.store.is_running() {
                    Msg::Stop
                } else {
                    Msg::Start
                };
                return self.update(next);
            }
            Msg::Lap => {
                self.store.lap_timer();
                log::info!("lap {} recorded", self.store.lap_count());
            }
            Msg::Reset => {
                if self.store.reset_timer() {
                    log::info!("stopwatch reset");
                }
            }
            Msg::Sample(tick) => {
                if !self.store.measure(tick) {
                    log::trace!("dropped stale tick {}", tick.generation);
                }
            }
            Msg::Suspend => return Command::Suspend,
            Msg::Quit => return Command::Quit,
        }
        Command::None
    }

    pub fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        view::render(&self.store, frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use lapwatch_core::{ManualClock, ManualSampler};
    use std::time::Duration;

    fn app() -> (App<ManualClock, ManualSampler>, ManualClock, ManualSampler) {
        let clock = ManualClock::new();
        let sampler = ManualSampler::new();
        let app = App::new(TimerStore::new(clock.clone(), sampler.clone()));
        (app, clock, sampler)
    }

    #[test]
    fn toggle_starts_then_stops() {
        let (mut app, clock, _) = app();
        assert!(app.update(Msg::Toggle).is_none());
        assert!(app.store().is_running());
        clock.advance(Duration::from_millis(120));
        app.update(Msg::Toggle);
        assert!(!app.store().is_running());
        assert_eq!(app.store().main_display(), "00 : 00 : 12");
    }

    #[test]
    fn space_key_toggles_through_update() {
        let (mut app, clock, _) = app();
        let space = Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));

        let msg = app.on_event(&space).unwrap();
        assert_eq!(msg, Msg::Toggle);
        app.update(msg);
        assert!(app.store().is_running());

        clock.advance(Duration::from_millis(300));
        let msg = app.on_event(&space).unwrap();
        assert_eq!(msg, Msg::Toggle);
        app.update(msg);
        assert!(!app.store().is_running());
        assert_eq!(app.store().main_display(), "00 : 00 : 30");
    }

    #[test]
    fn sample_message_measures() {
        let (mut app, clock, sampler) = app();
        app.update(Msg::Start);
        clock.advance(Duration::from_millis(2500));
        app.update(Msg::Sample(sampler.tick().unwrap()));
        assert_eq!(app.store().main_display(), "00 : 02 : 50");
    }

    #[test]
    fn quit_and_suspend_become_commands() {
        let (mut app, _, _) = app();
        assert_eq!(app.update(Msg::Quit), Command::Quit);
        assert_eq!(app.update(Msg::Suspend), Command::Suspend);
    }

    #[test]
    fn key_events_respect_controls() {
        let (mut app, _, _) = app();
        let lap = Event::Key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE));
        assert_eq!(app.on_event(&lap), None);

        app.update(Msg::Start);
        assert_eq!(app.on_event(&lap), Some(Msg::Lap));
        assert_eq!(app.on_event(&Event::FocusGained), None);
    }
}
