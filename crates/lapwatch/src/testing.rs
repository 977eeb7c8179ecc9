use crate::app::{App, Command, Msg};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use lapwatch_core::{ManualClock, ManualSampler, TimerStore};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::time::Duration;

/// A headless harness that drives an [`App`] without a terminal or runtime.
///
/// Time is a [`ManualClock`] and the sample loop is a [`ManualSampler`], so
/// tests decide exactly when time passes and when ticks arrive.
/// [`advance`](TestProgram::advance) does both the way the real ticker would:
/// one sample per interval while running.
///
/// # Example
///
/// ```rust
/// use lapwatch::testing::TestProgram;
/// use lapwatch::Msg;
/// use std::time::Duration;
///
/// let mut prog = TestProgram::new();
/// prog.send(Msg::Start);
/// prog.advance(Duration::from_millis(250));
/// prog.send(Msg::Lap);
/// prog.send(Msg::Stop);
///
/// assert_eq!(prog.app().store().lap_count(), 1);
/// assert!(prog.render_string(40, 10).contains("Lap 1: 00 : 00 : 25"));
/// ```
pub struct TestProgram {
    app: App<ManualClock, ManualSampler>,
    clock: ManualClock,
    sampler: ManualSampler,
    last_command: Command,
}

impl TestProgram {
    /// Create a stopped stopwatch sampling every 10ms.
    pub fn new() -> Self {
        let clock = ManualClock::new();
        let sampler = ManualSampler::new();
        let store = TimerStore::new(clock.clone(), sampler.clone());
        Self {
            app: App::new(store),
            clock,
            sampler,
            last_command: Command::None,
        }
    }

    /// Send a message through [`App::update`].
    pub fn send(&mut self, msg: Msg) -> Command {
        self.last_command = self.app.update(msg);
        self.last_command
    }

    /// Press a key. Keys that map to nothing in the current state are dropped.
    pub fn press(&mut self, code: KeyCode) -> Option<Command> {
        let event = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        let msg = self.app.on_event(&event)?;
        Some(self.send(msg))
    }

    /// Let `d` pass, delivering a sample every interval while running.
    pub fn advance(&mut self, d: Duration) {
        let step = self.app.store().interval();
        let mut left = d;
        while left > Duration::ZERO {
            let s = step.min(left);
            self.clock.advance(s);
            left -= s;
            if let Some(tick) = self.sampler.tick() {
                self.send(Msg::Sample(tick));
            }
        }
    }

    /// Move the clock without delivering any samples.
    pub fn advance_clock(&mut self, d: Duration) {
        self.clock.advance(d);
    }

    /// Deliver the tick the running loop would produce next, if any.
    pub fn sample(&mut self) -> bool {
        match self.sampler.tick() {
            Some(tick) => {
                self.send(Msg::Sample(tick));
                true
            }
            None => false,
        }
    }

    pub fn app(&self) -> &App<ManualClock, ManualSampler> {
        &self.app
    }

    pub fn sampler(&self) -> &ManualSampler {
        &self.sampler
    }

    /// The command returned by the most recent update.
    pub fn last_command(&self) -> Command {
        self.last_command
    }

    /// Render the app to a [`Buffer`] of the given size.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("test backend never fails");
        terminal
            .draw(|frame| self.app.view(frame))
            .expect("test backend never fails");
        terminal.backend().buffer().clone()
    }

    /// Render and return the visible content, one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        let buf = self.render(width, height);
        let area = Rect::new(0, 0, width, height);
        let mut output = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                output.push_str(buf[(x, y)].symbol());
            }
            if y < area.bottom() - 1 {
                output.push('\n');
            }
        }
        output
    }
}

impl Default for TestProgram {
    fn default() -> Self {
        Self::new()
    }
}
