use crate::app::{App, Command, Msg};
use crate::config::{Config, ConfigError, OutputTarget};
use crate::ticker::Ticker;
use crossterm::{
    cursor,
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use lapwatch_core::{SystemClock, Tick, TimerStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stderr, stdout, Stderr, Stdout, Write};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Writer that wraps either stdout or stderr.
enum Output {
    Stdout(Stdout),
    Stderr(Stderr),
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(w) => w.write(buf),
            Output::Stderr(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(w) => w.flush(),
            Output::Stderr(w) => w.flush(),
        }
    }
}

impl Output {
    fn new(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stdout => Output::Stdout(stdout()),
            OutputTarget::Stderr => Output::Stderr(stderr()),
        }
    }
}

/// Errors that can occur while setting up or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// A global logger was already installed.
    #[error("logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Owns the terminal and drives the stopwatch until the user quits.
///
/// The event loop selects over four sources, in priority order:
///
/// 1. SIGINT (when [`Config::handle_signals`] is set)
/// 2. terminal input from crossterm's [`EventStream`]
/// 3. ticks from the running [`Ticker`]
/// 4. the frame interval, which redraws only when something changed
///
/// # Example
///
/// ```rust,no_run
/// use lapwatch::{Config, Program, ProgramError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let app = Program::new(Config::default())?.run().await?;
///     println!("{}", app.store().main_display());
///     Ok(())
/// }
/// ```
pub struct Program {
    app: App,
    terminal: Terminal<CrosstermBackend<Output>>,
    ticks: mpsc::UnboundedReceiver<Tick>,
    config: Config,
    needs_redraw: bool,
    should_quit: bool,
}

impl Program {
    /// Build the stopwatch and take over the terminal.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: Config) -> Result<Self, ProgramError> {
        let (ticker, ticks) = Ticker::channel();
        let store = TimerStore::new(SystemClock, ticker).with_interval(config.sample_interval);
        let terminal = init_terminal(&config)?;
        log::info!(
            "program initialized (sample every {:?}, {} fps)",
            config.sample_interval,
            config.fps
        );

        Ok(Self {
            app: App::new(store),
            terminal,
            ticks,
            config,
            needs_redraw: true,
            should_quit: false,
        })
    }

    /// Run until quit, restore the terminal, and hand back the final state.
    pub async fn run(mut self) -> Result<App, ProgramError> {
        let result = self.event_loop().await;

        log::info!("shutting down");
        restore_terminal(&self.config)?;
        result?;

        Ok(self.app)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render()?;

        let fps = self.config.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let handle_signals = self.config.handle_signals;
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    log::info!("received ctrl+c signal");
                    self.should_quit = true;
                }

                Some(event) = events.next() => {
                    self.handle_event(event?);
                }

                Some(tick) = self.ticks.recv() => {
                    self.process_message(Msg::Sample(tick));
                }

                _ = frame_interval.tick() => {
                    if self.needs_redraw {
                        self.render()?;
                        self.needs_redraw = false;
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Resize(..) = event {
            self.needs_redraw = true;
            return;
        }
        match self.app.on_event(&event) {
            Some(msg) => self.process_message(msg),
            None => log::trace!("ignored event {event:?}"),
        }
    }

    fn process_message(&mut self, msg: Msg) {
        match self.app.update(msg) {
            Command::None => {}
            Command::Quit => self.should_quit = true,
            Command::Suspend => self.suspend(),
        }
        self.needs_redraw = true;
    }

    fn suspend(&mut self) {
        log::info!("suspending");
        restore_terminal(&self.config).ok();

        #[cfg(unix)]
        {
            unsafe {
                libc::raise(libc::SIGTSTP);
            }
        }

        match init_terminal(&self.config) {
            Ok(terminal) => {
                self.terminal = terminal;
                self.needs_redraw = true;
            }
            Err(e) => {
                // Detached from the terminal while stopped; nothing to draw on.
                log::warn!("terminal re-init after suspend failed: {e}");
                self.should_quit = true;
            }
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        let app = &self.app;
        self.terminal.draw(|frame| app.view(frame))?;
        Ok(())
    }
}

fn init_terminal(config: &Config) -> Result<Terminal<CrosstermBackend<Output>>, ProgramError> {
    // Install the restoring panic hook once, however often the terminal is re-initialized.
    if config.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let alt_screen = config.alt_screen;
        let output = config.output;
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal_minimal(alt_screen, output);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = Output::new(config.output);
    if config.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    execute!(writer, cursor::Hide)?;

    let terminal = Terminal::new(CrosstermBackend::new(writer))?;
    Ok(terminal)
}

fn restore_terminal(config: &Config) -> Result<(), ProgramError> {
    restore_terminal_minimal(config.alt_screen, config.output)?;
    Ok(())
}

fn restore_terminal_minimal(alt_screen: bool, output: OutputTarget) -> Result<(), io::Error> {
    // Keep going after individual failures so as much state as possible is restored.
    let raw = disable_raw_mode();
    let mut writer = Output::new(output);
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}
