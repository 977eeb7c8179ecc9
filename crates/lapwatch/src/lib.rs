//! **lapwatch** -- a terminal stopwatch with lap times.
//!
//! The stopwatch state lives in [`lapwatch_core`]; this crate puts it on a
//! terminal. The pieces follow an init -> update -> view cycle:
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`App`] | Owns the [`TimerStore`](lapwatch_core::TimerStore); `update(Msg)` and `view(Frame)` |
//! | [`Ticker`] | Tokio interval task delivering sample ticks, cancelled on stop |
//! | [`Program`] | Terminal setup/teardown and the event loop |
//! | [`Config`] | Defaults plus `LAPWATCH_*` environment overrides |
//! | [`TestProgram`](testing::TestProgram) | Headless harness with a manual clock |
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | `s`, space | start / stop |
//! | `l`, enter | lap (while running) |
//! | `r` | reset (while stopped) |
//! | `q`, esc, ctrl+c | quit |
//! | ctrl+z | suspend |

pub mod app;
pub mod config;
pub mod keys;
pub mod logging;
pub mod runtime;
pub mod testing;
pub mod ticker;
pub mod view;

pub use app::{App, Command, Msg};
pub use config::{Config, ConfigError, OutputTarget};
pub use runtime::{Program, ProgramError};
pub use ticker::{Ticker, TickerHandle};

/// Run the stopwatch with the given configuration until the user quits.
pub async fn run(config: Config) -> Result<App, ProgramError> {
    Program::new(config)?.run().await
}
