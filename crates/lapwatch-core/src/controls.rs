//! Which stopwatch actions make sense to offer in the current state.

use std::fmt;

/// A user-facing stopwatch action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Start,
    Stop,
    Lap,
    Reset,
}

impl Control {
    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Control::Start => "Start",
            Control::Stop => "Stop",
            Control::Lap => "Lap",
            Control::Reset => "Reset",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The ordered set of actions on offer.
///
/// - stopped, never started: `Start`
/// - stopped with time on the clock: `Reset`, `Start`
/// - running: `Stop`, `Lap`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls(Vec<Control>);

impl Controls {
    /// Compute the offered controls from the two flags that decide them.
    pub fn for_state(is_running: bool, has_started: bool) -> Self {
        let controls = if is_running {
            vec![Control::Stop, Control::Lap]
        } else if has_started {
            vec![Control::Reset, Control::Start]
        } else {
            vec![Control::Start]
        };
        Self(controls)
    }

    pub fn offers(&self, control: Control) -> bool {
        self.0.contains(&control)
    }

    pub fn iter(&self) -> impl Iterator<Item = Control> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
