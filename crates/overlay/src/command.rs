//! Keyboard-style commands and their dispatch onto the state machine.

use std::fmt;
use std::str::FromStr;

use mask_common::{MaskError, MaskKind};
use tracing::{debug, error, info, warn};

use crate::display::MapDisplay;
use crate::state::LayerStateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleMask,
    SelectMaskKind(MaskKind),
}

impl Command {
    /// `m`/`M` toggles; `1`..`4` select rectangle, circle, polygon, multipolygon.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'm' | 'M' => Some(Command::ToggleMask),
            '1'..='4' => {
                let index = key as usize - '1' as usize;
                MaskKind::ALL.get(index).copied().map(Command::SelectMaskKind)
            }
            _ => None,
        }
    }
}

impl FromStr for Command {
    type Err = MaskError;

    /// Accepts a single key, `toggle-mask`, `select-mask-kind <kind>`, or a bare kind name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        if let (Some(key), None) = (chars.next(), chars.next()) {
            return Command::from_key(key).ok_or_else(|| MaskError::UnknownCommand(s.to_string()));
        }

        let mut words = s.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("toggle-mask" | "toggle"), None, None) => Ok(Command::ToggleMask),
            (Some("select-mask-kind" | "select"), Some(kind), None) => {
                Ok(Command::SelectMaskKind(kind.parse()?))
            }
            (Some(word), None, None) => word
                .parse()
                .map(Command::SelectMaskKind)
                .map_err(|_| MaskError::UnknownCommand(s.to_string())),
            _ => Err(MaskError::UnknownCommand(s.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ToggleMask => write!(f, "toggle-mask"),
            Command::SelectMaskKind(kind) => write!(f, "select-mask-kind {}", kind),
        }
    }
}

/// Routes commands to a [`LayerStateMachine`].
///
/// Failures are logged here and never returned to the caller.
pub struct CommandDispatcher<D: MapDisplay> {
    machine: LayerStateMachine<D>,
}

impl<D: MapDisplay> CommandDispatcher<D> {
    pub fn new(machine: LayerStateMachine<D>) -> Self {
        Self { machine }
    }

    pub fn machine(&self) -> &LayerStateMachine<D> {
        &self.machine
    }

    pub fn into_inner(self) -> LayerStateMachine<D> {
        self.machine
    }

    pub fn dispatch(&mut self, command: Command) {
        let result = match command {
            Command::ToggleMask => self.machine.toggle(),
            Command::SelectMaskKind(kind) => self.machine.switch_mask_type(kind),
        };

        match result {
            Ok(report) => info!(
                command = %command,
                state = %report.state,
                kind = %report.kind,
                republished = report.republished,
                fallback = report.used_fallback,
                "Command handled"
            ),
            Err(e) => log_failure(&command.to_string(), &e),
        }
    }

    /// Dispatch a key press. Returns whether the key is bound.
    pub fn dispatch_key(&mut self, key: char) -> bool {
        match Command::from_key(key) {
            Some(command) => {
                self.dispatch(command);
                true
            }
            None => {
                debug!(key = %key, "Ignoring unbound key");
                false
            }
        }
    }

    /// Parse and dispatch one line of input. Blank lines are ignored.
    pub fn dispatch_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        match line.parse::<Command>() {
            Ok(command) => self.dispatch(command),
            Err(e) => log_failure(line.trim(), &e),
        }
    }
}

fn log_failure(input: &str, e: &MaskError) {
    if e.is_recoverable() {
        warn!(command = input, error = %e, "Command rejected");
    } else {
        error!(command = input, error = %e, "Command failed");
    }
}
