use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::clock::{ticks_diff, Ticks};
use crate::shared::NUM_INPUTS;

// Terminals without keyboard enhancement only send presses (and autorepeat),
// so a key counts as let go this long after we last heard from it.
const FALLBACK_RELEASE_MS: i32 = 600;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Quit,
    Save,
    Duplicate,
}

/// The keyboard standing in for the touch sensor: one bool per input.
#[derive(Clone, Debug, Default)]
pub struct KeyboardPads {
    last_seen: [Option<Ticks>; NUM_INPUTS],
    releases_reported: bool, // seen a real key-up, so no timeout needed
}

impl KeyboardPads {
    /// Read every pending terminal event, waiting up to `timeout` for the first.
    pub fn poll(&mut self, timeout: Duration, now: Ticks) -> anyhow::Result<Vec<ShellCommand>> {
        let mut cmds = vec![];
        let mut wait = timeout;
        while event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                cmds.extend(self.handle_key(key, now));
            }
            wait = Duration::ZERO;
        }
        Ok(cmds)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Ticks) -> Option<ShellCommand> {
        if key.kind == KeyEventKind::Release {
            self.releases_reported = true;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.kind != KeyEventKind::Press {
                return None;
            }
            return match key.code {
                KeyCode::Char('c') => Some(ShellCommand::Quit),
                KeyCode::Char('s') => Some(ShellCommand::Save),
                KeyCode::Char('d') => Some(ShellCommand::Duplicate),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc if key.kind == KeyEventKind::Press => Some(ShellCommand::Quit),
            KeyCode::Char(c) => {
                if let Some(input) = char_to_input(c) {
                    self.last_seen[input] = match key.kind {
                        KeyEventKind::Release => None,
                        KeyEventKind::Press | KeyEventKind::Repeat => Some(now),
                    };
                }
                None
            }
            _ => None,
        }
    }

    /// Current touch sample.
    pub fn touches(&mut self, now: Ticks) -> [bool; NUM_INPUTS] {
        if !self.releases_reported {
            for seen in &mut self.last_seen {
                if seen.is_some_and(|t| ticks_diff(now, t) >= FALLBACK_RELEASE_MS) {
                    *seen = None;
                }
            }
        }
        self.last_seen.map(|seen| seen.is_some())
    }
}

// drum pads on the left, controls on the home and bottom rows
fn char_to_input(c: char) -> Option<usize> {
    let idx = match c.to_ascii_lowercase() {
        '1' => 0, '2' => 1, '3' => 2, '4' => 3,
        'q' => 4, 'w' => 5, 'e' => 6, 'r' => 7,
        'a' => 8, 's' => 9, 'd' => 10,
        'f' => 11, 'g' => 12, 'h' => 13,
        'z' => 14, 'x' => 15,
        _ => return None,
    };
    Some(idx)
}
