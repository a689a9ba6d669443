use crate::constants::KEY_COUNT;
use crate::error::{Fault, Result};

/// Latched state of the 16 key hexadecimal keypad.
///
/// Keys are latched by the host and consumed by the skip-on-key instructions, which clear the
/// key they observe.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn is_pressed(&self, key: u8) -> Result<bool> {
        self.keys
            .get(key as usize)
            .copied()
            .ok_or_else(|| Fault::keypad(key as usize))
    }

    /// Sets the key's state, returning whether it was newly pressed
    pub fn set(&mut self, key: u8, pressed: bool) -> Result<bool> {
        let cell = self
            .keys
            .get_mut(key as usize)
            .ok_or_else(|| Fault::keypad(key as usize))?;
        let newly_pressed = pressed && !*cell;
        *cell = pressed;
        Ok(newly_pressed)
    }

    /// Returns whether the key was pressed and clears it
    pub fn consume(&mut self, key: u8) -> Result<bool> {
        let pressed = self.is_pressed(key)?;
        self.keys[key as usize] = false;
        Ok(pressed)
    }

    pub fn clear(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn keys(&self) -> [bool; KEY_COUNT] {
        self.keys
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether instruction fetch is suspended on FX0A
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Wait {
    Running,
    /// Waiting for a key whose index goes into this register
    AwaitingKey(u8),
}

impl Default for Wait {
    fn default() -> Self {
        Wait::Running
    }
}
