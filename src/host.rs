//! Capabilities the host plugs into `Chip8::update`.
//!
//! The interpreter doesn't know how pixels get to a screen, where key presses come from or how
//! a beep is made; the host supplies those per call.

use crate::constants::KEY_COUNT;
use crate::display::FrameBuffer;

/// Something that can show a frame
pub trait DisplaySink {
    /// Called with the frame buffer whenever it changed since the last render
    fn render(&mut self, frame: &FrameBuffer);
}

/// Something that reports which keypad keys are held down
pub trait InputSource {
    /// Current pressed status of keys 0..F
    fn keys(&mut self) -> [bool; KEY_COUNT];
}

/// Something that can beep
pub trait AudioSink {
    /// Called once each time the program loads the sound timer
    fn start(&mut self);

    /// Called every update with what's left of the sound timer; silence once it reaches 0
    fn remaining(&mut self, _sound_timer: u8) {}
}

/// Useful for running without a screen
pub struct Headless;

impl DisplaySink for Headless {
    fn render(&mut self, _frame: &FrameBuffer) {}
}

/// Never has any keys pressed
pub struct NoInput;

impl InputSource for NoInput {
    fn keys(&mut self) -> [bool; KEY_COUNT] {
        [false; KEY_COUNT]
    }
}

/// Swallows every beep
pub struct Mute;

impl AudioSink for Mute {
    fn start(&mut self) {}
}
