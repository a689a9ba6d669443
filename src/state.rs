use crate::constants::{FLAG_REGISTER, PROGRAM_START, REGISTER_COUNT};
use crate::display::FrameBuffer;
use crate::input::{Keypad, Wait};
use crate::memory::Memory;
use crate::stack::Stack;
use crate::timer::Timer;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 16-bit memory address register, 12 bits of which are meaningful
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Timers
/// - 2 8-bit timers (delay & sound) that count down in real time
/// - `sound_started` is raised when the sound timer is loaded and lowered once the host saw it
///
/// ## Memory
/// - 16 entry return address stack
/// - 4096 bytes of addressable memory
/// - 64x32 frame buffer, and whether it changed since the host last rendered it
///
/// ## Input
/// - latched pressed status of keys 0..F
/// - whether emulation is halted until a key's value is written to some register
///
/// Operations never mutate a State in place; they return a new one, so an instruction that
/// faults leaves the previous State intact.
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub stack: Stack,
    pub delay_timer: Timer,
    pub sound_timer: Timer,
    pub sound_started: bool,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keypad: Keypad,
    pub wait: Wait,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            // 0x200 is where ROMs are loaded into memory
            pc: PROGRAM_START,
            stack: Stack::new(),
            delay_timer: Timer::new(),
            sound_timer: Timer::new(),
            sound_started: false,
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            keypad: Keypad::new(),
            wait: Wait::Running,
        }
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.v[FLAG_REGISTER] = flag as u8;
    }

    /// The instruction word at the program counter, high byte first
    pub fn fetch(&self) -> crate::error::Result<u16> {
        self.memory.word(self.pc)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("State")
            .field("v", &self.v)
            .field("i", &format_args!("{:#05X}", self.i))
            .field("pc", &format_args!("{:#05X}", self.pc))
            .field("stack", &self.stack.frames())
            .field("delay_timer", &self.delay_timer.value())
            .field("sound_timer", &self.sound_timer.value())
            .field("wait", &self.wait)
            .finish()
    }
}
