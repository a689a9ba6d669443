pub use chip8::Chip8;
pub use config::{Config, Quirks};
pub use constants::CLOCK_SPEED;
pub use disasm::disassemble;
pub use display::FrameBuffer;
pub use error::{Fault, Region, Result};
pub use host::{AudioSink, DisplaySink, Headless, InputSource, Mute, NoInput};
pub use input::{Keypad, Wait};
pub use memory::Memory;
pub use opcode::Opcode;
pub use stack::Stack;
pub use state::State;
pub use timer::Timer;

mod chip8;
mod config;
pub mod constants;
mod disasm;
mod display;
mod error;
mod host;
mod input;
mod instruction;
mod memory;
mod opcode;
mod operations;
mod stack;
mod state;
mod timer;

#[cfg(test)]
mod testing;
