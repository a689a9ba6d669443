use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::constants::{KEY_COUNT, MAX_PROGRAM_SIZE, MAX_SAVED_STATES, PROGRAM_START};
use crate::disasm::disassemble;
use crate::display::FrameBuffer;
use crate::error::{Fault, Result};
use crate::host::{AudioSink, DisplaySink, InputSource};
use crate::input::Wait;
use crate::instruction::execute;
use crate::operations::Env;
use crate::state::State;
use crate::timer::CycleClock;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - real time accumulated towards the next instruction
///  - the random source used by CXKK
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys, and resolving a pending FX0A
/// - advancing the CPU and timers by elapsed real time, and reversing the CPU
/// - inspecting its frame buffer and sound timer for some display and speaker
/// - disassembling memory for tracing tools
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    config: Config,
    clock: CycleClock,
    rng: Box<dyn RngCore>,
    last_instruction: Option<String>,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Chip8::with_rng(config, Box::new(StdRng::from_entropy()))
    }

    /// # Arguments
    /// * `config` cycle length and quirks
    /// * `rng` the source of CXKK's random bytes; pass a seeded one for reproducible runs
    pub fn with_rng(config: Config, rng: Box<dyn RngCore>) -> Self {
        Chip8 {
            state: State::new(),
            previous_states: VecDeque::new(),
            config,
            clock: CycleClock::new(),
            rng,
            last_instruction: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only view of the machine for inspection
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Load a rom image at 0x200
    ///
    /// # Arguments
    /// * `rom` the raw program bytes
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_PROGRAM_SIZE {
            return Err(Fault::InvalidLoadSize {
                len: rom.len(),
                capacity: MAX_PROGRAM_SIZE,
            });
        }
        self.state.memory.load(PROGRAM_START, rom)?;
        debug!("loaded {} byte rom at {:#05X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    /// Advances the machine by `delta` of real time.
    /// - the delay and sound timers count down regardless of anything else
    /// - breaks if awaiting a keypress
    /// - executes one instruction once a whole cycle length has accumulated
    ///
    /// Returns whether an instruction was executed.
    pub fn tick(&mut self, delta: Duration) -> Result<bool> {
        self.advance_timers(delta);
        if self.is_awaiting_key() {
            return Ok(false);
        }
        self.clock.accumulate(delta);
        if !self.clock.fire(self.config.cycle_length) {
            return Ok(false);
        }
        self.step()
    }

    /// Runs one round of the host loop with the given collaborators:
    /// - latches the keys reported by `input`
    /// - ticks the machine by `delta`
    /// - renders the frame if it changed and lets `audio` know about the sound timer
    ///
    /// The frame and sound are handed over even if the instruction faulted.
    pub fn update(
        &mut self,
        delta: Duration,
        input: &mut dyn InputSource,
        display: &mut dyn DisplaySink,
        audio: &mut dyn AudioSink,
    ) -> Result<bool> {
        self.set_keys(input.keys())?;
        let executed = self.tick(delta);

        if let Some(frame) = self.get_frame() {
            display.render(frame);
            self.clear_dirty();
        }
        if self.take_sound_started() {
            audio.start();
        }
        audio.remaining(self.sound_timer());

        executed
    }

    /// Advances the CPU by a single instruction, ignoring the cycle clock
    /// - breaks if awaiting a keypress
    /// - gets and executes the next opcode
    ///
    /// If the instruction faults the state is left as it was and the fault is returned.
    pub fn step(&mut self) -> Result<bool> {
        if self.is_awaiting_key() {
            return Ok(false);
        }
        let op = self.state.fetch()?;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            self.state.pc
        );

        let mut env = Env::new(self.rng.as_mut(), self.config.quirks);
        let next = execute(&op, &self.state, &mut env).map_err(|fault| {
            warn!("{:04X} at {:#05X} faulted: {}", op, self.state.pc, fault);
            fault
        })?;

        self.save_state();
        self.state = next;
        self.last_instruction = Some(disassemble(&op));
        if let Wait::AwaitingKey(register) = self.state.wait {
            debug!("awaiting a key for V{:X}", register);
        }
        Ok(true)
    }

    /// Steps over the instruction at the program counter without executing it
    pub fn skip_instruction(&mut self) {
        self.state.pc = self.state.pc.wrapping_add(0x2);
    }

    /// Reverses the CPU by a single instruction if possible
    /// - if there are previous_states, pops the last one and restores it
    ///
    /// Returns whether anything was restored.
    pub fn reverse_cpu(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                self.state = state;
                self.last_instruction = None;
                debug!("rewound to pc {:#05X}", self.state.pc);
                true
            }
            None => false,
        }
    }

    /// Puts the current state in previous_states
    /// - if there are already MAX_SAVED_STATES saved then the oldest is dropped
    fn save_state(&mut self) {
        if self.previous_states.len() == MAX_SAVED_STATES {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.state);
    }

    /// Counts both timers down by `delta` of real time
    fn advance_timers(&mut self, delta: Duration) {
        let period = self.config.timer_period();
        self.state.delay_timer.tick(delta, period);
        self.state.sound_timer.tick(delta, period);
    }

    /// Set the pressed status of key; a new press also resolves a pending FX0A
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) -> Result<()> {
        if self.state.keypad.set(key, true)? {
            self.resolve_key(key)?;
        }
        Ok(())
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) -> Result<()> {
        self.state.keypad.set(key, false)?;
        Ok(())
    }

    /// Latch the pressed status of every key at once.
    /// The lowest newly pressed key resolves a pending FX0A.
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) -> Result<()> {
        let mut first_new_press = None;
        for (key, &pressed) in (0u8..).zip(keys.iter()) {
            if self.state.keypad.set(key, pressed)? && first_new_press.is_none() {
                first_new_press = Some(key);
            }
        }
        if let Some(key) = first_new_press {
            self.resolve_key(key)?;
        }
        Ok(())
    }

    /// Release every key
    pub fn clear_keys(&mut self) {
        self.state.keypad.clear();
    }

    /// Completes a pending FX0A with `key`: the key goes into the waiting register and the
    /// program counter moves past the FX0A.
    ///
    /// Returns whether a wait was resolved.
    pub fn resolve_key(&mut self, key: u8) -> Result<bool> {
        let register = match self.state.wait {
            Wait::AwaitingKey(register) => register,
            Wait::Running => return Ok(false),
        };
        if key as usize >= KEY_COUNT {
            return Err(Fault::keypad(key as usize));
        }
        self.state.v[register as usize] = key;
        self.state.pc = self.state.pc.wrapping_add(0x2);
        self.state.wait = Wait::Running;
        debug!("V{:X} received key {:X}", register, key);
        Ok(true)
    }

    pub fn is_awaiting_key(&self) -> bool {
        self.state.wait != Wait::Running
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn get_frame(&self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.state.draw_flag
    }

    /// To be called once the frame has been rendered
    pub fn clear_dirty(&mut self) {
        self.state.draw_flag = false;
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer.value()
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer.value()
    }

    /// Whether the sound timer was loaded since the last call
    pub fn take_sound_started(&mut self) -> bool {
        std::mem::replace(&mut self.state.sound_started, false)
    }

    /// Mnemonic for the instruction word stored at `addr`
    pub fn disassemble_at(&self, addr: u16) -> Result<String> {
        let op = self.state.memory.word(addr)?;
        Ok(disassemble(&op))
    }

    /// Mnemonic of the most recently executed instruction
    pub fn last_instruction(&self) -> Option<&str> {
        self.last_instruction.as_deref()
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
