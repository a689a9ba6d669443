use rand::{Rng, RngCore};
use tracing::debug;

use crate::config::Quirks;
use crate::constants::SPRITE_BYTES;
use crate::error::Result;
use crate::input::Wait;
use crate::opcode::Opcode;
use crate::state::State;

/// What an operation may draw on besides the machine state
pub struct Env<'a> {
    pub rng: &'a mut dyn RngCore,
    pub quirks: Quirks,
}

impl<'a> Env<'a> {
    pub fn new(rng: &'a mut dyn RngCore, quirks: Quirks) -> Self {
        Env { rng, quirks }
    }
}

fn vx(op: &dyn Opcode, state: &State) -> u8 {
    state.v[op.x() as usize]
}

fn vy(op: &dyn Opcode, state: &State) -> u8 {
    state.v[op.y() as usize]
}

/// The state with the program counter moved past the current instruction
fn advance(state: &State) -> State {
    State {
        pc: state.pc.wrapping_add(0x2),
        ..*state
    }
}

/// The state with the program counter moved past the next instruction if `condition` holds
fn skip_if(state: &State, condition: bool) -> State {
    let step = if condition { 0x4 } else { 0x2 };
    State {
        pc: state.pc.wrapping_add(step),
        ..*state
    }
}

/// Writes Vx then VF, so the flag wins when x is F
fn set_with_flag(state: &State, x: u8, value: u8, flag: bool) -> State {
    let mut v = state.v;
    v[x as usize] = value;
    let mut next = State {
        pc: state.pc.wrapping_add(0x2),
        v,
        ..*state
    };
    next.set_flag(flag);
    next
}

/// Vx = value
fn set_vx(op: &dyn Opcode, state: &State, value: u8) -> State {
    let mut v = state.v;
    v[op.x() as usize] = value;
    State {
        pc: state.pc.wrapping_add(0x2),
        v,
        ..*state
    }
}

/// unclassified; ignored
pub fn nop(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    debug!(
        "unclassified opcode {:04X} at {:#05X} treated as a no-op",
        op.word(),
        state.pc
    );
    Ok(advance(state))
}

/// clear
pub fn clr(_op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let mut frame_buffer = state.frame_buffer;
    frame_buffer.clear();
    Ok(State {
        pc: state.pc.wrapping_add(0x2),
        frame_buffer,
        draw_flag: true,
        ..*state
    })
}

/// PC = STACK.pop() + 2
pub fn rts(_op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let mut stack = state.stack;
    let return_addr = stack.pop()?;
    Ok(State {
        pc: return_addr.wrapping_add(0x2),
        stack,
        ..*state
    })
}

/// PC = addr
/// Legacy machine code routine call; treated as a plain jump
pub fn sys(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(State {
        pc: op.addr(),
        ..*state
    })
}

/// PC = addr
pub fn jump(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(State {
        pc: op.addr(),
        ..*state
    })
}

/// STACK.push(PC); PC = addr
pub fn call(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let mut stack = state.stack;
    stack.push(state.pc)?;
    Ok(State {
        pc: op.addr(),
        stack,
        ..*state
    })
}

/// if Vx == kk then pc += 2
pub fn ske(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(skip_if(state, vx(op, state) == op.kk()))
}

/// if Vx != kk then pc += 2
pub fn skne(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(skip_if(state, vx(op, state) != op.kk()))
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(skip_if(state, vx(op, state) == vy(op, state)))
}

/// Vx = kk
pub fn load(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(set_vx(op, state, op.kk()))
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(set_vx(op, state, vx(op, state).wrapping_add(op.kk())))
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(set_vx(op, state, vy(op, state)))
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(set_vx(op, state, vx(op, state) | vy(op, state)))
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(set_vx(op, state, vx(op, state) & vy(op, state)))
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(set_vx(op, state, vx(op, state) ^ vy(op, state)))
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let (res, over) = vx(op, state).overflowing_add(vy(op, state));
    Ok(set_with_flag(state, op.x(), res, over))
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: &dyn Opcode, state: &State, env: &mut Env) -> Result<State> {
    let (x, y) = (vx(op, state), vy(op, state));
    if env.quirks.absolute_difference_subtract {
        return Ok(if x > y {
            set_with_flag(state, op.x(), x - y, true)
        } else {
            set_with_flag(state, op.x(), y - x, false)
        });
    }
    let (res, under) = x.overflowing_sub(y);
    Ok(set_with_flag(state, op.x(), res, !under))
}

/// The register a shift reads from
fn shift_source(op: &dyn Opcode, quirks: Quirks) -> u8 {
    if quirks.shift_source_y {
        op.y()
    } else {
        op.x()
    }
}

/// Vx = Vy = Vy >> 1; VF = shifted out bit
pub fn shr(op: &dyn Opcode, state: &State, env: &mut Env) -> Result<State> {
    let source = shift_source(op, env.quirks);
    let value = state.v[source as usize];
    let mut v = state.v;
    v[source as usize] = value >> 1;
    v[op.x() as usize] = value >> 1;
    let mut next = State {
        pc: state.pc.wrapping_add(0x2),
        v,
        ..*state
    };
    next.set_flag(value & 0x1 == 0x1);
    Ok(next)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let (res, under) = vy(op, state).overflowing_sub(vx(op, state));
    Ok(set_with_flag(state, op.x(), res, !under))
}

/// Vx = Vy = Vy << 1; VF = shifted out bit
pub fn shl(op: &dyn Opcode, state: &State, env: &mut Env) -> Result<State> {
    let source = shift_source(op, env.quirks);
    let value = state.v[source as usize];
    let mut v = state.v;
    v[source as usize] = value << 1;
    v[op.x() as usize] = value << 1;
    let mut next = State {
        pc: state.pc.wrapping_add(0x2),
        v,
        ..*state
    };
    next.set_flag(value & 0x80 == 0x80);
    Ok(next)
}

/// if Vx != Vy then pc +=2
pub fn skrne(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(skip_if(state, vx(op, state) != vy(op, state)))
}

/// I = addr
pub fn loadi(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(State {
        pc: state.pc.wrapping_add(0x2),
        i: op.addr(),
        ..*state
    })
}

/// PC = V0 + addr
pub fn jumpi(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(State {
        pc: u16::from(state.v[0x0]) + op.addr(),
        ..*state
    })
}

/// Vx = rand_byte & kk
pub fn rand(op: &dyn Opcode, state: &State, env: &mut Env) -> Result<State> {
    let rand_byte: u8 = env.rng.gen();
    Ok(set_vx(op, state, rand_byte & op.kk()))
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// VF = 1 if any pixels were erased, otherwise 0
pub fn draw(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let sprite = state.memory.slice(state.i, op.n() as usize)?;
    let mut frame_buffer = state.frame_buffer;
    let collision = frame_buffer.blit(vx(op, state) as usize, vy(op, state) as usize, sprite);
    let mut next = State {
        pc: state.pc.wrapping_add(0x2),
        frame_buffer,
        draw_flag: true,
        ..*state
    };
    next.set_flag(collision);
    Ok(next)
}

/// if Vx.pressed then pc += 2
/// The key is consumed either way
pub fn skpr(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let mut keypad = state.keypad;
    let pressed = keypad.consume(vx(op, state))?;
    Ok(State {
        keypad,
        ..skip_if(state, pressed)
    })
}

/// if !Vx.pressed then pc += 2
/// A pressed key is consumed
pub fn skup(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let mut keypad = state.keypad;
    let pressed = keypad.consume(vx(op, state))?;
    Ok(State {
        keypad,
        ..skip_if(state, !pressed)
    })
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(set_vx(op, state, state.delay_timer.value()))
}

/// await keypress for Vx
/// The program counter stays put until the key arrives
pub fn keyd(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(State {
        wait: Wait::AwaitingKey(op.x()),
        ..*state
    })
}

/// DT = Vx
pub fn loadd(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let mut delay_timer = state.delay_timer;
    delay_timer.set(vx(op, state));
    Ok(State {
        pc: state.pc.wrapping_add(0x2),
        delay_timer,
        ..*state
    })
}

/// ST = Vx
/// Marks the sound as started whatever the value
pub fn loads(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let mut sound_timer = state.sound_timer;
    sound_timer.set(vx(op, state));
    Ok(State {
        pc: state.pc.wrapping_add(0x2),
        sound_timer,
        sound_started: true,
        ..*state
    })
}

/// I += Vx; VF = 1 if I leaves the 12-bit address space, in which case it wraps
pub fn addi(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let i = state.i + u16::from(vx(op, state));
    if i <= 0x0FFF {
        return Ok(State {
            pc: state.pc.wrapping_add(0x2),
            i,
            ..*state
        });
    }
    let mut next = State {
        pc: state.pc.wrapping_add(0x2),
        i: i & 0x0FFF,
        ..*state
    };
    next.set_flag(true);
    Ok(next)
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    Ok(State {
        pc: state.pc.wrapping_add(0x2),
        i: u16::from(vx(op, state)) * SPRITE_BYTES,
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let value = vx(op, state);
    let digits = [value / 100 % 10, value / 10 % 10, value % 10];
    let mut memory = state.memory;
    memory.load(state.i, &digits)?;
    Ok(State {
        pc: state.pc.wrapping_add(0x2),
        memory,
        ..*state
    })
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
pub fn stor(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let count = op.x() as usize + 1;
    let mut memory = state.memory;
    memory.load(state.i, &state.v[..count])?;
    Ok(State {
        pc: state.pc.wrapping_add(0x2),
        i: state.i + count as u16,
        memory,
        ..*state
    })
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
pub fn read(op: &dyn Opcode, state: &State, _env: &mut Env) -> Result<State> {
    let count = op.x() as usize + 1;
    let mut v = state.v;
    v[..count].copy_from_slice(state.memory.slice(state.i, count)?);
    Ok(State {
        pc: state.pc.wrapping_add(0x2),
        i: state.i + count as u16,
        v,
        ..*state
    })
}
