use crate::error::Result;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// Executes a single opcode against a state, producing the next state
pub type Operation = fn(op: &dyn Opcode, state: &State, env: &mut Env) -> Result<State>;

/// First level of dispatch, indexed by the opcode's family nibble.
/// Families 0x0, 0x8, 0xE and 0xF dispatch again on their low bits.
const FAMILIES: [Operation; 16] = [
    system, jump, call, ske, skne, skre, load, add, arithmetic, skrne, loadi, jumpi, rand, draw,
    keyboard, misc,
];

/// 0x8 family, indexed by the low nibble
const ARITHMETIC: [Operation; 16] = [
    mv, or, and, xor, addr, sub, shr, subn, nop, nop, nop, nop, nop, nop, shl, nop,
];

/// 0xE family, keyed by the low byte
const KEYBOARD: [(u8, Operation); 2] = [(0x9E, skpr), (0xA1, skup)];

/// 0xF family, keyed by the low byte
const MISC: [(u8, Operation); 9] = [
    (0x07, moved),
    (0x0A, keyd),
    (0x15, loadd),
    (0x18, loads),
    (0x1E, addi),
    (0x29, ldspr),
    (0x33, bcd),
    (0x55, stor),
    (0x65, read),
];

/// Selects the Operation for a given Opcode's family
pub fn from_op(op: &dyn Opcode) -> Operation {
    FAMILIES[op.family() as usize]
}

/// Decodes and executes `op`
pub fn execute(op: &dyn Opcode, state: &State, env: &mut Env) -> Result<State> {
    from_op(op)(op, state, env)
}

fn lookup(table: &[(u8, Operation)], kk: u8) -> Operation {
    table
        .iter()
        .find(|(code, _)| *code == kk)
        .map(|&(_, operation)| operation)
        .unwrap_or(nop)
}

fn system(op: &dyn Opcode, state: &State, env: &mut Env) -> Result<State> {
    let operation: Operation = match op.addr() {
        0x0E0 => clr,
        0x0EE => rts,
        _ => sys,
    };
    operation(op, state, env)
}

fn arithmetic(op: &dyn Opcode, state: &State, env: &mut Env) -> Result<State> {
    ARITHMETIC[op.n() as usize](op, state, env)
}

fn keyboard(op: &dyn Opcode, state: &State, env: &mut Env) -> Result<State> {
    lookup(&KEYBOARD, op.kk())(op, state, env)
}

fn misc(op: &dyn Opcode, state: &State, env: &mut Env) -> Result<State> {
    lookup(&MISC, op.kk())(op, state, env)
}
