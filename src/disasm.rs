use crate::opcode::Opcode;

/// Renders an opcode as an assembly mnemonic.
///
/// Decoding follows the same family/low-bits split as execution; words that don't decode to an
/// instruction are rendered as data (`DW`).
pub fn disassemble(op: &dyn Opcode) -> String {
    let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
    match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => "CLS".to_string(),
        (0x0, 0x0, 0xE, 0xE) => "RET".to_string(),
        (0x0, ..) => format!("SYS {:#05X}", addr),
        (0x1, ..) => format!("JP {:#05X}", addr),
        (0x2, ..) => format!("CALL {:#05X}", addr),
        (0x3, ..) => format!("SE V{:X}, {:#04X}", x, kk),
        (0x4, ..) => format!("SNE V{:X}, {:#04X}", x, kk),
        (0x5, ..) => format!("SE V{:X}, V{:X}", x, y),
        (0x6, ..) => format!("LD V{:X}, {:#04X}", x, kk),
        (0x7, ..) => format!("ADD V{:X}, {:#04X}", x, kk),
        (0x8, .., 0x0) => format!("LD V{:X}, V{:X}", x, y),
        (0x8, .., 0x1) => format!("OR V{:X}, V{:X}", x, y),
        (0x8, .., 0x2) => format!("AND V{:X}, V{:X}", x, y),
        (0x8, .., 0x3) => format!("XOR V{:X}, V{:X}", x, y),
        (0x8, .., 0x4) => format!("ADD V{:X}, V{:X}", x, y),
        (0x8, .., 0x5) => format!("SUB V{:X}, V{:X}", x, y),
        (0x8, .., 0x6) => format!("SHR V{:X}, V{:X}", x, y),
        (0x8, .., 0x7) => format!("SUBN V{:X}, V{:X}", x, y),
        (0x8, .., 0xE) => format!("SHL V{:X}, V{:X}", x, y),
        (0x9, ..) => format!("SNE V{:X}, V{:X}", x, y),
        (0xA, ..) => format!("LD I, {:#05X}", addr),
        (0xB, ..) => format!("JP V0, {:#05X}", addr),
        (0xC, ..) => format!("RND V{:X}, {:#04X}", x, kk),
        (0xD, ..) => format!("DRW V{:X}, V{:X}, {:#03X}", x, y, n),
        (0xE, .., 0x9, 0xE) => format!("SKP V{:X}", x),
        (0xE, .., 0xA, 0x1) => format!("SKNP V{:X}", x),
        (0xF, .., 0x0, 0x7) => format!("LD V{:X}, DT", x),
        (0xF, .., 0x0, 0xA) => format!("LD V{:X}, K", x),
        (0xF, .., 0x1, 0x5) => format!("LD DT, V{:X}", x),
        (0xF, .., 0x1, 0x8) => format!("LD ST, V{:X}", x),
        (0xF, .., 0x1, 0xE) => format!("ADD I, V{:X}", x),
        (0xF, .., 0x2, 0x9) => format!("LD F, V{:X}", x),
        (0xF, .., 0x3, 0x3) => format!("LD B, V{:X}", x),
        (0xF, .., 0x5, 0x5) => format!("LD [I], V{:X}", x),
        (0xF, .., 0x6, 0x5) => format!("LD V{:X}, [I]", x),
        _ => format!("DW {:#06X}", op.word()),
    }
}
