use crate::constants::STACK_SIZE;
use crate::error::{Fault, Result};

/// Return address stack.
///
/// `pointer` is the number of occupied entries: a push writes `entries[pointer]` and then
/// increments it, a pop decrements it and then reads. Calls nested deeper than `STACK_SIZE`
/// and returns from an empty stack are faults rather than silent corruption.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Stack {
    entries: [u16; STACK_SIZE],
    pointer: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            entries: [0; STACK_SIZE],
            pointer: 0,
        }
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn push(&mut self, addr: u16) -> Result<()> {
        let slot = self
            .entries
            .get_mut(self.pointer)
            .ok_or_else(|| Fault::stack(self.pointer))?;
        *slot = addr;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        let pointer = self.pointer.checked_sub(1).ok_or_else(|| Fault::stack(0))?;
        self.pointer = pointer;
        Ok(self.entries[pointer])
    }

    /// Occupied entries, oldest first
    pub fn frames(&self) -> &[u16] {
        &self.entries[..self.pointer]
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut stack = Stack::new();
        stack.push(0x200).unwrap();
        stack.push(0x300).unwrap();
        assert_eq!(stack.pointer(), 2);
        assert_eq!(stack.frames(), &[0x200, 0x300]);
        assert_eq!(stack.pop(), Ok(0x300));
        assert_eq!(stack.pop(), Ok(0x200));
        assert_eq!(stack.pointer(), 0);
    }

    #[test]
    fn test_overflow() {
        let mut stack = Stack::new();
        for addr in 0..STACK_SIZE as u16 {
            stack.push(addr).unwrap();
        }
        assert_eq!(stack.push(0xABC), Err(Fault::stack(STACK_SIZE)));
        assert_eq!(stack.pointer(), STACK_SIZE);
    }

    #[test]
    fn test_underflow() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), Err(Fault::stack(0)));
        assert_eq!(stack.pointer(), 0);
    }
}
