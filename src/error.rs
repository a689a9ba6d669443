use std::fmt;

use thiserror::Error;

/// The piece of machine state an out-of-range index pointed into
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Region {
    Memory,
    Stack,
    Keypad,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Region::Memory => write!(f, "memory"),
            Region::Stack => write!(f, "stack"),
            Region::Keypad => write!(f, "keypad"),
        }
    }
}

/// Faults reported to the host.
///
/// An instruction that faults leaves the machine exactly as it was before the instruction ran,
/// so the host is free to inspect it, skip the offending word or keep going.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("{region} access out of range at index {index:#05X}")]
    OutOfRangeAccess { region: Region, index: usize },

    #[error("program image of {len} bytes does not fit in the {capacity} bytes available")]
    InvalidLoadSize { len: usize, capacity: usize },
}

impl Fault {
    pub(crate) fn memory(index: usize) -> Self {
        Fault::OutOfRangeAccess {
            region: Region::Memory,
            index,
        }
    }

    pub(crate) fn stack(index: usize) -> Self {
        Fault::OutOfRangeAccess {
            region: Region::Stack,
            index,
        }
    }

    pub(crate) fn keypad(index: usize) -> Self {
        Fault::OutOfRangeAccess {
            region: Region::Keypad,
            index,
        }
    }
}

pub type Result<T> = std::result::Result<T, Fault>;
