use anyhow::{anyhow, Result};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::any;


pub const UINT_BASE: u8 = 0x80;
pub const SHORT_STRING_BASE: u8 = 0x90;
pub const LONG_STRING_BASE: u8 = 0xA0;
pub const FLOAT_ARRAY_BASE: u8 = 0xC8;
pub const DEFINE_STRING_BASE: u8 = 0xCD;
pub const STRING_REF_BASE: u8 = 0xCF;

/// Opcodes that occupy exactly one byte value.
///
/// The discriminants are the wire bytes; they must never be renumbered.
#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum FixedOpcode {
    Float32 = 0xA4,
    Float64 = 0xA5,
    RequestRef = 0xA6,
    DefineRequest = 0xCC,
    EndOfStream = 0xFF,
}

/// The class of a leading byte, plus whatever the byte itself encodes (widths, lengths).
///
/// [`Opcode::classify`] and [`Opcode::byte`] are inverses over all 256 byte values.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Opcode {
    /// Not an opcode: a byte of the ASCII grammar.
    Ascii(u8),
    Uint {
        width: usize,
    },
    /// Unsigned `width`-byte integer scaled by `256^-radix`.
    FixedPoint {
        width: usize,
        radix: u32,
    },
    ShortString {
        len: usize,
    },
    LongString {
        len_width: usize,
    },
    Float32,
    Float64,
    RequestRef,
    FloatArray {
        len_width: usize,
    },
    DefineRequest,
    DefineString {
        code_width: usize,
    },
    StringRef {
        code_width: usize,
    },
    Reserved(u8),
    EndOfStream,
}

impl TryFrom<u8> for FixedOpcode {
    type Error = anyhow::Error;
    fn try_from(byte: u8) -> Result<Self> {
        FixedOpcode::from_u8(byte).ok_or(anyhow!(
            "Unknown {} {byte:#04x}",
            any::type_name::<FixedOpcode>()
        ))
    }
}

impl From<FixedOpcode> for Opcode {
    fn from(op: FixedOpcode) -> Self {
        match op {
            FixedOpcode::Float32 => Self::Float32,
            FixedOpcode::Float64 => Self::Float64,
            FixedOpcode::RequestRef => Self::RequestRef,
            FixedOpcode::DefineRequest => Self::DefineRequest,
            FixedOpcode::EndOfStream => Self::EndOfStream,
        }
    }
}

impl Opcode {
    pub fn classify(byte: u8) -> Self {
        if byte < UINT_BASE {
            return Self::Ascii(byte);
        }
        if let Ok(fixed) = FixedOpcode::try_from(byte) {
            return Self::from(fixed);
        }
        match byte {
            0x80..=0x8F => {
                let bits = byte - UINT_BASE;
                let width = usize::from(bits & 3) + 1;
                let radix = u32::from((bits >> 2) & 3);
                if radix == 0 {
                    Self::Uint { width }
                } else {
                    Self::FixedPoint { width, radix }
                }
            }
            0x90..=0x9F => Self::ShortString {
                len: usize::from(byte - SHORT_STRING_BASE),
            },
            0xA0..=0xA3 => Self::LongString {
                len_width: usize::from(byte - LONG_STRING_BASE) + 1,
            },
            0xC8..=0xCB => Self::FloatArray {
                len_width: usize::from(byte - FLOAT_ARRAY_BASE) + 1,
            },
            0xCD..=0xCE => Self::DefineString {
                code_width: usize::from(byte - DEFINE_STRING_BASE) + 1,
            },
            0xCF..=0xD0 => Self::StringRef {
                code_width: usize::from(byte - STRING_REF_BASE) + 1,
            },
            _ => Self::Reserved(byte),
        }
    }

    /// The leading byte that encodes this opcode.
    ///
    /// Widths and lengths outside the ranges [`Opcode::classify`] produces are a caller bug
    /// and panic in debug builds.
    pub fn byte(self) -> u8 {
        match self {
            Self::Ascii(byte) | Self::Reserved(byte) => byte,
            Self::Uint { width } => Self::offset(UINT_BASE, width - 1, 4),
            Self::FixedPoint { width, radix } => {
                debug_assert!((1..4).contains(&radix));
                UINT_BASE + 4 * (radix as u8) + Self::offset(0, width - 1, 4)
            }
            Self::ShortString { len } => Self::offset(SHORT_STRING_BASE, len, 16),
            Self::LongString { len_width } => Self::offset(LONG_STRING_BASE, len_width - 1, 4),
            Self::Float32 => FixedOpcode::Float32 as u8,
            Self::Float64 => FixedOpcode::Float64 as u8,
            Self::RequestRef => FixedOpcode::RequestRef as u8,
            Self::FloatArray { len_width } => Self::offset(FLOAT_ARRAY_BASE, len_width - 1, 4),
            Self::DefineRequest => FixedOpcode::DefineRequest as u8,
            Self::DefineString { code_width } => {
                Self::offset(DEFINE_STRING_BASE, code_width - 1, 2)
            }
            Self::StringRef { code_width } => Self::offset(STRING_REF_BASE, code_width - 1, 2),
            Self::EndOfStream => FixedOpcode::EndOfStream as u8,
        }
    }

    fn offset(base: u8, delta: usize, count: usize) -> u8 {
        debug_assert!(delta < count);
        base + delta as u8
    }
}
