//! # Wire format
//!
//! A RIB stream mixes two grammars byte by byte.
//! Bytes below `0x80` belong to the ASCII grammar: whitespace, comments, quoted strings,
//! numerals, `[`/`]` and bare request names.
//! Bytes from `0x80` upward are one-byte opcodes of the binary grammar, classified by [`Opcode`].
//!
//! All multi-byte binary fields are most-significant-byte first.
//!
//! ```text
//! 0x80 + (w-1)                 uint        [u8; w]                          w in 1..=4
//! 0x80 + 4*d + (w-1)           fixed       [u8; w], value = uint / 256^d    d in 1..=3
//! 0x90 + len                   string      [u8; len]                        len in 0..=15
//! 0xA0 + (w-1)                 string      len: [u8; w], [u8; len]
//! 0xA4                         f32         [u8; 4]
//! 0xA5                         f64         [u8; 8]   (narrowed to f32)
//! 0xA6                         request     code: u8
//! 0xC8 + (w-1)                 f32 array   len: [u8; w], [[u8; 4]; len]
//! 0xCC                         define      code: u8, name: string
//! 0xCD + (w-1)                 define      code: [u8; w], literal: string   w in 1..=2
//! 0xCF + (w-1)                 string      code: [u8; w]                    w in 1..=2
//! 0xFF                         end of stream
//! ```
//!
//! Every other byte in `0x80..=0xFE` is reserved.
//!
//! A stream that begins with [`GZIP_MAGIC`] is gzip framed.

mod ieee;
mod opcode;
mod uint;

pub use ieee::*;
pub use opcode::*;
pub use uint::*;

pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Strings shorter than this are encoded inline in their opcode.
pub const SHORT_STRING_LIMIT: usize = 16;

/// Count of slots in the encoded-request table.
pub const REQUEST_CODE_COUNT: usize = 256;
