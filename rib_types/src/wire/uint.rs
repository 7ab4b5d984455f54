use std::ops::Deref;


/// An unsigned integer in its shortest big-endian form, 1 to 4 bytes.
#[derive(Clone, Copy, Debug)]
pub struct MinimalUint {
    buf: [u8; 4],
    width: usize,
}

impl MinimalUint {
    pub fn new(val: u32) -> Self {
        let width = min_width(val);
        let mut buf = [0u8; 4];
        for (i, byte) in buf[..width].iter_mut().enumerate() {
            *byte = (val >> (8 * (width - 1 - i))) as u8;
        }
        Self { buf, width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.width]
    }
}

impl Deref for MinimalUint {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Count of bytes needed to represent `val`. Zero still takes one byte.
pub fn min_width(val: u32) -> usize {
    match val {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    }
}

/// Big-endian bytes to integer. Only the low 32 bits of longer inputs survive.
pub fn decode_uint(buf: &[u8]) -> u32 {
    buf.iter()
        .fold(0u32, |val, byte| (val << 8) | u32::from(*byte))
}
