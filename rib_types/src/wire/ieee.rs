//! IEEE-754 values composed from and decomposed into big-endian bytes, one shift per byte.


pub fn pack_f32(f: f32) -> [u8; 4] {
    let bits = f.to_bits();
    [
        (bits >> 24) as u8,
        (bits >> 16) as u8,
        (bits >> 8) as u8,
        bits as u8,
    ]
}

pub fn unpack_f32(buf: [u8; 4]) -> f32 {
    let bits = (u32::from(buf[0]) << 24)
        | (u32::from(buf[1]) << 16)
        | (u32::from(buf[2]) << 8)
        | u32::from(buf[3]);
    f32::from_bits(bits)
}

pub fn pack_f64(f: f64) -> [u8; 8] {
    let bits = f.to_bits();
    let mut buf = [0u8; 8];
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte = (bits >> (56 - 8 * i)) as u8;
    }
    buf
}

pub fn unpack_f64(buf: [u8; 8]) -> f64 {
    let bits = buf
        .iter()
        .fold(0u64, |bits, byte| (bits << 8) | u64::from(*byte));
    f64::from_bits(bits)
}
