use crate::ascii::write_archive_record;
use crate::encoder::{ArchiveRecordKind, Encoder};
use anyhow::{Context, Result};
use log::{debug, warn};
use rib_types::wire::{pack_f32, MinimalUint, Opcode, REQUEST_CODE_COUNT, SHORT_STRING_LIMIT};
use std::collections::HashMap;
use std::io::{BufWriter, Write};


/// Writes the packed grammar.
///
/// Request names are assigned codes in order of first use. The first use of a name
/// defines its code and then references it; later uses are the 2-byte reference alone.
/// Once all codes are taken, further new names are written as ASCII text.
///
/// Integer and string arrays keep ASCII brackets around binary members.
/// Reals are always written as `f32`; fixed point and `f64` are read but never written.
pub struct BinaryEncoder<W: Write> {
    w: BufWriter<W>,
    request_codes: HashMap<String, u8>,
    codes_exhausted: bool,
}

impl<W: Write> BinaryEncoder<W> {
    pub fn new(sink: W) -> Self {
        Self {
            w: BufWriter::new(sink),
            request_codes: HashMap::default(),
            codes_exhausted: false,
        }
    }

    fn write_opcode(&mut self, op: Opcode) -> Result<()> {
        self.w.write_all(&[op.byte()])?;
        Ok(())
    }

    fn write_uint(&mut self, val: u32) -> Result<()> {
        let uint = MinimalUint::new(val);
        self.write_opcode(Opcode::Uint {
            width: uint.width(),
        })?;
        self.w.write_all(&uint)?;
        Ok(())
    }

    fn write_request_ref(&mut self, code: u8) -> Result<()> {
        self.write_opcode(Opcode::RequestRef)?;
        self.w.write_all(&[code])?;
        Ok(())
    }
}

impl<W: Write> Encoder for BinaryEncoder<W> {
    fn begin_request(&mut self, name: &str) -> Result<()> {
        if let Some(&code) = self.request_codes.get(name) {
            return self.write_request_ref(code);
        }
        if self.request_codes.len() == REQUEST_CODE_COUNT {
            if !self.codes_exhausted {
                warn!("all {REQUEST_CODE_COUNT} request codes taken, writing new names as text");
                self.codes_exhausted = true;
            }
            self.w.write_all(name.as_bytes())?;
            self.w.write_all(b" ")?;
            return Ok(());
        }

        let code = self.request_codes.len() as u8;
        debug!("request {name:?} encoded as {code}");
        self.request_codes.insert(name.to_string(), code);
        self.write_opcode(Opcode::DefineRequest)?;
        self.w.write_all(&[code])?;
        self.print_string(name)?;
        self.write_request_ref(code)
    }

    fn end_request(&mut self) -> Result<()> {
        Ok(())
    }

    fn whitespace(&mut self) -> Result<()> {
        Ok(())
    }

    fn increase_indent(&mut self) {}

    fn decrease_indent(&mut self) {}

    /// Negative integers take all four bytes, as two's complement.
    fn print_int(&mut self, i: i32) -> Result<()> {
        if i < 0 {
            self.write_opcode(Opcode::Uint { width: 4 })?;
            self.w.write_all(&i.to_be_bytes())?;
            return Ok(());
        }
        self.write_uint(i as u32)
    }

    fn print_float(&mut self, f: f32) -> Result<()> {
        self.write_opcode(Opcode::Float32)?;
        self.w.write_all(&pack_f32(f))?;
        Ok(())
    }

    fn print_string(&mut self, s: &str) -> Result<()> {
        let bytes = s.as_bytes();
        if bytes.len() < SHORT_STRING_LIMIT {
            self.write_opcode(Opcode::ShortString { len: bytes.len() })?;
        } else {
            let len = wire_length(bytes.len())?;
            self.write_opcode(Opcode::LongString {
                len_width: len.width(),
            })?;
            self.w.write_all(&len)?;
        }
        self.w.write_all(bytes)?;
        Ok(())
    }

    fn print_int_array(&mut self, ints: &[i32]) -> Result<()> {
        self.w.write_all(b"[")?;
        for int in ints {
            self.print_int(*int)?;
        }
        self.w.write_all(b"]")?;
        Ok(())
    }

    fn print_float_array(&mut self, floats: &[f32]) -> Result<()> {
        let len = wire_length(floats.len())?;
        self.write_opcode(Opcode::FloatArray {
            len_width: len.width(),
        })?;
        self.w.write_all(&len)?;
        for f in floats {
            self.w.write_all(&pack_f32(*f))?;
        }
        Ok(())
    }

    fn print_string_array(&mut self, strs: &[String]) -> Result<()> {
        self.w.write_all(b"[")?;
        for s in strs {
            self.print_string(s)?;
        }
        self.w.write_all(b"]")?;
        Ok(())
    }

    fn archive_record(&mut self, kind: ArchiveRecordKind, text: &str) -> Result<()> {
        write_archive_record(&mut self.w, kind, text)
    }

    fn flush(&mut self) -> Result<()> {
        self.w.flush()?;
        Ok(())
    }
}

fn wire_length(len: usize) -> Result<MinimalUint> {
    let len = u32::try_from(len).with_context(|| format!("length {len} does not fit the wire"))?;
    Ok(MinimalUint::new(len))
}
