use crate::dictionary::{RequestCode, StringCode};
use crate::source_buffer::END_OF_STREAM;
use crate::tokenizer::scanner::{into_string, is_whitespace, ScanResult, Scanner};
use log::trace;
use rib_types::token::Token;
use rib_types::wire::{decode_uint, unpack_f32, unpack_f64, Opcode};

/* The binary grammar: the payloads that follow each opcode. */
impl<'s, 'a> Scanner<'s, 'a> {
    fn read_byte(&mut self) -> ScanResult<u8> {
        let byte = self.src().get();
        if byte == END_OF_STREAM && self.exhausted() {
            return Err(String::from("end of stream inside a binary record"));
        }
        Ok(byte)
    }

    pub(super) fn read_array<const N: usize>(&mut self) -> ScanResult<[u8; N]> {
        let mut buf = [0u8; N];
        for byte in buf.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(buf)
    }

    pub(super) fn read_uint(&mut self, width: usize) -> ScanResult<u32> {
        let mut buf = [0u8; 4];
        for byte in buf[..width].iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(decode_uint(&buf[..width]))
    }

    pub(super) fn read_counted_string(&mut self, len: usize) -> ScanResult<String> {
        // The length comes off the wire; let the string grow rather than trusting it.
        let mut bytes = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            bytes.push(self.read_byte()?);
        }
        Ok(into_string(bytes))
    }

    pub(super) fn scan_fixed_point(&mut self, width: usize, radix: u32) -> ScanResult<Token> {
        let val = self.read_uint(width)?;
        let scale = f64::from(1u32 << (8 * radix));
        Ok(Token::Float((f64::from(val) / scale) as f32))
    }

    pub(super) fn scan_float64(&mut self) -> ScanResult<Token> {
        let val = unpack_f64(self.read_array()?);
        Ok(Token::Float(val as f32))
    }

    pub(super) fn scan_array_header(&mut self, len_width: usize) -> ScanResult<Token> {
        let len = self.read_uint(len_width)?;
        *self.array_left = i64::from(len);
        Ok(Token::ArrayBegin)
    }

    /// Floats of a binary array come out one per scan, then the closing [`Token::ArrayEnd`].
    pub(super) fn scan_array_member(&mut self) -> ScanResult<Token> {
        *self.array_left -= 1;
        if *self.array_left < 0 {
            self.start = self.src().pos();
            return Ok(Token::ArrayEnd);
        }
        match self.read_array() {
            Ok(buf) => {
                self.start = self.src().pos();
                Ok(Token::Float(unpack_f32(buf)))
            }
            Err(e) => {
                *self.array_left = -1;
                Err(e)
            }
        }
    }

    pub(super) fn scan_request_ref(&mut self) -> ScanResult<Token> {
        let code = RequestCode::from(self.read_byte()?);
        match self.dicts.request(code) {
            Some(name) => Ok(Token::Request(name.to_string())),
            None => Err(format!("undefined encoded request {code}")),
        }
    }

    pub(super) fn scan_string_ref(&mut self, code_width: usize) -> ScanResult<Token> {
        let code = StringCode::from(self.read_uint(code_width)?);
        match self.dicts.string(code) {
            Some(literal) => Ok(Token::Str(literal.to_string())),
            None => Err(format!("undefined encoded string {code}")),
        }
    }

    pub(super) fn define_request(&mut self) -> ScanResult<()> {
        let code = RequestCode::from(self.read_byte()?);
        let name = self.read_definition_payload()?;
        trace!("{}: define request {code}", self.ctx.stream_pos());
        self.dicts.define_request(code, name);
        Ok(())
    }

    pub(super) fn define_string(&mut self, code_width: usize) -> ScanResult<()> {
        let code = StringCode::from(self.read_uint(code_width)?);
        let literal = self.read_definition_payload()?;
        trace!("{}: define string {code}", self.ctx.stream_pos());
        self.dicts.define_string(code, literal);
        Ok(())
    }

    /// A definition is followed by its string, in either grammar.
    fn read_definition_payload(&mut self) -> ScanResult<String> {
        loop {
            let byte = self.read_byte()?;
            match Opcode::classify(byte) {
                Opcode::ShortString { len } => return self.read_counted_string(len),
                Opcode::LongString { len_width } => {
                    let len = self.read_uint(len_width)? as usize;
                    return self.read_counted_string(len);
                }
                Opcode::Ascii(b'"') => return self.scan_string(),
                Opcode::Ascii(byte) if is_whitespace(byte) => continue,
                _ => {
                    self.src().unget();
                    return Err(format!(
                        "definition record must be followed by a string, not {byte:#04x}"
                    ));
                }
            }
        }
    }
}
