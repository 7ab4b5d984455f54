use crate::dictionary::Dictionaries;
use crate::input_context::InputContext;
use crate::source_buffer::SourceBuffer;
use rib_types::pos::SourcePos;
use rib_types::token::Token;
use rib_types::wire::{unpack_f32, Opcode};

/// A scan failure. Becomes a [`Token::Error`] carrying this message.
pub(super) type ScanResult<T> = Result<T, String>;

/// Produces one raw token from the current input.
pub(super) struct Scanner<'s, 'a> {
    pub(super) ctx: &'s mut InputContext<'a>,
    pub(super) dicts: &'s mut Dictionaries,
    pub(super) array_left: &'s mut i64,
    pub(super) start: SourcePos,
}

impl<'s, 'a> Scanner<'s, 'a> {
    pub(super) fn new(
        ctx: &'s mut InputContext<'a>,
        dicts: &'s mut Dictionaries,
        array_left: &'s mut i64,
    ) -> Self {
        let start = ctx.source.pos();
        Self {
            ctx,
            dicts,
            array_left,
            start,
        }
    }

    /// The token, and where it started.
    pub(super) fn scan(mut self) -> (Token, SourcePos) {
        if self.ctx.at_eof {
            return (Token::Eof, self.start);
        }
        let tok = self.scan_token().unwrap_or_else(Token::Error);
        if tok.is_eof() {
            self.ctx.at_eof = true;
        }
        (tok, self.start)
    }

    pub(super) fn src(&mut self) -> &mut SourceBuffer<'a> {
        &mut self.ctx.source
    }

    pub(super) fn exhausted(&self) -> bool {
        self.ctx.source.is_exhausted()
    }

    fn scan_token(&mut self) -> ScanResult<Token> {
        if *self.array_left >= 0 {
            return self.scan_array_member();
        }

        loop {
            let byte = self.src().get();
            self.start = self.src().pos();
            match Opcode::classify(byte) {
                Opcode::Ascii(byte) => {
                    if let Some(tok) = self.scan_ascii(byte)? {
                        return Ok(tok);
                    }
                }
                Opcode::EndOfStream => return Ok(Token::Eof),
                Opcode::Uint { width } => return Ok(Token::Int(self.read_uint(width)? as i32)),
                Opcode::FixedPoint { width, radix } => {
                    return self.scan_fixed_point(width, radix);
                }
                Opcode::ShortString { len } => return self.read_counted_string(len).map(Token::Str),
                Opcode::LongString { len_width } => {
                    let len = self.read_uint(len_width)? as usize;
                    return self.read_counted_string(len).map(Token::Str);
                }
                Opcode::Float32 => return Ok(Token::Float(unpack_f32(self.read_array()?))),
                Opcode::Float64 => return self.scan_float64(),
                Opcode::RequestRef => return self.scan_request_ref(),
                Opcode::FloatArray { len_width } => return self.scan_array_header(len_width),
                Opcode::DefineRequest => self.define_request()?,
                Opcode::DefineString { code_width } => self.define_string(code_width)?,
                Opcode::StringRef { code_width } => return self.scan_string_ref(code_width),
                Opcode::Reserved(byte) => return Err(format!("reserved binary opcode {byte:#04x}")),
            }
        }
    }
}

pub(super) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Strings on the wire are bytes; anything that is not UTF-8 is replaced lossily.
pub(super) fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
