use crate::source_buffer::END_OF_STREAM;
use crate::tokenizer::scanner::{into_string, is_whitespace, ScanResult, Scanner};
use rib_types::token::Token;

/* The ASCII grammar: comments, quoted strings, numerals, brackets and bare request names. */
impl<'s, 'a> Scanner<'s, 'a> {
    /// `None` for input that yields no token (whitespace, comments).
    pub(super) fn scan_ascii(&mut self, byte: u8) -> ScanResult<Option<Token>> {
        match byte {
            b'#' => {
                self.scan_comment();
                Ok(None)
            }
            b'"' => self.scan_string().map(|s| Some(Token::Str(s))),
            b'[' => Ok(Some(Token::ArrayBegin)),
            b']' => Ok(Some(Token::ArrayEnd)),
            b'0'..=b'9' | b'+' | b'-' | b'.' => {
                self.src().unget();
                self.scan_number().map(Some)
            }
            _ if is_whitespace(byte) => Ok(None),
            _ => {
                self.src().unget();
                Ok(Some(self.scan_request_name()))
            }
        }
    }

    fn scan_comment(&mut self) {
        let mut text = vec![];
        loop {
            match self.src().get() {
                b'\n' | b'\r' => break,
                END_OF_STREAM => {
                    // A literal 0xFF still ends the stream, after the comment.
                    self.src().unget();
                    break;
                }
                byte => text.push(byte),
            }
        }
        if let Some(comment_cb) = self.ctx.comment_cb.as_mut() {
            comment_cb(&into_string(text));
        }
    }

    fn scan_request_name(&mut self) -> Token {
        let mut name = vec![];
        loop {
            let byte = self.src().get();
            let is_delim = is_whitespace(byte) || matches!(byte, b'#' | b'"' | b'[' | b']');
            if is_delim || byte >= 0x80 {
                self.src().unget();
                break;
            }
            name.push(byte);
        }
        Token::Request(into_string(name))
    }

    /// The integer value is accumulated as digits arrive. The float value is converted from
    /// the whole numeral at the end, which rounds correctly.
    fn scan_number(&mut self) -> ScanResult<Token> {
        let mut text = String::new();
        let mut int = 0i32;
        let mut digits = 0;
        let mut is_float = false;

        let mut byte = self.src().get();
        let is_negative = byte == b'-';
        if byte == b'-' || byte == b'+' {
            text.push(byte as char);
            byte = self.src().get();
        }
        while byte.is_ascii_digit() {
            int = int.wrapping_mul(10).wrapping_add(i32::from(byte - b'0'));
            digits += 1;
            text.push(byte as char);
            byte = self.src().get();
        }
        if byte == b'.' {
            is_float = true;
            text.push('.');
            byte = self.src().get();
            while byte.is_ascii_digit() {
                digits += 1;
                text.push(byte as char);
                byte = self.src().get();
            }
        }
        if digits == 0 {
            self.src().unget();
            return Err(format!("number {text:?} has no digits"));
        }
        if byte == b'e' || byte == b'E' {
            is_float = true;
            text.push('e');
            byte = self.src().get();
            if byte == b'-' || byte == b'+' {
                text.push(byte as char);
                byte = self.src().get();
            }
            let mut exp_digits = 0;
            while byte.is_ascii_digit() {
                exp_digits += 1;
                text.push(byte as char);
                byte = self.src().get();
            }
            if exp_digits == 0 {
                self.src().unget();
                return Err(format!("exponent of {text:?} has no digits"));
            }
        }
        self.src().unget();

        if is_float {
            text.parse::<f32>()
                .map(Token::Float)
                .map_err(|e| format!("number {text:?}: {e}"))
        } else if is_negative {
            Ok(Token::Int(int.wrapping_neg()))
        } else {
            Ok(Token::Int(int))
        }
    }

    /// Called after the opening quote. Also used for the payload of definition records.
    pub(super) fn scan_string(&mut self) -> ScanResult<String> {
        let mut bytes = vec![];
        loop {
            let byte = self.src().get();
            match byte {
                b'"' => break,
                b'\\' => self.scan_escape(&mut bytes)?,
                b'\r' => {
                    bytes.push(b'\n');
                    self.skip_line_feed();
                }
                END_OF_STREAM if self.exhausted() => {
                    return Err(String::from("end of stream inside a string"));
                }
                _ => bytes.push(byte),
            }
        }
        Ok(into_string(bytes))
    }

    fn scan_escape(&mut self, bytes: &mut Vec<u8>) -> ScanResult<()> {
        let byte = self.src().get();
        let unescaped = match byte {
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'b' => 0x08,
            b'f' => 0x0C,
            b'\\' | b'"' => byte,
            b'\n' => return Ok(()),
            b'\r' => {
                self.skip_line_feed();
                return Ok(());
            }
            b'0'..=b'7' => {
                let mut val = u32::from(byte - b'0');
                for _ in 0..2 {
                    let digit = self.src().get();
                    if !(b'0'..=b'7').contains(&digit) {
                        self.src().unget();
                        break;
                    }
                    val = val * 8 + u32::from(digit - b'0');
                }
                val as u8
            }
            END_OF_STREAM if self.exhausted() => {
                return Err(String::from("end of stream inside a string"));
            }
            _ => byte,
        };
        bytes.push(unescaped);
        Ok(())
    }

    /// Completes a `\r\n` whose `\r` was just consumed.
    fn skip_line_feed(&mut self) {
        if self.src().get() != b'\n' {
            self.src().unget();
        }
    }
}
