use anyhow::Result;
use rand::distributions::{Alphanumeric, DistString};
use rand::prelude::*;
use rib_reader::{Token, Tokenizer};
use rib_writer::{Encoder, Value, WriterOptions};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::rc::Rc;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn options(setup: &[(&str, &str)]) -> Result<WriterOptions> {
    let mut options = WriterOptions::default();
    for (key, value) in setup {
        options.set(key, value)?;
    }
    Ok(options)
}

/// Bytes written by an encoder built from `options`. The encoder is dropped before returning.
pub fn encode<F>(options: &WriterOptions, f: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut dyn Encoder) -> Result<()>,
{
    let mut buf = vec![];
    {
        let mut enc = rib_writer::new_encoder(&mut buf, options)?;
        f(enc.as_mut())?;
        enc.flush()?;
    }
    Ok(buf)
}

/// All tokens of `bytes`, up to the end of file.
pub fn decode(bytes: &[u8]) -> Result<Vec<Token>> {
    let mut tz = Tokenizer::new();
    tz.push_input(bytes, "decode")?;
    Ok(tz.collect())
}

/// A request as a serializer would emit it.
pub struct Request {
    pub name: String,
    pub args: Vec<Value>,
}

impl Request {
    pub fn new(name: &str, args: Vec<Value>) -> Self {
        Self {
            name: name.to_string(),
            args,
        }
    }

    pub fn emit(&self, enc: &mut dyn Encoder) -> Result<()> {
        enc.begin_request(&self.name)?;
        for arg in &self.args {
            enc.whitespace()?;
            enc.print(arg)?;
        }
        enc.end_request()
    }

    /// The tokens this request decodes to.
    pub fn tokens(&self) -> Vec<Token> {
        let mut toks = vec![Token::request(self.name.as_str())];
        for arg in &self.args {
            value_tokens(arg, &mut toks);
        }
        toks
    }
}

pub fn all_tokens(reqs: &[Request]) -> Vec<Token> {
    reqs.iter().flat_map(Request::tokens).collect()
}

/// A small animation frame, numbered `n`.
pub fn frame(n: i32) -> Vec<Request> {
    vec![
        Request::new("FrameBegin", vec![n.into()]),
        Request::new(
            "Translate",
            vec![0.0f32.into(), 0.0f32.into(), (n as f32).into()],
        ),
        Request::new(
            "Sphere",
            vec![1.0f32.into(), (-1.0f32).into(), 1.0f32.into(), 360.0f32.into()],
        ),
        Request::new("FrameEnd", vec![]),
    ]
}

pub fn value_tokens(val: &Value, toks: &mut Vec<Token>) {
    match val {
        Value::Int(i) => toks.push(Token::Int(*i)),
        Value::Float(f) => toks.push(Token::Float(*f)),
        Value::Str(s) => toks.push(Token::string(s.as_str())),
        Value::IntArray(ints) => {
            toks.push(Token::ArrayBegin);
            toks.extend(ints.iter().map(|i| Token::Int(*i)));
            toks.push(Token::ArrayEnd);
        }
        Value::FloatArray(floats) => {
            toks.push(Token::ArrayBegin);
            toks.extend(floats.iter().map(|f| Token::Float(*f)));
            toks.push(Token::ArrayEnd);
        }
        Value::StrArray(strs) => {
            toks.push(Token::ArrayBegin);
            toks.extend(strs.iter().map(|s| Token::string(s.as_str())));
            toks.push(Token::ArrayEnd);
        }
    }
}

pub mod gen {
    use super::*;

    pub fn int(rng: &mut impl Rng) -> i32 {
        match rng.gen_range(0..4) {
            0 => rng.gen_range(-16..16),
            1 => rng.gen_range(0..0x1_0000),
            _ => rng.gen(),
        }
    }

    /// Any bit pattern, or only finite ones.
    pub fn float(rng: &mut impl Rng, finite_only: bool) -> f32 {
        loop {
            let f = f32::from_bits(rng.gen());
            if !finite_only || f.is_finite() {
                return f;
            }
        }
    }

    /// Short and long, with quotes, escapes, control bytes and non-ASCII text mixed in.
    pub fn string(rng: &mut impl Rng) -> String {
        let len = *[0, 1, 15, 16, 17, 300].choose(rng).unwrap_or(&0);
        let mut s = Alphanumeric.sample_string(rng, len);
        for _ in 0..rng.gen_range(0..3) {
            let special = *["\"", "\\", "\n", "\r\n", "\t", "\u{1}", "\u{7f}", "é", "∂P/∂u", "#", "[]"]
                .choose(rng)
                .unwrap_or(&"");
            let at = rng.gen_range(0..=s.len());
            if s.is_char_boundary(at) {
                s.insert_str(at, special);
            }
        }
        s
    }

    pub fn value(rng: &mut impl Rng, finite_only: bool) -> Value {
        let len = rng.gen_range(0..8);
        match rng.gen_range(0..6) {
            0 => Value::Int(int(rng)),
            1 => Value::Float(float(rng, finite_only)),
            2 => Value::Str(string(rng)),
            3 => Value::IntArray((0..len).map(|_| int(rng)).collect()),
            4 => Value::FloatArray((0..len).map(|_| float(rng, finite_only)).collect()),
            _ => Value::StrArray((0..len).map(|_| string(rng)).collect()),
        }
    }
}

/// One end of a generator's pipe. Each frame ends with the end-of-stream byte,
/// after which the reader must not read again until the next frame is sent.
#[derive(Clone, Default)]
pub struct Pipe {
    frames: Rc<RefCell<VecDeque<Vec<u8>>>>,
    open: Rc<RefCell<Vec<u8>>>,
}

impl Pipe {
    pub fn is_idle(&self) -> bool {
        self.frames.borrow().is_empty()
    }

    pub fn end_frame(&self) {
        let mut frame = self.open.take();
        frame.push(0xFF);
        self.frames.borrow_mut().push_back(frame);
    }
}

impl Write for Pipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.open.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for Pipe {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut frames = self.frames.borrow_mut();
        let Some(frame) = frames.front_mut() else {
            panic!("read from an idle pipe");
        };
        let n = buf.len().min(frame.len());
        buf[..n].copy_from_slice(&frame[..n]);
        frame.drain(..n);
        if frame.is_empty() {
            frames.pop_front();
        }
        Ok(n)
    }
}
