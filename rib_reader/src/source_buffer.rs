use anyhow::{Context, Result};
use log::{debug, trace, warn};
use rib_types::pos::SourcePos;
use rib_types::wire::GZIP_MAGIC;
use std::io::{self, Cursor, ErrorKind, Read};
use std::thread;


/// Returned by [`SourceBuffer::get`] once the stream is exhausted.
pub const END_OF_STREAM: u8 = 0xFF;

const DEFAULT_CAPACITY: usize = 4096;

/// Bytes kept in front of each refill, so that [`SourceBuffer::unget`]
/// and `\r\n` detection work across refills.
const LOOKBEHIND: usize = 2;

/// Position bookkeeping as of just before the most recent `get()`.
#[derive(Clone, Copy)]
struct PosState {
    pos: SourcePos,
    next: SourcePos,
    last: Option<u8>,
}

/// A byte source over any [`Read`], with one byte of pushback and line/column tracking.
///
/// Gzip framing is detected from the first two bytes and undone transparently.
/// The second byte is only read when the first one can start a gzip header.
///
/// Refills ask the stream for as many bytes as are available. When that yields nothing
/// (a non-blocking stream reporting [`ErrorKind::WouldBlock`]), exactly one single-byte read is
/// attempted instead, which keeps a slow pipe moving without spinning on bulk reads.
pub struct SourceBuffer<'a> {
    name: String,
    stream: Box<dyn Read + 'a>,

    buf: Box<[u8]>,
    cur: usize,
    end: usize,
    exhausted: bool,
    /// The most recent `get()` returned [`END_OF_STREAM`] because of exhaustion.
    at_sentinel: bool,

    state: PosState,
    undo: Option<PosState>,
}

/// Reads at most one byte into `byte`, returning 0 at end of stream.
fn probe_byte<R: Read>(stream: &mut R, byte: &mut [u8], name: &str) -> Result<usize> {
    loop {
        match stream.read(byte) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == ErrorKind::WouldBlock => thread::yield_now(),
            Err(e) => return Err(e).with_context(|| format!("probe {name:?}")),
        }
    }
}

impl<'a> SourceBuffer<'a> {
    pub fn new<R: Read + 'a>(stream: R, name: &str) -> Result<Self> {
        Self::with_capacity(stream, name, DEFAULT_CAPACITY)
    }

    pub fn with_capacity<R: Read + 'a>(mut stream: R, name: &str, capacity: usize) -> Result<Self> {
        let mut magic = [0u8; 2];
        let mut probed = probe_byte(&mut stream, &mut magic[..1], name)?;
        if probed == 1 && magic[0] == GZIP_MAGIC[0] {
            probed += probe_byte(&mut stream, &mut magic[1..], name)?;
        }

        let head = Cursor::new(magic).take(probed as u64);
        let stream: Box<dyn Read + 'a> = if magic[..probed] == GZIP_MAGIC {
            debug!("{name}: gzip framing detected");
            Self::gunzip(head.chain(stream), name)?
        } else {
            Box::new(head.chain(stream))
        };

        Ok(Self {
            name: name.to_string(),
            stream,
            buf: vec![0u8; capacity.max(LOOKBEHIND + 1)].into_boxed_slice(),
            cur: 0,
            end: 0,
            exhausted: false,
            at_sentinel: false,
            state: PosState {
                pos: SourcePos::start(),
                next: SourcePos::start(),
                last: None,
            },
            undo: None,
        })
    }

    #[cfg(feature = "gzip")]
    fn gunzip<R: Read + 'a>(stream: R, _name: &str) -> Result<Box<dyn Read + 'a>> {
        Ok(Box::new(flate2::read::MultiGzDecoder::new(stream)))
    }

    #[cfg(not(feature = "gzip"))]
    fn gunzip<R: Read + 'a>(_stream: R, name: &str) -> Result<Box<dyn Read + 'a>> {
        Err(anyhow::anyhow!(
            "{name} is gzip compressed, but gzip support was not built in"
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The position of the byte most recently returned by [`Self::get`].
    pub fn pos(&self) -> SourcePos {
        self.state.pos
    }

    /// Whether the most recent [`Self::get`] hit the end of the stream,
    /// as opposed to returning a literal `0xFF` byte.
    pub fn is_exhausted(&self) -> bool {
        self.at_sentinel
    }

    pub fn get(&mut self) -> u8 {
        if self.cur == self.end && !self.refill() {
            self.at_sentinel = true;
            self.undo = None;
            return END_OF_STREAM;
        }
        self.at_sentinel = false;

        let byte = self.buf[self.cur];
        self.cur += 1;

        self.undo = Some(self.state);
        let PosState { pos, next, last } = self.state;
        let pos = if last == Some(b'\r') && byte == b'\n' {
            pos.next_col()
        } else {
            next
        };
        let next = match byte {
            b'\n' | b'\r' => pos.next_line(),
            _ => pos.next_col(),
        };
        self.state = PosState {
            pos,
            next,
            last: Some(byte),
        };

        byte
    }

    /// Pushes back the byte most recently returned by [`Self::get`].
    ///
    /// Only one level is supported; a second `unget()` in a row is ignored,
    /// as is ungetting the end-of-stream sentinel.
    pub fn unget(&mut self) {
        if let Some(state) = self.undo.take() {
            self.cur -= 1;
            self.state = state;
        }
    }

    fn refill(&mut self) -> bool {
        if self.exhausted {
            return false;
        }

        let keep = LOOKBEHIND.min(self.end);
        self.buf.copy_within(self.end - keep..self.end, 0);
        self.cur = keep;
        self.end = keep;

        let n = match self.stream.read(&mut self.buf[keep..]) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted || e.kind() == ErrorKind::WouldBlock => {
                0
            }
            Err(e) => return self.fail(e),
        };
        if n > 0 {
            trace!("{}: buffered {n} bytes", self.name);
            self.end += n;
            return true;
        }

        loop {
            match self.stream.read(&mut self.buf[keep..keep + 1]) {
                Ok(0) => {
                    debug!("{}: end of stream", self.name);
                    self.exhausted = true;
                    return false;
                }
                Ok(_) => {
                    self.end += 1;
                    return true;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::yield_now(),
                Err(e) => return self.fail(e),
            }
        }
    }

    fn fail(&mut self, e: io::Error) -> bool {
        warn!("{}: read failed, treating as end of stream: {e}", self.name);
        self.exhausted = true;
        false
    }
}
