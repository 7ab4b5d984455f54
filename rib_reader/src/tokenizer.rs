use crate::dictionary::Dictionaries;
use crate::input_context::{CommentCallback, InputContext};
use crate::source_buffer::SourceBuffer;
use anyhow::Result;
use log::{debug, warn};
use rib_types::token::Token;
use std::io::Read;

mod ascii;
mod binary;
mod scanner;

use scanner::Scanner;

static NULL_INPUT_TOKEN: Token = Token::Eof;

/// What [`Tokenizer::push_input`] sets aside, and [`Tokenizer::pop_input`] brings back.
struct SavedInput<'a> {
    ctx: Option<InputContext<'a>>,
    array_left: i64,
}

/// Turns a stack of RIB streams into [`Token`]s, with one token of lookahead.
///
/// Input is redirected by pushing a new stream (an included archive, a referenced file,
/// a generator's pipe) and resumed exactly where it left off by popping it.
/// With nothing pushed, or after the last pop, every read yields [`Token::Eof`].
///
/// Streams are taken by value. To keep ownership of a stream, push `&mut stream`;
/// popping drops only the borrow.
///
/// The dictionary tables for binary coding belong to the tokenizer, not to the pushed streams.
pub struct Tokenizer<'a> {
    ctx: Option<InputContext<'a>>,
    saved: Vec<SavedInput<'a>>,
    dicts: Dictionaries,
    /// Floats still to come in the binary array being decoded, or -1.
    array_left: i64,
}

impl<'a> Default for Tokenizer<'a> {
    fn default() -> Self {
        Self::with_dictionaries(Dictionaries::default())
    }
}

impl<'a> Tokenizer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dictionaries(dicts: Dictionaries) -> Self {
        Self {
            ctx: None,
            saved: vec![],
            dicts,
            array_left: -1,
        }
    }

    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dicts
    }

    /// Count of inputs pushed and not yet popped.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push_input<R: Read + 'a>(&mut self, stream: R, name: &str) -> Result<()> {
        self.push_context(stream, name, None)
    }

    pub fn push_input_with_comments<R, F>(&mut self, stream: R, name: &str, comment_cb: F) -> Result<()>
    where
        R: Read + 'a,
        F: FnMut(&str) + 'a,
    {
        self.push_context(stream, name, Some(Box::new(comment_cb)))
    }

    fn push_context<R: Read + 'a>(
        &mut self,
        stream: R,
        name: &str,
        comment_cb: Option<CommentCallback<'a>>,
    ) -> Result<()> {
        let source = SourceBuffer::new(stream, name)?;
        let prev = self.ctx.replace(InputContext::new(source, comment_cb));
        self.saved.push(SavedInput {
            ctx: prev,
            array_left: self.array_left,
        });
        self.array_left = -1;
        debug!("pushed input {name} at depth {}", self.saved.len());
        Ok(())
    }

    pub fn pop_input(&mut self) {
        match self.saved.pop() {
            Some(SavedInput { ctx, array_left }) => {
                if let Some(popped) = &self.ctx {
                    debug!("popped input {}", popped.source.name());
                }
                self.ctx = ctx;
                self.array_left = array_left;
            }
            None => {
                warn!("pop_input with no input pushed");
                self.ctx = None;
                self.array_left = -1;
            }
        }
    }

    pub fn get(&mut self) -> Token {
        let Some(ctx) = self.ctx.as_mut() else {
            return Token::Eof;
        };
        if ctx.have_next {
            ctx.have_next = false;
            ctx.last_pos = ctx.next_pos;
            if let Some(tok) = &ctx.tok {
                return tok.clone();
            }
        }
        let (tok, pos) = Scanner::new(ctx, &mut self.dicts, &mut self.array_left).scan();
        ctx.last_pos = pos;
        ctx.next_pos = pos;
        ctx.tok = Some(tok.clone());
        tok
    }

    /// The token the next [`Self::get`] will return.
    pub fn peek(&mut self) -> &Token {
        let Some(ctx) = self.ctx.as_mut() else {
            return &NULL_INPUT_TOKEN;
        };
        if !ctx.have_next || ctx.tok.is_none() {
            let (tok, pos) = Scanner::new(ctx, &mut self.dicts, &mut self.array_left).scan();
            ctx.next_pos = pos;
            ctx.tok = Some(tok);
            ctx.have_next = true;
        }
        ctx.tok.as_ref().unwrap_or(&NULL_INPUT_TOKEN)
    }

    /// Makes the token most recently returned by [`Self::get`] the next one again.
    ///
    /// There is a single slot: after a [`Self::peek`], or a previous `unget()`,
    /// this does nothing.
    pub fn unget(&mut self) {
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        if ctx.have_next || ctx.tok.is_none() {
            warn!("{}: unget with the lookahead slot taken", ctx.stream_pos());
            return;
        }
        ctx.have_next = true;
        ctx.next_pos = ctx.last_pos;
    }

    /// `"<name>:<line> (col <col>)"` of the token most recently returned.
    pub fn stream_pos(&self) -> String {
        match &self.ctx {
            Some(ctx) => ctx.stream_pos(),
            None => String::from("null:0 (col 0)"),
        }
    }
}

/// Yields tokens up to, not including, the end of file.
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match self.get() {
            Token::Eof => None,
            tok => Some(tok),
        }
    }
}
