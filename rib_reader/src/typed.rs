//! Typed reads for a request dispatcher: each pulls one value of an expected shape.
//!
//! On a mismatch the offending token is pushed back, so the caller can resynchronise on it.
//! An error token is consumed, and its message is reported.

use crate::tokenizer::Tokenizer;
use anyhow::{anyhow, Error, Result};
use rib_types::token::{Token, TokenKind};


impl<'a> Tokenizer<'a> {
    pub fn get_int(&mut self) -> Result<i32> {
        match self.get() {
            Token::Int(i) => Ok(i),
            tok => Err(self.mismatch(TokenKind::Integer, tok)),
        }
    }

    /// Integers are accepted and converted.
    pub fn get_float(&mut self) -> Result<f32> {
        match self.get() {
            Token::Float(f) => Ok(f),
            Token::Int(i) => Ok(i as f32),
            tok => Err(self.mismatch(TokenKind::Float, tok)),
        }
    }

    pub fn get_string(&mut self) -> Result<String> {
        match self.get() {
            Token::Str(s) => Ok(s),
            tok => Err(self.mismatch(TokenKind::String, tok)),
        }
    }

    pub fn get_request(&mut self) -> Result<String> {
        match self.get() {
            Token::Request(name) => Ok(name),
            tok => Err(self.mismatch(TokenKind::Request, tok)),
        }
    }

    pub fn get_int_array(&mut self) -> Result<Vec<i32>> {
        self.get_array(TokenKind::Integer, |tok| match tok {
            Token::Int(i) => Ok(i),
            tok => Err(tok),
        })
    }

    /// Integer members are accepted and converted.
    pub fn get_float_array(&mut self) -> Result<Vec<f32>> {
        self.get_array(TokenKind::Float, |tok| match tok {
            Token::Float(f) => Ok(f),
            Token::Int(i) => Ok(i as f32),
            tok => Err(tok),
        })
    }

    pub fn get_string_array(&mut self) -> Result<Vec<String>> {
        self.get_array(TokenKind::String, |tok| match tok {
            Token::Str(s) => Ok(s),
            tok => Err(tok),
        })
    }

    fn get_array<T, F>(&mut self, member_kind: TokenKind, member: F) -> Result<Vec<T>>
    where
        F: Fn(Token) -> Result<T, Token>,
    {
        match self.get() {
            Token::ArrayBegin => {}
            tok => return Err(self.mismatch(TokenKind::ArrayBegin, tok)),
        }
        let mut members = vec![];
        loop {
            match self.get() {
                Token::ArrayEnd => return Ok(members),
                tok => match member(tok) {
                    Ok(m) => members.push(m),
                    Err(tok) => return Err(self.mismatch(member_kind, tok)),
                },
            }
        }
    }

    fn mismatch(&mut self, expected: TokenKind, tok: Token) -> Error {
        let err = match &tok {
            Token::Error(msg) => anyhow!("{}: {msg}", self.stream_pos()),
            _ => anyhow!(
                "{}: expected {expected}, found {} {tok}",
                self.stream_pos(),
                tok.kind()
            ),
        };
        if !matches!(tok, Token::Error(_)) {
            self.unget();
        }
        err
    }
}
