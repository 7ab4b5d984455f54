use crate::token::Token;
use derive_more::Display;

#[derive(Display, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub enum TokenKind {
    #[display(fmt = "array begin")]
    ArrayBegin,
    #[display(fmt = "array end")]
    ArrayEnd,
    #[display(fmt = "string")]
    String,
    #[display(fmt = "integer")]
    Integer,
    #[display(fmt = "float")]
    Float,
    #[display(fmt = "request")]
    Request,
    #[display(fmt = "error")]
    Error,
    #[display(fmt = "end of file")]
    EndOfFile,
}

impl From<&Token> for TokenKind {
    fn from(tok: &Token) -> Self {
        match tok {
            Token::ArrayBegin => TokenKind::ArrayBegin,
            Token::ArrayEnd => TokenKind::ArrayEnd,
            Token::Str(_) => TokenKind::String,
            Token::Int(_) => TokenKind::Integer,
            Token::Float(_) => TokenKind::Float,
            Token::Request(_) => TokenKind::Request,
            Token::Error(_) => TokenKind::Error,
            Token::Eof => TokenKind::EndOfFile,
        }
    }
}
