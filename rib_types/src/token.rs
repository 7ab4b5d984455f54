use std::fmt;

mod kind;
pub use kind::*;

/// One decoded unit of a RIB stream.
///
/// Each variant carries at most one payload, and the payload type is fixed by the variant.
/// Scan failures are tokens too ([`Token::Error`]), so that a reader can keep going after one.
#[derive(Clone, Debug)]
pub enum Token {
    ArrayBegin,
    ArrayEnd,
    Str(String),
    Int(i32),
    Float(f32),
    Request(String),
    Error(String),
    Eof,
}

impl Token {
    pub fn string<S: Into<String>>(s: S) -> Self {
        Self::Str(s.into())
    }

    pub fn request<S: Into<String>>(name: S) -> Self {
        Self::Request(name.into())
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Self::Error(message.into())
    }

    pub fn kind(&self) -> TokenKind {
        TokenKind::from(self)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The text payload of [`Token::Str`], [`Token::Request`] and [`Token::Error`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Request(s) | Self::Error(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

impl From<i32> for Token {
    fn from(i: i32) -> Self {
        Self::Int(i)
    }
}
impl From<f32> for Token {
    fn from(f: f32) -> Self {
        Self::Float(f)
    }
}

/* Equality is by kind, then by payload. All NaNs are equal to each other. */
impl PartialEq for Token {
    fn eq(&self, other: &Token) -> bool {
        match (self, other) {
            (Self::Int(slf), Self::Int(oth)) => slf == oth,
            (Self::Float(slf), Self::Float(oth)) => {
                slf == oth || (slf.is_nan() && oth.is_nan())
            }
            (Self::Str(slf), Self::Str(oth))
            | (Self::Request(slf), Self::Request(oth))
            | (Self::Error(slf), Self::Error(oth)) => slf == oth,
            _ => self.kind() == other.kind() && self.as_str().is_none(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArrayBegin => write!(f, "["),
            Self::ArrayEnd => write!(f, "]"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Request(name) => write!(f, "{name}"),
            Self::Error(msg) => write!(f, "<error: {msg}>"),
            Self::Eof => write!(f, "<end of file>"),
        }
    }
}
