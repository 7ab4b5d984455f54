mod dictionary;
mod input_context;
mod source_buffer;
mod tokenizer;
mod typed;

pub use dictionary::*;
pub use input_context::CommentCallback;
pub use source_buffer::*;
pub use tokenizer::*;

pub use rib_types::{pos::SourcePos, token::Token, token::TokenKind};
