use crate::source_buffer::SourceBuffer;
use rib_types::pos::SourcePos;
use rib_types::token::Token;

/// Receives the text of each `#` comment, without the leading `#` and the line break.
/// A structure comment (`##...`) therefore arrives starting with `#`.
pub type CommentCallback<'a> = Box<dyn FnMut(&str) + 'a>;

/// One input stream on the tokenizer's stack, with its own position and lookahead.
pub(crate) struct InputContext<'a> {
    pub(crate) source: SourceBuffer<'a>,
    pub(crate) comment_cb: Option<CommentCallback<'a>>,

    /// The token most recently scanned; returned again after `unget()` or `peek()`.
    pub(crate) tok: Option<Token>,
    pub(crate) have_next: bool,
    pub(crate) last_pos: SourcePos,
    pub(crate) next_pos: SourcePos,

    /// Set once this stream has produced end of file. It keeps doing so.
    pub(crate) at_eof: bool,
}

impl<'a> InputContext<'a> {
    pub(crate) fn new(source: SourceBuffer<'a>, comment_cb: Option<CommentCallback<'a>>) -> Self {
        Self {
            source,
            comment_cb,
            tok: None,
            have_next: false,
            last_pos: SourcePos::start(),
            next_pos: SourcePos::start(),
            at_eof: false,
        }
    }

    pub(crate) fn stream_pos(&self) -> String {
        format!("{}:{}", self.source.name(), self.last_pos)
    }
}
