use derive_more::Display;

/// Line and column of a byte within one input stream. Both are 1-based.
#[derive(Display, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
#[display(fmt = "{} (col {})", line, col)]
pub struct SourcePos {
    pub line: u32,
    pub col: u32,
}

impl Default for SourcePos {
    fn default() -> Self {
        Self::start()
    }
}

impl SourcePos {
    pub const fn start() -> Self {
        Self { line: 1, col: 1 }
    }

    pub fn next_col(self) -> Self {
        Self {
            line: self.line,
            col: self.col + 1,
        }
    }

    pub fn next_line(self) -> Self {
        Self {
            line: self.line + 1,
            col: 1,
        }
    }
}
