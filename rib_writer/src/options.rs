//! Output configuration, settable from string pairs the way a renderer's
//! option request configures its RIB output.

use anyhow::{anyhow, Context, Result};
use derive_more::Display;
use std::str::FromStr;


#[derive(Display, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum Format {
    #[default]
    #[display(fmt = "ascii")]
    Ascii,
    #[display(fmt = "binary")]
    Binary,
}

#[derive(Display, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum Compression {
    #[default]
    #[display(fmt = "none")]
    None,
    #[display(fmt = "gzip")]
    Gzip,
}

#[derive(Display, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum IndentStyle {
    #[display(fmt = "none")]
    None,
    #[default]
    #[display(fmt = "space")]
    Space,
    #[display(fmt = "tab")]
    Tab,
}

macro_rules! impl_from_str {
    ($typ:ty, $what:literal, $($name:literal => $variant:expr),+) => {
        impl FromStr for $typ {
            type Err = anyhow::Error;
            fn from_str(s: &str) -> Result<Self> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    _ => Err(anyhow!("Unknown {} {s:?}", $what)),
                }
            }
        }
    };
}
impl_from_str!(Format, "format", "ascii" => Format::Ascii, "binary" => Format::Binary);
impl_from_str!(Compression, "compression", "none" => Compression::None, "gzip" => Compression::Gzip);
impl_from_str!(IndentStyle, "indentation", "none" => IndentStyle::None, "space" => IndentStyle::Space, "tab" => IndentStyle::Tab);

/// Each nesting level of an ASCII stream is indented by `step` of the style's character.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Indentation {
    pub style: IndentStyle,
    pub step: usize,
}

impl Default for Indentation {
    fn default() -> Self {
        Self {
            style: IndentStyle::Space,
            step: 2,
        }
    }
}

impl Indentation {
    pub fn prefix(&self, level: usize) -> String {
        let ch = match self.style {
            IndentStyle::None => return String::new(),
            IndentStyle::Space => ' ',
            IndentStyle::Tab => '\t',
        };
        std::iter::repeat(ch).take(self.step * level).collect()
    }
}

#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
pub struct WriterOptions {
    pub format: Format,
    pub compression: Compression,
    pub indent: Indentation,
}

impl WriterOptions {
    /// Keys are `format`, `compression`, `indentation` and `indentationsize`, in any case.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key.to_ascii_lowercase().as_str() {
            "format" => self.format = value.parse()?,
            "compression" => self.compression = value.parse()?,
            "indentation" => self.indent.style = value.parse()?,
            "indentationsize" => {
                self.indent.step = value
                    .trim()
                    .parse()
                    .with_context(|| format!("indentationsize {value:?}"))?
            }
            _ => return Err(anyhow!("Unknown writer option {key:?}")),
        }
        Ok(())
    }
}
