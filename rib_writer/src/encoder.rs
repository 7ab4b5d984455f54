use anyhow::{anyhow, Result};
use derive_more::{Display, From};
use std::str::FromStr;


/// One argument of a request, as a serializer hands it to an [`Encoder`].
#[derive(From, PartialEq, Clone, Debug)]
pub enum Value {
    Int(i32),
    Float(f32),
    Str(String),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
    StrArray(Vec<String>),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

/// Lines that pass through a stream without being requests.
#[derive(Display, PartialEq, Eq, Clone, Copy, Debug)]
pub enum ArchiveRecordKind {
    /// `#text`
    #[display(fmt = "comment")]
    Comment,
    /// `##text`, read by tools that index a stream.
    #[display(fmt = "structure")]
    Structure,
    /// Written as is.
    #[display(fmt = "verbatim")]
    Verbatim,
}

impl FromStr for ArchiveRecordKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "comment" => Ok(Self::Comment),
            "structure" => Ok(Self::Structure),
            "verbatim" => Ok(Self::Verbatim),
            _ => Err(anyhow!("Unknown archive record kind {s:?}")),
        }
    }
}

/// The output side of the codec. A serializer drives it one request at a time:
/// `begin_request`, then each argument preceded by `whitespace`, then `end_request`.
pub trait Encoder {
    fn begin_request(&mut self, name: &str) -> Result<()>;
    fn end_request(&mut self) -> Result<()>;

    /// Separates two arguments, where the grammar needs it.
    fn whitespace(&mut self) -> Result<()>;

    fn increase_indent(&mut self);
    fn decrease_indent(&mut self);

    fn print_int(&mut self, i: i32) -> Result<()>;
    fn print_float(&mut self, f: f32) -> Result<()>;
    fn print_string(&mut self, s: &str) -> Result<()>;
    fn print_int_array(&mut self, ints: &[i32]) -> Result<()>;
    fn print_float_array(&mut self, floats: &[f32]) -> Result<()>;
    fn print_string_array(&mut self, strs: &[String]) -> Result<()>;

    fn archive_record(&mut self, kind: ArchiveRecordKind, text: &str) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    fn print(&mut self, val: &Value) -> Result<()> {
        match val {
            Value::Int(i) => self.print_int(*i),
            Value::Float(f) => self.print_float(*f),
            Value::Str(s) => self.print_string(s),
            Value::IntArray(ints) => self.print_int_array(ints),
            Value::FloatArray(floats) => self.print_float_array(floats),
            Value::StrArray(strs) => self.print_string_array(strs),
        }
    }

    /// A point, vector, normal or color.
    fn print_triple(&mut self, triple: [f32; 3]) -> Result<()> {
        self.print_float_array(&triple)
    }

    /// A parameter list entry: its name, then its value.
    fn print_param(&mut self, name: &str, val: &Value) -> Result<()> {
        self.print_string(name)?;
        self.whitespace()?;
        self.print(val)
    }
}
