use crate::encoder::{ArchiveRecordKind, Encoder};
use crate::options::Indentation;
use anyhow::{anyhow, Result};
use std::io::{BufWriter, Write};


/// Magnitudes outside this range are written in exponent form.
const POSITIONAL_RANGE: (f32, f32) = (1e-5, 1e16);

/// Writes the human-readable grammar: one request per line, indented by nesting level.
pub struct AsciiEncoder<W: Write> {
    w: BufWriter<W>,
    indent: Indentation,
    level: usize,
}

impl<W: Write> AsciiEncoder<W> {
    pub fn new(sink: W, indent: Indentation) -> Self {
        Self {
            w: BufWriter::new(sink),
            indent,
            level: 0,
        }
    }
}

impl<W: Write> Encoder for AsciiEncoder<W> {
    fn begin_request(&mut self, name: &str) -> Result<()> {
        let prefix = self.indent.prefix(self.level);
        self.w.write_all(prefix.as_bytes())?;
        self.w.write_all(name.as_bytes())?;
        Ok(())
    }

    fn end_request(&mut self) -> Result<()> {
        self.w.write_all(b"\n")?;
        Ok(())
    }

    fn whitespace(&mut self) -> Result<()> {
        self.w.write_all(b" ")?;
        Ok(())
    }

    fn increase_indent(&mut self) {
        self.level += 1;
    }

    fn decrease_indent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    fn print_int(&mut self, i: i32) -> Result<()> {
        write!(self.w, "{i}")?;
        Ok(())
    }

    fn print_float(&mut self, f: f32) -> Result<()> {
        let text = format_float(f)?;
        self.w.write_all(text.as_bytes())?;
        Ok(())
    }

    fn print_string(&mut self, s: &str) -> Result<()> {
        let escaped = escape(s);
        self.w.write_all(&escaped)?;
        Ok(())
    }

    fn print_int_array(&mut self, ints: &[i32]) -> Result<()> {
        self.w.write_all(b"[")?;
        for (i, int) in ints.iter().enumerate() {
            if i > 0 {
                self.w.write_all(b" ")?;
            }
            self.print_int(*int)?;
        }
        self.w.write_all(b"]")?;
        Ok(())
    }

    fn print_float_array(&mut self, floats: &[f32]) -> Result<()> {
        self.w.write_all(b"[")?;
        for (i, f) in floats.iter().enumerate() {
            if i > 0 {
                self.w.write_all(b" ")?;
            }
            self.print_float(*f)?;
        }
        self.w.write_all(b"]")?;
        Ok(())
    }

    fn print_string_array(&mut self, strs: &[String]) -> Result<()> {
        self.w.write_all(b"[")?;
        for (i, s) in strs.iter().enumerate() {
            if i > 0 {
                self.w.write_all(b" ")?;
            }
            self.print_string(s)?;
        }
        self.w.write_all(b"]")?;
        Ok(())
    }

    fn archive_record(&mut self, kind: ArchiveRecordKind, text: &str) -> Result<()> {
        write_archive_record(&mut self.w, kind, text)
    }

    fn flush(&mut self) -> Result<()> {
        self.w.flush()?;
        Ok(())
    }
}

/// Shared by both encoders: archive records are the same bytes in either grammar.
pub(crate) fn write_archive_record<W: Write>(
    w: &mut W,
    kind: ArchiveRecordKind,
    text: &str,
) -> Result<()> {
    match kind {
        ArchiveRecordKind::Comment => writeln!(w, "#{text}")?,
        ArchiveRecordKind::Structure => writeln!(w, "##{text}")?,
        ArchiveRecordKind::Verbatim => w.write_all(text.as_bytes())?,
    }
    Ok(())
}

/// The shortest text that reads back as the same `f32`, and reads back as a float.
pub fn format_float(f: f32) -> Result<String> {
    if !f.is_finite() {
        return Err(anyhow!("{f} has no ASCII form"));
    }
    let (lo, hi) = POSITIONAL_RANGE;
    let mag = f.abs();
    let text = if mag != 0.0 && (mag < lo || mag >= hi) {
        format!("{f:e}")
    } else {
        format!("{f}")
    };
    if text.contains(['.', 'e']) {
        Ok(text)
    } else {
        Ok(text + ".0")
    }
}

/// Quotes `s`, escaping exactly what the tokenizer unescapes.
fn escape(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() + 2);
    out.push(b'"');
    for &byte in s.as_bytes() {
        match byte {
            b'"' => out.extend(b"\\\""),
            b'\\' => out.extend(b"\\\\"),
            b'\n' => out.extend(b"\\n"),
            b'\r' => out.extend(b"\\r"),
            b'\t' => out.extend(b"\\t"),
            0x08 => out.extend(b"\\b"),
            0x0C => out.extend(b"\\f"),
            0x00..=0x1F | 0x7F => out.extend(format!("\\{byte:03o}").bytes()),
            _ => out.push(byte),
        }
    }
    out.push(b'"');
    out
}
