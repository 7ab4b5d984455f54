//! Writes RIB streams, in either grammar, optionally gzip framed.
//!
//! Everything [`Encoder`] writes decodes back to the same tokens through `rib_reader`.

mod ascii;
mod binary;
mod encoder;
mod options;

pub use ascii::*;
pub use binary::*;
pub use encoder::*;
pub use options::*;

use anyhow::Result;
use log::debug;
use std::io::Write;

/// The encoder `options` select, writing to `sink`.
///
/// With [`Compression::Gzip`], the gzip trailer is written when the encoder is dropped.
pub fn new_encoder<'w, W: Write + 'w>(
    sink: W,
    options: &WriterOptions,
) -> Result<Box<dyn Encoder + 'w>> {
    debug!(
        "{} encoder, compression {}",
        options.format, options.compression
    );
    match options.compression {
        Compression::None => Ok(with_format(sink, options)),
        Compression::Gzip => Ok(with_format(gzip(sink)?, options)),
    }
}

fn with_format<'w, W: Write + 'w>(sink: W, options: &WriterOptions) -> Box<dyn Encoder + 'w> {
    match options.format {
        Format::Ascii => Box::new(AsciiEncoder::new(sink, options.indent)),
        Format::Binary => Box::new(BinaryEncoder::new(sink)),
    }
}

#[cfg(feature = "gzip")]
fn gzip<W: Write>(sink: W) -> Result<flate2::write::GzEncoder<W>> {
    Ok(flate2::write::GzEncoder::new(
        sink,
        flate2::Compression::default(),
    ))
}

#[cfg(not(feature = "gzip"))]
fn gzip<W: Write>(_sink: W) -> Result<W> {
    Err(anyhow::anyhow!(
        "gzip compression requested, but gzip support was not built in"
    ))
}
