use super::helpers::{self, all_tokens, decode, encode, frame, Request};
use anyhow::Result;
use rib_reader::{Token, Tokenizer};
use rib_types::wire::GZIP_MAGIC;
use rib_writer::{ArchiveRecordKind, WriterOptions};

fn encode_frame(options: &WriterOptions, reqs: &[Request]) -> Result<Vec<u8>> {
    encode(options, |enc| reqs.iter().try_for_each(|req| req.emit(enc)))
}

pub fn gzip_streams() -> Result<()> {
    for format in ["ascii", "binary"] {
        let options = helpers::options(&[("format", format), ("compression", "gzip")])?;
        let reqs = frame(1);
        let bytes = encode_frame(&options, &reqs)?;
        assert_eq!(bytes[..2], GZIP_MAGIC);
        assert_eq!(decode(&bytes)?, all_tokens(&reqs), "{format}");
    }
    Ok(())
}

/// Gzip members appended one after another read as one stream.
pub fn concatenated_gzip_members() -> Result<()> {
    let options = helpers::options(&[("format", "binary"), ("compression", "gzip")])?;
    let (first, second) = (frame(1), frame(2));
    let mut bytes = encode_frame(&options, &first)?;
    bytes.extend(encode_frame(&options, &second)?);

    let mut expected = all_tokens(&first);
    expected.extend(all_tokens(&second));
    assert_eq!(decode(&bytes)?, expected);
    Ok(())
}

pub fn mixed_grammars() -> Result<()> {
    let ascii = helpers::options(&[("format", "ascii")])?;
    let binary = helpers::options(&[("format", "binary")])?;
    let frames = [frame(1), frame(2), frame(3)];

    let mut bytes = encode_frame(&ascii, &frames[0])?;
    bytes.extend(encode_frame(&binary, &frames[1])?);
    bytes.extend(encode_frame(&ascii, &frames[2])?);

    let expected = frames.iter().flat_map(|reqs| all_tokens(reqs)).collect::<Vec<_>>();
    assert_eq!(decode(&bytes)?, expected);
    Ok(())
}

pub fn archive_records() -> Result<()> {
    let options = helpers::options(&[("format", "binary")])?;
    let reqs = frame(7);
    let bytes = encode(&options, |enc| {
        enc.archive_record(ArchiveRecordKind::Structure, "RenderMan RIB-Structure 1.1")?;
        enc.archive_record(ArchiveRecordKind::Comment, " frame 7")?;
        reqs.iter().try_for_each(|req| req.emit(enc))?;
        enc.archive_record(ArchiveRecordKind::Verbatim, "Sphere 2 -2 2 360\n")
    })?;

    let mut comments = vec![];
    let toks = {
        let mut tz = Tokenizer::new();
        tz.push_input_with_comments(&bytes[..], "commented", |c: &str| {
            comments.push(c.to_string())
        })?;
        tz.collect::<Vec<_>>()
    };

    let mut expected = all_tokens(&reqs);
    expected.extend([
        Token::request("Sphere"),
        Token::Int(2),
        Token::Int(-2),
        Token::Int(2),
        Token::Int(360),
    ]);
    assert_eq!(toks, expected);
    assert_eq!(comments, ["#RenderMan RIB-Structure 1.1", " frame 7"]);
    Ok(())
}
