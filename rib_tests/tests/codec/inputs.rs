use super::helpers::{self, all_tokens, encode, frame, Pipe, Request};
use anyhow::Result;
use rib_reader::{Token, Tokenizer};

/// An included archive is read in place of the request that names it.
pub fn read_archive() -> Result<()> {
    let options = helpers::options(&[("format", "binary"), ("compression", "gzip")])?;
    let cylinder = Request::new(
        "Cylinder",
        vec![1.0f32.into(), 0.0f32.into(), 1.0f32.into(), 360.0f32.into()],
    );
    let inner = encode(&options, |enc| cylinder.emit(enc))?;
    let outer = b"WorldBegin\n  ReadArchive \"inner.rib\"\n  Sphere 1 -1 1 360\nWorldEnd\n";

    let mut tz = Tokenizer::new();
    tz.push_input(&outer[..], "outer.rib")?;
    let mut seen = vec![];
    loop {
        match tz.get() {
            Token::Eof => break,
            Token::Request(name) if name == "ReadArchive" => {
                let path = tz.get_string()?;
                tz.push_input(&inner[..], &path)?;
                assert_eq!(tz.depth(), 2);
                seen.extend(tz.by_ref());
                assert!(tz.stream_pos().starts_with("inner.rib:1 "));
                tz.pop_input();
                assert_eq!(tz.stream_pos(), "outer.rib:2 (col 15)");
            }
            tok => seen.push(tok),
        }
    }

    let mut expected = vec![Token::request("WorldBegin")];
    expected.extend(cylinder.tokens());
    expected.extend([
        Token::request("Sphere"),
        Token::Int(1),
        Token::Int(-1),
        Token::Int(1),
        Token::Int(360),
        Token::request("WorldEnd"),
    ]);
    assert_eq!(seen, expected);
    Ok(())
}

/// A generator writes frames into a pipe, each ended by the end-of-stream byte.
/// Each frame is read by pushing the pipe again; request codes carry over between frames.
pub fn pipe_frames() -> Result<()> {
    let pipe = Pipe::default();
    let options = helpers::options(&[("format", "binary")])?;
    let mut enc = rib_writer::new_encoder(pipe.clone(), &options)?;
    let mut tz = Tokenizer::new();

    for n in 1..=3 {
        let reqs = frame(n);
        for req in &reqs {
            req.emit(enc.as_mut())?;
        }
        enc.flush()?;
        pipe.end_frame();

        tz.push_input(pipe.clone(), "generator")?;
        let toks = tz.by_ref().collect::<Vec<_>>();
        assert_eq!(toks, all_tokens(&reqs), "frame {n}");
        assert_eq!(tz.get(), Token::Eof);
        assert!(pipe.is_idle());
        tz.pop_input();
    }

    enc.flush()?;
    pipe.end_frame();
    tz.push_input(pipe.clone(), "generator")?;
    assert_eq!(tz.get(), Token::Eof);
    assert!(pipe.is_idle());
    Ok(())
}
