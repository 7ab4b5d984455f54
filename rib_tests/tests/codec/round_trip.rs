use super::helpers::{self, all_tokens, decode, encode, gen, Request};
use anyhow::Result;
use itertools::Itertools;
use rib_reader::Token;
use rib_writer::{Format, Value, WriterOptions};

fn format_options(format: Format) -> Result<WriterOptions> {
    let name = format.to_string();
    helpers::options(&[("format", name.as_str())])
}

fn check_round_trip(format: Format, reqs: &[Request]) -> Result<()> {
    let bytes = encode(&format_options(format)?, |enc| {
        reqs.iter().try_for_each(|req| req.emit(enc))
    })?;
    let actual = decode(&bytes)?;
    let expected = all_tokens(reqs);
    for (i, (act, exp)) in actual.iter().zip_eq(expected.iter()).enumerate() {
        assert_eq!(act, exp, "{format} token {i}");
    }
    Ok(())
}

pub fn scene(format: Format) -> Result<()> {
    let reqs = [
        Request::new(
            "Display",
            vec!["out.tif".into(), "file".into(), "rgba".into()],
        ),
        Request::new("Format", vec![640.into(), 480.into(), 1.0f32.into()]),
        Request::new(
            "Projection",
            vec!["perspective".into(), "fov".into(), vec![45.0f32].into()],
        ),
        Request::new("WorldBegin", vec![]),
        Request::new("AttributeBegin", vec![]),
        Request::new("Color", vec![vec![1.0f32, 0.0, 0.0].into()]),
        Request::new(
            "Surface",
            vec![
                "plastic".into(),
                "Ks".into(),
                vec![0.5f32].into(),
                "roughness".into(),
                0.1f32.into(),
            ],
        ),
        Request::new(
            "Sphere",
            vec![1.into(), (-1).into(), 1.into(), 360.into()],
        ),
        Request::new(
            "PointsPolygons",
            vec![
                vec![3, 3].into(),
                vec![0, 1, 2, 0, 2, 3].into(),
                "P".into(),
                vec![0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0].into(),
            ],
        ),
        Request::new(
            "Option",
            vec![
                "searchpath".into(),
                "shader".into(),
                Value::StrArray(vec![String::from("@:."), String::from("~/shaders")]),
            ],
        ),
        Request::new("AttributeEnd", vec![]),
        Request::new("WorldEnd", vec![]),
    ];
    check_round_trip(format, &reqs)
}

pub fn random_values(format: Format) -> Result<()> {
    let mut rng = rand::thread_rng();
    let finite_only = format == Format::Ascii;
    let names = (0..40).map(|i| format!("Req{i}")).collect::<Vec<_>>();

    let reqs = (0..300)
        .map(|i| {
            let name = &names[i % names.len()];
            let args = (0..i % 5).map(|_| gen::value(&mut rng, finite_only)).collect();
            Request::new(name, args)
        })
        .collect::<Vec<_>>();
    check_round_trip(format, &reqs)
}

pub fn indented_requests() -> Result<()> {
    let options = helpers::options(&[("indentation", "tab"), ("indentationsize", "1")])?;
    let bytes = encode(&options, |enc| {
        enc.begin_request("AttributeBegin")?;
        enc.end_request()?;
        enc.increase_indent();
        Request::new("Sphere", vec![1.into(), (-1).into(), 1.into(), 360.into()]).emit(enc)?;
        enc.decrease_indent();
        enc.begin_request("AttributeEnd")?;
        enc.end_request()
    })?;
    assert_eq!(
        String::from_utf8(bytes.clone())?,
        "AttributeBegin\n\tSphere 1 -1 1 360\nAttributeEnd\n"
    );
    assert_eq!(
        decode(&bytes)?,
        [
            Token::request("AttributeBegin"),
            Token::request("Sphere"),
            Token::Int(1),
            Token::Int(-1),
            Token::Int(1),
            Token::Int(360),
            Token::request("AttributeEnd"),
        ]
    );
    Ok(())
}

pub fn negative_one() -> Result<()> {
    let bytes = encode(&format_options(Format::Binary)?, |enc| enc.print_float(-1.0))?;
    assert_eq!(bytes, [0xA4, 0xBF, 0x80, 0x00, 0x00]);
    assert_eq!(decode(&bytes)?, [Token::Float(-1.0)]);
    Ok(())
}

pub fn request_codes_run_out() -> Result<()> {
    let names = (0..300).map(|i| format!("Request{i}")).collect::<Vec<_>>();
    let bytes = encode(&format_options(Format::Binary)?, |enc| {
        for name in names.iter().chain(names.iter().rev()) {
            enc.begin_request(name)?;
        }
        Ok(())
    })?;
    let expected = names
        .iter()
        .chain(names.iter().rev())
        .map(|name| Token::request(name.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(decode(&bytes)?, expected);
    Ok(())
}
