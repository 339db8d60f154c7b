use lottie_recolor::{open_file, save_file, DocumentFormat};
use serde_json::json;
use std::fs;

const STICKER: &str = include_str!("../crates/lottie-palette/tests/fixtures/sticker.json");

#[test]
fn test_json_to_tgs_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("star.json");
    fs::write(&source, STICKER).unwrap();

    let mut session = open_file(&source).unwrap();
    session.recolor_group("#336600", "#ff8800").unwrap();
    let sticker = dir.path().join("star.TGS");
    save_file(&session, &sticker).unwrap();

    let reopened = open_file(&sticker).unwrap();
    assert_eq!(reopened.document()["tgs"], json!(1));
    assert_eq!(reopened.palette().group("#ff8800").unwrap().usage_count(), 3);
    assert!(reopened.palette().group("#336600").is_none());

    let plain = dir.path().join("star-out.json");
    save_file(&reopened, &plain).unwrap();
    let text = fs::read_to_string(&plain).unwrap();
    assert!(text.starts_with("{\n  \"v\": \"5.7.4\""));
    assert_eq!(DocumentFormat::from_path(&plain), DocumentFormat::Json);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_file(dir.path().join("nope.json")).err().unwrap();
    assert!(matches!(err, lottie_recolor::EditorError::Io(_)));
}
