use std::fs;

use tempfile::TempDir;

use huffman_text_coding::{HuffmanError, Separator, compress_file, decompress_file};

#[test]
fn file_round_trip() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = dir.path().join("input.txt");
    let packed = dir.path().join("input.huff");
    let output = dir.path().join("decoded.txt");

    let text = "Zażółć gęślą jaźń;\nline two\twith tab\r\n".repeat(20);
    fs::write(&input, &text).unwrap();

    let separator = Separator::default();
    let report = compress_file(&input, &packed, &separator).unwrap();
    assert_eq!(report.plain_bytes, text.len() as u64);
    assert_eq!(report.packed_bytes, fs::metadata(&packed).unwrap().len());
    assert!(report.space_saving() > 0.0);

    let back = decompress_file(&packed, &output, &separator).unwrap();
    assert_eq!(back.plain_bytes, text.len() as u64);
    assert_eq!(back.distinct_symbols, report.distinct_symbols);
    assert_eq!(fs::read_to_string(&output).unwrap(), text);
}

#[test]
fn empty_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.txt");
    let packed = dir.path().join("empty.huff");
    let output = dir.path().join("empty.out");
    fs::write(&input, "").unwrap();

    let separator = Separator::default();
    compress_file(&input, &packed, &separator).unwrap();
    decompress_file(&packed, &output, &separator).unwrap();

    assert_eq!(fs::read(&output).unwrap(), b"");
}

#[test]
fn missing_input_is_reported_before_writing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("nope.txt");
    let output = dir.path().join("out.huff");

    let err = compress_file(&input, &output, &Separator::default()).unwrap_err();
    assert!(matches!(err, HuffmanError::InputNotFound(ref p) if p == &input));
    assert!(!output.exists());

    let err = decompress_file(&input, &output, &Separator::default()).unwrap_err();
    assert!(matches!(err, HuffmanError::InputNotFound(_)));
    assert!(!output.exists());
}

#[test]
fn failed_decode_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let packed = dir.path().join("broken.huff");
    let output = dir.path().join("broken.txt");
    fs::write(&packed, b"a:0;b:1\n\xff").unwrap();

    let err = decompress_file(&packed, &output, &Separator::default()).unwrap_err();
    assert!(matches!(err, HuffmanError::HeaderParse { .. }));
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn custom_separator_must_match() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.txt");
    let packed = dir.path().join("in.huff");
    let output = dir.path().join("out.txt");
    fs::write(&input, "pipes | and ; semicolons").unwrap();

    let pipe = Separator::new("|").unwrap();
    compress_file(&input, &packed, &pipe).unwrap();

    assert!(decompress_file(&packed, &output, &Separator::default()).is_err());
    decompress_file(&packed, &output, &pipe).unwrap();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "pipes | and ; semicolons"
    );
}
