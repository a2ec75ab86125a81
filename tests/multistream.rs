use std::io::{ErrorKind, Read};
use xzdec::{XzError, XzErrorKind, XzReader};

const HELLO: &[u8] = include_bytes!("../test_files/hello.txt");
const CRC32_FILE: &[u8] = include_bytes!("../test_files/good-1-check-crc32.xz");
const SHA256_FILE: &[u8] = include_bytes!("../test_files/good-1-check-sha256.xz");
const LOREM: &[u8] = include_bytes!("../test_files/lorem.txt");
const LOREM_FILE: &[u8] = include_bytes!("../test_files/good-lorem.xz");

fn read_until_error(reader: &mut XzReader<&[u8]>) -> (Vec<u8>, Option<std::io::Error>) {
    let mut out = Vec::new();
    let mut buf = [0u8; 512];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return (out, None),
            Ok(count) => out.extend_from_slice(&buf[..count]),
            Err(err) => return (out, Some(err)),
        }
    }
}

fn kind_of(err: &std::io::Error) -> XzErrorKind {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<XzError>())
        .expect("io error wraps an XzError")
        .kind()
}

#[test]
fn two_streams_concatenate() {
    let mut data = CRC32_FILE.to_vec();
    data.extend_from_slice(SHA256_FILE);

    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert!(err.is_none());
    assert_eq!(out, [HELLO, HELLO].concat());
}

#[test]
fn three_streams_mixed_payloads() {
    let mut data = CRC32_FILE.to_vec();
    data.extend_from_slice(LOREM_FILE);
    data.extend_from_slice(SHA256_FILE);

    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert!(err.is_none());
    assert_eq!(out, [HELLO, LOREM, HELLO].concat());
}

#[test]
fn padding_between_streams() {
    for pad in [4usize, 8, 12] {
        let mut data = CRC32_FILE.to_vec();
        data.extend_from_slice(&vec![0u8; pad]);
        data.extend_from_slice(SHA256_FILE);

        let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
        assert!(err.is_none(), "padding of {pad} should be accepted");
        assert_eq!(out, [HELLO, HELLO].concat());
    }
}

#[test]
fn trailing_padding_at_eof() {
    let mut data = CRC32_FILE.to_vec();
    data.extend_from_slice(&[0u8; 8]);

    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert!(err.is_none());
    assert_eq!(out, HELLO);
}

#[test]
fn misaligned_padding_is_corrupt() {
    let mut data = CRC32_FILE.to_vec();
    data.extend_from_slice(&[0u8; 3]);
    data.extend_from_slice(SHA256_FILE);

    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert_eq!(out, HELLO);
    assert_eq!(kind_of(&err.expect("misaligned padding fails")), XzErrorKind::Data);
}

#[test]
fn truncated_trailing_padding() {
    let mut data = CRC32_FILE.to_vec();
    data.extend_from_slice(&[0u8; 2]);

    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert_eq!(out, HELLO);
    assert_eq!(
        kind_of(&err.expect("odd padding at eof fails")),
        XzErrorKind::Buffer
    );
}

#[test]
fn single_stream_mode_stops_between_streams() {
    let mut data = CRC32_FILE.to_vec();
    data.extend_from_slice(CRC32_FILE);

    let mut reader = XzReader::new(data.as_slice());
    reader.set_multistream(false);

    let (out, err) = read_until_error(&mut reader);
    assert!(err.is_none());
    assert_eq!(out, HELLO);

    // reset prepares the follow-on stream and re-enables multistream
    reader.reset().expect("a follow-on stream exists");
    assert!(reader.multistream());
    reader.set_multistream(false);

    let (out, err) = read_until_error(&mut reader);
    assert!(err.is_none());
    assert_eq!(out, HELLO);

    let err = reader.reset().expect_err("no further stream");
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn reset_is_a_noop_mid_stream() {
    let mut reader = XzReader::new(CRC32_FILE);
    reader.set_multistream(false);
    reader.reset().expect("no-op before end of stream");

    let (out, err) = read_until_error(&mut reader);
    assert!(err.is_none());
    assert_eq!(out, HELLO);
}
