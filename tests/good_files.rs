use std::io::Read;
use xzdec::{XzDecoder, XzReader};

fn decode_reader(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    XzReader::new(data)
        .read_to_end(&mut out)
        .expect("file decodes cleanly");
    out
}

fn decode_raw(data: &[u8]) -> Vec<u8> {
    let mut decoder = XzDecoder::new();
    let mut out = Vec::new();
    let mut buf = [0u8; 4096];
    let mut rest = data;
    loop {
        let progress = decoder.decode(rest, buf.as_mut_slice()).expect("decode");
        rest = &rest[progress.input_consumed()..];
        out.extend_from_slice(&buf[..progress.output_produced()]);
        if progress.is_stream_end() {
            break;
        }
    }
    out
}

#[test]
fn check_none() {
    let expected = include_bytes!("../test_files/hello.txt");
    let data = include_bytes!("../test_files/good-1-check-none.xz");
    assert_eq!(decode_reader(data), expected);
    assert_eq!(decode_raw(data), expected);
}

#[test]
fn check_crc32() {
    let expected = include_bytes!("../test_files/hello.txt");
    let data = include_bytes!("../test_files/good-1-check-crc32.xz");
    assert_eq!(decode_reader(data), expected);
    assert_eq!(decode_raw(data), expected);
}

#[test]
fn check_crc64() {
    let expected = include_bytes!("../test_files/hello.txt");
    let data = include_bytes!("../test_files/good-1-check-crc64.xz");
    assert_eq!(decode_reader(data), expected);
    assert_eq!(decode_raw(data), expected);
}

#[test]
fn check_sha256() {
    let expected = include_bytes!("../test_files/hello.txt");
    let data = include_bytes!("../test_files/good-1-check-sha256.xz");
    assert_eq!(decode_reader(data), expected);
    assert_eq!(decode_raw(data), expected);
}

#[test]
fn empty_payload() {
    let data = include_bytes!("../test_files/good-0-empty.xz");
    assert_eq!(decode_reader(data), b"");
    assert_eq!(decode_raw(data), b"");
}

#[test]
fn text_single_block() {
    let expected = include_bytes!("../test_files/lorem.txt");
    let data = include_bytes!("../test_files/good-lorem.xz");
    assert_eq!(decode_reader(data), expected);
    assert_eq!(decode_raw(data), expected);
}

#[test]
fn text_multi_block() {
    let expected = include_bytes!("../test_files/lorem.txt");
    let data = include_bytes!("../test_files/good-lorem-multiblock.xz");
    assert_eq!(decode_reader(data), expected);
    assert_eq!(decode_raw(data), expected);
}

#[test]
fn incompressible_uses_uncompressed_chunks() {
    let expected = include_bytes!("../test_files/random-64k.bin");
    let data = include_bytes!("../test_files/good-random-64k.xz");
    assert_eq!(decode_reader(data), expected.as_slice());
    assert_eq!(decode_raw(data), expected.as_slice());
}

#[test]
fn dictionary_at_exact_cap() {
    let expected = include_bytes!("../test_files/lorem.txt");
    let data = include_bytes!("../test_files/good-dict-64mib.xz");
    // the declared 64 MiB dictionary equals the default cap
    let mut out = Vec::new();
    XzReader::with_dict_max(data.as_slice(), 64 << 20)
        .read_to_end(&mut out)
        .expect("cap equal to the declared size is allowed");
    assert_eq!(out, expected);
}

#[test]
fn reader_with_tiny_buffer() {
    use std::num::NonZeroUsize;

    let expected = include_bytes!("../test_files/lorem.txt");
    let data = include_bytes!("../test_files/good-lorem.xz");
    let mut reader = XzReader::with_buffer_size(
        data.as_slice(),
        NonZeroUsize::new(7).expect("non-zero"),
    );
    let mut out = Vec::new();
    reader.read_to_end(&mut out).expect("decodes through a 7-byte buffer");
    assert_eq!(out, expected);
}

#[test]
fn into_inner_returns_leftover() {
    let data = include_bytes!("../test_files/good-1-check-crc32.xz");
    let mut padded = data.to_vec();
    padded.extend_from_slice(&[0xAA; 32]);

    let mut reader = XzReader::new(padded.as_slice());
    reader.set_multistream(false);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).expect("payload decodes");

    let (_, leftover) = reader.into_inner();
    // everything after the stream stayed buffered
    assert_eq!(leftover, vec![0xAA; 32]);
}
