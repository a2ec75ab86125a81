use std::io::Read;
use xzdec::{XzError, XzErrorKind, XzReader};

const HELLO: &[u8] = include_bytes!("../test_files/hello.txt");

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

fn xz_error_of(err: &std::io::Error) -> &XzError {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<XzError>())
        .expect("io error wraps an XzError")
}

#[test]
fn wrong_header_magic_is_format_error() {
    let data = include_bytes!("../test_files/bad-header-magic.xz");
    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert!(out.is_empty());
    assert_eq!(
        xz_error_of(&err.expect("must fail")).kind(),
        XzErrorKind::Format
    );
}

#[test]
fn corrupt_stream_flags_is_data_error() {
    // flipping a flag bit invalidates the stream-header CRC32
    let data = include_bytes!("../test_files/bad-flags-crc32.xz");
    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert!(out.is_empty());
    assert_eq!(
        xz_error_of(&err.expect("must fail")).kind(),
        XzErrorKind::Data
    );
}

#[test]
fn unknown_check_id_is_unsupported_check() {
    // well-formed header with check id 0x02 and a matching CRC32
    let data = include_bytes!("../test_files/unsupported-check.xz");
    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert!(out.is_empty(), "no plaintext may be delivered");
    let err = err.expect("must fail");
    let error = xz_error_of(&err);
    assert_eq!(error.kind(), XzErrorKind::UnsupportedCheck);
    assert_eq!(*error, XzError::UnsupportedCheckType(2));
}

#[test]
fn corrupt_block_check_delivers_payload_then_fails() {
    let data = include_bytes!("../test_files/bad-1-check-crc32.xz");
    let mut reader = XzReader::new(data.as_slice());

    let (out, err) = read_until_error(&mut reader);
    // the payload itself decodes; the stored check does not match
    assert_eq!(out, HELLO);
    let first = err.expect("check mismatch must fail");
    assert_eq!(xz_error_of(&first).kind(), XzErrorKind::Data);

    // the error is sticky and repeats with no further output
    for _ in 0..3 {
        let mut buf = [0u8; 64];
        let again = reader.read(&mut buf).expect_err("error stays");
        assert_eq!(xz_error_of(&again), xz_error_of(&first));
    }
}

#[test]
fn corrupt_footer_magic_is_data_error() {
    let data = include_bytes!("../test_files/bad-footer-magic.xz");
    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert_eq!(out, HELLO);
    assert_eq!(
        xz_error_of(&err.expect("must fail")).kind(),
        XzErrorKind::Data
    );
}

#[test]
fn every_truncation_is_safe() {
    let data = include_bytes!("../test_files/good-1-check-sha256.xz");
    for cut in 0..data.len() {
        let (out, err) = read_until_error(&mut XzReader::new(&data[..cut]));
        let err = err.unwrap_or_else(|| panic!("prefix of {cut} bytes must not decode"));
        let kind = xz_error_of(&err).kind();
        assert!(
            kind == XzErrorKind::Buffer || kind == XzErrorKind::Data,
            "prefix of {cut} bytes failed with unexpected kind {kind:?}"
        );
        assert!(
            HELLO.starts_with(&out),
            "prefix of {cut} bytes produced non-prefix output"
        );
    }
}

#[test]
fn truncated_large_file_keeps_delivered_prefix() {
    let expected = include_bytes!("../test_files/lorem.txt");
    let data = include_bytes!("../test_files/good-lorem.xz");
    let (out, err) = read_until_error(&mut XzReader::new(&data[..data.len() / 2]));
    assert!(err.is_some());
    assert!(expected.starts_with(&out));
}

#[test]
fn invalid_lzma_properties_are_options_error() {
    // an LZMA chunk announcing new properties (control 0xE0), sizes, then a
    // properties byte that is either above 224 or decodes to lc + lp > 4
    for props in [0xE1u8, 13] {
        let data = build_lzma2_block(&[0xE0, 0x00, 0x00, 0x00, 0x04, props]);
        let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
        assert!(out.is_empty());
        let err = err.expect("must fail");
        let error = xz_error_of(&err);
        assert_eq!(*error, XzError::InvalidLzmaProperties);
        assert_eq!(error.kind(), XzErrorKind::Options);
    }
}

#[test]
fn delta_filter_is_rejected() {
    // hand-built header: delta (id 0x03, distance 1) then LZMA2, CRC32 fixed
    let data = build_two_filter_header(&[0x03, 0x01, 0x00], &[0x21, 0x01, 0x00]);
    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert!(out.is_empty());
    let err = err.expect("must fail");
    let error = xz_error_of(&err);
    assert_eq!(*error, XzError::DeltaFilterUnsupported);
    assert_eq!(error.kind(), XzErrorKind::Options);
}

#[test]
fn bcj_start_offset_is_rejected() {
    // x86 filter with a 4-byte start-offset property
    let data = build_two_filter_header(
        &[0x04, 0x04, 0x00, 0x10, 0x00, 0x00],
        &[0x21, 0x01, 0x00],
    );
    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert!(out.is_empty());
    let err = err.expect("must fail");
    let error = xz_error_of(&err);
    assert_eq!(*error, XzError::BcjStartOffsetUnsupported);
}

#[test]
fn unknown_bcj_filter_is_options_error() {
    // RISC-V (id 0x0B) is defined by the format but not decoded here
    let data = build_two_filter_header(&[0x0B, 0x00], &[0x21, 0x01, 0x00]);
    let (out, err) = read_until_error(&mut XzReader::new(data.as_slice()));
    assert!(out.is_empty());
    let err = err.expect("must fail");
    let error = xz_error_of(&err);
    assert_eq!(*error, XzError::UnsupportedBcjFilter(0x0B));
    assert_eq!(error.kind(), XzErrorKind::Options);
}

fn crc32(buf: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in buf {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                0xEDB8_8320 ^ (crc >> 1)
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

/// Builds a stream header plus one block header declaring a two-filter
/// chain, with valid CRC32 fields, truncated after the block header. The
/// filter descriptors are raw (id, property-size, properties...) bytes.
fn build_two_filter_header(first: &[u8], second: &[u8]) -> Vec<u8> {
    let mut data = b"\xFD7zXZ\0".to_vec();
    let flags = [0x00, 0x01];
    data.extend_from_slice(&flags);
    data.extend_from_slice(&crc32(&flags).to_le_bytes());

    let mut header = vec![0u8, 0x01];
    header.extend_from_slice(first);
    header.extend_from_slice(second);
    while (header.len() + 4) % 4 != 0 {
        header.push(0);
    }
    header[0] = ((header.len() + 4) / 4 - 1) as u8;
    let crc = crc32(&header);
    data.extend_from_slice(&header);
    data.extend_from_slice(&crc.to_le_bytes());
    data
}

/// Builds a stream header plus a single-LZMA2 block header declaring a
/// 4 KiB dictionary, followed by `payload` bytes of block data.
fn build_lzma2_block(payload: &[u8]) -> Vec<u8> {
    let mut data = b"\xFD7zXZ\0".to_vec();
    let flags = [0x00, 0x01];
    data.extend_from_slice(&flags);
    data.extend_from_slice(&crc32(&flags).to_le_bytes());

    let mut header = vec![0u8, 0x00, 0x21, 0x01, 0x00];
    while (header.len() + 4) % 4 != 0 {
        header.push(0);
    }
    header[0] = ((header.len() + 4) / 4 - 1) as u8;
    let crc = crc32(&header);
    data.extend_from_slice(&header);
    data.extend_from_slice(&crc.to_le_bytes());
    data.extend_from_slice(payload);
    data
}
