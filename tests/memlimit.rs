use std::io::Read;
use xzdec::{XzDecoder, XzError, XzErrorKind, XzReader};

const DICT64M: &[u8] = include_bytes!("../test_files/good-dict-64mib.xz");

#[test]
fn dictionary_over_cap_is_memlimit() {
    let mut reader = XzReader::with_dict_max(DICT64M, 32 << 20);
    let mut out = Vec::new();
    let err = reader.read_to_end(&mut out).expect_err("cap is too small");
    assert!(out.is_empty(), "memlimit must hit before any output");

    let error: XzError = err.downcast().expect("wraps an XzError");
    assert_eq!(error, XzError::DictionaryTooLarge(64 << 20));
    assert_eq!(error.kind(), XzErrorKind::Memlimit);
}

#[test]
fn raw_decoder_repeats_the_error() {
    let mut decoder = XzDecoder::with_dict_max(1 << 20);
    let mut buf = [0u8; 256];

    let first = decoder
        .decode(DICT64M, buf.as_mut_slice())
        .expect_err("dictionary exceeds cap");
    assert_eq!(first, XzError::DictionaryTooLarge(64 << 20));

    // terminal failure is idempotent: same error, no state movement
    for _ in 0..3 {
        let again = decoder
            .decode(DICT64M, buf.as_mut_slice())
            .expect_err("error repeats");
        assert_eq!(again, first);
    }

    // reset clears the failure and a larger cap decoder would proceed
    decoder.reset();
    let progress = decoder
        .decode(&DICT64M[..4], buf.as_mut_slice())
        .expect("header prefix parses after reset");
    assert_eq!(progress.input_consumed(), 4);
}

#[test]
fn zero_cap_selects_the_default() {
    // the default cap is 64 MiB, exactly the declared dictionary size
    let mut reader = XzReader::with_dict_max(DICT64M, 0);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).expect("64 MiB fits the default cap");
    assert_eq!(out, include_bytes!("../test_files/lorem.txt"));
}
