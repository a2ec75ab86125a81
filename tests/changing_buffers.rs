use xzdec::XzDecoder;

/// Decodes `data` feeding at most `in_chunk` input bytes and offering at
/// most `out_chunk` output bytes per call, then compares against `expected`.
fn decode_chunked(data: &[u8], in_chunk: usize, out_chunk: usize, expected: &[u8]) {
    let mut decoder = XzDecoder::new();
    let mut out = Vec::new();
    let mut rest = data;
    let mut buf = vec![0u8; out_chunk];
    loop {
        let feed = &rest[..in_chunk.min(rest.len())];
        let progress = decoder
            .decode(feed, buf.as_mut_slice())
            .unwrap_or_else(|err| panic!("in={in_chunk} out={out_chunk}: {err}"));
        rest = &rest[progress.input_consumed()..];
        out.extend_from_slice(&buf[..progress.output_produced()]);
        if progress.is_stream_end() {
            assert_eq!(out, expected, "in={in_chunk} out={out_chunk}");
            return;
        }
    }
}

#[test]
fn every_input_chunk_size() {
    let expected = include_bytes!("../test_files/hello.txt");
    let data = include_bytes!("../test_files/good-1-check-crc32.xz");
    for in_chunk in 1..=data.len() {
        decode_chunked(data, in_chunk, 64, expected);
    }
}

#[test]
fn small_output_chunk_sizes() {
    let expected = include_bytes!("../test_files/hello.txt");
    let data = include_bytes!("../test_files/good-1-check-sha256.xz");
    for out_chunk in 1..=16 {
        for in_chunk in [1, 2, 3, 5, 7, 13, data.len()] {
            decode_chunked(data, in_chunk, out_chunk, expected);
        }
    }
}

#[test]
fn mixed_chunk_sizes_on_compressed_text() {
    let expected = include_bytes!("../test_files/lorem.txt");
    let data = include_bytes!("../test_files/good-lorem.xz");
    for (in_chunk, out_chunk) in [(1, 4096), (17, 64), (64, 17), (255, 255), (4096, 1023)] {
        decode_chunked(data, in_chunk, out_chunk, expected);
    }
}

#[test]
fn mixed_chunk_sizes_on_filtered_code() {
    let expected = include_bytes!("../test_files/elf-16k.bin");
    let data = include_bytes!("../test_files/good-elf-x86.xz");
    for (in_chunk, out_chunk) in [(1, 4096), (23, 61), (4096, 3), (509, 509)] {
        decode_chunked(data, in_chunk, out_chunk, expected);
    }
}

#[test]
fn mixed_chunk_sizes_on_multi_block() {
    let expected = include_bytes!("../test_files/lorem.txt");
    let data = include_bytes!("../test_files/good-lorem-multiblock.xz");
    for (in_chunk, out_chunk) in [(19, 4096), (4096, 19), (333, 333)] {
        decode_chunked(data, in_chunk, out_chunk, expected);
    }
}
