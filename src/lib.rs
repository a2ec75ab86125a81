//! # xzdec
//! Streaming XZ decompressor in safe Rust.
//!
//! The core is a cooperative pull decoder, [`XzDecoder`]: the caller hands
//! it an input slice and an output slice and it advances both cursors as far
//! as it can, returning whenever it needs more input or more output space.
//! No thread, no callback, no async runtime. On top of that sits
//! [`XzReader`], a `std::io::Read` adapter that buffers an upstream source
//! and transparently concatenates multiple XZ streams.
//!
//! Supported: LZMA2, the BCJ filters (x86, PowerPC, IA-64, ARM, ARM-Thumb,
//! SPARC, ARM64) with zero start offset, and the None/CRC32/CRC64/SHA-256
//! block checks. Not supported: the Delta filter, encoding, and seeking.
#![no_std]
#![deny(unsafe_code)]
#![deny(
    clippy::correctness,
    clippy::perf,
    clippy::complexity,
    clippy::style,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

#[cfg(target_pointer_width = "16")]
compile_error!("This crate does not work with 16 bit targets");

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// BCJ branch filters.
mod bcj;

/// The input/output buffer pair.
mod buffer;

/// Block check dispatch.
mod check;

/// CRC32 validation.
mod crc32;

/// CRC64 validation.
mod crc64;

/// The sliding-window dictionary.
mod dict;

/// Error types.
mod error;

/// The LZMA2 decoder.
mod lzma2;

/// The range coder.
mod rc;

/// `io::Read` support.
#[cfg(feature = "std")]
mod reader;

/// SHA-256 validation, wrapping the sha2 crate.
mod sha256;

/// The XZ container state machine.
mod stream;

/// Variable-length integer decoding.
mod vli;

pub use buffer::XzInOutBuffer;
pub use check::XzCheckType;
pub use error::{XzError, XzErrorKind};
pub use stream::{XzDecoder, XzProgress, XzStatus};

#[cfg(feature = "std")]
pub use reader::XzReader;

/// Smallest dictionary any XZ stream can declare.
pub const DICT_SIZE_MIN: usize = 4096;

/// Largest dictionary this implementation will ever allocate, 3 GiB.
pub const DICT_SIZE_MAX: usize = 3_221_225_472;

/// Dictionary cap used when none is configured, 64 MiB. Large enough for
/// files produced with `xz -9`.
pub const DICT_SIZE_DEFAULT_MAX: usize = 1 << 26;
