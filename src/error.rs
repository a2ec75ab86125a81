use core::fmt::{Display, Formatter};

/// Errors produced while decoding an XZ stream.
///
/// Most variants are fatal: once the decoder has returned one of them it
/// will keep returning the same value until [`reset`](crate::XzDecoder::reset)
/// is called. The only recoverable variant is [`XzError::NoProgress`], which
/// simply means the decoder was called twice in a row with buffers it could
/// not make progress on.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum XzError {
    /// Two consecutive calls could neither consume input nor produce output.
    /// The input is truncated, or the output buffer is full while a byte is
    /// still pending.
    NoProgress,

    /// The stream does not begin with the XZ magic bytes.
    StreamHeaderMagicMismatch,
    /// Reserved bits set in the stream flags.
    UnsupportedStreamFlags,
    /// Check id is defined by the format but not implemented here.
    UnsupportedCheckType(u8),

    /// Block header uses a feature this decoder does not support.
    UnsupportedBlockHeaderOption,
    /// Block header names the Delta filter.
    DeltaFilterUnsupported,
    /// Block header names a filter id that is not a known BCJ filter.
    UnsupportedBcjFilter(u8),
    /// BCJ filter carries properties (a non-zero start offset).
    BcjStartOffsetUnsupported,
    /// LZMA2 dictionary-size property byte out of range.
    UnsupportedLzmaProperties(u8),

    /// Declared dictionary size exceeds the configured cap.
    DictionaryTooLarge(u64),

    /// Generic corruption: bad padding, index mismatch, malformed VLI.
    CorruptedData,
    /// Corruption detected inside the LZMA2 payload.
    CorruptedLzmaData,
    /// LZMA properties byte does not decode to valid lc/lp/pb.
    InvalidLzmaProperties,
    /// LZMA chunk arrived without the properties it depends on.
    LzmaPropertiesMissing,
    /// The first chunk of a block did not reset the dictionary.
    LzmaDictionaryResetExpected,
    /// A match referenced data beyond what the dictionary holds.
    MatchDistanceTooFar,
    /// Block header is shorter than its contents require.
    BlockHeaderTooSmall,
    /// Size field in the block header is not a valid VLI.
    InvalidBlockHeaderVli,
    /// Block body is longer than the header declared.
    BlockLargerThanDeclared,
    /// Block body ended before the declared sizes were reached.
    BlockSmallerThanDeclared,
    /// Index does not agree with the blocks that were decoded.
    IndexMismatch,

    /// (actual, expected)
    StreamHeaderCrc32Mismatch(u32, u32),
    /// (actual, expected)
    BlockHeaderCrc32Mismatch(u32, u32),
    /// (actual, expected)
    ContentCrc32Mismatch(u32, u32),
    /// (actual, expected)
    ContentCrc64Mismatch(u64, u64),
    /// (actual, expected)
    ContentSha256Mismatch([u8; 32], [u8; 32]),
    /// (actual, expected)
    IndexCrc32Mismatch(u32, u32),
    /// (actual, expected)
    FooterCrc32Mismatch(u32, u32),

    /// Footer does not end with the `YZ` magic bytes.
    FooterMagicMismatch,
    /// (actual, expected) backward size recorded in the footer.
    FooterBackwardSizeMismatch(u64, u64),
    /// Footer repeats stream flags that differ from the header.
    FooterFlagsMismatch,
}

/// Coarse classification of an [`XzError`], matching the error codes of the
/// classic XZ decoder interface.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum XzErrorKind {
    /// Integrity check type is valid but not implemented.
    UnsupportedCheck,
    /// A bigger LZMA2 dictionary would be needed than the cap allows.
    Memlimit,
    /// File format not recognized (wrong magic bytes).
    Format,
    /// Header is intact but requests options this decoder does not support.
    Options,
    /// Compressed data is corrupt.
    Data,
    /// Cannot make progress; data is truncated or corrupt.
    Buffer,
}

impl XzError {
    /// The coarse kind of this error.
    #[must_use]
    pub const fn kind(&self) -> XzErrorKind {
        match self {
            Self::NoProgress => XzErrorKind::Buffer,
            Self::StreamHeaderMagicMismatch => XzErrorKind::Format,
            Self::UnsupportedStreamFlags
            | Self::UnsupportedBlockHeaderOption
            | Self::DeltaFilterUnsupported
            | Self::UnsupportedBcjFilter(_)
            | Self::BcjStartOffsetUnsupported
            | Self::UnsupportedLzmaProperties(_)
            | Self::InvalidLzmaProperties => XzErrorKind::Options,
            Self::UnsupportedCheckType(_) => XzErrorKind::UnsupportedCheck,
            Self::DictionaryTooLarge(_) => XzErrorKind::Memlimit,
            _ => XzErrorKind::Data,
        }
    }
}

impl Display for XzErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedCheck => f.write_str("integrity check type not supported"),
            Self::Memlimit => f.write_str("LZMA2 dictionary size exceeds max"),
            Self::Format => f.write_str("file format not recognized"),
            Self::Options => f.write_str("compression options not supported"),
            Self::Data => f.write_str("data is corrupt"),
            Self::Buffer => f.write_str("data is truncated or corrupt"),
        }
    }
}

impl Display for XzError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoProgress => f.write_str("NoProgress"),
            Self::StreamHeaderMagicMismatch => f.write_str("StreamHeaderMagicMismatch"),
            Self::UnsupportedStreamFlags => f.write_str("UnsupportedStreamFlags"),
            Self::UnsupportedCheckType(id) => {
                f.write_fmt(format_args!("UnsupportedCheckType(id={id})"))
            }
            Self::UnsupportedBlockHeaderOption => f.write_str("UnsupportedBlockHeaderOption"),
            Self::DeltaFilterUnsupported => f.write_str("DeltaFilterUnsupported"),
            Self::UnsupportedBcjFilter(id) => {
                f.write_fmt(format_args!("UnsupportedBcjFilter(id={id})"))
            }
            Self::BcjStartOffsetUnsupported => f.write_str("BcjStartOffsetUnsupported"),
            Self::UnsupportedLzmaProperties(props) => {
                f.write_fmt(format_args!("UnsupportedLzmaProperties(props={props})"))
            }
            Self::DictionaryTooLarge(size) => {
                f.write_fmt(format_args!("DictionaryTooLarge(size={size} bytes)"))
            }
            Self::CorruptedData => f.write_str("CorruptedData"),
            Self::CorruptedLzmaData => f.write_str("CorruptedLzmaData"),
            Self::InvalidLzmaProperties => f.write_str("InvalidLzmaProperties"),
            Self::LzmaPropertiesMissing => f.write_str("LzmaPropertiesMissing"),
            Self::LzmaDictionaryResetExpected => f.write_str("LzmaDictionaryResetExpected"),
            Self::MatchDistanceTooFar => f.write_str("MatchDistanceTooFar"),
            Self::BlockHeaderTooSmall => f.write_str("BlockHeaderTooSmall"),
            Self::InvalidBlockHeaderVli => f.write_str("InvalidBlockHeaderVli"),
            Self::BlockLargerThanDeclared => f.write_str("BlockLargerThanDeclared"),
            Self::BlockSmallerThanDeclared => f.write_str("BlockSmallerThanDeclared"),
            Self::IndexMismatch => f.write_str("IndexMismatch"),
            Self::StreamHeaderCrc32Mismatch(actual, expected) => f.write_fmt(format_args!(
                "StreamHeaderCrc32Mismatch(actual={actual:08x}, expected={expected:08x})"
            )),
            Self::BlockHeaderCrc32Mismatch(actual, expected) => f.write_fmt(format_args!(
                "BlockHeaderCrc32Mismatch(actual={actual:08x}, expected={expected:08x})"
            )),
            Self::ContentCrc32Mismatch(actual, expected) => f.write_fmt(format_args!(
                "ContentCrc32Mismatch(actual={actual:08x}, expected={expected:08x})"
            )),
            Self::ContentCrc64Mismatch(actual, expected) => f.write_fmt(format_args!(
                "ContentCrc64Mismatch(actual={actual:016x}, expected={expected:016x})"
            )),
            Self::ContentSha256Mismatch(actual, expected) => f.write_fmt(format_args!(
                "ContentSha256Mismatch(actual={actual:02x?}, expected={expected:02x?})"
            )),
            Self::IndexCrc32Mismatch(actual, expected) => f.write_fmt(format_args!(
                "IndexCrc32Mismatch(actual={actual:08x}, expected={expected:08x})"
            )),
            Self::FooterCrc32Mismatch(actual, expected) => f.write_fmt(format_args!(
                "FooterCrc32Mismatch(actual={actual:08x}, expected={expected:08x})"
            )),
            Self::FooterMagicMismatch => f.write_str("FooterMagicMismatch"),
            Self::FooterBackwardSizeMismatch(actual, expected) => f.write_fmt(format_args!(
                "FooterBackwardSizeMismatch(actual={actual}, expected={expected})"
            )),
            Self::FooterFlagsMismatch => f.write_str("FooterFlagsMismatch"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for XzError {}
