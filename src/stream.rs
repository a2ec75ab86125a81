use crate::bcj::BcjFilter;
use crate::buffer::XzInOutBuffer;
use crate::check::{BlockCheck, XzCheckType};
use crate::crc32::crc32;
use crate::dict::DictBuffer;
use crate::error::XzError;
use crate::lzma2::Lzma2Decoder;
use crate::vli::{VliDecoder, VliResult};
use crate::DICT_SIZE_DEFAULT_MAX;

/// Outcome of a decoding call that did not fail.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum XzStatus {
    /// More input or more output space is needed to continue.
    NeedMore,
    /// The end of the structure being decoded was reached. From
    /// [`XzDecoder::run`] this means a complete stream was decoded.
    StreamEnd,
}

/// Cursor movement of one [`XzDecoder::decode`] call.
#[derive(Debug)]
pub enum XzProgress {
    /// More input or output space needed; (input consumed, output produced).
    NeedMore(usize, usize),
    /// Stream decoded to completion; (input consumed, output produced).
    StreamEnd(usize, usize),
}

impl XzProgress {
    /// Input bytes consumed by the call.
    #[must_use]
    pub const fn input_consumed(&self) -> usize {
        match self {
            Self::NeedMore(input, _) | Self::StreamEnd(input, _) => *input,
        }
    }

    /// Output bytes produced by the call.
    #[must_use]
    pub const fn output_produced(&self) -> usize {
        match self {
            Self::NeedMore(_, out) | Self::StreamEnd(_, out) => *out,
        }
    }

    /// True if the call moved either cursor.
    #[must_use]
    pub const fn made_progress(&self) -> bool {
        self.input_consumed() != 0 || self.output_produced() != 0
    }

    /// True once the stream footer has been verified.
    #[must_use]
    pub const fn is_stream_end(&self) -> bool {
        matches!(self, Self::StreamEnd(_, _))
    }
}

/// Where the container state machine stands in the stream.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum DecoderState {
    /// The 12-byte stream header.
    StreamHeader,
    /// First byte of the next record: 0x00 starts the index, anything else
    /// encodes the next block header's size.
    BlockOrIndex,
    /// Filling and parsing a block header.
    BlockHeader,
    /// Decoding the filtered block payload.
    BlockBody,
    /// Zero padding aligning the block to four bytes.
    BlockPadding,
    /// The stored check of the finished block.
    BlockCheck,
    /// The index records.
    Index,
    /// Zero padding aligning the index to four bytes.
    IndexPadding,
    /// The CRC32 of the index.
    IndexCrc32,
    /// The 12-byte stream footer.
    StreamFooter,
    /// A complete stream was decoded; only `reset` leaves this state.
    EndOfStream,
}

/// Running (unpadded, uncompressed, CRC32) triple. Computed once from the
/// blocks as they are decoded and again from the index records, then
/// compared.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
struct RecordHash {
    /// Sum of unpadded block sizes.
    unpadded: u64,
    /// Sum of uncompressed block sizes.
    uncompressed: u64,
    /// CRC32 chained over the pairs.
    crc32: u32,
}

impl RecordHash {
    const fn new() -> Self {
        Self {
            unpadded: 0,
            uncompressed: 0,
            crc32: 0,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    /// Folds the current pair into the chained CRC32.
    fn chain(&mut self) {
        let mut record = [0u8; 20];
        record[..8].copy_from_slice(&self.unpadded.to_le_bytes());
        record[8..16].copy_from_slice(&self.uncompressed.to_le_bytes());
        record[16..].copy_from_slice(&self.crc32.to_le_bytes());
        self.crc32 = crc32(self.crc32, &record);
    }
}

/// Sizes declared by the current block header; `u64::MAX` when absent.
#[derive(Clone, Debug)]
struct BlockHeaderInfo {
    /// Declared compressed size.
    compressed: u64,
    /// Declared uncompressed size.
    uncompressed: u64,
    /// Physical header size in bytes.
    size: usize,
}

impl BlockHeaderInfo {
    const fn new() -> Self {
        Self {
            compressed: 0,
            uncompressed: 0,
            size: 0,
        }
    }
}

/// Accounting over all blocks decoded so far in this stream.
#[derive(Clone, Default, Debug)]
struct BlockTracker {
    /// Compressed bytes of the current block, including padding once the
    /// padding state has run.
    compressed: u64,
    /// Uncompressed bytes of the current block.
    uncompressed: u64,
    /// Blocks completed.
    count: u64,
    /// Triple to compare against the index.
    hash: RecordHash,
}

impl BlockTracker {
    const fn new() -> Self {
        Self {
            compressed: 0,
            uncompressed: 0,
            count: 0,
            hash: RecordHash::new(),
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Which field of the index the VLI decoder is positioned on.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq)]
enum IndexSequence {
    /// The block count.
    #[default]
    Count,
    /// A record's unpadded size.
    Unpadded,
    /// A record's uncompressed size.
    Uncompressed,
}

/// Index verification state.
#[derive(Clone, Default, Debug)]
struct IndexTracker {
    /// Field currently being decoded.
    sequence: IndexSequence,
    /// Bytes of the index consumed so far, excluding its CRC32 field.
    size: u64,
    /// Records still expected.
    count: u64,
    /// Triple accumulated from the records.
    hash: RecordHash,
    /// CRC32 over the index bytes.
    crc32: u32,
}

impl IndexTracker {
    const fn new() -> Self {
        Self {
            sequence: IndexSequence::Count,
            size: 0,
            count: 0,
            hash: RecordHash::new(),
            crc32: 0,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Staging buffer for the fixed-size records of the container: headers,
/// footers, stored checks. Filled across calls until `size` bytes arrived.
#[derive(Clone, Debug)]
struct TempBuffer {
    /// Fill position.
    pos: usize,
    /// Bytes the current record needs.
    size: usize,
    /// Backing storage; block headers are at most 1024 bytes.
    buf: [u8; 1024],
}

impl TempBuffer {
    const fn new() -> Self {
        Self {
            pos: 0,
            size: 12,
            buf: [0; 1024],
        }
    }

    /// Copies input until the record is complete; true once it is.
    fn fill(&mut self, b: &mut XzInOutBuffer) -> bool {
        let copy_size = (self.size - self.pos).min(b.input_remaining());
        self.buf[self.pos..self.pos + copy_size].copy_from_slice(&b.input_slice()[..copy_size]);
        b.input_seek_add(copy_size);

        self.pos += copy_size;
        if self.pos == self.size {
            self.pos = 0;
            return true;
        }
        false
    }

    /// The completed record.
    fn contents(&self) -> &[u8] {
        &self.buf[..self.size]
    }

    /// Shrinks the record by its trailing CRC32 field and returns the field.
    fn split_trailing_crc32(&mut self) -> u32 {
        debug_assert!(self.size >= 4);
        self.size -= 4;
        u32::from_le_bytes([
            self.buf[self.size],
            self.buf[self.size + 1],
            self.buf[self.size + 2],
            self.buf[self.size + 3],
        ])
    }
}

/// Pull decoder for XZ streams.
///
/// Feed it compressed bytes and an output buffer via [`run`](Self::run) or
/// [`decode`](Self::decode); each call consumes input, produces output, or
/// reports why it cannot. One instance decodes one stream at a time; call
/// [`reset`](Self::reset) between streams. Every error except
/// [`XzError::NoProgress`] is terminal and repeated verbatim on later calls.
#[derive(Debug)]
pub struct XzDecoder {
    /// Sliding-window dictionary, capped at construction.
    dict: DictBuffer,
    /// Container state machine position.
    state: DecoderState,
    /// Digest over the current block's plaintext.
    check: BlockCheck,
    /// VLI decoder shared by the header and index parsers.
    vli: VliDecoder,
    /// The previous call made no progress.
    had_no_progress: bool,
    /// Largest input size seen while stalled.
    last_input_size: usize,
    /// Largest output size seen while stalled.
    last_output_size: usize,
    /// First fatal error, repeated on every later call.
    failed: Option<XzError>,
    /// Declared sizes of the current block.
    header: BlockHeaderInfo,
    /// Accounting over decoded blocks.
    block: BlockTracker,
    /// Index verification state.
    index: IndexTracker,
    /// Staging buffer for fixed-size records.
    temp: TempBuffer,
    /// The LZMA2 layer.
    lzma2: Lzma2Decoder,
    /// BCJ filter of the current block, when its chain has one.
    bcj: Option<BcjFilter>,
}

impl XzDecoder {
    /// A decoder with the default 64 MiB dictionary cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dict_max(DICT_SIZE_DEFAULT_MAX)
    }

    /// A decoder whose dictionary may grow up to `dict_max` bytes. Zero
    /// selects the default cap. Streams declaring a larger dictionary fail
    /// with [`XzError::DictionaryTooLarge`] before producing output.
    #[must_use]
    pub fn with_dict_max(dict_max: usize) -> Self {
        let dict_max = if dict_max == 0 {
            DICT_SIZE_DEFAULT_MAX
        } else {
            dict_max
        };
        Self {
            dict: DictBuffer::new(dict_max),
            state: DecoderState::StreamHeader,
            check: BlockCheck::new(),
            vli: VliDecoder::new(),
            had_no_progress: false,
            last_input_size: 0,
            last_output_size: 0,
            failed: None,
            header: BlockHeaderInfo::new(),
            block: BlockTracker::new(),
            index: IndexTracker::new(),
            temp: TempBuffer::new(),
            lzma2: Lzma2Decoder::new(),
            bcj: None,
        }
    }

    /// Decodes as much as the buffer pair allows. The cursors in `b` are
    /// advanced even when an error is returned, so already-produced output
    /// is never lost.
    ///
    /// # Errors
    /// All errors except [`XzError::NoProgress`] are fatal; the same error
    /// is returned from every subsequent call until [`reset`](Self::reset).
    pub fn run(&mut self, b: &mut XzInOutBuffer) -> Result<XzStatus, XzError> {
        if let Some(error) = &self.failed {
            return Err(error.clone());
        }

        match self.dec_main(b) {
            Ok(XzStatus::NeedMore) => {
                if self.buffers_stalled(b) {
                    return Err(XzError::NoProgress);
                }
                Ok(XzStatus::NeedMore)
            }
            Ok(XzStatus::StreamEnd) => Ok(XzStatus::StreamEnd),
            Err(error) => {
                self.failed = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Convenience wrapper around [`run`](Self::run) for slice-in/slice-out
    /// callers.
    ///
    /// # Errors
    /// As [`run`](Self::run).
    pub fn decode(&mut self, input: &[u8], output: &mut [u8]) -> Result<XzProgress, XzError> {
        let mut b = XzInOutBuffer::new(input, output);
        match self.run(&mut b)? {
            XzStatus::NeedMore => Ok(XzProgress::NeedMore(
                b.input_position(),
                b.output_position(),
            )),
            XzStatus::StreamEnd => Ok(XzProgress::StreamEnd(
                b.input_position(),
                b.output_position(),
            )),
        }
    }

    /// Prepares the decoder for a fresh stream, clearing any recorded error.
    /// The dictionary cap is retained.
    pub fn reset(&mut self) {
        self.state = DecoderState::StreamHeader;
        self.check = BlockCheck::new();
        self.vli.reset();
        self.had_no_progress = false;
        self.last_input_size = 0;
        self.last_output_size = 0;
        self.failed = None;
        self.header = BlockHeaderInfo::new();
        self.block.reset();
        self.index.reset();
        self.temp = TempBuffer::new();
        self.bcj = None;
        // the LZMA2 layer is reconfigured by the next block header and the
        // first chunk of a block always resets the dictionary
    }

    /// True if this call and the previous one both failed to move either
    /// cursor without the caller offering bigger buffers.
    fn buffers_stalled(&mut self, b: &XzInOutBuffer) -> bool {
        if b.input_position() != 0 || b.output_position() != 0 {
            self.had_no_progress = false;
            self.last_input_size = 0;
            self.last_output_size = 0;
            return false;
        }

        let input_size = b.input_remaining();
        let output_size = b.output_len();
        if self.had_no_progress
            && self.last_input_size >= input_size
            && self.last_output_size >= output_size
        {
            return true;
        }
        self.last_input_size = input_size.max(self.last_input_size);
        self.last_output_size = output_size.max(self.last_output_size);
        self.had_no_progress = true;
        false
    }

    /// The container state machine.
    fn dec_main(&mut self, b: &mut XzInOutBuffer) -> Result<XzStatus, XzError> {
        let mut in_start = b.input_position();
        loop {
            match self.state {
                DecoderState::StreamHeader => {
                    if !self.temp.fill(b) {
                        return Ok(XzStatus::NeedMore);
                    }
                    self.dec_stream_header()?;
                    self.state = DecoderState::BlockOrIndex;
                }
                DecoderState::BlockOrIndex => {
                    let Some(marker) = b.input_peek_byte::<usize>() else {
                        return Ok(XzStatus::NeedMore);
                    };

                    if marker == 0 {
                        in_start = b.input_position();
                        b.input_seek_add(1);
                        self.state = DecoderState::Index;
                        continue;
                    }

                    self.header.size = (marker + 1) * 4;
                    self.temp.size = self.header.size;
                    self.temp.pos = 0;
                    self.state = DecoderState::BlockHeader;
                }
                DecoderState::BlockHeader => {
                    if !self.temp.fill(b) {
                        return Ok(XzStatus::NeedMore);
                    }
                    self.dec_block_header()?;
                    self.check.reset();
                    self.state = DecoderState::BlockBody;
                }
                DecoderState::BlockBody => match self.dec_block(b)? {
                    XzStatus::StreamEnd => self.state = DecoderState::BlockPadding,
                    status => return Ok(status),
                },
                DecoderState::BlockPadding => {
                    while self.block.compressed & 3 != 0 {
                        let Some(padding) = b.input_read_byte::<u8>() else {
                            return Ok(XzStatus::NeedMore);
                        };
                        if padding != 0 {
                            return Err(XzError::CorruptedData);
                        }
                        self.block.compressed += 1;
                    }
                    self.state = DecoderState::BlockCheck;
                }
                DecoderState::BlockCheck => {
                    if self.check.check_type() != XzCheckType::None {
                        self.temp.size = self.check.check_type().size();
                        if !self.temp.fill(b) {
                            return Ok(XzStatus::NeedMore);
                        }
                        let stored = &self.temp.buf[..self.temp.size];
                        self.check.verify(stored)?;
                    }
                    self.state = DecoderState::BlockOrIndex;
                }
                DecoderState::Index => {
                    match self.dec_index(b, in_start)? {
                        XzStatus::StreamEnd => (),
                        status => return Ok(status),
                    }
                    self.state = DecoderState::IndexPadding;
                }
                DecoderState::IndexPadding => {
                    while (self.index.size + (b.input_position() - in_start) as u64) & 3 != 0 {
                        let Some(padding) = b.input_read_byte::<u8>() else {
                            self.index_update(b, in_start);
                            return Ok(XzStatus::NeedMore);
                        };
                        if padding != 0 {
                            return Err(XzError::CorruptedData);
                        }
                    }
                    self.index_update(b, in_start);
                    if self.block.hash != self.index.hash {
                        return Err(XzError::IndexMismatch);
                    }
                    self.state = DecoderState::IndexCrc32;
                }
                DecoderState::IndexCrc32 => {
                    self.temp.size = 4;
                    if !self.temp.fill(b) {
                        return Ok(XzStatus::NeedMore);
                    }

                    let expected = u32::from_le_bytes([
                        self.temp.buf[0],
                        self.temp.buf[1],
                        self.temp.buf[2],
                        self.temp.buf[3],
                    ]);
                    if self.index.crc32 != expected {
                        return Err(XzError::IndexCrc32Mismatch(self.index.crc32, expected));
                    }

                    self.temp.size = 12;
                    self.state = DecoderState::StreamFooter;
                }
                DecoderState::StreamFooter => {
                    if !self.temp.fill(b) {
                        return Ok(XzStatus::NeedMore);
                    }
                    self.dec_stream_footer()?;
                    self.state = DecoderState::EndOfStream;
                    return Ok(XzStatus::StreamEnd);
                }
                DecoderState::EndOfStream => return Ok(XzStatus::StreamEnd),
            }
        }
    }

    /// Validates the stream header sitting in the staging buffer.
    fn dec_stream_header(&mut self) -> Result<(), XzError> {
        const MAGIC: &[u8] = b"\xFD7zXZ\0";
        let buf = self.temp.contents();
        if &buf[..MAGIC.len()] != MAGIC {
            return Err(XzError::StreamHeaderMagicMismatch);
        }

        let expected = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
        let actual = crc32(0, &buf[6..8]);
        if actual != expected {
            return Err(XzError::StreamHeaderCrc32Mismatch(actual, expected));
        }

        if buf[6] != 0 || buf[7] > 15 {
            return Err(XzError::UnsupportedStreamFlags);
        }

        self.check.set_type(XzCheckType::try_from(buf[7])?);
        Ok(())
    }

    /// Validates the stream footer sitting in the staging buffer.
    fn dec_stream_footer(&self) -> Result<(), XzError> {
        const MAGIC: &[u8] = b"YZ";
        let buf = self.temp.contents();
        if &buf[10..12] != MAGIC {
            return Err(XzError::FooterMagicMismatch);
        }

        let expected = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let actual = crc32(0, &buf[4..10]);
        if actual != expected {
            return Err(XzError::FooterCrc32Mismatch(actual, expected));
        }

        let stored = u64::from(u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]));
        if self.index.size >> 2 != stored {
            return Err(XzError::FooterBackwardSizeMismatch(
                stored,
                self.index.size >> 2,
            ));
        }

        if buf[8] != 0 || self.check.check_type() as u8 != buf[9] {
            return Err(XzError::FooterFlagsMismatch);
        }
        Ok(())
    }

    /// Parses the block header sitting in the staging buffer and configures
    /// the filter chain.
    fn dec_block_header(&mut self) -> Result<(), XzError> {
        debug_assert!(self.temp.size >= 8);

        let expected = self.temp.split_trailing_crc32();
        let actual = crc32(0, self.temp.contents());
        if actual != expected {
            return Err(XzError::BlockHeaderCrc32Mismatch(actual, expected));
        }

        let buf = self.temp.contents();
        let flags = buf[1];
        let mut pos = 2usize;

        if flags & 0x3C != 0 || flags & 0x02 != 0 {
            // reserved bits, or a chain of three or four filters
            if buf[2] == 0x03 {
                return Err(XzError::DeltaFilterUnsupported);
            }
            return Err(XzError::UnsupportedBlockHeaderOption);
        }

        if flags & 0x40 != 0 {
            let Some((vli, len)) = self.vli.decode_all(&buf[pos..]) else {
                return Err(XzError::InvalidBlockHeaderVli);
            };
            pos += len;
            self.header.compressed = vli;
        } else {
            self.header.compressed = u64::MAX;
        }

        if flags & 0x80 != 0 {
            let Some((vli, len)) = self.vli.decode_all(&buf[pos..]) else {
                return Err(XzError::InvalidBlockHeaderVli);
            };
            pos += len;
            self.header.uncompressed = vli;
        } else {
            self.header.uncompressed = u64::MAX;
        }

        self.bcj = None;
        if flags & 0x01 != 0 {
            if self.temp.size - pos < 2 {
                return Err(XzError::BlockHeaderTooSmall);
            }
            let filter_id = buf[pos];
            pos += 1;
            if filter_id == 0x03 {
                return Err(XzError::DeltaFilterUnsupported);
            }
            self.bcj = Some(BcjFilter::new(filter_id)?);

            if buf[pos] != 0 {
                return Err(XzError::BcjStartOffsetUnsupported);
            }
            pos += 1;
        }

        if self.temp.size.saturating_sub(pos) < 2 {
            return Err(XzError::BlockHeaderTooSmall);
        }
        if buf[pos] != 0x21 {
            return Err(XzError::UnsupportedBlockHeaderOption);
        }
        pos += 1;
        if buf[pos] != 0x01 {
            return Err(XzError::UnsupportedBlockHeaderOption);
        }
        pos += 1;

        if self.temp.size.saturating_sub(pos) < 1 {
            return Err(XzError::BlockHeaderTooSmall);
        }
        let dict_bits = buf[pos];
        pos += 1;
        self.lzma2.begin_block(dict_bits, &mut self.dict)?;

        while pos < self.temp.size {
            if self.temp.buf[pos] != 0 {
                return Err(XzError::UnsupportedBlockHeaderOption);
            }
            pos += 1;
        }

        self.block.compressed = 0;
        self.block.uncompressed = 0;
        Ok(())
    }

    /// Runs the filter chain over the block payload and keeps the size
    /// accounting and the check digest up to date.
    fn dec_block(&mut self, b: &mut XzInOutBuffer) -> Result<XzStatus, XzError> {
        let in_start = b.input_position();
        let out_start = b.output_position();

        let status = match &mut self.bcj {
            Some(bcj) => bcj.run(&mut self.lzma2, b, &mut self.dict)?,
            None => self.lzma2.run(b, &mut self.dict)?,
        };

        self.block.compressed += (b.input_position() - in_start) as u64;
        self.block.uncompressed += (b.output_position() - out_start) as u64;

        if self.block.compressed > self.header.compressed
            || self.block.uncompressed > self.header.uncompressed
        {
            return Err(XzError::BlockLargerThanDeclared);
        }

        self.check.update(b.output_span(out_start));

        if status == XzStatus::StreamEnd {
            if self.header.compressed != u64::MAX && self.header.compressed != self.block.compressed
            {
                return Err(XzError::BlockSmallerThanDeclared);
            }
            if self.header.uncompressed != u64::MAX
                && self.header.uncompressed != self.block.uncompressed
            {
                return Err(XzError::BlockSmallerThanDeclared);
            }

            self.block.hash.unpadded = self
                .block
                .hash
                .unpadded
                .wrapping_add(self.header.size as u64)
                .wrapping_add(self.block.compressed)
                .wrapping_add(self.check.check_type().size() as u64);
            self.block.hash.uncompressed = self
                .block
                .hash
                .uncompressed
                .wrapping_add(self.block.uncompressed);
            self.block.hash.chain();
            self.block.count += 1;
        }

        Ok(status)
    }

    /// Decodes index records and accumulates the comparison triple.
    fn dec_index(&mut self, b: &mut XzInOutBuffer, in_start: usize) -> Result<XzStatus, XzError> {
        loop {
            let vli = match self.vli.decode(b.input_slice()) {
                VliResult::Done(vli, len) => {
                    b.input_seek_add(len);
                    vli
                }
                VliResult::Pending(len) => {
                    b.input_seek_add(len);
                    self.index_update(b, in_start);
                    return Ok(XzStatus::NeedMore);
                }
                VliResult::Invalid => return Err(XzError::CorruptedData),
            };

            match self.index.sequence {
                IndexSequence::Count => {
                    if vli != self.block.count {
                        return Err(XzError::IndexMismatch);
                    }
                    self.index.count = vli;
                    self.index.sequence = IndexSequence::Unpadded;
                }
                IndexSequence::Unpadded => {
                    self.index.hash.unpadded = self.index.hash.unpadded.wrapping_add(vli);
                    self.index.sequence = IndexSequence::Uncompressed;
                }
                IndexSequence::Uncompressed => {
                    self.index.hash.uncompressed = self.index.hash.uncompressed.wrapping_add(vli);
                    self.index.hash.chain();
                    self.index.count -= 1;
                    self.index.sequence = IndexSequence::Unpadded;
                }
            }

            if self.index.count == 0 {
                return Ok(XzStatus::StreamEnd);
            }
        }
    }

    /// Adds the input consumed since `in_start` to the index size and CRC32.
    fn index_update(&mut self, b: &XzInOutBuffer, in_start: usize) {
        let span = b.input_span(in_start);
        self.index.size += span.len() as u64;
        self.index.crc32 = crc32(self.index.crc32, span);
    }
}

impl Default for XzDecoder {
    fn default() -> Self {
        Self::new()
    }
}
