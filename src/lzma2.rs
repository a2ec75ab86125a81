use crate::buffer::XzInOutBuffer;
use crate::dict::DictBuffer;
use crate::error::XzError;
use crate::rc::{RangeDecoder, RcInput, IN_REQUIRED};
use crate::stream::XzStatus;

/// Size of the input spill buffer: enough for two worst-case symbols plus
/// the staging overlap.
const SPILL_SIZE: usize = 3 * IN_REQUIRED;

/// Offset of the short-distance probability trees inside the packed
/// distance table (distances 4..127).
const DIST_SPECIAL: usize = 256;

/// Offset of the four-bit align tree inside the packed distance table
/// (distances 128 and up).
const DIST_ALIGN: usize = 370;

/// What the LZMA2 framing expects next from the input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Sequence {
    /// The control byte: 0x00 ends the stream, 0x01/0x02 announce an
    /// uncompressed chunk (with/without dictionary reset), and bytes with
    /// the high bit set announce an LZMA chunk whose top bits select which
    /// state to reset and whose low five bits carry uncompressed-size bits.
    #[default]
    Control,
    /// Middle byte of the uncompressed size.
    Uncompressed1,
    /// Low byte of the uncompressed size.
    Uncompressed2,
    /// High byte of the compressed (or uncompressed-chunk) size.
    Compressed0,
    /// Low byte of that size.
    Compressed1,
    /// The lc/lp/pb properties byte.
    Properties,
    /// The five range-coder initialization bytes.
    LzmaPrepare,
    /// Decoding LZMA symbols.
    LzmaRun,
    /// Copying an uncompressed chunk through the dictionary.
    Copy,
}

/// Which kinds of LZMA symbols were seen most recently. The twelve states
/// drive every probability-table lookup; the names read oldest to newest,
/// `Rep` meaning any repeated match and `NonLit` any non-literal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum LzmaState {
    /// Two literals.
    #[default]
    LitLit,
    /// Match, then two literals.
    MatchLitLit,
    /// Repeated match, then two literals.
    RepLitLit,
    /// Short repeated match, then two literals.
    ShortRepLitLit,
    /// Match, then a literal.
    MatchLit,
    /// Repeated match, then a literal.
    RepLit,
    /// Short repeated match, then a literal.
    ShortRepLit,
    /// Literal, then a match.
    LitMatch,
    /// Literal, then a repeated match.
    LitLongRep,
    /// Literal, then a short repeated match.
    LitShortRep,
    /// Non-literal, then a match.
    NonLitMatch,
    /// Non-literal, then a repeated match.
    NonLitRep,
}

impl LzmaState {
    /// Numeric index into the per-state probability tables.
    const fn index(self) -> usize {
        match self {
            Self::LitLit => 0,
            Self::MatchLitLit => 1,
            Self::RepLitLit => 2,
            Self::ShortRepLitLit => 3,
            Self::MatchLit => 4,
            Self::RepLit => 5,
            Self::ShortRepLit => 6,
            Self::LitMatch => 7,
            Self::LitLongRep => 8,
            Self::LitShortRep => 9,
            Self::NonLitMatch => 10,
            Self::NonLitRep => 11,
        }
    }

    /// True while the most recent symbol is a literal.
    const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::LitLit
                | Self::MatchLitLit
                | Self::RepLitLit
                | Self::ShortRepLitLit
                | Self::MatchLit
                | Self::RepLit
                | Self::ShortRepLit
        )
    }

    /// Transition after a literal.
    const fn after_literal(self) -> Self {
        match self {
            Self::LitLit | Self::MatchLitLit | Self::RepLitLit | Self::ShortRepLitLit => {
                Self::LitLit
            }
            Self::MatchLit => Self::MatchLitLit,
            Self::RepLit => Self::RepLitLit,
            Self::ShortRepLit => Self::ShortRepLitLit,
            Self::LitMatch | Self::NonLitMatch => Self::MatchLit,
            Self::LitLongRep | Self::NonLitRep => Self::RepLit,
            Self::LitShortRep => Self::ShortRepLit,
        }
    }

    /// Transition after a normal match.
    const fn after_match(self) -> Self {
        if self.is_literal() {
            Self::LitMatch
        } else {
            Self::NonLitMatch
        }
    }

    /// Transition after a multi-byte repeated match.
    const fn after_long_rep(self) -> Self {
        if self.is_literal() {
            Self::LitLongRep
        } else {
            Self::NonLitRep
        }
    }

    /// Transition after a single-byte repeated match.
    const fn after_short_rep(self) -> Self {
        if self.is_literal() {
            Self::LitShortRep
        } else {
            Self::NonLitRep
        }
    }
}

/// Length coder: a choice bit splits 2..9 from longer lengths, a second
/// choice bit splits 10..17 from 18..273, each range with its own tree.
#[derive(Clone, Debug)]
struct LenDecoder {
    /// Length is in 2..=9 when this decodes to zero.
    choice: u16,
    /// Length is in 10..=17 when this decodes to zero, 18..=273 otherwise.
    choice2: u16,
    /// Per-pos-state trees for lengths 2..=9.
    low: [[u16; 8]; 16],
    /// Per-pos-state trees for lengths 10..=17.
    mid: [[u16; 8]; 16],
    /// Tree for lengths 18..=273.
    high: [u16; 256],
}

impl LenDecoder {
    /// All probabilities at the midpoint.
    const fn new() -> Self {
        Self {
            choice: 1024,
            choice2: 1024,
            low: [[1024; 8]; 16],
            mid: [[1024; 8]; 16],
            high: [1024; 256],
        }
    }

    /// Back to the midpoint.
    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// The adaptive state of the LZMA coder proper: recent distances, symbol
/// history, and every probability table.
#[derive(Clone, Debug)]
struct LzmaCoder {
    /// Most recent match distance, zero-based.
    rep0: u32,
    /// Second most recent match distance.
    rep1: u32,
    /// Third most recent match distance.
    rep2: u32,
    /// Fourth most recent match distance.
    rep3: u32,
    /// Bytes of the current match still to copy.
    len: usize,
    /// Symbol-history state.
    state: LzmaState,
    /// Number of literal context bits (lc).
    lc: u32,
    /// Mask of the literal position bits (lp).
    literal_pos_mask: u32,
    /// Mask of the position bits (pb).
    pos_mask: usize,
    /// Per state and position: is the next symbol a match?
    is_match: [[u16; 16]; 12],
    /// Per state: is a match repeated (distance among rep0..rep3)?
    is_rep: [u16; 12],
    /// Per state: zero selects rep0, one continues to `is_rep1`.
    is_rep0: [u16; 12],
    /// Per state: zero selects rep1, one continues to `is_rep2`.
    is_rep1: [u16; 12],
    /// Per state: zero selects rep2, one selects rep3.
    is_rep2: [u16; 12],
    /// Per state and position: is a rep0 match a single byte?
    is_rep0_long: [[u16; 16]; 12],
    /// Packed distance table: four 64-entry slot trees by length class,
    /// then the short-distance trees at [`DIST_SPECIAL`], then the align
    /// tree at [`DIST_ALIGN`].
    dist_slot: [u16; 386],
    /// Length coder for normal matches.
    match_len: LenDecoder,
    /// Length coder for repeated matches.
    rep_len: LenDecoder,
    /// Literal coders, selected by previous-byte and position bits.
    literal: [[u16; 768]; 16],
}

impl LzmaCoder {
    /// Fresh coder with every probability at the midpoint.
    const fn new() -> Self {
        Self {
            rep0: 0,
            rep1: 0,
            rep2: 0,
            rep3: 0,
            len: 0,
            state: LzmaState::LitLit,
            lc: 0,
            literal_pos_mask: 0,
            pos_mask: 0,
            is_match: [[1024; 16]; 12],
            is_rep: [1024; 12],
            is_rep0: [1024; 12],
            is_rep1: [1024; 12],
            is_rep2: [1024; 12],
            is_rep0_long: [[1024; 16]; 12],
            dist_slot: [1024; 386],
            match_len: LenDecoder::new(),
            rep_len: LenDecoder::new(),
            literal: [[1024; 768]; 16],
        }
    }

    /// Clears distances, history and probabilities; keeps lc/lp/pb.
    fn reset(&mut self) {
        self.rep0 = 0;
        self.rep1 = 0;
        self.rep2 = 0;
        self.rep3 = 0;
        self.len = 0;
        self.state = LzmaState::LitLit;
        self.is_match = [[1024; 16]; 12];
        self.is_rep = [1024; 12];
        self.is_rep0 = [1024; 12];
        self.is_rep1 = [1024; 12];
        self.is_rep2 = [1024; 12];
        self.is_rep0_long = [[1024; 16]; 12];
        self.dist_slot = [1024; 386];
        self.match_len.reset();
        self.rep_len.reset();
        for coder in &mut self.literal {
            coder.fill(1024);
        }
    }
}

/// LZMA2 decoder: parses the chunked framing and drives the range coder to
/// fill the dictionary, one output-limited slice per call.
#[derive(Debug)]
pub struct Lzma2Decoder {
    /// Range decoder shared by all probability lookups.
    rc: RangeDecoder,
    /// Current framing state.
    sequence: Sequence,
    /// Framing state after the size fields are read.
    next_sequence: Sequence,
    /// Uncompressed bytes remaining in the current chunk.
    uncompressed: usize,
    /// Compressed bytes remaining in the current chunk.
    compressed: usize,
    /// The next chunk must reset the dictionary (start of block).
    need_dict_reset: bool,
    /// The next LZMA chunk must carry a properties byte.
    need_props: bool,
    /// The LZMA coder state.
    lzma: LzmaCoder,
    /// Bytes currently staged in `spill`.
    spill_size: usize,
    /// Staging buffer for chunk tails shorter than a worst-case symbol, so
    /// the range coder never reads past the caller's input.
    spill: [u8; SPILL_SIZE],
}

impl Lzma2Decoder {
    /// A decoder waiting for its first block.
    pub fn new() -> Self {
        Self {
            rc: RangeDecoder::new(),
            sequence: Sequence::Control,
            next_sequence: Sequence::Control,
            uncompressed: 0,
            compressed: 0,
            need_dict_reset: false,
            need_props: false,
            lzma: LzmaCoder::new(),
            spill_size: 0,
            spill: [0; SPILL_SIZE],
        }
    }

    /// Configures the decoder from a block's dictionary-size property byte
    /// and prepares the dictionary. The first chunk must then reset it.
    pub fn begin_block(&mut self, dict_bits: u8, dict: &mut DictBuffer) -> Result<(), XzError> {
        if dict_bits > 39 {
            return Err(XzError::UnsupportedLzmaProperties(dict_bits));
        }
        let mut dict_size = 2 + usize::from(dict_bits & 1);
        dict_size <<= (dict_bits >> 1) + 11;
        if dict_size > dict.max_size() {
            return Err(XzError::DictionaryTooLarge(dict_size as u64));
        }
        dict.alloc(dict_size)?;

        self.sequence = Sequence::Control;
        self.need_dict_reset = true;
        self.spill_size = 0;
        Ok(())
    }

    /// Runs the framing state machine until it needs more input, more output
    /// space, or reaches the end marker of the LZMA2 stream.
    pub fn run(
        &mut self,
        b: &mut XzInOutBuffer,
        dict: &mut DictBuffer,
    ) -> Result<XzStatus, XzError> {
        loop {
            match self.sequence {
                Sequence::Control => {
                    let Some(control) = b.input_read_byte::<u8>() else {
                        return Ok(XzStatus::NeedMore);
                    };

                    if control == 0 {
                        return Ok(XzStatus::StreamEnd);
                    }

                    if control >= 0xE0 || control == 0x01 {
                        self.need_props = true;
                        self.need_dict_reset = false;
                        dict.reset();
                    } else if self.need_dict_reset {
                        return Err(XzError::LzmaDictionaryResetExpected);
                    }

                    if control < 0x80 {
                        if control > 0x02 {
                            return Err(XzError::CorruptedLzmaData);
                        }
                        self.sequence = Sequence::Compressed0;
                        self.next_sequence = Sequence::Copy;
                        continue;
                    }

                    self.uncompressed = usize::from(control & 0x1F) << 16;
                    self.sequence = Sequence::Uncompressed1;
                    if control >= 0xC0 {
                        self.need_props = false;
                        self.next_sequence = Sequence::Properties;
                    } else if self.need_props {
                        return Err(XzError::LzmaPropertiesMissing);
                    } else {
                        self.next_sequence = Sequence::LzmaPrepare;
                        if control >= 0xA0 {
                            self.reset_state();
                        }
                    }
                }
                Sequence::Uncompressed1 => {
                    let Some(byte) = b.input_read_byte::<usize>() else {
                        return Ok(XzStatus::NeedMore);
                    };
                    self.uncompressed += byte << 8;
                    self.sequence = Sequence::Uncompressed2;
                }
                Sequence::Uncompressed2 => {
                    let Some(byte) = b.input_read_byte::<usize>() else {
                        return Ok(XzStatus::NeedMore);
                    };
                    self.uncompressed += byte + 1;
                    self.sequence = Sequence::Compressed0;
                }
                Sequence::Compressed0 => {
                    let Some(byte) = b.input_read_byte::<usize>() else {
                        return Ok(XzStatus::NeedMore);
                    };
                    self.compressed = byte << 8;
                    self.sequence = Sequence::Compressed1;
                }
                Sequence::Compressed1 => {
                    let Some(byte) = b.input_read_byte::<usize>() else {
                        return Ok(XzStatus::NeedMore);
                    };
                    self.compressed += byte + 1;
                    self.sequence = self.next_sequence;
                }
                Sequence::Properties => {
                    let Some(byte) = b.input_read_byte::<u8>() else {
                        return Ok(XzStatus::NeedMore);
                    };
                    self.set_props(byte)?;
                    self.sequence = Sequence::LzmaPrepare;
                }
                Sequence::LzmaPrepare => {
                    if self.compressed < 5 {
                        return Err(XzError::CorruptedLzmaData);
                    }
                    if !self.rc.read_init(b)? {
                        return Ok(XzStatus::NeedMore);
                    }
                    self.compressed -= 5;
                    self.sequence = Sequence::LzmaRun;
                }
                Sequence::LzmaRun => {
                    let out_max = b.output_remaining().min(self.uncompressed);
                    dict.set_limit(out_max);

                    self.lzma_feed(b, dict)?;
                    self.uncompressed -= dict.flush(b);

                    if self.uncompressed == 0 {
                        if self.compressed > 0 || self.lzma.len > 0 || !self.rc.is_finished() {
                            return Err(XzError::CorruptedLzmaData);
                        }
                        self.rc.reset();
                        self.sequence = Sequence::Control;
                    } else if b.output_remaining() == 0
                        || (b.input_remaining() == 0 && self.spill_size < self.compressed)
                    {
                        return Ok(XzStatus::NeedMore);
                    }
                }
                Sequence::Copy => {
                    if b.input_remaining() == 0 {
                        return Ok(XzStatus::NeedMore);
                    }
                    self.compressed = dict.copy_uncompressed(b, self.compressed);
                    if self.compressed > 0 {
                        return Ok(XzStatus::NeedMore);
                    }
                    self.sequence = Sequence::Control;
                }
            }
        }
    }

    /// Resets the coder state and the range coder; used by chunk controls
    /// that request a state reset.
    fn reset_state(&mut self) {
        self.lzma.reset();
        self.rc.reset();
    }

    /// Decodes and applies the lc/lp/pb properties byte.
    fn set_props(&mut self, mut props: u8) -> Result<(), XzError> {
        if props > 224 {
            return Err(XzError::InvalidLzmaProperties);
        }

        let mut pb = 0usize;
        while props >= 45 {
            props -= 45;
            pb += 1;
        }
        self.lzma.pos_mask = (1 << pb) - 1;

        let mut lp = 0u32;
        while props >= 9 {
            props -= 9;
            lp += 1;
        }
        self.lzma.lc = u32::from(props);
        if self.lzma.lc + lp > 4 {
            return Err(XzError::InvalidLzmaProperties);
        }
        self.lzma.literal_pos_mask = (1u32 << lp) - 1;
        self.reset_state();
        Ok(())
    }

    /// Runs the symbol loop over the caller's input, staging through the
    /// spill buffer whenever fewer than a worst-case symbol's bytes remain.
    fn lzma_feed(&mut self, b: &mut XzInOutBuffer, dict: &mut DictBuffer) -> Result<(), XzError> {
        if self.spill_size > 0 || self.compressed == 0 {
            let take = (2 * IN_REQUIRED - self.spill_size)
                .min(self.compressed - self.spill_size)
                .min(b.input_remaining());
            self.spill[self.spill_size..self.spill_size + take]
                .copy_from_slice(&b.input_slice()[..take]);

            let limit;
            if self.spill_size + take == self.compressed {
                // the chunk ends inside the spill; zero padding keeps the
                // normalization reads in bounds
                self.spill[self.spill_size + take..].fill(0);
                limit = self.spill_size + take;
            } else if self.spill_size + take < IN_REQUIRED {
                self.spill_size += take;
                b.input_seek_add(take);
                return Ok(());
            } else {
                limit = self.spill_size + take - IN_REQUIRED;
            }

            let staged = self.spill;
            let mut input = RcInput::new(staged.as_slice(), 0, limit);
            self.lzma_main(&mut input, dict)?;
            let used = input.position();

            if used > self.spill_size + take {
                return Err(XzError::CorruptedLzmaData);
            }
            self.compressed -= used;
            if used < self.spill_size {
                self.spill_size -= used;
                self.spill.copy_within(used.., 0);
                return Ok(());
            }
            b.input_seek_add(used - self.spill_size);
            self.spill_size = 0;
        }

        if b.input_remaining() >= IN_REQUIRED {
            let limit = if b.input_remaining() >= self.compressed + IN_REQUIRED {
                b.input_position() + self.compressed
            } else {
                b.input().len() - IN_REQUIRED
            };
            let mut input = RcInput::new(b.input(), b.input_position(), limit);
            self.lzma_main(&mut input, dict)?;

            let used = input.position() - b.input_position();
            if used > self.compressed {
                return Err(XzError::CorruptedLzmaData);
            }
            self.compressed -= used;
            let position = input.position();
            b.input_seek_to(position);
        }

        if b.input_remaining() < IN_REQUIRED {
            let stash = b.input_remaining().min(self.compressed);
            self.spill[..stash].copy_from_slice(&b.input_slice()[..stash]);
            self.spill_size = stash;
            b.input_seek_add(stash);
        }
        Ok(())
    }

    /// Decodes symbols until the dictionary limit is reached or the input
    /// window cannot guarantee another worst-case symbol.
    fn lzma_main(&mut self, input: &mut RcInput, dict: &mut DictBuffer) -> Result<(), XzError> {
        if dict.has_space() && self.lzma.len > 0 {
            let copied = dict.repeat(self.lzma.rep0 as usize, self.lzma.len)?;
            self.lzma.len -= copied;
        }

        while dict.has_space() && !input.limit_exceeded() {
            let pos_state = dict.pos() & self.lzma.pos_mask;
            let index = self.lzma.state.index();

            if !self.rc.bit(&mut self.lzma.is_match[index][pos_state], input) {
                self.decode_literal(input, dict);
                continue;
            }

            if self.rc.bit(&mut self.lzma.is_rep[index], input) {
                self.decode_rep_match(pos_state, input);
            } else {
                self.decode_match(pos_state, input);
            }

            let copied = dict.repeat(self.lzma.rep0 as usize, self.lzma.len)?;
            self.lzma.len -= copied;
        }

        self.rc.normalize(input);
        Ok(())
    }

    /// Index of the literal coder for the current position and previous byte.
    fn literal_probs_index(&self, dict: &DictBuffer) -> usize {
        let prev = u32::from(dict.get(0));
        let low = prev >> (8 - self.lzma.lc);
        let high = ((dict.pos() & self.lzma.literal_pos_mask as usize) << self.lzma.lc) as u32;
        (low + high) as usize
    }

    /// Decodes one literal byte into the dictionary.
    fn decode_literal(&mut self, input: &mut RcInput, dict: &mut DictBuffer) {
        let coder = self.literal_probs_index(dict);

        if self.lzma.state.is_literal() {
            let probs = &mut self.lzma.literal[coder][..0x100];
            let symbol = self.rc.bittree(probs, input);
            dict.put(symbol as u8);
        } else {
            // after a match the predicted byte at rep0 steers the tree until
            // the decoded byte diverges from it
            let mut symbol: u32 = 1;
            let mut match_byte = u32::from(dict.get(self.lzma.rep0 as usize)) << 1;
            let mut offset: u32 = 0x100;
            loop {
                let match_bit = match_byte & offset;
                match_byte <<= 1;
                let i = (offset + match_bit + symbol) as usize;
                if self.rc.bit(&mut self.lzma.literal[coder][i], input) {
                    symbol = (symbol << 1) | 1;
                    offset &= match_bit;
                } else {
                    symbol <<= 1;
                    offset &= !match_bit;
                }
                if symbol >= 0x100 {
                    break;
                }
            }
            dict.put(symbol as u8);
        }

        self.lzma.state = self.lzma.state.after_literal();
    }

    /// Decodes a match length into `self.lzma.len`.
    fn decode_len(&mut self, is_rep: bool, pos_state: usize, input: &mut RcInput) {
        let coder = if is_rep {
            &mut self.lzma.rep_len
        } else {
            &mut self.lzma.match_len
        };

        let probs: &mut [u16];
        if !self.rc.bit(&mut coder.choice, input) {
            probs = coder.low[pos_state].as_mut_slice();
            self.lzma.len = 2;
        } else if !self.rc.bit(&mut coder.choice2, input) {
            probs = coder.mid[pos_state].as_mut_slice();
            self.lzma.len = 2 + 8;
        } else {
            probs = coder.high.as_mut_slice();
            self.lzma.len = 2 + 8 + 8;
        }

        let tree_size = probs.len();
        self.lzma.len += self.rc.bittree(probs, input) as usize - tree_size;
    }

    /// Decodes a normal match: length, then a distance slot, then the
    /// distance tail bits. The distance lands in rep0, zero-based.
    fn decode_match(&mut self, pos_state: usize, input: &mut RcInput) {
        self.lzma.state = self.lzma.state.after_match();
        self.lzma.rep3 = self.lzma.rep2;
        self.lzma.rep2 = self.lzma.rep1;
        self.lzma.rep1 = self.lzma.rep0;

        self.decode_len(false, pos_state, input);

        let dist_state = if self.lzma.len < 6 { self.lzma.len - 2 } else { 3 };
        let slot_probs = &mut self.lzma.dist_slot[dist_state * 64..dist_state * 64 + 64];
        let dist_slot = self.rc.bittree(slot_probs, input) - 64;

        if dist_slot < 4 {
            self.lzma.rep0 = dist_slot;
            return;
        }

        let tail_bits = (dist_slot >> 1) - 1;
        self.lzma.rep0 = 2 + (dist_slot & 1);

        if dist_slot < 14 {
            self.lzma.rep0 <<= tail_bits;
            let base = DIST_SPECIAL + self.lzma.rep0 as usize - dist_slot as usize - 1;
            let probs = &mut self.lzma.dist_slot[base..];
            self.lzma.rep0 = self
                .rc
                .bittree_reverse(probs, self.lzma.rep0, tail_bits, input);
        } else {
            self.lzma.rep0 = self.rc.direct(self.lzma.rep0, tail_bits - 4, input) << 4;
            let probs = &mut self.lzma.dist_slot[DIST_ALIGN..];
            self.lzma.rep0 = self.rc.bittree_reverse(probs, self.lzma.rep0, 4, input);
        }
    }

    /// Decodes a repeated match, rotating rep0..rep3 as needed. A short rep
    /// leaves a one-byte length; everything else goes through the rep length
    /// coder.
    fn decode_rep_match(&mut self, pos_state: usize, input: &mut RcInput) {
        let index = self.lzma.state.index();

        if !self.rc.bit(&mut self.lzma.is_rep0[index], input) {
            if !self.rc.bit(&mut self.lzma.is_rep0_long[index][pos_state], input) {
                self.lzma.state = self.lzma.state.after_short_rep();
                self.lzma.len = 1;
                return;
            }
        } else {
            let distance;
            if !self.rc.bit(&mut self.lzma.is_rep1[index], input) {
                distance = self.lzma.rep1;
            } else {
                if !self.rc.bit(&mut self.lzma.is_rep2[index], input) {
                    distance = self.lzma.rep2;
                } else {
                    distance = self.lzma.rep3;
                    self.lzma.rep3 = self.lzma.rep2;
                }
                self.lzma.rep2 = self.lzma.rep1;
            }
            self.lzma.rep1 = self.lzma.rep0;
            self.lzma.rep0 = distance;
        }

        self.lzma.state = self.lzma.state.after_long_rep();
        self.decode_len(true, pos_state, input);
    }
}

impl Default for Lzma2Decoder {
    fn default() -> Self {
        Self::new()
    }
}
