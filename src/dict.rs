use crate::buffer::XzInOutBuffer;
use crate::error::XzError;
use crate::DICT_SIZE_MAX;
use alloc::vec;
use alloc::vec::Vec;

/// Sliding-window dictionary holding recently produced plaintext.
///
/// The buffer is circular: the write position wraps at the configured
/// dictionary size and match copies may read across the wrap point. `full`
/// is the valid-byte watermark, monotonic up to the dictionary size and
/// distinct from the write position. Output is staged here and flushed to
/// the caller's buffer in `[start, pos)` spans.
#[derive(Debug)]
pub struct DictBuffer {
    /// Backing allocation; grows lazily up to `max_size`.
    buf: Vec<u8>,
    /// Hard cap on the dictionary size this decoder may allocate.
    max_size: usize,
    /// First byte not yet flushed to the output buffer.
    start: usize,
    /// Write position.
    pos: usize,
    /// Dictionary size declared by the current block; the live prefix of `buf`.
    size: usize,
    /// Number of valid bytes, saturating at `size`.
    full: usize,
    /// Write limit for the current call, derived from the output space.
    limit: usize,
}

impl DictBuffer {
    /// A dictionary capped at `max_size` bytes. Nothing is allocated until a
    /// block declares its dictionary size.
    pub fn new(max_size: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_size: max_size.min(DICT_SIZE_MAX),
            start: 0,
            pos: 0,
            size: 0,
            full: 0,
            limit: 0,
        }
    }

    /// The configured cap.
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Makes sure `needed` bytes are allocated and sets the live size.
    pub fn alloc(&mut self, needed: usize) -> Result<(), XzError> {
        if self.buf.len() < needed {
            if needed > self.max_size {
                return Err(XzError::DictionaryTooLarge(needed as u64));
            }
            self.buf = vec![0; needed];
        }
        self.size = needed;
        Ok(())
    }

    /// Forgets all dictionary contents.
    pub fn reset(&mut self) {
        self.start = 0;
        self.pos = 0;
        self.full = 0;
        self.limit = 0;
    }

    /// Caps how far the write position may advance this call: the remaining
    /// output space, clamped to the end of the circular buffer.
    pub fn set_limit(&mut self, out_max: usize) {
        if self.size - self.pos <= out_max {
            self.limit = self.size;
        } else {
            self.limit = self.pos + out_max;
        }
    }

    /// True while the write position is below the current limit.
    pub const fn has_space(&self) -> bool {
        self.pos < self.limit
    }

    /// Current write position.
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// The byte `dist + 1` positions behind the write position, reading
    /// across the wrap point if needed. Zero for an empty dictionary.
    pub fn get(&self, dist: usize) -> u8 {
        if self.full == 0 {
            return 0;
        }
        if dist < self.pos {
            self.buf[self.pos - dist - 1]
        } else {
            self.buf[self.size + self.pos - dist - 1]
        }
    }

    /// Appends one byte at the write position.
    pub fn put(&mut self, byte: u8) {
        debug_assert!(self.pos < self.limit);
        self.buf[self.pos] = byte;
        self.pos += 1;
        if self.full < self.pos {
            self.full = self.pos;
        }
    }

    /// Copies up to `len` bytes of a match at zero-based distance `dist`.
    /// Returns the number of bytes actually copied, bounded by the limit; the
    /// caller keeps the remainder pending for the next call.
    pub fn repeat(&mut self, dist: usize, len: usize) -> Result<usize, XzError> {
        if dist >= self.full || dist >= self.size {
            return Err(XzError::MatchDistanceTooFar);
        }

        let count = (self.limit - self.pos).min(len);
        debug_assert!(count > 0);

        let mut back = if dist < self.pos {
            self.pos - dist - 1
        } else {
            self.size + self.pos - dist - 1
        };

        for _ in 0..count {
            self.buf[self.pos] = self.buf[back];
            self.pos += 1;
            back += 1;
            if back == self.size {
                back = 0;
            }
        }

        if self.full < self.pos {
            self.full = self.pos;
        }
        Ok(count)
    }

    /// Copies bytes of an uncompressed LZMA2 chunk through the dictionary
    /// into the output buffer. Returns how much of `left` is still pending.
    pub fn copy_uncompressed(&mut self, b: &mut XzInOutBuffer, mut left: usize) -> usize {
        while left > 0 && b.input_remaining() > 0 && b.output_remaining() > 0 {
            let copy_size = b
                .input_remaining()
                .min(b.output_remaining())
                .min(self.size - self.pos)
                .min(left);
            left -= copy_size;

            let pos = self.pos;
            self.buf[pos..pos + copy_size].copy_from_slice(&b.input_slice()[..copy_size]);
            self.pos += copy_size;
            if self.full < self.pos {
                self.full = self.pos;
            }
            if self.pos == self.size {
                self.pos = 0;
            }

            b.copy_in_to_out(copy_size);
            self.start = self.pos;
        }
        left
    }

    /// Flushes the unflushed span to the output buffer and returns its size.
    pub fn flush(&mut self, b: &mut XzInOutBuffer) -> usize {
        let copy_size = self.pos - self.start;
        if self.pos == self.size {
            self.pos = 0;
        }
        b.copy_to_output(&self.buf[self.start..self.start + copy_size]);
        self.start = self.pos;
        copy_size
    }
}
