extern crate std;

use crate::buffer::XzInOutBuffer;
use crate::error::XzError;
use crate::stream::{XzDecoder, XzStatus};
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::num::NonZeroUsize;
use std::io::Read;

/// Default size of the internal input buffer.
const BUFFER_SIZE: usize = 8192;

/// Decompressing reader over an upstream byte source.
///
/// By default the reader is in multistream mode: the input may be a
/// concatenation of XZ streams, possibly separated by zero padding, and the
/// output is the concatenation of their payloads. With multistream disabled
/// the reader reports end-of-file at the first stream's end;
/// [`reset`](Self::reset) then prepares it for the next stream.
///
/// Errors are sticky. Plaintext decoded before a failure is always delivered
/// first; afterwards every `read` fails with the same error.
#[derive(Debug)]
pub struct XzReader<R: Read> {
    /// The pull decoder, boxed for its probability tables.
    decoder: Box<XzDecoder>,
    /// Upstream source of compressed bytes.
    upstream: R,
    /// Input buffer between the upstream and the decoder.
    buffer: Vec<u8>,
    /// Consumed bytes within `buffer`.
    consumed: usize,
    /// Valid bytes within `buffer`.
    filled: usize,
    /// The upstream has reported end-of-file.
    upstream_eof: bool,
    /// The decoder has delivered everything it will deliver.
    decoder_eof: bool,
    /// Zero bytes of stream padding consumed so far, once a stream ended.
    padding: Option<u64>,
    /// Concatenated streams are decoded transparently.
    multistream: bool,
    /// First error returned to the caller, repeated forever after.
    failed: Option<XzError>,
}

impl<R: Read> XzReader<R> {
    /// A reader with the default input buffer and dictionary cap.
    pub fn new(upstream: R) -> Self {
        Self::with_dict_max(upstream, 0)
    }

    /// A reader whose decoder allocates at most `dict_max` bytes of
    /// dictionary; zero selects the default cap.
    pub fn with_dict_max(upstream: R, dict_max: usize) -> Self {
        Self::with_buffer_size_and_decoder(
            upstream,
            NonZeroUsize::new(BUFFER_SIZE).expect("buffer size is non-zero"),
            Box::new(XzDecoder::with_dict_max(dict_max)),
        )
    }

    /// A reader with an explicit input-buffer size.
    pub fn with_buffer_size(upstream: R, buffer_size: NonZeroUsize) -> Self {
        Self::with_buffer_size_and_decoder(
            upstream,
            buffer_size,
            Box::new(XzDecoder::new()),
        )
    }

    /// A reader wrapping a caller-configured decoder.
    pub fn with_buffer_size_and_decoder(
        upstream: R,
        buffer_size: NonZeroUsize,
        decoder: Box<XzDecoder>,
    ) -> Self {
        Self {
            decoder,
            upstream,
            buffer: vec![0; buffer_size.into()],
            consumed: 0,
            filled: 0,
            upstream_eof: false,
            decoder_eof: false,
            padding: None,
            multistream: true,
            failed: None,
        }
    }

    /// Switches multistream mode on or off. Initially on.
    pub fn set_multistream(&mut self, multistream: bool) {
        self.multistream = multistream;
    }

    /// True while concatenated streams are decoded transparently.
    pub const fn multistream(&self) -> bool {
        self.multistream
    }

    /// Prepares the reader for a follow-on stream after it reported
    /// end-of-file in single-stream mode. Multistream mode is switched back
    /// on. A no-op before end-of-file.
    ///
    /// # Errors
    /// `UnexpectedEof` when the upstream is exhausted and no follow-on
    /// stream can exist.
    pub fn reset(&mut self) -> std::io::Result<()> {
        if !self.decoder_eof {
            return Ok(());
        }
        if self.upstream_eof && self.consumed == self.filled {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        }
        self.decoder_eof = false;
        self.multistream = true;
        Ok(())
    }

    /// Returns the upstream source and any buffered but unconsumed bytes.
    pub fn into_inner(mut self) -> (R, Vec<u8>) {
        if self.consumed != 0 {
            self.buffer.copy_within(self.consumed..self.filled, 0);
            self.filled -= self.consumed;
        }
        self.buffer.truncate(self.filled);
        (self.upstream, self.buffer)
    }

    /// Reads more compressed bytes when the buffer is empty and the
    /// upstream has not reported end-of-file yet.
    fn refill(&mut self) -> std::io::Result<()> {
        if self.consumed == self.filled && !self.upstream_eof {
            let count = self.upstream.read(&mut self.buffer)?;
            if count == 0 {
                self.upstream_eof = true;
            } else {
                self.consumed = 0;
                self.filled = count;
            }
        }
        Ok(())
    }

    /// Records `error` as sticky and converts it for the caller.
    fn fail(&mut self, error: XzError) -> std::io::Error {
        self.failed = Some(error.clone());
        std::io::Error::new(std::io::ErrorKind::InvalidData, error)
    }

    /// Consumes stream padding. Returns true once decoding should continue
    /// with the next stream, false when the caller should see end-of-file.
    fn finish_padding(&mut self) -> std::io::Result<Option<bool>> {
        let Some(padding) = self.padding.as_mut() else {
            return Ok(Some(true));
        };

        while self.consumed < self.filled && self.buffer[self.consumed] == 0 {
            self.consumed += 1;
            *padding += 1;
        }

        if self.consumed == self.filled {
            if !self.upstream_eof {
                // read more padding next loop iteration
                return Ok(None);
            }
            if *padding % 4 != 0 {
                return Err(self.fail(XzError::NoProgress));
            }
            self.padding = None;
            self.decoder_eof = true;
            return Ok(Some(false));
        }

        // a non-zero byte: the next stream begins here
        if *padding % 4 != 0 {
            return Err(self.fail(XzError::CorruptedData));
        }
        self.padding = None;
        self.decoder.reset();
        if !self.multistream {
            self.decoder_eof = true;
            return Ok(Some(false));
        }
        Ok(Some(true))
    }
}

impl<R: Read> Read for XzReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(error) = &self.failed {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                error.clone(),
            ));
        }
        if self.decoder_eof {
            return Ok(0);
        }

        loop {
            self.refill()?;

            match self.finish_padding()? {
                None => continue,
                Some(false) => return Ok(0),
                Some(true) => (),
            }

            let mut b = XzInOutBuffer::new(&self.buffer[self.consumed..self.filled], buf);
            let result = self.decoder.run(&mut b);
            let produced = b.output_position();
            self.consumed += b.input_position();

            match result {
                Ok(XzStatus::NeedMore) => {
                    if produced > 0 {
                        return Ok(produced);
                    }
                }
                Ok(XzStatus::StreamEnd) => {
                    self.padding = Some(0);
                    if produced > 0 {
                        return Ok(produced);
                    }
                }
                Err(error) => {
                    // hand over what was decoded before the failure; the
                    // stored error is reported from the next call on
                    if produced > 0 {
                        self.failed = Some(error);
                        return Ok(produced);
                    }
                    return Err(self.fail(error));
                }
            }
        }
    }
}
