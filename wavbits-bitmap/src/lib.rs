// Wavbits
// Copyright (c) 2026 The Project Wavbits Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! A quantizer reducing 8-bit PCM to one bit per window of samples.
//!
//! The payload is read in fixed-size blocks. Each block is cut into non-overlapping windows, the
//! average of each window is compared against a threshold level, and the resulting bits are packed
//! least-significant bit first into bytes. The bytes are rendered as a C byte array.

use wavbits_core::errors::{option_error, threshold_error, Result};
use wavbits_core::io::ReadBytes;

use log::{debug, info, warn};

mod render;
mod sink;

pub use render::{ArrayWriter, ARRAY_FOOTER, ARRAY_HEADER, VALUES_PER_LINE};
pub use sink::{Tee, TextSink};

/// The default threshold level.
pub const DEFAULT_LEVEL: i32 = 128;
/// The default number of payload bytes processed as one block.
pub const DEFAULT_BLOCK_LEN: usize = 4444;
/// The default number of samples averaged into one bit.
pub const DEFAULT_WINDOW_LEN: usize = 11;

/// `QuantizeOptions` is the set of options the quantizer uses.
#[derive(Copy, Clone, Debug)]
pub struct QuantizeOptions {
    /// A window average strictly greater than the level produces a 1 bit. Must be within 0..=255.
    pub level: i32,
    /// The number of payload bytes in one block. A final partial block is never processed.
    pub block_len: usize,
    /// The number of samples in one window. The last window of a block is shortened if the block
    /// length is not a multiple of the window length.
    pub window_len: usize,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        QuantizeOptions {
            level: DEFAULT_LEVEL,
            block_len: DEFAULT_BLOCK_LEN,
            window_len: DEFAULT_WINDOW_LEN,
        }
    }
}

impl QuantizeOptions {
    /// Checks the options and returns the threshold as an unsigned sample value.
    pub fn validate(&self) -> Result<u32> {
        let threshold = match u8::try_from(self.level) {
            Ok(level) => u32::from(level),
            Err(_) => return threshold_error(self.level),
        };

        if self.block_len == 0 {
            return option_error("block length must be greater than 0");
        }

        if self.window_len == 0 {
            return option_error("window length must be greater than 0");
        }

        Ok(threshold)
    }

    /// Gets the number of bytes one complete block quantizes to. Bits left over at the end of a
    /// block that do not fill a byte are dropped.
    pub fn bytes_per_block(&self) -> usize {
        self.block_len.div_ceil(self.window_len) / 8
    }
}

/// `EncoderState` is the progress of a [`QuantizeEncoder`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncoderState {
    /// No payload has been scanned yet.
    Ready,
    /// The block with the given index is being scanned.
    Scanning(usize),
    /// The scan ran to completion.
    Done,
}

/// `EncodeSummary` accounts for one complete encode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EncodeSummary {
    /// The number of complete blocks processed.
    pub blocks: usize,
    /// The number of payload bytes consumed.
    pub bytes_consumed: u64,
    /// The number of packed bytes emitted.
    pub bytes_emitted: usize,
    /// True if a final partial block was left unprocessed.
    pub truncated_tail: bool,
}

/// Quantizes one block into packed bytes appended to `out`.
///
/// Bits are packed least-significant bit first: the first window of each group of eight sets
/// bit 0. A trailing group of less than eight windows is dropped.
pub fn quantize_block(block: &[u8], threshold: u32, window_len: usize, out: &mut Vec<u8>) {
    let mut bit: u32 = 1;
    let mut acc: u32 = 0;

    // The last window is clamped to the bytes left in the block, and averaged over that count.
    for window in block.chunks(window_len) {
        let sum: u64 = window.iter().map(|&s| u64::from(s)).sum();
        let avg = sum / window.len() as u64;

        if avg > u64::from(threshold) {
            acc |= bit;
        }

        bit <<= 1;

        if bit == 256 {
            out.push(acc as u8);
            bit = 1;
            acc = 0;
        }
    }
}

/// `QuantizeEncoder` reduces an 8-bit PCM payload to a packed bitmap and renders it to a
/// [`TextSink`].
pub struct QuantizeEncoder {
    opts: QuantizeOptions,
    threshold: u32,
    state: EncoderState,
}

impl QuantizeEncoder {
    pub fn try_new(opts: QuantizeOptions) -> Result<Self> {
        let threshold = opts.validate()?;
        Ok(QuantizeEncoder { opts, threshold, state: EncoderState::Ready })
    }

    pub fn state(&self) -> EncoderState {
        self.state
    }

    /// Quantizes `chunk_size` payload bytes from `reader`, which must be positioned on the first
    /// payload byte, and renders the result to `sink`.
    ///
    /// A read failure aborts the encode. Text already written to the sink is not rolled back.
    pub fn encode<B: ReadBytes, S: TextSink>(
        &mut self,
        reader: &mut B,
        chunk_size: u32,
        sink: &mut S,
    ) -> Result<EncodeSummary> {
        let block_len = self.opts.block_len;
        let n_blocks = chunk_size as usize / block_len;

        debug!(
            "quantizing {} blocks of {} bytes, window={}, level={}",
            n_blocks, block_len, self.opts.window_len, self.threshold
        );

        // A block can only be read if it fits in the payload, so the buffers are bounded by the
        // chunk size rather than by the configured block length.
        let (mut block, mut packed) = if n_blocks > 0 {
            (vec![0u8; block_len], Vec::with_capacity(self.opts.bytes_per_block()))
        }
        else {
            (Vec::new(), Vec::new())
        };

        let mut writer = ArrayWriter::begin(sink)?;

        for idx in 0..n_blocks {
            self.state = EncoderState::Scanning(idx);

            reader.read_buf_exact(&mut block)?;

            packed.clear();
            quantize_block(&block, self.threshold, self.opts.window_len, &mut packed);

            for &value in packed.iter() {
                writer.push(value)?;
            }
        }

        let bytes_emitted = writer.finish()?;
        self.state = EncoderState::Done;

        let bytes_consumed = (n_blocks * block_len) as u64;
        let truncated_tail = bytes_consumed < u64::from(chunk_size);

        if truncated_tail {
            warn!(
                "ignored the final {} payload bytes that do not fill a block",
                u64::from(chunk_size) - bytes_consumed
            );
        }

        info!("quantized {} bytes into {} bytes", bytes_consumed, bytes_emitted);

        Ok(EncodeSummary { blocks: n_blocks, bytes_consumed, bytes_emitted, truncated_tail })
    }
}
