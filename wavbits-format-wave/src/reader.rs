// Wavbits
// Copyright (c) 2026 The Project Wavbits Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;

use wavbits_core::errors::{malformed_error, map_eof, truncated_error, Result};
use wavbits_core::io::{MediaSource, ReadBytes, SourceStream};

use log::{debug, warn};

use crate::chunks::*;

/// `SkipStrategy` selects how [`ChunkReader::skip_chunk`] moves past a chunk it does not
/// recognize.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SkipStrategy {
    /// The 4 bytes after the tag are a relative distance to the next chunk tag. No alignment
    /// padding is applied. This is the convention of the files the tool was built for, and is not
    /// conformant with RIFF.
    #[default]
    Relative,
    /// The 4 bytes after the tag are the declared chunk size, and odd sized chunks are followed by
    /// one pad byte, as per the RIFF specification.
    Conforming,
}

impl SkipStrategy {
    fn distance(&self, len: u32) -> u64 {
        match self {
            SkipStrategy::Relative => u64::from(len),
            SkipStrategy::Conforming => u64::from(len) + u64::from(len & 0x1),
        }
    }
}

/// `ReaderOptions` is a common set of options that all chunk readers use.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReaderOptions {
    /// How unrecognized chunks are skipped.
    pub skip: SkipStrategy,
}

/// `ChunkReader` is a sequential, offset-aware reader of the chunks in a RIFF container. It does
/// not assume any chunk order: the caller reads a tag with [`ChunkReader::peek_chunk_tag`] and
/// then dispatches to the matching `read_*` method, or to [`ChunkReader::skip_chunk`].
///
/// Every fixed-layout read that runs out of bytes fails with a truncated file error.
pub struct ChunkReader {
    stream: SourceStream,
    opts: ReaderOptions,
}

impl ChunkReader {
    /// Instantiate a `ChunkReader` over any seekable source.
    pub fn new(source: Box<dyn MediaSource>, opts: ReaderOptions) -> Self {
        ChunkReader { stream: SourceStream::new(source), opts }
    }

    /// Open the file at `path` for reading. The file is closed when the reader is dropped.
    pub fn open_file<P: AsRef<Path>>(path: P, opts: ReaderOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;

        debug!("opened {}", path.as_ref().display());

        Ok(ChunkReader::new(Box::new(file), opts))
    }

    /// Gets the current byte offset from the start of the file.
    pub fn position(&self) -> u64 {
        self.stream.pos()
    }

    /// Gets the length of the underlying file, if known.
    pub fn byte_len(&self) -> Option<u64> {
        self.stream.byte_len()
    }

    /// Reads the next 4 bytes as a chunk tag. The tag is consumed, the cursor is left on the first
    /// byte after it.
    pub fn peek_chunk_tag(&mut self) -> Result<ChunkTag> {
        self.stream.read_quad_bytes().map_err(|err| map_eof(err, "wav: chunk tag"))
    }

    /// Reads the 12 byte RIFF header at the start of the file.
    pub fn read_riff_header(&mut self) -> Result<RiffHeader> {
        let eof = |err| map_eof(err, "wav: riff header");

        let group_id = self.stream.read_quad_bytes().map_err(eof)?;
        let raw_len = self.stream.read_u32().map_err(eof)?;
        let riff_type = self.stream.read_quad_bytes().map_err(eof)?;

        if group_id != RIFF_TAG {
            return malformed_error("wav: missing riff stream marker");
        }

        // The stored length counts from offset 8 and must at least cover the RIFF form.
        if raw_len < 4 {
            return malformed_error("wav: invalid riff length");
        }

        if riff_type != WAVE_FORM {
            warn!("riff form is not wave ({})", String::from_utf8_lossy(&riff_type));
        }

        let file_length = u64::from(raw_len) + 8;

        if let Some(len) = self.byte_len() {
            if len != file_length {
                warn!("riff length ({}) differs from the file length ({})", file_length, len);
            }
        }

        Ok(RiffHeader { group_id, file_length, riff_type })
    }

    /// Reads the body of a format chunk, the tag having been consumed already.
    ///
    /// The 16 byte canonical body is always read. The 2 byte extension size word is read as well
    /// if the declared size covers it. Any codec specific bytes after that are left unread.
    pub fn read_format_chunk(&mut self) -> Result<FormatChunk> {
        let eof = |err| map_eof(err, "wav: fmt chunk");

        let chunk_size = self.stream.read_u32().map_err(eof)?;

        if chunk_size < FMT_BODY_LEN {
            return malformed_error("wav: fmt chunk is too short");
        }

        let format_tag = self.stream.read_u16().map_err(eof)?;
        let channels = self.stream.read_u16().map_err(eof)?;
        let samples_per_sec = self.stream.read_u32().map_err(eof)?;
        let avg_bytes_per_sec = self.stream.read_u32().map_err(eof)?;
        let block_align = self.stream.read_u16().map_err(eof)?;
        let bits_per_sample = u32::from(self.stream.read_u16().map_err(eof)?);

        let extension_len = if chunk_size >= FMT_EXT_BODY_LEN {
            Some(self.stream.read_u16().map_err(eof)?)
        }
        else {
            None
        };

        let format = FormatChunk {
            chunk_size,
            format_tag,
            channels,
            samples_per_sec,
            avg_bytes_per_sec,
            block_align,
            bits_per_sample,
            extension_len,
        };

        debug!("read fmt chunk: tag={}, channels={}, rate={}, bits={}",
            format_tag, channels, samples_per_sec, bits_per_sample);

        Ok(format)
    }

    /// Reads the body of a fact chunk, the tag having been consumed already.
    pub fn read_fact_chunk(&mut self) -> Result<FactChunk> {
        let eof = |err| map_eof(err, "wav: fact chunk");

        let chunk_size = self.stream.read_u32().map_err(eof)?;

        if chunk_size < FACT_BODY_LEN {
            return malformed_error("wav: fact chunk is too short");
        }

        let num_samples = self.stream.read_u32().map_err(eof)?;

        debug!("read fact chunk: num_samples={}", num_samples);

        Ok(FactChunk { chunk_size, num_samples })
    }

    /// Reads the size of a data chunk, the tag having been consumed already, and derives the
    /// remaining fields from the format and optional fact chunks.
    ///
    /// The payload is not consumed: the cursor is left exactly on the first payload byte.
    pub fn read_data_chunk(
        &mut self,
        format: &FormatChunk,
        fact: Option<&FactChunk>,
    ) -> Result<DataChunk> {
        let chunk_size =
            self.stream.read_u32().map_err(|err| map_eof(err, "wav: data chunk"))?;

        let file_position = self.position();

        if let Some(remaining) = self.stream.remaining() {
            if u64::from(chunk_size) > remaining {
                return truncated_error("wav: data chunk length exceeds the file length");
            }
        }

        if format.avg_bytes_per_sec == 0 {
            return malformed_error("wav: average bytes per second is 0");
        }

        let data = DataChunk::new(chunk_size, file_position, format, fact);

        debug!("read data chunk: len={}, pos={}", chunk_size, file_position);

        Ok(data)
    }

    /// Skips an unrecognized chunk, the tag having been consumed already. The next 4 bytes are
    /// read and the cursor is moved forward as chosen by the reader's [`SkipStrategy`].
    pub fn skip_chunk(&mut self) -> Result<()> {
        let len = self.stream.read_u32().map_err(|err| map_eof(err, "wav: chunk length"))?;

        let distance = self.opts.skip.distance(len);
        self.stream.ignore_bytes(distance)?;

        Ok(())
    }

    /// Advances past any bytes of a chunk left unread by a `read_*` method. `body_start` is the
    /// position just after the chunk's size field.
    pub fn finish_chunk(&mut self, body_start: u64, chunk_size: u32) -> Result<()> {
        let end = body_start + self.opts.skip.distance(chunk_size);
        let pos = self.position();

        if pos < end {
            debug!("ignoring {} trailing chunk bytes", end - pos);
            self.stream.ignore_bytes(end - pos)?;
        }

        Ok(())
    }

    /// Positions the cursor at the first payload byte of `data` and lends out the underlying
    /// stream for reading the payload.
    pub fn payload(&mut self, data: &DataChunk) -> Result<&mut SourceStream> {
        self.stream.seek(SeekFrom::Start(data.file_position))?;
        Ok(&mut self.stream)
    }
}
