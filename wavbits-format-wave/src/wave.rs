// Wavbits
// Copyright (c) 2026 The Project Wavbits Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use wavbits_core::errors::{malformed_error, unsupported_error, Result};

use log::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::chunks::*;
use crate::reader::ChunkReader;

/// `WaveFileBuilder` accumulates the chunks of a WAVE file as they are discovered. It becomes a
/// [`WaveFile`] once the data chunk is located.
#[derive(Debug)]
pub struct WaveFileBuilder {
    riff: RiffHeader,
    format: Option<FormatChunk>,
    fact: Option<FactChunk>,
}

impl WaveFileBuilder {
    pub fn new(riff: RiffHeader) -> Self {
        WaveFileBuilder { riff, format: None, fact: None }
    }

    pub fn with_format(self, format: FormatChunk) -> Self {
        if self.format.is_some() {
            warn!("replacing previously read fmt chunk");
        }
        WaveFileBuilder { format: Some(format), ..self }
    }

    pub fn with_fact(self, fact: FactChunk) -> Self {
        WaveFileBuilder { fact: Some(fact), ..self }
    }

    pub fn format(&self) -> Option<&FormatChunk> {
        self.format.as_ref()
    }

    pub fn fact(&self) -> Option<&FactChunk> {
        self.fact.as_ref()
    }

    /// Completes the file with its data chunk.
    pub fn build(self, data: DataChunk) -> Result<WaveFile> {
        let Some(format) = self.format
        else {
            return malformed_error("wav: missing format chunk");
        };

        Ok(WaveFile { riff: self.riff, format, fact: self.fact, data })
    }
}

/// `WaveFile` is the parsed header of a WAVE file: one of each chunk record, with an optional fact
/// chunk.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct WaveFile {
    riff: RiffHeader,
    format: FormatChunk,
    fact: Option<FactChunk>,
    data: DataChunk,
}

impl WaveFile {
    /// Reads chunks from `reader` until the data chunk is located. On success, the reader's
    /// cursor is left on the first payload byte.
    ///
    /// Parsing ends once the position after a chunk equals the declared end of the RIFF
    /// container. A chunk ending beyond it is a malformed container.
    pub fn read(reader: &mut ChunkReader) -> Result<WaveFile> {
        let riff = reader.read_riff_header()?;
        let mut builder = WaveFileBuilder::new(riff);

        while reader.position() < riff.file_length {
            let tag = reader.peek_chunk_tag()?;
            let body_start = reader.position() + 4;

            match tag {
                FMT_TAG => {
                    let format = reader.read_format_chunk()?;
                    reader.finish_chunk(body_start, format.chunk_size)?;
                    builder = builder.with_format(format);
                }
                FACT_TAG => {
                    let fact = reader.read_fact_chunk()?;
                    reader.finish_chunk(body_start, fact.chunk_size)?;
                    builder = builder.with_fact(fact);
                }
                DATA_TAG => {
                    let Some(format) = builder.format()
                    else {
                        return malformed_error("wav: data chunk precedes the fmt chunk");
                    };

                    let data = reader.read_data_chunk(format, builder.fact())?;

                    if data.end_position() > riff.file_length {
                        return malformed_error("wav: data chunk exceeds the riff length");
                    }

                    info!(
                        "located data chunk: pos={}, len={}, duration={:.3}s",
                        data.file_position,
                        data.chunk_size,
                        data.duration_secs()
                    );

                    return builder.build(data);
                }
                _ => {
                    debug!("skipping unknown chunk: tag={}", String::from_utf8_lossy(&tag));
                    reader.skip_chunk()?;
                }
            }

            if reader.position() > riff.file_length {
                return malformed_error("wav: chunk exceeds the riff length");
            }
        }

        malformed_error("wav: missing data chunk")
    }

    pub fn riff(&self) -> &RiffHeader {
        &self.riff
    }

    pub fn format(&self) -> &FormatChunk {
        &self.format
    }

    pub fn fact(&self) -> Option<&FactChunk> {
        self.fact.as_ref()
    }

    pub fn data(&self) -> &DataChunk {
        &self.data
    }

    /// Checks the samples are 8-bit uncompressed PCM, the only encoding that can be quantized.
    pub fn require_pcm8(&self) -> Result<()> {
        if !self.format.is_pcm() {
            return unsupported_error("wav: only uncompressed pcm can be quantized");
        }

        if self.format.bits_per_sample != 8 {
            return unsupported_error("wav: only 8-bit samples can be quantized");
        }

        if self.format.channels != 1 {
            warn!("{} channels will be quantized as one interleaved stream", self.format.channels);
        }

        Ok(())
    }

    /// Writes a canonical little-endian header for this file: the RIFF header, the fmt chunk, the
    /// fact chunk if present, and the data chunk header. The payload itself is not written.
    pub fn write_header<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        let fmt_len = match self.format.extension_len {
            Some(_) => FMT_EXT_BODY_LEN,
            None => FMT_BODY_LEN,
        };

        let fact_len = if self.fact.is_some() { 8 + FACT_BODY_LEN } else { 0 };

        // The stored RIFF length counts from offset 8.
        let riff_len = 4 + (8 + fmt_len) + fact_len + 8 + self.data.chunk_size;

        w.write_all(&self.riff.group_id)?;
        w.write_all(&riff_len.to_le_bytes())?;
        w.write_all(&self.riff.riff_type)?;

        w.write_all(&FMT_TAG)?;
        w.write_all(&fmt_len.to_le_bytes())?;
        w.write_all(&self.format.format_tag.to_le_bytes())?;
        w.write_all(&self.format.channels.to_le_bytes())?;
        w.write_all(&self.format.samples_per_sec.to_le_bytes())?;
        w.write_all(&self.format.avg_bytes_per_sec.to_le_bytes())?;
        w.write_all(&self.format.block_align.to_le_bytes())?;
        w.write_all(&(self.format.bits_per_sample as u16).to_le_bytes())?;

        // Codec specific extension bytes are never retained, so the extension is always empty.
        if self.format.extension_len.is_some() {
            w.write_all(&0u16.to_le_bytes())?;
        }

        if let Some(fact) = &self.fact {
            w.write_all(&FACT_TAG)?;
            w.write_all(&FACT_BODY_LEN.to_le_bytes())?;
            w.write_all(&fact.num_samples.to_le_bytes())?;
        }

        w.write_all(&DATA_TAG)?;
        w.write_all(&self.data.chunk_size.to_le_bytes())?;

        Ok(())
    }
}
