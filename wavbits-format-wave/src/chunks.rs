// Wavbits
// Copyright (c) 2026 The Project Wavbits Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A four character chunk tag, as stored in the file.
pub type ChunkTag = [u8; 4];

/// The `RIFF` stream marker.
pub const RIFF_TAG: ChunkTag = *b"RIFF";
/// The `WAVE` RIFF form.
pub const WAVE_FORM: ChunkTag = *b"WAVE";
/// The tag of the format chunk. Note the trailing space.
pub const FMT_TAG: ChunkTag = *b"fmt ";
/// The tag of the fact chunk.
pub const FACT_TAG: ChunkTag = *b"fact";
/// The tag of the data chunk.
pub const DATA_TAG: ChunkTag = *b"data";

/// The format tag of uncompressed PCM.
pub const WAVE_FORMAT_PCM: u16 = 0x0001;

/// The length of the canonical format chunk body, excluding the extension size word.
pub(crate) const FMT_BODY_LEN: u32 = 16;
/// The length of the format chunk body including the extension size word.
pub(crate) const FMT_EXT_BODY_LEN: u32 = 18;
/// The length of the fact chunk body.
pub(crate) const FACT_BODY_LEN: u32 = 4;

#[cfg(feature = "serde")]
fn serialize_tag<S: serde::Serializer>(tag: &ChunkTag, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(tag))
}

/// `RiffHeader` is the 12 byte header opening every RIFF container.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RiffHeader {
    /// The stream marker. Always `RIFF`.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_tag"))]
    pub group_id: ChunkTag,
    /// The length of the whole file in bytes. The stored value counts from offset 8, this value
    /// has been corrected to include the first 8 bytes.
    pub file_length: u64,
    /// The RIFF form, usually `WAVE`.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_tag"))]
    pub riff_type: ChunkTag,
}

/// `FormatChunk` describes how the samples in the data chunk are encoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FormatChunk {
    /// The declared length of the chunk body.
    pub chunk_size: u32,
    /// The format tag. 1 if uncompressed PCM.
    pub format_tag: u16,
    /// The number of interleaved channels.
    pub channels: u16,
    /// The sample rate in Hz.
    pub samples_per_sec: u32,
    /// The average data rate in bytes per second.
    pub avg_bytes_per_sec: u32,
    /// The size of one audio frame across all channels in bytes.
    pub block_align: u16,
    /// The width of one sample in bits.
    pub bits_per_sample: u32,
    /// The length of the codec specific extension, if the chunk is long enough to declare one.
    pub extension_len: Option<u16>,
}

impl FormatChunk {
    /// Returns true if the samples are uncompressed PCM.
    pub fn is_pcm(&self) -> bool {
        self.format_tag == WAVE_FORMAT_PCM
    }

    /// Gets the number of bytes occupied by one sample on every channel, as implied by the sample
    /// width. Returns 0 for sample widths under 8 bits.
    pub fn frame_width(&self) -> u32 {
        (self.bits_per_sample / 8) * u32::from(self.channels)
    }
}

impl fmt::Display for FormatChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FormatChunk {{")?;
        writeln!(f, "\tformat_tag: {},", self.format_tag)?;
        writeln!(f, "\tchannels: {},", self.channels)?;
        writeln!(f, "\tsamples_per_sec: {} Hz,", self.samples_per_sec)?;
        writeln!(f, "\tavg_bytes_per_sec: {},", self.avg_bytes_per_sec)?;
        writeln!(f, "\tblock_align: {},", self.block_align)?;
        writeln!(f, "\tbits_per_sample: {},", self.bits_per_sample)?;
        writeln!(f, "}}")
    }
}

/// `FactChunk` carries the number of audio frames for compressed formats. It is optional.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FactChunk {
    /// The declared length of the chunk body.
    pub chunk_size: u32,
    /// The number of audio frames.
    pub num_samples: u32,
}

/// `DataChunk` locates the raw audio payload. Apart from the declared size, every field is
/// derived while reading rather than stored in the file.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DataChunk {
    /// The length of the raw audio payload in bytes.
    pub chunk_size: u32,
    /// The absolute stream offset of the first payload byte.
    pub file_position: u64,
    /// The number of audio frames. Taken from the fact chunk when one was read.
    pub num_samples: u32,
    /// The whole minutes of audio.
    pub minutes_length: u32,
    /// The seconds of audio remaining after the whole minutes.
    pub seconds_length: f64,
}

impl DataChunk {
    pub(crate) fn new(
        chunk_size: u32,
        file_position: u64,
        format: &FormatChunk,
        fact: Option<&FactChunk>,
    ) -> DataChunk {
        let num_samples = match fact {
            Some(fact) => fact.num_samples,
            None => chunk_size.checked_div(format.frame_width()).unwrap_or(0),
        };

        // The caller guarantees a non-zero data rate.
        let avg = format.avg_bytes_per_sec;

        let minutes_length = (chunk_size / avg) / 60;
        let seconds_length = f64::from(chunk_size) / f64::from(avg) - f64::from(minutes_length) * 60.0;

        DataChunk { chunk_size, file_position, num_samples, minutes_length, seconds_length }
    }

    /// Gets the total duration of the payload in seconds.
    pub fn duration_secs(&self) -> f64 {
        f64::from(self.minutes_length) * 60.0 + self.seconds_length
    }

    /// Gets the absolute stream offset one past the last payload byte.
    pub fn end_position(&self) -> u64 {
        self.file_position + u64::from(self.chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(bits_per_sample: u32, channels: u16, avg_bytes_per_sec: u32) -> FormatChunk {
        FormatChunk {
            chunk_size: 16,
            format_tag: WAVE_FORMAT_PCM,
            channels,
            samples_per_sec: 8000,
            avg_bytes_per_sec,
            block_align: channels * (bits_per_sample / 8) as u16,
            bits_per_sample,
            extension_len: None,
        }
    }

    #[test]
    fn verify_data_chunk_derivations() {
        // 150 seconds of 8-bit mono audio at 8 kHz.
        let fmt = format(8, 1, 8000);
        let data = DataChunk::new(1_200_000, 44, &fmt, None);

        assert_eq!(data.num_samples, 1_200_000);
        assert_eq!(data.minutes_length, 2);
        assert_eq!(data.seconds_length, 30.0);
        assert_eq!(data.duration_secs(), 150.0);
        assert_eq!(data.end_position(), 1_200_044);
    }

    #[test]
    fn verify_num_samples_prefers_fact() {
        let fmt = format(16, 2, 176_400);
        let fact = FactChunk { chunk_size: 4, num_samples: 1234 };

        assert_eq!(DataChunk::new(4000, 0, &fmt, None).num_samples, 1000);
        assert_eq!(DataChunk::new(4000, 0, &fmt, Some(&fact)).num_samples, 1234);
    }

    #[test]
    fn verify_sub_byte_samples_without_fact() {
        let fmt = format(4, 1, 4000);
        assert_eq!(fmt.frame_width(), 0);
        assert_eq!(DataChunk::new(4000, 0, &fmt, None).num_samples, 0);
    }
}
