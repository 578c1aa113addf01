// Wavbits
// Copyright (c) 2026 The Project Wavbits Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! A reader for the chunks of a RIFF/WAVE container.
//!
//! [`ChunkReader`] decodes one chunk at a time and tracks byte offsets. [`WaveFile::read`] drives
//! it over a whole file and stops with the cursor on the first byte of the audio payload.

mod chunks;
mod reader;
mod wave;

pub use chunks::{
    ChunkTag, DataChunk, FactChunk, FormatChunk, RiffHeader, DATA_TAG, FACT_TAG, FMT_TAG, RIFF_TAG,
    WAVE_FORMAT_PCM, WAVE_FORM,
};
pub use reader::{ChunkReader, ReaderOptions, SkipStrategy};
pub use wave::{WaveFile, WaveFileBuilder};
