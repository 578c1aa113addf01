// Wavbits Tool
// Copyright (c) 2026 The Project Wavbits Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]
// Justification: Fields on QuantizeOptions and ReaderOptions may change at any time, but the tool
// doesn't want to be updated every time those fields change, therefore always fill in the
// remaining fields with default values.
#![allow(clippy::needless_update)]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use wavbits_bitmap::{QuantizeEncoder, QuantizeOptions, Tee};
use wavbits_bitmap::{DEFAULT_BLOCK_LEN, DEFAULT_LEVEL, DEFAULT_WINDOW_LEN};
use wavbits_core::errors::Result;
use wavbits_format_wave::{ChunkReader, ReaderOptions, SkipStrategy, WaveFile};

use clap::Parser;
use log::{debug, info};

/// Convert 8-bit PCM WAVE audio into a one-bit-per-window C byte array
#[derive(Parser, Debug)]
#[command(name = "wavbits", version, author)]
struct Args {
    /// The input WAVE file path
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// The path of the generated C source file
    #[arg(short, long, default_value = "sound.h")]
    output: PathBuf,

    /// Window averages strictly above this level produce a 1 bit (0 to 255)
    #[arg(short, long, default_value_t = DEFAULT_LEVEL, allow_negative_numbers = true)]
    level: i32,

    /// The number of payload bytes quantized as one block
    #[arg(long, default_value_t = DEFAULT_BLOCK_LEN)]
    block_len: usize,

    /// The number of samples averaged into one bit
    #[arg(long, default_value_t = DEFAULT_WINDOW_LEN)]
    window_len: usize,

    /// Skip unknown chunks using their declared size plus padding, as per the RIFF specification
    #[arg(long)]
    conforming_skip: bool,

    /// Do not mirror the generated array to stdout
    #[arg(long)]
    no_echo: bool,

    /// Write the parsed WAVE header as JSON to this path
    #[arg(long, value_name = "PATH")]
    info: Option<PathBuf>,

    /// Write a canonical copy of the WAVE header to this path
    #[arg(long, value_name = "PATH")]
    header_out: Option<PathBuf>,
}

fn write_info(path: &Path, wave: &WaveFile) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut w, wave).map_err(io::Error::from)?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

fn write_header_copy(path: &Path, wave: &WaveFile) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    wave.write_header(&mut w)?;
    w.flush()?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let quantize_opts = QuantizeOptions {
        level: args.level,
        block_len: args.block_len,
        window_len: args.window_len,
        ..Default::default()
    };

    // Validate the options before touching any file.
    let mut encoder = QuantizeEncoder::try_new(quantize_opts)?;

    let skip = if args.conforming_skip { SkipStrategy::Conforming } else { SkipStrategy::Relative };
    let reader_opts = ReaderOptions { skip, ..Default::default() };

    let mut reader = ChunkReader::open_file(&args.input, reader_opts)?;
    let wave = WaveFile::read(&mut reader)?;

    debug!("{}", wave.format());

    if let Some(path) = &args.info {
        write_info(path, &wave)?;
        info!("wrote header info to {}", path.display());
    }

    if let Some(path) = &args.header_out {
        write_header_copy(path, &wave)?;
        info!("wrote header copy to {}", path.display());
    }

    wave.require_pcm8()?;

    println!("duration: {:.3}s", wave.data().duration_secs());

    let output = BufWriter::new(File::create(&args.output)?);
    let echo = if args.no_echo { None } else { Some(io::stdout().lock()) };

    let mut sink = Tee::new(output, echo);

    let summary =
        encoder.encode(reader.payload(wave.data())?, wave.data().chunk_size, &mut sink)?;

    info!(
        "wrote {} values to {} ({} of {} payload bytes used)",
        summary.bytes_emitted,
        args.output.display(),
        summary.bytes_consumed,
        wave.data().chunk_size
    );

    Ok(())
}

fn main() {
    pretty_env_logger::init();

    let args = Args::parse();

    let code = match run(&args) {
        Ok(()) => {
            println!("Operation successful!");
            0
        }
        Err(err) => {
            eprintln!("error: {} ({})", err, err.category());
            println!("Operation failed.");
            1
        }
    };

    std::process::exit(code)
}
