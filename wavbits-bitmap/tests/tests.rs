use std::io::Cursor;

use wavbits_bitmap::{QuantizeEncoder, QuantizeOptions, Tee};
use wavbits_core::errors::{Error, Result};
use wavbits_format_wave::{ChunkReader, WaveFile};

fn synthetic_wave(data_len: u32, payload: &[u8]) -> Vec<u8> {
    let mut buf = b"RIFF".to_vec();
    buf.extend_from_slice(&(36 + data_len).to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&1u16.to_le_bytes()); // Mono
    buf.extend_from_slice(&8000u32.to_le_bytes());
    buf.extend_from_slice(&8000u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes());
    buf.extend_from_slice(&8u16.to_le_bytes());
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_len.to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

fn run(file: Vec<u8>) -> (Result<()>, Vec<u8>, Vec<u8>) {
    let mut primary = Vec::new();
    let mut mirror = Vec::new();

    let result = (|| -> Result<()> {
        let mut reader = ChunkReader::new(Box::new(Cursor::new(file)), Default::default());
        let wave = WaveFile::read(&mut reader)?;
        wave.require_pcm8()?;

        let mut encoder = QuantizeEncoder::try_new(QuantizeOptions::default())?;
        let mut sink = Tee::new(&mut primary, Some(&mut mirror));
        encoder.encode(reader.payload(wave.data())?, wave.data().chunk_size, &mut sink)?;
        Ok(())
    })();

    (result, primary, mirror)
}

#[test]
fn alternating_payload_end_to_end() {
    let payload: Vec<u8> = (0..4444).map(|i| if i % 2 == 0 { 0x00 } else { 0xff }).collect();

    let (result, primary, mirror) = run(synthetic_wave(4444, &payload));
    result.unwrap();

    // Windows start on alternating parity: 5 of 11 bytes are 0xff on even starts (average 115),
    // 6 of 11 on odd starts (average 139). The bits alternate 0, 1, 0, 1, ... giving 0b10101010.
    let lines = [
        "170,170,170,170,170,170,170,170,170,170,170",
        "170,170,170,170,170,170,170,170,170,170,170",
        "170,170,170,170,170,170,170,170,170,170,170",
        "170,170,170,170,170,170,170,170,170,170,170",
        "170,170,170,170,170,170",
    ];

    let expected =
        format!("const unsigned char sound[] = {{\n\t{}\n}};\n", lines.join(",\n\t"));

    assert_eq!(String::from_utf8(primary.clone()).unwrap(), expected);
    assert_eq!(primary, mirror);
}

#[test]
fn oversized_data_chunk_writes_nothing() {
    let (result, primary, mirror) = run(synthetic_wave(2 * 4444, &[0x80; 4444]));

    match result {
        Err(Error::TruncatedFile(_)) => (),
        r => panic!("unexpected result {:?}", r),
    }

    assert!(primary.is_empty());
    assert!(mirror.is_empty());
}

#[test]
fn sixteen_bit_samples_are_unsupported() {
    let mut file = synthetic_wave(4444, &[0; 4444]);
    // Patch bits per sample.
    file[34] = 16;

    let (result, primary, _) = run(file);

    match result {
        Err(Error::Unsupported(_)) => (),
        r => panic!("unexpected result {:?}", r),
    }

    assert!(primary.is_empty());
}
