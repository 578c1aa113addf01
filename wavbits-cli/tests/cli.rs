use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn synthetic_wave(bits: u16, data_len: u32, payload: &[u8]) -> Vec<u8> {
    let mut buf = b"RIFF".to_vec();
    buf.extend_from_slice(&(36 + data_len).to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes());
    // A rate of 4444 Hz makes one block of 8-bit mono samples exactly one second long.
    buf.extend_from_slice(&4444u32.to_le_bytes());
    buf.extend_from_slice(&(4444 * u32::from(bits / 8)).to_le_bytes());
    buf.extend_from_slice(&(bits / 8).to_le_bytes());
    buf.extend_from_slice(&bits.to_le_bytes());
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_len.to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

fn wavbits(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wavbits"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run wavbits")
}

#[test]
fn converts_wave_to_array() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.wav"), synthetic_wave(8, 4444, &[0xff; 4444])).unwrap();

    let out = wavbits(dir.path(), &["in.wav", "-o", "out.h", "--info", "info.json"]);
    assert!(out.status.success());

    let array = fs::read_to_string(dir.path().join("out.h")).unwrap();
    assert!(array.starts_with("const unsigned char sound[] = {\n\t255,255,"));
    assert!(array.ends_with("255\n};\n"));
    assert_eq!(array.matches("255").count(), 50);

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("duration: 1.000s\n"));
    assert!(stdout.contains(&array));
    assert!(stdout.ends_with("Operation successful!\n"));

    let info: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("info.json")).unwrap()).unwrap();
    assert_eq!(info["riff"]["group_id"], "RIFF");
    assert_eq!(info["format"]["bits_per_sample"], 8);
    assert_eq!(info["data"]["file_position"], 44);
    assert!(info["fact"].is_null());
}

#[test]
fn no_echo_keeps_stdout_quiet() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.wav"), synthetic_wave(8, 4444, &[0; 4444])).unwrap();

    let out = wavbits(dir.path(), &["in.wav", "--no-echo", "--header-out", "header.bin"]);
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout, "duration: 1.000s\nOperation successful!\n");

    let header = fs::read(dir.path().join("header.bin")).unwrap();
    assert_eq!(header, synthetic_wave(8, 4444, &[]));
}

#[test]
fn rejects_invalid_level() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.wav"), synthetic_wave(8, 4444, &[0; 4444])).unwrap();

    let out = wavbits(dir.path(), &["in.wav", "--level", "256"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("invalid threshold"));
    assert_eq!(stderr.matches("level 256").count(), 1);
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "Operation failed.\n");
    assert!(!dir.path().join("sound.h").exists());
}

#[test]
fn oversized_block_len_emits_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.wav"), synthetic_wave(8, 100, &[0xff; 100])).unwrap();

    let block_len = usize::MAX.to_string();
    let out = wavbits(dir.path(), &["in.wav", "--no-echo", "--block-len", &block_len]);
    assert!(out.status.success());
    assert!(String::from_utf8(out.stdout).unwrap().ends_with("Operation successful!\n"));

    let array = fs::read_to_string(dir.path().join("sound.h")).unwrap();
    assert_eq!(array, "const unsigned char sound[] = {\n\n};\n");
}

#[test]
fn reports_unsupported_sample_width() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.wav"), synthetic_wave(16, 4444, &[0; 4444])).unwrap();

    let out = wavbits(dir.path(), &["in.wav"]);
    assert!(!out.status.success());
    assert!(String::from_utf8(out.stderr).unwrap().contains("only 8-bit samples"));
    assert!(!dir.path().join("sound.h").exists());
}

#[test]
fn reports_missing_input() {
    let dir = tempfile::tempdir().unwrap();

    let out = wavbits(dir.path(), &["missing.wav"]);
    assert!(!out.status.success());
    assert!(String::from_utf8(out.stderr).unwrap().contains("I/O error"));
}
