// Wavbits
// Copyright (c) 2026 The Project Wavbits Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error;
use std::fmt;
use std::io;
use std::result;

/// `Error` provides an enumeration of all possible errors reported by Wavbits.
#[derive(Debug)]
pub enum Error {
    /// An IO error occured while opening, reading, or seeking the stream.
    IoError(std::io::Error),
    /// A fixed-layout structure, or a declared payload, ran past the end of the available bytes.
    TruncatedFile(&'static str),
    /// The container's chunk bookkeeping is inconsistent and could not be parsed.
    MalformedContainer(&'static str),
    /// The container is well formed but uses a feature that cannot be processed.
    Unsupported(&'static str),
    /// The quantization threshold is outside the range of an 8-bit sample.
    ThresholdConfig(i32),
    /// A configuration option has a value that can never produce output.
    InvalidOption(&'static str),
}

impl Error {
    /// Gets a short, human-readable name for the category of the error.
    pub fn category(&self) -> &'static str {
        match *self {
            Error::IoError(_) => "I/O error",
            Error::TruncatedFile(_) => "truncated file",
            Error::MalformedContainer(_) => "malformed container",
            Error::Unsupported(_) => "unsupported",
            Error::ThresholdConfig(_) => "invalid threshold",
            Error::InvalidOption(_) => "invalid option",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => {
                write!(f, "I/O error: {}", err)
            }
            Error::TruncatedFile(msg) => {
                write!(f, "truncated file: {}", msg)
            }
            Error::MalformedContainer(msg) => {
                write!(f, "malformed container: {}", msg)
            }
            Error::Unsupported(feature) => {
                write!(f, "unsupported feature: {}", feature)
            }
            Error::ThresholdConfig(level) => {
                write!(f, "invalid threshold: level {} is outside 0..=255", level)
            }
            Error::InvalidOption(msg) => {
                write!(f, "invalid option: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create a truncated file error.
pub fn truncated_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::TruncatedFile(desc))
}

/// Convenience function to create a malformed container error.
pub fn malformed_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::MalformedContainer(desc))
}

/// Convenience function to create an unsupport feature error.
pub fn unsupported_error<T>(feature: &'static str) -> Result<T> {
    Err(Error::Unsupported(feature))
}

/// Convenience function to create a threshold configuration error.
pub fn threshold_error<T>(level: i32) -> Result<T> {
    Err(Error::ThresholdConfig(level))
}

/// Convenience function to create an invalid option error.
pub fn option_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::InvalidOption(desc))
}

/// Maps an unexpected end-of-file raised while reading a fixed layout to a truncated file error.
/// All other IO errors are passed through unchanged.
pub fn map_eof(err: io::Error, desc: &'static str) -> Error {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => Error::TruncatedFile(desc),
        _ => Error::IoError(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_eof_maps_to_truncated() {
        let err = io::Error::new(io::ErrorKind::UnexpectedEof, "end of stream");

        match map_eof(err, "fmt chunk") {
            Error::TruncatedFile("fmt chunk") => (),
            e => panic!("unexpected error {:?}", e),
        }

        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");

        match map_eof(err, "fmt chunk") {
            Error::IoError(err) => assert_eq!(err.kind(), io::ErrorKind::PermissionDenied),
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn verify_categories() {
        assert_eq!(Error::ThresholdConfig(300).category(), "invalid threshold");
        assert_eq!(Error::TruncatedFile("x").category(), "truncated file");
        assert_eq!(
            Error::ThresholdConfig(-1).to_string(),
            "invalid threshold: level -1 is outside 0..=255"
        );
    }
}
