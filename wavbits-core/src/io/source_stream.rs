// Wavbits
// Copyright (c) 2026 The Project Wavbits Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;
use std::io::{BufReader, Read, Seek, SeekFrom};

use log::trace;

use super::{MediaSource, ReadBytes};

/// A `SourceStream` is the common `Read`er type for Wavbits. It wraps and hides the inner reader
/// from the consumer behind a read-ahead buffer, and keeps an exact count of the absolute stream
/// position so that chunk offsets can be recorded and re-seeked.
///
/// The stream exclusively owns its source. The source is released when the stream is dropped.
pub struct SourceStream {
    /// The buffered source reader.
    inner: BufReader<Box<dyn MediaSource>>,
    /// The total length of the source, if known when the stream was created.
    byte_len: Option<u64>,
    /// Absolute position of the stream.
    pos: u64,
}

impl SourceStream {
    pub fn new(source: Box<dyn MediaSource>) -> Self {
        let byte_len = source.byte_len();
        SourceStream { inner: BufReader::new(source), byte_len, pos: 0 }
    }

    /// Gets the total length of the source in bytes, if known.
    pub fn byte_len(&self) -> Option<u64> {
        self.byte_len
    }

    /// Gets the number of bytes between the current position and the end of the source, if the
    /// length of the source is known.
    pub fn remaining(&self) -> Option<u64> {
        self.byte_len.map(|len| len.saturating_sub(self.pos))
    }
}

impl Read for SourceStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.inner.read(buf)?;
        self.pos += len as u64;
        Ok(len)
    }
}

impl Seek for SourceStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        // The inner buffered reader accounts for any read-ahead when seeking relative to the
        // current position.
        let pos = match pos {
            SeekFrom::Current(0) => return Ok(self.pos),
            SeekFrom::Current(delta) => {
                self.inner.seek_relative(delta)?;
                self.pos.checked_add_signed(delta).ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "seek to a negative position")
                })?
            }
            _ => self.inner.seek(pos)?,
        };

        trace!("seek: {} -> {}", self.pos, pos);

        self.pos = pos;
        Ok(pos)
    }
}

impl ReadBytes for SourceStream {
    #[inline(always)]
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_buf_exact(&mut buf)?;
        Ok(buf[0])
    }

    #[inline(always)]
    fn read_double_bytes(&mut self) -> io::Result<[u8; 2]> {
        let mut buf = [0u8; 2];
        self.read_buf_exact(&mut buf)?;
        Ok(buf)
    }

    #[inline(always)]
    fn read_quad_bytes(&mut self) -> io::Result<[u8; 4]> {
        let mut buf = [0u8; 4];
        self.read_buf_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        // On a short read the position is left at wherever the inner reader stopped, which is
        // always at or before the end of the source.
        let mut read = 0;

        while read < buf.len() {
            match self.inner.read(&mut buf[read..]) {
                Ok(0) => {
                    self.pos += read as u64;
                    return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of stream"));
                }
                Ok(len) => read += len,
                Err(ref err) if err.kind() == io::ErrorKind::Interrupted => (),
                Err(err) => {
                    self.pos += read as u64;
                    return Err(err);
                }
            }
        }

        self.pos += read as u64;
        Ok(())
    }

    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        let delta = i64::try_from(count)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "ignore count too large"))?;
        self.seek(SeekFrom::Current(delta))?;
        Ok(())
    }

    fn pos(&self) -> u64 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Seek, SeekFrom};

    use super::{ReadBytes, SourceStream};

    fn stream(data: Vec<u8>) -> SourceStream {
        SourceStream::new(Box::new(Cursor::new(data)))
    }

    #[test]
    fn verify_read_tracks_position() {
        let mut ss = stream(vec![0x52, 0x49, 0x46, 0x46, 0x10, 0x00, 0x00, 0x00, 0x01, 0x00, 0xff]);

        assert_eq!(ss.byte_len(), Some(11));
        assert_eq!(&ss.read_quad_bytes().unwrap(), b"RIFF");
        assert_eq!(ss.pos(), 4);
        assert_eq!(ss.read_u32().unwrap(), 16);
        assert_eq!(ss.read_u16().unwrap(), 1);
        assert_eq!(ss.read_u8().unwrap(), 0xff);
        assert_eq!(ss.pos(), 11);
        assert_eq!(ss.remaining(), Some(0));
    }

    #[test]
    fn verify_short_read_is_eof() {
        let mut ss = stream(vec![1, 2, 3]);

        let err = ss.read_u32().unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
        assert_eq!(ss.pos(), 3);
    }

    #[test]
    fn verify_seek_and_ignore() {
        let data: Vec<u8> = (0..=255).collect();
        let mut ss = stream(data);

        ss.ignore_bytes(10).unwrap();
        assert_eq!(ss.pos(), 10);
        assert_eq!(ss.read_u8().unwrap(), 10);

        assert_eq!(ss.seek(SeekFrom::Current(-3)).unwrap(), 8);
        assert_eq!(ss.read_u8().unwrap(), 8);

        assert_eq!(ss.seek(SeekFrom::Start(200)).unwrap(), 200);
        assert_eq!(ss.read_u8().unwrap(), 200);
        assert_eq!(ss.remaining(), Some(55));
    }
}
