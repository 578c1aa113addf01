// Wavbits
// Copyright (c) 2026 The Project Wavbits Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use log::warn;

/// A `TextSink` accepts textual output.
pub trait TextSink {
    /// Writes all of `text` to the sink.
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    /// Flushes any buffered text.
    fn flush_text(&mut self) -> io::Result<()>;
}

impl<W: io::Write> TextSink for W {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.write_all(text.as_bytes())
    }

    fn flush_text(&mut self) -> io::Result<()> {
        self.flush()
    }
}

/// `Tee` writes identical text to a primary sink and an optional mirror.
///
/// The primary sink is canonical: its errors are returned. The mirror is best-effort: after its
/// first error it is dropped with a warning and the primary sink continues alone.
pub struct Tee<A: TextSink, B: TextSink> {
    primary: A,
    mirror: Option<B>,
}

impl<A: TextSink, B: TextSink> Tee<A, B> {
    pub fn new(primary: A, mirror: Option<B>) -> Self {
        Tee { primary, mirror }
    }

    fn drop_mirror(&mut self, err: io::Error) {
        warn!("mirror output stopped: {}", err);
        self.mirror = None;
    }

    /// Unwraps the `Tee`, returning the primary sink and the mirror.
    pub fn into_inner(self) -> (A, Option<B>) {
        (self.primary, self.mirror)
    }
}

impl<A: TextSink, B: TextSink> TextSink for Tee<A, B> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        if let Some(Err(err)) = self.mirror.as_mut().map(|mirror| mirror.write_text(text)) {
            self.drop_mirror(err);
        }
        self.primary.write_text(text)
    }

    fn flush_text(&mut self) -> io::Result<()> {
        if let Some(Err(err)) = self.mirror.as_mut().map(|mirror| mirror.flush_text()) {
            self.drop_mirror(err);
        }
        self.primary.flush_text()
    }
}
