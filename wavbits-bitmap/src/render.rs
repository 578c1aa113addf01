// Wavbits
// Copyright (c) 2026 The Project Wavbits Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use crate::sink::TextSink;

/// The line opening the array declaration.
pub const ARRAY_HEADER: &str = "const unsigned char sound[] = {\n";
/// The text closing the array declaration.
pub const ARRAY_FOOTER: &str = "\n};\n";
/// The number of values on each line of the array.
pub const VALUES_PER_LINE: usize = 11;

/// `ArrayWriter` renders bytes as the body of a C byte array: decimal literals separated by
/// commas, `VALUES_PER_LINE` to a line, each line starting with a tab.
///
/// Values are written as they are pushed. The separator for a value is only written once the next
/// value arrives, so the last value is never followed by a comma.
pub struct ArrayWriter<'a, S: TextSink> {
    sink: &'a mut S,
    count: usize,
}

impl<'a, S: TextSink> ArrayWriter<'a, S> {
    /// Writes the array header and returns a writer for the values.
    pub fn begin(sink: &'a mut S) -> io::Result<Self> {
        sink.write_text(ARRAY_HEADER)?;
        Ok(ArrayWriter { sink, count: 0 })
    }

    pub fn push(&mut self, value: u8) -> io::Result<()> {
        let col = self.count % VALUES_PER_LINE;

        if self.count > 0 {
            self.sink.write_text(if col == 0 { ",\n" } else { "," })?;
        }

        if col == 0 {
            self.sink.write_text("\t")?;
        }

        self.sink.write_text(&value.to_string())?;
        self.count += 1;
        Ok(())
    }

    /// Writes the array footer and flushes the sink. Returns the number of values written.
    pub fn finish(self) -> io::Result<usize> {
        self.sink.write_text(ARRAY_FOOTER)?;
        self.sink.flush_text()?;
        Ok(self.count)
    }
}
