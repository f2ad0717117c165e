/*
 *
 *  * Copyright (c) 2025 Couchbase, Inc.
 *  *
 *  * Licensed under the Apache License, Version 2.0 (the "License");
 *  * you may not use this file except in compliance with the License.
 *  * You may obtain a copy of the License at
 *  *
 *  *    http://www.apache.org/licenses/LICENSE-2.0
 *  *
 *  * Unless required by applicable law or agreed to in writing, software
 *  * distributed under the License is distributed on an "AS IS" BASIS,
 *  * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  * See the License for the specific language governing permissions and
 *  * limitations under the License.
 *
 */

/// Splits a newline-delimited byte stream into its non-blank lines.
///
/// Bytes are pushed as they arrive from the transport; a line is only
/// handed out once its terminating `\n` has been seen, or when the input
/// is finished. Segments made up only of ASCII whitespace are skipped.
#[derive(Debug, Default)]
pub(crate) struct JsonLineParser {
    buffer: Vec<u8>,
    // Start of the first line not yet handed out.
    start: usize,
    i: usize,
}

impl JsonLineParser {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.compact();
        self.buffer.extend(bytes);
    }

    pub(crate) fn next(&mut self) -> Option<Vec<u8>> {
        while let Some(pos) = self.buffer[self.i..].iter().position(|b| *b == b'\n') {
            let end = self.i + pos;
            let line_start = self.start;

            self.i = end + 1;
            self.start = self.i;

            if let Some(line) = Self::non_blank(&self.buffer[line_start..end]) {
                return Some(line);
            }
        }

        self.i = self.buffer.len();
        None
    }

    /// Hands out whatever is left once the input is exhausted.
    pub(crate) fn finish(&mut self) -> Option<Vec<u8>> {
        let rest = Self::non_blank(&self.buffer[self.start..]);

        self.buffer.clear();
        self.start = 0;
        self.i = 0;

        rest
    }

    /// Drops consumed lines, once per pushed frame rather than once per line.
    fn compact(&mut self) {
        if self.start == 0 {
            return;
        }

        self.buffer.drain(0..self.start);
        self.i -= self.start;
        self.start = 0;
    }

    fn non_blank(line: &[u8]) -> Option<Vec<u8>> {
        if line.iter().all(|b| b.is_ascii_whitespace()) {
            None
        } else {
            Some(line.to_vec())
        }
    }
}
