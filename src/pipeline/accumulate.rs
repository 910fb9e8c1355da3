//! Stream reassembly: fragments in, cumulative chunks out.
//!
//! [`Reassembler`] is the whole state machine. [`ChunkIter`] (blocking) and [`chunk_stream`]
//! (async) only move lines from the wire into it.

use crate::pipeline::decode::{classify_line, decode_frame, FrameDecode, SseLine};
use crate::types::events::StreamingChunk;
use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::{stream, StreamExt};
use std::io::BufRead;
use tracing::{debug, warn};

/// Reassembly progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReassemblyState {
    /// No data frame seen yet.
    Awaiting,
    /// At least one data frame seen.
    Accumulating,
    /// Finished chunk emitted; further input is ignored.
    Done,
}

/// Per-request accumulation buffer plus its state.
#[derive(Debug)]
pub struct Reassembler {
    buffer: String,
    state: ReassemblyState,
    frames: usize,
    fallbacks: usize,
}

impl Reassembler {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            state: ReassemblyState::Awaiting,
            frames: 0,
            fallbacks: 0,
        }
    }

    pub fn state(&self) -> ReassemblyState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ReassemblyState::Done
    }

    /// Text accumulated from decoded fragments so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Feed one line (without its `\n`). Returns the chunk to emit, if any.
    pub fn push_line(&mut self, line: &str) -> Option<StreamingChunk> {
        if self.is_done() {
            return None;
        }

        match classify_line(line) {
            SseLine::Blank | SseLine::Ignored => None,
            SseLine::Done => {
                self.state = ReassemblyState::Done;
                debug!(
                    frames = self.frames,
                    fallbacks = self.fallbacks,
                    text_len = self.buffer.len(),
                    "prediction stream finished"
                );
                Some(StreamingChunk::finished(self.buffer.clone()))
            }
            SseLine::Data(payload) => {
                self.frames += 1;
                self.state = ReassemblyState::Accumulating;
                match decode_frame(payload) {
                    FrameDecode::Fragment(fragment) => {
                        self.buffer.push_str(&fragment);
                        Some(StreamingChunk::partial(self.buffer.clone()))
                    }
                    // Raw frames are delivered as-is and never merged into the buffer.
                    FrameDecode::RawFallback(raw) => {
                        self.fallbacks += 1;
                        debug!(payload_len = raw.len(), "undecodable frame passed through raw");
                        Some(StreamingChunk::partial(raw))
                    }
                }
            }
        }
    }

    /// Input ended. Without a prior end marker this emits a synthetic finished chunk.
    pub fn finish(&mut self) -> Option<StreamingChunk> {
        if self.is_done() {
            return None;
        }
        warn!(
            frames = self.frames,
            text_len = self.buffer.len(),
            "prediction stream closed without end marker"
        );
        self.state = ReassemblyState::Done;
        Some(StreamingChunk::finished(self.buffer.clone()))
    }
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking adapter: pulls lines from a reader and yields chunks.
///
/// Dropping the iterator drops the reader, which for an HTTP body closes the connection.
pub struct ChunkIter<R> {
    reader: R,
    reassembler: Reassembler,
    line: Vec<u8>,
    failed: bool,
}

impl<R: BufRead> ChunkIter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            reassembler: Reassembler::new(),
            line: Vec::new(),
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for ChunkIter<R> {
    type Item = Result<StreamingChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed || self.reassembler.is_done() {
                return None;
            }

            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => return self.reassembler.finish().map(Ok),
                Ok(_) => {
                    let raw = self.line.strip_suffix(b"\n").unwrap_or(&self.line);
                    let text = String::from_utf8_lossy(raw);
                    if let Some(chunk) = self.reassembler.push_line(&text) {
                        return Some(Ok(chunk));
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(Error::Io(e)));
                }
            }
        }
    }
}

pub(super) struct StreamState {
    input: BoxStream<'static, Bytes>,
    pub(super) buf: Vec<u8>,
    /// Prefix of `buf` already known to hold no newline.
    pub(super) scanned: usize,
    reassembler: Reassembler,
    pub(super) eof: bool,
    failed: bool,
}

impl StreamState {
    pub(super) fn new(input: BoxStream<'static, Bytes>) -> Self {
        Self {
            input,
            buf: Vec::new(),
            scanned: 0,
            reassembler: Reassembler::new(),
            eof: false,
            failed: false,
        }
    }

    /// Next complete line; at EOF the unterminated tail counts as a line.
    pub(super) fn take_line(&mut self) -> Option<String> {
        let found = self.buf[self.scanned..].iter().position(|b| *b == b'\n');
        let end = match found {
            Some(idx) => self.scanned + idx + 1,
            None if self.eof && !self.buf.is_empty() => self.buf.len(),
            None => {
                self.scanned = self.buf.len();
                return None;
            }
        };
        self.scanned = 0;
        let raw: Vec<u8> = self.buf.drain(..end).collect();
        let raw = raw.strip_suffix(b"\n").unwrap_or(&raw);
        Some(String::from_utf8_lossy(raw).into_owned())
    }
}

/// Async adapter: turns a response byte stream into a chunk stream.
///
/// Suspends only while waiting for bytes. A transport error is yielded once and ends the
/// stream without a finished chunk.
pub fn chunk_stream(input: BoxStream<'static, Bytes>) -> BoxStream<'static, StreamingChunk> {
    let stream = stream::unfold(StreamState::new(input), |mut st| async move {
        loop {
            if st.failed || st.reassembler.is_done() {
                return None;
            }

            if let Some(line) = st.take_line() {
                if let Some(chunk) = st.reassembler.push_line(&line) {
                    return Some((Ok(chunk), st));
                }
                continue;
            }

            if st.eof {
                let chunk = st.reassembler.finish()?;
                return Some((Ok(chunk), st));
            }

            match st.input.next().await {
                Some(Ok(bytes)) => st.buf.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    st.failed = true;
                    return Some((Err(e), st));
                }
                None => st.eof = true,
            }
        }
    });

    Box::pin(stream)
}
