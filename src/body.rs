//! Response body decoding.
//!
//! The body is read from a line source, so framing works on lines:
//!
//! * **Length delimited** – lines are appended (each followed by `\n`) until the
//!   accumulated body is at least `content-length` bytes.
//! * **Chunked** – a chunk size line is followed by that many *lines* of data
//!   and a blank terminator line. A size of `0` ends the body. This counts lines
//!   rather than bytes, since the source only hands out lines.
//! * **No body** – nothing is read.
//!
//! Running out of input before the framing is satisfied is not an error, the
//! body is then marked as truncated.

use std::fmt;

use crate::response::ParsedResponse;
use crate::transport::LineSource;
use crate::Error;

/// How the response body is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// No body is read.
    NoBody,
    /// `content-length` framing.
    LengthDelimited(u64),
    /// `transfer-encoding: chunked` framing.
    Chunked,
}

impl BodyMode {
    /// Select the framing for a response. Chunked wins over content-length.
    pub fn for_response(response: &ParsedResponse) -> Self {
        if response.is_chunked() {
            BodyMode::Chunked
        } else if response.has_content_length() {
            BodyMode::LengthDelimited(response.content_length())
        } else {
            BodyMode::NoBody
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dechunker {
    Size,
    Lines(u64),
    Terminator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Length(u64),
    Chunk(Dechunker),
    Ended,
}

/// Incremental body decoder, fed one line at a time.
pub struct BodyReader {
    mode: BodyMode,
    state: ReadState,
    body: String,
}

impl BodyReader {
    /// Create a reader for the given framing.
    pub fn new(mode: BodyMode) -> Self {
        let state = match mode {
            BodyMode::NoBody | BodyMode::LengthDelimited(0) => ReadState::Ended,
            BodyMode::LengthDelimited(n) => ReadState::Length(n),
            BodyMode::Chunked => ReadState::Chunk(Dechunker::Size),
        };

        BodyReader {
            mode,
            state,
            body: String::new(),
        }
    }

    /// The framing this reader decodes.
    pub fn body_mode(&self) -> BodyMode {
        self.mode
    }

    /// Tell if the framing is satisfied and no more lines are wanted.
    pub fn is_ended(&self) -> bool {
        self.state == ReadState::Ended
    }

    /// The body decoded so far.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Feed the next line. Lines after the end are ignored.
    pub fn push_line(&mut self, line: &str) {
        match self.state {
            ReadState::Ended => {}
            ReadState::Length(n) => {
                self.append(line);
                if self.body.len() as u64 >= n {
                    self.state = ReadState::Ended;
                }
            }
            ReadState::Chunk(d) => self.dechunk(d, line),
        }
    }

    fn dechunk(&mut self, d: Dechunker, line: &str) {
        match d {
            Dechunker::Size => {
                let size = parse_chunk_size(line);
                trace!("Chunk size: {}", size);

                self.state = if size == 0 {
                    ReadState::Ended
                } else {
                    ReadState::Chunk(Dechunker::Lines(size))
                };
            }
            Dechunker::Lines(left) => {
                self.append(line);
                self.state = if left == 1 {
                    ReadState::Chunk(Dechunker::Terminator)
                } else {
                    ReadState::Chunk(Dechunker::Lines(left - 1))
                };
            }
            Dechunker::Terminator => {
                if line.is_empty() {
                    self.state = ReadState::Chunk(Dechunker::Size);
                } else {
                    // Missing terminator, this line is the next size.
                    self.dechunk(Dechunker::Size, line);
                }
            }
        }
    }

    fn append(&mut self, line: &str) {
        self.body.push_str(line);
        self.body.push('\n');
    }

    /// Finish reading, for instance because the source ran out.
    pub fn finish(self) -> Decoded {
        let truncated = !self.is_ended();

        if truncated {
            debug!("Body ended before framing was satisfied: {:?}", self.mode);
        }

        Decoded {
            body: self.body,
            truncated,
        }
    }
}

/// Parse a chunk size line as hex, ignoring chunk extensions.
///
/// Anything unparsable is treated as `0`, which ends the body.
fn parse_chunk_size(line: &str) -> u64 {
    let mut buf = Vec::with_capacity(line.len() + 2);
    buf.extend_from_slice(line.as_bytes());
    buf.extend_from_slice(b"\r\n");

    match httparse::parse_chunk_size(&buf) {
        Ok(httparse::Status::Complete((_, size))) => size,
        _ => {
            debug!("Bad chunk size line, treat as 0: {:?}", line);
            0
        }
    }
}

/// A decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The decoded text.
    pub body: String,
    /// Whether the input ended before the framing was satisfied.
    pub truncated: bool,
}

/// Decode a body from `source` using the framing of `response`.
///
/// Only errors from the source fail this.
pub fn decode(response: &ParsedResponse, mut source: impl LineSource) -> Result<Decoded, Error> {
    let mut reader = BodyReader::new(BodyMode::for_response(response));

    while !reader.is_ended() {
        match source.read_line()? {
            Some(line) => reader.push_line(&line),
            None => break,
        }
    }

    Ok(reader.finish())
}

impl fmt::Debug for BodyReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyReader")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("len", &self.body.len())
            .finish()
    }
}
