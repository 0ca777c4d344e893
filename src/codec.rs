//! Binary event codec
//!
//! Every record is little-endian with no framing beyond its own fields:
//!
//! ```text
//! tag       : u8   (0 = start, 1 = stop)
//! timestamp : i64  epoch milliseconds
//! len       : u64  byte length of the text that follows
//! text      : [u8; len]  note (start) or exit code (stop)
//! ```
//!
//! There is no header, footer or magic number; a log file is the plain
//! concatenation of records.

use thiserror::Error;

use crate::event::{Event, EventTag};

const TAG_LEN: usize = 1;
const TIMESTAMP_LEN: usize = 8;
const TEXT_LEN_LEN: usize = 8;

/// Smallest possible encoded record (empty text)
pub const MIN_RECORD_LEN: usize = TAG_LEN + TIMESTAMP_LEN + TEXT_LEN_LEN;

/// Errors raised while decoding a single record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("record truncated: needed {needed} more bytes for {field}, {available} available")]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("unknown event tag {0:#04x}")]
    UnknownTag(u8),

    #[error("declared text length {declared} exceeds the {available} bytes left in the stream")]
    LengthOverflow { declared: u64, available: usize },
}

/// Encode one event into its on-disk representation
pub fn encode(event: &Event) -> Vec<u8> {
    let text = event.detail().as_bytes();
    let mut buf = Vec::with_capacity(MIN_RECORD_LEN + text.len());
    buf.push(event.tag().as_byte());
    buf.extend_from_slice(&event.timestamp_ms().to_le_bytes());
    buf.extend_from_slice(&(text.len() as u64).to_le_bytes());
    buf.extend_from_slice(text);
    buf
}

/// Sequential decoder over an in-memory byte stream
///
/// `next_event` returns `Ok(None)` only when the stream ends exactly on a
/// record boundary. A stream that ends inside a record, or whose declared
/// text length runs past the end of the data, is an error and the decoder
/// does not advance past the offending record.
#[derive(Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Byte offset of the next record to decode
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Decode the next record, or `None` at a clean end of stream
    pub fn next_event(&mut self) -> Result<Option<Event>, CodecError> {
        if self.remaining() == 0 {
            return Ok(None);
        }

        let mut cursor = self.pos;
        let tag_byte = take(self.buf, &mut cursor, TAG_LEN, "tag")?[0];
        let tag = EventTag::from_byte(tag_byte).ok_or(CodecError::UnknownTag(tag_byte))?;

        let timestamp_ms = i64::from_le_bytes(take_array(self.buf, &mut cursor, "timestamp")?);
        let declared = u64::from_le_bytes(take_array(self.buf, &mut cursor, "text length")?);

        let available = self.buf.len() - cursor;
        let text_len = usize::try_from(declared)
            .ok()
            .filter(|len| *len <= available)
            .ok_or(CodecError::LengthOverflow {
                declared,
                available,
            })?;
        let text = String::from_utf8_lossy(take(self.buf, &mut cursor, text_len, "text")?).into_owned();

        self.pos = cursor;
        Ok(Some(match tag {
            EventTag::Start => Event::Start {
                timestamp_ms,
                note: text,
            },
            EventTag::Stop => Event::Stop {
                timestamp_ms,
                exit_code: text,
            },
        }))
    }
}

/// Decode a single record from the front of `bytes`
pub fn decode(bytes: &[u8]) -> Result<Option<Event>, CodecError> {
    Decoder::new(bytes).next_event()
}

fn take<'a>(
    buf: &'a [u8],
    cursor: &mut usize,
    len: usize,
    field: &'static str,
) -> Result<&'a [u8], CodecError> {
    let available = buf.len() - *cursor;
    if len > available {
        return Err(CodecError::Truncated {
            field,
            needed: len,
            available,
        });
    }
    let slice = &buf[*cursor..*cursor + len];
    *cursor += len;
    Ok(slice)
}

fn take_array<const N: usize>(
    buf: &[u8],
    cursor: &mut usize,
    field: &'static str,
) -> Result<[u8; N], CodecError> {
    let mut out = [0u8; N];
    out.copy_from_slice(take(buf, cursor, N, field)?);
    Ok(out)
}
