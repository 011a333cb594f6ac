// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Attribute scanner -- a single forward pass over an IPP response buffer.
//
// Each attribute is encoded as (RFC 8010 SS3.1.4):
//
// ```text
// value-tag:    1 byte
// name-length:  2 bytes (big-endian u16)
// name:         name-length bytes
// value-length: 2 bytes (big-endian u16)
// value:        value-length bytes
// ```
//
// The end-of-attributes tag (0x03) stops the scan.  Every length is checked
// against the bytes left before it is used, so a damaged buffer ends the
// sequence with `Truncated` instead of reading past the end.

use std::iter::FusedIterator;

use tracing::{debug, trace};

use ippdoc_core::error::{IppdocError, Result};
use ippdoc_core::types::{
    AttributeRecord, Framing, MAX_DELIMITER_TAG, MESSAGE_HEADER_LEN, MessageHeader,
    TAG_END_OF_ATTRIBUTES, TruncatedField,
};

/// Number of value bytes shown in log previews.
const PREVIEW_BYTES: usize = 16;

/// Where the scanner is in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// The 8-byte message header has not been read yet.
    Header,
    /// Positioned at a tag byte.
    Attributes,
    /// End-of-attributes, buffer exhaustion, or truncation was reached.
    Done,
}

/// Lazy iterator over the attribute records in a buffer.
///
/// Yields `Ok(record)` for every complete record, then either stops cleanly
/// or yields a single `Err(Truncated)`.  After that it only returns `None`.
/// Scanning again requires a new `Scanner`.
#[derive(Debug)]
pub struct Scanner<'a> {
    buf: &'a [u8],
    /// Cursor; never exceeds `buf.len()`.
    pos: usize,
    framing: Framing,
    state: ScanState,
    header: Option<MessageHeader>,
    emitted: usize,
}

/// Scan a bare attribute buffer (no message header).
pub fn scan(buf: &[u8]) -> Scanner<'_> {
    Scanner::new(buf, Framing::Bare)
}

impl<'a> Scanner<'a> {
    pub fn new(buf: &'a [u8], framing: Framing) -> Self {
        let state = match framing {
            Framing::Bare => ScanState::Attributes,
            Framing::Message => ScanState::Header,
        };
        Self {
            buf,
            pos: 0,
            framing,
            state,
            header: None,
            emitted: 0,
        }
    }

    /// Current cursor position.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// The message header, once read (only with [`Framing::Message`]).
    pub fn header(&self) -> Option<&MessageHeader> {
        self.header.as_ref()
    }

    /// Number of records yielded so far.
    pub fn records_emitted(&self) -> usize {
        self.emitted
    }

    pub fn is_finished(&self) -> bool {
        self.state == ScanState::Done
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Borrow the next `len` bytes and advance past them.
    fn take(&mut self, len: usize, field: TruncatedField) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if remaining < len {
            return Err(IppdocError::Truncated {
                field,
                offset: self.pos,
                needed: len,
                remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_length(&mut self, field: TruncatedField) -> Result<usize> {
        let bytes = self.take(2, field)?;
        Ok(usize::from(u16::from_be_bytes([bytes[0], bytes[1]])))
    }

    fn read_header(&mut self) -> Result<()> {
        let bytes = self.take(MESSAGE_HEADER_LEN, TruncatedField::Header)?;
        let header = MessageHeader {
            version: (bytes[0], bytes[1]),
            status_code: u16::from_be_bytes([bytes[2], bytes[3]]),
            request_id: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        };
        debug!(
            version_major = header.version.0,
            version_minor = header.version.1,
            status_code = header.status_code,
            request_id = header.request_id,
            "IPP message header"
        );
        self.header = Some(header);
        Ok(())
    }

    /// Run the state machine until one record is complete or the scan ends.
    fn step(&mut self) -> Result<Option<AttributeRecord<'a>>> {
        if self.state == ScanState::Header {
            self.read_header()?;
            self.state = ScanState::Attributes;
        }

        loop {
            let Some(&tag) = self.buf.get(self.pos) else {
                debug!(offset = self.pos, "buffer exhausted without end-of-attributes");
                return Ok(None);
            };
            self.pos += 1;

            if tag == TAG_END_OF_ATTRIBUTES {
                debug!(offset = self.pos - 1, "end of attributes reached");
                return Ok(None);
            }

            // Group delimiters have no name or value in a full message.
            if self.framing == Framing::Message && tag <= MAX_DELIMITER_TAG {
                trace!(tag, "attribute group");
                continue;
            }

            let name_length = self.read_length(TruncatedField::NameLength)?;
            let name = String::from_utf8_lossy(self.take(name_length, TruncatedField::Name)?)
                .into_owned();
            let value_length = self.read_length(TruncatedField::ValueLength)?;
            let value = self.take(value_length, TruncatedField::Value)?;

            trace!(
                tag,
                name = %name,
                value_length,
                preview = %value_preview(value),
                "attribute"
            );
            return Ok(Some(AttributeRecord { tag, name, value }));
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<AttributeRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == ScanState::Done {
            return None;
        }
        match self.step() {
            Ok(Some(record)) => {
                self.emitted += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.state = ScanState::Done;
                None
            }
            Err(e) => {
                self.state = ScanState::Done;
                debug!(error = %e, records = self.emitted, "scan aborted");
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Scanner<'_> {}

/// Upper-case hex of the first 16 value bytes, with `...` when cut off.
pub fn value_preview(value: &[u8]) -> String {
    if value.len() > PREVIEW_BYTES {
        format!("{}...", hex::encode_upper(&value[..PREVIEW_BYTES]))
    } else {
        hex::encode_upper(value)
    }
}
