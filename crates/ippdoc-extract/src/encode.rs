// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Attribute encoder -- the inverse of the scanner.
//
// Used to reproduce printer responses locally (`ippdoc wrap`), and by the
// tests and benches to build buffers.

use ippdoc_core::error::{IppdocError, Result};
use ippdoc_core::types::TAG_END_OF_ATTRIBUTES;

// ---------------------------------------------------------------------------
// IPP delimiter tags (RFC 8010 SS3.5.1)
// ---------------------------------------------------------------------------

/// Operation attributes group delimiter.
pub const TAG_OPERATION_ATTRIBUTES: u8 = 0x01;

/// Job attributes group delimiter.
pub const TAG_JOB_ATTRIBUTES: u8 = 0x02;

// ---------------------------------------------------------------------------
// IPP value tags (RFC 8010 SS3.5.2)
// ---------------------------------------------------------------------------

/// octetString with unspecified format.
pub const VALUE_TAG_OCTET_STRING: u8 = 0x30;

/// keyword (US-ASCII string).
pub const VALUE_TAG_KEYWORD: u8 = 0x44;

/// uri (US-ASCII string).
pub const VALUE_TAG_URI: u8 = 0x45;

/// charset (US-ASCII string, e.g. "utf-8").
pub const VALUE_TAG_CHARSET: u8 = 0x47;

/// naturalLanguage (US-ASCII string, e.g. "en").
pub const VALUE_TAG_NATURAL_LANGUAGE: u8 = 0x48;

/// mimeMediaType (US-ASCII string, e.g. "application/pdf").
pub const VALUE_TAG_MIME_MEDIA_TYPE: u8 = 0x49;

/// Builder for attribute buffers in the scanner's wire format.
#[derive(Debug, Default)]
pub struct AttributeWriter {
    buf: Vec<u8>,
}

impl AttributeWriter {
    /// Start a bare buffer: attributes with no message header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a full message with the 8-byte header.
    pub fn with_header(version: (u8, u8), status_code: u16, request_id: u32) -> Self {
        let mut buf = Vec::with_capacity(256);
        buf.push(version.0);
        buf.push(version.1);
        buf.extend_from_slice(&status_code.to_be_bytes());
        buf.extend_from_slice(&request_id.to_be_bytes());
        Self { buf }
    }

    /// Start a new attribute group.
    pub fn begin_group(&mut self, delimiter: u8) -> &mut Self {
        self.buf.push(delimiter);
        self
    }

    /// Write one attribute.
    ///
    /// Fails with `InvalidValue` when the name or value does not fit the
    /// 16-bit length field.
    pub fn attribute(&mut self, value_tag: u8, name: &str, value: &[u8]) -> Result<&mut Self> {
        let name_length = encoded_length("name", name.len())?;
        let value_length = encoded_length("value", value.len())?;

        self.buf.push(value_tag);
        self.buf.extend_from_slice(&name_length.to_be_bytes());
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(&value_length.to_be_bytes());
        self.buf.extend_from_slice(value);
        Ok(self)
    }

    /// Bytes written so far, without the end-of-attributes tag.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Finalise: write the end-of-attributes tag and return the bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.buf.push(TAG_END_OF_ATTRIBUTES);
        self.buf
    }
}

fn encoded_length(field: &str, len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| {
        IppdocError::InvalidValue(format!(
            "{field} is {len} bytes, the limit is {}",
            u16::MAX
        ))
    })
}

/// Build a `multipart/mixed` body (no outer headers) from
/// `(content_type, body)` pairs.
pub fn multipart_mixed(boundary: &str, parts: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (content_type, content) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
