// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for IPP response scanning and document extraction.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire constants (RFC 8010 SS3)
// ---------------------------------------------------------------------------

/// End-of-attributes-tag -- terminates the attribute section.
pub const TAG_END_OF_ATTRIBUTES: u8 = 0x03;

/// Tags `0x00..=0x0F` are group delimiters rather than value tags.
pub const MAX_DELIMITER_TAG: u8 = 0x0F;

/// Size of the fixed message header: version (2), status/operation (2),
/// request-id (4).
pub const MESSAGE_HEADER_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Scanner types
// ---------------------------------------------------------------------------

/// One tag/name/value unit read from a response buffer.
///
/// `value` borrows from the buffer being scanned; nothing is copied until a
/// document is extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRecord<'a> {
    /// The value tag preceding the record.
    pub tag: u8,
    /// Attribute name, lossily decoded as UTF-8.
    pub name: String,
    /// Raw value bytes.
    pub value: &'a [u8],
}

/// How the response buffer is framed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// The buffer starts directly with an attribute tag.
    #[default]
    Bare,
    /// The buffer is a complete IPP message: an 8-byte header followed by
    /// delimited attribute groups.
    Message,
}

impl FromStr for Framing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bare" => Ok(Self::Bare),
            "message" => Ok(Self::Message),
            other => Err(format!("unknown framing '{other}' (expected bare or message)")),
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare => f.write_str("bare"),
            Self::Message => f.write_str("message"),
        }
    }
}

/// Header of a full IPP message (only present with [`Framing::Message`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    /// (major, minor) protocol version.
    pub version: (u8, u8),
    /// Status code for responses, operation-id for requests.
    pub status_code: u16,
    /// Request-id echoed by the server.
    pub request_id: u32,
}

/// The declared field that ran past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TruncatedField {
    Header,
    NameLength,
    Name,
    ValueLength,
    Value,
}

impl fmt::Display for TruncatedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Header => "message header",
            Self::NameLength => "name-length",
            Self::Name => "name",
            Self::ValueLength => "value-length",
            Self::Value => "value",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Extraction results
// ---------------------------------------------------------------------------

/// A document pulled out of a response, detached from the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    /// Decoded body bytes.
    pub bytes: Vec<u8>,
    /// Declared content type of the body part, parameters included.
    pub content_type: Option<String>,
}

impl DocumentPayload {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the payload, keeping only the document bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Pipeline stage that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Walking the attribute records.
    Scan,
    /// Selecting the target attribute.
    Locate,
    /// Pulling the body part out of the multipart value.
    Mime,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan => f.write_str("scan"),
            Self::Locate => f.write_str("locate"),
            Self::Mime => f.write_str("mime"),
        }
    }
}

/// Diagnostic event recorded when extraction does not produce a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    /// Human-readable cause (the error's display text).
    pub reason: String,
    pub at: DateTime<Utc>,
}

impl Diagnostic {
    pub fn new(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
            at: Utc::now(),
        }
    }
}
