// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MIME extractor -- pulls one body part out of a multipart attribute value.
//
// The value carries a bare multipart body with no outer headers, so the
// boundary is taken from the first delimiter line (`--boundary`) and handed
// to `mail-parser` inside a synthetic `multipart/mixed` header.  Anything
// before that line is preamble.

use mail_parser::{MessageParser, MessagePart, MimeHeaders, PartType};
use tracing::{debug, trace};

use ippdoc_core::error::{IppdocError, Result};
use ippdoc_core::types::DocumentPayload;

/// RFC 2046 SS5.1.1 limit on boundary length.
const MAX_BOUNDARY_LEN: usize = 70;

/// Type assumed for a part that declares none (RFC 2046 SS5.1).
const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Return the first top-level body part whose declared content type starts
/// with `content_type_prefix` (ASCII case-insensitive).
///
/// The payload holds the decoded body; transfer encodings are undone.
pub fn extract(value: &[u8], content_type_prefix: &str) -> Result<DocumentPayload> {
    let boundary = detect_boundary(value)?;
    debug!(boundary = %boundary, value_len = value.len(), "multipart boundary detected");

    let mut message = Vec::with_capacity(value.len() + boundary.len() + 64);
    message.extend_from_slice(b"MIME-Version: 1.0\r\nContent-Type: multipart/mixed; boundary=\"");
    message.extend_from_slice(boundary.as_bytes());
    message.extend_from_slice(b"\"\r\n\r\n");
    message.extend_from_slice(value);

    let parsed = MessageParser::default()
        .parse(message.as_slice())
        .ok_or_else(|| IppdocError::MimeParse("value is not a MIME message".into()))?;

    let root = parsed
        .parts
        .first()
        .ok_or_else(|| IppdocError::MimeParse("message has no body".into()))?;
    let PartType::Multipart(part_ids) = &root.body else {
        return Err(IppdocError::MimeParse("body is not multipart".into()));
    };
    if part_ids.is_empty() {
        return Err(IppdocError::MimeParse(format!(
            "no body parts delimited by '--{boundary}'"
        )));
    }

    for (index, &id) in part_ids.iter().enumerate() {
        let Some(part) = parsed.parts.get(id) else {
            continue;
        };
        let content_type = declared_content_type(part);
        trace!(
            index,
            content_type = %content_type,
            size = part.contents().len(),
            "body part"
        );

        if starts_with_ignore_ascii_case(&content_type, content_type_prefix) {
            debug!(index, content_type = %content_type, "matching body part found");
            return Ok(DocumentPayload {
                bytes: part.contents().to_vec(),
                content_type: Some(content_type),
            });
        }
    }

    Err(IppdocError::ContentTypeNotFound(content_type_prefix.to_string()))
}

/// Find the boundary named by the first line that starts with `--`.
fn detect_boundary(value: &[u8]) -> Result<String> {
    for line in value.split(|&b| b == b'\n') {
        let Some(rest) = line.strip_prefix(b"--") else {
            continue;
        };
        let boundary = rest.trim_ascii_end();
        if boundary.is_empty() {
            continue;
        }
        if boundary.len() > MAX_BOUNDARY_LEN {
            return Err(IppdocError::MimeParse(format!(
                "boundary is {} bytes, the limit is {MAX_BOUNDARY_LEN}",
                boundary.len()
            )));
        }
        if !boundary
            .iter()
            .all(|&b| b == b' ' || (b.is_ascii_graphic() && b != b'"'))
        {
            return Err(IppdocError::MimeParse(
                "boundary contains characters that cannot be quoted".into(),
            ));
        }
        return Ok(String::from_utf8_lossy(boundary).into_owned());
    }

    Err(IppdocError::MimeParse("no multipart boundary line found".into()))
}

/// `type/subtype` plus any parameters, as declared by the part.
fn declared_content_type(part: &MessagePart<'_>) -> String {
    let Some(ct) = part.content_type() else {
        return DEFAULT_CONTENT_TYPE.into();
    };

    let mut declared = match ct.subtype() {
        Some(subtype) => format!("{}/{}", ct.ctype(), subtype),
        None => ct.ctype().to_string(),
    };
    if let Some(attributes) = &ct.attributes {
        for (name, value) in attributes {
            declared.push_str("; ");
            declared.push_str(name);
            declared.push('=');
            push_param_value(&mut declared, value);
        }
    }
    declared
}

/// Append a parameter value, quoted when it is not a bare RFC 2045 token.
fn push_param_value(out: &mut String, value: &str) {
    let is_token = !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?=".contains(&b));
    if is_token {
        out.push_str(value);
        return;
    }
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

fn starts_with_ignore_ascii_case(haystack: &str, prefix: &str) -> bool {
    haystack.len() >= prefix.len()
        && haystack.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
