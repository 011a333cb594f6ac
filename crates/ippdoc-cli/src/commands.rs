// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand implementations.  Each returns `Ok(true)` on success,
// `Ok(false)` when the input was read but gave no result, and `Err` for
// I/O or configuration problems.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use ippdoc_core::config::ExtractionConfig;
use ippdoc_core::error::Result;
use ippdoc_core::types::Framing;
use ippdoc_extract::encode::{
    AttributeWriter, TAG_JOB_ATTRIBUTES, TAG_OPERATION_ATTRIBUTES, VALUE_TAG_CHARSET,
    VALUE_TAG_MIME_MEDIA_TYPE, VALUE_TAG_NATURAL_LANGUAGE, VALUE_TAG_OCTET_STRING,
    multipart_mixed,
};
use ippdoc_extract::integrity::hash_bytes;
use ippdoc_extract::scanner::{Scanner, value_preview};
use ippdoc_extract::Extractor;

use crate::SelectArgs;

/// IPP status successful-ok, used in wrapped message headers.
const STATUS_OK: u16 = 0x0000;

/// Merge the config file (if any) with command-line overrides.
pub fn resolve_config(select: &SelectArgs) -> Result<ExtractionConfig> {
    let mut config = match &select.config {
        Some(path) => ExtractionConfig::load(path)?,
        None => ExtractionConfig::default(),
    };
    if let Some(attribute) = &select.attribute {
        config.target_attribute_name = attribute.clone();
    }
    if let Some(prefix) = &select.content_type {
        config.target_content_type_prefix = prefix.clone();
    }
    if let Some(framing) = select.framing {
        config.framing = framing;
    }
    config.validate()?;
    debug!(?config, "resolved extraction settings");
    Ok(config)
}

/// `ippdoc extract`
pub fn extract(
    response: &Path,
    output: Option<&Path>,
    select: &SelectArgs,
    json: bool,
    out: &mut impl Write,
) -> Result<bool> {
    let config = resolve_config(select)?;
    let extractor = Extractor::new(config)?;
    let buf = std::fs::read(response)?;

    let report = extractor.extract_report(&buf);
    let success = report.is_success();

    if json {
        serde_json::to_writer_pretty(&mut *out, &report.summary())?;
        writeln!(out)?;
    } else if let Some(diagnostic) = &report.diagnostic {
        eprintln!("no document extracted ({} stage): {}", diagnostic.stage, diagnostic.reason);
    }

    let document = report.into_bytes();
    if success {
        match output {
            Some(path) => {
                std::fs::write(path, &document)?;
                info!(path = %path.display(), bytes = document.len(), "document written");
            }
            None if !json => out.write_all(&document)?,
            None => {}
        }
    }
    Ok(success)
}

/// `ippdoc list`
pub fn list(response: &Path, framing: Framing, out: &mut impl Write) -> Result<bool> {
    let buf = std::fs::read(response)?;
    let mut scanner = Scanner::new(&buf, framing);
    let mut clean = true;

    for (index, item) in scanner.by_ref().enumerate() {
        match item {
            Ok(record) => writeln!(
                out,
                "{index:>4}  tag=0x{:02X}  {:<32}  {:>6}  {}",
                record.tag,
                record.name,
                record.value.len(),
                value_preview(record.value)
            )?,
            Err(e) => {
                writeln!(out, "      {e}")?;
                clean = false;
            }
        }
    }

    if let Some(header) = scanner.header() {
        writeln!(
            out,
            "header: version {}.{}  status 0x{:04X}  request-id {}",
            header.version.0, header.version.1, header.status_code, header.request_id
        )?;
    }
    writeln!(
        out,
        "{} records, stopped at offset {} of {}",
        scanner.records_emitted(),
        scanner.offset(),
        buf.len()
    )?;
    Ok(clean)
}

/// `ippdoc wrap`
pub fn wrap(
    document: &Path,
    output: &Path,
    attribute: &str,
    content_type: &str,
    framing: Framing,
) -> Result<bool> {
    let bytes = std::fs::read(document)?;
    let buf = wrap_document(&bytes, attribute, content_type, framing)?;
    std::fs::write(output, &buf)?;
    info!(
        path = %output.display(),
        document_bytes = bytes.len(),
        response_bytes = buf.len(),
        "response written"
    );
    Ok(true)
}

/// Build a response buffer carrying `document` as a multipart attribute.
pub fn wrap_document(
    document: &[u8],
    attribute: &str,
    content_type: &str,
    framing: Framing,
) -> Result<Vec<u8>> {
    // Derived from the content so the delimiter cannot collide with it by
    // accident.
    let boundary = format!("ippdoc-{}", &hash_bytes(document)[..24]);
    let body = multipart_mixed(&boundary, &[(content_type, document)]);

    let mut writer = match framing {
        Framing::Bare => AttributeWriter::new(),
        Framing::Message => {
            let mut writer = AttributeWriter::with_header((1, 1), STATUS_OK, 1);
            writer.begin_group(TAG_OPERATION_ATTRIBUTES);
            writer
        }
    };
    writer.attribute(VALUE_TAG_CHARSET, "attributes-charset", b"utf-8")?;
    writer.attribute(VALUE_TAG_NATURAL_LANGUAGE, "attributes-natural-language", b"en")?;
    if framing == Framing::Message {
        writer.begin_group(TAG_JOB_ATTRIBUTES);
    }
    writer.attribute(VALUE_TAG_MIME_MEDIA_TYPE, "document-format", content_type.as_bytes())?;
    writer.attribute(VALUE_TAG_OCTET_STRING, attribute, &body)?;
    Ok(writer.finish())
}

/// Flush buffered output; a failed flush turns success into an error.
pub fn finish(result: Result<bool>, out: &mut impl Write) -> Result<bool> {
    let ok = result?;
    out.flush()?;
    Ok(ok)
}
