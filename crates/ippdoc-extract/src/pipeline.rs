// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction orchestrator.
//
// Runs scan → locate → MIME extract over one response buffer.  Stops at the
// first failing stage and turns the failure into a diagnostic; the boundary
// entry point always hands back bytes (empty when nothing was extracted).

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{info, instrument, warn};

use ippdoc_core::config::ExtractionConfig;
use ippdoc_core::error::{IppdocError, Result};
use ippdoc_core::types::{Diagnostic, DocumentPayload, Stage};

use crate::integrity::payload_digest;
use crate::locator::locate;
use crate::mime;
use crate::scanner::Scanner;

/// Outcome of one extraction: exactly one of `document` / `diagnostic` is set.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub document: Option<DocumentPayload>,
    pub diagnostic: Option<Diagnostic>,
    /// Records the scanner yielded before the pipeline stopped.
    pub records_scanned: usize,
}

impl ExtractionReport {
    pub fn is_success(&self) -> bool {
        self.document.is_some()
    }

    /// Document bytes, or an empty vec when extraction failed.
    pub fn into_bytes(self) -> Vec<u8> {
        self.document.map(DocumentPayload::into_bytes).unwrap_or_default()
    }

    /// Serialisable view without the document bytes.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            success: self.is_success(),
            bytes: self.document.as_ref().map_or(0, DocumentPayload::len),
            content_type: self
                .document
                .as_ref()
                .and_then(|d| d.content_type.clone()),
            sha256: self.document.as_ref().map(payload_digest),
            records_scanned: self.records_scanned,
            diagnostic: self.diagnostic.clone(),
        }
    }
}

/// JSON-friendly report, as printed by `ippdoc extract --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub success: bool,
    pub bytes: usize,
    pub content_type: Option<String>,
    pub sha256: Option<String>,
    pub records_scanned: usize,
    pub diagnostic: Option<Diagnostic>,
}

/// A configured extraction pipeline.
///
/// Holds only its settings, so one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractionConfig,
}

impl Extractor {
    /// Build a pipeline from validated settings.
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run the pipeline and return the typed outcome.
    pub fn extract_payload(&self, buf: &[u8]) -> Result<DocumentPayload> {
        self.run(buf).0
    }

    /// Run the pipeline and record which stage failed, if any.
    #[instrument(
        skip(self, buf),
        fields(
            attribute = %self.config.target_attribute_name,
            prefix = %self.config.target_content_type_prefix,
            buf_len = buf.len()
        )
    )]
    pub fn extract_report(&self, buf: &[u8]) -> ExtractionReport {
        let (result, records_scanned) = self.run(buf);
        match result {
            Ok(document) => {
                info!(
                    bytes = document.len(),
                    content_type = document.content_type.as_deref().unwrap_or("unknown"),
                    sha256 = %payload_digest(&document),
                    records_scanned,
                    "document extracted"
                );
                ExtractionReport {
                    document: Some(document),
                    diagnostic: None,
                    records_scanned,
                }
            }
            Err(err) => {
                // run() only produces stage errors.
                let stage = err.stage().unwrap_or(Stage::Scan);
                warn!(%stage, reason = %err, records_scanned, "document not extracted");
                ExtractionReport {
                    document: None,
                    diagnostic: Some(Diagnostic::new(stage, err.to_string())),
                    records_scanned,
                }
            }
        }
    }

    /// Boundary entry point: the document bytes, or empty on any failure.
    pub fn extract_document(&self, buf: &[u8]) -> Vec<u8> {
        self.extract_report(buf).into_bytes()
    }

    fn run(&self, buf: &[u8]) -> (Result<DocumentPayload>, usize) {
        let mut scanner = Scanner::new(buf, self.config.framing);
        let located = locate(scanner.by_ref(), &self.config.target_attribute_name);
        let records_scanned = scanner.records_emitted();

        let result = located.and_then(|record| {
            guarded_extract(
                mime::extract,
                record.value,
                &self.config.target_content_type_prefix,
            )
        });
        (result, records_scanned)
    }
}

/// Run a MIME extractor over untrusted bytes, turning a panic into a
/// `MimeParse` failure so it never reaches the host.
fn guarded_extract<F>(extract: F, value: &[u8], prefix: &str) -> Result<DocumentPayload>
where
    F: FnOnce(&[u8], &str) -> Result<DocumentPayload>,
{
    panic::catch_unwind(AssertUnwindSafe(|| extract(value, prefix))).unwrap_or_else(|_| {
        Err(IppdocError::MimeParse(
            "MIME parser panicked on attribute value".into(),
        ))
    })
}

/// Extract a document with the default (bare) framing.
///
/// Never fails: invalid settings and every stage failure give empty bytes,
/// with the reason logged.
pub fn extract_document(buf: &[u8], attribute_name: &str, content_type_prefix: &str) -> Vec<u8> {
    match Extractor::new(ExtractionConfig::new(attribute_name, content_type_prefix)) {
        Ok(extractor) => extractor.extract_document(buf),
        Err(err) => {
            warn!(error = %err, "invalid extraction settings");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{
        AttributeWriter, TAG_JOB_ATTRIBUTES, TAG_OPERATION_ATTRIBUTES, VALUE_TAG_CHARSET,
        VALUE_TAG_OCTET_STRING, VALUE_TAG_URI, multipart_mixed,
    };
    use ippdoc_core::types::Framing;

    const PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n%%EOF\n";

    fn response_with_document(pdf: &[u8]) -> Vec<u8> {
        let body = multipart_mixed(
            "ipp-doc-boundary",
            &[("text/plain", b"job-id=42"), ("application/pdf", pdf)],
        );
        let mut writer = AttributeWriter::new();
        writer
            .attribute(VALUE_TAG_CHARSET, "attributes-charset", b"utf-8")
            .unwrap()
            .attribute(VALUE_TAG_OCTET_STRING, "job-data", &body)
            .unwrap();
        writer.finish()
    }

    fn default_extractor() -> Extractor {
        Extractor::new(ExtractionConfig::default()).unwrap()
    }

    #[test]
    fn raw_value_gives_empty_bytes_and_mime_diagnostic() {
        // [0x45]["job-data"][0x00 0x05][5 raw bytes][0x03]
        let mut buf = vec![0x45, 0x00, 0x08];
        buf.extend_from_slice(b"job-data");
        buf.extend_from_slice(&[0x00, 0x05]);
        buf.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00]);
        buf.push(0x03);

        let extractor = Extractor::new(ExtractionConfig::new("job-data", "")).unwrap();
        let report = extractor.extract_report(&buf);
        assert!(!report.is_success());
        let diagnostic = report.diagnostic.as_ref().unwrap();
        assert_eq!(diagnostic.stage, Stage::Mime);
        assert!(diagnostic.reason.contains("MIME parse error"));
        assert!(matches!(
            extractor.extract_payload(&buf),
            Err(IppdocError::MimeParse(_))
        ));
        assert!(extract_document(&buf, "job-data", "application/pdf").is_empty());
    }

    #[test]
    fn multipart_pdf_is_extracted_exactly() {
        let buf = response_with_document(PDF);
        assert_eq!(extract_document(&buf, "job-data", "application/pdf"), PDF);

        let report = default_extractor().extract_report(&buf);
        assert!(report.diagnostic.is_none());
        assert_eq!(report.records_scanned, 2);
        assert_eq!(
            report.document.unwrap().content_type.as_deref(),
            Some("application/pdf")
        );
    }

    #[test]
    fn missing_attribute_gives_locate_diagnostic() {
        let mut writer = AttributeWriter::new();
        writer
            .attribute(VALUE_TAG_URI, "printer-uri", b"ipp://printer.local:631/ipp/print")
            .unwrap();
        let buf = writer.finish();

        let report = default_extractor().extract_report(&buf);
        let diagnostic = report.diagnostic.unwrap();
        assert_eq!(diagnostic.stage, Stage::Locate);
        assert!(diagnostic.reason.contains("job-data"));
        assert!(extract_document(&buf, "job-data", "application/pdf").is_empty());
    }

    #[test]
    fn truncated_buffer_gives_scan_diagnostic() {
        let mut buf = response_with_document(PDF);
        buf.truncate(buf.len() - 10);

        let report = default_extractor().extract_report(&buf);
        assert_eq!(report.diagnostic.unwrap().stage, Stage::Scan);
        assert_eq!(report.records_scanned, 1);
    }

    #[test]
    fn wrong_content_type_gives_mime_diagnostic() {
        let buf = response_with_document(PDF);
        let extractor =
            Extractor::new(ExtractionConfig::new("job-data", "application/postscript")).unwrap();
        assert!(matches!(
            extractor.extract_payload(&buf),
            Err(IppdocError::ContentTypeNotFound(_))
        ));
        assert!(extractor.extract_document(&buf).is_empty());
    }

    #[test]
    fn empty_buffer_is_attribute_not_found() {
        assert!(matches!(
            default_extractor().extract_payload(&[]),
            Err(IppdocError::AttributeNotFound(_))
        ));
    }

    #[test]
    fn message_framing_extracts_from_full_response() {
        let body = multipart_mixed("b", &[("application/pdf", PDF)]);
        let mut writer = AttributeWriter::with_header((1, 1), 0x0000, 1);
        writer.begin_group(TAG_OPERATION_ATTRIBUTES);
        writer
            .attribute(VALUE_TAG_CHARSET, "attributes-charset", b"utf-8")
            .unwrap();
        writer.begin_group(TAG_JOB_ATTRIBUTES);
        writer
            .attribute(VALUE_TAG_OCTET_STRING, "job-data", &body)
            .unwrap();
        let buf = writer.finish();

        let config = ExtractionConfig::default().with_framing(Framing::Message);
        let payload = Extractor::new(config).unwrap().extract_payload(&buf).unwrap();
        assert_eq!(payload.bytes, PDF);
    }

    #[test]
    fn invalid_settings_give_empty_bytes() {
        assert!(Extractor::new(ExtractionConfig::new("", "application/pdf")).is_err());
        let buf = response_with_document(PDF);
        assert!(extract_document(&buf, "", "application/pdf").is_empty());
    }

    #[test]
    fn summary_reports_digest_of_document() {
        let buf = response_with_document(PDF);
        let summary = default_extractor().extract_report(&buf).summary();
        assert!(summary.success);
        assert_eq!(summary.bytes, PDF.len());
        assert_eq!(summary.sha256.as_deref(), Some(crate::integrity::hash_bytes(PDF).as_str()));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["success"], true);
        assert!(json["diagnostic"].is_null());
    }

    #[test]
    fn extractor_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Extractor>();

        let extractor = default_extractor();
        let buf = response_with_document(PDF);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| assert_eq!(extractor.extract_document(&buf), PDF));
            }
        });
    }

    #[test]
    fn panicking_extractor_becomes_mime_parse_error() {
        let result = guarded_extract(
            |_: &[u8], _: &str| -> Result<DocumentPayload> { panic!("malformed part") },
            b"--b\r\n",
            "application/pdf",
        );
        let err = result.unwrap_err();
        assert!(matches!(err, IppdocError::MimeParse(ref reason) if reason.contains("panicked")));
        assert_eq!(err.stage(), Some(Stage::Mime));
    }

    #[test]
    fn guarded_extract_passes_results_through() {
        let body = multipart_mixed("b", &[("application/pdf", PDF)]);
        let payload = guarded_extract(mime::extract, &body, "application/pdf").unwrap();
        assert_eq!(payload.bytes, PDF);
    }
}
