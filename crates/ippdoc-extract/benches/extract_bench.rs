// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for attribute scanning, target lookup, and full
// document extraction in the ippdoc-extract crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ippdoc_core::config::ExtractionConfig;
use ippdoc_extract::encode::{
    AttributeWriter, VALUE_TAG_KEYWORD, VALUE_TAG_OCTET_STRING, multipart_mixed,
};
use ippdoc_extract::integrity::hash_bytes;
use ippdoc_extract::{Extractor, locate, scan};

/// Size of the fake PDF body; the whole multipart value must fit in a u16.
const PDF_BYTES: usize = 60 * 1024;

/// Build a bare buffer with `filler` keyword attributes followed by a
/// `job-data` attribute wrapping a PDF part.
fn build_response(filler: usize) -> Vec<u8> {
    let mut pdf = b"%PDF-1.4\n".to_vec();
    pdf.resize(PDF_BYTES, 0xAB);
    let body = multipart_mixed("bench-boundary", &[("application/pdf", pdf.as_slice())]);

    let mut writer = AttributeWriter::new();
    for i in 0..filler {
        writer
            .attribute(VALUE_TAG_KEYWORD, &format!("x-filler-{i}"), b"none")
            .expect("filler fits");
    }
    writer
        .attribute(VALUE_TAG_OCTET_STRING, "job-data", &body)
        .expect("body fits");
    writer.finish()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_scan(c: &mut Criterion) {
    let data = build_response(1000);

    c.bench_function("scan (1000 attributes)", |b| {
        b.iter(|| {
            let count = scan(black_box(&data)).filter(|r| r.is_ok()).count();
            assert_eq!(count, 1001);
        });
    });
}

fn bench_locate(c: &mut Criterion) {
    let data = build_response(1000);

    c.bench_function("locate (last of 1001)", |b| {
        b.iter(|| {
            let record = locate(scan(black_box(&data)), "job-data");
            assert!(record.is_ok());
        });
    });
}

fn bench_extract(c: &mut Criterion) {
    let data = build_response(16);
    let extractor = Extractor::new(ExtractionConfig::default()).expect("default config is valid");

    c.bench_function("extract_document (60 KiB PDF part)", |b| {
        b.iter(|| {
            let document = extractor.extract_document(black_box(&data));
            assert_eq!(document.len(), PDF_BYTES);
        });
    });
}

/// SHA-256 of an extracted document (logged on every success).
fn bench_digest(c: &mut Criterion) {
    let data = vec![0x42u8; PDF_BYTES];

    c.bench_function("hash_bytes (60 KiB)", |b| {
        b.iter(|| black_box(hash_bytes(black_box(&data))));
    });
}

criterion_group!(benches, bench_scan, bench_locate, bench_extract, bench_digest);
criterion_main!(benches);
