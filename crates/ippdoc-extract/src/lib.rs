// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ippdoc Extract — IPP attribute scanning, target attribute selection, and
// MIME multipart document extraction.  The pipeline is synchronous and
// allocation-light: records borrow from the response buffer and only the
// selected document is copied out.

pub mod encode;
pub mod integrity;
pub mod locator;
pub mod mime;
pub mod pipeline;
pub mod scanner;

pub use encode::AttributeWriter;
pub use locator::locate;
pub use pipeline::{ExtractionReport, Extractor, ReportSummary, extract_document};
pub use scanner::{Scanner, scan};
