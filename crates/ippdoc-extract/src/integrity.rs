// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document fingerprints -- SHA-256 digests for logs and reports.

use sha2::{Digest, Sha256};

use ippdoc_core::types::DocumentPayload;

/// Lowercase hex SHA-256 of `data`.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Fingerprint of an extracted document's bytes.
pub fn payload_digest(payload: &DocumentPayload) -> String {
    hash_bytes(&payload.bytes)
}
