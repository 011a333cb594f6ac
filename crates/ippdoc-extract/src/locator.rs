// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document locator -- picks the target attribute out of a record stream.

use tracing::debug;

use ippdoc_core::error::{IppdocError, Result};
use ippdoc_core::types::AttributeRecord;

/// Return the first record named exactly `target_name`.
///
/// Names are compared byte for byte (IPP attribute names are case-sensitive
/// keywords).  Consumption stops at the first match.  A stream that ends
/// without a match gives `AttributeNotFound`; a stream that ends in
/// truncation passes the `Truncated` error through.
pub fn locate<'a, I>(records: I, target_name: &str) -> Result<AttributeRecord<'a>>
where
    I: IntoIterator<Item = Result<AttributeRecord<'a>>>,
{
    let mut inspected = 0usize;
    for record in records {
        let record = record?;
        inspected += 1;
        if record.name == target_name {
            debug!(
                name = target_name,
                position = inspected,
                value_len = record.value.len(),
                "target attribute found"
            );
            return Ok(record);
        }
    }

    debug!(name = target_name, inspected, "target attribute not found");
    Err(IppdocError::AttributeNotFound(target_name.to_string()))
}
