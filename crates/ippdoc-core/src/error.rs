// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for ippdoc.

use thiserror::Error;

use crate::types::{Stage, TruncatedField};

/// Top-level error type for all ippdoc operations.
#[derive(Debug, Error)]
pub enum IppdocError {
    // -- Scan errors --
    #[error(
        "buffer truncated reading {field} at offset {offset}: need {needed} bytes, {remaining} left"
    )]
    Truncated {
        field: TruncatedField,
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    // -- Locate errors --
    #[error("attribute '{0}' not found")]
    AttributeNotFound(String),

    // -- MIME errors --
    #[error("MIME parse error: {0}")]
    MimeParse(String),

    #[error("no body part with content type matching '{0}'")]
    ContentTypeNotFound(String),

    // -- Configuration / encoding --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid attribute value: {0}")]
    InvalidValue(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IppdocError {
    /// The extraction stage that produced this error, if it came from one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Truncated { .. } => Some(Stage::Scan),
            Self::AttributeNotFound(_) => Some(Stage::Locate),
            Self::MimeParse(_) | Self::ContentTypeNotFound(_) => Some(Stage::Mime),
            _ => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, IppdocError>;
