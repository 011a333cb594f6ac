// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people running extractions by hand.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity decides whether retrying the fetch is worthwhile.

use crate::error::IppdocError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The response was damaged in transit; fetching it again may help.
    Transient,
    /// The user must change a setting or input.
    ActionRequired,
    /// The response simply does not contain what was asked for.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether fetching the response again could change the outcome.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `IppdocError` into a `HumanError`.
pub fn humanize_error(err: &IppdocError) -> HumanError {
    match err {
        // -- Extraction stages --
        IppdocError::Truncated { field, .. } => HumanError {
            message: "The printer's response was cut short.".into(),
            suggestion: format!(
                "The {field} field runs past the end of the data. Fetch the response again; the connection may have dropped."
            ),
            retriable: true,
            severity: Severity::Transient,
        },

        IppdocError::AttributeNotFound(name) => HumanError {
            message: "The response doesn't contain a document attribute.".into(),
            suggestion: format!(
                "No attribute is named '{name}'. List the response's attributes and set the attribute name to the one carrying the document."
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        IppdocError::MimeParse(_) => HumanError {
            message: "The document attribute isn't a multipart message.".into(),
            suggestion: "The attribute was found but its value has no MIME boundary. Check that the right attribute is selected.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        IppdocError::ContentTypeNotFound(prefix) => HumanError {
            message: "No part of the document has the requested type.".into(),
            suggestion: format!(
                "None of the body parts starts with '{prefix}'. Try a broader content-type prefix."
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Configuration / encoding --
        IppdocError::InvalidConfig(detail) => HumanError {
            message: "The settings aren't valid.".into(),
            suggestion: format!("Fix the configuration and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        IppdocError::InvalidValue(detail) => HumanError {
            message: "That value can't be encoded as an IPP attribute.".into(),
            suggestion: format!("Attribute values are limited to 65535 bytes. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Storage --
        IppdocError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied for that file.".into(),
                    suggestion: "Check the file permissions, or write the output somewhere else.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        IppdocError::Serialization(_) => HumanError {
            message: "The configuration file isn't valid JSON.".into(),
            suggestion: "Check the file for typos, or delete it to fall back to the defaults.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}
