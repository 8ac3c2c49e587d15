// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for whoever is driving the conversion.
//
// Every job-level error is mapped to plain English with a clear suggestion.
// The severity drives how a presentation layer shows it.

use crate::error::PagebinderError;
use crate::types::SkipKind;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change the selection or settings.
    ActionRequired,
    /// The inputs themselves are unusable; retrying won't help.
    Permanent,
    /// Something went wrong inside Pagebinder.
    Internal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether trying the same thing again can succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `PagebinderError` into a `HumanError`.
pub fn humanize_error(err: &PagebinderError) -> HumanError {
    match err {
        PagebinderError::NoInput => HumanError {
            message: "No images were selected.".into(),
            suggestion: "Choose a folder that contains images, or pick some image files, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PagebinderError::AllItemsSkipped { total, reasons } => HumanError {
            message: format!("None of the {total} images could be read."),
            suggestion: format!(
                "The files may be damaged or not really images. Try opening them in an image viewer first. ({reasons})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        PagebinderError::EmptyInput | PagebinderError::Assembly(_) => HumanError {
            message: "The PDF could not be put together.".into(),
            suggestion: "This is unexpected. Try again with fewer images, and report it if it keeps happening.".into(),
            retriable: true,
            severity: Severity::Internal,
        },

        PagebinderError::Busy => HumanError {
            message: "A conversion is already in progress.".into(),
            suggestion: "Wait for the current PDF to finish, then start the next one.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        PagebinderError::Cancelled => HumanError {
            message: "The conversion was cancelled.".into(),
            suggestion: "Start it again when you're ready.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        PagebinderError::InvalidOptions(detail) => HumanError {
            message: "One of the settings isn't valid.".into(),
            suggestion: format!("Check the quality and size settings. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PagebinderError::InvalidDocument(_) => HumanError {
            message: "That file isn't a PDF Pagebinder can read.".into(),
            suggestion: "Check that the path points at a finished PDF.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        PagebinderError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The folder or file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied for that folder or file.".into(),
                    suggestion: "Check the permissions, or copy the images to a folder you own.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::ActionRequired,
                }
            }
        }

        PagebinderError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Check that the settings file is valid JSON.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// One-line warning text for a skipped image.
pub fn describe_skip(kind: SkipKind) -> &'static str {
    match kind {
        SkipKind::Io => "could not be read",
        SkipKind::Decode => "is not a readable image",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_is_action_required() {
        let human = humanize_error(&PagebinderError::NoInput);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn all_skipped_is_permanent_and_mentions_count() {
        let err = PagebinderError::AllItemsSkipped {
            total: 3,
            reasons: "x".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.message.contains('3'));
    }

    #[test]
    fn assembly_is_internal() {
        let human = humanize_error(&PagebinderError::Assembly("xref".into()));
        assert_eq!(human.severity, Severity::Internal);
    }

    #[test]
    fn missing_folder_is_action_required() {
        let err = PagebinderError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("couldn't be found"));
    }
}
