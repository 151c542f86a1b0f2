//! Notice types.

use serde::{Deserialize, Serialize};

use crate::applications::DocumentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message for the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn document_accepted(kind: DocumentKind, file_name: &str) -> Self {
        Self::success(
            "Document accepted",
            format!("{} uploaded for your {} photo", file_name, kind),
        )
    }

    pub fn document_rejected(reason: impl Into<String>) -> Self {
        Self::error("Upload rejected", reason)
    }

    pub fn upload_failed(kind: DocumentKind) -> Self {
        Self::error("Upload failed", format!("Failed to upload {} photo", kind))
    }

    pub fn save_failed() -> Self {
        Self::error("Save failed", "Failed to save application data")
    }

    pub fn unexpected() -> Self {
        Self::error("Error", "An unexpected error occurred")
    }

    pub fn submitted() -> Self {
        Self::success(
            "Application Submitted!",
            "Your application has been submitted successfully. We'll review it within 24 hours.",
        )
    }
}
