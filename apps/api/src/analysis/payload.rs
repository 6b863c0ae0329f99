//! Outbound webhook bodies.
//!
//! The webhook accepts either the extracted résumé text or the raw file as
//! base64, depending on how the N8N workflow on the other end is built.

use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::document::UploadedDocument;

/// How an uploaded document is shipped to the webhook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForwardMode {
    /// Extract plain text locally, send `{ resume_text }`.
    #[default]
    Text,
    /// Send the file untouched as `{ file_name, file_mime_type, file_content_base64 }`.
    Base64,
}

#[derive(Debug, Error)]
#[error("unknown forward mode '{0}' (expected 'text' or 'base64')")]
pub struct UnknownForwardMode(String);

impl FromStr for ForwardMode {
    type Err = UnknownForwardMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ForwardMode::Text),
            "base64" => Ok(ForwardMode::Base64),
            other => Err(UnknownForwardMode(other.to_string())),
        }
    }
}

/// JSON body POSTed to the webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForwardPayload {
    ResumeText {
        resume_text: String,
    },
    EncodedFile {
        file_name: String,
        file_mime_type: String,
        file_content_base64: String,
    },
}

impl ForwardPayload {
    pub fn resume_text(text: String) -> Self {
        ForwardPayload::ResumeText { resume_text: text }
    }

    pub fn encoded_file(document: &UploadedDocument) -> Self {
        ForwardPayload::EncodedFile {
            file_name: document.file_name.clone(),
            file_mime_type: document.media_type.clone(),
            file_content_base64: STANDARD.encode(&document.content),
        }
    }
}
