// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! NFT upload form, client-side validation and submission.

use std::path::Path;
use std::time::Duration;

use crate::{
    error::{ClientError, Notice},
    state::AppState,
};

/// Largest accepted image, in bytes (10 MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Marketplace categories offered by the upload form.
pub const CATEGORIES: [&str; 10] = [
    "Art",
    "Music",
    "Photography",
    "Sports",
    "Collectibles",
    "Virtual Worlds",
    "Trading Cards",
    "Utility",
    "Domain Names",
    "Other",
];

/// Accepted image types and their file extensions.
const ACCEPTED_TYPES: [(&str, &[&str]); 4] = [
    ("image/jpeg", &["jpeg", "jpg"]),
    ("image/png", &["png"]),
    ("image/gif", &["gif"]),
    ("image/webp", &["webp"]),
];

const UPLOAD_FAILED: &str = "Failed to upload NFT";
pub const CONNECT_FIRST: &str = "Please connect your wallet first";
pub const FIELDS_MISSING: &str = "Please fill in all fields and upload an image";
pub const INVALID_TYPE: &str = "Invalid file type. Please upload an image.";
pub const TOO_LARGE: &str = "File is too large. Maximum size is 10MB.";
pub const UPLOAD_SUCCESS: &str = "NFT uploaded successfully! You can now mint it.";

/// Image attached to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = mime_for(&file_name).unwrap_or("application/octet-stream");
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// MIME type to send: the declared type when it is an accepted image
    /// type, otherwise the type implied by the extension.
    pub fn mime_type(&self) -> &str {
        let declared = self.content_type.trim();
        if ACCEPTED_TYPES
            .iter()
            .any(|(accepted, _)| declared.eq_ignore_ascii_case(accepted))
        {
            return declared;
        }
        mime_for(&self.file_name).unwrap_or(declared)
    }

    /// Accepted when either the MIME type or the extension names an image
    /// type the marketplace takes.
    pub fn is_accepted_type(&self) -> bool {
        let mime = self.content_type.to_ascii_lowercase();
        let ext = self.extension();
        ACCEPTED_TYPES.iter().any(|(accepted, exts)| {
            mime == *accepted || ext.as_deref().is_some_and(|e| exts.contains(&e))
        })
    }
}

fn mime_for(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_string_lossy()
        .to_ascii_lowercase();
    ACCEPTED_TYPES
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(mime, _)| *mime)
}

/// Upload form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub file: Option<UploadFile>,
}

impl UploadForm {
    /// Field checks run before anything is sent.
    pub fn validate(&self) -> Result<(), ClientError> {
        let blank = |value: &str| value.trim().is_empty();
        let Some(file) = self.file.as_ref() else {
            return Err(ClientError::validation(FIELDS_MISSING));
        };
        if blank(&self.title) || blank(&self.description) || blank(&self.category) {
            return Err(ClientError::validation(FIELDS_MISSING));
        }
        if !CATEGORIES.contains(&self.category.as_str()) {
            return Err(ClientError::validation(format!(
                "Unknown category: {}",
                self.category
            )));
        }
        if !file.is_accepted_type() {
            return Err(ClientError::validation(INVALID_TYPE));
        }
        if file.size() > MAX_FILE_SIZE {
            return Err(ClientError::validation(TOO_LARGE));
        }
        Ok(())
    }
}

/// Successful upload and where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub nft_id: u64,
    pub message: String,
    pub redirect_to: String,
    pub redirect_after: Duration,
}

impl UploadReceipt {
    /// Wait out the redirect delay and return the detail path.
    pub async fn redirect(self) -> String {
        tokio::time::sleep(self.redirect_after).await;
        self.redirect_to
    }
}

/// Upload page state.
pub struct UploadFlow {
    state: AppState,
    busy: bool,
    notice: Option<Notice>,
    success: Option<String>,
}

impl UploadFlow {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            busy: false,
            notice: None,
            success: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Validate and post `form`. The form is left as it was either way.
    pub async fn submit(&mut self, form: &UploadForm) -> Result<UploadReceipt, ClientError> {
        if self.busy {
            return Err(ClientError::Busy);
        }
        self.notice = None;
        self.success = None;

        if !self.state.session.snapshot().is_connected {
            return Err(self.reject(ClientError::validation(CONNECT_FIRST)));
        }
        if let Err(e) = form.validate() {
            return Err(self.reject(e));
        }

        self.busy = true;
        let result = self.state.api.upload_nft(form).await;
        self.busy = false;

        match result {
            Ok(created) => {
                tracing::info!(nft_id = created.id, title = %form.title, "NFT uploaded");
                self.success = Some(UPLOAD_SUCCESS.to_string());
                Ok(UploadReceipt {
                    nft_id: created.id,
                    message: UPLOAD_SUCCESS.to_string(),
                    redirect_to: format!("/nft/{}", created.id),
                    redirect_after: self.state.config.redirect_delay,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error uploading NFT");
                self.notice = Some(e.notice(UPLOAD_FAILED));
                Err(e)
            }
        }
    }

    fn reject(&mut self, err: ClientError) -> ClientError {
        self.notice = Some(err.notice(UPLOAD_FAILED));
        err
    }
}
