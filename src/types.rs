// src/types.rs

//! Shared image value types used across the graph, resolver and gateway.

use std::path::Path;

/// Canonical node identifier type used throughout the crate.
///
/// Node ids are opaque strings chosen by whoever authored the workflow.
pub type NodeId = String;

/// Raw image bytes plus their mime type.
///
/// The core never decodes or encodes pixels; images are carried verbatim
/// between nodes and to/from the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    /// File extension matching this image's mime type, for writing outputs.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

/// The image supplied to the single Source node before a run may start,
/// together with an optional mask constraining Edit nodes.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub image: ImageData,
    /// Original file name, kept for display only.
    pub file_name: Option<String>,
    pub mask: Option<ImageData>,
}

impl SourceImage {
    pub fn new(image: ImageData) -> Self {
        Self {
            image,
            file_name: None,
            mask: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_mask(mut self, mask: ImageData) -> Self {
        self.mask = Some(mask);
        self
    }
}

/// Guess a mime type from a file extension, defaulting to PNG.
///
/// The gateway accepts anything; this only has to be good enough for the
/// formats people actually feed in.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}
