//! Inputs for the presigned upload flow.

use std::path::Path;

use bytes::Bytes;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Fallback MIME type.
const OCTET_STREAM: &str = "application/octet-stream";

/// Bytes to upload plus the metadata sent with the upload-slot request.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub(crate) file_name: String,
    pub(crate) bytes: Bytes,
    pub(crate) name: Option<String>,
    pub(crate) mime_type: Option<String>,
    pub(crate) metadata: Option<Value>,
}

impl UploadFile {
    /// Upload `bytes` under `file_name`.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            name: None,
            mime_type: None,
            metadata: None,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Upload(format!("No file name in path {}", path.display())))?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(file_name, bytes))
    }

    /// Set the display name (defaults to the file name on the server).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the MIME type guessed from the file name.
    #[must_use]
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Attach custom metadata.
    #[must_use]
    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// File name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Explicit MIME type, or one guessed from the extension.
    pub fn resolved_mime_type(&self) -> String {
        self.mime_type
            .clone()
            .unwrap_or_else(|| guess_mime_type(&self.file_name).to_string())
    }

    /// Lowercase hex SHA-256 of the contents.
    pub fn sha256_hex(&self) -> String {
        sha256_hex(&self.bytes)
    }
}

/// Lowercase hex SHA-256 digest.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// MIME type for common extensions, `application/octet-stream` otherwise.
pub fn guess_mime_type(file_name: &str) -> &'static str {
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return OCTET_STREAM,
    };
    match ext.as_str() {
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "xml" => "application/xml",
        "yaml" | "yml" => "application/yaml",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => OCTET_STREAM,
    }
}

/// Dataset file type inferred from a file name (`csv`, `xlsx`, ...).
pub(crate) fn file_type_from_name(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "csv".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("data.CSV"), "text/csv");
        assert_eq!(guess_mime_type("contract.pdf"), "application/pdf");
        assert_eq!(guess_mime_type("archive.tar.unknown"), OCTET_STREAM);
        assert_eq!(guess_mime_type("Makefile"), OCTET_STREAM);
    }

    #[test]
    fn test_upload_file_builder() {
        let file = UploadFile::new("sample.txt", "hello")
            .name("Sample")
            .metadata(serde_json::json!({"source": "test"}));
        assert_eq!(file.size(), 5);
        assert_eq!(file.resolved_mime_type(), "text/plain");
        assert_eq!(file.name.as_deref(), Some("Sample"));

        let file = file.mime_type("application/x-custom");
        assert_eq!(file.resolved_mime_type(), "application/x-custom");
    }

    #[test]
    fn test_file_type_from_name() {
        assert_eq!(file_type_from_name("q3.XLSX"), "xlsx");
        assert_eq!(file_type_from_name("export"), "csv");
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name(), "rows.csv");
        assert_eq!(file.size(), 8);
        assert_eq!(file.resolved_mime_type(), "text/csv");
    }
}
