//! Knowledge-source upload staging
//!
//! Uploaded bytes are written to a temporary `.txt` file before provisioning,
//! so the provisioner always works from a readable path. The staged file is
//! removed when the handle is dropped, which must not happen before
//! provisioning has completed.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A staged copy of the uploaded knowledge-source file
///
/// Keeps the backing temporary file alive for as long as the handle exists.
#[derive(Debug)]
pub struct StagedKnowledgeFile {
    original_name: String,
    file: NamedTempFile,
}

impl StagedKnowledgeFile {
    /// Stage uploaded bytes into a temporary `.txt` file
    pub fn from_bytes(original_name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let original_name = original_name.into();

        let mut file = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .context("Failed to create staging file for upload")?;
        file.write_all(bytes)
            .context("Failed to write uploaded bytes to staging file")?;
        file.flush()
            .context("Failed to flush staging file")?;

        tracing::info!(
            "Staged knowledge source '{}' ({} bytes) at {:?}",
            original_name,
            bytes.len(),
            file.path()
        );

        Ok(Self {
            original_name,
            file,
        })
    }

    /// Stage an existing file from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read knowledge source: {:?}", path))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("knowledge.txt");
        Self::from_bytes(name, &bytes)
    }

    /// The user-facing name of the uploaded file
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Path of the staged copy
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
