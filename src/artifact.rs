//! Prebuilt archive located on disk by naming convention.

use crate::error::{ArtifactError, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Content type declared for `.tar.gz` source archives
pub const GZIP_CONTENT_TYPE: &str = "application/gzip";

/// Archive to attach to the release
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Path on disk
    pub path: PathBuf,
    /// Asset name on the release (the file name)
    pub asset_name: String,
    /// Content type sent with the upload
    pub content_type: String,
    /// Size in bytes at the time it was located
    pub size: u64,
}

impl Artifact {
    /// File name for a package version: `<package>-<version>.tar.gz`
    pub fn file_name(package: &str, version: &str) -> String {
        format!("{}-{}.tar.gz", package, version)
    }

    /// Locate `dist_dir/<package>-<version>.tar.gz`.
    ///
    /// The content type is detected from the extension unless overridden.
    pub fn locate(
        dist_dir: &Path,
        package: &str,
        version: &str,
        content_type: Option<&str>,
    ) -> Result<Self> {
        let asset_name = Self::file_name(package, version);
        let path = dist_dir.join(&asset_name);

        let metadata = std::fs::metadata(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::NotFound { path: path.clone() }
            } else {
                ArtifactError::ReadFailed {
                    path: path.clone(),
                    source: e,
                }
            }
        })?;

        if !metadata.is_file() {
            return Err(ArtifactError::NotAFile { path }.into());
        }

        let content_type = content_type
            .map(str::to_string)
            .unwrap_or_else(|| detect_content_type(&path).to_string());

        log::debug!(
            "Located artifact {} ({} bytes, {})",
            path.display(),
            metadata.len(),
            content_type
        );

        Ok(Self {
            path,
            asset_name,
            content_type,
            size: metadata.len(),
        })
    }

    /// Read the archive contents
    pub async fn read(&self) -> Result<Bytes> {
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|e| ArtifactError::ReadFailed {
                path: self.path.clone(),
                source: e,
            })?;
        Ok(Bytes::from(content))
    }
}

/// Detect MIME type for archive artifacts
fn detect_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("gz") | Some("tgz") => GZIP_CONTENT_TYPE,
        Some("bz2") => "application/x-bzip2",
        Some("xz") => "application/x-xz",
        Some("zst") => "application/zstd",
        Some("tar") => "application/x-tar",
        Some("zip") => "application/zip",
        Some("whl") => "application/zip",
        _ => "application/octet-stream",
    }
}
