//! Release payloads returned by the releases API.

use crate::error::{PublishError, Result};
use serde::Deserialize;

/// Asset already attached to a release
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReleaseAsset {
    /// Asset ID
    pub id: u64,
    /// File name
    pub name: String,
    /// Public download URL
    #[serde(default)]
    pub browser_download_url: Option<String>,
}

/// Release as returned by `GET /repos/{owner}/{repo}/releases/tags/{tag}`
///
/// Every field is optional here so a missing `upload_url` is reported as a
/// schema problem instead of a generic decode failure.
#[derive(Debug, Deserialize)]
pub(crate) struct ReleaseResponse {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub upload_url: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Upload target resolved for a release
#[derive(Debug, Clone)]
pub struct ReleaseTarget {
    /// Tag the release was looked up by
    pub tag_name: String,
    /// Upload endpoint, possibly still carrying its URI template suffix
    pub upload_url: String,
    /// Release ID
    pub release_id: Option<u64>,
    /// Release page
    pub html_url: Option<String>,
    /// Assets already attached
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseTarget {
    pub(crate) fn from_response(requested_tag: &str, response: ReleaseResponse) -> Result<Self> {
        let upload_url = response
            .upload_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| PublishError::Schema {
                reason: format!("release for tag '{}' has no upload_url", requested_tag),
            })?;

        Ok(Self {
            tag_name: response
                .tag_name
                .unwrap_or_else(|| requested_tag.to_string()),
            upload_url,
            release_id: response.id,
            html_url: response.html_url,
            assets: response.assets,
        })
    }

    /// Find an attached asset by file name
    pub fn find_asset(&self, name: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|a| a.name == name)
    }
}

/// Asset created by an upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    /// Asset ID
    pub id: u64,
    /// File name
    pub name: String,
    /// Size reported by the server
    #[serde(default)]
    pub size: u64,
    /// Public download URL
    #[serde(default)]
    pub browser_download_url: Option<String>,
}
