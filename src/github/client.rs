//! Authenticated client for the releases API.

use super::release::{ReleaseResponse, ReleaseTarget, UploadedAsset};
use super::upload_url::expand_upload_url;
use crate::artifact::Artifact;
use crate::config::{PublishConfig, RepoSlug};
use crate::error::{ConfigError, PublishError, Result};
use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use url::Url;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Releases API client scoped to one repository
pub struct ReleasesClient {
    http: Client,
    api_url: Url,
    repo: RepoSlug,
}

impl ReleasesClient {
    /// Create a client from a run configuration
    pub fn new(config: &PublishConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url).map_err(|e| ConfigError::InvalidUrl {
            url: config.api_url.clone(),
            reason: e.to_string(),
        })?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token)).map_err(|_| {
            ConfigError::HttpClient {
                reason: "token contains characters not allowed in a header".to_string(),
            }
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(|e| ConfigError::HttpClient {
            reason: e.to_string(),
        })?;

        Ok(Self {
            http,
            api_url,
            repo: config.repo.clone(),
        })
    }

    /// Build `{api}/repos/{owner}/{repo}/<segments...>`
    fn repo_endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidUrl {
                url: self.api_url.to_string(),
                reason: "cannot be used as a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(["repos", self.repo.owner.as_str(), self.repo.repo.as_str()])
            .extend(segments);
        Ok(url)
    }

    /// Look up the release for a tag and resolve its upload target
    ///
    /// # Errors
    /// - `Lookup` - no such release, unauthorized, or the request failed
    /// - `Schema` - the response is not a release or lacks `upload_url`
    pub async fn get_release_by_tag(&self, tag: &str) -> Result<ReleaseTarget> {
        let url = self.repo_endpoint(&["releases", "tags", tag])?;
        log::info!("Looking up release for tag {} in {}", tag, self.repo);
        log::debug!("GET {}", url);

        let lookup_error = |status: Option<u16>, reason: String| PublishError::Lookup {
            tag: tag.to_string(),
            status,
            reason,
        };

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| lookup_error(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = failure_reason(response).await;
            return Err(lookup_error(Some(status.as_u16()), reason));
        }

        let release = response
            .json::<ReleaseResponse>()
            .await
            .map_err(|e| PublishError::Schema {
                reason: format!("release response is not a release object: {}", e),
            })?;

        let target = ReleaseTarget::from_response(tag, release)?;
        log::debug!(
            "Release {:?} has {} asset(s), upload_url {}",
            target.release_id,
            target.assets.len(),
            target.upload_url
        );
        Ok(target)
    }

    /// Upload an artifact to a release
    ///
    /// Returns `None` when the upload succeeded but the endpoint's reply could
    /// not be decoded as an asset.
    ///
    /// # Errors
    /// - `Upload` - the endpoint answered with a non-success status or the
    ///   request failed
    /// - `Schema` - `upload_url` is not a valid URL
    pub async fn upload_asset(
        &self,
        target: &ReleaseTarget,
        artifact: &Artifact,
        content: Bytes,
        label: Option<&str>,
    ) -> Result<Option<UploadedAsset>> {
        let url = expand_upload_url(&target.upload_url, &artifact.asset_name, label)?;
        log::info!(
            "Uploading {} ({} bytes, {})",
            artifact.asset_name,
            content.len(),
            artifact.content_type
        );
        log::debug!("POST {}", url);

        let upload_error = |status: Option<u16>, reason: String| PublishError::Upload {
            asset: artifact.asset_name.clone(),
            status,
            reason,
        };

        let response = self
            .http
            .post(url)
            .header(header::CONTENT_TYPE, artifact.content_type.as_str())
            .body(content)
            .send()
            .await
            .map_err(|e| upload_error(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = failure_reason(response).await;
            return Err(upload_error(Some(status.as_u16()), reason));
        }

        match response.json::<UploadedAsset>().await {
            Ok(asset) => Ok(Some(asset)),
            Err(e) => {
                log::warn!("Upload succeeded but the response could not be decoded: {}", e);
                Ok(None)
            }
        }
    }

    /// Delete an asset from a release
    pub async fn delete_asset(&self, asset_id: u64, asset_name: &str) -> Result<()> {
        let id = asset_id.to_string();
        let url = self.repo_endpoint(&["releases", "assets", id.as_str()])?;
        log::info!("Deleting existing asset {} (id {})", asset_name, asset_id);
        log::debug!("DELETE {}", url);

        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| PublishError::Upload {
                asset: asset_name.to_string(),
                status: None,
                reason: format!("failed to delete existing asset: {}", e),
            })?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }

        let reason = failure_reason(response).await;
        Err(PublishError::Upload {
            asset: asset_name.to_string(),
            status: Some(status.as_u16()),
            reason: format!("failed to delete existing asset: {}", reason),
        })
    }
}

/// Human-readable reason for a failed response
///
/// Prefers the API's `message` field and any validation error codes, falling
/// back to the raw body and then the status text.
async fn failure_reason(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
        let message = value.get("message").and_then(|m| m.as_str());
        let codes: Vec<&str> = value
            .get("errors")
            .and_then(|e| e.as_array())
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.get("code").and_then(|c| c.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        match (message, codes.is_empty()) {
            (Some(message), true) => return message.to_string(),
            (Some(message), false) => return format!("{} ({})", message, codes.join(", ")),
            (None, _) => {}
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}
