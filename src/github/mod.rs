//! GitHub releases API integration

mod client;
mod release;
mod upload_url;

pub use client::ReleasesClient;
pub use release::{ReleaseAsset, ReleaseTarget, UploadedAsset};
pub use upload_url::expand_upload_url;
