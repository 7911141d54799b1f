//! Integration tests for the lookup-then-upload flow against a mock releases API.
//!
//! One mockito server plays both the API and the upload endpoint; the lookup
//! response points `upload_url` back at the same server.

use mockito::{Matcher, Mock, Server, ServerGuard};
use release_asset_publisher::{
    ExistingAssetPolicy, PublishConfig, PublishError, PublishOutcome, Publisher, RepoSlug,
};
use std::path::Path;
use tempfile::TempDir;

const TOKEN: &str = "test-token";
const TAG_PATH: &str = "/repos/ManimCommunity/manim/releases/tags/v0.19.0";
const ASSET: &str = "manim-0.19.0.tar.gz";

fn config(server: &ServerGuard, dist_dir: &Path) -> PublishConfig {
    let repo = RepoSlug::parse("ManimCommunity/manim").unwrap();
    let mut config = PublishConfig::new(repo, TOKEN, "refs/tags/v0.19.0");
    config.api_url = server.url();
    config.package = Some("manim".to_string());
    config.dist_dir = dist_dir.to_path_buf();
    config
}

fn dist_with_archive() -> TempDir {
    let dist = TempDir::new().unwrap();
    std::fs::write(dist.path().join(ASSET), b"archive-bytes").unwrap();
    dist
}

fn release_body(server: &ServerGuard, assets: &str) -> String {
    format!(
        r#"{{
            "id": 1,
            "tag_name": "v0.19.0",
            "html_url": "https://github.com/ManimCommunity/manim/releases/tag/v0.19.0",
            "upload_url": "{}/uploads/assets{{?name,label}}",
            "assets": {}
        }}"#,
        server.url(),
        assets
    )
}

async fn mock_lookup(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("GET", TAG_PATH)
        .match_header("authorization", "Bearer test-token")
        .match_header("accept", "application/vnd.github+json")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

async fn mock_upload(server: &mut ServerGuard, status: usize, body: &str, hits: usize) -> Mock {
    server
        .mock("POST", Matcher::Regex(r"^/uploads/assets".to_string()))
        .match_query(Matcher::UrlEncoded("name".into(), ASSET.into()))
        .match_header("content-type", "application/gzip")
        .match_header("authorization", "Bearer test-token")
        .match_body("archive-bytes")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

const UPLOADED: &str = r#"{
    "id": 99,
    "name": "manim-0.19.0.tar.gz",
    "size": 13,
    "browser_download_url": "https://github.com/ManimCommunity/manim/releases/download/v0.19.0/manim-0.19.0.tar.gz"
}"#;

#[tokio::test]
async fn uploads_archive_and_reports_stripped_version() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let body = release_body(&server, "[]");
    let lookup = mock_lookup(&mut server, 200, &body).await;
    let upload = mock_upload(&mut server, 201, UPLOADED, 1).await;

    let publisher = Publisher::new(config(&server, dist.path())).unwrap();
    let report = publisher.publish().await.unwrap();

    lookup.assert_async().await;
    upload.assert_async().await;

    assert_eq!(report.tag.ref_tag, "v0.19.0");
    assert_eq!(report.outputs.tag_name, "0.19.0");
    assert!(report.outputs.upload_url.ends_with("/uploads/assets{?name,label}"));
    assert_eq!(report.artifact.asset_name, ASSET);
    match report.outcome {
        PublishOutcome::Uploaded { asset, replaced } => {
            let asset = asset.expect("decoded upload response");
            assert_eq!(asset.id, 99);
            assert!(!replaced);
            assert!(asset.browser_download_url.unwrap().ends_with(ASSET));
        }
        other => panic!("expected upload, got {other:?}"),
    }
}

#[tokio::test]
async fn unreadable_upload_reply_still_counts_as_uploaded() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let body = release_body(&server, "[]");
    let _lookup = mock_lookup(&mut server, 200, &body).await;
    let upload = mock_upload(&mut server, 201, "<html>created</html>", 1).await;

    let publisher = Publisher::new(config(&server, dist.path())).unwrap();
    let report = publisher.publish().await.unwrap();

    upload.assert_async().await;
    assert!(matches!(
        report.outcome,
        PublishOutcome::Uploaded {
            asset: None,
            replaced: false
        }
    ));
}

#[tokio::test]
async fn missing_release_is_lookup_error() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let lookup = mock_lookup(
        &mut server,
        404,
        r#"{"message": "Not Found", "documentation_url": "https://docs.github.com"}"#,
    )
    .await;
    let upload = mock_upload(&mut server, 201, UPLOADED, 0).await;

    let publisher = Publisher::new(config(&server, dist.path())).unwrap();
    let err = publisher.publish().await.unwrap_err();

    lookup.assert_async().await;
    upload.assert_async().await;
    match err {
        PublishError::Lookup { tag, status, reason } => {
            assert_eq!(tag, "v0.19.0");
            assert_eq!(status, Some(404));
            assert_eq!(reason, "Not Found");
        }
        other => panic!("expected lookup error, got {other}"),
    }
}

#[tokio::test]
async fn unauthorized_lookup_is_lookup_error() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let _lookup = mock_lookup(&mut server, 401, r#"{"message": "Bad credentials"}"#).await;

    let publisher = Publisher::new(config(&server, dist.path())).unwrap();
    let err = publisher.publish().await.unwrap_err();
    assert!(matches!(err, PublishError::Lookup { status: Some(401), .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn response_without_upload_url_is_schema_error_and_skips_upload() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let lookup = mock_lookup(&mut server, 200, r#"{"id": 1, "tag_name": "v0.19.0"}"#).await;
    let upload = mock_upload(&mut server, 201, UPLOADED, 0).await;

    let publisher = Publisher::new(config(&server, dist.path())).unwrap();
    let err = publisher.publish().await.unwrap_err();

    lookup.assert_async().await;
    upload.assert_async().await;
    assert!(matches!(err, PublishError::Schema { .. }), "got {err}");
}

#[tokio::test]
async fn non_json_lookup_body_is_schema_error() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let _lookup = mock_lookup(&mut server, 200, "<html>proxy login</html>").await;

    let publisher = Publisher::new(config(&server, dist.path())).unwrap();
    let err = publisher.publish().await.unwrap_err();
    assert!(matches!(err, PublishError::Schema { .. }), "got {err}");
}

#[tokio::test]
async fn duplicate_asset_is_upload_error() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let body = release_body(&server, "[]");
    let _lookup = mock_lookup(&mut server, 200, &body).await;
    let upload = mock_upload(
        &mut server,
        422,
        r#"{"message": "Validation Failed", "errors": [{"resource": "ReleaseAsset", "code": "already_exists", "field": "name"}]}"#,
        1,
    )
    .await;

    let publisher = Publisher::new(config(&server, dist.path())).unwrap();
    let err = publisher.publish().await.unwrap_err();

    upload.assert_async().await;
    match err {
        PublishError::Upload { asset, status, reason } => {
            assert_eq!(asset, ASSET);
            assert_eq!(status, Some(422));
            assert_eq!(reason, "Validation Failed (already_exists)");
        }
        other => panic!("expected upload error, got {other}"),
    }
}

#[tokio::test]
async fn missing_archive_fails_after_lookup_without_upload() {
    let mut server = Server::new_async().await;
    let dist = TempDir::new().unwrap();
    let body = release_body(&server, "[]");
    let lookup = mock_lookup(&mut server, 200, &body).await;
    let upload = mock_upload(&mut server, 201, UPLOADED, 0).await;

    let publisher = Publisher::new(config(&server, dist.path())).unwrap();
    let err = publisher.publish().await.unwrap_err();

    lookup.assert_async().await;
    upload.assert_async().await;
    assert!(matches!(err, PublishError::Artifact(_)), "got {err}");
    assert_eq!(err.exit_code(), 5);
}

#[tokio::test]
async fn skip_policy_leaves_existing_asset() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let body = release_body(&server, r#"[{"id": 7, "name": "manim-0.19.0.tar.gz"}]"#);
    let _lookup = mock_lookup(&mut server, 200, &body).await;
    let upload = mock_upload(&mut server, 201, UPLOADED, 0).await;

    let mut config = config(&server, dist.path());
    config.on_existing = ExistingAssetPolicy::Skip;
    let report = Publisher::new(config).unwrap().publish().await.unwrap();

    upload.assert_async().await;
    assert!(matches!(
        report.outcome,
        PublishOutcome::SkippedExisting { asset_id: 7 }
    ));
    assert_eq!(report.outputs.tag_name, "0.19.0");
}

#[tokio::test]
async fn skip_policy_uploads_when_absent() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let body = release_body(&server, r#"[{"id": 3, "name": "other.whl"}]"#);
    let _lookup = mock_lookup(&mut server, 200, &body).await;
    let upload = mock_upload(&mut server, 201, UPLOADED, 1).await;

    let mut config = config(&server, dist.path());
    config.on_existing = ExistingAssetPolicy::Skip;
    let report = Publisher::new(config).unwrap().publish().await.unwrap();

    upload.assert_async().await;
    assert!(matches!(report.outcome, PublishOutcome::Uploaded { .. }));
}

#[tokio::test]
async fn replace_policy_deletes_then_uploads() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let body = release_body(&server, r#"[{"id": 7, "name": "manim-0.19.0.tar.gz"}]"#);
    let _lookup = mock_lookup(&mut server, 200, &body).await;
    let delete = server
        .mock("DELETE", "/repos/ManimCommunity/manim/releases/assets/7")
        .match_header("authorization", "Bearer test-token")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let upload = mock_upload(&mut server, 201, UPLOADED, 1).await;

    let mut config = config(&server, dist.path());
    config.on_existing = ExistingAssetPolicy::Replace;
    let report = Publisher::new(config).unwrap().publish().await.unwrap();

    delete.assert_async().await;
    upload.assert_async().await;
    assert!(matches!(
        report.outcome,
        PublishOutcome::Uploaded { replaced: true, .. }
    ));
}

#[tokio::test]
async fn failed_delete_aborts_before_upload() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let body = release_body(&server, r#"[{"id": 7, "name": "manim-0.19.0.tar.gz"}]"#);
    let _lookup = mock_lookup(&mut server, 200, &body).await;
    let _delete = server
        .mock("DELETE", "/repos/ManimCommunity/manim/releases/assets/7")
        .with_status(403)
        .with_body(r#"{"message": "Resource not accessible by integration"}"#)
        .create_async()
        .await;
    let upload = mock_upload(&mut server, 201, UPLOADED, 0).await;

    let mut config = config(&server, dist.path());
    config.on_existing = ExistingAssetPolicy::Replace;
    let err = Publisher::new(config).unwrap().publish().await.unwrap_err();

    upload.assert_async().await;
    assert!(matches!(err, PublishError::Upload { status: Some(403), .. }));
}

#[tokio::test]
async fn dry_run_never_uploads() {
    let mut server = Server::new_async().await;
    let dist = dist_with_archive();
    let body = release_body(&server, "[]");
    let _lookup = mock_lookup(&mut server, 200, &body).await;
    let upload = mock_upload(&mut server, 201, UPLOADED, 0).await;

    let mut config = config(&server, dist.path());
    config.dry_run = true;
    let report = Publisher::new(config).unwrap().publish().await.unwrap();

    upload.assert_async().await;
    assert!(matches!(
        report.outcome,
        PublishOutcome::DryRun {
            asset_exists: false
        }
    ));
}

#[tokio::test]
async fn resolve_does_not_need_package_or_archive() {
    let mut server = Server::new_async().await;
    let body = release_body(&server, "[]");
    let lookup = mock_lookup(&mut server, 200, &body).await;

    let repo = RepoSlug::parse("ManimCommunity/manim").unwrap();
    let mut config = PublishConfig::new(repo, TOKEN, "refs/tags/v0.19.0");
    config.api_url = server.url();

    let resolution = Publisher::new(config).unwrap().resolve().await.unwrap();

    lookup.assert_async().await;
    assert_eq!(resolution.tag.version, "0.19.0");
    assert_eq!(resolution.outputs.tag_name, "0.19.0");
    assert_eq!(resolution.target.release_id, Some(1));
}

#[tokio::test]
async fn publish_without_package_fails_before_any_request() {
    let mut server = Server::new_async().await;
    let body = release_body(&server, "[]");
    let lookup = server
        .mock("GET", TAG_PATH)
        .with_status(200)
        .with_body(body)
        .expect(0)
        .create_async()
        .await;

    let repo = RepoSlug::parse("ManimCommunity/manim").unwrap();
    let mut config = PublishConfig::new(repo, TOKEN, "refs/tags/v0.19.0");
    config.api_url = server.url();

    let err = Publisher::new(config).unwrap().publish().await.unwrap_err();
    lookup.assert_async().await;
    assert!(matches!(err, PublishError::Config(_)));
}
