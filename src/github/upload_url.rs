//! Expansion of the `upload_url` URI template.
//!
//! The API returns upload URLs such as
//! `https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}`.
//! Only the `name` and `label` query variables are ever used, so the template
//! suffix is dropped and the pairs appended directly.

use crate::error::{PublishError, Result};
use url::Url;

/// Turn an `upload_url` template into the concrete upload endpoint
pub fn expand_upload_url(template: &str, name: &str, label: Option<&str>) -> Result<Url> {
    let base = match template.find('{') {
        Some(idx) => &template[..idx],
        None => template,
    };

    let mut url = Url::parse(base).map_err(|e| PublishError::Schema {
        reason: format!("upload_url '{}' is not a valid URL: {}", template, e),
    })?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("name", name);
        if let Some(label) = label {
            query.append_pair("label", label);
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_template_and_adds_name() {
        let url = expand_upload_url(
            "https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}",
            "manim-0.19.0.tar.gz",
            None,
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://uploads.github.com/repos/o/r/releases/1/assets?name=manim-0.19.0.tar.gz"
        );
    }

    #[test]
    fn label_is_encoded() {
        let url = expand_upload_url(
            "https://uploads.example.com/assets",
            "pkg-1.0.0.tar.gz",
            Some("Source archive"),
        )
        .unwrap();
        assert_eq!(url.query(), Some("name=pkg-1.0.0.tar.gz&label=Source+archive"));
    }

    #[test]
    fn invalid_url_is_schema_error() {
        let err = expand_upload_url("/relative{?name}", "a", None).unwrap_err();
        assert!(matches!(err, PublishError::Schema { .. }));
    }
}
