use crate::error::{ConfigError, Result};

/// Tag and version derived from a triggering reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    /// Last path segment of the reference, e.g. `v1.2.3`
    pub ref_tag: String,
    /// Tag with its leading version marker removed, e.g. `1.2.3`
    pub version: String,
}

impl ReleaseTag {
    /// Derive tag and version from a reference string.
    ///
    /// `refs/tags/v0.19.0`, `tags/v0.19.0` and `v0.19.0` all yield tag
    /// `v0.19.0` and version `0.19.0`. The first character of the tag is
    /// always dropped, whatever it is.
    pub fn from_ref(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        let invalid = |reason: &str| ConfigError::InvalidReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        if reference.is_empty() {
            return Err(invalid("reference is empty").into());
        }

        let ref_tag = reference.rsplit('/').next().unwrap_or_default();
        if ref_tag.is_empty() {
            return Err(invalid("reference ends with '/'").into());
        }

        let mut chars = ref_tag.chars();
        chars.next();
        let version = chars.as_str();
        if version.is_empty() {
            return Err(invalid("tag has no version after its prefix character").into());
        }

        Ok(Self {
            ref_tag: ref_tag.to_string(),
            version: version.to_string(),
        })
    }

    /// Whether the derived version parses as a semantic version
    pub fn is_semver(&self) -> bool {
        semver::Version::parse(&self.version).is_ok()
    }
}
