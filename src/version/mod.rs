//! Tag and version derivation for release references.
//!
//! A release event carries a git reference such as `refs/tags/v1.2.3`. This
//! module turns it into the release tag used against the API and the bare
//! version used to name the local artifact.

mod tag;

pub use tag::ReleaseTag;
