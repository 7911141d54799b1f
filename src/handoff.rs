//! Step outputs passed to the next pipeline step.
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT` as `key=value`
//! lines, the format the runner reads back after the step exits. Without an
//! output file they go to stdout in the same format.

use crate::error::Result;
use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;

/// Where step outputs are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffTarget {
    /// Append to a runner-provided file
    File(PathBuf),
    /// Print to stdout
    Stdout,
}

impl HandoffTarget {
    /// File target when a path is configured, stdout otherwise
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Stdout,
        }
    }
}

/// Values published for the following step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutputs {
    /// Upload endpoint of the release
    pub upload_url: String,
    /// Version with its prefix stripped, e.g. `0.19.0`
    pub tag_name: String,
}

impl StepOutputs {
    /// Render as runner output lines
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in [("upload_url", &self.upload_url), ("tag_name", &self.tag_name)] {
            push_output(&mut out, key, value);
        }
        out
    }

    /// Write to the given target
    pub fn write(&self, target: &HandoffTarget) -> Result<()> {
        let rendered = self.render();
        match target {
            HandoffTarget::File(path) => {
                log::debug!("Appending step outputs to {}", path.display());
                let mut file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open step output file {}", path.display()))?;
                file.write_all(rendered.as_bytes())
                    .and_then(|()| file.flush())
                    .with_context(|| format!("Failed to write step outputs to {}", path.display()))?;
            }
            HandoffTarget::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(rendered.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

fn push_output(out: &mut String, key: &str, value: &str) {
    if !value.contains('\n') && !value.contains('\r') {
        out.push_str(&format!("{}={}\n", key, value));
        return;
    }

    // Multi-line values use the heredoc form with a delimiter absent from the value
    let mut delimiter = String::from("RELEASE_ASSET_PUBLISHER_EOF");
    while value.contains(delimiter.as_str()) {
        delimiter.push('_');
    }
    out.push_str(&format!("{}<<{}\n{}\n{}\n", key, delimiter, value, delimiter));
}
