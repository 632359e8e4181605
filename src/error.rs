use std::{path::PathBuf, process::ExitStatus};

use thiserror::Error;

use crate::{bundle::BUNDLE_ENV, node::MIN_NODE_MAJOR};

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "MathJax bundle not found (set {} or run `npm run build` in js/), tried: {}",
        BUNDLE_ENV,
        display_paths(.0)
    )]
    BundleNotFound(Vec<PathBuf>),
    #[error("failed to read MathJax bundle {}: {source}", .path.display())]
    BundleRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("MathJax bundle does not export `{0}`")]
    MissingExport(&'static str),
    #[error("MathJax error: {0}")]
    Js(String),
    #[error("string is too long for the JavaScript engine")]
    StringTooLong,
    #[error("unable to detect Node.js v{} or later", MIN_NODE_MAJOR)]
    NodeUnavailable,
    #[error("node exited with {status}: {stderr}")]
    Node { status: ExitStatus, stderr: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
