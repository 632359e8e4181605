//! The MathJax ES module the embedded engine evaluates.
//!
//! `js/` bundles `mathjax-full` into a single self-contained module,
//! `js/out/index.js`, with every import inlined.

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use log::debug;

use crate::Error;

/// Environment variable pointing at a bundle on disk.
pub const BUNDLE_ENV: &str = "TEX2SVG_BUNDLE";

const BUILD_OUTPUT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/js/out/index.js");

#[derive(Debug, Clone)]
pub struct Bundle {
    name: String,
    source: Cow<'static, str>,
}

impl Bundle {
    pub fn from_source(name: impl Into<String>, source: impl Into<Cow<'static, str>>) -> Self {
        Bundle {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::BundleRead {
            path: path.to_owned(),
            source,
        })?;
        debug!("loaded MathJax bundle {} ({} bytes)", path.display(), source.len());
        Ok(Bundle::from_source(path.display().to_string(), source))
    }

    /// The bundle compiled into this binary.
    #[cfg(feature = "embed")]
    pub fn embedded() -> Self {
        Bundle::from_source("index.js", include_str!("../js/out/index.js"))
    }

    #[cfg(feature = "embed")]
    pub fn locate() -> Result<Self, Error> {
        Ok(Bundle::embedded())
    }

    /// Finds the bundle: `$TEX2SVG_BUNDLE` first, then the `js/` build
    /// output of this crate.
    #[cfg(not(feature = "embed"))]
    pub fn locate() -> Result<Self, Error> {
        Bundle::locate_in(std::env::var_os(BUNDLE_ENV).map(PathBuf::from))
    }

    #[cfg_attr(feature = "embed", allow(dead_code))]
    fn locate_in(configured: Option<PathBuf>) -> Result<Self, Error> {
        let candidates: Vec<PathBuf> = configured
            .into_iter()
            .chain(std::iter::once(PathBuf::from(BUILD_OUTPUT)))
            .collect();
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Bundle::from_path(path),
            None => Err(Error::BundleNotFound(candidates)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
