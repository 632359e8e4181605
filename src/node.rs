use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use log::{debug, warn};

use crate::{
    options::{DisplayMode, SvgOptions, TexOptions},
    script, Error,
};

/// Oldest Node.js release MathJax runs on.
pub const MIN_NODE_MAJOR: u64 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOptions {
    /// The `node` executable.
    pub program: PathBuf,
    /// Where `mathjax-full` is installed: a package name resolvable from the
    /// working directory (or `NODE_PATH`), or a directory.
    pub mathjax_root: String,
}

impl Default for NodeOptions {
    fn default() -> Self {
        NodeOptions {
            program: PathBuf::from("node"),
            mathjax_root: "mathjax-full".to_owned(),
        }
    }
}

/// Returns whether `program` is Node.js v6 or later.
pub fn available(program: &Path) -> bool {
    fn version(program: &Path) -> Option<node_semver::Version> {
        let output = Command::new(program).arg("-v").output().ok()?;
        String::from_utf8_lossy(&output.stdout)
            .trim()
            .trim_start_matches('v')
            .parse()
            .ok()
    }

    match version(program) {
        Some(version) => {
            debug!("found {} v{version}", program.display());
            version.major >= MIN_NODE_MAJOR
        }
        None => false,
    }
}

/// Renders through a `node` subprocess, one per conversion.
pub struct Node {
    options: NodeOptions,
    tex: TexOptions,
    svg: SvgOptions,
}

impl Node {
    pub fn new(options: NodeOptions, tex: TexOptions, svg: SvgOptions) -> Result<Self, Error> {
        if !available(&options.program) {
            return Err(Error::NodeUnavailable);
        }
        Ok(Node { options, tex, svg })
    }

    pub fn convert(&self, math: &str, mode: DisplayMode) -> Result<String, Error> {
        let script = script::node_document(&self.options.mathjax_root, &self.tex, &self.svg, mode)?;
        let mut child = Command::new(&self.options.program)
            .arg("-e")
            .arg(&script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            // node may exit before reading, in which case its stderr explains why
            if let Err(err) = stdin.write_all(math.as_bytes()) {
                if err.kind() != ErrorKind::BrokenPipe {
                    return Err(err.into());
                }
            }
        }
        let output = child.wait_with_output()?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        if !output.status.success() {
            return Err(Error::Node {
                status: output.status,
                stderr,
            });
        }
        if !stderr.is_empty() {
            warn!("node: {stderr}");
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
