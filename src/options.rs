//! Configuration of the TeX input and SVG output processors.

use std::{fmt, str::FromStr};

use serde::Serialize;

/// TeX extension packages enabled on the input processor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Packages {
    /// Every package MathJax ships (`AllPackages`).
    #[default]
    All,
    /// Only the named packages, e.g. `base`, `ams`.
    Only(Vec<String>),
}

impl FromStr for Packages {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Packages::All);
        }
        let names: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect();
        if names.is_empty() {
            return Err("expected `all` or a comma-separated list of packages".to_owned());
        }
        Ok(Packages::Only(names))
    }
}

/// How the SVG output processor shares glyph paths.
///
/// MathJax's `global` cache is not offered: its glyph definitions live in a
/// document-level element that a standalone fragment never contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontCache {
    /// Glyphs are defined once per expression and referenced with `<use>`.
    #[default]
    Local,
    /// Every glyph is emitted inline.
    None,
}

impl FontCache {
    pub fn as_str(self) -> &'static str {
        match self {
            FontCache::Local => "local",
            FontCache::None => "none",
        }
    }
}

impl fmt::Display for FontCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontCache {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(FontCache::Local),
            "none" => Ok(FontCache::None),
            "global" => Err(
                "font cache `global` leaves standalone fragments without glyph definitions \
                 (expected local or none)"
                    .to_owned(),
            ),
            other => Err(format!("unknown font cache `{other}` (expected local or none)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TexOptions {
    pub packages: Packages,
    /// Rethrow TeX errors instead of rendering them as inline error nodes.
    pub strict: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvgOptions {
    pub font_cache: FontCache,
}

/// Whether an expression is typeset as a display block or inline with text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Display,
    Inline,
}

impl DisplayMode {
    pub fn is_display(self) -> bool {
        self == DisplayMode::Display
    }
}

/// Which JavaScript runtime hosts MathJax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineKind {
    /// V8 linked into this process, running the bundled MathJax module.
    #[default]
    Embedded,
    /// A `node` subprocess per conversion, using an installed `mathjax-full`.
    Node,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EngineKind::Embedded => "embedded",
            EngineKind::Node => "node",
        })
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "embedded" | "v8" => Ok(EngineKind::Embedded),
            "node" => Ok(EngineKind::Node),
            other => Err(format!(
                "unknown engine `{other}` (expected embedded or node)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packages_parse_all() {
        assert_eq!("all".parse::<Packages>().unwrap(), Packages::All);
        assert_eq!(" ALL ".parse::<Packages>().unwrap(), Packages::All);
    }

    #[test]
    fn packages_parse_list_skips_empty_entries() {
        assert_eq!(
            "base, ams,,color".parse::<Packages>().unwrap(),
            Packages::Only(vec!["base".into(), "ams".into(), "color".into()])
        );
        assert!(" , ".parse::<Packages>().is_err());
    }

    #[test]
    fn font_cache_round_trips_through_str() {
        for cache in [FontCache::Local, FontCache::None] {
            assert_eq!(cache.to_string().parse::<FontCache>().unwrap(), cache);
        }
        assert_eq!("NONE".parse::<FontCache>().unwrap(), FontCache::None);
        assert!("shared".parse::<FontCache>().is_err());
    }

    #[test]
    fn global_font_cache_is_rejected() {
        let err = "global".parse::<FontCache>().unwrap_err();
        assert!(err.contains("without glyph definitions"), "{err}");
    }

    #[test]
    fn font_cache_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&FontCache::None).unwrap(), "\"none\"");
    }

    #[test]
    fn engine_kind_accepts_aliases() {
        assert_eq!("v8".parse::<EngineKind>().unwrap(), EngineKind::Embedded);
        assert_eq!("Node".parse::<EngineKind>().unwrap(), EngineKind::Node);
        assert!("deno".parse::<EngineKind>().is_err());
    }

    #[test]
    fn defaults_match_mathjax_cli_setup() {
        let tex = TexOptions::default();
        assert_eq!(tex.packages, Packages::All);
        assert!(!tex.strict);
        assert_eq!(SvgOptions::default().font_cache, FontCache::Local);
        assert!(DisplayMode::default().is_display());
    }
}
