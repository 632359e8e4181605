//! Convert TeX math expressions to SVG using MathJax.
//!
//! ```no_run
//! let svg = tex2svg::convert_to_svg(r"\int_{-\infty}^\infty e^{-x^2}\,\mathrm dx")?;
//! println!("{svg}");
//! # Ok::<(), tex2svg::Error>(())
//! ```

use std::cell::RefCell;

use log::debug;

mod bundle;
mod error;
mod isolate;
mod node;
mod options;
mod render;
mod script;

pub use bundle::{Bundle, BUNDLE_ENV};
pub use error::Error;
pub use node::{available as node_available, NodeOptions, MIN_NODE_MAJOR};
pub use options::{DisplayMode, EngineKind, FontCache, Packages, SvgOptions, TexOptions};
pub use render::Render;

enum Backend {
    Embedded(isolate::Embedded),
    Node(node::Node),
}

/// Math to Svg Converter
///
/// Holds one MathJax document; the adaptor, handler registration and both
/// processors are set up once and reused for every conversion.
pub struct Converter {
    backend: Backend,
}

impl Converter {
    /// A converter with the default configuration: embedded engine, all TeX
    /// packages, local font cache.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    /// Starts configuring a converter; see [`Builder`].
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Converts one expression, keeping the result as a [`Render`].
    pub fn render(&mut self, latex: impl AsRef<str>, mode: DisplayMode) -> Result<Render, Error> {
        let latex = latex.as_ref();
        let svg = match &mut self.backend {
            Backend::Embedded(engine) => engine.convert(latex, mode)?,
            Backend::Node(engine) => engine.convert(latex, mode)?,
        };
        Ok(Render::new(svg))
    }

    /// Convert a math string to a display-style Svg
    pub fn convert_to_svg(&mut self, latex: impl AsRef<str>) -> Result<String, Error> {
        self.render(latex, DisplayMode::Display).map(Render::into_raw)
    }

    /// Convert a math string to an inline-style Svg
    pub fn convert_to_svg_inline(&mut self, latex: impl AsRef<str>) -> Result<String, Error> {
        self.render(latex, DisplayMode::Inline).map(Render::into_raw)
    }
}

/// Configuration for a [`Converter`]. Every option defaults to the MathJax
/// setup of [`Converter::new`].
#[derive(Debug, Clone, Default)]
pub struct Builder {
    tex: TexOptions,
    svg: SvgOptions,
    engine: EngineKind,
    bundle: Option<Bundle>,
    node: NodeOptions,
}

impl Builder {
    /// TeX extension packages to enable.
    pub fn packages(mut self, packages: Packages) -> Self {
        self.tex.packages = packages;
        self
    }

    /// Fail on TeX errors instead of rendering them in the output.
    pub fn strict(mut self, strict: bool) -> Self {
        self.tex.strict = strict;
        self
    }

    /// Glyph sharing in the produced SVG.
    pub fn font_cache(mut self, font_cache: FontCache) -> Self {
        self.svg.font_cache = font_cache;
        self
    }

    /// The JavaScript runtime hosting MathJax.
    pub fn engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// The MathJax bundle for the embedded engine. Defaults to
    /// [`Bundle::locate`].
    pub fn bundle(mut self, bundle: Bundle) -> Self {
        self.bundle = Some(bundle);
        self
    }

    /// Program and `mathjax-full` location for [`EngineKind::Node`].
    pub fn node_options(mut self, options: NodeOptions) -> Self {
        self.node = options;
        self
    }

    /// Sets MathJax up once; the result is reused for every conversion.
    pub fn build(self) -> Result<Converter, Error> {
        debug!("building {} converter", self.engine);
        let backend = match self.engine {
            EngineKind::Embedded => {
                let bundle = match self.bundle {
                    Some(bundle) => bundle,
                    None => Bundle::locate()?,
                };
                Backend::Embedded(isolate::Embedded::new(&bundle, &self.tex, &self.svg)?)
            }
            EngineKind::Node => Backend::Node(node::Node::new(self.node, self.tex, self.svg)?),
        };
        Ok(Converter { backend })
    }
}

thread_local! {
    static DEFAULT_CONVERTER: RefCell<Option<Converter>> = RefCell::new(None);
}

fn with_default_converter<T>(
    f: impl FnOnce(&mut Converter) -> Result<T, Error>,
) -> Result<T, Error> {
    DEFAULT_CONVERTER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let converter = match slot.take() {
            Some(converter) => converter,
            None => Converter::new()?,
        };
        f(slot.insert(converter))
    })
}

/// Convert a math string to a display-style Svg with a per-thread default
/// [`Converter`].
pub fn convert_to_svg(latex: impl AsRef<str>) -> Result<String, Error> {
    with_default_converter(|converter| converter.convert_to_svg(latex))
}

/// Convert a math string to an inline-style Svg with a per-thread default
/// [`Converter`].
pub fn convert_to_svg_inline(latex: impl AsRef<str>) -> Result<String, Error> {
    with_default_converter(|converter| converter.convert_to_svg_inline(latex))
}
