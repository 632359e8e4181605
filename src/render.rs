use std::fmt;

/// A rendered expression: the `<svg>...</svg>` fragment MathJax produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Render {
    source: String,
}

impl Render {
    pub(crate) fn new(source: String) -> Self {
        Render { source }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the underlying SVG markup.
    pub fn into_raw(self) -> String {
        self.source
    }

    /// Paints the expression in `color` instead of the surrounding text color.
    ///
    /// MathJax fills and strokes every glyph with `currentColor`; each
    /// occurrence is replaced with the given CSS color.
    pub fn set_color(&mut self, color: impl AsRef<str>) {
        self.source = self.source.replace("currentColor", color.as_ref());
    }
}

impl fmt::Display for Render {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<Render> for String {
    fn from(render: Render) -> Self {
        render.into_raw()
    }
}
