//! JavaScript glue that wires MathJax together.
//!
//! Both engines run the same sequence: create the lite DOM adaptor, register
//! the HTML handler with it, build the TeX and SVG processors, then create a
//! document over an empty source. Only the way the MathJax exports are
//! obtained, and how the converted fragment leaves the script, differ.

use crate::{
    options::{DisplayMode, Packages, SvgOptions, TexOptions},
    Error,
};

/// Global property the embedded engine stores the bundle namespace under.
pub(crate) const NAMESPACE_KEY: &str = "__tex2svg_mathjax";

/// MathJax exports the glue uses, with the module under `mathjax-full/js/`
/// that provides each one.
pub(crate) const MATHJAX_EXPORTS: [(&str, &str); 6] = [
    ("mathjax", "mathjax.js"),
    ("TeX", "input/tex.js"),
    ("SVG", "output/svg.js"),
    ("liteAdaptor", "adaptors/liteAdaptor.js"),
    ("RegisterHTMLHandler", "handlers/html.js"),
    ("AllPackages", "input/tex/AllPackages.js"),
];

/// Script whose completion value is `(math, display) => string`.
pub(crate) fn embedded_document(tex: &TexOptions, svg: &SvgOptions) -> Result<String, Error> {
    let mut script = String::from("(() => {\n");
    script.push_str(&format!(
        "const lib = globalThis[{}];\n",
        serde_json::to_string(NAMESPACE_KEY)?
    ));
    script.push_str(&document_body(tex, svg)?);
    script.push_str("return (math, display) => adaptor.innerHTML(doc.convert(math, { display }));\n");
    script.push_str("})()\n");
    Ok(script)
}

/// CommonJS script for `node -e`: reads the expression from stdin and writes
/// the fragment to stdout.
pub(crate) fn node_document(
    mathjax_root: &str,
    tex: &TexOptions,
    svg: &SvgOptions,
    mode: DisplayMode,
) -> Result<String, Error> {
    let mut script = String::new();
    script.push_str(&format!(
        "const root = {};\n",
        serde_json::to_string(mathjax_root)?
    ));
    script.push_str("const load = (path) => require(root + \"/js/\" + path);\n");
    script.push_str("const lib = {\n");
    for (export, module) in MATHJAX_EXPORTS {
        script.push_str(&format!("  {export}: load({module:?}).{export},\n"));
    }
    script.push_str("};\n");
    script.push_str(&document_body(tex, svg)?);
    script.push_str("const math = require(\"fs\").readFileSync(0, \"utf8\");\n");
    script.push_str(&format!(
        "process.stdout.write(adaptor.innerHTML(doc.convert(math, {{ display: {} }})));\n",
        mode.is_display()
    ));
    Ok(script)
}

fn document_body(tex: &TexOptions, svg: &SvgOptions) -> Result<String, Error> {
    let packages = match &tex.packages {
        Packages::All => "lib.AllPackages".to_owned(),
        Packages::Only(names) => serde_json::to_string(names)?,
    };
    // TexError does not extend Error; rethrow one that carries its message
    let format_error = if tex.strict {
        ", formatError: (jax, err) => { throw new Error(err.message); }"
    } else {
        ""
    };

    let mut body = String::new();
    body.push_str("const adaptor = lib.liteAdaptor();\n");
    body.push_str("lib.RegisterHTMLHandler(adaptor);\n");
    body.push_str(&format!(
        "const tex = new lib.TeX({{ packages: {packages}{format_error} }});\n"
    ));
    body.push_str(&format!(
        "const svg = new lib.SVG({{ fontCache: {} }});\n",
        serde_json::to_string(&svg.font_cache)?
    ));
    body.push_str("const doc = lib.mathjax.document(\"\", { InputJax: tex, OutputJax: svg });\n");
    Ok(body)
}
