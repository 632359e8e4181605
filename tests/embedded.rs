//! Embedded engine driven by a stub MathJax bundle with the same exports.

use tex2svg::{Bundle, Converter, DisplayMode, Error, FontCache, Packages, BUNDLE_ENV};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn stub_bundle() -> Bundle {
    Bundle::from_path(fixture("stub-mathjax.js")).unwrap()
}

fn stub_converter() -> Converter {
    Converter::builder().bundle(stub_bundle()).build().unwrap()
}

#[test]
fn converts_with_default_setup() {
    let mut converter = stub_converter();
    let svg = converter.convert_to_svg(r"\frac{1}{x}").unwrap();
    assert_eq!(
        svg,
        r#"<svg data-display="true" data-font-cache="local" data-packages="base,ams,newcommand" data-source=""><g fill="currentColor" stroke="currentColor">\frac{1}{x}</g></svg>"#
    );
}

#[test]
fn inline_mode_is_passed_to_convert() {
    let mut converter = stub_converter();
    let svg = converter.convert_to_svg_inline("x^2").unwrap();
    assert!(svg.contains(r#"data-display="false""#), "{svg}");
}

#[test]
fn document_is_reused_across_conversions() {
    let mut converter = stub_converter();
    for math in ["a", "b < c", r"\sqrt{2}"] {
        let svg = converter.convert_to_svg(math).unwrap();
        assert!(svg.starts_with("<svg "), "{svg}");
    }
    assert!(converter.convert_to_svg("b < c").unwrap().contains("b &lt; c"));
}

#[test]
fn processor_options_reach_mathjax() {
    let mut converter = Converter::builder()
        .bundle(stub_bundle())
        .packages(Packages::Only(vec!["base".into(), "color".into()]))
        .font_cache(FontCache::None)
        .build()
        .unwrap();
    let svg = converter.convert_to_svg("y").unwrap();
    assert!(svg.contains(r#"data-packages="base,color""#), "{svg}");
    assert!(svg.contains(r#"data-font-cache="none""#), "{svg}");
}

#[test]
fn tex_errors_render_inline_by_default() {
    let mut converter = stub_converter();
    let svg = converter.convert_to_svg(r"\undefined").unwrap();
    assert!(svg.contains(r#"data-mml-node="merror""#), "{svg}");
}

#[test]
fn strict_mode_propagates_tex_errors() {
    let mut converter = Converter::builder()
        .bundle(stub_bundle())
        .strict(true)
        .build()
        .unwrap();
    match converter.convert_to_svg(r"\undefined") {
        Err(Error::Js(message)) => {
            assert_eq!(message, r"Error: Undefined control sequence \undefined")
        }
        other => panic!("unexpected result: {other:?}"),
    }
    // the isolate stays usable after a caught exception
    assert!(converter.convert_to_svg("z").is_ok());
}

#[test]
fn renderer_exceptions_become_errors() {
    let mut converter = stub_converter();
    let err = converter.convert_to_svg(r"\crash").unwrap_err();
    assert_eq!(err.to_string(), "MathJax error: TypeError: renderer crashed");
}

#[test]
fn thrown_plain_objects_report_their_message() {
    let mut converter = stub_converter();
    let err = converter.convert_to_svg(r"a \misplaced b").unwrap_err();
    assert_eq!(err.to_string(), "MathJax error: Misplaced & character");
}

#[test]
fn converters_on_one_thread_drop_in_creation_order() {
    let mut first = stub_converter();
    let mut second = stub_converter();
    assert!(first.convert_to_svg("a").unwrap().contains(">a<"));
    assert!(second.convert_to_svg("b").unwrap().contains(">b<"));
    assert!(first.convert_to_svg("c").unwrap().contains(">c<"));

    drop(first);
    assert!(second.convert_to_svg("d").unwrap().contains(">d<"));
    let mut third = stub_converter();
    drop(second);
    assert!(third.convert_to_svg("e").unwrap().contains(">e<"));
}

#[test]
fn held_converter_outlives_default_converter_use() {
    std::env::set_var(BUNDLE_ENV, fixture("stub-mathjax.js"));
    let mut held = stub_converter();
    assert!(tex2svg::convert_to_svg("x").unwrap().contains(">x<"));
    assert!(held.convert_to_svg("y").unwrap().contains(">y<"));
    drop(held);
    assert!(tex2svg::convert_to_svg_inline("z").unwrap().contains(">z<"));
}

#[test]
fn render_can_recolor() {
    let mut converter = stub_converter();
    let mut render = converter.render("x", DisplayMode::Display).unwrap();
    render.set_color("red");
    assert!(render.as_str().contains(r#"fill="red" stroke="red""#));
    assert!(!render.into_raw().contains("currentColor"));
}

#[test]
fn bundle_without_required_export_is_rejected() {
    let bundle = Bundle::from_path(fixture("missing-export.js")).unwrap();
    let err = Converter::builder().bundle(bundle).build().err().unwrap();
    assert!(matches!(err, Error::MissingExport("liteAdaptor")), "{err:?}");
}

#[test]
fn bundle_evaluation_failure_is_reported() {
    let bundle = Bundle::from_path(fixture("throws-on-load.js")).unwrap();
    let err = Converter::builder().bundle(bundle).build().err().unwrap();
    match err {
        Error::Js(message) => assert!(message.contains("bundle failed to initialize"), "{message}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn bundle_syntax_error_is_reported() {
    let bundle = Bundle::from_source("broken.js", "export const = ;");
    let err = Converter::builder().bundle(bundle).build().err().unwrap();
    assert!(matches!(err, Error::Js(_)), "{err:?}");
}

#[test]
fn free_functions_use_located_bundle() {
    std::env::set_var(BUNDLE_ENV, fixture("stub-mathjax.js"));
    let display = tex2svg::convert_to_svg("e^{i\\pi}").unwrap();
    let inline = tex2svg::convert_to_svg_inline("e^{i\\pi}").unwrap();
    assert!(display.contains(r#"data-display="true""#));
    assert!(inline.contains(r#"data-display="false""#));
}
