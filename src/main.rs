use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::debug;

use tex2svg::{Bundle, Converter, DisplayMode, EngineKind, FontCache, NodeOptions, Packages};

/// Render a TeX math expression to SVG with MathJax.
#[derive(Debug, Parser)]
#[command(name = "tex2svg", version, about)]
struct Cli {
    /// The math expression, e.g. '\frac{1}{x}' (after `--` if it starts with `-`)
    expression: String,

    /// Typeset inline instead of as a display block
    #[arg(long)]
    inline: bool,

    /// TeX packages to enable: `all` or a comma-separated list
    #[arg(long, value_name = "LIST", default_value = "all")]
    packages: Packages,

    /// Glyph sharing in the output: local or none
    #[arg(long, value_name = "MODE", default_value_t = FontCache::Local)]
    font_cache: FontCache,

    /// Fail on TeX errors instead of rendering them in the output
    #[arg(long)]
    strict: bool,

    /// JavaScript runtime hosting MathJax: embedded or node
    #[arg(long, default_value_t = EngineKind::Embedded)]
    engine: EngineKind,

    /// MathJax bundle for the embedded engine [default: $TEX2SVG_BUNDLE, then js/out/index.js]
    #[arg(long, value_name = "PATH")]
    bundle: Option<PathBuf>,

    /// Location of mathjax-full for the node engine
    #[arg(long, value_name = "DIR", default_value = "mathjax-full")]
    mathjax_root: String,

    /// Node.js executable for the node engine
    #[arg(long, value_name = "PROGRAM", default_value = "node")]
    node: PathBuf,

    /// Paint the expression in this CSS color
    #[arg(long, value_name = "CSS")]
    color: Option<String>,

    /// More output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn display_mode(&self) -> DisplayMode {
        if self.inline {
            DisplayMode::Inline
        } else {
            DisplayMode::Display
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("{cli:?}");

    let mut builder = Converter::builder()
        .packages(cli.packages.clone())
        .strict(cli.strict)
        .font_cache(cli.font_cache)
        .engine(cli.engine)
        .node_options(NodeOptions {
            program: cli.node.clone(),
            mathjax_root: cli.mathjax_root.clone(),
        });
    if let Some(path) = &cli.bundle {
        builder = builder.bundle(Bundle::from_path(path)?);
    }
    let mut converter = builder.build().context("failed to set up MathJax")?;

    let mut render = converter
        .render(&cli.expression, cli.display_mode())
        .with_context(|| format!("failed to render `{}`", cli.expression))?;
    if let Some(color) = &cli.color {
        render.set_color(color);
    }
    println!("{render}");
    Ok(())
}
