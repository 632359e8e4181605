//! MathJax running inside a V8 isolate owned by this process.

use std::sync::Once;

use log::{debug, trace};
use v8::{Context, Function, Global, OwnedIsolate};

use crate::{
    bundle::Bundle,
    options::{DisplayMode, SvgOptions, TexOptions},
    script::{self, MATHJAX_EXPORTS, NAMESPACE_KEY},
    Error,
};

fn create_origin<'s>(
    scope: &mut v8::HandleScope<'s>,
    filename: impl AsRef<str>,
    is_module: bool,
) -> Result<v8::ScriptOrigin<'s>, Error> {
    let name: v8::Local<'s, v8::Value> = new_string(scope, filename.as_ref())?.into();
    Ok(v8::ScriptOrigin::new(
        scope, name, 0, 0, false, 0, name, false, false, is_module,
    ))
}

// The bundle has every import inlined; nothing is resolvable.
fn resolve_module<'s>(
    _context: v8::Local<'s, v8::Context>,
    _specifier: v8::Local<'s, v8::String>,
    _import_assertions: v8::Local<'s, v8::FixedArray>,
    _referrer: v8::Local<'s, v8::Module>,
) -> Option<v8::Local<'s, v8::Module>> {
    None
}

static PLATFORM: Once = Once::new();

fn initialize_platform() {
    PLATFORM.call_once(|| {
        let platform = v8::new_default_platform(0, false).make_shared();
        v8::V8::initialize_platform(platform);
        v8::V8::initialize();
        debug!("initialized V8 {}", v8::V8::get_version());
    });
}

fn new_string<'s>(
    scope: &mut v8::HandleScope<'s, ()>,
    value: &str,
) -> Result<v8::Local<'s, v8::String>, Error> {
    v8::String::new(scope, value).ok_or(Error::StringTooLong)
}

/// Formats a thrown value. MathJax's `TexError` is not an `Error`, so plain
/// objects are described by their `message` property.
fn describe_exception<'s, 'e>(
    scope: &mut v8::HandleScope<'s>,
    exception: v8::Local<'e, v8::Value>,
) -> String {
    if exception.is_object() && !exception.is_native_error() {
        if let (Ok(object), Some(key)) = (
            v8::Local::<v8::Object>::try_from(exception),
            v8::String::new(scope, "message"),
        ) {
            if let Some(message) = object.get(scope, key.into()).filter(|m| m.is_string()) {
                return message.to_rust_string_lossy(scope);
            }
        }
    }
    exception.to_rust_string_lossy(scope)
}

fn exception_message(scope: &mut v8::TryCatch<v8::HandleScope>) -> String {
    match scope.exception() {
        Some(exception) => describe_exception(scope, exception),
        None => "JavaScript execution was terminated".to_owned(),
    }
}

/// Compiles and evaluates the bundle, returning its module namespace.
fn load_namespace<'s>(
    scope: &mut v8::TryCatch<v8::HandleScope<'s>>,
    bundle: &Bundle,
) -> Result<v8::Local<'s, v8::Object>, Error> {
    let code = new_string(scope, bundle.source())?;
    let origin = create_origin(scope, bundle.name(), true)?;
    let source = v8::script_compiler::Source::new(code, Some(&origin));
    let module = v8::script_compiler::compile_module(scope, source)
        .ok_or_else(|| Error::Js(exception_message(scope)))?;

    module
        .instantiate_module(scope, resolve_module)
        .ok_or_else(|| Error::Js(exception_message(scope)))?;
    module
        .evaluate(scope)
        .ok_or_else(|| Error::Js(exception_message(scope)))?;
    scope.perform_microtask_checkpoint();
    if module.get_status() == v8::ModuleStatus::Errored {
        let exception = module.get_exception();
        return Err(Error::Js(describe_exception(scope, exception)));
    }
    trace!("evaluated MathJax bundle {}", bundle.name());

    let namespace = module
        .get_module_namespace()
        .to_object(scope)
        .ok_or_else(|| Error::Js(exception_message(scope)))?;
    for (export, _) in MATHJAX_EXPORTS {
        let key = new_string(scope, export)?;
        let value = namespace.get(scope, key.into());
        if value.map_or(true, |value| value.is_undefined()) {
            return Err(Error::MissingExport(export));
        }
    }
    Ok(namespace)
}

/// Runs the document setup script and returns the conversion function it
/// evaluates to.
fn run_document_script<'s>(
    scope: &mut v8::TryCatch<v8::HandleScope<'s>>,
    glue: &str,
) -> Result<v8::Local<'s, v8::Function>, Error> {
    let code = new_string(scope, glue)?;
    let origin = create_origin(scope, "tex2svg-document.js", false)?;
    let script = v8::Script::compile(scope, code, Some(&origin))
        .ok_or_else(|| Error::Js(exception_message(scope)))?;
    let value = script
        .run(scope)
        .ok_or_else(|| Error::Js(exception_message(scope)))?;
    v8::Local::<v8::Function>::try_from(value)
        .map_err(|_| Error::Js("document setup did not produce a function".to_owned()))
}

/// A MathJax document living in its own V8 isolate.
///
/// The isolate is only entered while it runs, so any number of engines can
/// share a thread and be dropped in any order.
pub struct Embedded {
    convert: Global<Function>,
    context: Global<Context>,
    isolate: OwnedIsolate,
}

impl Embedded {
    /// Evaluates the bundle, registers the HTML handler and builds the
    /// document. Nothing here is repeated per conversion.
    pub fn new(bundle: &Bundle, tex: &TexOptions, svg: &SvgOptions) -> Result<Self, Error> {
        initialize_platform();
        let glue = script::embedded_document(tex, svg)?;

        let mut isolate = v8::Isolate::new(Default::default());
        let (context, convert) = {
            let handle_scope = &mut v8::HandleScope::new(&mut isolate);
            let context = v8::Context::new(handle_scope);
            let global_context = Global::new(handle_scope, context);
            let scope = &mut v8::ContextScope::new(handle_scope, context);
            let scope = &mut v8::TryCatch::new(scope);

            let namespace = load_namespace(scope, bundle)?;
            let key = new_string(scope, NAMESPACE_KEY)?;
            context
                .global(scope)
                .set(scope, key.into(), namespace.into())
                .ok_or_else(|| Error::Js(exception_message(scope)))?;

            let convert = run_document_script(scope, &glue)?;
            (global_context, Global::new(scope, convert))
        };
        // `Isolate::new` entered the isolate; leave it until the next use.
        unsafe { isolate.exit() };
        debug!(
            "MathJax document ready (packages: {:?}, font cache: {})",
            tex.packages, svg.font_cache
        );

        Ok(Self {
            convert,
            context,
            isolate,
        })
    }

    /// Converts one expression and serializes the resulting node.
    pub fn convert(&mut self, math: &str, mode: DisplayMode) -> Result<String, Error> {
        unsafe { self.isolate.enter() };
        let result = self.convert_entered(math, mode);
        unsafe { self.isolate.exit() };
        result
    }

    fn convert_entered(&mut self, math: &str, mode: DisplayMode) -> Result<String, Error> {
        let handle_scope = &mut v8::HandleScope::new(&mut self.isolate);
        let context = v8::Local::new(handle_scope, &self.context);
        let scope = &mut v8::ContextScope::new(handle_scope, context);
        let scope = &mut v8::TryCatch::new(scope);

        let convert = v8::Local::new(scope, &self.convert);
        let recv: v8::Local<v8::Value> = v8::undefined(scope).into();
        let args: [v8::Local<v8::Value>; 2] = [
            new_string(scope, math)?.into(),
            v8::Boolean::new(scope, mode.is_display()).into(),
        ];
        let result = convert
            .call(scope, recv, &args)
            .ok_or_else(|| Error::Js(exception_message(scope)))?;
        Ok(result.to_rust_string_lossy(scope))
    }
}

impl Drop for Embedded {
    fn drop(&mut self) {
        // `OwnedIsolate` exits the isolate when dropped, so it must be current.
        unsafe { self.isolate.enter() };
    }
}
