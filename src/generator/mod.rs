// src/generator/mod.rs
//! In-process type signature generator.
//!
//! Constructed from the caller's options map, `run` reads the
//! documentation registry the extraction stage left in a directory and
//! builds an intermediate model of every namespace and method; the two
//! output representations are rendered from that model on demand.
//!
//! Progress and warning text goes into an explicit [`GenLog`] sink handed
//! to `run`, so concurrent generator runs never share any output state.

pub mod registry;
pub mod types;

use crate::errors::{PipelineError, Result};
use registry::{MethodDoc, NamespaceDoc, NamespaceKind, Registry};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use types::{RubyType, TypeConverter};

/// Version reported in the response info block.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options recognized by the generator. Deserialized from the caller's
/// open options map; unrecognized keys (including the handler-level
/// `mode`) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Signatures with at least this many parameters are broken across
    /// multiple lines.
    pub break_params: usize,
    /// Render documentation comments above each item.
    pub comments: bool,
    /// Replace type expressions that cannot be understood with untyped
    /// instead of a sentinel constant.
    pub replace_errors_with_untyped: bool,
    /// Replace constants that resolve to nothing known with untyped
    /// instead of a sentinel constant.
    pub replace_unresolved_with_untyped: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            break_params: 4,
            comments: true,
            replace_errors_with_untyped: false,
            replace_unresolved_with_untyped: false,
        }
    }
}

/// One of the supported output representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Sorbet-style interface with inline `sig` blocks (RBI).
    BinaryInterface,
    /// Standalone signature files (RBS).
    SignatureInterface,
}

impl Representation {
    /// Case-insensitive match against the closed selector set, accepting
    /// the short file-extension aliases as well.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "binary-interface" | "rbi" => Some(Representation::BinaryInterface),
            "signature-interface" | "rbs" => Some(Representation::SignatureInterface),
            _ => None,
        }
    }
}

/// In-memory sink for the generator's progress text. Lines carry the
/// same five-column level tags the CLI generator prints, minus coloring,
/// so captured logs are deterministic.
#[derive(Debug, Default)]
pub struct GenLog {
    buf: String,
}

impl GenLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, msg: &str) {
        self.line("WARN ", msg);
    }

    pub fn done(&mut self, msg: &str) {
        self.line("DONE ", msg);
    }

    fn line(&mut self, tag: &str, msg: &str) {
        self.buf.push_str(&format!("[{}] {}\n", tag, msg));
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

#[derive(Debug)]
struct SigNamespace {
    kind: NamespaceKind,
    name: String,
    superclass: Option<String>,
    comment: String,
    children: Vec<SigNamespace>,
    methods: Vec<SigMethod>,
}

#[derive(Debug)]
struct SigMethod {
    name: String,
    class_method: bool,
    comment: String,
    params: Vec<SigParam>,
    ret: RubyType,
}

#[derive(Debug)]
struct SigParam {
    name: String,
    default: Option<String>,
    ty: RubyType,
}

/// The signature generator. Opaque to everything above the pipeline: the
/// handler only constructs it, runs it, and queries one representation.
#[derive(Debug)]
pub struct Generator {
    options: GeneratorOptions,
    model: Option<Vec<SigNamespace>>,
}

impl Generator {
    pub fn new(options: &Map<String, Value>) -> Result<Self> {
        let options: GeneratorOptions = serde_json::from_value(Value::Object(options.clone()))
            .map_err(|e| PipelineError::Options(e.to_string()))?;
        Ok(Self {
            options,
            model: None,
        })
    }

    /// Processes the registry found in `dir` into the signature model,
    /// reporting progress into `log`.
    pub fn run(&mut self, dir: &Path, log: &mut GenLog) -> Result<()> {
        let registry = Registry::load(dir)?;
        let converter = TypeConverter::new(&self.options, registry.namespace_names());

        let mut namespaces = 0usize;
        let mut methods = 0usize;
        let model: Vec<SigNamespace> = registry
            .objects
            .iter()
            .map(|ns| build_namespace(&converter, ns, None, &mut namespaces, &mut methods, log))
            .collect();

        self.model = Some(model);
        log.done(&format!(
            "Processed {} objects ({} namespaces and {} methods)",
            namespaces + methods,
            namespaces,
            methods
        ));
        Ok(())
    }

    /// Output text for the given representation; `None` before a
    /// successful run.
    pub fn representation(&self, repr: Representation) -> Option<String> {
        match repr {
            Representation::BinaryInterface => self.rbi(),
            Representation::SignatureInterface => self.rbs(),
        }
    }

    pub fn rbs(&self) -> Option<String> {
        let model = self.model.as_ref()?;
        let mut out = Vec::new();
        let mut first = true;
        for ns in model {
            if !first {
                out.push(String::new());
            }
            first = false;
            render_namespace(ns, 0, &self.options, Syntax::Rbs, &mut out);
        }
        Some(out.join("\n"))
    }

    pub fn rbi(&self) -> Option<String> {
        let model = self.model.as_ref()?;
        let mut out = vec!["# typed: strong".to_string()];
        for ns in model {
            out.push(String::new());
            render_namespace(ns, 0, &self.options, Syntax::Rbi, &mut out);
        }
        Some(out.join("\n"))
    }
}

fn build_namespace(
    converter: &TypeConverter,
    doc: &NamespaceDoc,
    parent: Option<&str>,
    namespaces: &mut usize,
    methods: &mut usize,
    log: &mut GenLog,
) -> SigNamespace {
    *namespaces += 1;
    let path = match parent {
        Some(parent) => format!("{}::{}", parent, doc.name),
        None => doc.name.clone(),
    };

    let children = doc
        .children
        .iter()
        .map(|child| build_namespace(converter, child, Some(&path), namespaces, methods, log))
        .collect();

    let built_methods = doc
        .methods
        .iter()
        .map(|m| {
            *methods += 1;
            build_method(converter, m, &path, log)
        })
        .collect();

    SigNamespace {
        kind: doc.kind,
        name: doc.name.clone(),
        superclass: doc.superclass.clone(),
        comment: doc.comment.clone(),
        children,
        methods: built_methods,
    }
}

fn build_method(
    converter: &TypeConverter,
    doc: &MethodDoc,
    namespace_path: &str,
    log: &mut GenLog,
) -> SigMethod {
    let context = if doc.class_method {
        format!("{}.{}", namespace_path, doc.name)
    } else {
        format!("{}#{}", namespace_path, doc.name)
    };

    let params = doc
        .params
        .iter()
        .map(|p| {
            let ty = match doc.param_types.get(&p.name) {
                Some(raw) => converter.convert_list(raw, &context, log),
                None => {
                    log.warn(&format!(
                        "{} has no documented type for parameter '{}', using untyped",
                        context, p.name
                    ));
                    RubyType::Untyped
                }
            };
            SigParam {
                name: p.name.clone(),
                default: p.default.clone(),
                ty,
            }
        })
        .collect();

    let ret = if doc.return_types.is_empty() {
        log.warn(&format!(
            "{} has no documented return type, using untyped",
            context
        ));
        RubyType::Untyped
    } else {
        converter.convert_list(&doc.return_types, &context, log)
    };

    SigMethod {
        name: doc.name.clone(),
        class_method: doc.class_method,
        comment: doc.comment.clone(),
        params,
        ret,
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Syntax {
    Rbs,
    Rbi,
}

fn render_namespace(
    ns: &SigNamespace,
    indent: usize,
    options: &GeneratorOptions,
    syntax: Syntax,
    out: &mut Vec<String>,
) {
    let pad = " ".repeat(indent);
    render_comment(&ns.comment, &pad, options, out);

    let keyword = match ns.kind {
        NamespaceKind::Class => "class",
        NamespaceKind::Module => "module",
    };
    match &ns.superclass {
        Some(superclass) => out.push(format!("{}{} {} < {}", pad, keyword, ns.name, superclass)),
        None => out.push(format!("{}{} {}", pad, keyword, ns.name)),
    }

    let mut first = true;
    for child in &ns.children {
        if !first {
            out.push(String::new());
        }
        first = false;
        render_namespace(child, indent + 2, options, syntax, out);
    }
    for method in &ns.methods {
        if !first {
            out.push(String::new());
        }
        first = false;
        match syntax {
            Syntax::Rbs => render_method_rbs(method, indent + 2, options, out),
            Syntax::Rbi => render_method_rbi(method, indent + 2, options, out),
        }
    }

    out.push(format!("{}end", pad));
}

fn render_comment(comment: &str, pad: &str, options: &GeneratorOptions, out: &mut Vec<String>) {
    if !options.comments || comment.is_empty() {
        return;
    }
    for line in comment.lines() {
        out.push(format!("{}# {}", pad, line));
    }
}

fn render_method_rbs(m: &SigMethod, indent: usize, options: &GeneratorOptions, out: &mut Vec<String>) {
    let pad = " ".repeat(indent);
    render_comment(&m.comment, &pad, options, out);

    let receiver = if m.class_method { "self." } else { "" };
    let ret = m.ret.rbs();

    let rendered: Vec<String> = m
        .params
        .iter()
        .map(|p| {
            if p.default.is_some() {
                format!("?{} {}", p.ty.rbs(), p.name)
            } else {
                format!("{} {}", p.ty.rbs(), p.name)
            }
        })
        .collect();

    if !m.params.is_empty() && m.params.len() >= options.break_params {
        out.push(format!("{}def {}{}: (", pad, receiver, m.name));
        for (i, param) in rendered.iter().enumerate() {
            let comma = if i + 1 < rendered.len() { "," } else { "" };
            out.push(format!("{}  {}{}", pad, param, comma));
        }
        out.push(format!("{}) -> {}", pad, ret));
    } else {
        out.push(format!(
            "{}def {}{}: ({}) -> {}",
            pad,
            receiver,
            m.name,
            rendered.join(", "),
            ret
        ));
    }
}

fn render_method_rbi(m: &SigMethod, indent: usize, options: &GeneratorOptions, out: &mut Vec<String>) {
    let pad = " ".repeat(indent);
    render_comment(&m.comment, &pad, options, out);

    let returns = match m.ret {
        RubyType::Void => ".void".to_string(),
        ref other => format!(".returns({})", other.rbi()),
    };

    if m.params.is_empty() {
        match m.ret {
            RubyType::Void => out.push(format!("{}sig {{ void }}", pad)),
            ref other => out.push(format!("{}sig {{ returns({}) }}", pad, other.rbi())),
        }
    } else if m.params.len() >= options.break_params {
        out.push(format!("{}sig do", pad));
        out.push(format!("{}  params(", pad));
        for (i, p) in m.params.iter().enumerate() {
            let comma = if i + 1 < m.params.len() { "," } else { "" };
            out.push(format!("{}    {}: {}{}", pad, p.name, p.ty.rbi(), comma));
        }
        out.push(format!("{}  ){}", pad, returns));
        out.push(format!("{}end", pad));
    } else {
        let rendered: Vec<String> = m
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty.rbi()))
            .collect();
        out.push(format!(
            "{}sig {{ params({}){} }}",
            pad,
            rendered.join(", "),
            returns
        ));
    }

    let receiver = if m.class_method { "self." } else { "" };
    let def_params: Vec<String> = m
        .params
        .iter()
        .map(|p| match &p.default {
            Some(default) => format!("{} = {}", p.name, default),
            None => p.name.clone(),
        })
        .collect();
    if def_params.is_empty() {
        out.push(format!("{}def {}{}; end", pad, receiver, m.name));
    } else {
        out.push(format!(
            "{}def {}{}({}); end",
            pad,
            receiver,
            m.name,
            def_params.join(", ")
        ));
    }
}
