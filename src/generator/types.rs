// src/generator/types.rs
//! Conversion from documentation tag type expressions to signature types.

use super::{GenLog, GeneratorOptions};
use regex::Regex;
use std::collections::HashSet;

/// A type as it appears in a generated signature, renderable in either
/// supported representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RubyType {
    Untyped,
    Boolean,
    Void,
    Nil,
    /// A constant path, e.g. `String` or `Foo::Bar`.
    Simple(String),
    Array(Box<RubyType>),
    Hash(Box<RubyType>, Box<RubyType>),
    Optional(Box<RubyType>),
    Union(Vec<RubyType>),
    /// A type expression that could not be understood; renders as a
    /// sentinel constant so the problem is visible in the output.
    Unresolved(String),
}

impl RubyType {
    pub fn rbs(&self) -> String {
        match self {
            RubyType::Untyped => "untyped".to_string(),
            RubyType::Boolean => "bool".to_string(),
            RubyType::Void => "void".to_string(),
            RubyType::Nil => "nil".to_string(),
            RubyType::Simple(name) => name.clone(),
            RubyType::Array(element) => format!("Array[{}]", element.rbs()),
            RubyType::Hash(key, value) => format!("Hash[{}, {}]", key.rbs(), value.rbs()),
            RubyType::Optional(inner) => format!("{}?", inner.rbs()),
            RubyType::Union(members) => {
                let rendered: Vec<String> = members.iter().map(|m| m.rbs()).collect();
                format!("({})", rendered.join(" | "))
            }
            RubyType::Unresolved(name) => sentinel(name),
        }
    }

    pub fn rbi(&self) -> String {
        match self {
            RubyType::Untyped => "T.untyped".to_string(),
            RubyType::Boolean => "T::Boolean".to_string(),
            RubyType::Void => "void".to_string(),
            RubyType::Nil => "NilClass".to_string(),
            RubyType::Simple(name) => name.clone(),
            RubyType::Array(element) => format!("T::Array[{}]", element.rbi()),
            RubyType::Hash(key, value) => format!("T::Hash[{}, {}]", key.rbi(), value.rbi()),
            RubyType::Optional(inner) => format!("T.nilable({})", inner.rbi()),
            RubyType::Union(members) => {
                let rendered: Vec<String> = members.iter().map(|m| m.rbi()).collect();
                format!("T.any({})", rendered.join(", "))
            }
            RubyType::Unresolved(name) => sentinel(name),
        }
    }
}

/// Constants the converter accepts without the submitted code defining
/// them itself.
const BUILTIN_CONSTANTS: &[&str] = &[
    "String", "Integer", "Float", "Numeric", "Rational", "Complex", "Symbol", "Object",
    "BasicObject", "Array", "Hash", "Range", "Proc", "Method", "Regexp", "MatchData", "Time",
    "Date", "DateTime", "IO", "File", "Dir", "Exception", "StandardError", "RuntimeError",
    "ArgumentError", "TypeError", "Class", "Module", "NilClass", "TrueClass", "FalseClass",
    "Comparable", "Enumerable", "Enumerator", "Kernel", "Struct", "Set", "Thread", "Mutex",
    "Binding", "Encoding",
];

pub struct TypeConverter {
    replace_errors_with_untyped: bool,
    replace_unresolved_with_untyped: bool,
    defined_names: HashSet<String>,
}

impl TypeConverter {
    pub fn new(options: &GeneratorOptions, defined_names: HashSet<String>) -> Self {
        Self {
            replace_errors_with_untyped: options.replace_errors_with_untyped,
            replace_unresolved_with_untyped: options.replace_unresolved_with_untyped,
            defined_names,
        }
    }

    /// Converts the raw type list of one tag. `nil` entries make the rest
    /// of the list optional; multiple remaining entries form a union.
    pub fn convert_list(&self, types: &[String], context: &str, log: &mut GenLog) -> RubyType {
        if types.is_empty() {
            return RubyType::Untyped;
        }

        let mut nilable = false;
        let mut members = Vec::new();
        for raw in types {
            let raw = raw.trim();
            if raw.eq_ignore_ascii_case("nil") {
                nilable = true;
            } else {
                members.push(self.convert_one(raw, context, log));
            }
        }

        let base = match members.len() {
            0 => return RubyType::Nil,
            1 => members.remove(0),
            _ => RubyType::Union(members),
        };

        if nilable {
            RubyType::Optional(Box::new(base))
        } else {
            base
        }
    }

    fn convert_one(&self, expr: &str, context: &str, log: &mut GenLog) -> RubyType {
        match expr {
            "untyped" => return RubyType::Untyped,
            "void" => return RubyType::Void,
            "Boolean" | "Bool" | "bool" | "true" | "false" => return RubyType::Boolean,
            _ => {}
        }

        let generic_re = Regex::new(r"^([A-Z]\w*(?:::[A-Z]\w*)*)<(.+)>$").unwrap();
        if let Some(caps) = generic_re.captures(expr) {
            let container = &caps[1];
            let args: Vec<String> = split_top_level(&caps[2], ',');
            return match container {
                "Array" => {
                    // Multiple arguments mean "an array of any of these".
                    let element = self.convert_list(&args, context, log);
                    RubyType::Array(Box::new(element))
                }
                "Hash" if args.len() == 2 => RubyType::Hash(
                    Box::new(self.convert_list(&args[..1], context, log)),
                    Box::new(self.convert_list(&args[1..], context, log)),
                ),
                _ => self.error_type(expr, context, log),
            };
        }

        let hash_re = Regex::new(r"^Hash\{(.+)\}$").unwrap();
        if let Some(caps) = hash_re.captures(expr) {
            let pairs: Vec<String> = split_top_level_str(&caps[1], "=>");
            if pairs.len() == 2 {
                return RubyType::Hash(
                    Box::new(self.convert_list(&pairs[..1], context, log)),
                    Box::new(self.convert_list(&pairs[1..], context, log)),
                );
            }
            return self.error_type(expr, context, log);
        }

        let const_re = Regex::new(r"^[A-Z]\w*(?:::[A-Z]\w*)*$").unwrap();
        if const_re.is_match(expr) {
            let root = expr.split("::").next().unwrap_or(expr);
            if BUILTIN_CONSTANTS.contains(&root) || self.defined_names.contains(root) {
                return RubyType::Simple(expr.to_string());
            }
            return self.unresolved_type(expr, context, log);
        }

        self.error_type(expr, context, log)
    }

    /// An expression that does not parse as any supported shape.
    fn error_type(&self, expr: &str, context: &str, log: &mut GenLog) -> RubyType {
        if self.replace_errors_with_untyped {
            log.warn(&format!(
                "{}: could not understand type '{}', using untyped",
                context, expr
            ));
            RubyType::Untyped
        } else {
            log.warn(&format!(
                "{}: could not understand type '{}', generating sentinel constant",
                context, expr
            ));
            RubyType::Unresolved(expr.to_string())
        }
    }

    /// A well-formed constant path that neither the submitted code nor
    /// the builtin set defines.
    fn unresolved_type(&self, expr: &str, context: &str, log: &mut GenLog) -> RubyType {
        if self.replace_unresolved_with_untyped {
            log.warn(&format!(
                "{}: '{}' does not resolve to a known type, using untyped",
                context, expr
            ));
            RubyType::Untyped
        } else {
            log.warn(&format!(
                "{}: '{}' does not resolve to a known type, generating sentinel constant",
                context, expr
            ));
            RubyType::Unresolved(expr.to_string())
        }
    }
}

fn sentinel(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    format!("SORD_ERROR_{}", cleaned)
}

/// Splits on `sep`, ignoring separators nested inside `<>`, `{}`, `()`
/// or `[]`.
fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in s.chars() {
        match c {
            '<' | '{' | '(' | '[' => depth += 1,
            '>' | '}' | ')' | ']' => depth = depth.saturating_sub(1),
            _ if c == sep && depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Like `split_top_level`, but with a multi-character separator.
fn split_top_level_str(s: &str, sep: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '<' | '{' | '(' | '[' => depth += 1,
            '>' | '}' | ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && s[i..].starts_with(sep) {
            parts.push(current.trim().to_string());
            current.clear();
            for _ in 0..sep.len() - 1 {
                chars.next();
            }
            continue;
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter(replace_errors: bool, replace_unresolved: bool) -> TypeConverter {
        let options = GeneratorOptions {
            replace_errors_with_untyped: replace_errors,
            replace_unresolved_with_untyped: replace_unresolved,
            ..GeneratorOptions::default()
        };
        let mut defined = HashSet::new();
        defined.insert("X".to_string());
        TypeConverter::new(&options, defined)
    }

    fn convert(c: &TypeConverter, types: &[&str]) -> RubyType {
        let raw: Vec<String> = types.iter().map(|s| s.to_string()).collect();
        let mut log = GenLog::new();
        c.convert_list(&raw, "Test#m", &mut log)
    }

    #[test]
    fn test_simple_builtin() {
        let c = converter(false, false);
        assert_eq!(convert(&c, &["String"]), RubyType::Simple("String".to_string()));
        assert_eq!(convert(&c, &["String"]).rbs(), "String");
        assert_eq!(convert(&c, &["String"]).rbi(), "String");
    }

    #[test]
    fn test_nil_makes_optional() {
        let c = converter(false, false);
        let ty = convert(&c, &["String", "nil"]);
        assert_eq!(ty.rbs(), "String?");
        assert_eq!(ty.rbi(), "T.nilable(String)");
    }

    #[test]
    fn test_bare_nil() {
        let c = converter(false, false);
        let ty = convert(&c, &["nil"]);
        assert_eq!(ty.rbs(), "nil");
        assert_eq!(ty.rbi(), "NilClass");
    }

    #[test]
    fn test_union() {
        let c = converter(false, false);
        let ty = convert(&c, &["String", "Integer"]);
        assert_eq!(ty.rbs(), "(String | Integer)");
        assert_eq!(ty.rbi(), "T.any(String, Integer)");
    }

    #[test]
    fn test_boolean_spellings() {
        let c = converter(false, false);
        for spelling in ["Boolean", "true", "false"] {
            let ty = convert(&c, &[spelling]);
            assert_eq!(ty.rbs(), "bool");
            assert_eq!(ty.rbi(), "T::Boolean");
        }
    }

    #[test]
    fn test_generic_array() {
        let c = converter(false, false);
        let ty = convert(&c, &["Array<String>"]);
        assert_eq!(ty.rbs(), "Array[String]");
        assert_eq!(ty.rbi(), "T::Array[String]");
    }

    #[test]
    fn test_generic_array_of_union() {
        let c = converter(false, false);
        let ty = convert(&c, &["Array<String, Symbol>"]);
        assert_eq!(ty.rbs(), "Array[(String | Symbol)]");
    }

    #[test]
    fn test_hash_curly_syntax() {
        let c = converter(false, false);
        let ty = convert(&c, &["Hash{String => Integer}"]);
        assert_eq!(ty.rbs(), "Hash[String, Integer]");
        assert_eq!(ty.rbi(), "T::Hash[String, Integer]");
    }

    #[test]
    fn test_nested_generics() {
        let c = converter(false, false);
        let ty = convert(&c, &["Hash{String => Array<Integer>}"]);
        assert_eq!(ty.rbs(), "Hash[String, Array[Integer]]");
    }

    #[test]
    fn test_registry_defined_constant_resolves() {
        let c = converter(false, false);
        assert_eq!(convert(&c, &["X"]), RubyType::Simple("X".to_string()));
    }

    #[test]
    fn test_unknown_constant_becomes_sentinel() {
        let c = converter(false, false);
        let ty = convert(&c, &["Widget"]);
        assert_eq!(ty.rbs(), "SORD_ERROR_Widget");
        assert_eq!(ty.rbi(), "SORD_ERROR_Widget");
    }

    #[test]
    fn test_unknown_constant_replaced_with_untyped() {
        let c = converter(false, true);
        let ty = convert(&c, &["Widget"]);
        assert_eq!(ty, RubyType::Untyped);
    }

    #[test]
    fn test_garbage_expression_becomes_sentinel() {
        let c = converter(false, false);
        let ty = convert(&c, &["a splendid time"]);
        assert_eq!(ty.rbs(), "SORD_ERROR_asplendidtime");
    }

    #[test]
    fn test_garbage_expression_replaced_with_untyped() {
        let c = converter(true, false);
        let ty = convert(&c, &["a splendid time"]);
        assert_eq!(ty, RubyType::Untyped);
    }

    #[test]
    fn test_empty_list_is_untyped() {
        let c = converter(false, false);
        assert_eq!(convert(&c, &[]), RubyType::Untyped);
    }

    #[test]
    fn test_split_top_level_respects_nesting() {
        assert_eq!(
            split_top_level("Hash{A => B}, Array<C, D>", ','),
            vec!["Hash{A => B}", "Array<C, D>"]
        );
        assert_eq!(
            split_top_level_str("Hash{X => Y} => Integer", "=>"),
            vec!["Hash{X => Y}", "Integer"]
        );
    }
}
