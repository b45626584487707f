//! Renders JSON attribute trees as HCL
//!
//! Every value is first classified into a [`Shape`] and the shape alone decides
//! how it is written. Keys are emitted in the order of the input map, which is
//! insertion order because `serde_json` is built with `preserve_order`.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt::Write as _;

use super::naming::normalize;

/// A key that could not be rendered and was dropped from the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Location of the value, e.g. `rules[1].conditions`
    pub path: String,
    pub reason: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// How a single value is written
#[derive(Debug)]
enum Shape<'a> {
    /// `null`; the key is omitted
    Null,
    /// `[]` or `{}`; the key is omitted
    Empty,
    /// Quoted string
    Text(&'a str),
    /// Number or boolean, written bare
    Literal(String),
    /// `key = [a, b]`
    ScalarList(&'a [Value]),
    /// One `key { ... }` block per element; elements are objects or lists
    BlockList(&'a [Value]),
    /// `key = { ... }`
    Object(&'a Map<String, Value>),
    Unsupported(&'static str),
}

fn classify(value: &Value) -> Shape<'_> {
    match value {
        Value::Null => Shape::Null,
        Value::String(s) => Shape::Text(s),
        Value::Number(n) => Shape::Literal(n.to_string()),
        Value::Bool(b) => Shape::Literal(b.to_string()),
        Value::Object(map) if map.is_empty() => Shape::Empty,
        Value::Object(map) => Shape::Object(map),
        Value::Array(items) if items.is_empty() => Shape::Empty,
        Value::Array(items) => classify_list(items),
    }
}

fn classify_list(items: &[Value]) -> Shape<'_> {
    if items.iter().any(Value::is_null) {
        return Shape::Unsupported("list contains null elements");
    }
    if items.iter().all(is_scalar) {
        return Shape::ScalarList(items);
    }
    if items.iter().all(|item| item.is_object() || item.is_array()) {
        return Shape::BlockList(items);
    }
    Shape::Unsupported("list mixes scalar and composite values")
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// Render a scalar list element
fn scalar_literal(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        other => other.to_string(),
    }
}

/// Quote a string as an HCL template literal.
///
/// Interpolation and directive openers (`${`, `%{`) are doubled so the value
/// is read back literally.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');

    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }

    out.push('"');
    out
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

/// Accumulates HCL text and the diagnostics produced while rendering it
#[derive(Debug, Default)]
pub struct HclWriter {
    buf: String,
    diagnostics: Vec<Diagnostic>,
}

impl HclWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw text (block headers, passthrough content)
    pub fn push_str(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Record a diagnostic that did not come from attribute rendering
    pub fn report(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        let diagnostic = Diagnostic {
            path: path.into(),
            reason: reason.into(),
        };
        log::warn!("Skipping {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Write every attribute of `attributes` at the given depth.
    ///
    /// `scope` prefixes diagnostic paths, typically the resource address.
    /// Keys that normalize to an already written name are reported and skipped.
    pub fn write_attributes(&mut self, attributes: &Map<String, Value>, depth: usize, scope: &str) {
        let mut written = HashSet::new();

        for (key, value) in attributes {
            let path = if scope.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", scope, key)
            };
            let name = normalize(key);
            let shape = classify(value);

            if written.contains(&name) {
                if !matches!(shape, Shape::Null | Shape::Empty) {
                    self.report(path, format!("duplicates attribute `{}` after normalization", name));
                }
                continue;
            }

            if self.write_value(&name, shape, depth, &path) {
                written.insert(name);
            }
        }
    }

    /// Returns whether anything was written for the key
    fn write_value(&mut self, name: &str, shape: Shape<'_>, depth: usize, path: &str) -> bool {
        let pad = indent(depth);

        match shape {
            Shape::Null | Shape::Empty => return false,
            Shape::Text(s) => {
                let _ = writeln!(self.buf, "{}{} = {}", pad, name, quote(s));
            }
            Shape::Literal(literal) => {
                let _ = writeln!(self.buf, "{}{} = {}", pad, name, literal);
            }
            Shape::ScalarList(items) => {
                let rendered: Vec<String> = items.iter().map(scalar_literal).collect();
                let _ = writeln!(self.buf, "{}{} = [{}]", pad, name, rendered.join(", "));
            }
            Shape::BlockList(items) => {
                for (idx, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, idx);
                    let _ = write!(self.buf, "\n{}{} {{\n", pad, name);
                    match item {
                        Value::Object(map) => self.write_attributes(map, depth + 1, &item_path),
                        Value::Array(inner) if !inner.is_empty() => {
                            self.report(item_path, "list element has no keys; block left empty")
                        }
                        _ => {}
                    }
                    let _ = writeln!(self.buf, "{}}}", pad);
                }
            }
            Shape::Object(map) => {
                let _ = write!(self.buf, "\n{}{} = {{\n", pad, name);
                self.write_attributes(map, depth + 1, path);
                let _ = writeln!(self.buf, "{}}}", pad);
            }
            Shape::Unsupported(reason) => {
                self.report(path, reason);
                return false;
            }
        }
        true
    }

    /// Consume the writer, returning the text and all diagnostics
    pub fn finish(self) -> (String, Vec<Diagnostic>) {
        (self.buf, self.diagnostics)
    }
}

/// Render an attribute map at `depth` into a fresh string
#[allow(dead_code)]
pub fn render_attributes(attributes: &Map<String, Value>, depth: usize) -> (String, Vec<Diagnostic>) {
    let mut writer = HclWriter::new();
    writer.write_attributes(attributes, depth, "");
    writer.finish()
}
