//! TypeScript type expressions
//!
//! Schema synthesis produces [`TsType`] trees and the emitter prints them.
//! Printing is a pure function of the tree, so two equal trees always render
//! to byte-identical text.

use serde::{Deserialize, Serialize};
use std::fmt;

const INDENT: &str = "  ";

/// Built-in TypeScript type keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyword {
    String,
    Number,
    Boolean,
    Null,
    Any,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::String => "string",
            Keyword::Number => "number",
            Keyword::Boolean => "boolean",
            Keyword::Null => "null",
            Keyword::Any => "any",
        }
    }
}

/// A TypeScript type expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TsType {
    /// `string`, `number`, `boolean`, `null`, `any`
    Keyword(Keyword),

    /// Literal type, kept in its printed form (`"cat"`, `42`, `true`)
    Literal(String),

    /// Reference to a named type
    Ref(String),

    /// `T[]` or `Array<T>`
    Array(Box<TsType>),

    /// `A | B | C`
    Union(Vec<TsType>),

    /// `A & B & C`
    Intersection(Vec<TsType>),

    /// Record type literal `{ a: string; b?: number; }`
    Object(Vec<TsField>),
}

/// One field of a record type literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsField {
    pub name: String,
    pub ty: TsType,
    pub required: bool,
    pub read_only: bool,
    pub description: Option<String>,
}

impl TsField {
    /// Required, writable field without documentation
    pub fn new(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            read_only: false,
            description: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

impl TsType {
    pub fn string() -> Self {
        TsType::Keyword(Keyword::String)
    }

    pub fn number() -> Self {
        TsType::Keyword(Keyword::Number)
    }

    pub fn any() -> Self {
        TsType::Keyword(Keyword::Any)
    }

    /// Quoted string literal type
    pub fn string_literal(value: &str) -> Self {
        TsType::Literal(serde_json::Value::String(value.to_string()).to_string())
    }

    /// Literal type for any JSON scalar (`"a"`, `1`, `true`, `null`)
    pub fn json_literal(value: &serde_json::Value) -> Self {
        TsType::Literal(value.to_string())
    }

    /// True for types printed as a single identifier (`Pet`, `string`)
    ///
    /// Arrays of these use the `T[]` form, everything else `Array<T>`.
    pub fn is_bare_identifier(&self) -> bool {
        matches!(self, TsType::Keyword(_) | TsType::Ref(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, TsType::Object(_))
    }

    /// Render at the top level
    pub fn render(&self) -> String {
        self.render_at(0)
    }

    /// Render with nested record literals indented relative to `indent`
    pub fn render_at(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write(&mut out, indent);
        out
    }

    fn write(&self, out: &mut String, indent: usize) {
        match self {
            TsType::Keyword(keyword) => out.push_str(keyword.as_str()),
            TsType::Literal(literal) => out.push_str(literal),
            TsType::Ref(name) => out.push_str(name),
            TsType::Array(element) => {
                if element.is_bare_identifier() {
                    element.write(out, indent);
                    out.push_str("[]");
                } else {
                    out.push_str("Array<");
                    element.write(out, indent);
                    out.push('>');
                }
            }
            TsType::Union(members) => {
                if members.is_empty() {
                    out.push_str("never");
                }
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" | ");
                    }
                    write_grouped(out, member, indent, matches!(member, TsType::Intersection(_)));
                }
            }
            TsType::Intersection(members) => {
                if members.is_empty() {
                    out.push_str("unknown");
                }
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" & ");
                    }
                    write_grouped(out, member, indent, matches!(member, TsType::Union(_)));
                }
            }
            TsType::Object(fields) => {
                if fields.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{\n");
                for field in fields {
                    field.write(out, indent + 1);
                }
                out.push_str(&INDENT.repeat(indent));
                out.push('}');
            }
        }
    }
}

fn write_grouped(out: &mut String, ty: &TsType, indent: usize, parenthesize: bool) {
    if parenthesize {
        out.push('(');
        ty.write(out, indent);
        out.push(')');
    } else {
        ty.write(out, indent);
    }
}

impl TsField {
    fn write(&self, out: &mut String, indent: usize) {
        if let Some(description) = &self.description {
            out.push_str(&doc_comment(description, indent));
        }
        out.push_str(&INDENT.repeat(indent));
        if self.read_only {
            out.push_str("readonly ");
        }
        if is_identifier(&self.name) {
            out.push_str(&self.name);
        } else {
            out.push_str(&serde_json::Value::String(self.name.clone()).to_string());
        }
        if !self.required {
            out.push('?');
        }
        out.push_str(": ");
        self.ty.write(out, indent);
        out.push_str(";\n");
    }
}

impl fmt::Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Whether `name` can be written as a bare TypeScript identifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Render `text` as a `/** ... */` block indented by `indent` levels
///
/// Returns an empty string for blank text. The result ends with a newline.
pub fn doc_comment(text: &str, indent: usize) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let pad = INDENT.repeat(indent);
    let escaped = text.replace("*/", "*\\/");
    let lines: Vec<&str> = escaped.lines().map(str::trim_end).collect();

    if lines.len() == 1 {
        return format!("{}/** {} */\n", pad, lines[0]);
    }

    let mut out = format!("{}/**\n", pad);
    for line in lines {
        if line.is_empty() {
            out.push_str(&format!("{} *\n", pad));
        } else {
            out.push_str(&format!("{} * {}\n", pad, line));
        }
    }
    out.push_str(&format!("{} */\n", pad));
    out
}
