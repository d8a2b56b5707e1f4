//! # Templates
//!
//! A small subset of Go's `text/template` action syntax, enough to
//! substitute a [`RenderContext`] into a text file:
//!
//! * `{{.name}}` prints the value bound to `name`, or `<no value>`.
//! * `{{index . "api.example.com"}}` looks up keys that are not identifiers.
//!   A missing key prints `[]`.
//! * `{{.}}` prints the whole context.
//! * `{{/* ... */}}` is a comment.
//! * `{{- ` and ` -}}` trim the whitespace around an action.
//!
//! Control structures, pipelines and functions are rejected when parsing.

use std::path::PathBuf;

use thiserror::Error;

use crate::context::{ListDisplay, RenderContext};

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";
const NO_VALUE: &str = "<no value>";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("error reading template {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template: {name}:{line}: unclosed {what}")]
    Unclosed {
        name: String,
        line: usize,
        what: &'static str,
    },
    #[error("template: {name}:{line}: {message}")]
    Syntax {
        name: String,
        line: usize,
        message: String,
    },
    #[error("template: {name}:{line}: unsupported action {{{{{action}}}}}")]
    Unsupported {
        name: String,
        line: usize,
        action: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    Text(String),
    Dot,
    Field(String),
    Index(String),
}

/// Result of scanning one action after its opening delimiter.
enum Scanned<'a> {
    Comment,
    Expr(&'a str),
}

#[derive(Clone, Debug)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(name: &str, source: &str) -> Result<Self, TemplateError> {
        let mut nodes: Vec<Node> = Vec::new();
        let mut rest: &str = source;
        let mut offset: usize = 0;
        let mut trim_next: bool = false;

        while let Some(open) = rest.find(LEFT_DELIM) {
            let line = line_at(source, offset + open);
            let err = |kind: ErrorKind| kind.into_error(name, line);

            let mut text: &str = &rest[..open];
            if trim_next {
                text = text.trim_start_matches(is_space);
            }

            let after_open: &str = &rest[open + LEFT_DELIM.len()..];
            let trim_left = has_left_trim_marker(after_open);
            if trim_left {
                text = text.trim_end_matches(is_space);
            }
            push_text(&mut nodes, text);

            let body_start = if trim_left { 1 } else { 0 };
            let (scanned, trim_right, consumed) =
                scan_action(&after_open[body_start..]).map_err(err)?;

            if let Scanned::Expr(expr) = scanned {
                nodes.push(parse_action(expr.trim()).map_err(err)?);
            }

            trim_next = trim_right;
            let advance = open + LEFT_DELIM.len() + body_start + consumed;
            offset += advance;
            rest = &rest[advance..];
        }

        let text = if trim_next { rest.trim_start_matches(is_space) } else { rest };
        push_text(&mut nodes, text);

        Ok(Self {
            name: name.to_string(),
            nodes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn execute(&self, ctx: &RenderContext) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Dot => out.push_str(&ctx.to_string()),
                Node::Field(key) => match ctx.get(key) {
                    Some(values) => out.push_str(&ListDisplay(values).to_string()),
                    None => out.push_str(NO_VALUE),
                },
                Node::Index(key) => {
                    let values = ctx.get(key).unwrap_or_default();
                    out.push_str(&ListDisplay(values).to_string());
                }
            }
        }
        out
    }
}

enum ErrorKind {
    Unclosed(&'static str),
    Syntax(String),
    Unsupported(String),
}

impl ErrorKind {
    fn into_error(self, name: &str, line: usize) -> TemplateError {
        let name = name.to_string();
        match self {
            ErrorKind::Unclosed(what) => TemplateError::Unclosed { name, line, what },
            ErrorKind::Syntax(message) => TemplateError::Syntax {
                name,
                line,
                message,
            },
            ErrorKind::Unsupported(action) => TemplateError::Unsupported { name, line, action },
        }
    }
}

fn line_at(source: &str, byte_offset: usize) -> usize {
    source[..byte_offset].matches('\n').count() + 1
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if !text.is_empty() {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// `{{- ` needs whitespace after the dash, otherwise `{{-3}}` would be a trim.
fn has_left_trim_marker(after_open: &str) -> bool {
    let mut chars = after_open.chars();
    chars.next() == Some('-') && chars.next().is_some_and(is_space)
}

/// ` -}}` needs whitespace before the dash.
fn has_right_trim_marker(before_close: &str) -> bool {
    let mut chars = before_close.chars().rev();
    chars.next() == Some('-') && chars.next().is_some_and(is_space)
}

/// Finds the end of the action starting at `body`.
/// Returns what was scanned, whether it ends with a trim marker and how many
/// bytes of `body` it used, closing delimiter included.
fn scan_action(body: &str) -> Result<(Scanned<'_>, bool, usize), ErrorKind> {
    let leading = body.len() - body.trim_start_matches(is_space).len();
    if body[leading..].starts_with(COMMENT_OPEN) {
        return scan_comment(body, leading);
    }

    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, c) in body.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '`' => quote = Some(c),
            None if body[idx..].starts_with(RIGHT_DELIM) => {
                let expr = &body[..idx];
                let consumed = idx + RIGHT_DELIM.len();
                if has_right_trim_marker(expr) {
                    return Ok((Scanned::Expr(&expr[..expr.len() - 1]), true, consumed));
                }
                return Ok((Scanned::Expr(expr), false, consumed));
            }
            None => {}
        }
    }

    Err(match quote {
        Some(_) => ErrorKind::Syntax("unterminated quoted string".to_string()),
        None => ErrorKind::Unclosed("action"),
    })
}

fn scan_comment(body: &str, start: usize) -> Result<(Scanned<'_>, bool, usize), ErrorKind> {
    let search_from = start + COMMENT_OPEN.len();
    let close = body[search_from..]
        .find(COMMENT_CLOSE)
        .map(|idx| search_from + idx + COMMENT_CLOSE.len())
        .ok_or(ErrorKind::Unclosed("comment"))?;

    let after = &body[close..];
    if after.starts_with(RIGHT_DELIM) {
        return Ok((Scanned::Comment, false, close + RIGHT_DELIM.len()));
    }

    let mut chars = after.chars();
    if let Some(space) = chars.next().filter(|c| is_space(*c))
        && chars.as_str().starts_with("-}}")
    {
        let consumed = close + space.len_utf8() + "-}}".len();
        return Ok((Scanned::Comment, true, consumed));
    }

    Err(ErrorKind::Syntax(
        "comment ends before closing delimiter".to_string(),
    ))
}

fn parse_action(expr: &str) -> Result<Node, ErrorKind> {
    if expr.is_empty() {
        return Err(ErrorKind::Syntax("missing value for command".to_string()));
    }
    if expr == "." {
        return Ok(Node::Dot);
    }
    if let Some(field) = expr.strip_prefix('.') {
        return parse_field(expr, field);
    }

    let (word, args) = expr
        .split_once(is_space)
        .map(|(word, args)| (word, args.trim()))
        .unwrap_or((expr, ""));

    if word == "index" {
        return parse_index(expr, args);
    }
    Err(ErrorKind::Unsupported(expr.to_string()))
}

fn parse_field(expr: &str, field: &str) -> Result<Node, ErrorKind> {
    if field.contains('.') {
        return Err(ErrorKind::Unsupported(expr.to_string()));
    }
    if field.contains(|c: char| is_space(c) || c == '|' || c == '(') {
        return Err(ErrorKind::Unsupported(expr.to_string()));
    }
    if !is_identifier(field) {
        return Err(ErrorKind::Syntax(format!(
            "bad field name {field:?}, use {{{{index . \"{field}\"}}}}"
        )));
    }
    Ok(Node::Field(field.to_string()))
}

fn parse_index(expr: &str, args: &str) -> Result<Node, ErrorKind> {
    let Some(key_literal) = args.strip_prefix('.') else {
        return Err(ErrorKind::Unsupported(expr.to_string()));
    };
    if key_literal.trim().is_empty() {
        return Err(ErrorKind::Syntax("index of . needs a key".to_string()));
    }
    if !key_literal.starts_with(is_space) {
        return Err(ErrorKind::Unsupported(expr.to_string()));
    }

    let key_literal = key_literal.trim();

    let key = unquote(key_literal).ok_or_else(|| {
        ErrorKind::Syntax(format!("index key {key_literal} is not a single string literal"))
    })?;
    Ok(Node::Index(key))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Decodes a `"quoted"` or `` `raw` `` string that must span all of `literal`.
fn unquote(literal: &str) -> Option<String> {
    if let Some(raw) = literal.strip_prefix('`') {
        let body = raw.strip_suffix('`')?;
        return (!body.contains('`')).then(|| body.to_string());
    }

    let body = literal.strip_prefix('"')?;
    let mut out = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return chars.as_str().is_empty().then_some(out),
            '\\' => out.push(match chars.next()? {
                '"' => '"',
                '\\' => '\\',
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                _ => return None,
            }),
            _ => out.push(c),
        }
    }
    None
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
