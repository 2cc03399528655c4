//! Attribute parsing for component invocations.
//!
//! Supported forms:
//! - `name="text"` / `name='text'`: literal string
//! - `name`: boolean `true`
//! - `name={frontmatter.a.b}`: value looked up in the entry's front matter
//! - `name={expr}`: a JS literal (arrays, objects, strings, numbers,
//!   booleans, template strings) read through YAML flow syntax

use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

/// Attribute-level failure; the compiler adds component and line context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeError {
    pub attribute: String,
    pub message: String,
}

impl AttributeError {
    fn new(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

pub fn parse_attributes(source: &str, frontmatter: &Value) -> Result<Mapping, AttributeError> {
    let mut params = Mapping::new();
    let mut chars = source.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let Some(&(start, first)) = chars.peek() else {
            break;
        };
        if !is_name_char(first) {
            return Err(AttributeError::new(
                source[start..].chars().take(16).collect::<String>(),
                format!("unexpected character '{}'", first),
            ));
        }

        let mut name = String::new();
        while let Some((_, c)) = chars.next_if(|(_, c)| is_name_char(*c)) {
            name.push(c);
        }

        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        if chars.next_if(|(_, c)| *c == '=').is_none() {
            params.insert(Value::String(name), Value::Bool(true));
            continue;
        }

        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let value = match chars.next() {
            Some((_, quote @ ('"' | '\''))) => {
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some((_, c)) if c == quote => break,
                        Some((_, c)) => text.push(c),
                        None => return Err(AttributeError::new(name, "unclosed string")),
                    }
                }
                Value::String(text)
            }
            Some((open, '{')) => {
                let close = find_expression_end(source, open)
                    .ok_or_else(|| AttributeError::new(name.clone(), "unclosed expression"))?;
                // Advance past the closing brace
                while chars.next_if(|(i, _)| *i <= close).is_some() {}
                evaluate(&source[open + 1..close], frontmatter)
                    .map_err(|message| AttributeError::new(name.clone(), message))?
            }
            Some((_, other)) => {
                return Err(AttributeError::new(
                    name,
                    format!("expected a string or {{expression}}, found '{}'", other),
                ))
            }
            None => return Err(AttributeError::new(name, "missing value")),
        };

        params.insert(Value::String(name), value);
    }

    Ok(params)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == ':'
}

/// Offset of the `}` closing the `{` at `open`, skipping string literals.
fn find_expression_end(source: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in source[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }

    None
}

fn frontmatter_path() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^frontmatter((?:\.[A-Za-z_$][A-Za-z0-9_$]*)*)$").expect("valid regex")
    })
}

/// Evaluate the text inside `{...}`.
pub fn evaluate(expr: &str, frontmatter: &Value) -> Result<Value, String> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Ok(Value::Null);
    }

    if let Some(caps) = frontmatter_path().captures(expr) {
        let path = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let found = path
            .split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(frontmatter, |value, key| value.get(key));
        return Ok(found.cloned().unwrap_or(Value::Null));
    }

    let normalized = normalize_js_literal(expr)?;
    serde_yaml::from_str(&normalized).map_err(|e| e.to_string())
}

/// Rewrite a JS literal into YAML flow syntax.
///
/// String literals of all three kinds become JSON-quoted strings and every
/// `:` outside a string gets a following space, since JS keys may be
/// written as `{label:"x"}`.
fn normalize_js_literal(expr: &str) -> Result<String, String> {
    let mut out = String::with_capacity(expr.len() + 8);
    let mut chars = expr.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' | '`' => {
                let mut text = read_js_string(&mut chars, c)?;
                if c == '`' && text.starts_with('\n') {
                    text.remove(0);
                }
                out.push_str(&serde_json::to_string(&text).map_err(|e| e.to_string())?);
            }
            ':' => {
                out.push(':');
                if chars.peek().is_some_and(|next| !next.is_whitespace()) {
                    out.push(' ');
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn read_js_string(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    quote: char,
) -> Result<String, String> {
    let mut text = String::new();

    while let Some(c) = chars.next() {
        match c {
            c if c == quote => return Ok(text),
            '\\' => match chars.next() {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some('r') => text.push('\r'),
                Some('0') => text.push('\0'),
                Some('u') => text.push(read_unicode_escape(chars)?),
                // Line continuation
                Some('\n') => {}
                Some(other) => text.push(other),
                None => break,
            },
            _ => text.push(c),
        }
    }

    Err(format!("unclosed {} string", quote))
}

fn read_unicode_escape(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<char, String> {
    let hex: String = if chars.next_if_eq(&'{').is_some() {
        chars.by_ref().take_while(|c| *c != '}').collect()
    } else {
        chars.by_ref().take(4).collect()
    };

    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid unicode escape '\\u{}'", hex))
}
