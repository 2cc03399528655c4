//! Splits an MDX body into prose runs and component invocations.
//!
//! An invocation starts on a line whose first non-blank characters are `<`
//! followed by an uppercase letter. It ends at `/>` (self-closing) or at the
//! matching `</Name>` (paired). Braces and string literals inside the tag
//! are skipped over, so `{...}` expressions may contain `>` or span lines.
//! Fenced code blocks are copied through untouched.

use super::CompileError;

/// A piece of the body, in source order
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Prose(String),
    Invocation(RawInvocation),
}

/// An invocation before name resolution and attribute parsing
#[derive(Debug, Clone, PartialEq)]
pub struct RawInvocation {
    pub name: String,
    /// Source text between the tag name and the closing `>` or `/>`
    pub attributes: String,
    /// Text between `<Name ...>` and `</Name>` for paired tags
    pub children: Option<String>,
    /// 1-based line of the opening `<`
    pub line: usize,
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

pub fn scan(body: &str) -> Result<Vec<Segment>, CompileError> {
    let mut segments = Vec::new();
    let mut prose = String::new();
    let mut fence: Option<Fence> = None;
    let mut pos = 0;
    let mut line = 1;

    while pos < body.len() {
        let line_end = body[pos..]
            .find('\n')
            .map(|i| pos + i + 1)
            .unwrap_or(body.len());
        let text = &body[pos..line_end];
        let trimmed = text.trim_start();
        let indent = text.len() - trimmed.len();

        if let Some(open) = fence {
            if closes_fence(trimmed, open) {
                fence = None;
            }
        } else if let Some(open) = opens_fence(trimmed) {
            fence = Some(open);
        } else if is_esm_line(trimmed) {
            pos = line_end;
            line += 1;
            continue;
        } else if trimmed.starts_with("{/*") {
            let start = pos + indent;
            let end = body[start..]
                .find("*/}")
                .map(|i| start + i + 3)
                .ok_or_else(|| CompileError::Unterminated {
                    name: "comment".to_string(),
                    line,
                })?;
            line += body[pos..end].matches('\n').count();
            pos = skip_rest_of_line(body, end, &mut line);
            continue;
        } else if starts_invocation(trimmed) {
            let (invocation, end) = read_invocation(body, pos + indent, line)?;
            if !prose.is_empty() {
                segments.push(Segment::Prose(std::mem::take(&mut prose)));
            }
            segments.push(Segment::Invocation(invocation));
            line += body[pos..end].matches('\n').count();
            pos = skip_rest_of_line(body, end, &mut line);
            continue;
        }

        prose.push_str(text);
        if text.ends_with('\n') {
            line += 1;
        }
        pos = line_end;
    }

    if !prose.is_empty() {
        segments.push(Segment::Prose(prose));
    }

    Ok(segments)
}

fn opens_fence(trimmed: &str) -> Option<Fence> {
    let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == marker).count();
    (len >= 3).then_some(Fence { marker, len })
}

fn closes_fence(trimmed: &str, open: Fence) -> bool {
    let len = trimmed.chars().take_while(|c| *c == open.marker).count();
    len >= open.len && trimmed[len..].trim().is_empty()
}

fn is_esm_line(trimmed: &str) -> bool {
    trimmed.starts_with("import ") || trimmed.starts_with("export ")
}

fn starts_invocation(trimmed: &str) -> bool {
    let mut chars = trimmed.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Skip whitespace after a tag; if the line ends there, consume the newline.
fn skip_rest_of_line(body: &str, end: usize, line: &mut usize) -> usize {
    let rest = &body[end..];
    let blank = rest.len() - rest.trim_start_matches([' ', '\t', '\r']).len();
    match rest[blank..].chars().next() {
        Some('\n') => {
            *line += 1;
            end + blank + 1
        }
        None => body.len(),
        Some(_) => end,
    }
}

/// Read one invocation starting at the `<` at `start`.
///
/// Returns the invocation and the byte offset just past it.
fn read_invocation(
    body: &str,
    start: usize,
    line: usize,
) -> Result<(RawInvocation, usize), CompileError> {
    let after_lt = start + 1;
    let name_len = body[after_lt..]
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(body.len() - after_lt);
    let name = body[after_lt..after_lt + name_len].to_string();
    let attrs_start = after_lt + name_len;

    let unterminated = || CompileError::Unterminated {
        name: name.clone(),
        line,
    };

    let (attrs_end, tag_end, self_closing) = find_tag_end(body, attrs_start).ok_or_else(unterminated)?;
    let attributes = body[attrs_start..attrs_end].trim().to_string();

    if self_closing {
        let invocation = RawInvocation {
            name,
            attributes,
            children: None,
            line,
        };
        return Ok((invocation, tag_end));
    }

    let (close_start, close_end) = find_closing_tag(body, tag_end, &name).ok_or_else(unterminated)?;
    let invocation = RawInvocation {
        children: Some(body[tag_end..close_start].to_string()),
        name,
        attributes,
        line,
    };
    Ok((invocation, close_end))
}

/// Find the end of an opening tag.
///
/// Returns (end of attribute text, offset past the tag, self-closing?).
fn find_tag_end(body: &str, from: usize) -> Option<(usize, usize, bool)> {
    let bytes = body.as_bytes();
    let mut quote: Option<u8> = None;
    let mut depth = 0usize;
    let mut i = from;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' && depth > 0 {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                b'/' if depth == 0 && bytes.get(i + 1) == Some(&b'>') => {
                    return Some((i, i + 2, true));
                }
                b'>' if depth == 0 => return Some((i, i + 1, false)),
                _ => {}
            },
        }
        i += 1;
    }

    None
}

/// Find `</Name>` (whitespace allowed before `>`).
fn find_closing_tag(body: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let needle = format!("</{}", name);
    let mut search = from;

    while let Some(offset) = body[search..].find(&needle) {
        let close_start = search + offset;
        let rest = &body[close_start + needle.len()..];
        let trimmed = rest.trim_start();
        if trimmed.starts_with('>') {
            let close_end = close_start + needle.len() + (rest.len() - trimmed.len()) + 1;
            return Some((close_start, close_end));
        }
        search = close_start + needle.len();
    }

    None
}
