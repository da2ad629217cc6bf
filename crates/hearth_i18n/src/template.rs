//! `{name}` templates
//!
//! A template is split into literal text and parameter slots once, when the
//! translation is built; rendering only looks parameters up and concatenates.

use std::borrow::Cow;
use std::mem;

use hearth_core::Params;

/// Rendered output is cut off at this many bytes
const MAX_RENDERED_BYTES: usize = 64 * 1024;

#[derive(Clone, Debug, PartialEq)]
enum Segment {
    Text(String),
    Param(String),
}

/// A parsed `{name}` template
///
/// `{{` and `}}` are literal braces, `{}` and an unclosed `{` stay literal
/// text, and names are trimmed. A parameter missing at render time shows up
/// as `{name}`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub(crate) fn parse(src: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = src;

        while let Some(at) = rest.find(['{', '}']) {
            text.push_str(&rest[..at]);
            let (brace, after) = (&rest[at..=at], &rest[at + 1..]);

            if brace == "}" {
                text.push('}');
                rest = after.strip_prefix('}').unwrap_or(after);
                continue;
            }
            if let Some(after) = after.strip_prefix('{') {
                text.push('{');
                rest = after;
                continue;
            }

            let Some(end) = after.find('}') else {
                text.push('{');
                text.push_str(after);
                rest = "";
                break;
            };
            match after[..end].trim() {
                "" => text.push_str("{}"),
                name => {
                    if !text.is_empty() {
                        segments.push(Segment::Text(mem::take(&mut text)));
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
            }
            rest = &after[end + 1..];
        }

        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Self { segments }
    }

    pub(crate) fn render(&self, params: &Params) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            let piece: Cow<'_, str> = match segment {
                Segment::Text(text) => Cow::Borrowed(text.as_str()),
                Segment::Param(name) => match params.get(name) {
                    Some(value) => Cow::Owned(value.to_string()),
                    None => Cow::Owned(format!("{{{name}}}")),
                },
            };

            let room = MAX_RENDERED_BYTES - out.len();
            if piece.len() > room {
                out.push_str(head(&piece, room));
                break;
            }
            out.push_str(&piece);
        }
        out
    }
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char
fn head(s: &str, max: usize) -> &str {
    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= max)
        .last()
        .unwrap_or(0);
    &s[..end]
}
