//! Plain-text utilities shared by extraction, trend detection, and
//! citation preprocessing.
//!
//! All stages that need plain text go through [`strip_markup`]; the
//! citation scanner is the one consumer that reads descriptions raw,
//! because hyperlinks live in the markup.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Remove markup tags and decode common entities.
///
/// Tags are replaced by spaces so that adjacent words do not fuse;
/// whitespace runs are then collapsed so multi-word patterns still
/// match across removed tags.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    let without_tags = TAG_RE.replace_all(text, " ");
    let unescaped = unescape_entities(&without_tags);
    unescaped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the named and numeric entities that show up in feed text.
fn unescape_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let Some(end) = rest[..rest.len().min(12)].find(';') else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => decode_numeric_entity(entity),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(code)
}

/// Byte spans of the sentences in `text`, split on `.`, `!`, `?`.
///
/// Spans are trimmed of surrounding whitespace and exclude the
/// terminator itself. Empty sentences are dropped.
#[must_use]
pub fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            push_trimmed(text, start, idx, &mut spans);
            start = idx + c.len_utf8();
        }
    }
    push_trimmed(text, start, text.len(), &mut spans);
    spans
}

fn push_trimmed(text: &str, start: usize, end: usize, spans: &mut Vec<(usize, usize)>) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    spans.push((start + lead, start + lead + trimmed.len()));
}
