//! Redis-style glob patterns
//!
//! Supports `*`, `?`, `[abc]`, `[a-z]`, `[^abc]` and `\` escapes. Patterns
//! are anchored at both ends.

use regex::Regex;

use crate::{Error, Result};

/// A compiled key pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&to_regex(pattern)).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

/// Translate a glob into an anchored regular expression.
fn to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("(?s)^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' if i + 1 < chars.len() => {
                i += 1;
                out.push_str(&literal(chars[i]));
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&class(&chars[i + 1..end]));
                    i = end;
                }
                None => out.push_str(&literal('[')),
            },
            c => out.push_str(&literal(c)),
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Index of the `]` closing the class opened at `start`.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'^') {
        j += 1;
    }
    // a leading `]` would make an empty class; treat the bracket as literal
    if chars.get(j) == Some(&']') {
        return None;
    }
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 2,
            ']' => return Some(j),
            _ => j += 1,
        }
    }
    None
}

fn class(body: &[char]) -> String {
    let mut out = String::from("[");
    let mut i = 0;
    if body.first() == Some(&'^') {
        out.push('^');
        i = 1;
    }
    let start = i;

    while i < body.len() {
        match body[i] {
            '\\' if i + 1 < body.len() => {
                i += 1;
                out.push_str(&class_literal(body[i]));
            }
            '-' if i > start && i + 1 < body.len() => out.push('-'),
            c => out.push_str(&class_literal(c)),
        }
        i += 1;
    }

    out.push(']');
    out
}

fn literal(c: char) -> String {
    regex::escape(c.encode_utf8(&mut [0; 4]))
}

fn class_literal(c: char) -> String {
    if c.is_alphanumeric() {
        c.to_string()
    } else {
        format!("\\x{{{:X}}}", c as u32)
    }
}
