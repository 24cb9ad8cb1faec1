//! Tokenizer for style expressions.
//!
//! Splits text such as `/* base */ Layers<Red, BlastL<White>>` into the style
//! name, the comment attached to it, and the top-level parameter substrings.
//! Names are not resolved here; nested parameters are tokenized again by the
//! parser when it recurses into them.
//!
//! Comments are located in a first pass over the whole input, independent of
//! bracket nesting. The splitting pass then jumps over every comment span so
//! that `<`, `>` and `,` inside comments are never structural.

use std::ops::Range;

/// Structural problems found while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("mismatched block comment starting at byte {offset}")]
    MismatchedBlockComment { offset: usize },
    #[error("could not find style name")]
    MissingName,
    #[error("mismatched <> in style {name}")]
    MismatchedBrackets { name: String },
}

/// One top-level parameter of a tokenized style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedParam<'a> {
    /// Exact source text between the delimiters, comments included.
    pub raw: &'a str,
    /// Source text with comments and whitespace removed.
    pub literal: String,
    /// Comments before the parameter's own name (or its value, for literals).
    pub comment: String,
}

/// Output of [`tokenize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedStyle<'a> {
    pub name: &'a str,
    pub comment: String,
    pub params: Vec<TokenizedParam<'a>>,
}

/// A comment in the source. `range` covers the delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSpan {
    pub range: Range<usize>,
    pub block: bool,
}

impl CommentSpan {
    /// Comment body without markers. Each line is trimmed so that text
    /// re-indented by the emitter reads back unchanged.
    pub fn text(&self, source: &str) -> String {
        let Range { start, end } = self.range;
        if self.block {
            source[start + 2..end - 2]
                .lines()
                .map(str::trim)
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        } else {
            source[start + 2..end].trim().to_string()
        }
    }
}

/// Locate every `/* */` and `//` comment, in source order.
///
/// Whichever opener appears first claims the text up to its terminator, so a
/// `//` inside a block comment (or `/*` inside a line comment) is plain text.
/// A line comment without a trailing newline runs to the end of input.
pub fn find_comments(text: &str) -> Result<Vec<CommentSpan>, LexError> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                let Some(close) = text[i + 2..].find("*/") else {
                    log::error!("mismatched block comment at byte {i}, aborting");
                    return Err(LexError::MismatchedBlockComment { offset: i });
                };
                let end = i + 2 + close + 2;
                spans.push(CommentSpan {
                    range: i..end,
                    block: true,
                });
                i = end;
            }
            (b'/', b'/') => {
                let end = text[i + 2..]
                    .find('\n')
                    .map_or(bytes.len(), |newline| i + 2 + newline + 1);
                spans.push(CommentSpan {
                    range: i..end,
                    block: false,
                });
                i = end;
            }
            _ => i += 1,
        }
    }

    Ok(spans)
}

/// Tokenize a single style expression.
pub fn tokenize(text: &str) -> Result<TokenizedStyle<'_>, LexError> {
    let comments = find_comments(text)?;
    let bytes = text.as_bytes();
    let mut cursor = CommentCursor::new(&comments);

    // ─── Name ────────────────────────────────────────────────────────────

    let mut i = 0;
    let mut name_range = None;
    while i < bytes.len() {
        if let Some(end) = cursor.skip(i) {
            i = end;
            continue;
        }
        if bytes[i].is_ascii_alphabetic() {
            let start = i;
            while i < bytes.len() && is_ident_byte(bytes[i]) {
                i += 1;
            }
            name_range = Some(start..i);
            break;
        }
        i += 1;
    }

    let Some(name_range) = name_range else {
        log::error!("could not find style name/begin of style");
        return Err(LexError::MissingName);
    };
    let name = &text[name_range.clone()];
    let comment = join_comments(text, &comments, |span| span.range.end <= name_range.start);

    // ─── Parameters ──────────────────────────────────────────────────────

    let mut params = Vec::new();
    let mut depth: i32 = 0;
    let mut param_start = name_range.end;
    let mut name_boundary: Option<usize> = None;
    let mut literal: Vec<u8> = Vec::new();

    let finish = |start: usize, end: usize, boundary: Option<usize>, literal: &[u8]| TokenizedParam {
        raw: &text[start..end],
        literal: String::from_utf8_lossy(literal).into_owned(),
        comment: join_comments(text, &comments, |span| {
            span.range.start >= start && span.range.end <= boundary.unwrap_or(end)
        }),
    };

    let mut i = name_range.end;
    while i < bytes.len() {
        if let Some(end) = cursor.skip(i) {
            i = end;
            continue;
        }

        let byte = bytes[i];
        match byte {
            b' ' | b'\t' | b'\n' | b'\r' => {}
            b'<' if depth == 0 => {
                depth = 1;
                param_start = i + 1;
                literal.clear();
            }
            b'<' => {
                if depth == 1 && name_boundary.is_none() {
                    name_boundary = Some(i);
                }
                depth += 1;
                literal.push(byte);
            }
            b'>' => {
                depth -= 1;
                if depth < 0 {
                    log::warn!("error parsing arguments for style: {name}");
                    return Err(LexError::MismatchedBrackets { name: name.to_string() });
                }
                if depth == 0 {
                    // `Name<>` has no parameters rather than one empty one.
                    if !(params.is_empty() && literal.is_empty()) {
                        params.push(finish(param_start, i, name_boundary, literal.as_slice()));
                    }
                    break;
                }
                literal.push(byte);
            }
            b',' if depth == 1 => {
                params.push(finish(param_start, i, name_boundary, literal.as_slice()));
                literal.clear();
                name_boundary = None;
                param_start = i + 1;
            }
            _ if depth > 0 => literal.push(byte),
            _ => {}
        }
        i += 1;
    }

    if depth != 0 {
        log::warn!("mismatched <> in style: {name}");
        return Err(LexError::MismatchedBrackets { name: name.to_string() });
    }

    Ok(TokenizedStyle {
        name,
        comment,
        params,
    })
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn join_comments(source: &str, comments: &[CommentSpan], keep: impl Fn(&CommentSpan) -> bool) -> String {
    comments
        .iter()
        .filter(|span| keep(span))
        .map(|span| span.text(source))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Walks the sorted comment spans alongside a forward-only scan.
struct CommentCursor<'c> {
    spans: &'c [CommentSpan],
    next: usize,
}

impl<'c> CommentCursor<'c> {
    fn new(spans: &'c [CommentSpan]) -> Self {
        Self { spans, next: 0 }
    }

    /// If a comment starts at `pos`, return where it ends.
    fn skip(&mut self, pos: usize) -> Option<usize> {
        while self.spans.get(self.next).is_some_and(|s| s.range.start < pos) {
            self.next += 1;
        }
        let span = self.spans.get(self.next)?;
        if span.range.start == pos {
            self.next += 1;
            Some(span.range.end)
        } else {
            None
        }
    }
}
