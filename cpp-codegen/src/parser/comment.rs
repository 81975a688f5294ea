//! Comment delimiter handling.
//!
//! Directive and override grammars work on comment *content*; the helpers
//! here peel off `//`, `///`, `//!`, `/* */`, `/** */` and the leading `*`
//! of block comment lines so those grammars never see delimiters.

use super::lexer::{Comment, CommentStyle};

/// Marker opening a trailing comment that continues the previous one.
pub const CONTINUATION_MARKER: char = '<';

/// Comment text with its opening and closing delimiters removed.
///
/// One doc-comment flavour character (`/`, `!` or `*`) right after the
/// opening delimiter is removed as well.
pub fn comment_body(raw: &str) -> &str {
    if let Some(rest) = raw.strip_prefix("//") {
        return rest
            .strip_prefix('/')
            .or_else(|| rest.strip_prefix('!'))
            .unwrap_or(rest);
    }

    if let Some(rest) = raw.strip_prefix("/*") {
        let rest = rest.strip_suffix("*/").unwrap_or(rest);
        return rest
            .strip_prefix('*')
            .or_else(|| rest.strip_prefix('!'))
            .unwrap_or(rest);
    }

    raw
}

/// Content lines of a comment, each trimmed and stripped of block decoration.
///
/// Lines are returned in source order together with their 1-based line number.
pub fn content_lines(raw: &str, style: CommentStyle, first_line: usize) -> Vec<(usize, String)> {
    comment_body(raw)
        .lines()
        .enumerate()
        .map(|(index, line)| {
            let line = line.trim();
            let line = match style {
                CommentStyle::Block => line.trim_start_matches('*').trim(),
                CommentStyle::Line => line,
            };
            (first_line + index, line.to_string())
        })
        .collect()
}

/// Whether a comment starts with the continuation marker (`//<`, `///<`, `/*<`).
pub fn is_continuation(raw: &str) -> bool {
    comment_body(raw)
        .trim_start()
        .starts_with(CONTINUATION_MARKER)
}

/// Single-line override text of a trailing comment, continuation marker removed.
pub fn override_fragment(raw: &str, style: CommentStyle) -> String {
    let joined = content_lines(raw, style, 1)
        .into_iter()
        .map(|(_, line)| line)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    joined
        .strip_prefix(CONTINUATION_MARKER)
        .unwrap_or(&joined)
        .trim()
        .to_string()
}

/// A run of adjacent comments treated as one documentation block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBlock {
    comments: Vec<BlockComment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BlockComment {
    text: String,
    style: CommentStyle,
    line: usize,
    end_line: usize,
}

impl CommentBlock {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comment that starts on `line`.
    pub fn push(&mut self, comment: &Comment, line: usize) {
        self.comments.push(BlockComment {
            text: comment.text.clone(),
            style: comment.style,
            line,
            end_line: comment.end_line,
        });
    }

    /// Whether the block holds no comment.
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// First line of the block.
    pub fn line(&self) -> usize {
        self.comments.first().map_or(0, |c| c.line)
    }

    /// Last line of the block.
    pub fn end_line(&self) -> usize {
        self.comments.last().map_or(0, |c| c.end_line)
    }

    /// Content lines of every comment in the block, in order.
    pub fn lines(&self) -> Vec<(usize, String)> {
        self.comments
            .iter()
            .flat_map(|c| content_lines(&c.text, c.style, c.line))
            .collect()
    }
}
