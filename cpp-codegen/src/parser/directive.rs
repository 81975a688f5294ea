//! Annotation block grammar.
//!
//! The grammar has two tokens and is line oriented:
//!
//! ```text
//! block     := line* marker-line directive-line*
//! marker    := "@cpp_codegen" [trailing text, ignored]
//! directive := keyword [trailing text, ignored]   (one per non-blank line)
//! ```
//!
//! Only the first word of a line is matched, after dropping one trailing
//! punctuation character, so `string_serialization.` is accepted as
//! `string_serialization`.

use std::collections::BTreeSet;

use crate::ir::ConversionKind;

/// Default annotation marker.
pub const DEFAULT_MARKER: &str = "@cpp_codegen";

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':'];

/// Result of inspecting a comment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// No marker line: the declaration does not participate.
    Absent,
    /// A marker line was found; directives follow.
    Present(DirectiveSet),
}

/// Directives found after a marker line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveSet {
    /// Line of the marker.
    pub marker_line: usize,

    /// Recognized conversions, without duplicates.
    pub conversions: BTreeSet<ConversionKind>,

    /// Lines that named no known conversion, as `(line, text)`.
    pub unrecognized: Vec<(usize, String)>,
}

/// Line-oriented lexer for annotation blocks.
#[derive(Debug, Clone)]
pub struct DirectiveLexer {
    marker: String,
}

impl Default for DirectiveLexer {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl DirectiveLexer {
    /// Create a lexer recognizing `marker`.
    pub fn new(marker: impl Into<String>) -> Self {
        let marker = marker.into();
        Self {
            marker: normalize(&marker).to_string(),
        }
    }

    /// The marker token.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Interpret the content lines of one comment block.
    pub fn lex(&self, lines: &[(usize, String)]) -> Annotation {
        let Some(marker_index) = lines.iter().position(|(_, text)| self.is_marker_line(text))
        else {
            return Annotation::Absent;
        };

        let mut set = DirectiveSet {
            marker_line: lines[marker_index].0,
            ..DirectiveSet::default()
        };

        for (line, text) in &lines[marker_index + 1..] {
            let Some(first) = text.split_whitespace().next() else {
                continue;
            };
            if self.is_marker_line(text) {
                continue;
            }

            match ConversionKind::from_keyword(normalize(first)) {
                Some(kind) => {
                    set.conversions.insert(kind);
                }
                None => set.unrecognized.push((*line, normalize(text).to_string())),
            }
        }

        Annotation::Present(set)
    }

    fn is_marker_line(&self, line: &str) -> bool {
        line.split_whitespace()
            .next()
            .is_some_and(|first| normalize(first) == self.marker)
    }
}

/// Trim a line and drop one trailing punctuation character.
pub fn normalize(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed
        .strip_suffix(|c: char| TRAILING_PUNCTUATION.contains(&c))
        .unwrap_or(trimmed)
        .trim_end()
}
