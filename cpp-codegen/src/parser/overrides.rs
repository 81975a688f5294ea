//! Per-enumerator override grammar.
//!
//! Trailing comment text may carry up to two tagged literals:
//!
//! ```text
//! val_1, //< "val_1_comb_string"s "val_1_comb_json"json
//! ```
//!
//! A tag must touch the closing quote. Anything that is not a literal is
//! free text and ignored, so ordinary trailing documentation is harmless.

use crate::ir::ConversionKind;

/// A malformed override. `kind` is set when the affected conversion is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideProblem {
    /// Conversion the broken override was meant for, if recognizable.
    pub kind: Option<ConversionKind>,

    /// Human-readable description.
    pub message: String,
}

impl OverrideProblem {
    fn new(kind: Option<ConversionKind>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Overrides found in one enumerator's trailing text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    /// `"..."s` payload.
    pub string_value: Option<String>,

    /// `"..."json` payload.
    pub json_value: Option<String>,

    /// Malformed fragments, in text order.
    pub problems: Vec<OverrideProblem>,
}

impl OverrideSet {
    /// Override for `kind`, if one parsed.
    pub fn value(&self, kind: ConversionKind) -> Option<&str> {
        match kind {
            ConversionKind::StringSerialization => self.string_value.as_deref(),
            ConversionKind::JsonSerialization => self.json_value.as_deref(),
        }
    }

    fn slot(&mut self, kind: ConversionKind) -> &mut Option<String> {
        match kind {
            ConversionKind::StringSerialization => &mut self.string_value,
            ConversionKind::JsonSerialization => &mut self.json_value,
        }
    }

    fn record(&mut self, kind: ConversionKind, value: String) {
        if let Some(existing) = self.value(kind) {
            let message = format!(
                "second `{}` override \"{}\" ignored, keeping \"{}\"",
                kind.override_tag(),
                value,
                existing
            );
            self.problems.push(OverrideProblem::new(Some(kind), message));
            return;
        }
        *self.slot(kind) = Some(value);
    }
}

/// Parser for the override grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverrideParser;

impl OverrideParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse comment fragments gathered for one enumerator.
    ///
    /// Fragments are joined with a single space before scanning, so a pair
    /// may not straddle two comments but the two overrides may.
    pub fn parse<S: AsRef<str>>(&self, fragments: &[S]) -> OverrideSet {
        let text = fragments
            .iter()
            .map(AsRef::as_ref)
            .filter(|fragment| !fragment.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        self.parse_text(&text)
    }

    /// Parse one line of override text.
    pub fn parse_text(&self, text: &str) -> OverrideSet {
        let chars: Vec<char> = text.chars().collect();
        let mut set = OverrideSet::default();
        let leading = chars.iter().position(|c| !c.is_whitespace());
        let mut pos = 0;

        while pos < chars.len() {
            let c = chars[pos];

            if c.is_whitespace() {
                pos += 1;
                continue;
            }

            if c == '"' {
                match read_literal(&chars, pos + 1) {
                    Some((value, after_quote)) => {
                        pos = self.literal_tail(&chars, after_quote, value, &mut set);
                    }
                    None => {
                        let rest: String = chars[pos..].iter().collect();
                        set.problems.push(OverrideProblem::new(
                            guess_kind(&rest),
                            format!("unterminated literal `{}`", rest.trim_end()),
                        ));
                        break;
                    }
                }
                continue;
            }

            // Free text up to the next space or quote.
            let word_start = pos;
            while pos < chars.len() && !chars[pos].is_whitespace() && chars[pos] != '"' {
                pos += 1;
            }

            let word: String = chars[word_start..pos].iter().collect();

            if pos < chars.len() && chars[pos] == '"' {
                let (tag, after_tag) = read_tag(&chars, pos + 1);
                if let Some(kind) = ConversionKind::from_override_tag(&tag) {
                    set.problems.push(OverrideProblem::new(
                        Some(kind),
                        format!("`{word}\"{tag}` has no opening quote"),
                    ));
                    pos = after_tag;
                }
                continue;
            }

            if let Some(problem) = loose_tag(&word, Some(word_start) == leading) {
                set.problems.push(problem);
            }
        }

        set
    }

    /// Handle what follows a closed literal; returns the next scan position.
    fn literal_tail(
        &self,
        chars: &[char],
        after_quote: usize,
        value: String,
        set: &mut OverrideSet,
    ) -> usize {
        let (tag, after_tag) = read_tag(chars, after_quote);

        if !tag.is_empty() {
            match ConversionKind::from_override_tag(&tag) {
                Some(kind) => set.record(kind, value),
                None => set.problems.push(OverrideProblem::new(
                    None,
                    format!("unknown override tag `{tag}` on \"{value}\""),
                )),
            }
            return after_tag;
        }

        // A known tag separated by whitespace is a mistake worth reporting.
        let mut next = after_quote;
        while next < chars.len() && chars[next].is_whitespace() {
            next += 1;
        }
        if next > after_quote {
            let (word, after_word) = read_tag(chars, next);
            let detached = after_word >= chars.len() || chars[after_word].is_whitespace();
            if detached {
                if let Some(kind) = ConversionKind::from_override_tag(&word) {
                    set.problems.push(OverrideProblem::new(
                        Some(kind),
                        format!("tag `{word}` is separated from \"{value}\" by whitespace"),
                    ));
                    return after_word;
                }
            }
        }

        after_quote
    }
}

/// Read a literal body starting after the opening quote.
///
/// Returns the unescaped payload and the position after the closing quote,
/// or `None` when the literal never closes.
fn read_literal(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut pos = start;

    while pos < chars.len() {
        match chars[pos] {
            '"' => return Some((value, pos + 1)),
            '\\' => match chars.get(pos + 1) {
                Some(&escaped @ ('"' | '\\')) => {
                    value.push(escaped);
                    pos += 2;
                }
                _ => {
                    value.push('\\');
                    pos += 1;
                }
            },
            c => {
                value.push(c);
                pos += 1;
            }
        }
    }

    None
}

/// A free-text word that still carries a tag: `'x'json`, `'x's`, `x'json`,
/// or a bare tag opening the text.
///
/// `x's` is left alone so possessives and contractions stay free text.
fn loose_tag(word: &str, opens_text: bool) -> Option<OverrideProblem> {
    if let Some((payload, tag)) = word.rsplit_once('\'') {
        let kind = ConversionKind::from_override_tag(tag)?;
        if !payload.starts_with('\'') && kind == ConversionKind::StringSerialization {
            return None;
        }
        return Some(OverrideProblem::new(
            Some(kind),
            format!("`{word}` is not a double-quoted literal"),
        ));
    }

    if opens_text {
        let kind = ConversionKind::from_override_tag(word)?;
        return Some(OverrideProblem::new(
            Some(kind),
            format!("tag `{word}` has no literal"),
        ));
    }

    None
}

fn read_tag(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn guess_kind(text: &str) -> Option<ConversionKind> {
    let last = text.split_whitespace().last()?;
    let tag = last.trim_start_matches(|c: char| c != '"' && !c.is_alphanumeric());
    let tag = tag.rsplit('"').next().unwrap_or(tag);
    ConversionKind::from_override_tag(tag)
}
