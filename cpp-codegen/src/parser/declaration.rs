//! Enum definition scanner.
//!
//! Walks the token stream once, keeping a [`ScopeTracker`] in sync with
//! every brace, and records each enum *definition* together with the comment
//! block that precedes it and the trailing comments of its enumerators.
//! Annotation filtering happens later, in the builder.

use std::mem;

use super::comment::{is_continuation, override_fragment, CommentBlock};
use super::lexer::{Comment, CommentStyle, Lexer, Token, TokenKind};
use super::scope_tracker::ScopeTracker;
use crate::ir::{Diagnostic, DiagnosticKind, ScopeFrame, ScopeSegment};

/// One enumerator as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnumerator {
    pub name: String,
    pub line: usize,
    pub column: usize,

    /// Raw trailing comments attached to this enumerator, in order.
    pub trailing: Vec<(String, CommentStyle)>,
}

impl RawEnumerator {
    /// Override text of each attached comment, delimiters removed.
    pub fn override_fragments(&self) -> Vec<String> {
        self.trailing
            .iter()
            .map(|(text, style)| override_fragment(text, *style))
            .collect()
    }
}

/// One enum definition as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnum {
    /// Declared name; `None` for anonymous enums.
    pub name: Option<String>,

    /// Scopes in effect, including any qualifier written on the name.
    pub scope: ScopeFrame,

    /// `enum class` / `enum struct`.
    pub scoped: bool,

    /// Position of the `enum` keyword.
    pub line: usize,
    pub column: usize,

    /// Comment block directly preceding the definition.
    pub doc: Option<CommentBlock>,

    pub enumerators: Vec<RawEnumerator>,

    /// Whether the body reached its closing brace.
    pub closed: bool,
}

/// Everything found in one source text.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub enums: Vec<RawEnum>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Tracks the last run of adjacent own-line comments.
#[derive(Debug, Default)]
struct DocCollector {
    block: CommentBlock,
}

impl DocCollector {
    fn observe(&mut self, comment: &Comment, line: usize) {
        if comment.trailing {
            self.clear();
            return;
        }
        if !self.block.is_empty() && line > self.block.end_line() + 1 {
            self.clear();
        }
        self.block.push(comment, line);
    }

    fn clear(&mut self) {
        self.block = CommentBlock::new();
    }

    fn take(&mut self) -> Option<CommentBlock> {
        if self.block.is_empty() {
            None
        } else {
            Some(mem::take(&mut self.block))
        }
    }
}

/// Single-pass scanner over one source text.
#[derive(Debug)]
pub struct DeclarationScanner {
    tokens: Vec<Token>,
    pos: usize,
    scopes: ScopeTracker,
    doc: DocCollector,
    outcome: ScanOutcome,
}

impl DeclarationScanner {
    /// Tokenize `source` and prepare a scan.
    pub fn new(source: &str) -> Self {
        Self {
            tokens: Lexer::new(source).tokenize(),
            pos: 0,
            scopes: ScopeTracker::new(),
            doc: DocCollector::default(),
            outcome: ScanOutcome::default(),
        }
    }

    /// Run the scan to the end of input.
    pub fn scan(mut self) -> ScanOutcome {
        while self.pos < self.tokens.len() {
            self.step();
        }

        let (line, column) = self
            .tokens
            .last()
            .map_or((1, 1), |t| (t.line, t.column));
        if let Err(err) = self.scopes.finish() {
            self.outcome.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnbalancedScope,
                line,
                column,
                err.to_string(),
            ));
        }

        self.outcome
    }

    fn step(&mut self) {
        let token = &self.tokens[self.pos];
        let line = token.line;
        let column = token.column;

        match &token.kind {
            TokenKind::Comment(comment) => {
                let comment = comment.clone();
                self.doc.observe(&comment, line);
                self.pos += 1;
            }
            TokenKind::Ident(word) => match word.as_str() {
                "namespace" => {
                    self.doc.clear();
                    self.namespace(line);
                }
                "class" | "struct" | "union" => {
                    self.doc.clear();
                    self.type_scope(line);
                }
                "enum" => self.enumeration(self.pos, false),
                "typedef" => match self.next_code(self.pos + 1) {
                    Some(next) if self.tokens[next].is_ident("enum") => {
                        self.enumeration(next, true);
                    }
                    _ => {
                        self.doc.clear();
                        self.pos += 1;
                    }
                },
                _ => {
                    self.doc.clear();
                    self.pos += 1;
                }
            },
            TokenKind::Punct('{') => {
                self.doc.clear();
                self.scopes.enter_anonymous(line);
                self.pos += 1;
            }
            TokenKind::Punct('}') => {
                self.doc.clear();
                if let Err(err) = self.scopes.exit() {
                    self.outcome.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnbalancedScope,
                        line,
                        column,
                        err.to_string(),
                    ));
                }
                self.pos += 1;
            }
            _ => {
                self.doc.clear();
                self.pos += 1;
            }
        }
    }

    // =========================================================================
    // Scope openers
    // =========================================================================

    /// `namespace [inline] a::b {`, `namespace {`, or an alias.
    fn namespace(&mut self, line: usize) {
        let mut segments = Vec::new();
        let mut cursor = self.next_code(self.pos + 1);

        while let Some(i) = cursor {
            match self.tokens[i].ident() {
                Some("inline") => cursor = self.next_code(i + 1),
                Some(name) => {
                    segments.push(ScopeSegment::namespace(name));
                    cursor = self.next_code(i + 1);
                    match cursor {
                        Some(sep) if self.tokens[sep].kind == TokenKind::PathSep => {
                            cursor = self.next_code(sep + 1);
                        }
                        _ => break,
                    }
                }
                None => break,
            }
        }

        match cursor {
            Some(i) if self.tokens[i].is_punct('{') => {
                self.scopes.enter(segments, line);
                self.pos = i + 1;
            }
            // Aliases (`namespace x = y;`) and stray keywords open nothing.
            Some(i) => self.pos = i,
            None => self.pos = self.tokens.len(),
        }
    }

    /// `class|struct|union Name [final] [: bases] {`.
    fn type_scope(&mut self, line: usize) {
        let Some(start) = self.next_code(self.pos + 1) else {
            self.pos = self.tokens.len();
            return;
        };
        let start = self.skip_attributes(start);

        let (names, after_name) = self.qualified_name(start);
        let mut cursor = after_name;

        if let Some(i) = cursor.filter(|&i| self.tokens[i].is_ident("final")) {
            cursor = self.next_code(i + 1);
        }
        if let Some(i) = cursor.filter(|&i| self.tokens[i].is_punct(':')) {
            cursor = self.find_body_or_end(i + 1);
        }

        match cursor {
            Some(i) if self.tokens[i].is_punct('{') => {
                let segments = names.into_iter().map(ScopeSegment::type_scope).collect();
                self.scopes.enter(segments, line);
                self.pos = i + 1;
            }
            // Forward declarations, elaborated type specifiers and template
            // parameters resume scanning where the name ended.
            Some(i) => self.pos = i.max(self.pos + 1),
            None => self.pos = self.tokens.len(),
        }
    }

    // =========================================================================
    // Enums
    // =========================================================================

    /// Scan an enum starting at the `enum` keyword at `keyword`.
    fn enumeration(&mut self, keyword: usize, typedef: bool) {
        let doc = self.doc.take();
        let line = self.tokens[keyword].line;
        let column = self.tokens[keyword].column;

        let mut cursor = self.next_code(keyword + 1);
        let mut scoped = false;
        if let Some(i) = cursor.filter(|&i| {
            self.tokens[i].is_ident("class") || self.tokens[i].is_ident("struct")
        }) {
            scoped = true;
            cursor = self.next_code(i + 1);
        }
        if let Some(i) = cursor {
            cursor = Some(self.skip_attributes(i));
        }

        let mut names = Vec::new();
        if let Some(i) = cursor {
            let (parsed, after) = self.qualified_name(i);
            names = parsed;
            cursor = after;
        }

        if let Some(i) = cursor.filter(|&i| self.tokens[i].is_punct(':')) {
            cursor = self.find_body_or_end(i + 1);
        }

        let Some(open) = cursor.filter(|&i| self.tokens[i].is_punct('{')) else {
            // Opaque declaration or elaborated type specifier.
            self.pos = cursor.unwrap_or(self.tokens.len()).max(keyword + 1);
            return;
        };

        let (enumerators, closed, end) = self.enum_body(open + 1);
        self.pos = end;

        if !closed {
            self.outcome.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnbalancedScope,
                self.tokens[open].line,
                self.tokens[open].column,
                format!(
                    "body of enum '{}' is never closed",
                    names.last().map_or("<anonymous>", String::as_str)
                ),
            ));
        }

        let mut name = names.pop();
        if typedef && name.is_none() && closed {
            if let Some(i) = self.next_code(self.pos) {
                if let Some(alias) = self.tokens[i].ident() {
                    name = Some(alias.to_string());
                    self.pos = i + 1;
                }
            }
        }

        let scope = self
            .scopes
            .frame()
            .extended(names.into_iter().map(ScopeSegment::type_scope));

        self.outcome.enums.push(RawEnum {
            name,
            scope,
            scoped,
            line,
            column,
            doc,
            enumerators,
            closed,
        });
    }

    /// Parse enumerators up to the closing brace.
    ///
    /// Returns the enumerators, whether the brace was found, and the position
    /// to resume scanning from.
    fn enum_body(&self, start: usize) -> (Vec<RawEnumerator>, bool, usize) {
        let mut enumerators: Vec<RawEnumerator> = Vec::new();
        let mut expect_name = true;
        let mut depth = 0usize;
        // Open template argument lists in the current initializer.
        let mut angles = 0usize;
        // End line of the last comment attached to the current enumerator.
        let mut attached_end: Option<usize> = None;

        for i in start..self.tokens.len() {
            let token = &self.tokens[i];
            match &token.kind {
                TokenKind::Comment(comment) => {
                    let Some(current) = enumerators.last_mut() else {
                        continue;
                    };
                    let continues = !comment.trailing
                        && is_continuation(&comment.text)
                        && attached_end.is_some_and(|end| token.line == end + 1);
                    if comment.trailing || continues {
                        current.trailing.push((comment.text.clone(), comment.style));
                        attached_end = Some(comment.end_line);
                    } else {
                        attached_end = None;
                    }
                }
                TokenKind::Punct('}') if depth == 0 => return (enumerators, true, i + 1),
                // A statement end at body level means the brace went missing.
                TokenKind::Punct(';') if depth == 0 => return (enumerators, false, i),
                TokenKind::Punct('{' | '(' | '[') => depth += 1,
                TokenKind::Punct('}' | ')' | ']') => depth = depth.saturating_sub(1),
                TokenKind::Punct('<') if depth == 0 && !expect_name => {
                    if self.opens_template(i) {
                        angles += 1;
                    }
                }
                TokenKind::Punct('>') if depth == 0 && angles > 0 => angles -= 1,
                TokenKind::Punct(',') if depth == 0 && angles == 0 => expect_name = true,
                TokenKind::Ident(name) if expect_name && depth == 0 => {
                    enumerators.push(RawEnumerator {
                        name: name.clone(),
                        line: token.line,
                        column: token.column,
                        trailing: Vec::new(),
                    });
                    expect_name = false;
                    attached_end = None;
                }
                _ => {}
            }
        }

        (enumerators, false, self.tokens.len())
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Whether the `<` at `at` starts a template argument list.
    ///
    /// Only `name<` counts; `<<` and `<=` are operators.
    fn opens_template(&self, at: usize) -> bool {
        let after_name = (0..at)
            .rev()
            .find(|&i| !self.tokens[i].is_comment())
            .is_some_and(|i| self.tokens[i].ident().is_some());
        let operator = self
            .next_code(at + 1)
            .is_some_and(|i| self.tokens[i].is_punct('<') || self.tokens[i].is_punct('='));
        after_name && !operator
    }

    /// Index of the first non-comment token at or after `from`.
    fn next_code(&self, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| !self.tokens[i].is_comment())
    }

    /// Skip `[[...]]`, `alignas(...)`, `__attribute__((...))` and
    /// `__declspec(...)` starting at `from`.
    fn skip_attributes(&self, from: usize) -> usize {
        let mut i = from;
        loop {
            let token = &self.tokens[i];
            let next = self.next_code(i + 1);

            let skipped = if token.is_punct('[')
                && next.is_some_and(|n| self.tokens[n].is_punct('['))
            {
                self.skip_balanced(i, '[', ']')
            } else if matches!(
                token.ident(),
                Some("alignas" | "__attribute__" | "__declspec")
            ) && next.is_some_and(|n| self.tokens[n].is_punct('('))
            {
                next.and_then(|n| self.skip_balanced(n, '(', ')'))
            } else {
                None
            };

            match skipped.and_then(|after| self.next_code(after)) {
                Some(after) => i = after,
                None => return i,
            }
        }
    }

    /// Position after the token closing the group opened at `open`.
    fn skip_balanced(&self, open: usize, opener: char, closer: char) -> Option<usize> {
        let mut depth = 0usize;
        for i in open..self.tokens.len() {
            if self.tokens[i].is_punct(opener) {
                depth += 1;
            } else if self.tokens[i].is_punct(closer) {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
        }
        None
    }

    /// Read `A::B<...>::C` starting at `from`.
    ///
    /// Template arguments are skipped. Returns the names and the index of
    /// the first token after the name.
    fn qualified_name(&self, from: usize) -> (Vec<String>, Option<usize>) {
        let mut names = Vec::new();
        let mut cursor = Some(from);

        while let Some(i) = cursor {
            let Some(name) = self.tokens[i].ident() else {
                break;
            };
            if is_specifier(name) {
                break;
            }
            names.push(name.to_string());
            cursor = self.next_code(i + 1);

            if let Some(lt) = cursor.filter(|&n| self.tokens[n].is_punct('<')) {
                cursor = self
                    .skip_balanced(lt, '<', '>')
                    .and_then(|after| self.next_code(after));
            }

            match cursor {
                Some(sep) if self.tokens[sep].kind == TokenKind::PathSep => {
                    cursor = self.next_code(sep + 1);
                }
                _ => break,
            }
        }

        (names, cursor)
    }

    /// First `{` or `;` outside parentheses, starting at `from`.
    fn find_body_or_end(&self, from: usize) -> Option<usize> {
        let mut depth = 0usize;
        for i in from..self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::Punct('(') => depth += 1,
                TokenKind::Punct(')') => depth = depth.saturating_sub(1),
                TokenKind::Punct('{' | ';') if depth == 0 => return Some(i),
                _ => {}
            }
        }
        None
    }
}

fn is_specifier(word: &str) -> bool {
    matches!(word, "final" | "alignas" | "__attribute__" | "__declspec")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ScopeKind;

    fn scan(source: &str) -> ScanOutcome {
        DeclarationScanner::new(source).scan()
    }

    fn scope_names(raw: &RawEnum) -> Vec<&str> {
        raw.scope.names().collect()
    }

    fn enumerator_names(raw: &RawEnum) -> Vec<&str> {
        raw.enumerators.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_plain_enum() {
        let outcome = scan("enum color { red, green = 2, blue };");
        assert_eq!(outcome.enums.len(), 1);

        let raw = &outcome.enums[0];
        assert_eq!(raw.name.as_deref(), Some("color"));
        assert!(!raw.scoped);
        assert!(raw.closed);
        assert_eq!(enumerator_names(raw), vec!["red", "green", "blue"]);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_enum_class_with_underlying_type() {
        let outcome = scan("enum class mode : std::uint8_t { fast = 1 << 0, slow = (1 << 1) };");
        let raw = &outcome.enums[0];
        assert!(raw.scoped);
        assert_eq!(raw.name.as_deref(), Some("mode"));
        assert_eq!(enumerator_names(raw), vec!["fast", "slow"]);
    }

    #[test]
    fn test_initializer_with_braces_and_calls() {
        let outcome = scan("enum e { a = f(1, 2), b = T{3}.v, c = arr[1, 2] };");
        assert_eq!(enumerator_names(&outcome.enums[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_initializer_with_template_arguments() {
        let outcome = scan(
            "enum class e { a = std::integral_constant<int, 3>::value, \
             b = N<std::pair<int, int>>::v, c };",
        );
        assert_eq!(enumerator_names(&outcome.enums[0]), vec!["a", "b", "c"]);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_initializer_with_shift_and_comparison() {
        let outcome = scan("enum e { a = x << 2, b = y <= 3, c = 1 < 2, d };");
        let raw = &outcome.enums[0];
        assert_eq!(enumerator_names(raw), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_trailing_comma() {
        let outcome = scan("enum e { a, b, };");
        assert_eq!(enumerator_names(&outcome.enums[0]), vec!["a", "b"]);
    }

    #[test]
    fn test_nested_namespaces_and_types() {
        let source = r#"
namespace some::cool {
namespace internal {
struct holder final : public base<int> {
    enum class inner { x };
};
}
}
"#;
        let outcome = scan(source);
        let raw = &outcome.enums[0];
        assert_eq!(scope_names(raw), vec!["some", "cool", "internal", "holder"]);
        assert_eq!(raw.scope.segments()[3].kind, ScopeKind::Type);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_anonymous_scopes_add_no_names() {
        let source = r#"
namespace app {
namespace {
extern "C" {
void f() { int x[] = {1, 2}; }
}
enum e { a };
}
}
"#;
        let outcome = scan(source);
        assert_eq!(scope_names(&outcome.enums[0]), vec!["app"]);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_enum_after_scope_closes() {
        let source = "namespace a { struct s { }; }\nnamespace b { enum e { x }; }";
        let outcome = scan(source);
        assert_eq!(scope_names(&outcome.enums[0]), vec!["b"]);
    }

    #[test]
    fn test_forward_declarations_are_not_scopes() {
        let source = "namespace n { class fwd; struct tm* now(); template <class T> struct box { enum e { a }; }; }";
        let outcome = scan(source);
        assert_eq!(scope_names(&outcome.enums[0]), vec!["n", "box"]);
    }

    #[test]
    fn test_namespace_alias_is_ignored() {
        let source = "namespace fs = std::filesystem;\nenum e { a };";
        let outcome = scan(source);
        assert!(outcome.enums[0].scope.is_empty());
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_opaque_enum_is_not_a_definition() {
        let outcome = scan("enum class e : int;\nvoid f(enum e value);");
        assert!(outcome.enums.is_empty());
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_qualified_enum_name_extends_scope() {
        let outcome = scan("namespace n { enum class outer::inner { a }; }");
        let raw = &outcome.enums[0];
        assert_eq!(raw.name.as_deref(), Some("inner"));
        assert_eq!(scope_names(raw), vec!["n", "outer"]);
    }

    #[test]
    fn test_typedef_enum_takes_alias() {
        let outcome = scan("typedef enum { a, b } legacy_t;");
        assert_eq!(outcome.enums[0].name.as_deref(), Some("legacy_t"));
    }

    #[test]
    fn test_anonymous_enum() {
        let outcome = scan("enum { a, b };");
        assert_eq!(outcome.enums[0].name, None);
    }

    #[test]
    fn test_attributes_are_skipped() {
        let outcome = scan("enum class [[nodiscard]] status { ok [[deprecated]], failed };");
        let raw = &outcome.enums[0];
        assert_eq!(raw.name.as_deref(), Some("status"));
        assert_eq!(enumerator_names(raw), vec!["ok", "failed"]);
    }

    // =========================================================================
    // Comments
    // =========================================================================

    #[test]
    fn test_doc_block_is_attached() {
        let source = "/// @cpp_codegen\n/// string_serialization\nenum class e { a };";
        let outcome = scan(source);
        let doc = outcome.enums[0].doc.as_ref().unwrap();
        assert_eq!(doc.line(), 1);
        assert_eq!(doc.lines().len(), 2);
    }

    #[test]
    fn test_doc_block_before_typedef_is_attached() {
        let source = "/** @cpp_codegen */\ntypedef enum { a } alias_t;";
        let outcome = scan(source);
        assert!(outcome.enums[0].doc.is_some());
    }

    #[test]
    fn test_code_between_comment_and_enum_detaches() {
        let source = "/// @cpp_codegen\nint x;\nenum e { a };";
        let outcome = scan(source);
        assert!(outcome.enums[0].doc.is_none());
    }

    #[test]
    fn test_only_last_comment_group_is_kept() {
        let source = "// unrelated\n\n/// @cpp_codegen\nenum e { a };";
        let outcome = scan(source);
        let doc = outcome.enums[0].doc.as_ref().unwrap();
        assert_eq!(doc.line(), 3);
        assert_eq!(doc.lines().len(), 1);
    }

    #[test]
    fn test_trailing_comment_is_not_documentation() {
        let source = "int x; // @cpp_codegen\nenum e { a };";
        let outcome = scan(source);
        assert!(outcome.enums[0].doc.is_none());
    }

    #[test]
    fn test_trailing_comments_attach_to_enumerators() {
        let source = r#"enum e {
    val_1,  //< "a"s
    val_2,  //< "b"s
            //< "c"json
    // plain comment about val_3
    val_3,
    //< "orphan"s
};"#;
        let outcome = scan(source);
        let raw = &outcome.enums[0];

        assert_eq!(raw.enumerators[0].override_fragments(), vec!["\"a\"s"]);
        assert_eq!(
            raw.enumerators[1].override_fragments(),
            vec!["\"b\"s", "\"c\"json"]
        );
        assert!(raw.enumerators[2].trailing.is_empty());
    }

    #[test]
    fn test_comment_on_brace_line_is_ignored() {
        let outcome = scan("enum e { // values\n  a,\n};");
        assert!(outcome.enums[0].enumerators[0].trailing.is_empty());
    }

    // =========================================================================
    // Malformed input
    // =========================================================================

    #[test]
    fn test_stray_closing_brace() {
        let outcome = scan("}\nenum e { a };");
        assert_eq!(outcome.enums.len(), 1);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::UnbalancedScope);
        assert_eq!(outcome.diagnostics[0].line, 1);
    }

    #[test]
    fn test_unclosed_namespace() {
        let outcome = scan("namespace a {\nenum e { x };\n");
        assert_eq!(scope_names(&outcome.enums[0]), vec!["a"]);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::UnbalancedScope);
    }

    #[test]
    fn test_unclosed_enum_body_keeps_record() {
        let outcome = scan("enum e { a, b;\nenum f { c };");
        assert_eq!(outcome.enums.len(), 2);
        assert!(!outcome.enums[0].closed);
        assert_eq!(enumerator_names(&outcome.enums[0]), vec!["a", "b"]);
        assert_eq!(outcome.enums[1].name.as_deref(), Some("f"));
        assert_eq!(outcome.diagnostics.len(), 1);
    }
}
