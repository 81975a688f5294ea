//! Source lexer.
//!
//! Splits C++ text into the few token classes the declaration scanner needs.
//! Comments are kept as tokens because annotation blocks and enumerator
//! overrides live in them. Preprocessor lines are dropped entirely.
//!
//! The lexer never fails: unterminated comments and literals simply run to
//! the end of their line or of the input.

/// Comment delimiter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

/// A comment with its raw text, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Raw text including `//` or `/* */`.
    pub text: String,

    /// Delimiter style.
    pub style: CommentStyle,

    /// Whether a non-comment token precedes the comment on its first line.
    pub trailing: bool,

    /// Line on which the comment ends.
    pub end_line: usize,
}

/// Token class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident(String),
    /// `::`
    PathSep,
    /// Any other single punctuation character.
    Punct(char),
    /// String literal, including raw and prefixed forms.
    StringLit,
    /// Character literal.
    CharLit,
    /// Numeric literal.
    Number,
    /// Line or block comment.
    Comment(Comment),
}

/// A token and its starting position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token class and payload.
    pub kind: TokenKind,

    /// 1-based line.
    pub line: usize,

    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Token {
    /// Whether this token is a comment.
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::Comment(_))
    }

    /// The comment payload, if this is a comment.
    pub fn comment(&self) -> Option<&Comment> {
        match &self.kind {
            TokenKind::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    /// The identifier text, if this is an identifier.
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this is the identifier `word`.
    pub fn is_ident(&self, word: &str) -> bool {
        self.ident() == Some(word)
    }

    /// Whether this is the punctuation character `c`.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }
}

const RAW_STRING_PREFIXES: &[&str] = &["R", "u8R", "uR", "UR", "LR"];
const LITERAL_PREFIXES: &[&str] = &["u8", "u", "U", "L"];

/// Character-level C++ lexer.
#[derive(Debug)]
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    at_line_start: bool,
    last_code_line: usize,
}

impl Lexer {
    /// Create a lexer over `source`.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            at_line_start: true,
            last_code_line: 0,
        }
    }

    /// Consume the input and return all tokens in order.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek(0) {
            if c.is_whitespace() {
                self.bump();
                continue;
            }

            if c == '#' && self.at_line_start {
                self.skip_preprocessor_line();
                continue;
            }

            let line = self.line;
            let column = self.column;

            let kind = if c == '/' && self.peek(1) == Some('/') {
                self.line_comment(line)
            } else if c == '/' && self.peek(1) == Some('*') {
                self.block_comment(line)
            } else if c == '"' {
                self.bump();
                self.quoted('"');
                TokenKind::StringLit
            } else if c == '\'' {
                self.bump();
                self.quoted('\'');
                TokenKind::CharLit
            } else if c.is_ascii_digit()
                || (c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit()))
            {
                self.number();
                TokenKind::Number
            } else if is_ident_start(c) {
                self.ident_or_prefixed_literal()
            } else if c == ':' && self.peek(1) == Some(':') {
                self.bump();
                self.bump();
                TokenKind::PathSep
            } else {
                self.bump();
                TokenKind::Punct(c)
            };

            self.at_line_start = false;
            if !matches!(kind, TokenKind::Comment(_)) {
                self.last_code_line = self.line;
            }

            tokens.push(Token { kind, line, column });
        }

        tokens
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_preprocessor_line(&mut self) {
        while let Some(c) = self.peek(0) {
            match c {
                '\n' => break,
                '\\' if self.peek(1) == Some('\n') => {
                    self.bump();
                    self.bump();
                }
                '\\' if self.peek(1) == Some('\r') && self.peek(2) == Some('\n') => {
                    self.bump();
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn line_comment(&mut self, line: usize) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.bump();
        }

        TokenKind::Comment(Comment {
            text: text.trim_end().to_string(),
            style: CommentStyle::Line,
            trailing: self.last_code_line == line,
            end_line: line,
        })
    }

    fn block_comment(&mut self, line: usize) -> TokenKind {
        let mut text = String::new();
        // Opening delimiter.
        for _ in 0..2 {
            if let Some(c) = self.bump() {
                text.push(c);
            }
        }

        while let Some(c) = self.bump() {
            text.push(c);
            if c == '*' && self.peek(0) == Some('/') {
                self.bump();
                text.push('/');
                break;
            }
        }

        TokenKind::Comment(Comment {
            text,
            style: CommentStyle::Block,
            trailing: self.last_code_line == line,
            end_line: self.line,
        })
    }

    /// Consume a quoted literal body after its opening delimiter.
    fn quoted(&mut self, delimiter: char) {
        while let Some(c) = self.peek(0) {
            match c {
                '\n' => break,
                '\\' => {
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                    if c == delimiter {
                        break;
                    }
                }
            }
        }
    }

    fn number(&mut self) {
        let mut previous = '\0';
        while let Some(c) = self.peek(0) {
            let exponent_sign =
                (c == '+' || c == '-') && matches!(previous, 'e' | 'E' | 'p' | 'P');
            if c.is_ascii_alphanumeric() || c == '.' || c == '\'' || c == '_' || exponent_sign {
                previous = c;
                self.bump();
            } else {
                break;
            }
        }
    }

    fn ident_or_prefixed_literal(&mut self) -> TokenKind {
        let mut ident = String::new();
        while let Some(c) = self.peek(0) {
            if !is_ident_continue(c) {
                break;
            }
            ident.push(c);
            self.bump();
        }

        match self.peek(0) {
            Some('"') if RAW_STRING_PREFIXES.contains(&ident.as_str()) => {
                self.raw_string();
                TokenKind::StringLit
            }
            Some('"') if LITERAL_PREFIXES.contains(&ident.as_str()) => {
                self.bump();
                self.quoted('"');
                TokenKind::StringLit
            }
            Some('\'') if LITERAL_PREFIXES.contains(&ident.as_str()) => {
                self.bump();
                self.quoted('\'');
                TokenKind::CharLit
            }
            _ => TokenKind::Ident(ident),
        }
    }

    /// Consume `"delim( ... )delim"`, starting at the opening quote.
    fn raw_string(&mut self) {
        self.bump();

        let mut delimiter = String::new();
        loop {
            match self.peek(0) {
                Some('(') => {
                    self.bump();
                    break;
                }
                Some(c) if delimiter.len() < 16 && !c.is_whitespace() && c != ')' && c != '\\' => {
                    delimiter.push(c);
                    self.bump();
                }
                // Not a valid raw string prefix; lex the rest as an ordinary literal.
                _ => {
                    self.quoted('"');
                    return;
                }
            }
        }

        let closing: Vec<char> = delimiter.chars().chain(std::iter::once('"')).collect();
        while let Some(c) = self.bump() {
            if c == ')' && self.chars[self.pos..].starts_with(&closing) {
                for _ in 0..closing.len() {
                    self.bump();
                }
                break;
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
