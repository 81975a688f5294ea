//! Source parsing.
//!
//! The parser recognizes only the declarative shape of enums and the scopes
//! around them; it is not a C++ front end.
//!
//! - [`lexer`] - tokens and comments with positions
//! - [`comment`] - comment delimiter stripping
//! - [`scope_tracker`] - explicit namespace/type stack
//! - [`declaration`] - finds enum definitions and their comments
//! - [`directive`] - annotation marker and directive keywords
//! - [`overrides`] - per-enumerator string/JSON overrides

pub mod comment;
pub mod declaration;
pub mod directive;
pub mod lexer;
pub mod overrides;
pub mod scope_tracker;

pub use declaration::{DeclarationScanner, RawEnum, RawEnumerator, ScanOutcome};
pub use directive::{Annotation, DirectiveLexer, DirectiveSet, DEFAULT_MARKER};
pub use lexer::{Comment, CommentStyle, Lexer, Token, TokenKind};
pub use overrides::{OverrideParser, OverrideProblem, OverrideSet};
pub use scope_tracker::ScopeTracker;
