//! Scope frames and qualified paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Where a scope segment came from.
///
/// Only emitters look at this: for path construction and comparison a type
/// segment behaves exactly like a namespace segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// `namespace name { ... }`
    Namespace,
    /// `class name { ... }`, `struct name { ... }` or `union name { ... }`
    Type,
}

/// One named scope level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeSegment {
    /// Scope identifier.
    pub name: String,

    /// Namespace or enclosing type.
    pub kind: ScopeKind,
}

impl ScopeSegment {
    /// Create a namespace segment.
    pub fn namespace(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ScopeKind::Namespace,
        }
    }

    /// Create an enclosing-type segment.
    pub fn type_scope(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ScopeKind::Type,
        }
    }
}

/// Ordered scope names active at one point of the source, outermost first.
///
/// A frame is an immutable snapshot: the scope tracker hands out copies, so
/// a declaration keeps its frame regardless of what the scanner does next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeFrame {
    segments: Vec<ScopeSegment>,
}

impl ScopeFrame {
    /// Create an empty (global) frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame from segments, outermost first.
    pub fn from_segments(segments: Vec<ScopeSegment>) -> Self {
        Self { segments }
    }

    /// Create a frame of namespace segments from a `::` separated path.
    ///
    /// Empty components are skipped, so `"a::b"` and `"::a::b"` are equal.
    pub fn from_namespace_path(path: &str) -> Self {
        Self {
            segments: path
                .split("::")
                .filter(|part| !part.is_empty())
                .map(ScopeSegment::namespace)
                .collect(),
        }
    }

    /// All segments, outermost first.
    pub fn segments(&self) -> &[ScopeSegment] {
        &self.segments
    }

    /// Segment names, outermost first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.name.as_str())
    }

    /// Leading run of namespace segments, stopping at the first type segment.
    ///
    /// Free functions for a member enum have to live here: a class scope
    /// cannot be reopened.
    pub fn namespace_prefix(&self) -> &[ScopeSegment] {
        let end = self
            .segments
            .iter()
            .position(|s| s.kind == ScopeKind::Type)
            .unwrap_or(self.segments.len());
        &self.segments[..end]
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the global scope.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Return a copy extended by `segments`.
    pub fn extended(&self, segments: impl IntoIterator<Item = ScopeSegment>) -> Self {
        let mut frame = self.clone();
        frame.segments.extend(segments);
        frame
    }
}

/// Scope frame plus the declaration's own name.
///
/// Equality and hashing only look at names, never at [`ScopeKind`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifiedPath {
    /// Enclosing scopes.
    pub scope: ScopeFrame,

    /// The declaration's own identifier.
    pub name: String,
}

impl QualifiedPath {
    /// Create a qualified path.
    pub fn new(scope: ScopeFrame, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }

    /// All path components, outermost first, ending with the own name.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.scope.names().chain(std::iter::once(self.name.as_str()))
    }

    /// Join all components with `separator`.
    pub fn joined(&self, separator: &str) -> String {
        self.components().collect::<Vec<_>>().join(separator)
    }

    /// Fully-qualified C++ name with a leading `::`.
    pub fn to_cpp(&self) -> String {
        format!("::{}", self.joined("::"))
    }
}

impl PartialEq for QualifiedPath {
    fn eq(&self, other: &Self) -> bool {
        self.components().eq(other.components())
    }
}

impl Eq for QualifiedPath {}

impl Hash for QualifiedPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for component in self.components() {
            component.hash(state);
        }
    }
}

impl fmt::Display for QualifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined("::"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_frame_from_namespace_path() {
        let frame = ScopeFrame::from_namespace_path("::some::cool");
        assert_eq!(frame.names().collect::<Vec<_>>(), vec!["some", "cool"]);
        assert!(frame
            .segments()
            .iter()
            .all(|s| s.kind == ScopeKind::Namespace));
    }

    #[test]
    fn test_namespace_prefix_stops_at_type() {
        let frame = ScopeFrame::from_segments(vec![
            ScopeSegment::namespace("some"),
            ScopeSegment::namespace("cool"),
            ScopeSegment::type_scope("parent_class"),
            ScopeSegment::namespace("unreachable"),
        ]);

        let prefix: Vec<_> = frame
            .namespace_prefix()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(prefix, vec!["some", "cool"]);
    }

    #[test]
    fn test_qualified_path_display() {
        let path = QualifiedPath::new(ScopeFrame::from_namespace_path("some::cool"), "mode");
        assert_eq!(path.to_string(), "some::cool::mode");
        assert_eq!(path.to_cpp(), "::some::cool::mode");
        assert_eq!(path.joined("_"), "some_cool_mode");

        let global = QualifiedPath::new(ScopeFrame::new(), "mode");
        assert_eq!(global.to_string(), "mode");
        assert_eq!(global.to_cpp(), "::mode");
    }

    #[test]
    fn test_qualified_path_ignores_scope_kind() {
        let as_namespace = QualifiedPath::new(
            ScopeFrame::from_segments(vec![ScopeSegment::namespace("outer")]),
            "mode",
        );
        let as_type = QualifiedPath::new(
            ScopeFrame::from_segments(vec![ScopeSegment::type_scope("outer")]),
            "mode",
        );

        assert_eq!(as_namespace, as_type);

        let mut set = HashSet::new();
        set.insert(as_namespace);
        assert!(!set.insert(as_type));
    }

    #[test]
    fn test_extended_leaves_original_untouched() {
        let frame = ScopeFrame::from_namespace_path("a");
        let extended = frame.extended([ScopeSegment::type_scope("b")]);
        assert_eq!(frame.len(), 1);
        assert_eq!(extended.len(), 2);
    }
}
