//! Explicit scope stack.
//!
//! Each brace level the scanner enters is one stack entry. An entry may
//! contribute zero names (function bodies, `extern "C"`, anonymous
//! namespaces), one name, or several (`namespace a::b {`). Declarations ask
//! for a [`ScopeFrame`] snapshot; the tracker itself is never shared.

use crate::error::ScopeError;
use crate::ir::{ScopeFrame, ScopeSegment};

#[derive(Debug, Clone)]
struct OpenScope {
    segments: Vec<ScopeSegment>,
    line: usize,
}

/// Stack of open scopes while scanning one file.
#[derive(Debug, Clone, Default)]
pub struct ScopeTracker {
    stack: Vec<OpenScope>,
}

impl ScopeTracker {
    /// Create a tracker at global scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter one brace level contributing `segments` (possibly none).
    pub fn enter(&mut self, segments: Vec<ScopeSegment>, line: usize) {
        self.stack.push(OpenScope { segments, line });
    }

    /// Enter a brace level that contributes no name.
    pub fn enter_anonymous(&mut self, line: usize) {
        self.enter(Vec::new(), line);
    }

    /// Leave the innermost brace level.
    pub fn exit(&mut self) -> Result<(), ScopeError> {
        self.stack
            .pop()
            .map(|_| ())
            .ok_or(ScopeError::UnexpectedExit)
    }

    /// Snapshot of the named scopes currently in effect.
    pub fn frame(&self) -> ScopeFrame {
        ScopeFrame::from_segments(
            self.stack
                .iter()
                .flat_map(|scope| scope.segments.iter().cloned())
                .collect(),
        )
    }

    /// Number of open brace levels, named or not.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Verify that every scope was closed.
    pub fn finish(self) -> Result<(), ScopeError> {
        match self.stack.last() {
            None => Ok(()),
            Some(innermost) => Err(ScopeError::Unclosed {
                open: self.stack.len(),
                innermost_line: innermost.line,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ScopeKind;

    fn names(frame: &ScopeFrame) -> Vec<&str> {
        frame.names().collect()
    }

    #[test]
    fn test_nested_namespaces() {
        let mut tracker = ScopeTracker::new();
        tracker.enter(
            vec![ScopeSegment::namespace("some"), ScopeSegment::namespace("cool")],
            1,
        );
        tracker.enter(vec![ScopeSegment::namespace("internal")], 5);

        let frame = tracker.frame();
        assert_eq!(names(&frame), vec!["some", "cool", "internal"]);
        assert_eq!(tracker.depth(), 2);

        tracker.exit().unwrap();
        assert_eq!(names(&tracker.frame()), vec!["some", "cool"]);
    }

    #[test]
    fn test_anonymous_scope_contributes_no_name() {
        let mut tracker = ScopeTracker::new();
        tracker.enter(vec![ScopeSegment::namespace("app")], 1);
        tracker.enter_anonymous(2);
        tracker.enter(vec![ScopeSegment::type_scope("holder")], 3);

        let frame = tracker.frame();
        assert_eq!(names(&frame), vec!["app", "holder"]);
        assert_eq!(frame.segments()[1].kind, ScopeKind::Type);
        assert_eq!(tracker.depth(), 3);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut tracker = ScopeTracker::new();
        tracker.enter(vec![ScopeSegment::namespace("a")], 1);
        let snapshot = tracker.frame();

        tracker.exit().unwrap();
        tracker.enter(vec![ScopeSegment::namespace("b")], 4);

        assert_eq!(names(&snapshot), vec!["a"]);
    }

    #[test]
    fn test_exit_without_enter() {
        let mut tracker = ScopeTracker::new();
        assert_eq!(tracker.exit(), Err(ScopeError::UnexpectedExit));
    }

    #[test]
    fn test_finish_reports_open_scopes() {
        let mut tracker = ScopeTracker::new();
        tracker.enter(vec![ScopeSegment::namespace("a")], 1);
        tracker.enter_anonymous(7);

        assert_eq!(
            tracker.finish(),
            Err(ScopeError::Unclosed {
                open: 2,
                innermost_line: 7
            })
        );
    }

    #[test]
    fn test_finish_balanced() {
        let mut tracker = ScopeTracker::new();
        tracker.enter_anonymous(1);
        tracker.exit().unwrap();
        assert!(tracker.finish().is_ok());
    }
}
