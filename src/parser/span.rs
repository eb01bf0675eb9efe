//! Input source location
use std::cmp;

/// Input source location
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// byte offset in input
    pub start: usize,
    /// byte offset in input
    pub end: usize,
}

impl Span {
    const EMPTY: Span = Self::empty();
    /// No location
    pub const fn empty() -> Span {
        Span { start: 0, end: 0 }
    }
    /// Fuse two spans
    pub fn union(&self, other: &Span) -> Span {
        match (self, other) {
            (&Span::EMPTY, _) => *other,
            (_, &Span::EMPTY) => *self,
            _ => Span {
                start: cmp::min(self.start, other.start),
                end: cmp::max(self.end, other.end),
            },
        }
    }
}

/// Trait for scan results that have a source location information.
pub trait Spanned {
    /// accessor
    fn span(&self) -> Span;
}
