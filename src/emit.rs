//! Match records produced by a scan.

use std::fmt;
use std::sync::Arc;

/// One concrete keyword occurrence in the scanned text.
///
/// `start` and `end` are character positions (not byte offsets), `end`
/// inclusive. `keyword` is the dictionary entry as stored at build time,
/// so with `ignore_case` it is the case-folded form and may differ in
/// case from the text span it matched.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Emit {
    pub start: usize,
    pub end: usize,
    pub keyword: Arc<str>,
}

impl Emit {
    pub fn new(start: usize, end: usize, keyword: Arc<str>) -> Self {
        Self {
            start,
            end,
            keyword,
        }
    }

    /// Span length in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false // end is inclusive, a span is never empty
    }

    /// True if the two spans share at least one position.
    #[inline]
    pub fn overlaps_with(&self, other: &Emit) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Debug for Emit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}={}", self.start, self.end, self.keyword)
    }
}

/// Receives emits during a scan.
///
/// Returning `true` marks the emit as accepted; with `stop_on_hit` the
/// scan terminates after the first accepted emit.
pub trait EmitHandler {
    fn emit(&mut self, emit: Emit) -> bool;
}

/// Adapter turning any `FnMut(Emit) -> bool` closure into a handler.
pub struct FnEmitHandler<F>(pub F);

impl<F: FnMut(Emit) -> bool> EmitHandler for FnEmitHandler<F> {
    fn emit(&mut self, emit: Emit) -> bool {
        (self.0)(emit)
    }
}

/// Handler that collects every emit, in scan order.
#[derive(Default)]
pub struct CollectingEmitHandler {
    pub emits: Vec<Emit>,
}

impl EmitHandler for CollectingEmitHandler {
    fn emit(&mut self, emit: Emit) -> bool {
        self.emits.push(emit);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(start: usize, end: usize) -> Emit {
        Emit::new(start, end, Arc::from("x"))
    }

    #[test]
    fn test_len_is_inclusive() {
        assert_eq!(emit(2, 5).len(), 4);
        assert_eq!(emit(3, 3).len(), 1);
    }

    #[test]
    fn test_overlap() {
        assert!(emit(0, 3).overlaps_with(&emit(3, 5)));
        assert!(emit(1, 4).overlaps_with(&emit(2, 3)));
        assert!(!emit(0, 2).overlaps_with(&emit(3, 5)));
        assert!(!emit(4, 6).overlaps_with(&emit(0, 3)));
    }

    #[test]
    fn test_fn_handler_adapter() {
        let mut seen = Vec::new();
        {
            let mut handler = FnEmitHandler(|e: Emit| {
                seen.push(e);
                true
            });
            let h: &mut dyn EmitHandler = &mut handler;
            h.emit(emit(0, 1));
        }
        assert_eq!(seen.len(), 1);
    }
}
