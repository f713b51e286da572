//! Overlap resolution for collected matches.
//!
//! The scan pipeline treats overlap resolution as a pluggable policy: any
//! [`OverlapResolver`] can be swapped in via
//! [`TrieBuilder::overlap_resolver`](crate::TrieBuilder::overlap_resolver)
//! without touching the automaton. The default policy keeps the longest
//! match (earlier start among equal lengths) and discards everything it
//! overlaps, using a centered interval tree for the overlap queries.

use rustc_hash::FxHashSet;

use crate::emit::Emit;

/// Reduces a list of emits to a pairwise non-overlapping subset.
///
/// Contract: the output is a subset of the input and no two returned
/// emits share a text position. The selection policy is owned by the
/// implementation.
pub trait OverlapResolver {
    fn resolve_overlaps(&self, emits: Vec<Emit>) -> Vec<Emit>;
}

/// Default resolver: longest match wins, earlier start breaks ties,
/// survivors are returned sorted by start position.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalTreeResolver;

impl OverlapResolver for IntervalTreeResolver {
    fn resolve_overlaps(&self, emits: Vec<Emit>) -> Vec<Emit> {
        if emits.len() < 2 {
            return emits;
        }
        let tree = IntervalTree::new(emits.clone());

        // Longest first; among equal lengths the earlier start wins.
        let mut candidates = emits;
        candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.start.cmp(&b.start)));

        let mut removed: FxHashSet<Emit> = FxHashSet::default();
        let mut kept = Vec::with_capacity(candidates.len());
        for emit in candidates {
            if removed.contains(&emit) {
                continue;
            }
            for loser in tree.find_overlaps(&emit) {
                removed.insert(loser);
            }
            kept.push(emit);
        }

        kept.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
        kept
    }
}

/// Centered interval tree over a fixed set of emits.
///
/// Each node stores a split point, the intervals crossing it, and
/// subtrees for the intervals lying entirely left or right of it.
pub struct IntervalTree {
    root: Option<Box<IntervalNode>>,
}

impl IntervalTree {
    pub fn new(intervals: Vec<Emit>) -> Self {
        Self {
            root: IntervalNode::build(intervals),
        }
    }

    /// All stored intervals overlapping `probe`, excluding `probe` itself.
    pub fn find_overlaps(&self, probe: &Emit) -> Vec<Emit> {
        let mut found = Vec::new();
        if let Some(root) = &self.root {
            root.collect_overlaps(probe, &mut found);
        }
        found
    }
}

struct IntervalNode {
    point: usize,
    crossing: Vec<Emit>,
    left: Option<Box<IntervalNode>>,
    right: Option<Box<IntervalNode>>,
}

impl IntervalNode {
    fn build(intervals: Vec<Emit>) -> Option<Box<Self>> {
        if intervals.is_empty() {
            return None;
        }

        let min_start = intervals.iter().map(|i| i.start).min().unwrap_or(0);
        let max_end = intervals.iter().map(|i| i.end).max().unwrap_or(0);
        let point = min_start + (max_end - min_start) / 2;

        let mut crossing = Vec::new();
        let mut to_left = Vec::new();
        let mut to_right = Vec::new();
        for interval in intervals {
            if interval.end < point {
                to_left.push(interval);
            } else if interval.start > point {
                to_right.push(interval);
            } else {
                crossing.push(interval);
            }
        }

        Some(Box::new(Self {
            point,
            crossing,
            left: Self::build(to_left),
            right: Self::build(to_right),
        }))
    }

    fn collect_overlaps(&self, probe: &Emit, found: &mut Vec<Emit>) {
        for interval in &self.crossing {
            if interval != probe && interval.overlaps_with(probe) {
                found.push(interval.clone());
            }
        }
        // Left subtree holds intervals ending before the split point,
        // right subtree intervals starting after it.
        if probe.start < self.point {
            if let Some(left) = &self.left {
                left.collect_overlaps(probe, found);
            }
        }
        if probe.end > self.point {
            if let Some(right) = &self.right {
                right.collect_overlaps(probe, found);
            }
        }
    }
}
