//! Arena-backed state storage for the keyword automaton.
//!
//! All states live in a contiguous `Vec` and are referenced by index.
//! This keeps the goto graph a strict ownership tree: child edges and
//! failure edges are both plain indices, so failure back-links (which
//! cross-cut the tree) can never form ownership cycles.

use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Index into the state arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StateId(u32);

/// The root state is always the first slot in the arena.
pub const ROOT: StateId = StateId(0);

impl StateId {
    #[inline]
    fn get(self) -> usize {
        self.0 as usize
    }

    /// True for the root state.
    #[inline]
    pub fn is_root(self) -> bool {
        self.0 == 0
    }
}

/// One automaton node.
///
/// Children are kept as (char, index) pairs sorted by char; most states
/// have very few children, so a SmallVec with binary search beats a
/// per-node hash map.
#[derive(Default)]
struct State {
    depth: u32,
    children: SmallVec<[(char, StateId); 4]>,
    /// Keywords terminating at this state, plus everything inherited
    /// through the failure chain. Lexicographically ordered.
    emits: BTreeSet<Arc<str>>,
    /// None only before failure-link construction has run.
    failure: Option<StateId>,
}

/// Arena holding every state of one automaton.
///
/// Mutable only while the builder owns it; frozen (read-only) once the
/// automaton is published, which is what makes concurrent scans safe.
pub struct StateArena {
    states: Vec<State>,
}

impl Default for StateArena {
    fn default() -> Self {
        Self::new()
    }
}

impl StateArena {
    /// Create an arena containing only the root state.
    pub fn new() -> Self {
        let mut states = Vec::with_capacity(64);
        states.push(State::default());
        Self { states }
    }

    /// Number of states, root included.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists; "empty" means no keywords were added.
        self.states.len() == 1
    }

    fn alloc(&mut self, depth: u32) -> StateId {
        let idx = self.states.len();
        self.states.push(State {
            depth,
            ..State::default()
        });
        StateId(idx as u32)
    }

    /// Distance from the root; root depth is 0.
    #[inline]
    pub fn depth(&self, id: StateId) -> u32 {
        self.states[id.get()].depth
    }

    /// Direct goto transition, if present.
    #[inline]
    pub fn child(&self, id: StateId, ch: char) -> Option<StateId> {
        let children = &self.states[id.get()].children;
        children
            .binary_search_by_key(&ch, |&(c, _)| c)
            .ok()
            .map(|pos| children[pos].1)
    }

    /// Find or create the goto transition for `ch`.
    pub fn get_or_create_child(&mut self, parent: StateId, ch: char) -> StateId {
        let depth = self.states[parent.get()].depth + 1;
        match self.states[parent.get()]
            .children
            .binary_search_by_key(&ch, |&(c, _)| c)
        {
            Ok(pos) => self.states[parent.get()].children[pos].1,
            Err(pos) => {
                let child = self.alloc(depth);
                self.states[parent.get()].children.insert(pos, (ch, child));
                child
            }
        }
    }

    /// All outgoing transitions of a state, in char order.
    pub fn transitions(&self, id: StateId) -> impl Iterator<Item = (char, StateId)> + '_ {
        self.states[id.get()].children.iter().copied()
    }

    /// Record a keyword terminating at this state.
    pub fn add_emit(&mut self, id: StateId, keyword: Arc<str>) {
        self.states[id.get()].emits.insert(keyword);
    }

    /// Merge the emit set of `from` into `into` (output-function
    /// propagation along a freshly set failure link).
    pub fn merge_emits(&mut self, into: StateId, from: StateId) {
        if self.states[from.get()].emits.is_empty() || into == from {
            return;
        }
        let inherited: Vec<Arc<str>> = self.states[from.get()].emits.iter().cloned().collect();
        self.states[into.get()].emits.extend(inherited);
    }

    /// Keywords recognized on arrival at this state, lexicographic order.
    #[inline]
    pub fn emits(&self, id: StateId) -> impl Iterator<Item = &Arc<str>> + '_ {
        self.states[id.get()].emits.iter()
    }

    pub fn set_failure(&mut self, id: StateId, target: StateId) {
        debug_assert!(
            self.depth(target) <= self.depth(id),
            "failure target must not be deeper than its source"
        );
        self.states[id.get()].failure = Some(target);
    }

    /// Failure link of a state. Panics if construction never ran; that is
    /// a builder bug, not a recoverable condition.
    #[inline]
    pub fn failure(&self, id: StateId) -> StateId {
        self.states[id.get()]
            .failure
            .expect("failure link unset: automaton used before construction finished")
    }
}
