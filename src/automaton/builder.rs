//! Automaton construction: keyword insertion and failure-link BFS.

use log::trace;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::Arc;

use super::state::{StateArena, StateId, ROOT};
use super::{fold_char, Automaton};

/// Builds the goto tree from keywords, then derives failure links.
///
/// Single-threaded by contract: the automaton is published only after
/// [`finish`](AutomatonBuilder::finish) has run the failure BFS, so no
/// scan ever observes a half-built graph.
pub struct AutomatonBuilder {
    arena: StateArena,
    ignore_case: bool,
    /// Interns duplicate keywords so every emit set shares one allocation.
    keyword_cache: FxHashSet<Arc<str>>,
}

impl AutomatonBuilder {
    pub fn new(ignore_case: bool) -> Self {
        Self {
            arena: StateArena::new(),
            ignore_case,
            keyword_cache: FxHashSet::default(),
        }
    }

    /// Insert one keyword into the goto tree.
    ///
    /// Case-folds first when `ignore_case` is set; keywords that are
    /// empty (after folding) are silently skipped.
    pub fn add_keyword(&mut self, keyword: &str) {
        let stored: Arc<str> = if self.ignore_case {
            Arc::from(keyword.chars().map(fold_char).collect::<String>())
        } else {
            Arc::from(keyword)
        };
        if stored.is_empty() {
            return;
        }
        let stored = match self.keyword_cache.get(&stored) {
            Some(interned) => interned.clone(),
            None => {
                self.keyword_cache.insert(stored.clone());
                stored
            }
        };

        let mut state = ROOT;
        for ch in stored.chars() {
            state = self.arena.get_or_create_child(state, ch);
        }
        self.arena.add_emit(state, stored);
    }

    /// Derive failure links breadth-first and propagate emit sets, then
    /// freeze the arena into an [`Automaton`].
    pub fn finish(mut self) -> Automaton {
        let mut queue: VecDeque<StateId> = VecDeque::new();

        // Depth-1 states fail straight to the root.
        let depth_one: Vec<StateId> = self.arena.transitions(ROOT).map(|(_, s)| s).collect();
        for state in depth_one {
            self.arena.set_failure(state, ROOT);
            queue.push_back(state);
        }

        while let Some(state) = queue.pop_front() {
            let transitions: Vec<(char, StateId)> = self.arena.transitions(state).collect();
            for (ch, target) in transitions {
                queue.push_back(target);

                // Walk the failure chain to the deepest state with a `ch`
                // child; the root is the floor. Depth strictly decreases
                // along the chain, so this terminates.
                let mut fallback = self.arena.failure(state);
                let new_failure = loop {
                    if let Some(next) = self.arena.child(fallback, ch) {
                        break next;
                    }
                    if fallback.is_root() {
                        break ROOT;
                    }
                    fallback = self.arena.failure(fallback);
                };

                self.arena.set_failure(target, new_failure);
                self.arena.merge_emits(target, new_failure);
            }
        }

        trace!(
            "failure construction done: {} states, {} distinct keywords",
            self.arena.len(),
            self.keyword_cache.len()
        );
        Automaton::new(self.arena)
    }
}
