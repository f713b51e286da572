//! The frozen automaton and the character walk over it.

use super::state::{StateArena, StateId, ROOT};
use super::fold_char;
use crate::config::TrieConfig;
use crate::emit::{Emit, EmitHandler};

/// How many characters the cancellable walk processes between
/// cancellation checks. Checking per character would tax the hot loop.
pub const CANCEL_CHECK_INTERVAL: usize = 4096;

/// A fully constructed, immutable keyword automaton.
///
/// Carries no scan-time state; the current state during a walk is a
/// local of the calling scan, so any number of scans may run against
/// one shared automaton concurrently.
pub struct Automaton {
    arena: StateArena,
}

impl Automaton {
    pub(crate) fn new(arena: StateArena) -> Self {
        Self { arena }
    }

    /// Number of states, root included.
    pub fn state_count(&self) -> usize {
        self.arena.len()
    }

    /// True when no keywords were inserted.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// The effective transition function: direct goto edge if present,
    /// else follow failure links until one is found; the root accepts
    /// everything via its implicit self-loop.
    #[inline]
    pub fn next_state(&self, from: StateId, ch: char) -> StateId {
        let mut state = from;
        loop {
            if let Some(next) = self.arena.child(state, ch) {
                return next;
            }
            if state.is_root() {
                return ROOT;
            }
            state = self.arena.failure(state);
        }
    }

    /// Keywords recognized on arrival at `state`, lexicographic order.
    #[inline]
    pub fn emits(&self, state: StateId) -> impl Iterator<Item = &std::sync::Arc<str>> + '_ {
        self.arena.emits(state)
    }
}

/// One scan invocation over a borrowed automaton.
pub struct Scanner<'a> {
    automaton: &'a Automaton,
    config: &'a TrieConfig,
}

impl<'a> Scanner<'a> {
    pub fn new(automaton: &'a Automaton, config: &'a TrieConfig) -> Self {
        Self { automaton, config }
    }

    /// Walk `text` character by character, reporting every emit to
    /// `handler`. With `stop_on_hit`, returns after the first emit the
    /// handler accepts.
    pub fn run(&self, text: &str, handler: &mut dyn EmitHandler) {
        self.run_with_cancel(text, handler, &|| false);
    }

    /// Like [`run`](Scanner::run), but checks `cancel` once every
    /// [`CANCEL_CHECK_INTERVAL`] characters. Returns `false` if the
    /// scan was abandoned.
    pub fn run_with_cancel(
        &self,
        text: &str,
        handler: &mut dyn EmitHandler,
        cancel: &dyn Fn() -> bool,
    ) -> bool {
        let mut state = ROOT;
        for (pos, ch) in text.chars().enumerate() {
            if pos % CANCEL_CHECK_INTERVAL == CANCEL_CHECK_INTERVAL - 1 && cancel() {
                return false;
            }
            let ch = if self.config.ignore_case {
                fold_char(ch)
            } else {
                ch
            };
            state = self.automaton.next_state(state, ch);
            if self.store_emits(pos, state, handler) && self.config.stop_on_hit {
                return true;
            }
        }
        true
    }

    /// Report all keywords ending at `pos`. Returns whether the handler
    /// accepted an emit (the stop-on-hit signal).
    fn store_emits(&self, pos: usize, state: StateId, handler: &mut dyn EmitHandler) -> bool {
        let mut emitted = false;
        for keyword in self.automaton.emits(state) {
            let len = keyword.chars().count();
            emitted = handler.emit(Emit::new(pos + 1 - len, pos, keyword.clone()));
            if emitted && self.config.stop_on_hit {
                return true;
            }
        }
        emitted
    }
}
