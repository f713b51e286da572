//! Tokens produced by [`Trie::tokenize`](crate::Trie::tokenize).

use crate::emit::Emit;

/// A piece of the input text: either unmatched filler between matches or
/// a matched keyword span with its originating [`Emit`].
///
/// Concatenating the fragments of all tokens in order reproduces the
/// input text exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Unmatched text between matches.
    Fragment(String),
    /// A matched span. `fragment` is the literal text as it appears in
    /// the input (which may differ in case from `emit.keyword`).
    Match { fragment: String, emit: Emit },
}

impl Token {
    /// The literal text this token covers.
    pub fn fragment(&self) -> &str {
        match self {
            Token::Fragment(s) => s,
            Token::Match { fragment, .. } => fragment,
        }
    }

    /// The emit behind a match token, `None` for fragments.
    pub fn emit(&self) -> Option<&Emit> {
        match self {
            Token::Fragment(_) => None,
            Token::Match { emit, .. } => Some(emit),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Token::Match { .. })
    }
}
