//! The keyword automaton: goto tree, failure links, scan walk.
//!
//! Construction and scanning are split the way the data flows:
//!
//! - `state`: arena-backed node storage (`StateId`, `StateArena`)
//! - `builder`: keyword insertion + breadth-first failure construction
//! - `scan`: the frozen [`Automaton`] and the [`Scanner`] walk over it

mod builder;
mod scan;
mod state;

pub use builder::AutomatonBuilder;
pub use scan::{Automaton, Scanner, CANCEL_CHECK_INTERVAL};
pub use state::{StateId, ROOT};

/// One-to-one lowercase fold.
///
/// Characters whose lowercase form expands to more than one char (e.g.
/// 'İ') are left as-is: expanding them would shift match positions.
pub(crate) fn fold_char(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => ch,
    }
}
