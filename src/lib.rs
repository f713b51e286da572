//! ahotrie: Aho-Corasick multi-pattern keyword matching.
//!
//! Build one automaton from a dictionary of keywords, scan any text once,
//! and get every occurrence of every keyword regardless of dictionary
//! size. A post-processing pipeline adds whole-word filtering, overlap
//! resolution, tokenization and keyword replacement.
//!
//! ```
//! use ahotrie::Trie;
//!
//! let trie = Trie::builder()
//!     .add_keywords(["he", "she", "his", "hers"])
//!     .build();
//!
//! let emits = trie.parse_text("ushers");
//! assert_eq!(emits.len(), 3); // she, he, hers
//! ```
//!
//! The built [`Trie`] is immutable and carries no scan-time state, so it
//! can be shared across threads behind an `Arc`:
//!
//! ```
//! use ahotrie::Trie;
//! use std::sync::Arc;
//!
//! let trie = Arc::new(Trie::builder().add_keyword("keyword").build());
//! let t = Arc::clone(&trie);
//! std::thread::spawn(move || t.contains_match("some keyword here"))
//!     .join()
//!     .unwrap();
//! ```

mod automaton;
mod config;
mod emit;
mod interval;
mod token;

pub use automaton::CANCEL_CHECK_INTERVAL;
pub use config::TrieConfig;
pub use emit::{CollectingEmitHandler, Emit, EmitHandler, FnEmitHandler};
pub use interval::{IntervalTree, IntervalTreeResolver, OverlapResolver};
pub use token::Token;

use automaton::{fold_char, Automaton, AutomatonBuilder, Scanner, ROOT};
use log::trace;
use std::collections::HashMap;
use std::sync::Arc;

/// An immutable keyword-matching automaton plus its scan configuration.
///
/// Built once via [`Trie::builder`]; read-only afterwards. Positions in
/// all results are character indices with inclusive ends.
pub struct Trie {
    automaton: Automaton,
    config: TrieConfig,
    resolver: Arc<dyn OverlapResolver + Send + Sync>,
}

impl Trie {
    pub fn builder() -> TrieBuilder {
        TrieBuilder::new()
    }

    /// The configuration this trie was built with.
    pub fn config(&self) -> &TrieConfig {
        &self.config
    }

    /// Raw automaton walk: every emit goes straight to `handler`, no
    /// filtering, no list allocation. With `stop_on_hit`, the walk ends
    /// after the first emit the handler accepts.
    pub fn scan(&self, text: &str, handler: &mut dyn EmitHandler) {
        Scanner::new(&self.automaton, &self.config).run(text, handler);
    }

    /// Scan `text` and return all matches after the configured
    /// post-processing (whole-word filters, overlap resolution).
    ///
    /// Matches come back in scan order (non-decreasing end position);
    /// the overlap-resolved variant is sorted by start.
    pub fn parse_text(&self, text: &str) -> Vec<Emit> {
        let mut handler = CollectingEmitHandler::default();
        self.scan(text, &mut handler);
        self.post_process(text, handler.emits)
    }

    /// [`parse_text`](Trie::parse_text) with a cooperative cancellation
    /// checkpoint every [`CANCEL_CHECK_INTERVAL`] characters. Returns
    /// `None` if `cancel` reported true before the scan finished.
    pub fn parse_text_cancellable(
        &self,
        text: &str,
        cancel: &dyn Fn() -> bool,
    ) -> Option<Vec<Emit>> {
        let mut handler = CollectingEmitHandler::default();
        let completed =
            Scanner::new(&self.automaton, &self.config).run_with_cancel(text, &mut handler, cancel);
        if completed {
            Some(self.post_process(text, handler.emits))
        } else {
            trace!("scan cancelled after partial input");
            None
        }
    }

    /// The first match in `text`, or `None`.
    ///
    /// With overlaps allowed this is a dedicated single pass that stops
    /// at the first emit surviving the whole-word filter; with overlap
    /// resolution on, the whole match set is needed first, so it falls
    /// back to [`parse_text`](Trie::parse_text).
    pub fn first_match(&self, text: &str) -> Option<Emit> {
        if !self.config.allow_overlaps {
            return self.parse_text(text).into_iter().next();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut state = ROOT;
        for (pos, &raw) in chars.iter().enumerate() {
            let ch = if self.config.ignore_case {
                fold_char(raw)
            } else {
                raw
            };
            state = self.automaton.next_state(state, ch);
            for keyword in self.automaton.emits(state) {
                let len = keyword.chars().count();
                let emit = Emit::new(pos + 1 - len, pos, keyword.clone());
                if self.config.only_whole_words && is_partial_match(&chars, &emit) {
                    continue;
                }
                return Some(emit);
            }
        }
        None
    }

    /// Whether `text` contains any match at all.
    pub fn contains_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// Split `text` into fragment and match tokens.
    ///
    /// Concatenating every token's fragment reproduces `text` exactly.
    /// The walk consumes left to right; an emit starting inside an
    /// already consumed span is skipped.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        if text.is_empty() {
            return tokens;
        }

        let offsets = char_offsets(text);
        let char_count = offsets.len() - 1;
        let mut next_pos = 0;

        for emit in self.parse_text(text) {
            if emit.start < next_pos {
                continue;
            }
            if emit.start > next_pos {
                tokens.push(Token::Fragment(
                    text[offsets[next_pos]..offsets[emit.start]].to_string(),
                ));
            }
            let end = emit.end;
            tokens.push(Token::Match {
                fragment: text[offsets[emit.start]..offsets[end + 1]].to_string(),
                emit,
            });
            next_pos = end + 1;
        }

        if next_pos < char_count {
            tokens.push(Token::Fragment(text[offsets[next_pos]..].to_string()));
        }
        tokens
    }

    /// Replace every matched keyword that has an entry in
    /// `substitutions`; unmapped matches and unmatched text are copied
    /// through verbatim.
    pub fn replace(&self, text: &str, substitutions: &HashMap<String, String>) -> String {
        let mut out = String::with_capacity(text.len());
        for token in self.tokenize(text) {
            let substitute = token
                .emit()
                .and_then(|e| substitutions.get(e.keyword.as_ref()));
            match substitute {
                Some(replacement) => out.push_str(replacement),
                None => out.push_str(token.fragment()),
            }
        }
        out
    }

    fn post_process(&self, text: &str, mut emits: Vec<Emit>) -> Vec<Emit> {
        if self.config.only_whole_words || self.config.only_whole_words_white_space_separated {
            let chars: Vec<char> = text.chars().collect();
            if self.config.only_whole_words {
                emits.retain(|e| !is_partial_match(&chars, e));
                trace!("only_whole_words: {} emits survive", emits.len());
            }
            if self.config.only_whole_words_white_space_separated {
                emits.retain(|e| is_whitespace_separated(&chars, e));
                trace!(
                    "only_whole_words_white_space_separated: {} emits survive",
                    emits.len()
                );
            }
        }
        if !self.config.allow_overlaps {
            emits = self.resolver.resolve_overlaps(emits);
            trace!("overlap resolution: {} emits survive", emits.len());
        }
        emits
    }
}

/// Byte offset of every character in `text`, plus one past-the-end
/// entry, so `text[offsets[i]..offsets[j]]` slices chars `i..j`.
fn char_offsets(text: &str) -> Vec<usize> {
    let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    offsets.push(text.len());
    offsets
}

/// A match is partial when an alphabetic character sits directly before
/// or after it.
fn is_partial_match(chars: &[char], emit: &Emit) -> bool {
    (emit.start > 0 && chars[emit.start - 1].is_alphabetic())
        || (emit.end + 1 < chars.len() && chars[emit.end + 1].is_alphabetic())
}

fn is_whitespace_separated(chars: &[char], emit: &Emit) -> bool {
    let open = emit.start == 0 || chars[emit.start - 1].is_whitespace();
    let close = emit.end + 1 == chars.len() || chars[emit.end + 1].is_whitespace();
    open && close
}

/// Collects keywords and flags, then constructs the automaton.
///
/// ```
/// use ahotrie::Trie;
///
/// let trie = Trie::builder()
///     .add_keyword("Test")
///     .ignore_case()
///     .only_whole_words()
///     .build();
/// assert!(trie.contains_match("a TEST case"));
/// ```
pub struct TrieBuilder {
    keywords: Vec<String>,
    config: TrieConfig,
    resolver: Arc<dyn OverlapResolver + Send + Sync>,
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self {
            keywords: Vec::new(),
            config: TrieConfig::default(),
            resolver: Arc::new(IntervalTreeResolver),
        }
    }

    pub fn add_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn add_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Case-fold keywords now and input at scan time.
    pub fn ignore_case(mut self) -> Self {
        self.config.ignore_case = true;
        self
    }

    /// Resolve overlapping matches to a non-overlapping subset.
    pub fn ignore_overlaps(mut self) -> Self {
        self.config.allow_overlaps = false;
        self
    }

    pub fn only_whole_words(mut self) -> Self {
        self.config.only_whole_words = true;
        self
    }

    pub fn only_whole_words_white_space_separated(mut self) -> Self {
        self.config.only_whole_words_white_space_separated = true;
        self
    }

    /// Terminate each scan at the first accepted emit.
    pub fn stop_on_hit(mut self) -> Self {
        self.config.stop_on_hit = true;
        self
    }

    /// Swap in a different overlap-resolution policy.
    pub fn overlap_resolver(mut self, resolver: Arc<dyn OverlapResolver + Send + Sync>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Insert all keywords and run failure-link construction. The
    /// returned trie is complete and immutable.
    pub fn build(self) -> Trie {
        let mut builder = AutomatonBuilder::new(self.config.ignore_case);
        for keyword in &self.keywords {
            builder.add_keyword(keyword);
        }
        Trie {
            automaton: builder.finish(),
            config: self.config,
            resolver: self.resolver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(start: usize, end: usize, kw: &str) -> Emit {
        Emit::new(start, end, Arc::from(kw))
    }

    /// Brute-force reference matcher for exhaustiveness checks.
    fn naive_matches(dict: &[&str], text: &str) -> Vec<(usize, String)> {
        let chars: Vec<char> = text.chars().collect();
        let mut found = Vec::new();
        for i in 0..chars.len() {
            for kw in dict {
                let k: Vec<char> = kw.chars().collect();
                if !k.is_empty() && i + k.len() <= chars.len() && chars[i..i + k.len()] == k[..] {
                    found.push((i, (*kw).to_string()));
                }
            }
        }
        found.sort();
        found
    }

    #[test]
    fn test_ushers_classic() {
        let trie = Trie::builder()
            .add_keywords(["he", "she", "his", "hers"])
            .build();

        let mut emits = trie.parse_text("ushers");
        emits.sort_by_key(|e| (e.start, e.end));
        assert_eq!(
            emits,
            vec![emit(1, 3, "she"), emit(2, 3, "he"), emit(2, 5, "hers")]
        );
    }

    #[test]
    fn test_exhaustive_against_naive() {
        let dict = ["a", "ab", "aba", "b", "bab", "abab"];
        for text in ["abababab", "bbaabab", "xyz", "a", "", "babba"] {
            let trie = Trie::builder().add_keywords(dict).build();
            let mut got: Vec<(usize, String)> = trie
                .parse_text(text)
                .into_iter()
                .map(|e| (e.start, e.keyword.to_string()))
                .collect();
            got.sort();
            assert_eq!(got, naive_matches(&dict, text), "text={:?}", text);
        }
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let forward = Trie::builder()
            .add_keywords(["he", "she", "his", "hers"])
            .build();
        let backward = Trie::builder()
            .add_keywords(["hers", "his", "she", "he"])
            .build();

        for text in ["ushers", "his and hers", "shhe"] {
            let mut a = forward.parse_text(text);
            let mut b = backward.parse_text(text);
            a.sort_by_key(|e| (e.start, e.end));
            b.sort_by_key(|e| (e.start, e.end));
            assert_eq!(a, b, "text={:?}", text);
        }
    }

    #[test]
    fn test_ignore_case_reports_folded_keyword() {
        let trie = Trie::builder().add_keyword("Test").ignore_case().build();
        let emits = trie.parse_text("a TEST case");
        assert_eq!(emits, vec![emit(2, 5, "test")]);
    }

    #[test]
    fn test_only_whole_words() {
        let trie = Trie::builder().add_keyword("cat").only_whole_words().build();
        assert!(trie.parse_text("concatenate").is_empty());
        assert_eq!(trie.parse_text("the cat sat"), vec![emit(4, 6, "cat")]);
    }

    #[test]
    fn test_whole_words_allows_punctuation_boundary() {
        let trie = Trie::builder().add_keyword("cat").only_whole_words().build();
        assert_eq!(trie.parse_text("a cat."), vec![emit(2, 4, "cat")]);
    }

    #[test]
    fn test_whitespace_separated_stricter_than_whole_words() {
        let whole = Trie::builder().add_keyword("beta").only_whole_words().build();
        let spaced = Trie::builder()
            .add_keyword("beta")
            .only_whole_words_white_space_separated()
            .build();

        // '-' is not alphabetic, so plain whole-words keeps the match;
        // it is not whitespace either, so the stricter filter drops it.
        assert_eq!(whole.parse_text("alpha-beta gamma").len(), 1);
        assert!(spaced.parse_text("alpha-beta gamma").is_empty());
        assert_eq!(spaced.parse_text("alpha beta gamma").len(), 1);
    }

    #[test]
    fn test_ignore_overlaps_keeps_longest() {
        let trie = Trie::builder()
            .add_keywords(["he", "hers", "she"])
            .ignore_overlaps()
            .build();
        assert_eq!(trie.parse_text("ushers"), vec![emit(2, 5, "hers")]);
    }

    #[test]
    fn test_first_match_agrees_with_parse_text() {
        let trie = Trie::builder()
            .add_keywords(["he", "she", "his", "hers"])
            .build();
        for text in ["ushers", "no matches here?", "", "h", "hishers"] {
            assert_eq!(
                trie.first_match(text),
                trie.parse_text(text).into_iter().next(),
                "text={:?}",
                text
            );
        }
    }

    #[test]
    fn test_first_match_skips_partial_words() {
        let trie = Trie::builder().add_keyword("cat").only_whole_words().build();
        assert_eq!(
            trie.first_match("concatenate cat"),
            Some(emit(12, 14, "cat"))
        );
        assert_eq!(trie.first_match("concatenate"), None);
    }

    #[test]
    fn test_contains_match() {
        let trie = Trie::builder().add_keyword("needle").build();
        assert!(trie.contains_match("in a haystack a needle hides"));
        assert!(!trie.contains_match("just hay"));
        assert!(!trie.contains_match(""));
    }

    #[test]
    fn test_stop_on_hit_reports_only_first() {
        let trie = Trie::builder()
            .add_keywords(["he", "she"])
            .stop_on_hit()
            .build();
        // The scan ends at the first accepted emit, position 3.
        let emits = trie.parse_text("ushers he");
        assert_eq!(emits, vec![emit(2, 3, "he")]);
    }

    #[test]
    fn test_empty_text() {
        let trie = Trie::builder().add_keywords(["a", "b"]).build();
        assert!(trie.parse_text("").is_empty());
        assert!(trie.tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_round_trip() {
        let trie = Trie::builder()
            .add_keywords(["fox", "dog"])
            .only_whole_words()
            .build();
        let text = "the quick brown fox jumps over the lazy dog";
        let tokens = trie.tokenize(text);

        let rebuilt: String = tokens.iter().map(Token::fragment).collect();
        assert_eq!(rebuilt, text);
        assert_eq!(tokens.iter().filter(|t| t.is_match()).count(), 2);
    }

    #[test]
    fn test_tokenize_round_trip_with_overlaps() {
        // Overlapping emits must not break the left-to-right walk.
        let trie = Trie::builder().add_keywords(["he", "she", "hers"]).build();
        let text = "ushers";
        let rebuilt: String = trie.tokenize(text).iter().map(Token::fragment).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_tokenize_match_carries_original_case() {
        let trie = Trie::builder().add_keyword("Test").ignore_case().build();
        let tokens = trie.tokenize("a TEST case");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].fragment(), "TEST");
        assert_eq!(tokens[1].emit().unwrap().keyword.as_ref(), "test");
    }

    #[test]
    fn test_replace() {
        let trie = Trie::builder().add_keyword("foo").build();
        let mut subs = HashMap::new();
        subs.insert("foo".to_string(), "bar".to_string());
        assert_eq!(trie.replace("foofighters", &subs), "barfighters");
    }

    #[test]
    fn test_replace_unmapped_keyword_passes_through() {
        let trie = Trie::builder().add_keywords(["foo", "baz"]).build();
        let mut subs = HashMap::new();
        subs.insert("foo".to_string(), "bar".to_string());
        assert_eq!(trie.replace("foo and baz", &subs), "bar and baz");
    }

    #[test]
    fn test_unicode_positions_are_char_indices() {
        let trie = Trie::builder().add_keyword("naïve").build();
        let emits = trie.parse_text("so naïve!");
        assert_eq!(emits, vec![emit(3, 7, "naïve")]);

        let tokens = trie.tokenize("so naïve!");
        assert_eq!(tokens[1].fragment(), "naïve");
        let rebuilt: String = tokens.iter().map(Token::fragment).collect();
        assert_eq!(rebuilt, "so naïve!");
    }

    #[test]
    fn test_cancellation_checkpoint() {
        let trie = Trie::builder().add_keyword("zzz").build();
        let text: String = "ab".repeat(3 * CANCEL_CHECK_INTERVAL);

        assert!(trie.parse_text_cancellable(&text, &|| true).is_none());
        assert_eq!(trie.parse_text_cancellable(&text, &|| false), Some(vec![]));

        // Short inputs finish before the first checkpoint.
        assert_eq!(trie.parse_text_cancellable("abc", &|| true), Some(vec![]));
    }

    #[test]
    fn test_custom_overlap_resolver() {
        // Keeps only the first emit, drops the rest.
        struct FirstOnly;
        impl OverlapResolver for FirstOnly {
            fn resolve_overlaps(&self, emits: Vec<Emit>) -> Vec<Emit> {
                emits.into_iter().take(1).collect()
            }
        }

        let trie = Trie::builder()
            .add_keywords(["he", "she", "hers"])
            .ignore_overlaps()
            .overlap_resolver(Arc::new(FirstOnly))
            .build();
        assert_eq!(trie.parse_text("ushers").len(), 1);
    }

    #[test]
    fn test_scan_with_custom_handler() {
        let trie = Trie::builder().add_keywords(["he", "she"]).build();
        let mut ends = Vec::new();
        let mut handler = FnEmitHandler(|e: Emit| {
            ends.push(e.end);
            true
        });
        trie.scan("ushers", &mut handler);
        drop(handler);
        assert_eq!(ends, vec![3, 3]); // "he" and "she" both end at 3
    }

    #[test]
    fn test_shared_across_threads() {
        let trie = Arc::new(
            Trie::builder()
                .add_keywords(["alpha", "beta", "gamma"])
                .build(),
        );

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let t = Arc::clone(&trie);
                std::thread::spawn(move || t.parse_text("alpha beta gamma delta").len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 3);
        }
    }
}
