//! Scan-pipeline configuration.

/// Immutable flag set controlling how matches are produced and filtered.
///
/// Defaults: overlapping matches are allowed, everything else is off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrieConfig {
    /// Report overlapping matches; when false, the overlap resolver picks
    /// a pairwise non-overlapping subset.
    pub allow_overlaps: bool,
    /// Drop matches with an alphabetic character directly adjacent on
    /// either side.
    pub only_whole_words: bool,
    /// Drop matches unless both boundaries are text edges or whitespace.
    pub only_whole_words_white_space_separated: bool,
    /// Case-fold keywords at build time and input at scan time.
    pub ignore_case: bool,
    /// Terminate the scan as soon as one emit is accepted.
    pub stop_on_hit: bool,
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self {
            allow_overlaps: true,
            only_whole_words: false,
            only_whole_words_white_space_separated: false,
            ignore_case: false,
            stop_on_hit: false,
        }
    }
}
