//! Literal find / replace over a borrowed text buffer.
//!
//! All offsets are character indices into the buffer's full text, with a
//! line break counting as one character. Matching is plain substring
//! comparison; when a search is case-insensitive both sides are folded one
//! character at a time so folded offsets line up with the original text.

use std::ops::Range;

/// The host-side text storage the search engine reads from and writes to.
pub trait TextBuffer {
    /// Snapshot of the full buffer contents.
    fn text(&self) -> String;

    /// Select the half-open character range `start..end`.
    fn set_selection(&mut self, start: usize, end: usize);

    /// Currently selected text, empty when nothing is selected.
    fn selected_text(&self) -> String;

    /// Currently selected character range, if any.
    fn selection(&self) -> Option<Range<usize>>;

    /// Replace the character range `start..end` with `text`.
    fn replace_range(&mut self, start: usize, end: usize, text: &str);
}

/// Flags controlling how a query is compared against the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    /// Only accept matches not surrounded by word characters.
    pub whole_word: bool,
}

/// Incremental "find next" state owned by an open find/replace dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub options: SearchOptions,
    /// Offset the next search starts from. May be stale after edits.
    pub last_match_start: usize,
}

/// What a "Replace" press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Whether the selection matched the query and was replaced.
    pub replaced: bool,
    /// The match selected afterwards, if any.
    pub next: Option<Range<usize>>,
}

impl SearchState {
    pub fn new(query: impl Into<String>, options: SearchOptions) -> Self {
        Self {
            query: query.into(),
            options,
            last_match_start: 0,
        }
    }

    /// Find the next occurrence from the cursor, wrapping to the start.
    ///
    /// On success the match is selected in `buffer` and the cursor moves to
    /// `start + 1`, so overlapping matches are visited in turn. A miss
    /// leaves the cursor where it was.
    pub fn find_next<B: TextBuffer + ?Sized>(&mut self, buffer: &mut B) -> Option<Range<usize>> {
        let text = buffer.text();
        let found = find_from(&text, &self.query, self.options, self.last_match_start)?;
        buffer.set_selection(found.start, found.end);
        self.last_match_start = found.start + 1;
        tracing::debug!(
            start = found.start,
            end = found.end,
            query = %self.query,
            "find_next hit"
        );
        Some(found)
    }

    /// Replace the selection if it is an occurrence of the query, then
    /// move on to the next occurrence.
    pub fn replace_current<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        replacement: &str,
    ) -> ReplaceOutcome {
        if self.query.is_empty() {
            return ReplaceOutcome {
                replaced: false,
                next: None,
            };
        }

        let mut replaced = false;
        if let Some(range) = buffer.selection() {
            if self.selection_is_match(buffer, &range) {
                self.last_match_start = replace_one(buffer, range, replacement);
                replaced = true;
            }
        }

        let next = self.find_next(buffer);
        ReplaceOutcome { replaced, next }
    }

    /// Whether the selected `range` is an occurrence the search itself
    /// would have found, word boundaries included.
    fn selection_is_match<B: TextBuffer + ?Sized>(&self, buffer: &B, range: &Range<usize>) -> bool {
        if !text_matches(&buffer.selected_text(), &self.query, self.options) {
            return false;
        }
        if !self.options.whole_word {
            return true;
        }
        let chars: Vec<char> = buffer.text().chars().collect();
        range.end <= chars.len() && is_whole_word(&chars, range.start, range.end)
    }
}

/// Locate `query` in `text` at or after `from`, wrapping to offset 0 when
/// nothing is found before the end.
///
/// Returns `None` for an empty query or when there is no occurrence at all.
/// A `from` past the end of the text simply wraps.
pub fn find_from(text: &str, query: &str, options: SearchOptions, from: usize) -> Option<Range<usize>> {
    if query.is_empty() {
        return None;
    }
    let haystack = prepare(text, options.case_sensitive);
    let needle = prepare(query, options.case_sensitive);
    let start = position_in(&haystack, &needle, from, options.whole_word)
        .or_else(|| position_in(&haystack, &needle, 0, options.whole_word))?;
    Some(start..start + needle.len())
}

/// All non-overlapping occurrences of `query`, left to right.
pub fn find_all(text: &str, query: &str, options: SearchOptions) -> Vec<Range<usize>> {
    let mut matches = Vec::new();
    if query.is_empty() {
        return matches;
    }
    let haystack = prepare(text, options.case_sensitive);
    let needle = prepare(query, options.case_sensitive);
    let mut from = 0;
    while let Some(start) = position_in(&haystack, &needle, from, options.whole_word) {
        matches.push(start..start + needle.len());
        from = start + needle.len();
    }
    matches
}

/// Replace `range` with `replacement`, returning the offset just past the
/// inserted text.
pub fn replace_one<B: TextBuffer + ?Sized>(buffer: &mut B, range: Range<usize>, replacement: &str) -> usize {
    buffer.replace_range(range.start, range.end, replacement);
    range.start + replacement.chars().count()
}

/// Replace every occurrence of `query`, scanning left to right over the
/// updated content. After each replacement the scan resumes at
/// `match_start + len(replacement)`. Returns the number of replacements.
pub fn replace_all<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    query: &str,
    replacement: &str,
    options: SearchOptions,
) -> usize {
    if query.is_empty() {
        return 0;
    }
    // Mirror of the buffer in folded form, kept in step with every edit.
    let mut haystack = prepare(&buffer.text(), options.case_sensitive);
    let needle = prepare(query, options.case_sensitive);
    let folded_replacement = prepare(replacement, options.case_sensitive);

    let mut cursor = 0;
    let mut count = 0;
    while let Some(start) = position_in(&haystack, &needle, cursor, options.whole_word) {
        let end = start + needle.len();
        buffer.replace_range(start, end, replacement);
        haystack.splice(start..end, folded_replacement.iter().copied());
        cursor = start + folded_replacement.len();
        count += 1;
    }
    tracing::debug!(count, query, "replace_all");
    count
}

/// Whether `candidate` is exactly one occurrence of `query` under `options`.
pub fn text_matches(candidate: &str, query: &str, options: SearchOptions) -> bool {
    if query.is_empty() {
        return false;
    }
    prepare(candidate, options.case_sensitive) == prepare(query, options.case_sensitive)
}

/// Lowercase a single character, keeping it unchanged when its lowercase
/// form is not exactly one character.
fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn prepare(s: &str, case_sensitive: bool) -> Vec<char> {
    if case_sensitive {
        s.chars().collect()
    } else {
        s.chars().map(fold_char).collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_whole_word(haystack: &[char], start: usize, end: usize) -> bool {
    let clear_before = start == 0 || !is_word_char(haystack[start - 1]);
    let clear_after = end >= haystack.len() || !is_word_char(haystack[end]);
    clear_before && clear_after
}

fn position_in(haystack: &[char], needle: &[char], from: usize, whole_word: bool) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    let last = haystack.len() - needle.len();
    (from..=last).find(|&i| {
        haystack[i..i + needle.len()] == *needle
            && (!whole_word || is_whole_word(haystack, i, i + needle.len()))
    })
}
