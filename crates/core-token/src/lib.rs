//! Word-wise tokenization of log messages.
//!
//! Contract:
//! - Input: a `&str` message and a splitting style (whitespace only, special
//!   separators, or quote-aware).
//! - Output: an iterator of [`Token`]s. Each token borrows the word itself,
//!   the separator run immediately preceding it and the separator run
//!   immediately following it (up to the next word or end of input) from the
//!   source string.
//! - Guarantees: tokens are yielded in order and never overlap; concatenating
//!   every token's `prev_seps` + `word` and the final token's `next_seps`
//!   reconstructs the source string whenever it contains at least one word.

use std::fmt;

/// Separator characters recognized by [`words_with_seps`] in addition to
/// whitespace.
pub const DEFAULT_SPECIAL_SEPARATORS: &str = "=;,'\"()[]{}";

/// A borrowed view of one word plus its surrounding separator runs.
///
/// The default token is the empty word with empty separator runs; the
/// weighted edit distance pads the shorter of two token sequences with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Token<'a> {
    word: &'a str,
    prev_seps: &'a str,
    next_seps: &'a str,
    start: usize,
}

impl<'a> Token<'a> {
    /// The word itself, without any separators.
    pub fn word(&self) -> &'a str {
        self.word
    }

    /// Separator run between the previous word (or start of input) and this
    /// word.
    pub fn prev_seps(&self) -> &'a str {
        self.prev_seps
    }

    /// Separator run between this word and the next word. Empty when the
    /// word ends exactly at the end of input.
    pub fn next_seps(&self) -> &'a str {
        self.next_seps
    }

    /// Byte offset of the word start within the source string.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word)
    }
}

#[derive(Debug, Clone, Copy)]
enum Style<'s> {
    /// Words are maximal runs of non-whitespace characters.
    Whitespace,
    /// Words additionally terminate on any of the given separator characters.
    SpecialSeps(&'s str),
    /// Whitespace rule, except that a word opening with `'` or `"` extends
    /// through the matching close quote (inclusive), or to end of input if
    /// unterminated.
    Quoted,
}

/// Iterator over the words of a string. Construct via [`words`],
/// [`words_with_seps`], [`words_with_custom_seps`] or [`words_quoted`].
#[derive(Debug, Clone)]
pub struct Words<'a> {
    source: &'a str,
    word_start: usize,
    prev_word_end: usize,
    style: Style<'a>,
}

/// Split on whitespace only.
pub fn words(source: &str) -> Words<'_> {
    Words::new(source, Style::Whitespace)
}

/// Split on whitespace and the [`DEFAULT_SPECIAL_SEPARATORS`].
pub fn words_with_seps(source: &str) -> Words<'_> {
    Words::new(source, Style::SpecialSeps(DEFAULT_SPECIAL_SEPARATORS))
}

/// Split on whitespace and a caller-supplied separator set.
pub fn words_with_custom_seps<'a>(source: &'a str, separators: &'a str) -> Words<'a> {
    Words::new(source, Style::SpecialSeps(separators))
}

/// Split on whitespace, keeping `'…'` / `"…"` quoted spans together.
pub fn words_quoted(source: &str) -> Words<'_> {
    Words::new(source, Style::Quoted)
}

/// Number of words under the special-separator rule; the templater keys its
/// length layer on this count.
pub fn count_words_with_seps(source: &str) -> usize {
    words_with_seps(source).count()
}

impl<'a> Words<'a> {
    fn new(source: &'a str, style: Style<'a>) -> Self {
        let mut iter = Words {
            source,
            word_start: 0,
            prev_word_end: 0,
            style,
        };
        iter.word_start = iter.sep_run_end(0);
        iter
    }

    fn is_sep(&self, c: char) -> bool {
        match self.style {
            Style::Whitespace | Style::Quoted => c.is_whitespace(),
            Style::SpecialSeps(seps) => c.is_whitespace() || seps.contains(c),
        }
    }

    /// Byte offset of the first non-separator character at or after `from`.
    fn sep_run_end(&self, from: usize) -> usize {
        self.source[from..]
            .char_indices()
            .find(|&(_, c)| !self.is_sep(c))
            .map(|(i, _)| from + i)
            .unwrap_or(self.source.len())
    }

    /// Length in bytes of the word starting at `start` (which must sit on a
    /// non-separator character).
    fn word_len(&self, start: usize) -> usize {
        let rest = &self.source[start..];
        if let Style::Quoted = self.style {
            let mut chars = rest.chars();
            if let Some(quote @ ('\'' | '"')) = chars.next() {
                let open = quote.len_utf8();
                return match rest[open..].find(quote) {
                    Some(close) => open + close + quote.len_utf8(),
                    None => rest.len(),
                };
            }
        }
        rest.char_indices()
            .find(|&(_, c)| self.is_sep(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len())
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.word_start >= self.source.len() {
            return None;
        }
        let start = self.word_start;
        let end = start + self.word_len(start);
        let next_word = self.sep_run_end(end);
        let token = Token {
            word: &self.source[start..end],
            prev_seps: &self.source[self.prev_word_end..start],
            next_seps: &self.source[end..next_word],
            start,
        };
        self.prev_word_end = end;
        self.word_start = next_word;
        Some(token)
    }
}
