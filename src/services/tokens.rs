//! Rough token counting for usage reporting.
//!
//! This is not a real tokenizer. Each CJK ideograph, each run of ASCII
//! letters and each run of ASCII digits counts as one token. Every other
//! non-whitespace character counts once per UTF-16 code unit, so emoji and
//! other supplementary-plane symbols count as two. Whitespace counts as nothing.

use once_cell::sync::Lazy;
use regex::Regex;

static CJK_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x{4e00}-\x{9fa5}]").unwrap());
static LATIN_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]+").unwrap());
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());
// Anything that is not an ASCII word char, not whitespace and not a CJK ideograph.
// Whitespace is spelled out: it includes U+FEFF but not U+0085, unlike Unicode `\s`.
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[^A-Za-z0-9_\x{4e00}-\x{9fa5}",
        r"\t\n\x{0b}\x{0c}\r \x{a0}\x{1680}\x{2000}-\x{200a}",
        r"\x{2028}\x{2029}\x{202f}\x{205f}\x{3000}\x{feff}]",
    ))
    .unwrap()
});

pub fn estimate_tokens(text: &str) -> usize {
    CJK_CHAR.find_iter(text).count()
        + LATIN_WORD.find_iter(text).count()
        + DIGIT_RUN.find_iter(text).count()
        + PUNCTUATION
            .find_iter(text)
            .map(|m| m.as_str().chars().map(char::len_utf16).sum::<usize>())
            .sum::<usize>()
}
