//! Line tokenizer with merged name/number recovery.
//!
//! ## Why the fix-up?
//!
//! PDF text extraction occasionally glues two adjacent columns together when
//! the kerning gap between them is narrow — typically a surname and the
//! birth-year column, producing a single token like `Smith1990`. That is the
//! one extraction failure mode this tool recovers from: any token that is
//! exactly a run of letters followed by a run of digits is split back into
//! two tokens. Everything else passes through untouched, so the pass is
//! idempotent and never shrinks the token count.

use once_cell::sync::Lazy;
use regex::Regex;

/// A letter run (incl. accented Latin-1 letters) immediately followed by a
/// digit run, and nothing else.
static RE_MERGED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-zÀ-ÿ]+)(\d+)$").unwrap());

/// Split a raw line into whitespace-delimited tokens, un-merging any token
/// where a name and a trailing number were concatenated without a space.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for raw in line.split_whitespace() {
        match RE_MERGED.captures(raw) {
            Some(caps) => {
                tokens.push(caps[1].to_string());
                tokens.push(caps[2].to_string());
            }
            None => tokens.push(raw.to_string()),
        }
    }
    tokens
}

/// Plain whitespace token count, without the merged-token fix-up.
///
/// The continuation-line test deliberately uses the raw count: a wrapped name
/// fragment is judged by what is physically on the line.
pub fn raw_token_count(line: &str) -> usize {
    line.split_whitespace().count()
}
