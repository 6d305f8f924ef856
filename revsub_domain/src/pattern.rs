//! # Pattern Builder
//!
//! Builds the anchored alternation pattern a stage matches with, from a set
//! of keys (the `from`s for the forward pattern, the `to`s for the backward
//! pattern). Sorting by descending length before building the alternation is
//! what gives the regex engine leftmost-*longest* semantics over an
//! alternation, which is otherwise only leftmost-first (spec.md §4.3,
//! testable property 4).

/// Characters with special meaning in a regex pattern; any occurrence in a
/// key must be backslash-escaped before it is spliced into an alternation.
const SPECIAL: &[u8] = b".^$*+?()[{\\|";

/// Escapes regex metacharacters in a single key.
pub fn escape_literal(key: &[u8]) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for &byte in key {
        if SPECIAL.contains(&byte) {
            out.push('\\');
        }
        // fancy-regex patterns are &str; keys may contain arbitrary bytes, so
        // route them through the same \xHH escaping the config format uses.
        if byte.is_ascii_graphic() || byte == b' ' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("\\x{{{byte:02x}}}"));
        }
    }
    out
}

/// Builds a `(key1|key2|...)` alternation from `keys`, longest first, so that
/// when one key is a prefix of another the engine prefers the longer match.
/// Ties (equal length) keep their original relative order.
pub fn build_alternation<'a, I: IntoIterator<Item = &'a Vec<u8>>>(keys: I) -> String {
    let mut indexed: Vec<(usize, &Vec<u8>)> = keys.into_iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| b.len().cmp(&a.len()).then_with(|| ia.cmp(ib)));
    indexed
        .into_iter()
        .map(|(_, key)| escape_literal(key))
        .collect::<Vec<_>>()
        .join("|")
}

/// Builds the full stage pattern: `(?<=LB)(ALT)(?=LA)`. Empty anchors are
/// valid regex fragments (an empty lookaround matches everywhere) so no
/// special-casing is needed for the no-op case.
pub fn build_stage_pattern(lookbehind: &str, lookahead: &str, alternation: &str) -> String {
    format!("(?<={lookbehind})({alternation})(?={lookahead})")
}
