//! Accent-insensitive text comparison.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Strip diacritical marks: `"Café Crème"` becomes `"Cafe Creme"`.
///
/// Decomposes to NFD and drops the combining marks. Letters without a
/// decomposition (`ß`, `ø`) are left as they are.
pub fn normalize(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Search key for article names and article queries: trimmed, lower-cased,
/// accents removed.
pub fn fold_for_search(text: &str) -> String {
    normalize(&text.trim().to_lowercase())
}
