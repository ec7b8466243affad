//! Label escaping for writing Newick strings.

/// Characters that force a label into single quotes.
const SPECIAL_CHARS: &[char] = &[',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\''];

/// Escapes a label for safe use in a Newick string.
///
/// Labels containing special characters (punctuation, delimiters) are
/// wrapped in single quotes, with internal single quotes doubled.
/// Otherwise spaces are replaced with underscores.
///
/// Labels reaching this crate are plain taxon names, already unescaped
/// by whatever parser read them, so quotes are always escaped anew.
///
/// # Examples
/// ```
/// # use tipmatch::newick::escape::escape_label;
/// assert_eq!(escape_label("Anolis_carolinensis"), "Anolis_carolinensis");
/// assert_eq!(escape_label("Anolis carolinensis"), "Anolis_carolinensis");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> String {
    if label.contains(SPECIAL_CHARS) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.replace(' ', "_")
    }
}
