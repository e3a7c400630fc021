//! Turns PubChem's free-text "Uses" section into short use phrases.
//!
//! The rules are literal string rewrites tuned to how PubChem phrases its
//! usage notes. They have no grammar behind them and will misparse prose
//! written some other way.

use crate::types::UsePhrase;

/// Rewrites applied by [`split_uses`], in order. Later entries rely on the
/// earlier ones having run (". " must already be ", " before the
/// "However, " rule can leave an empty fragment behind).
pub const SPLIT_RULES: [(&str, &str); 7] = [
    (", for", "for"),
    (". ", ", "),
    (", and ", ", "),
    ("; ", ", "),
    ("However, ", ", "),
    (", not otherwise listed", ", "),
    (", which", "which"),
];

pub const PHRASE_DELIMITER: &str = ", ";

/// Whether a line reads like a use rather than a heading or a source note.
///
/// Rejects empty lines, lines whose first word is "from", and lines with no
/// word starting in lowercase (title case headings).
pub fn is_use(line: &str) -> bool {
    if line.is_empty() {
        return false;
    }
    let mut words = line.split(' ');
    if words
        .next()
        .is_some_and(|first| first.eq_ignore_ascii_case("from"))
    {
        return false;
    }
    line.split(' ')
        .any(|word| word.chars().next().is_some_and(char::is_lowercase))
}

/// Keeps the lines of a rendered "Uses" block that look like uses and joins
/// them into one comma separated string.
pub fn clean_uses(raw: &str) -> String {
    raw.replace("->", PHRASE_DELIMITER)
        .split('\n')
        .filter(|line| is_use(line))
        .collect::<Vec<_>>()
        .join(PHRASE_DELIMITER)
}

/// Splits cleaned uses text into phrases.
pub fn split_uses(cleaned: &str) -> Vec<UsePhrase> {
    let rewritten = SPLIT_RULES
        .iter()
        .fold(cleaned.to_string(), |text, (from, to)| text.replace(from, to));

    rewritten
        .split(PHRASE_DELIMITER)
        .map(|fragment| fragment.strip_suffix('.').unwrap_or(fragment))
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}
