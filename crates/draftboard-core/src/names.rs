// Free-text name list parsing, shared by player and coach input.

use std::collections::HashSet;

/// Characters that separate names in pasted input.
const DELIMITERS: &[char] = &['\n', ',', ';', '|', '\t'];

/// Parse raw text into an ordered list of unique, trimmed, non-empty names.
///
/// Names are separated by any run of newlines, commas, semicolons, pipes or
/// tabs. Duplicates keep their first occurrence. Missing input is just the
/// empty string and yields an empty list.
pub fn parse_names(input: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut names = Vec::new();

    for token in input.split(DELIMITERS) {
        let name = token.trim();
        if name.is_empty() || !seen.insert(name) {
            continue;
        }
        names.push(name.to_string());
    }

    names
}
