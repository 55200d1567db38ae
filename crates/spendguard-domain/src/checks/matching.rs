//! Destination matching.
//!
//! Case-insensitive substring containment: `OpenAI API` matches the entry `openai`. Both the
//! allow-list and block-list checks go through here, so a stricter matcher only needs to change
//! this module.

use std::collections::BTreeSet;

pub fn destination_matches(destination: &str, entry: &str) -> bool {
    destination
        .to_lowercase()
        .contains(&entry.to_lowercase())
}

/// First entry (in set order) that the destination matches.
pub fn first_match<'a>(destination: &str, entries: &'a BTreeSet<String>) -> Option<&'a str> {
    entries
        .iter()
        .map(String::as_str)
        .find(|entry| destination_matches(destination, entry))
}
