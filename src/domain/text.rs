//! Small string and list helpers shared across the domain

use std::collections::HashSet;
use std::hash::Hash;

/// Hides the tail of a value for display.
///
/// Values of one or two characters are returned as is. Otherwise the
/// characters after position `len / 2 + 1` form the tail, and every
/// occurrence of that tail is replaced by `len / 2 + 1` asterisks.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();

    if len <= 2 {
        return value.to_string();
    }

    let head = len / 2 + 1;
    let tail: String = chars[head..].iter().collect();

    value.replace(&tail, &"*".repeat(head))
}

/// Keys extracted from `items`, first occurrence wins, input order kept
pub fn unique_keys<T, K, F>(items: &[T], extractor: F) -> Vec<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for item in items {
        let key = extractor(item);
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }

    keys
}

/// Removes duplicate strings, keeping the first occurrence of each
pub fn dedup<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    unique_keys(values, |v| AsRef::<str>::as_ref(v).to_string())
}
