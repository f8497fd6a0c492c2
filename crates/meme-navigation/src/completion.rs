//! Bookmark completion for the address bar

/// Whether a bookmark entry should be offered for the typed key.
///
/// Command (`!`) and find (`/`) input never completes, nor does an empty key.
pub fn matches_completion(entry: &str, key: &str) -> bool {
    match key.chars().next() {
        None | Some('!') | Some('/') => false,
        Some(_) => entry.contains(key),
    }
}

/// Entries matching `key`, in the order given.
pub fn complete<'a, I>(entries: I, key: &str) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    entries
        .into_iter()
        .map(String::as_str)
        .filter(|entry| matches_completion(entry, key))
        .collect()
}
