/// Replaces every occurrence of `needle` in `haystack` with `sub`, in place.
///
/// Scanning resumes after each inserted replacement, so a `sub` that
/// contains `needle` is never expanded again. Returns the number of
/// replacements made.
pub fn gsub(haystack: &mut String, needle: &str, sub: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        haystack.replace_range(start..start + needle.len(), sub);
        from = start + sub.len();
        count += 1;
    }

    count
}
