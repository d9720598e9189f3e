/// Splits `line` on any run of characters from `separators`, dropping empty fields.
pub fn split_words(line: &str, separators: &str) -> Vec<String> {
    line.split(|c: char| separators.contains(c))
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_separators() {
        assert_eq!(
            split_words("ls\t-la\t\t/tmp\n", "\t\n"),
            vec!["ls", "-la", "/tmp"]
        );
    }

    #[test]
    fn test_spaces_are_not_default_separators() {
        assert_eq!(split_words("echo a b", "\t\n"), vec!["echo a b"]);
    }

    #[test]
    fn test_custom_separators() {
        assert_eq!(
            split_words("  echo   hello  world ", " \t\n"),
            vec!["echo", "hello", "world"]
        );
    }

    #[test]
    fn test_separator_only_line_is_empty() {
        assert!(split_words("", " \t\n").is_empty());
        assert!(split_words(" \t \t", " \t\n").is_empty());
    }

    #[test]
    fn test_no_separators_keeps_line_whole() {
        assert_eq!(split_words("a b\tc", ""), vec!["a b\tc"]);
        assert!(split_words("", "").is_empty());
    }
}
