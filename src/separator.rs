//! Separator detection shared by float and array fields.

/// Returns the first configured separator that occurs in `text`.
///
/// `text` is scanned once, left to right. At each position the separators are tried in
/// configured order, so the earliest occurrence in the text wins and ties at the same
/// position go to the separator listed first. Empty separators are ignored.
pub fn detect_separator<'a, S>(separators: &'a [S], text: &str) -> Option<&'a str>
where
    S: AsRef<str>,
{
    text.char_indices().find_map(|(idx, _)| {
        let rest = &text[idx..];
        separators
            .iter()
            .map(|sep| AsRef::<str>::as_ref(sep))
            .find(|sep| !sep.is_empty() && rest.starts_with(*sep))
    })
}

#[cfg(test)]
mod tests {
    use super::detect_separator;

    #[test]
    fn finds_earliest_separator_in_text() {
        assert_eq!(detect_separator(&[",", ";"], "a;b,c"), Some(";"));
        assert_eq!(detect_separator(&[",", ";"], "a,b;c"), Some(","));
    }

    #[test]
    fn returns_none_when_absent() {
        assert_eq!(detect_separator(&[",", ";"], "a b c"), None);
        assert_eq!(detect_separator(&[","], ""), None);
    }

    #[test]
    fn supports_multi_char_separators() {
        let seps = vec![", ".to_string(), ",".to_string()];
        assert_eq!(detect_separator(&seps, "a, b"), Some(", "));
        assert_eq!(detect_separator(&seps, "a,b"), Some(","));
    }

    #[test]
    fn ignores_empty_separators() {
        assert_eq!(detect_separator(&["", "|"], "a|b"), Some("|"));
    }
}
