//! Markdown preprocessing ahead of pandoc
//!
//! Plain text substitution only; nothing here parses Markdown.

/// Symbol that replaces a checked task-list box
pub const CHECKED_SYMBOL: &str = "✓";

/// Symbol that replaces an unchecked task-list box
pub const UNCHECKED_SYMBOL: &str = "☐";

/// Front matter prepended to every document. Pandoc reads `dir` and `lang`
/// for paragraph direction and `mainfont` for the default run font.
pub const RTL_FRONT_MATTER: &str = "---\ndir: rtl\nlang: he\nmainfont: David\n---\n\n";

/// Checkbox markers and their replacements, applied in this order
pub const CHECKBOX_REPLACEMENTS: [(&str, &str); 6] = [
    ("- [x] ", "- ✓ "),
    ("- [X] ", "- ✓ "),
    ("- [ ] ", "- ☐ "),
    ("* [x] ", "* ✓ "),
    ("* [X] ", "* ✓ "),
    ("* [ ] ", "* ☐ "),
];

/// Replace task-list checkboxes with symbols Word renders reliably
pub fn replace_checkboxes(markdown: &str) -> String {
    CHECKBOX_REPLACEMENTS
        .iter()
        .fold(markdown.to_string(), |text, (marker, symbol)| {
            text.replace(marker, symbol)
        })
}

/// Full preprocessing pass: checkbox substitution, then RTL front matter.
///
/// Existing front matter in the input is left alone; the RTL block is always
/// prepended and pandoc decides precedence.
pub fn preprocess(markdown: &str) -> String {
    let body = replace_checkboxes(markdown);
    let mut out = String::with_capacity(RTL_FRONT_MATTER.len() + body.len());
    out.push_str(RTL_FRONT_MATTER);
    out.push_str(&body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_front_matter_prefix() {
        let out = preprocess("# כותרת\n");
        assert!(out.starts_with(RTL_FRONT_MATTER));
        assert_eq!(out, "---\ndir: rtl\nlang: he\nmainfont: David\n---\n\n# כותרת\n");
    }

    #[test]
    fn test_empty_input_is_front_matter_only() {
        assert_eq!(preprocess(""), RTL_FRONT_MATTER);
    }

    #[test]
    fn test_dash_checkboxes() {
        let input = "- [x] done\n- [X] also done\n- [ ] todo\n";
        assert_eq!(
            replace_checkboxes(input),
            "- ✓ done\n- ✓ also done\n- ☐ todo\n"
        );
    }

    #[test]
    fn test_star_checkboxes() {
        let input = "* [x] done\n* [X] also done\n* [ ] todo\n";
        assert_eq!(
            replace_checkboxes(input),
            "* ✓ done\n* ✓ also done\n* ☐ todo\n"
        );
    }

    #[test]
    fn test_nested_and_repeated_markers() {
        let input = "- [ ] a\n  - [x] b\n  - [ ] c\n- [ ] d\n";
        let out = replace_checkboxes(input);
        assert_eq!(out, "- ☐ a\n  - ✓ b\n  - ☐ c\n- ☐ d\n");
    }

    #[test]
    fn test_marker_without_trailing_space_untouched() {
        let input = "- [x]\n- [ ]done\n+ [x] plus\n";
        assert_eq!(replace_checkboxes(input), input);
    }

    #[test]
    fn test_existing_front_matter_not_merged() {
        let input = "---\ntitle: דוח\n---\n\nגוף\n";
        let out = preprocess(input);
        assert_eq!(out, format!("{}{}", RTL_FRONT_MATTER, input));
    }

    fn plain_text() -> impl Strategy<Value = String> {
        // No brackets means no checkbox markers can appear
        "[a-zA-Z0-9 א-ת\\n#*_.,-]{0,200}"
    }

    proptest! {
        #[test]
        fn prop_plain_text_is_untouched(text in plain_text()) {
            let out = preprocess(&text);
            prop_assert!(out.starts_with(RTL_FRONT_MATTER));
            prop_assert_eq!(&out[RTL_FRONT_MATTER.len()..], text.as_str());
        }

        #[test]
        fn prop_checkbox_counts_preserved(
            checked in 0usize..8,
            upper in 0usize..8,
            unchecked in 0usize..8,
            bullet in prop_oneof![Just("-"), Just("*")],
        ) {
            let mut input = String::new();
            for i in 0..checked {
                input.push_str(&format!("{} [x] item {}\n", bullet, i));
            }
            for i in 0..upper {
                input.push_str(&format!("{} [X] item {}\n", bullet, i));
            }
            for i in 0..unchecked {
                input.push_str(&format!("{} [ ] item {}\n", bullet, i));
            }

            let out = preprocess(&input);
            let body = &out[RTL_FRONT_MATTER.len()..];

            prop_assert!(!body.contains("[x] "));
            prop_assert!(!body.contains("[X] "));
            prop_assert!(!body.contains("[ ] "));
            prop_assert_eq!(body.matches(CHECKED_SYMBOL).count(), checked + upper);
            prop_assert_eq!(body.matches(UNCHECKED_SYMBOL).count(), unchecked);
        }
    }
}
