/// Split a request line into whitespace-separated tokens.
///
/// Only ASCII whitespace plus vertical tab separates tokens (the C locale
/// `isspace` set). Other Unicode spaces stay inside the token. Empty tokens
/// are never produced.
#[must_use]
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(is_separator)
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_separator(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_whitespace_runs() {
        assert_eq!(tokenize("x   =\t5"), vec!["x", "=", "5"]);
    }

    #[test]
    fn test_strips_line_terminators() {
        assert_eq!(tokenize("a + b\r\n"), vec!["a", "+", "b"]);
        assert_eq!(tokenize("  7\n"), vec!["7"]);
    }

    #[test]
    fn test_empty_and_blank_lines() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t \r\n").is_empty());
    }

    #[test]
    fn test_vertical_tab_separates() {
        assert_eq!(tokenize("1\x0b+\x0b2"), vec!["1", "+", "2"]);
    }

    #[test]
    fn test_unicode_spaces_do_not_separate() {
        assert_eq!(tokenize("x\u{a0}=\u{a0}5"), vec!["x\u{a0}=\u{a0}5"]);
        assert_eq!(tokenize("1\u{2003}+ 2"), vec!["1\u{2003}+", "2"]);
        assert_eq!(tokenize("7\u{85}"), vec!["7\u{85}"]);
    }

    #[test]
    fn test_no_splitting_inside_tokens() {
        assert_eq!(tokenize("x=5"), vec!["x=5"]);
        assert_eq!(tokenize("-3*4"), vec!["-3*4"]);
    }
}
