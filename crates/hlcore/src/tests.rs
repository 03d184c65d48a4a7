#[cfg(test)]
mod unit_tests {
    use super::super::*;

    #[test]
    fn test_keywords_are_tagged() {
        let decorated = decorate_line("if x return y", false);
        assert!(decorated.contains("\x1b[35mif\x1b[0m"));
        assert!(decorated.contains("\x1b[35mreturn\x1b[0m"));
    }

    #[test]
    fn test_keyword_must_match_whole_word() {
        let decorated = decorate_line("iffy classic", false);
        assert!(!decorated.contains("\x1b[35m"));
    }

    #[test]
    fn test_string_literals_are_tagged() {
        let decorated = decorate_line(r#"x = "hello" + 'c'"#, false);
        assert!(decorated.contains("\x1b[32m\"hello\"\x1b[0m"));
        assert!(decorated.contains("\x1b[32m'c'\x1b[0m"));
    }

    #[test]
    fn test_comments_are_tagged() {
        let decorated = decorate_line("x = 1 // counter", false);
        assert!(decorated.contains("\x1b[30;1m// counter\x1b[0m"));

        let decorated = decorate_line("# a python comment", false);
        assert!(decorated.contains("\x1b[30;1m"));
    }

    #[test]
    fn test_suspect_marker_on_trailing_whitespace() {
        let decorated = decorate_line("x = 1;   ", true);
        assert!(decorated.contains("\x1b[41m"));
    }

    #[test]
    fn test_suspect_marker_on_doubled_semicolon() {
        let decorated = decorate_line("x = 1; ;", true);
        assert!(decorated.contains("\x1b[41m"));
    }

    #[test]
    fn test_suspect_marker_disabled() {
        let decorated = decorate_line("x = 1;   ", false);
        assert!(!decorated.contains("\x1b[41m"));
    }

    #[test]
    fn test_plain_line_passes_through() {
        assert_eq!(decorate_line("hello world", false), "hello world");
        assert_eq!(decorate_line("", false), "");
        assert_eq!(decorate_line("", true), "");
    }

    #[test]
    fn test_decoration_preserves_text() {
        let line = r#"fn main() { print("ok") } // entry"#;
        let decorated = decorate_line(line, false);
        let mut stripped = String::new();
        let mut rest = decorated.as_str();
        while let Some(start) = rest.find('\x1b') {
            stripped.push_str(&rest[..start]);
            let tail = &rest[start..];
            match tail.find('m') {
                Some(end) => rest = &tail[end + 1..],
                None => break,
            }
        }
        stripped.push_str(rest);
        assert_eq!(stripped, line);
    }
}
