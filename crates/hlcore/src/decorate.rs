use lazy_static::lazy_static;
use regex::Regex;

// SGR fragments for each pattern class.
const KEYWORD_ON: &str = "\x1b[35m";
const STRING_ON: &str = "\x1b[32m";
const COMMENT_ON: &str = "\x1b[30;1m";
const SUSPECT_ON: &str = "\x1b[41m";
const OFF: &str = "\x1b[0m";

lazy_static! {
    // One keyword union covering the common identifiers of 50+ languages
    // (C-family, Python, Ruby, Go, Rust, JS/TS, SQL, Lua, ...).
    static ref KEYWORDS: Regex = Regex::new(
        r"\b(if|else|while|for|return|int|char|float|double|bool|def|class|end|do|include|import|std|public|private|static|yield|module|puts|print|func|fn|let|var|const|async|await|try|catch|throw|namespace|using|package|extern|void|struct|enum|union|interface|type|nil|null|true|false|self|this|super|break|continue|default|case|switch|goto)\b"
    )
    .expect("Invalid KEYWORDS regex pattern");
    static ref STRINGS: Regex = Regex::new(r#""[^"]*"|'[^']*'"#)
        .expect("Invalid STRINGS regex pattern");
    static ref COMMENTS: Regex = Regex::new(r"#.*|//.*|/\*.*\*/|--.*")
        .expect("Invalid COMMENTS regex pattern");
    // Trailing whitespace and doubled semicolons. A visual hint only; there
    // is no parser behind this.
    static ref SUSPECT: Regex = Regex::new(r"\s+$|;\s+;")
        .expect("Invalid SUSPECT regex pattern");
}

/// Decorate one line of text with SGR color sequences: keywords, string
/// literals and comments, plus an optional red marker over trailing
/// whitespace and doubled semicolons when `mark_suspect` is set.
///
/// Pure and total: any input line produces a decorated line, and the
/// undecorated text is preserved character for character.
pub fn decorate_line(line: &str, mark_suspect: bool) -> String {
    let decorated = KEYWORDS
        .replace_all(line, format!("{}$1{}", KEYWORD_ON, OFF).as_str())
        .into_owned();
    let decorated = STRINGS
        .replace_all(&decorated, format!("{}$0{}", STRING_ON, OFF).as_str())
        .into_owned();
    let mut decorated = COMMENTS
        .replace_all(&decorated, format!("{}$0{}", COMMENT_ON, OFF).as_str())
        .into_owned();
    if mark_suspect {
        decorated = SUSPECT
            .replace_all(&decorated, format!("{}$0{}", SUSPECT_ON, OFF).as_str())
            .into_owned();
    }
    decorated
}
