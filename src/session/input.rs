//! REPL input classification: one line, one [`Input`].

/// What a line of user input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank line; re-prompt.
    Empty,
    /// `:`-prefixed protocol command, marker stripped.
    Meta(String),
    /// `!`-prefixed shell command, marker stripped.
    Shell(String),
    /// `clear` or `c`.
    Clear,
    /// `new`: start the scratch buffer over.
    Reset,
    /// Anything else is Agda source for the scratch buffer.
    Source(String),
}

/// Classify one line. Rules are tried in order and the first match wins.
pub fn classify(line: &str) -> Input {
    let line = line.trim();

    if line.is_empty() {
        return Input::Empty;
    }
    if let Some(rest) = line.strip_prefix(':') {
        return Input::Meta(rest.trim().to_string());
    }
    if let Some(rest) = line.strip_prefix('!') {
        return Input::Shell(rest.trim().to_string());
    }

    match line {
        "clear" | "c" => Input::Clear,
        "new" => Input::Reset,
        _ => Input::Source(line.to_string()),
    }
}

/// Split a command line into words. Double quotes group words and are
/// removed; a backslash takes the next character literally.
pub fn split_command_line(line: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    out.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() || quoted {
        out.push(current);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_markers() {
        assert_eq!(classify(":metas"), Input::Meta("metas".into()));
        assert_eq!(classify("!ls -la"), Input::Shell("ls -la".into()));
        assert_eq!(classify("   "), Input::Empty);
    }

    #[test]
    fn classify_keywords_are_exact() {
        assert_eq!(classify("clear"), Input::Clear);
        assert_eq!(classify("c"), Input::Clear);
        assert_eq!(classify("  new "), Input::Reset);
        assert_eq!(classify("newer = 1"), Input::Source("newer = 1".into()));
        assert_eq!(classify("cc"), Input::Source("cc".into()));
    }

    #[test]
    fn markers_win_over_keywords() {
        assert_eq!(classify(":new"), Input::Meta("new".into()));
        assert_eq!(classify("!clear"), Input::Shell("clear".into()));
    }

    #[test]
    fn source_is_trimmed() {
        assert_eq!(
            classify("  id : {A : Set} → A → A  "),
            Input::Source("id : {A : Set} → A → A".into())
        );
    }

    #[test]
    fn split_honours_quotes() {
        assert_eq!(
            split_command_line(r#"compute_toplevel -e "suc zero""#),
            vec!["compute_toplevel", "-e", "suc zero"]
        );
    }

    #[test]
    fn split_keeps_empty_quoted_word() {
        assert_eq!(split_command_line(r#"auto -e """#), vec!["auto", "-e", ""]);
    }

    #[test]
    fn split_escapes() {
        assert_eq!(split_command_line(r#"a\ b \"c"#), vec!["a b", "\"c"]);
    }
}
