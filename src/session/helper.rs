//! Line-editor helper: word completion and history hints.

use std::borrow::Cow;

use crossterm::style::Stylize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::protocol::{all_spellings, Command};

/// Flags accepted by `:`-commands.
pub const FLAG_WORDS: &[&str] = &[
    "--file",
    "--backend",
    "--cmds",
    "--rewrite",
    "--expr",
    "--interaction-id",
    "--where",
    "--compute-mode",
    "--remove",
    "--force",
    "--whether",
];

/// REPL keywords.
pub const KEYWORDS: &[&str] = &["new", "clear"];

pub struct ReplHelper {
    words: Vec<String>,
    hinter: HistoryHinter,
}

impl ReplHelper {
    pub fn new() -> Self {
        let mut words: Vec<String> = Command::NAMES.iter().map(|name| name.to_string()).collect();
        words.extend(all_spellings().into_iter().map(String::from));
        words.extend(FLAG_WORDS.iter().map(|flag| flag.to_string()));
        words.extend(KEYWORDS.iter().map(|word| word.to_string()));
        Self {
            words,
            hinter: HistoryHinter {},
        }
    }

    /// Completion candidates for `prefix`, case-insensitive, sorted.
    pub fn candidates(&self, prefix: &str) -> Vec<String> {
        let needle = prefix.to_lowercase();
        let mut found: Vec<String> = self
            .words
            .iter()
            .cloned()
            .chain(local_files())
            .filter(|word| word.to_lowercase().starts_with(&needle))
            .collect();
        found.sort();
        found.dedup();
        found
    }
}

impl Default for ReplHelper {
    fn default() -> Self {
        Self::new()
    }
}

fn local_files() -> Vec<String> {
    std::fs::read_dir(".")
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .char_indices()
            .rev()
            .find(|&(_, c)| c.is_whitespace() || c == ':' || c == '!')
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let word = &line[start..pos];
        if word.is_empty() {
            return Ok((start, Vec::new()));
        }

        let pairs = self
            .candidates(word)
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ReplHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dark_grey().to_string())
    }
}

impl Validator for ReplHelper {}

impl Helper for ReplHelper {}
