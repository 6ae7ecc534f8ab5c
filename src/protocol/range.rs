//! Source ranges and their `intervalsToRange` encoding.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::protocol::error::EncodingError;

/// Literal sent when a command is not scoped to a source span.
pub const NO_RANGE: &str = "noRange";

/// A location in a source file.
///
/// The three coordinates are independent: `offset` is the raw character
/// offset and is never recomputed from `line`/`column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(Pn () {} {} {} )", self.line, self.column, self.offset)
    }
}

impl FromStr for Position {
    type Err = String;

    /// Parses `LINE:COLUMN:OFFSET`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let [line, column, offset] = parts.as_slice() else {
            return Err(format!("position '{}' is not LINE:COLUMN:OFFSET", s.trim()));
        };
        let number = |field: &str, raw: &str| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_| format!("{field} '{}' is not a non-negative integer", raw.trim()))
        };
        Ok(Self::new(
            number("line", line)?,
            number("column", column)?,
            number("offset", offset)?,
        ))
    }
}

/// A `(start, end)` pair. Ordering of the endpoints is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interval {
    pub start: Position,
    pub end: Position,
}

impl Interval {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interval  {} {} ", self.start, self.end)
    }
}

impl FromStr for Interval {
    type Err = String;

    /// Parses `L:C:O-L:C:O`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("interval '{}' is not START-END", s.trim()))?;
        Ok(Self::new(start.parse()?, end.parse()?))
    }
}

/// Source span a goal command is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Range {
    #[default]
    NoRange,
    Span {
        file: Option<PathBuf>,
        intervals: Vec<Interval>,
    },
}

impl Range {
    pub fn new(file: Option<PathBuf>, intervals: Vec<Interval>) -> Self {
        Range::Span { file, intervals }
    }

    /// Single-interval range in `file`.
    pub fn single(file: impl Into<PathBuf>, start: Position, end: Position) -> Self {
        Range::new(Some(file.into()), vec![Interval::new(start, end)])
    }

    /// Parses comma-separated `L:C:O-L:C:O` intervals. Blank input and the
    /// literal `noRange` yield [`Range::NoRange`].
    pub fn parse(file: Option<PathBuf>, input: &str) -> Result<Self, EncodingError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == NO_RANGE {
            return Ok(Range::NoRange);
        }

        let intervals = trimmed
            .split(',')
            .map(str::parse::<Interval>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| EncodingError::MalformedRange {
                input: trimmed.to_string(),
                reason,
            })?;

        Ok(Range::new(file, intervals))
    }

    /// True when this encodes to [`NO_RANGE`].
    pub fn is_empty(&self) -> bool {
        match self {
            Range::NoRange => true,
            Range::Span { intervals, .. } => intervals.is_empty(),
        }
    }

    /// Protocol form of the range.
    pub fn encode(&self) -> String {
        match self {
            Range::Span { file, intervals } if !intervals.is_empty() => {
                let source = match file {
                    Some(path) => format!("(Just (mkAbsolute {}))", quote(&path.display().to_string())),
                    None => "Nothing".to_string(),
                };
                let clauses: String = intervals.iter().map(Interval::to_string).collect();
                format!("(intervalsToRange {source} [{clauses}])")
            }
            _ => NO_RANGE.to_string(),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Haskell string literal, escaped the way `show` does for ASCII.
///
/// Control characters never reach the wire raw, so an envelope always
/// stays on one line. Non-ASCII text is passed through unchanged.
pub(crate) fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_ascii_control() => {
                out.push_str(&format!("\\{}", u32::from(c)));
                // `\&` ends a numeric escape that a digit follows.
                if chars.peek().is_some_and(char::is_ascii_digit) {
                    out.push_str("\\&");
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
