//! Field paths and the `dotted.path[index]=value` override syntax.
//!
//! A path is a chain of mapping keys and sequence indices:
//! `cv.sections.experience[0].company`. Inside a key, `\.`, `\[`, `\]`, `\=`
//! and `\\` stand for the literal character, so a key that itself contains
//! a dot is written `font\.size`.

use std::fmt;
use thiserror::Error;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", escape_key(key)),
            Segment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Location of a field inside a document, e.g. `cv.sections.education[0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parse a path written in override syntax (without the `=value` part).
    pub fn parse(text: &str) -> Result<Self, PathError> {
        parse_segments(text, text).map(Self::from_segments)
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(Segment::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// A copy of this path extended by `key`.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push_key(key);
        path
    }

    /// A copy of this path extended by `index`.
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.push_index(index);
        path
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// The keys of this path, when it contains no indices.
    pub fn keys(&self) -> Option<Vec<&str>> {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Key(k) => Some(k.as_str()),
                Segment::Index(_) => None,
            })
            .collect()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, Segment::Key(_)) {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Escape the characters that have meaning in path syntax.
pub fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if matches!(c, '.' | '[' | ']' | '=' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// A parsed `path=value` command-line override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub path: FieldPath,
    /// Everything after the first unescaped `=`, untouched
    pub raw_value: String,
    /// The override as the user wrote it
    pub text: String,
}

impl Override {
    /// Parse `path=value`, splitting at the first unescaped `=`.
    ///
    /// ```
    /// use vitae_config::{Override, Segment};
    ///
    /// let o = Override::parse("cv.sections.experience[0].company=ACME = Co").unwrap();
    /// assert_eq!(o.path.segments()[3], Segment::Index(0));
    /// assert_eq!(o.raw_value, "ACME = Co");
    /// ```
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let split = find_unescaped_equals(text).ok_or_else(|| PathError::Syntax {
            input: text.to_string(),
            column: text.chars().count() + 1,
            reason: SyntaxError::MissingEquals,
        })?;

        let (path_text, rest) = text.split_at(split);
        let segments = parse_segments(path_text, text)?;

        Ok(Override {
            path: FieldPath::from_segments(segments),
            raw_value: rest[1..].to_string(),
            text: text.to_string(),
        })
    }
}

impl std::str::FromStr for Override {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Override::parse(s)
    }
}

/// What is wrong with an override's syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("expected '=' followed by a value")]
    MissingEquals,
    #[error("empty path segment")]
    EmptySegment,
    #[error("'[' is never closed")]
    UnclosedBracket,
    #[error("']' without a matching '['")]
    UnmatchedBracket,
    #[error("index must be a non-negative integer")]
    InvalidIndex,
    #[error("expected '.' or '[' after an index")]
    ExpectedSeparator,
    #[error("trailing '\\' escapes nothing")]
    TrailingBackslash,
    #[error("unknown escape '\\{0}'")]
    UnknownEscape(char),
}

/// Errors from parsing or applying overrides. All are fatal for the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("invalid override '{input}' at column {column}: {reason}")]
    Syntax {
        input: String,
        /// 1-based character column in `input`
        column: usize,
        reason: SyntaxError,
    },

    #[error("index {index} is out of range for '{path}' (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("'{path}' is a {found}, not a {expected}")]
    NotAContainer {
        path: String,
        found: &'static str,
        expected: &'static str,
    },

    #[error("override '{input}' is ambiguous: the document has a key named '{key}' (write '{escaped}' to address it)")]
    Ambiguous {
        input: String,
        key: String,
        escaped: String,
    },
}

impl PathError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PathError::Syntax { .. } => "V-2-3",
            PathError::IndexOutOfRange { .. } => "V-2-4",
            PathError::NotAContainer { .. } => "V-2-5",
            PathError::Ambiguous { .. } => "V-2-6",
        }
    }
}

fn find_unescaped_equals(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' => return Some(idx),
            _ => {}
        }
    }
    None
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Dot,
    Key,
    Index,
}

/// Parse the path part of an override. `input` is the full text, for errors.
fn parse_segments(path: &str, input: &str) -> Result<Vec<Segment>, PathError> {
    let syntax = |column: usize, reason: SyntaxError| PathError::Syntax {
        input: input.to_string(),
        column,
        reason,
    };

    let chars: Vec<char> = path.chars().collect();
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut prev = Prev::Start;
    let mut i = 0;

    while i < chars.len() {
        let column = i + 1;
        match chars[i] {
            '.' => {
                match prev {
                    Prev::Key => segments.push(Segment::Key(std::mem::take(&mut current))),
                    Prev::Index => {}
                    Prev::Start | Prev::Dot => return Err(syntax(column, SyntaxError::EmptySegment)),
                }
                prev = Prev::Dot;
                i += 1;
            }
            '[' => {
                match prev {
                    Prev::Key => segments.push(Segment::Key(std::mem::take(&mut current))),
                    Prev::Dot => return Err(syntax(column, SyntaxError::EmptySegment)),
                    Prev::Start | Prev::Index => {}
                }
                let close = chars[i + 1..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|offset| i + 1 + offset)
                    .ok_or_else(|| syntax(column, SyntaxError::UnclosedBracket))?;

                let digits: String = chars[i + 1..close].iter().collect();
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(syntax(column + 1, SyntaxError::InvalidIndex));
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| syntax(column + 1, SyntaxError::InvalidIndex))?;

                segments.push(Segment::Index(index));
                prev = Prev::Index;
                i = close + 1;
            }
            ']' => return Err(syntax(column, SyntaxError::UnmatchedBracket)),
            c => {
                if prev == Prev::Index {
                    return Err(syntax(column, SyntaxError::ExpectedSeparator));
                }
                if c == '\\' {
                    let Some(&next) = chars.get(i + 1) else {
                        return Err(syntax(column, SyntaxError::TrailingBackslash));
                    };
                    if !matches!(next, '.' | '[' | ']' | '=' | '\\') {
                        return Err(syntax(column, SyntaxError::UnknownEscape(next)));
                    }
                    current.push(next);
                    i += 2;
                } else {
                    current.push(c);
                    i += 1;
                }
                prev = Prev::Key;
            }
        }
    }

    match prev {
        Prev::Key => segments.push(Segment::Key(current)),
        Prev::Index => {}
        Prev::Start | Prev::Dot => {
            return Err(syntax(chars.len() + 1, SyntaxError::EmptySegment));
        }
    }
    Ok(segments)
}
