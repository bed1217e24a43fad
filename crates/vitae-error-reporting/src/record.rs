//! Flat error records for machine consumers.

use serde::{Deserialize, Serialize};
use vitae_source_map::{SourceContext, SourceInfo};

/// One located error: what went wrong, at which field, and where it was
/// written.
///
/// `file`, `line` and `column` are `None` for values that came from a
/// command-line override (or for problems with no position at all); such
/// records display as coming from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub code: String,
    /// Dotted path of the offending field, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_path: Option<String>,
    pub message: String,
    pub file: Option<String>,
    /// 1-based
    pub line: Option<usize>,
    /// 1-based
    pub column: Option<usize>,
}

impl ErrorRecord {
    /// Build a record, resolving `origin` against `ctx`.
    pub fn new(
        code: impl Into<String>,
        field_path: Option<String>,
        message: impl Into<String>,
        origin: Option<&SourceInfo>,
        ctx: &SourceContext,
    ) -> Self {
        let resolved = origin.and_then(|info| ctx.resolve(info));
        ErrorRecord {
            code: code.into(),
            field_path,
            message: message.into(),
            file: resolved.as_ref().map(|r| r.file.clone()),
            line: resolved.as_ref().map(|r| r.line),
            column: resolved.as_ref().map(|r| r.column),
        }
    }

    pub fn is_located(&self) -> bool {
        self.file.is_some()
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.file, self.line, self.column) {
            (Some(file), Some(line), Some(column)) => write!(f, "{}:{}:{}: ", file, line, column)?,
            _ => write!(f, "<command line>: ")?,
        }
        if let Some(path) = &self.field_path {
            write!(f, "{}: ", path)?;
        }
        write!(f, "{} [{}]", self.message, self.code)
    }
}
