//! Builder API for diagnostic messages.

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};
use vitae_source_map::SourceInfo;

/// Builds a [`DiagnosticMessage`] one tidyverse part at a time.
///
/// ```
/// use vitae_error_reporting::DiagnosticMessageBuilder;
///
/// let msg = DiagnosticMessageBuilder::error("Missing required field")
///     .with_code("V-4-1")
///     .problem("`cv.email` is required")
///     .add_hint("Add an `email:` entry under `cv:`?")
///     .build();
///
/// assert_eq!(msg.hints.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Start from the catalog entry for `code`: its title becomes the
    /// message title. Unknown codes fall back to `fallback_title`.
    pub fn from_code(code: &str, fallback_title: &str) -> Self {
        let title = crate::catalog::get_error_info(code)
            .map(|info| info.title.clone())
            .unwrap_or_else(|| fallback_title.to_string());
        Self::error(title).with_code(code)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    pub fn problem(mut self, problem: impl Into<String>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    pub fn with_location(mut self, location: SourceInfo) -> Self {
        self.message.location = Some(location);
        self
    }

    /// Set the location when there is one.
    pub fn with_optional_location(mut self, location: Option<SourceInfo>) -> Self {
        self.message.location = location;
        self
    }

    /// Add a ✖ detail.
    pub fn add_detail(self, content: impl Into<String>) -> Self {
        self.push_detail(DetailKind::Error, content.into(), None)
    }

    /// Add an ℹ detail.
    pub fn add_info(self, content: impl Into<String>) -> Self {
        self.push_detail(DetailKind::Info, content.into(), None)
    }

    /// Add an ℹ detail pointing at its own location.
    pub fn add_info_at(self, content: impl Into<String>, location: SourceInfo) -> Self {
        self.push_detail(DetailKind::Info, content.into(), Some(location))
    }

    /// Add a • detail.
    pub fn add_note(self, content: impl Into<String>) -> Self {
        self.push_detail(DetailKind::Note, content.into(), None)
    }

    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }

    fn push_detail(mut self, kind: DetailKind, content: String, location: Option<SourceInfo>) -> Self {
        self.message.details.push(DetailItem {
            kind,
            content,
            location,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_kinds_in_order() {
        let msg = DiagnosticMessageBuilder::error("x")
            .add_detail("a")
            .add_info("b")
            .add_note("c")
            .build();
        let kinds: Vec<DetailKind> = msg.details.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DetailKind::Error, DetailKind::Info, DetailKind::Note]);
    }

    #[test]
    fn test_from_code_uses_catalog_title() {
        let msg = DiagnosticMessageBuilder::from_code("V-4-1", "fallback").build();
        assert_eq!(msg.title, "Missing Required Field");
        assert_eq!(msg.code.as_deref(), Some("V-4-1"));

        let msg = DiagnosticMessageBuilder::from_code("V-99-99", "fallback").build();
        assert_eq!(msg.title, "fallback");
    }

    #[test]
    fn test_warning_kind() {
        let msg = DiagnosticMessageBuilder::warning("careful").build();
        assert_eq!(msg.kind, DiagnosticKind::Warning);
    }
}
