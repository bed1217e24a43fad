//! Core diagnostic message types.
//!
//! Messages follow the tidyverse structure: a title, an optional problem
//! statement, bulleted details and hints.

use serde::{Deserialize, Serialize};
use vitae_source_map::{SourceContext, SourceInfo};

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A problem that does not stop the run
    Warning,
    Info,
    Note,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
            DiagnosticKind::Note => "Note",
        }
    }
}

/// How detail items are presented (tidyverse x/i bullet style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// ✖ bullet
    Error,
    /// ℹ bullet
    Info,
    /// • bullet
    Note,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
            DetailKind::Note => "•",
        }
    }
}

/// A detail bullet, optionally pointing at its own source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

/// Options for [`DiagnosticMessage::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI colors in source snippets
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { color: true }
    }
}

/// A diagnostic message following tidyverse-style structure.
///
/// 1. **Code**: error code from the catalog (e.g. "V-4-1")
/// 2. **Title**: brief error message
/// 3. **Problem**: what went wrong
/// 4. **Details**: specific information, bulleted
/// 5. **Hints**: guidance for fixing, ending with `?`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub title: String,

    pub kind: DiagnosticKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailItem>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,

    /// Where the problem is. `None` for problems with no position in any
    /// file, such as a bad command-line override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

impl DiagnosticMessage {
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Set the error code.
    ///
    /// ```
    /// use vitae_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::error("YAML syntax error").with_code("V-1-1");
    /// assert_eq!(msg.code.as_deref(), Some("V-1-1"));
    /// ```
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Catalog title for this message's code.
    pub fn catalog_title(&self) -> Option<&'static str> {
        self.code
            .as_deref()
            .and_then(crate::catalog::get_error_info)
            .map(|info| info.title.as_str())
    }

    /// Render with colors. See [`DiagnosticMessage::render`].
    pub fn to_text(&self, ctx: Option<&SourceContext>) -> String {
        self.render(ctx, RenderOptions::default())
    }

    /// Render this message as text.
    ///
    /// When the location's file content is available in `ctx`, the output
    /// starts with an ariadne source snippet carrying the title, code and
    /// problem; only unlocated details and hints follow it. Otherwise the
    /// whole message is written in tidyverse style:
    ///
    /// ```text
    /// Error [V-4-1]: title
    /// Problem statement here
    /// ✖ Error detail
    /// ℹ Info detail
    /// • Note detail
    /// ? Hint
    /// ```
    pub fn render(&self, ctx: Option<&SourceContext>, options: RenderOptions) -> String {
        let snippet = match (&self.location, ctx) {
            (Some(location), Some(ctx)) => self.render_source_snippet(location, ctx, options),
            _ => None,
        };

        let mut lines = Vec::new();
        match snippet {
            Some(snippet) => {
                lines.push(snippet.trim_end().to_string());
                for detail in self.details.iter().filter(|d| d.location.is_none()) {
                    lines.push(format!("{} {}", detail.kind.bullet(), detail.content));
                }
            }
            None => {
                let header = match &self.code {
                    Some(code) => format!("{} [{}]: {}", self.kind.label(), code, self.title),
                    None => format!("{}: {}", self.kind.label(), self.title),
                };
                lines.push(header);
                if let Some(problem) = &self.problem {
                    lines.push(problem.clone());
                }
                if let Some(location) = &self.location {
                    lines.push(format!("at {}", describe_location(location, ctx)));
                }
                for detail in &self.details {
                    lines.push(format!("{} {}", detail.kind.bullet(), detail.content));
                }
            }
        }
        for hint in &self.hints {
            lines.push(format!("? {}", hint));
        }
        lines.join("\n")
    }

    /// Render this message as a JSON value.
    ///
    /// ```
    /// use vitae_error_reporting::DiagnosticMessage;
    ///
    /// let json = DiagnosticMessage::error("Something went wrong").to_json();
    /// assert_eq!(json["kind"], "error");
    /// assert_eq!(json["title"], "Something went wrong");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    fn render_source_snippet(
        &self,
        location: &SourceInfo,
        ctx: &SourceContext,
        options: RenderOptions,
    ) -> Option<String> {
        use ariadne::{Color, Config, Label, Report, ReportKind, Source};

        let file = ctx.get_file(location.file_id)?;
        let content = ctx.content(location.file_id)?;
        let path = file.path.clone();
        let total = content.chars().count();

        let (report_kind, main_color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
            DiagnosticKind::Info => (ReportKind::Advice, Color::Cyan),
            DiagnosticKind::Note => (ReportKind::Advice, Color::Blue),
        };

        let main_span = label_span(location, total);
        let mut report = Report::build(report_kind, path.clone(), main_span.start)
            .with_config(Config::default().with_color(options.color));

        report = match &self.code {
            Some(code) => report.with_message(format!("[{}] {}", code, self.title)),
            None => report.with_message(&self.title),
        };

        let main_message = self.problem.as_deref().unwrap_or(&self.title);
        report = report.with_label(
            Label::new((path.clone(), main_span))
                .with_message(main_message)
                .with_color(main_color),
        );

        for detail in &self.details {
            let Some(detail_loc) = &detail.location else {
                continue;
            };
            if detail_loc.file_id != location.file_id {
                continue;
            }
            let color = match detail.kind {
                DetailKind::Error => Color::Red,
                DetailKind::Info => Color::Cyan,
                DetailKind::Note => Color::Blue,
            };
            report = report.with_label(
                Label::new((path.clone(), label_span(detail_loc, total)))
                    .with_message(&detail.content)
                    .with_color(color),
            );
        }

        let mut output = Vec::new();
        report
            .finish()
            .write((path, Source::from(content.as_str())), &mut output)
            .ok()?;
        String::from_utf8(output).ok()
    }
}

/// Character span for a label: never empty and never past the end.
fn label_span(location: &SourceInfo, total_chars: usize) -> std::ops::Range<usize> {
    let start = location.start_offset().min(total_chars);
    let end = location.end_offset().clamp(start, total_chars);
    if end > start {
        start..end
    } else {
        start..start + 1
    }
}

fn describe_location(location: &SourceInfo, ctx: Option<&SourceContext>) -> String {
    match ctx.and_then(|ctx| ctx.resolve(location)) {
        Some(resolved) => resolved.to_string(),
        None => format!(
            "{}:{}",
            location.range.start.row + 1,
            location.range.start.column + 1
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DiagnosticMessageBuilder;
    use vitae_source_map::{FileId, Location, Range};

    fn plain() -> RenderOptions {
        RenderOptions { color: false }
    }

    #[test]
    fn test_diagnostic_message_new() {
        let msg = DiagnosticMessage::new(DiagnosticKind::Error, "Test error");
        assert_eq!(msg.title, "Test error");
        assert_eq!(msg.kind, DiagnosticKind::Error);
        assert!(msg.code.is_none());
        assert!(msg.problem.is_none());
        assert!(msg.details.is_empty());
        assert!(msg.hints.is_empty());
    }

    #[test]
    fn test_to_text_simple_error() {
        let msg = DiagnosticMessage::error("Something went wrong");
        assert_eq!(msg.to_text(None), "Error: Something went wrong");
    }

    #[test]
    fn test_to_text_with_code() {
        let msg = DiagnosticMessage::error("Something went wrong").with_code("V-1-1");
        assert_eq!(msg.to_text(None), "Error [V-1-1]: Something went wrong");
    }

    #[test]
    fn test_to_text_full_message() {
        let msg = DiagnosticMessageBuilder::error("Invalid override")
            .with_code("V-2-3")
            .problem("Override paths must not contain empty segments")
            .add_detail("Found '..' at column 3")
            .add_info("Overrides look like `cv.name=Ada`")
            .add_hint("Did you mean `cv.name`?")
            .build();

        insta::assert_snapshot!(msg.render(None, plain()), @r"
        Error [V-2-3]: Invalid override
        Override paths must not contain empty segments
        ✖ Found '..' at column 3
        ℹ Overrides look like `cv.name=Ada`
        ? Did you mean `cv.name`?
        ");
    }

    #[test]
    fn test_location_without_context() {
        let location = SourceInfo::original(
            FileId(0),
            Range::new(Location::new(100, 10, 5), Location::new(110, 10, 15)),
        );
        let msg = DiagnosticMessageBuilder::error("Invalid value")
            .with_location(location)
            .build();

        let text = msg.to_text(None);
        assert!(text.contains("Invalid value"));
        assert!(text.contains("at 11:6"));
    }

    #[test]
    fn test_location_with_context() {
        let mut ctx = SourceContext::new();
        let file_id = ctx.add_file(
            "cv.yaml".to_string(),
            Some("cv:\n  email: nope\n".to_string()),
        );
        let location = SourceInfo::original(
            file_id,
            Range::new(Location::new(13, 1, 9), Location::new(17, 1, 13)),
        );

        let msg = DiagnosticMessageBuilder::error("Invalid email address")
            .with_code("V-4-7")
            .problem("'nope' is not an email address")
            .with_location(location)
            .add_hint("Write it like `name@example.org`?")
            .build();

        let text = msg.render(Some(&ctx), plain());
        assert!(text.contains("[V-4-7] Invalid email address"));
        assert!(text.contains("cv.yaml:2:10"));
        assert!(text.contains("'nope' is not an email address"));
        assert!(text.ends_with("? Write it like `name@example.org`?"));
    }

    #[test]
    fn test_unknown_file_falls_back_to_text() {
        let ctx = SourceContext::new();
        let location = SourceInfo::original(
            FileId(3),
            Range::point(Location::new(0, 0, 0)),
        );
        let msg = DiagnosticMessageBuilder::error("Oops")
            .with_location(location)
            .build();

        assert_eq!(msg.render(Some(&ctx), plain()), "Error: Oops\nat 1:1");
    }

    #[test]
    fn test_label_span_is_never_empty() {
        let point = SourceInfo::original(FileId(0), Range::point(Location::new(4, 0, 4)));
        assert_eq!(label_span(&point, 10), 4..5);

        let past_end = SourceInfo::original(
            FileId(0),
            Range::new(Location::new(12, 0, 12), Location::new(20, 0, 20)),
        );
        assert_eq!(label_span(&past_end, 10), 10..11);
    }

    #[test]
    fn test_to_json() {
        let location = SourceInfo::original(
            FileId(0),
            Range::new(Location::new(100, 10, 5), Location::new(110, 10, 15)),
        );
        let msg = DiagnosticMessageBuilder::error("Invalid input")
            .with_code("V-4-2")
            .problem("Expected a number")
            .add_detail("Found text")
            .add_hint("Remove the quotes?")
            .with_location(location)
            .build();

        let json = msg.to_json();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["code"], "V-4-2");
        assert_eq!(json["problem"], "Expected a number");
        assert_eq!(json["details"][0]["kind"], "error");
        assert_eq!(json["details"][0]["content"], "Found text");
        assert_eq!(json["hints"][0], "Remove the quotes?");
        assert_eq!(json["location"]["range"]["start"]["row"], 10);
        assert_eq!(json["location"]["range"]["end"]["offset"], 110);
    }

    #[test]
    fn test_to_json_omits_empty_fields() {
        let json = DiagnosticMessage::warning("Be careful").to_json();
        assert_eq!(json["kind"], "warning");
        assert!(json.get("code").is_none());
        assert!(json.get("details").is_none());
        assert!(json.get("location").is_none());
    }
}
