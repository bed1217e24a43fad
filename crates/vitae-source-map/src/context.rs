//! Registry of loaded files

use crate::file_info::FileInformation;
use crate::source_info::SourceInfo;
use crate::types::FileId;
use serde::{Deserialize, Serialize};

/// Every file that contributed to a resolution run.
///
/// File ids are handed out sequentially by [`SourceContext::add_file`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

/// A registered file with its content and line index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path or a display name for in-memory text
    pub path: String,
    /// File content, kept for snippet rendering
    ///
    /// When None the content is read back from `path` on demand.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInformation>,
}

/// A [`SourceInfo`] start position resolved for display (1-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl SourceContext {
    pub fn new() -> Self {
        SourceContext { files: Vec::new() }
    }

    /// Register a file and return its id.
    ///
    /// With `Some(content)` the content is stored and indexed. With `None`
    /// the file is read from disk only to build the line index.
    pub fn add_file(&mut self, path: String, content: Option<String>) -> FileId {
        let id = FileId(self.files.len());

        let file_info = match &content {
            Some(c) => Some(FileInformation::new(c)),
            None => std::fs::read_to_string(&path)
                .ok()
                .map(|c| FileInformation::new(&c)),
        };

        self.files.push(SourceFile {
            path,
            content,
            file_info,
        });
        id
    }

    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files.iter().enumerate().map(|(i, f)| (FileId(i), f))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Content of a file: the stored copy, or a fresh read from disk.
    pub fn content(&self, id: FileId) -> Option<String> {
        let file = self.get_file(id)?;
        match &file.content {
            Some(c) => Some(c.clone()),
            None => std::fs::read_to_string(&file.path).ok(),
        }
    }

    /// Resolve the start of `info` to a file path and 1-based line/column.
    ///
    /// The line index is preferred; the row/column recorded on the range is
    /// the fallback for files whose content is no longer available.
    pub fn resolve(&self, info: &SourceInfo) -> Option<ResolvedLocation> {
        let file = self.get_file(info.file_id)?;
        let start = file
            .file_info
            .as_ref()
            .and_then(|fi| fi.offset_to_location(info.range.start.offset))
            .unwrap_or(info.range.start);

        Some(ResolvedLocation {
            file: file.path.clone(),
            line: start.row + 1,
            column: start.column + 1,
        })
    }
}
