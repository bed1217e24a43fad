//! Origin of a span of text

use crate::types::{FileId, Location, Range};
use serde::{Deserialize, Serialize};

/// Where a node came from: a range inside one registered file.
///
/// Nodes that were not written in any file (command-line overrides, filled-in
/// defaults) carry no `SourceInfo` at all; callers model that as
/// `Option<SourceInfo>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub file_id: FileId,
    pub range: Range,
}

impl SourceInfo {
    /// Create source info for a range of an original file.
    pub fn original(file_id: FileId, range: Range) -> Self {
        SourceInfo { file_id, range }
    }

    /// Source info spanning `start..end` of `file_id`.
    pub fn span(file_id: FileId, start: Location, end: Location) -> Self {
        SourceInfo {
            file_id,
            range: Range::new(start, end),
        }
    }

    pub fn start_offset(&self) -> usize {
        self.range.start.offset
    }

    pub fn end_offset(&self) -> usize {
        self.range.end.offset
    }

    pub fn length(&self) -> usize {
        self.range.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_offsets() {
        let info = SourceInfo::span(FileId(2), Location::new(4, 1, 0), Location::new(9, 1, 5));
        assert_eq!(info.file_id, FileId(2));
        assert_eq!(info.start_offset(), 4);
        assert_eq!(info.end_offset(), 9);
        assert_eq!(info.length(), 5);
    }
}
