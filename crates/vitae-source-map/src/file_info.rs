//! Line index for offset lookups

use crate::types::Location;
use serde::{Deserialize, Serialize};

/// Line-break index of a file's content.
///
/// Stores the character offset of every newline so a character offset can be
/// turned into a (row, column) pair with a binary search, without keeping the
/// content around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInformation {
    /// Character offsets of each `\n`
    line_breaks: Vec<usize>,

    /// Total length of the file in characters
    total_length: usize,
}

impl FileInformation {
    /// Scan `content` once and index its line breaks.
    ///
    /// ```
    /// use vitae_source_map::FileInformation;
    ///
    /// let info = FileInformation::new("name: Ada\nemail: ada@example.com\n");
    /// assert_eq!(info.line_count(), 3);
    /// ```
    pub fn new(content: &str) -> Self {
        let mut line_breaks = Vec::new();
        let mut total_length = 0;
        for (idx, ch) in content.chars().enumerate() {
            if ch == '\n' {
                line_breaks.push(idx);
            }
            total_length = idx + 1;
        }

        FileInformation {
            line_breaks,
            total_length,
        }
    }

    /// Convert a character offset to a [`Location`].
    ///
    /// Returns None if the offset is past the end of the file.
    ///
    /// ```
    /// use vitae_source_map::FileInformation;
    ///
    /// let info = FileInformation::new("hello\nwörld");
    /// let loc = info.offset_to_location(8).unwrap();
    /// assert_eq!((loc.row, loc.column), (1, 2));
    /// ```
    pub fn offset_to_location(&self, offset: usize) -> Option<Location> {
        if offset > self.total_length {
            return None;
        }

        // A newline belongs to the line it terminates.
        let row = match self.line_breaks.binary_search(&offset) {
            Ok(idx) | Err(idx) => idx,
        };

        let line_start = if row == 0 {
            0
        } else {
            self.line_breaks[row - 1] + 1
        };

        Some(Location {
            offset,
            row,
            column: offset - line_start,
        })
    }

    /// Character offset where `row` starts, if the file has that many lines.
    pub fn line_start(&self, row: usize) -> Option<usize> {
        match row {
            0 => Some(0),
            r if r <= self.line_breaks.len() => Some(self.line_breaks[r - 1] + 1),
            _ => None,
        }
    }

    pub fn total_length(&self) -> usize {
        self.total_length
    }

    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }
}
