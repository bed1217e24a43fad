//! Core position types

use serde::{Deserialize, Serialize};

/// Identifies a file registered in a [`SourceContext`](crate::SourceContext)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub usize);

/// A position in source text (0-indexed)
///
/// Offsets count characters, not bytes, matching the YAML scanner's
/// markers and ariadne's default span indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Character offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in characters)
    pub column: usize,
}

impl Location {
    pub fn new(offset: usize, row: usize, column: usize) -> Self {
        Location {
            offset,
            row,
            column,
        }
    }
}

/// A range in source text from start to end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

impl Range {
    pub fn new(start: Location, end: Location) -> Self {
        Range { start, end }
    }

    /// A zero-width range at `at`.
    pub fn point(at: Location) -> Self {
        Range { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ordering() {
        let a = Location::new(0, 0, 0);
        let b = Location::new(5, 0, 5);
        let c = Location::new(10, 1, 0);

        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_range_len() {
        let range = Range::new(Location::new(3, 0, 3), Location::new(8, 0, 8));
        assert_eq!(range.len(), 5);
        assert!(!range.is_empty());
        assert!(Range::point(Location::new(4, 0, 4)).is_empty());
    }

    #[test]
    fn test_serialization_range() {
        let range = Range::new(Location::new(0, 0, 0), Location::new(50, 2, 10));
        let json = serde_json::to_string(&range).unwrap();
        let back: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(range, back);
    }
}
