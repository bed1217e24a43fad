//! Source positions for vitae
//!
//! Every node loaded from a CV document or overlay remembers which file it
//! came from and where. This crate holds the pieces shared by all stages:
//!
//! - [`SourceContext`]: the registry of files that took part in a run
//! - [`SourceInfo`]: a file id plus a range inside that file
//! - [`FileInformation`]: a line index for offset to line/column lookups
//!
//! # Example
//!
//! ```rust
//! use vitae_source_map::*;
//!
//! let mut ctx = SourceContext::new();
//! let file_id = ctx.add_file("cv.yaml".into(), Some("cv:\n  name: Ada".into()));
//!
//! let start = Location::new(6, 1, 2);
//! let end = Location::new(10, 1, 6);
//! let info = SourceInfo::original(file_id, Range::new(start, end));
//!
//! assert_eq!(ctx.resolve(&info).unwrap().to_string(), "cv.yaml:2:3");
//! ```

pub mod context;
pub mod file_info;
pub mod source_info;
pub mod types;

pub use context::{ResolvedLocation, SourceContext, SourceFile};
pub use file_info::FileInformation;
pub use source_info::SourceInfo;
pub use types::{FileId, Location, Range};
