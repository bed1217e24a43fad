//! Overlay merging and command-line overrides with source tracking.
//!
//! A CV is usually one main document plus a few overlays (a theme file, a
//! per-job tweak) and a handful of `--set` overrides. This crate turns loaded
//! documents into merge layers, folds them into one tree and applies the
//! overrides, keeping the origin of every value so later stages can point
//! at the file and line a problem came from.
//!
//! # Key Features
//!
//! - **Source location preservation**: every value carries an optional `SourceInfo`;
//!   `None` marks values injected by an override
//! - **Explicit merge semantics**: `!prefer` and `!concat` YAML tags control behavior
//! - **Associativity**: `merge([merge([a, b]), c]) == merge([a, merge([b, c])])`
//!
//! # Example
//!
//! ```rust
//! use vitae_config::{Override, apply_overrides, config_value_from_source, merge};
//! use vitae_source_map::SourceContext;
//!
//! let mut ctx = SourceContext::new();
//! let main = vitae_yaml::parse_str(&mut ctx, "cv.yaml", "cv:\n  name: Alice\n").unwrap();
//! let overlay = vitae_yaml::parse_str(&mut ctx, "job.yaml", "cv:\n  name: Bob\n").unwrap();
//!
//! let layers = vec![
//!     config_value_from_source(main).unwrap(),
//!     config_value_from_source(overlay).unwrap(),
//! ];
//! let merged = merge(layers);
//! let tree = apply_overrides(merged, &[Override::parse("cv.name=Carol").unwrap()]).unwrap();
//!
//! let name = tree.get_path(&["cv", "name"]).unwrap();
//! assert_eq!(name.as_str(), Some("Carol"));
//! assert!(name.is_synthetic());
//! ```

mod apply;
mod convert;
mod merge;
mod path;
mod types;

pub use types::{ConfigError, ConfigValue, ConfigValueKind, MergeOp};

pub use convert::config_value_from_source;

pub use merge::{merge, merge_two};

pub use path::{FieldPath, Override, PathError, Segment, SyntaxError, escape_key};

pub use apply::{apply_override, apply_overrides};
