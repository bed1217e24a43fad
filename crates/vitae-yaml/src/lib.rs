//! Source Loader: YAML text to position-tracked trees.
//!
//! Each CV document and overlay is parsed into a [`SourceNode`] tree whose
//! every node (containers included) remembers the file and range it was read
//! from. Later stages read these positions instead of re-deriving them, so an
//! error found after merging still points at the line the user wrote.
//!
//! Mapping key order is preserved and duplicate keys are rejected. Plain
//! scalars are typed with the YAML 1.2 core rules; quoted scalars are always
//! strings.

mod error;
mod node;
mod parser;

pub use error::{Error, Result};
pub use node::{MapEntry, NodeKind, SourceNode, yaml_type_name};
pub use parser::{parse, parse_file, parse_str};

pub use vitae_source_map::SourceInfo;
