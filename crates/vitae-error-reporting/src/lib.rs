//! Error reporting and diagnostic messages for vitae.
//!
//! Every stage reports problems through the same two shapes:
//!
//! - [`DiagnosticMessage`]: a tidyverse-style message (title, problem,
//!   bulleted details, hints) rendered as text with an ariadne source snippet,
//!   or as JSON
//! - [`ErrorRecord`]: a flat `{code, field_path, message, file, line, column}`
//!   record for tools
//!
//! Error codes come from an embedded catalog, see [`catalog`].
//!
//! ```
//! use vitae_error_reporting::DiagnosticMessageBuilder;
//!
//! let msg = DiagnosticMessageBuilder::error("Invalid override")
//!     .with_code("V-2-3")
//!     .problem("Override paths must not contain empty segments")
//!     .add_hint("Did you mean `cv.name`?")
//!     .build();
//!
//! assert!(msg.to_text(None).starts_with("Error [V-2-3]: Invalid override"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;
pub mod record;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, RenderOptions};
pub use record::ErrorRecord;
