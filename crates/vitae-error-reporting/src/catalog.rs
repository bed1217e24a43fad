//! Error code catalog and lookup.
//!
//! Maps error codes (like "V-4-1") to their metadata. Codes are grouped by
//! subsystem: `V-1` loading, `V-2` merging and overrides, `V-3` schema
//! construction, `V-4` validation.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name (e.g., "yaml", "config", "validation")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// Default message template
    pub message_template: String,

    /// When this error was introduced (version)
    pub since_version: String,
}

/// Global error catalog, embedded at compile time.
///
/// # Panics
///
/// Panics on first access if the embedded JSON is invalid, which the
/// catalog tests catch.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).expect("invalid error_catalog.json")
});

/// Look up error code information.
///
/// ```
/// use vitae_error_reporting::catalog::get_error_info;
///
/// let info = get_error_info("V-1-1").unwrap();
/// assert_eq!(info.subsystem, "yaml");
/// ```
pub fn get_error_info(code: &str) -> Option<&'static ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

pub fn get_subsystem(code: &str) -> Option<&'static str> {
    get_error_info(code).map(|info| info.subsystem.as_str())
}
