//! Core type definitions for the merge tree.

use indexmap::IndexMap;
use thiserror::Error;
use vitae_source_map::SourceInfo;
use vitae_yaml::yaml_type_name;
use yaml_rust2::Yaml;

/// Explicit merge operation requested with a YAML tag.
///
/// Untagged values use the structural defaults: mappings merge key-wise,
/// sequences and scalars replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOp {
    /// `!prefer`: replace whatever lower layers had, even for mappings.
    Prefer,

    /// `!concat`: append sequence items to the lower layer's sequence.
    Concat,
}

/// A node of the merge tree.
///
/// Structurally the same as a loaded document, plus the bookkeeping merging
/// needs: which layer a value came from and how it wants to be combined.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValue {
    pub value: ConfigValueKind,

    /// Origin of the highest-precedence contributor.
    ///
    /// `None` for synthetic nodes (command-line overrides and the containers
    /// created to hold them).
    pub source_info: Option<SourceInfo>,

    /// Merge operation from a tag; `None` means the structural default.
    pub merge_op: Option<MergeOp>,

    /// Every layer that contributed to a container, lowest precedence first.
    /// Empty for scalars.
    pub contributors: Vec<SourceInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValueKind {
    /// String, Integer, Real, Boolean or Null
    Scalar(Yaml),
    Array(Vec<ConfigValue>),
    Map(IndexMap<String, ConfigValue>),
}

impl ConfigValue {
    pub fn new_scalar(yaml: Yaml, source_info: SourceInfo) -> Self {
        Self {
            value: ConfigValueKind::Scalar(yaml),
            source_info: Some(source_info),
            merge_op: None,
            contributors: Vec::new(),
        }
    }

    pub fn new_array(items: Vec<ConfigValue>, source_info: SourceInfo) -> Self {
        Self {
            value: ConfigValueKind::Array(items),
            contributors: vec![source_info.clone()],
            source_info: Some(source_info),
            merge_op: None,
        }
    }

    pub fn new_map(entries: IndexMap<String, ConfigValue>, source_info: SourceInfo) -> Self {
        Self {
            value: ConfigValueKind::Map(entries),
            contributors: vec![source_info.clone()],
            source_info: Some(source_info),
            merge_op: None,
        }
    }

    /// A scalar that was not read from any file.
    pub fn synthetic(yaml: Yaml) -> Self {
        Self {
            value: ConfigValueKind::Scalar(yaml),
            source_info: None,
            merge_op: None,
            contributors: Vec::new(),
        }
    }

    /// An empty mapping with no origin.
    pub fn empty_map() -> Self {
        Self {
            value: ConfigValueKind::Map(IndexMap::new()),
            source_info: None,
            merge_op: None,
            contributors: Vec::new(),
        }
    }

    /// An empty sequence with no origin.
    pub fn empty_array() -> Self {
        Self {
            value: ConfigValueKind::Array(Vec::new()),
            source_info: None,
            merge_op: None,
            contributors: Vec::new(),
        }
    }

    pub fn with_merge_op(mut self, merge_op: MergeOp) -> Self {
        self.merge_op = Some(merge_op);
        self
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.value, ConfigValueKind::Scalar(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.value, ConfigValueKind::Array(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self.value, ConfigValueKind::Map(_))
    }

    /// Explicit `null` (or `~`, or an empty value).
    pub fn is_null(&self) -> bool {
        matches!(self.value, ConfigValueKind::Scalar(Yaml::Null))
    }

    pub fn is_synthetic(&self) -> bool {
        self.source_info.is_none()
    }

    pub fn as_yaml(&self) -> Option<&Yaml> {
        match &self.value {
            ConfigValueKind::Scalar(yaml) => Some(yaml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_yaml().and_then(|y| y.as_str())
    }

    pub fn as_array(&self) -> Option<&Vec<ConfigValue>> {
        match &self.value {
            ConfigValueKind::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, ConfigValue>> {
        match &self.value {
            ConfigValueKind::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_map()?.get(key)
    }

    /// Follow a chain of mapping keys.
    pub fn get_path(&self, path: &[&str]) -> Option<&ConfigValue> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Type name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match &self.value {
            ConfigValueKind::Scalar(yaml) => yaml_type_name(yaml),
            ConfigValueKind::Array(_) => "sequence",
            ConfigValueKind::Map(_) => "mapping",
        }
    }

    /// Strip origins and produce a plain [`Yaml`] value.
    pub fn to_yaml(&self) -> Yaml {
        match &self.value {
            ConfigValueKind::Scalar(yaml) => yaml.clone(),
            ConfigValueKind::Array(items) => Yaml::Array(items.iter().map(ConfigValue::to_yaml).collect()),
            ConfigValueKind::Map(entries) => Yaml::Hash(
                entries
                    .iter()
                    .map(|(k, v)| (Yaml::String(k.clone()), v.to_yaml()))
                    .collect(),
            ),
        }
    }
}

/// Errors while turning a loaded document into a merge layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown tag '!{tag}'")]
    UnknownTag { tag: String, location: SourceInfo },

    #[error("tag '!{tag}' cannot be used on a {found}")]
    MisplacedTag {
        tag: String,
        found: &'static str,
        location: SourceInfo,
    },
}

impl ConfigError {
    pub fn location(&self) -> &SourceInfo {
        match self {
            ConfigError::UnknownTag { location, .. } | ConfigError::MisplacedTag { location, .. } => {
                location
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::UnknownTag { .. } => "V-2-1",
            ConfigError::MisplacedTag { .. } => "V-2-2",
        }
    }
}
