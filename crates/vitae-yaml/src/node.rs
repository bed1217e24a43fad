//! Source-tracked YAML tree.

use vitae_source_map::SourceInfo;
use yaml_rust2::Yaml;

/// A YAML node with the position it was read from.
///
/// Unlike a bare [`Yaml`] value, mapping entries keep document order and
/// their keys' positions, and containers know their own span.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceNode {
    pub kind: NodeKind,

    /// Span of this node in its file
    pub source_info: SourceInfo,

    /// Local tag such as `!concat`, without the leading `!`
    pub tag: Option<(String, SourceInfo)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// String, Integer, Real, Boolean or Null
    Scalar(Yaml),
    Sequence(Vec<SourceNode>),
    /// Entries in document order; keys are unique
    Mapping(Vec<MapEntry>),
}

/// One `key: value` pair of a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: String,
    pub key_source: SourceInfo,
    pub value: SourceNode,
}

impl SourceNode {
    pub fn scalar(yaml: Yaml, source_info: SourceInfo) -> Self {
        SourceNode {
            kind: NodeKind::Scalar(yaml),
            source_info,
            tag: None,
        }
    }

    pub fn sequence(items: Vec<SourceNode>, source_info: SourceInfo) -> Self {
        SourceNode {
            kind: NodeKind::Sequence(items),
            source_info,
            tag: None,
        }
    }

    pub fn mapping(entries: Vec<MapEntry>, source_info: SourceInfo) -> Self {
        SourceNode {
            kind: NodeKind::Mapping(entries),
            source_info,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: Option<(String, SourceInfo)>) -> Self {
        self.tag = tag;
        self
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    pub fn as_scalar(&self) -> Option<&Yaml> {
        match &self.kind {
            NodeKind::Scalar(yaml) => Some(yaml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(|y| y.as_str())
    }

    pub fn as_sequence(&self) -> Option<&[SourceNode]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[MapEntry]> {
        match &self.kind {
            NodeKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a mapping value by key.
    pub fn get(&self, key: &str) -> Option<&SourceNode> {
        self.as_mapping()?
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    /// Number of items or entries; 0 for scalars.
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Scalar(_) => 0,
            NodeKind::Sequence(items) => items.len(),
            NodeKind::Mapping(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Strip positions and produce a plain [`Yaml`] value.
    pub fn to_yaml(&self) -> Yaml {
        match &self.kind {
            NodeKind::Scalar(yaml) => yaml.clone(),
            NodeKind::Sequence(items) => Yaml::Array(items.iter().map(SourceNode::to_yaml).collect()),
            NodeKind::Mapping(entries) => Yaml::Hash(
                entries
                    .iter()
                    .map(|e| (Yaml::String(e.key.clone()), e.value.to_yaml()))
                    .collect(),
            ),
        }
    }
}

/// Human name of a YAML value's type, as used in error messages.
pub fn yaml_type_name(yaml: &Yaml) -> &'static str {
    match yaml {
        Yaml::String(_) => "string",
        Yaml::Integer(_) => "integer",
        Yaml::Real(_) => "number",
        Yaml::Boolean(_) => "boolean",
        Yaml::Array(_) => "sequence",
        Yaml::Hash(_) => "mapping",
        Yaml::Null => "null",
        _ => "unknown",
    }
}
