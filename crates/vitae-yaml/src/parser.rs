//! Event-driven builder for [`SourceNode`] trees.

use crate::error::{Error, Result};
use crate::node::{MapEntry, SourceNode};
use std::path::Path;
use vitae_source_map::{FileId, FileInformation, Location, Range, SourceContext, SourceInfo};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::Yaml;

/// Parse one YAML document belonging to `file_id`.
///
/// Only the first document of a multi-document stream is read. An empty
/// document (or one holding only comments) yields an empty mapping.
///
/// ```rust
/// use vitae_source_map::FileId;
/// use vitae_yaml::parse;
///
/// let node = parse("cv:\n  name: Ada\n", FileId(0)).unwrap();
/// let name = node.get("cv").and_then(|cv| cv.get("name")).unwrap();
/// assert_eq!(name.as_str(), Some("Ada"));
/// assert_eq!(name.source_info.range.start.row, 1);
/// ```
pub fn parse(content: &str, file_id: FileId) -> Result<SourceNode> {
    let mut builder = NodeBuilder::new(content, file_id);
    let mut parser = Parser::new_from_str(content);

    if let Err(err) = parser.load(&mut builder, false) {
        return Err(Error::Syntax {
            message: err.info().to_string(),
            location: builder.point(err.marker()),
        });
    }

    builder.finish()
}

/// Register in-memory text under `name` and parse it.
pub fn parse_str(ctx: &mut SourceContext, name: &str, content: &str) -> Result<SourceNode> {
    let file_id = ctx.add_file(name.to_string(), Some(content.to_string()));
    parse(content, file_id)
}

/// Read a file from disk, register it and parse it.
pub fn parse_file(ctx: &mut SourceContext, path: &Path) -> Result<SourceNode> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_id = ctx.add_file(path.display().to_string(), Some(content.clone()));
    parse(&content, file_id)
}

struct NodeBuilder {
    file_id: FileId,
    file_info: FileInformation,
    stack: Vec<Frame>,
    root: Option<SourceNode>,

    /// First structural error; later events are ignored once set
    error: Option<Error>,
}

enum Frame {
    Sequence {
        start: Location,
        tag: Option<(String, SourceInfo)>,
        items: Vec<SourceNode>,
    },
    Mapping {
        start: Location,
        tag: Option<(String, SourceInfo)>,
        entries: Vec<MapEntry>,
        /// Key read, value not yet complete
        pending_key: Option<(String, SourceInfo)>,
    },
}

impl NodeBuilder {
    fn new(content: &str, file_id: FileId) -> Self {
        NodeBuilder {
            file_id,
            file_info: FileInformation::new(content),
            stack: Vec::new(),
            root: None,
            error: None,
        }
    }

    fn finish(self) -> Result<SourceNode> {
        if let Some(err) = self.error {
            return Err(err);
        }
        match self.root {
            Some(root) => Ok(root),
            None => {
                let origin = Location::new(0, 0, 0);
                Ok(SourceNode::mapping(
                    Vec::new(),
                    SourceInfo::original(self.file_id, Range::point(origin)),
                ))
            }
        }
    }

    fn location(&self, marker: &Marker) -> Location {
        self.file_info
            .offset_to_location(marker.index())
            .unwrap_or_else(|| {
                Location::new(marker.index(), marker.line().saturating_sub(1), marker.col())
            })
    }

    fn offset_location(&self, offset: usize) -> Location {
        let clamped = offset.min(self.file_info.total_length());
        self.file_info
            .offset_to_location(clamped)
            .unwrap_or(Location::new(clamped, 0, 0))
    }

    fn point(&self, marker: &Marker) -> SourceInfo {
        SourceInfo::original(self.file_id, Range::point(self.location(marker)))
    }

    fn span(&self, start: Location, end: Location) -> SourceInfo {
        SourceInfo::span(self.file_id, start, end)
    }

    /// The innermost open mapping is waiting for a key.
    fn expecting_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame::Mapping {
                pending_key: None,
                ..
            })
        )
    }

    fn push_complete(&mut self, node: SourceNode) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => {
                if let Some((key, key_source)) = pending_key.take() {
                    entries.push(MapEntry {
                        key,
                        key_source,
                        value: node,
                    });
                }
            }
        }
    }

    fn on_scalar(&mut self, value: String, style: TScalarStyle, tag: Option<Tag>, marker: &Marker) {
        let start = self.location(marker);
        let end = self.offset_location(start.offset + scalar_extent(&value, style));
        let source_info = self.span(start, end);

        if self.expecting_key() {
            self.on_key(value, source_info);
            return;
        }

        let (tag, core) = split_tag(tag, &source_info);
        let yaml = match core.as_deref() {
            Some("str") => Yaml::String(value),
            _ if style != TScalarStyle::Plain => Yaml::String(value),
            _ => infer_scalar(&value),
        };
        self.push_complete(SourceNode::scalar(yaml, source_info).with_tag(tag));
    }

    fn on_key(&mut self, key: String, key_source: SourceInfo) {
        let Some(Frame::Mapping {
            start,
            entries,
            pending_key,
            ..
        }) = self.stack.last_mut()
        else {
            return;
        };

        // yaml-rust2 marks a block mapping at its first key's colon
        if entries.is_empty() && key_source.range.start.offset < start.offset {
            *start = key_source.range.start;
        }

        if let Some(first) = entries.iter().find(|e| e.key == key) {
            self.error = Some(Error::DuplicateKey {
                key,
                location: key_source,
                first: first.key_source.clone(),
            });
            return;
        }
        *pending_key = Some((key, key_source));
    }

    fn on_container_start(&mut self, marker: &Marker, tag: Option<Tag>, mapping: bool) {
        let start = self.location(marker);
        if self.expecting_key() {
            self.error = Some(Error::NonScalarKey {
                location: self.span(start, start),
            });
            return;
        }

        let (tag, _) = split_tag(tag, &self.span(start, start));
        let frame = if mapping {
            Frame::Mapping {
                start,
                tag,
                entries: Vec::new(),
                pending_key: None,
            }
        } else {
            Frame::Sequence {
                start,
                tag,
                items: Vec::new(),
            }
        };
        self.stack.push(frame);
    }

    fn on_container_end(&mut self, marker: &Marker) {
        let end = self.location(marker);
        let Some(frame) = self.stack.pop() else {
            return;
        };

        let node = match frame {
            Frame::Sequence { start, tag, items } => {
                SourceNode::sequence(items, self.span(start, end.max(start))).with_tag(tag)
            }
            Frame::Mapping {
                start,
                tag,
                entries,
                ..
            } => SourceNode::mapping(entries, self.span(start, end.max(start))).with_tag(tag),
        };
        self.push_complete(node);
    }
}

impl MarkedEventReceiver for NodeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Scalar(value, style, _anchor_id, tag) => {
                self.on_scalar(value, style, tag, &marker);
            }
            Event::SequenceStart(_anchor_id, tag) => {
                self.on_container_start(&marker, tag, false);
            }
            Event::MappingStart(_anchor_id, tag) => {
                self.on_container_start(&marker, tag, true);
            }
            Event::SequenceEnd | Event::MappingEnd => self.on_container_end(&marker),
            Event::Alias(_anchor_id) => {
                self.error = Some(Error::UnsupportedAlias {
                    location: self.point(&marker),
                });
            }
            _ => {}
        }
    }
}

/// Characters a scalar occupies in the source, approximated from its value.
fn scalar_extent(value: &str, style: TScalarStyle) -> usize {
    let len = value.chars().count();
    match style {
        TScalarStyle::SingleQuoted | TScalarStyle::DoubleQuoted => len + 2,
        _ => len,
    }
}

/// Separate a local tag (`!concat`) from a core schema tag (`!!str`).
///
/// Returns the local tag to keep on the node and the core tag suffix, if any.
fn split_tag(tag: Option<Tag>, at: &SourceInfo) -> (Option<(String, SourceInfo)>, Option<String>) {
    let Some(tag) = tag else {
        return (None, None);
    };
    match tag.handle.as_str() {
        "!" => (Some((tag.suffix, at.clone())), None),
        "!!" | "tag:yaml.org,2002:" => (None, Some(tag.suffix)),
        handle => (Some((format!("{}{}", handle, tag.suffix), at.clone())), None),
    }
}

/// Infer the type of a plain scalar using the YAML 1.2 core schema.
///
/// Quoted scalars never go through here: `"2024"` stays a string.
fn infer_scalar(value: &str) -> Yaml {
    match value {
        "" | "~" | "null" | "Null" | "NULL" => return Yaml::Null,
        "true" | "True" | "TRUE" => return Yaml::Boolean(true),
        "false" | "False" | "FALSE" => return Yaml::Boolean(false),
        _ => {}
    }

    if let Ok(i) = value.parse::<i64>() {
        return Yaml::Integer(i);
    }

    // Rust accepts "inf" and "NaN"; YAML only treats digit-bearing text as numbers here.
    if value.chars().any(|c| c.is_ascii_digit()) && value.parse::<f64>().is_ok() {
        return Yaml::Real(value.to_string());
    }

    Yaml::String(value.to_string())
}
