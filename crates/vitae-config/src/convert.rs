//! Conversion from loaded documents to merge layers.

use crate::types::{ConfigError, ConfigValue, MergeOp};
use indexmap::IndexMap;
use vitae_yaml::{NodeKind, SourceNode};

/// Convert a loaded document into a merge layer.
///
/// Merge tags are read here: `!prefer` on a sequence or mapping and
/// `!concat` on a sequence or mapping. Any other local tag, or a merge tag
/// on a scalar, is an error.
pub fn config_value_from_source(node: SourceNode) -> Result<ConfigValue, ConfigError> {
    let SourceNode {
        kind,
        source_info,
        tag,
    } = node;

    let found = match &kind {
        NodeKind::Scalar(_) => "scalar",
        NodeKind::Sequence(_) => "sequence",
        NodeKind::Mapping(_) => "mapping",
    };

    let merge_op = match tag {
        None => None,
        Some((tag, location)) => {
            let op = match tag.as_str() {
                "prefer" => MergeOp::Prefer,
                "concat" => MergeOp::Concat,
                _ => return Err(ConfigError::UnknownTag { tag, location }),
            };
            if found == "scalar" {
                return Err(ConfigError::MisplacedTag {
                    tag,
                    found,
                    location,
                });
            }
            Some(op)
        }
    };

    let mut value = match kind {
        NodeKind::Scalar(yaml) => ConfigValue::new_scalar(yaml, source_info),
        NodeKind::Sequence(items) => {
            let items = items
                .into_iter()
                .map(config_value_from_source)
                .collect::<Result<Vec<_>, _>>()?;
            ConfigValue::new_array(items, source_info)
        }
        NodeKind::Mapping(entries) => {
            let mut map = IndexMap::with_capacity(entries.len());
            for entry in entries {
                map.insert(entry.key, config_value_from_source(entry.value)?);
            }
            ConfigValue::new_map(map, source_info)
        }
    };
    value.merge_op = merge_op;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitae_source_map::FileId;
    use yaml_rust2::Yaml;

    fn layer(content: &str) -> Result<ConfigValue, ConfigError> {
        config_value_from_source(vitae_yaml::parse(content, FileId(0)).unwrap())
    }

    #[test]
    fn test_plain_document() {
        let value = layer("cv:\n  name: Ada\n  tags: [a, b]\n").unwrap();
        let cv = value.get("cv").unwrap();
        assert!(cv.is_map());
        assert_eq!(cv.get("name").unwrap().as_str(), Some("Ada"));
        assert_eq!(cv.get("tags").unwrap().as_array().unwrap().len(), 2);
        assert_eq!(cv.contributors.len(), 1);
        assert!(cv.get("name").unwrap().contributors.is_empty());
    }

    #[test]
    fn test_key_order_preserved() {
        let value = layer("b: 1\na: 2\nc: 3\n").unwrap();
        let keys: Vec<&String> = value.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_merge_tags() {
        let value = layer("items: !concat [x]\ndesign: !prefer {theme: classic}\n").unwrap();
        assert_eq!(value.get("items").unwrap().merge_op, Some(MergeOp::Concat));
        assert_eq!(value.get("design").unwrap().merge_op, Some(MergeOp::Prefer));
        assert_eq!(value.merge_op, None);
    }

    #[test]
    fn test_unknown_tag() {
        let err = layer("items: !append [x]\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTag { ref tag, .. } if tag == "append"));
        assert_eq!(err.error_code(), "V-2-1");
    }

    #[test]
    fn test_merge_tag_on_scalar() {
        let err = layer("name: !prefer Ada\n").unwrap_err();
        assert!(matches!(err, ConfigError::MisplacedTag { found: "scalar", .. }));
    }

    #[test]
    fn test_scalars_keep_types() {
        let value = layer("n: 3\nq: \"3\"\n").unwrap();
        assert_eq!(value.get("n").unwrap().as_yaml(), Some(&Yaml::Integer(3)));
        assert_eq!(value.get("q").unwrap().as_str(), Some("3"));
    }
}
