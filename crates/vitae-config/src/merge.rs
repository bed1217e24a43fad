//! Overlay merging.
//!
//! Layers are folded left to right, lowest precedence first:
//!
//! - mapping over mapping merges key-wise (lower key order, then keys new in
//!   the higher layer)
//! - anything else replaces what was below it, sequences included
//!
//! `!concat` on a higher sequence appends instead of replacing, and
//! `!prefer` on a higher mapping replaces instead of merging. Merging never
//! fails.

use crate::types::{ConfigValue, ConfigValueKind, MergeOp};
use vitae_source_map::SourceInfo;

/// Merge layers ordered from lowest to highest precedence.
///
/// `merge(vec![])` is an empty mapping with no origin; `merge(vec![a])` is
/// `a` unchanged.
pub fn merge(layers: Vec<ConfigValue>) -> ConfigValue {
    let mut layers = layers.into_iter();
    let Some(first) = layers.next() else {
        return ConfigValue::empty_map();
    };
    layers.fold(first, merge_two)
}

/// Merge `higher` over `lower`.
pub fn merge_two(lower: ConfigValue, higher: ConfigValue) -> ConfigValue {
    match (lower.value, higher.value) {
        (ConfigValueKind::Map(mut entries), ConfigValueKind::Map(higher_entries))
            if higher.merge_op != Some(MergeOp::Prefer) =>
        {
            for (key, value) in higher_entries {
                match entries.get_mut(&key) {
                    Some(existing) => {
                        let below = std::mem::replace(existing, ConfigValue::empty_map());
                        *existing = merge_two(below, value);
                    }
                    None => {
                        entries.insert(key, value);
                    }
                }
            }
            combined(
                ConfigValueKind::Map(entries),
                lower.source_info,
                lower.merge_op,
                lower.contributors,
                higher.source_info,
                higher.contributors,
            )
        }
        (ConfigValueKind::Array(mut items), ConfigValueKind::Array(higher_items))
            if higher.merge_op == Some(MergeOp::Concat) =>
        {
            items.extend(higher_items);
            combined(
                ConfigValueKind::Array(items),
                lower.source_info,
                lower.merge_op,
                lower.contributors,
                higher.source_info,
                higher.contributors,
            )
        }
        (_, value) => ConfigValue {
            value,
            source_info: higher.source_info,
            merge_op: higher.merge_op,
            contributors: higher.contributors,
        },
    }
}

/// A container built from both layers.
///
/// The lower layer's merge op is kept so the result still combines with
/// layers beneath it the way the lower node would have.
fn combined(
    value: ConfigValueKind,
    lower_source: Option<SourceInfo>,
    lower_op: Option<MergeOp>,
    mut contributors: Vec<SourceInfo>,
    higher_source: Option<SourceInfo>,
    higher_contributors: Vec<SourceInfo>,
) -> ConfigValue {
    contributors.extend(higher_contributors);
    ConfigValue {
        value,
        source_info: higher_source.or(lower_source),
        merge_op: lower_op,
        contributors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use vitae_source_map::{FileId, Location, Range, SourceInfo};
    use yaml_rust2::Yaml;

    fn at(file: usize) -> SourceInfo {
        SourceInfo::original(FileId(file), Range::point(Location::new(0, 0, 0)))
    }

    fn scalar(s: &str, file: usize) -> ConfigValue {
        ConfigValue::new_scalar(Yaml::String(s.into()), at(file))
    }

    fn array(items: Vec<ConfigValue>, file: usize) -> ConfigValue {
        ConfigValue::new_array(items, at(file))
    }

    fn map(entries: Vec<(&str, ConfigValue)>, file: usize) -> ConfigValue {
        let mut m = IndexMap::new();
        for (k, v) in entries {
            m.insert(k.to_string(), v);
        }
        ConfigValue::new_map(m, at(file))
    }

    fn keys(value: &ConfigValue) -> Vec<String> {
        value.as_map().unwrap().keys().cloned().collect()
    }

    #[test]
    fn test_merge_empty() {
        let merged = merge(vec![]);
        assert!(merged.is_map());
        assert!(merged.as_map().unwrap().is_empty());
        assert!(merged.is_synthetic());
    }

    #[test]
    fn test_merge_single_is_identity() {
        let a = map(vec![("cv", map(vec![("name", scalar("Alice", 0))], 0))], 0);
        assert_eq!(merge(vec![a.clone()]), a);
    }

    #[test]
    fn test_higher_scalar_wins_with_origin() {
        let a = map(vec![("name", scalar("Alice", 0))], 0);
        let b = map(vec![("name", scalar("Bob", 1))], 1);

        let merged = merge(vec![a, b]);
        let name = merged.get("name").unwrap();
        assert_eq!(name.as_str(), Some("Bob"));
        assert_eq!(name.source_info, Some(at(1)));
    }

    #[test]
    fn test_key_order_lower_first_then_new() {
        let a = map(vec![("b", scalar("1", 0)), ("a", scalar("2", 0))], 0);
        let b = map(vec![("c", scalar("3", 1)), ("b", scalar("4", 1))], 1);

        let merged = merge(vec![a, b]);
        assert_eq!(keys(&merged), vec!["b", "a", "c"]);
        assert_eq!(merged.get("b").unwrap().as_str(), Some("4"));
    }

    #[test]
    fn test_sequence_replaced_verbatim() {
        let a = map(
            vec![("items", array(vec![scalar("x", 0), scalar("y", 0), scalar("z", 0)], 0))],
            0,
        );
        let b = map(vec![("items", array(vec![scalar("only", 1)], 1))], 1);

        let merged = merge(vec![a, b]);
        let items = merged.get("items").unwrap().as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_str(), Some("only"));
    }

    #[test]
    fn test_concat_appends() {
        let a = map(vec![("items", array(vec![scalar("x", 0)], 0))], 0);
        let b = map(
            vec![(
                "items",
                array(vec![scalar("y", 1)], 1).with_merge_op(MergeOp::Concat),
            )],
            1,
        );

        let merged = merge(vec![a, b]);
        let items = merged.get("items").unwrap();
        let values: Vec<_> = items.as_array().unwrap().iter().map(|i| i.as_str()).collect();
        assert_eq!(values, vec![Some("x"), Some("y")]);
        assert_eq!(items.contributors, vec![at(0), at(1)]);
    }

    #[test]
    fn test_prefer_replaces_mapping() {
        let a = map(vec![("design", map(vec![("font", scalar("Times", 0))], 0))], 0);
        let b = map(
            vec![(
                "design",
                map(vec![("theme", scalar("moderncv", 1))], 1).with_merge_op(MergeOp::Prefer),
            )],
            1,
        );

        let merged = merge(vec![a, b]);
        assert_eq!(keys(merged.get("design").unwrap()), vec!["theme"]);
    }

    #[test]
    fn test_shape_change_takes_higher() {
        let a = map(vec![("sections", map(vec![("x", scalar("1", 0))], 0))], 0);
        let b = map(vec![("sections", scalar("none", 1))], 1);
        let merged = merge(vec![a.clone(), b.clone()]);
        assert_eq!(merged.get("sections").unwrap().as_str(), Some("none"));

        let merged = merge(vec![b, a]);
        assert!(merged.get("sections").unwrap().is_map());
    }

    #[test]
    fn test_container_contributors_accumulate() {
        let a = map(vec![("cv", map(vec![("name", scalar("A", 0))], 0))], 0);
        let b = map(vec![("cv", map(vec![("email", scalar("b@x.org", 1))], 1))], 1);
        let c = map(vec![("cv", map(vec![("name", scalar("C", 2))], 2))], 2);

        let merged = merge(vec![a, b, c]);
        let cv = merged.get("cv").unwrap();
        assert_eq!(cv.contributors, vec![at(0), at(1), at(2)]);
        assert_eq!(cv.source_info, Some(at(2)));
        assert_eq!(keys(cv), vec!["name", "email"]);
    }

    #[test]
    fn test_associativity() {
        let layers = || {
            vec![
                map(
                    vec![
                        ("cv", map(vec![("name", scalar("A", 0)), ("tags", array(vec![scalar("t", 0)], 0))], 0)),
                        ("design", map(vec![("font", scalar("Times", 0))], 0)),
                    ],
                    0,
                ),
                map(
                    vec![
                        (
                            "cv",
                            map(
                                vec![("tags", array(vec![scalar("u", 1)], 1).with_merge_op(MergeOp::Concat))],
                                1,
                            ),
                        ),
                        (
                            "design",
                            map(vec![("theme", scalar("sb2nov", 1))], 1).with_merge_op(MergeOp::Prefer),
                        ),
                    ],
                    1,
                ),
                map(
                    vec![
                        ("cv", map(vec![("name", scalar("C", 2))], 2)),
                        ("design", map(vec![("font_size", scalar("11", 2))], 2)),
                    ],
                    2,
                ),
            ]
        };

        let [a, b, c]: [ConfigValue; 3] = layers().try_into().unwrap();
        let all = merge(layers());
        let left = merge(vec![merge(vec![a.clone(), b.clone()]), c.clone()]);
        let right = merge(vec![a, merge(vec![b, c])]);

        assert_eq!(all, left);
        assert_eq!(all, right);
    }
}
