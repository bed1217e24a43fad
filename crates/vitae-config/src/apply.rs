//! Applying command-line overrides to a merged tree.

use crate::path::{FieldPath, Override, PathError, Segment, escape_key};
use crate::types::{ConfigValue, ConfigValueKind};
use indexmap::IndexMap;
use yaml_rust2::Yaml;

/// Apply overrides in order; a later override at the same path wins.
///
/// The first failing override aborts the whole run.
pub fn apply_overrides(
    mut tree: ConfigValue,
    overrides: &[Override],
) -> Result<ConfigValue, PathError> {
    for o in overrides {
        apply_override(&mut tree, o)?;
    }
    Ok(tree)
}

/// Set the leaf named by `o.path` to a synthetic string scalar.
///
/// Missing containers along the way are created: a mapping, or a sequence
/// when the next segment is an index. An explicit `null` is treated the
/// same as a missing value.
pub fn apply_override(tree: &mut ConfigValue, o: &Override) -> Result<(), PathError> {
    let leaf = ConfigValue::synthetic(Yaml::String(o.raw_value.clone()));
    let mut walked = FieldPath::new();
    set_at(tree, o.path.segments(), &mut walked, &o.text, leaf)
}

fn set_at(
    node: &mut ConfigValue,
    segments: &[Segment],
    walked: &mut FieldPath,
    input: &str,
    leaf: ConfigValue,
) -> Result<(), PathError> {
    let Some((first, rest)) = segments.split_first() else {
        *node = leaf;
        return Ok(());
    };

    if node.is_null() {
        *node = container_for(first);
    }
    let found = node.kind_name();

    match first {
        Segment::Key(key) => {
            let ConfigValueKind::Map(entries) = &mut node.value else {
                return Err(PathError::NotAContainer {
                    path: walked.to_string(),
                    found,
                    expected: "mapping",
                });
            };
            check_ambiguous(entries, segments, input)?;

            walked.push_key(key.clone());
            let child = entries
                .entry(key.clone())
                .or_insert_with(|| placeholder(rest));
            set_at(child, rest, walked, input, leaf)
        }
        Segment::Index(index) => {
            let ConfigValueKind::Array(items) = &mut node.value else {
                return Err(PathError::NotAContainer {
                    path: walked.to_string(),
                    found,
                    expected: "sequence",
                });
            };
            let index = *index;
            if index > items.len() {
                return Err(PathError::IndexOutOfRange {
                    path: walked.to_string(),
                    index,
                    len: items.len(),
                });
            }
            if index == items.len() {
                items.push(placeholder(rest));
            }

            walked.push_index(index);
            set_at(&mut items[index], rest, walked, input, leaf)
        }
    }
}

/// The container a segment needs to descend into.
fn container_for(segment: &Segment) -> ConfigValue {
    match segment {
        Segment::Key(_) => ConfigValue::empty_map(),
        Segment::Index(_) => ConfigValue::empty_array(),
    }
}

/// What to create for a missing child before descending with `rest`.
fn placeholder(rest: &[Segment]) -> ConfigValue {
    match rest.first() {
        Some(segment) => container_for(segment),
        None => ConfigValue::synthetic(Yaml::Null),
    }
}

/// Fail when two or more leading key segments, joined by `.`, spell a key
/// that already exists in this mapping.
fn check_ambiguous(
    entries: &IndexMap<String, ConfigValue>,
    segments: &[Segment],
    input: &str,
) -> Result<(), PathError> {
    let mut joined = String::new();
    for (i, segment) in segments.iter().enumerate() {
        let Segment::Key(key) = segment else {
            break;
        };
        if i > 0 {
            joined.push('.');
        }
        joined.push_str(key);
        if i > 0 && entries.contains_key(&joined) {
            return Err(PathError::Ambiguous {
                input: input.to_string(),
                escaped: escape_key(&joined),
                key: joined,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::config_value_from_source;
    use pretty_assertions::assert_eq;
    use vitae_source_map::FileId;

    fn tree(content: &str) -> ConfigValue {
        config_value_from_source(vitae_yaml::parse(content, FileId(0)).unwrap()).unwrap()
    }

    fn set(tree: ConfigValue, overrides: &[&str]) -> Result<ConfigValue, PathError> {
        let overrides: Vec<Override> = overrides
            .iter()
            .map(|o| Override::parse(o).unwrap())
            .collect();
        apply_overrides(tree, &overrides)
    }

    #[test]
    fn test_replaces_existing_leaf() {
        let result = set(tree("cv:\n  name: Bob\n"), &["cv.name=Carol"]).unwrap();
        let name = result.get_path(&["cv", "name"]).unwrap();
        assert_eq!(name.as_str(), Some("Carol"));
        assert!(name.is_synthetic());
        assert!(!result.get("cv").unwrap().is_synthetic());
    }

    #[test]
    fn test_value_stays_a_string() {
        let result = set(tree("design:\n  font_size: 10\n"), &["design.font_size=11"]).unwrap();
        assert_eq!(
            result.get_path(&["design", "font_size"]).unwrap().as_yaml(),
            Some(&Yaml::String("11".into()))
        );
    }

    #[test]
    fn test_creates_missing_containers() {
        let result = set(tree("cv:\n  name: Ada\n"), &["design.colors.primary=#004f90"]).unwrap();
        let design = result.get("design").unwrap();
        assert!(design.is_synthetic());
        assert_eq!(
            result.get_path(&["design", "colors", "primary"]).unwrap().as_str(),
            Some("#004f90")
        );
    }

    #[test]
    fn test_creates_sequence_for_index() {
        let result = set(tree("cv: {}\n"), &["cv.sections.talks[0].title=Rust"]).unwrap();
        let talks = result.get_path(&["cv", "sections", "talks"]).unwrap();
        let items = talks.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("title").unwrap().as_str(), Some("Rust"));
    }

    #[test]
    fn test_index_append_and_out_of_range() {
        let base = || tree("tags: [a, b]\n");

        let result = set(base(), &["tags[1]=B", "tags[2]=c"]).unwrap();
        let values: Vec<_> = result
            .get("tags")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert_eq!(values, vec!["a", "B", "c"]);

        let err = set(base(), &["tags[5]=x"]).unwrap_err();
        assert_eq!(
            err,
            PathError::IndexOutOfRange {
                path: "tags".into(),
                index: 5,
                len: 2
            }
        );
        assert_eq!(err.error_code(), "V-2-4");
    }

    #[test]
    fn test_not_a_container() {
        let err = set(tree("cv:\n  name: Ada\n"), &["cv.name.first=A"]).unwrap_err();
        assert_eq!(
            err,
            PathError::NotAContainer {
                path: "cv.name".into(),
                found: "string",
                expected: "mapping"
            }
        );

        let err = set(tree("tags: [a]\n"), &["tags.first=x"]).unwrap_err();
        assert!(matches!(err, PathError::NotAContainer { expected: "mapping", found: "sequence", .. }));

        let err = set(tree("cv: {}\n"), &["cv[0]=x"]).unwrap_err();
        assert!(matches!(err, PathError::NotAContainer { expected: "sequence", found: "mapping", .. }));
    }

    #[test]
    fn test_null_is_absent() {
        let result = set(tree("design: ~\n"), &["design.theme=sb2nov"]).unwrap();
        assert_eq!(
            result.get_path(&["design", "theme"]).unwrap().as_str(),
            Some("sb2nov")
        );
    }

    #[test]
    fn test_later_override_wins() {
        let result = set(tree("{}"), &["cv.name=A", "cv.name=B"]).unwrap();
        assert_eq!(result.get_path(&["cv", "name"]).unwrap().as_str(), Some("B"));
    }

    #[test]
    fn test_ambiguous_literal_key() {
        let err = set(tree("design:\n  font.size: 10\n"), &["design.font.size=11"]).unwrap_err();
        assert_eq!(
            err,
            PathError::Ambiguous {
                input: "design.font.size=11".into(),
                key: "font.size".into(),
                escaped: r"font\.size".into()
            }
        );

        let result = set(tree("design:\n  font.size: 10\n"), &[r"design.font\.size=11"]).unwrap();
        assert_eq!(
            result.get_path(&["design", "font.size"]).unwrap().as_str(),
            Some("11")
        );
    }
}
