//! End-to-end runs over files on disk.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;
use vitae_core::{Input, Pipeline, ResolveError, ResolveOptions, UnknownFields};
use vitae_schema::ModelValue;

const CV: &str = "\
cv:
  name: Alice
  email: alice@example.org
  sections:
    skills:
      - name: Languages
        highlights: [Rust, SQL, Go]
design:
  font_size: 11
";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn strict() -> ResolveOptions {
    ResolveOptions::new(UnknownFields::Report)
}

#[test]
fn overlays_and_overrides_layer_in_order() {
    let dir = TempDir::new().unwrap();
    let main = write(&dir, "cv.yaml", CV);
    let job = write(
        &dir,
        "job.yaml",
        "cv:\n  name: Bob\n  sections:\n    skills:\n      - name: Databases\ndesign:\n  theme: moderncv\n",
    );

    let options = strict()
        .with_overlay(Input::file(&job))
        .with_override("cv.name=Carol")
        .with_override("design.font_size=12.5");
    let model = Pipeline::builtin().unwrap().resolve(&Input::file(&main), &options).unwrap();

    assert_eq!(model.get(&["cv", "name"]), Some(&ModelValue::from("Carol")));
    assert_eq!(model.get(&["design", "font_size"]), Some(&ModelValue::Number(12.5)));
    assert_eq!(model.get(&["design", "font"]), Some(&ModelValue::from("Helvetica")));

    // sequences replace rather than merge
    let skills = model.get(&["cv", "sections", "skills"]).unwrap().as_array().unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].get("name"), Some(&ModelValue::from("Databases")));
}

#[test]
fn concat_tag_appends() {
    let dir = TempDir::new().unwrap();
    let main = write(&dir, "cv.yaml", CV);
    let extra = write(
        &dir,
        "extra.yaml",
        "cv:\n  sections:\n    skills: !concat\n      - name: Tools\n",
    );

    let model = Pipeline::builtin()
        .unwrap()
        .resolve(&Input::file(&main), &strict().with_overlay(Input::file(&extra)))
        .unwrap();
    let skills = model.get(&["cv", "sections", "skills"]).unwrap().as_array().unwrap();
    let names: Vec<_> = skills.iter().filter_map(|s| s.get("name")?.as_str()).collect();
    assert_eq!(names, vec!["Languages", "Tools"]);
}

#[test]
fn validation_errors_point_at_the_right_file() {
    let dir = TempDir::new().unwrap();
    let main = write(&dir, "cv.yaml", "cv:\n  name: Alice\n");
    let overlay = write(&dir, "design.yaml", "design:\n  font_size: 40\n");

    let mut pipeline = Pipeline::builtin().unwrap();
    let err = pipeline
        .resolve(
            &Input::file(&main),
            &strict().with_overlay(Input::file(&overlay)).with_override("design.page_size=a5"),
        )
        .unwrap_err();

    let records = err.to_records(pipeline.source_context());
    let summary: Vec<(String, Option<String>, Option<usize>)> = records
        .iter()
        .map(|r| {
            let file = r.file.as_ref().map(|f| PathBuf::from(f).file_name().unwrap().to_string_lossy().into_owned());
            (r.code.clone(), file, r.line)
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("V-4-1".to_string(), Some("cv.yaml".to_string()), Some(2)),
            ("V-4-4".to_string(), Some("design.yaml".to_string()), Some(2)),
            ("V-4-8".to_string(), None, None),
        ]
    );
    assert_eq!(records[0].field_path.as_deref(), Some("cv.email"));
    assert_eq!(err.validation_errors().len(), 3);
}

#[test]
fn lenient_mode_drops_unknown_fields() {
    let dir = TempDir::new().unwrap();
    let main = write(&dir, "cv.yaml", &format!("{}extra: 1\n", CV));

    let mut pipeline = Pipeline::builtin().unwrap();
    let err = pipeline.resolve(&Input::file(&main), &strict()).unwrap_err();
    assert_eq!(err.error_code(), "V-4-10");

    let lenient = ResolveOptions::new(UnknownFields::Ignore);
    let model = pipeline.resolve(&Input::file(&main), &lenient).unwrap();
    assert!(model.get(&["extra"]).is_none());
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let err = Pipeline::builtin()
        .unwrap()
        .resolve(&Input::file(dir.path().join("nope.yaml")), &strict())
        .unwrap_err();
    assert!(matches!(err, ResolveError::Load(vitae_yaml::Error::Io { .. })));
    assert_eq!(err.error_code(), "V-1-5");
}

#[test]
fn syntax_error_renders_with_snippet() {
    let dir = TempDir::new().unwrap();
    let main = write(&dir, "cv.yaml", "cv:\n  name: [Alice\n");

    let mut pipeline = Pipeline::builtin().unwrap();
    let err = pipeline.resolve(&Input::file(&main), &strict()).unwrap_err();
    let diagnostics = err.to_diagnostics();
    assert_eq!(diagnostics[0].code.as_deref(), Some("V-1-1"));

    let text = diagnostics[0].render(
        Some(pipeline.source_context()),
        vitae_error_reporting::RenderOptions { color: false },
    );
    assert!(text.contains("cv.yaml"));
    assert!(text.contains("YAML Syntax Error"));
}
