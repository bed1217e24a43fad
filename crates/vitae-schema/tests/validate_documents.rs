//! Validating parsed documents against the built-in themes.

use pretty_assertions::assert_eq;
use vitae_config::{ConfigValue, config_value_from_source};
use vitae_schema::{
    ModelValue, SchemaRegistry, UnknownFields, ValidationError, ValidationOptions, validate,
};
use vitae_source_map::SourceContext;

const CV: &str = "\
cv:
  name: Ada Lovelace
  email: ada@example.org
  sections:
    experience:
      - company: Analytical Engines
        position: Programmer
        start_date: 1842-01
        end_date: present
        highlights:
          - Wrote the first program
";

fn load(ctx: &mut SourceContext, name: &str, content: &str) -> ConfigValue {
    config_value_from_source(vitae_yaml::parse_str(ctx, name, content).unwrap()).unwrap()
}

fn check(theme: &str, tree: &ConfigValue) -> Result<vitae_schema::ValidatedModel, Vec<ValidationError>> {
    let registry = SchemaRegistry::builtin().unwrap();
    validate(registry.get(theme).unwrap(), tree, &ValidationOptions::strict())
}

#[test]
fn moderncv_defaults_to_helvetica() {
    let mut ctx = SourceContext::new();
    let tree = load(&mut ctx, "cv.yaml", CV);

    let model = check("moderncv", &tree).unwrap();
    assert_eq!(model.get(&["design", "font"]), Some(&ModelValue::from("Helvetica")));
    assert_eq!(model.get(&["design", "theme"]), Some(&ModelValue::from("moderncv")));
    assert_eq!(model.get(&["design", "font_size"]), Some(&ModelValue::Number(10.0)));

    let classic = check("classic", &tree).unwrap();
    assert_eq!(classic.get(&["design", "font"]), Some(&ModelValue::from("Times")));
}

#[test]
fn missing_email_points_at_cv_mapping() {
    let mut ctx = SourceContext::new();
    let tree = load(&mut ctx, "cv.yaml", "cv:\n  name: Ada Lovelace\n");

    let errors = check("classic", &tree).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field_path.to_string(), "cv.email");

    let at = ctx.resolve(errors[0].origin.as_ref().unwrap()).unwrap();
    assert_eq!(at.to_string(), "cv.yaml:2:3");
}

#[test]
fn independent_missing_fields_are_reported_separately() {
    let mut ctx = SourceContext::new();
    let tree = load(&mut ctx, "cv.yaml", "cv:\n  label: Programmer\n");

    let errors = check("classic", &tree).unwrap_err();
    let paths: Vec<String> = errors.iter().map(|e| e.field_path.to_string()).collect();
    assert_eq!(paths, vec!["cv.name", "cv.email"]);
}

#[test]
fn errors_inside_sections_carry_their_position() {
    let mut ctx = SourceContext::new();
    let content = "\
cv:
  name: Ada
  email: ada@example.org
  sections:
    education:
      - institution: University of London
        start_date: 1850
        end_date: 1843
";
    let tree = load(&mut ctx, "cv.yaml", content);

    let errors = check("classic", &tree).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field_path.to_string(), "cv.sections.education[0].end_date");
    assert_eq!(errors[0].error_code(), "V-4-11");
    let at = ctx.resolve(errors[0].origin.as_ref().unwrap()).unwrap();
    assert_eq!((at.line, at.column), (8, 19));
}

#[test]
fn serialized_model_validates_to_the_same_values() {
    let mut ctx = SourceContext::new();
    let tree = load(&mut ctx, "cv.yaml", CV);
    let model = check("engineeringresumes", &tree).unwrap();
    assert!(!model.defaulted().is_empty());

    let text = model.to_yaml_string().unwrap();
    let reloaded = load(&mut ctx, "resolved.yaml", &text);
    let again = check("engineeringresumes", &reloaded).unwrap();

    assert_eq!(again.root(), model.root());
    assert_eq!(again.get(&["design", "header_separator"]), Some(&ModelValue::from("|")));
}

#[test]
fn unknown_fields_follow_the_options() {
    let mut ctx = SourceContext::new();
    let content = "cv:\n  name: Ada\n  email: ada@example.org\n  nickname: Countess\n";
    let tree = load(&mut ctx, "cv.yaml", content);
    let registry = SchemaRegistry::builtin().unwrap();
    let schema = registry.get("classic").unwrap();

    let errors = validate(schema, &tree, &ValidationOptions::new(UnknownFields::Report)).unwrap_err();
    assert_eq!(errors[0].field_path.to_string(), "cv.nickname");
    assert_eq!(errors[0].error_code(), "V-4-10");

    let model = validate(schema, &tree, &ValidationOptions::new(UnknownFields::Ignore)).unwrap();
    assert_eq!(model.get(&["cv", "nickname"]), None);
}

#[test]
fn disabled_field_is_unknown_for_that_theme() {
    let mut ctx = SourceContext::new();
    let content = "cv:\n  name: Ada\n  email: ada@example.org\ndesign:\n  text_alignment: left\n";
    let tree = load(&mut ctx, "cv.yaml", content);

    assert!(check("classic", &tree).is_ok());
    let errors = check("sb2nov", &tree).unwrap_err();
    assert_eq!(errors[0].field_path.to_string(), "design.text_alignment");
}
