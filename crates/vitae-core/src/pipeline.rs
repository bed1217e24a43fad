//! The resolve pipeline.
//!
//! ```text
//! main + overlays ──load──▶ layers ──merge──▶ tree ──overrides──▶ tree
//!                                                                   │
//!                      ValidatedModel ◀──validate── theme schema ◀──┘
//! ```

use crate::error::ResolveError;
use std::path::PathBuf;
use tracing::{debug, info};
use vitae_config::{
    ConfigValue, FieldPath, Override, apply_override, apply_overrides, config_value_from_source, merge,
};
use vitae_schema::{ConcreteSchema, SchemaRegistry, UnknownFields, ValidatedModel, ValidationOptions, validate};
use vitae_source_map::SourceContext;

/// One YAML document to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    File(PathBuf),
    /// In-memory text registered under `name`
    Text { name: String, content: String },
}

impl Input {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Input::File(path.into())
    }

    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Input::Text {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Name used in messages.
    pub fn name(&self) -> String {
        match self {
            Input::File(path) => path.display().to_string(),
            Input::Text { name, .. } => name.clone(),
        }
    }
}

/// Settings for one run, mirroring the command-line flags.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Applied after the main document, lowest precedence first
    pub overlays: Vec<Input>,
    /// `path=value` strings, applied in order after all overlays
    pub overrides: Vec<String>,
    /// Explicit theme; otherwise `design.theme`, otherwise the default
    pub theme: Option<String>,
    pub unknown_fields: UnknownFields,
}

impl ResolveOptions {
    pub fn new(unknown_fields: UnknownFields) -> Self {
        ResolveOptions {
            overlays: Vec::new(),
            overrides: Vec::new(),
            theme: None,
            unknown_fields,
        }
    }

    pub fn with_overlay(mut self, overlay: Input) -> Self {
        self.overlays.push(overlay);
        self
    }

    pub fn with_override(mut self, text: impl Into<String>) -> Self {
        self.overrides.push(text.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

/// Runs documents through the stages against a fixed registry.
///
/// The pipeline keeps every loaded file in its [`SourceContext`], so errors
/// can be rendered with snippets after a run fails.
#[derive(Debug)]
pub struct Pipeline {
    registry: SchemaRegistry,
    source_context: SourceContext,
}

impl Pipeline {
    pub fn new(registry: SchemaRegistry) -> Self {
        Pipeline {
            registry,
            source_context: SourceContext::new(),
        }
    }

    /// A pipeline over the built-in CV themes.
    pub fn builtin() -> Result<Self, ResolveError> {
        Ok(Self::new(SchemaRegistry::builtin()?))
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn source_context(&self) -> &SourceContext {
        &self.source_context
    }

    /// Load one document as a merge layer.
    pub fn load(&mut self, input: &Input) -> Result<ConfigValue, ResolveError> {
        let node = match input {
            Input::File(path) => vitae_yaml::parse_file(&mut self.source_context, path)?,
            Input::Text { name, content } => vitae_yaml::parse_str(&mut self.source_context, name, content)?,
        };
        debug!(input = %input.name(), "loaded document");
        Ok(config_value_from_source(node)?)
    }

    /// Load, merge and apply overrides, without validating.
    pub fn merged_tree(&mut self, main: &Input, options: &ResolveOptions) -> Result<ConfigValue, ResolveError> {
        // Every override is checked before any file is read
        let overrides = options
            .overrides
            .iter()
            .map(String::as_str)
            .map(Override::parse)
            .collect::<Result<Vec<_>, _>>()?;

        let mut layers = Vec::with_capacity(options.overlays.len() + 1);
        layers.push(self.load(main)?);
        for overlay in &options.overlays {
            layers.push(self.load(overlay)?);
        }
        debug!(layers = layers.len(), "merging layers");
        let tree = merge(layers);

        let tree = apply_overrides(tree, &overrides)?;
        if !overrides.is_empty() {
            debug!(overrides = overrides.len(), "applied overrides");
        }
        Ok(tree)
    }

    /// Pick the schema for `tree`: the explicit theme, else the tree's
    /// `design.theme`, else the registry default.
    pub fn select_schema(&self, tree: &ConfigValue, explicit: Option<&str>) -> Result<&ConcreteSchema, ResolveError> {
        let (theme, location) = match explicit {
            Some(theme) => (theme.to_string(), None),
            None => match tree
                .get_path(&["design", "theme"])
                .and_then(|node| node.as_str().map(|theme| (theme, node)))
            {
                Some((theme, node)) => (theme.to_string(), node.source_info.clone()),
                None => (self.registry.default_variant().to_string(), None),
            },
        };

        self.registry
            .get(&theme)
            .ok_or_else(|| ResolveError::UnknownTheme {
                known: self.registry.variants().map(|v| v.to_string()).collect(),
                theme,
                location,
            })
    }

    /// Run every stage and return the validated model.
    pub fn resolve(&mut self, main: &Input, options: &ResolveOptions) -> Result<ValidatedModel, ResolveError> {
        let mut tree = self.merged_tree(main, options)?;
        let schema = self.select_schema(&tree, options.theme.as_deref())?;
        debug!(theme = %schema.variant, "selected theme");

        // The model must name the theme it was validated against
        if let Some(theme) = &options.theme {
            apply_override(&mut tree, &theme_override(theme))?;
        }

        let validation = ValidationOptions::new(options.unknown_fields);
        match validate(schema, &tree, &validation) {
            Ok(model) => {
                info!(
                    input = %main.name(),
                    theme = %model.variant(),
                    defaults = model.defaulted().len(),
                    "resolved"
                );
                Ok(model)
            }
            Err(errors) => {
                info!(input = %main.name(), errors = errors.len(), "validation failed");
                Err(ResolveError::Validation(errors))
            }
        }
    }
}

/// An explicit theme, written into `design.theme` like a `--set`.
fn theme_override(theme: &str) -> Override {
    Override {
        path: FieldPath::new().key("design").key("theme"),
        raw_value: theme.to_string(),
        text: format!("--theme {}", theme),
    }
}
