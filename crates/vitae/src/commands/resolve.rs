//! `vitae resolve`

use super::{ResolveArgs, report_failure};
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::Path;
use vitae_core::Pipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Yaml,
    Json,
}

/// Print the validated model. Returns false when validation failed.
pub fn execute(args: &ResolveArgs, format: Format, output: Option<&Path>) -> Result<bool> {
    let mut pipeline = Pipeline::builtin()?;

    let model = match pipeline.resolve(&args.input(), &args.options()) {
        Ok(model) => model,
        Err(err) => {
            report_failure(&err, &pipeline, args.json)?;
            return Ok(false);
        }
    };

    let text = match format {
        Format::Yaml => model
            .to_yaml_string()
            .context("Failed to serialize the resolved CV as YAML")?,
        Format::Json => {
            let mut text = serde_json::to_string_pretty(&model.to_json())?;
            text.push('\n');
            text
        }
    };

    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", text),
    }
    Ok(true)
}
