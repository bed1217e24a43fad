//! Command implementations for the vitae CLI
//!
//! Each command parses its flags and delegates to vitae-core.

pub mod resolve;
pub mod schema;
pub mod themes;
pub mod validate;

use clap::Args;
use std::io::IsTerminal;
use std::path::PathBuf;
use vitae_core::{Input, Pipeline, ResolveError, ResolveOptions, UnknownFields};
use vitae_error_reporting::RenderOptions;

/// Flags shared by every command that runs the pipeline
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Main CV document
    pub input: PathBuf,

    /// Overlay document, applied after the main one (repeatable, in order)
    #[arg(long = "overlay", value_name = "FILE")]
    pub overlays: Vec<PathBuf>,

    /// Override a value, e.g. `cv.name=Ada` or `cv.sections.skills[0].name=Rust`
    /// (repeatable, applied in order after all overlays)
    #[arg(long = "set", value_name = "PATH=VALUE")]
    pub overrides: Vec<String>,

    /// Theme to validate against (defaults to `design.theme`, then `classic`)
    #[arg(long)]
    pub theme: Option<String>,

    /// Report unknown fields as errors (the default)
    #[arg(long, conflicts_with = "lenient")]
    pub strict: bool,

    /// Ignore unknown fields
    #[arg(long)]
    pub lenient: bool,

    /// Print errors as JSON records on stdout
    #[arg(long)]
    pub json: bool,
}

impl ResolveArgs {
    pub fn input(&self) -> Input {
        Input::file(&self.input)
    }

    pub fn options(&self) -> ResolveOptions {
        let unknown_fields = if self.lenient {
            UnknownFields::Ignore
        } else {
            UnknownFields::Report
        };
        let mut options = ResolveOptions::new(unknown_fields);
        options.overlays = self.overlays.iter().map(Input::file).collect();
        options.overrides = self.overrides.clone();
        options.theme = self.theme.clone();
        options
    }
}

/// Print a failed run: JSON records on stdout, or rendered diagnostics on
/// stderr.
pub fn report_failure(err: &ResolveError, pipeline: &Pipeline, json: bool) -> anyhow::Result<()> {
    if json {
        let records = err.to_records(pipeline.source_context());
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let options = RenderOptions {
        color: std::io::stderr().is_terminal(),
    };
    for diagnostic in err.to_diagnostics() {
        eprintln!("{}\n", diagnostic.render(Some(pipeline.source_context()), options));
    }
    Ok(())
}
