//! `vitae validate`

use super::{ResolveArgs, report_failure};
use anyhow::Result;
use tracing::debug;
use vitae_core::Pipeline;

/// Returns whether the document is valid.
pub fn execute(args: &ResolveArgs) -> Result<bool> {
    let mut pipeline = Pipeline::builtin()?;
    debug!(input = %args.input.display(), overlays = args.overlays.len(), "validating");

    match pipeline.resolve(&args.input(), &args.options()) {
        Ok(model) => {
            if args.json {
                println!("[]");
            } else {
                eprintln!("{} is valid ({} theme)", args.input.display(), model.variant());
            }
            Ok(true)
        }
        Err(err) => {
            report_failure(&err, &pipeline, args.json)?;
            Ok(false)
        }
    }
}
