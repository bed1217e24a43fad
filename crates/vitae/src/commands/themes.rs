//! `vitae themes`

use anyhow::Result;
use vitae_schema::SchemaRegistry;

pub fn execute() -> Result<bool> {
    let registry = SchemaRegistry::builtin()?;
    for theme in registry.variants() {
        if theme == registry.default_variant() {
            println!("{} (default)", theme);
        } else {
            println!("{}", theme);
        }
    }
    Ok(true)
}
