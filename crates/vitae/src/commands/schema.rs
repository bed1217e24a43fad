//! `vitae schema`

use anyhow::Result;
use vitae_schema::SchemaRegistry;

pub fn execute(theme: Option<&str>) -> Result<bool> {
    let registry = SchemaRegistry::builtin()?;
    let theme = theme.unwrap_or(registry.default_variant().as_str());

    let Some(schema) = registry.get(theme) else {
        let known: Vec<&str> = registry.variants().map(|v| v.as_str()).collect();
        anyhow::bail!("Unknown theme '{}' (available: {})", theme, known.join(", "));
    };

    println!("{}", serde_json::to_string_pretty(&schema.to_json_schema())?);
    Ok(true)
}
