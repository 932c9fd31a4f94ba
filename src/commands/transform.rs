use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::time::Instant;

use crate::commands::{load_or_default_config, Overrides};
use crate::hoist::HoistPass;
use crate::pipeline;

/// Transform a single syntax tree and print the result to stdout
pub fn execute(file: &str, config_path: Option<&str>, overrides: &Overrides) -> Result<()> {
    let start = Instant::now();

    let path = Path::new(file);
    if !path.exists() {
        anyhow::bail!("File not found: {}", file);
    }

    let mut config = load_or_default_config(config_path)?;
    overrides.apply(&mut config);

    let module = pipeline::read_module(path)?;
    let pass = HoistPass::new(config.options()?);
    let resolver = config.build_resolver();

    let transformed = pass.run(module, resolver.as_ref());
    let rendered = pipeline::render(&transformed.module, config.output.emit)
        .context(format!("Failed to render {}", file))?;

    print!("{}", rendered);

    let elapsed = start.elapsed();
    eprintln!(
        "   {} {} value(s) in `{}` in {:.2}s",
        "Hoisted".green().bold(),
        transformed.hoisted.len(),
        file,
        elapsed.as_secs_f64()
    );

    Ok(())
}
