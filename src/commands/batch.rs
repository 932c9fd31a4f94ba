use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::time::Instant;

use crate::commands::{load_or_default_config, Overrides};
use crate::pipeline;

/// Transform every syntax tree below `src_dir` into the output directory
pub fn execute(
    src_dir: &str,
    out_dir: Option<&str>,
    config_path: Option<&str>,
    overrides: &Overrides,
) -> Result<()> {
    let start = Instant::now();

    let mut config = load_or_default_config(config_path)?;
    overrides.apply(&mut config);
    if let Some(out_dir) = out_dir {
        config.output.dir = out_dir.to_string();
    }

    let result = pipeline::execute_batch(Path::new(src_dir), &config)?;

    if !result.errors.is_empty() {
        eprintln!(
            "{} batch failed with {} error(s)",
            "error:".red().bold(),
            result.errors.len()
        );
        for error in &result.errors {
            eprintln!("  {} - {}", error.file.display(), error.message);
        }
        anyhow::bail!("Batch failed");
    }

    let elapsed = start.elapsed();
    println!(
        "   {} {} file(s), hoisted {} value(s) into {} in {:.2}s",
        "Finished".green().bold(),
        result.files_transformed,
        result.values_hoisted,
        result.output_dir.display(),
        elapsed.as_secs_f64()
    );

    Ok(())
}
