use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{Config, EmitFormat};
use crate::hoist::ast::Module;
use crate::hoist::codegen;
use crate::hoist::resolver::Resolver;
use crate::hoist::HoistPass;

/// Extension the front end uses for serialized trees
pub const AST_EXTENSION: &str = ".ast.json";

/// Represents the result of a batch run
#[derive(Debug)]
pub struct BatchResult {
    pub files_transformed: usize,
    pub values_hoisted: usize,
    pub output_dir: PathBuf,
    pub errors: Vec<BatchError>,
}

#[derive(Debug)]
pub struct BatchError {
    pub file: PathBuf,
    pub message: String,
}

/// Read a serialized tree produced by the front end
pub fn read_module(path: &Path) -> Result<Module> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read {}", path.display()))?;
    let module: Module = serde_json::from_str(&content)
        .context(format!("Failed to decode syntax tree in {}", path.display()))?;
    Ok(module)
}

/// Render a transformed tree in the requested format
pub fn render(module: &Module, format: EmitFormat) -> Result<String> {
    match format {
        EmitFormat::Code => Ok(codegen::emit(module)),
        EmitFormat::Json => {
            let mut json = serde_json::to_string_pretty(module)
                .context("Failed to serialize syntax tree")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Discover all serialized trees below `src_dir`
pub fn discover_files(src_dir: &Path) -> Result<Vec<PathBuf>> {
    if !src_dir.is_dir() {
        anyhow::bail!("Source directory '{}' not found", src_dir.display());
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(src_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_ast = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|name| name.ends_with(AST_EXTENSION))
            .unwrap_or(false);

        if path.is_file() && is_ast {
            files.push(path.to_path_buf());
        }
    }

    if files.is_empty() {
        anyhow::bail!("No {} files found in {}", AST_EXTENSION, src_dir.display());
    }

    // Sort for deterministic output order
    files.sort();
    Ok(files)
}

/// `src/components/Button.ast.json` -> `<out>/components/Button.js`
pub fn output_path(src_dir: &Path, output_dir: &Path, file: &Path, format: EmitFormat) -> PathBuf {
    let relative = file.strip_prefix(src_dir).unwrap_or(file);
    let file_name = relative
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let stem = file_name.strip_suffix(AST_EXTENSION).unwrap_or(file_name);
    let extension = match format {
        EmitFormat::Code => "js",
        EmitFormat::Json => "json",
    };

    let target = output_dir.join(relative);
    target.with_file_name(format!("{}.{}", stem, extension))
}

/// Core batch pipeline
///
/// Every file goes through the same `HoistPass` with a fresh registry.
/// A failing file is recorded and the rest still run.
pub fn execute_batch(src_dir: &Path, config: &Config) -> Result<BatchResult> {
    let output_dir = Path::new(&config.output.dir);
    fs::create_dir_all(output_dir)
        .context("Failed to create output directory")?;

    let files = discover_files(src_dir)
        .context("Failed to discover source files")?;

    let pass = HoistPass::new(config.options()?);
    let resolver = config.build_resolver();

    let mut errors = Vec::new();
    let mut success_count = 0;
    let mut values_hoisted = 0;

    for file in &files {
        match transform_file(&pass, resolver.as_ref(), src_dir, output_dir, file, config.output.emit) {
            Ok(hoisted) => {
                success_count += 1;
                values_hoisted += hoisted;
            }
            Err(e) => errors.push(BatchError {
                file: file.clone(),
                message: format!("{:#}", e),
            }),
        }
    }

    info!(
        files = success_count,
        hoisted = values_hoisted,
        errors = errors.len(),
        "batch finished"
    );

    Ok(BatchResult {
        files_transformed: success_count,
        values_hoisted,
        output_dir: output_dir.to_path_buf(),
        errors,
    })
}

fn transform_file(
    pass: &HoistPass,
    resolver: &dyn Resolver,
    src_dir: &Path,
    output_dir: &Path,
    file: &Path,
    format: EmitFormat,
) -> Result<usize> {
    let module = read_module(file)?;
    let transformed = pass.run(module, resolver);
    let rendered = render(&transformed.module, format)?;

    let target = output_path(src_dir, output_dir, file, format);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .context(format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&target, rendered)
        .context(format!("Failed to write {}", target.display()))?;

    debug!(
        file = %file.display(),
        output = %target.display(),
        hoisted = transformed.hoisted.len(),
        "file written"
    );
    Ok(transformed.hoisted.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_keeps_subdirectories() {
        let path = output_path(
            Path::new("src"),
            Path::new("build"),
            Path::new("src/components/Button.ast.json"),
            EmitFormat::Code,
        );
        assert_eq!(path, PathBuf::from("build/components/Button.js"));

        let path = output_path(
            Path::new("src"),
            Path::new("build"),
            Path::new("src/App.ast.json"),
            EmitFormat::Json,
        );
        assert_eq!(path, PathBuf::from("build/App.json"));
    }

    #[test]
    fn test_render_json_round_trips() {
        let module = Module::default();
        let json = render(&module, EmitFormat::Json).unwrap();
        let back: Module = serde_json::from_str(&json).unwrap();
        assert_eq!(back, module);
    }
}
