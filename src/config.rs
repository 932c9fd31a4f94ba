use anyhow::Result;
use clap::ValueEnum;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

use crate::hoist::ast::Declaration;
use crate::hoist::resolver::{AnnotatedResolver, Resolver, TableResolver};
use crate::hoist::Options;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TransformConfig {
    #[serde(default = "default_prop_filter")]
    pub prop_filter: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            prop_filter: default_prop_filter(),
        }
    }
}

fn default_prop_filter() -> String {
    ".*".to_string()
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmitFormat {
    #[default]
    Code,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default)]
    pub emit: EmitFormat,
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            emit: EmitFormat::default(),
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "build".to_string()
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResolverMode {
    /// Use the classification the front end attached to each identifier
    #[default]
    Annotated,
    /// Look names up in `[resolver.declarations]`
    Table,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ResolverConfig {
    #[serde(default)]
    pub mode: ResolverMode,
    #[serde(default)]
    pub declarations: HashMap<String, Declaration>,
}

impl Config {
    pub fn options(&self) -> Result<Options> {
        Options::with_prop_filter(&self.transform.prop_filter).map_err(|e| {
            anyhow::anyhow!(
                "invalid prop_filter `{}`: {}",
                self.transform.prop_filter,
                e
            )
        })
    }

    pub fn build_resolver(&self) -> Box<dyn Resolver> {
        match self.resolver.mode {
            ResolverMode::Annotated => Box::new(AnnotatedResolver),
            ResolverMode::Table => Box::new(TableResolver::from(self.resolver.declarations.clone())),
        }
    }
}

/// Load and parse a hoist.toml configuration file
pub fn load_config(path: &str) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("could not find `{}`", path)
            } else {
                anyhow::anyhow!("failed to read `{}`: {}", path, e)
            }
        })?;

    let config = parse_config(&content)
        .map_err(|e| anyhow::anyhow!("failed to parse `{}`: {}", path, e))?;

    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;

    // Reject a bad filter now rather than on the first file
    config.options()?;

    Ok(config)
}
