pub mod batch;
pub mod transform;

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use crate::config::{self, Config, EmitFormat, ResolverMode};

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG: &str = "hoist.toml";

/// Command-line values that win over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub prop_filter: Option<String>,
    pub emit: Option<EmitFormat>,
    pub resolver: Option<ResolverMode>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(prop_filter) = &self.prop_filter {
            config.transform.prop_filter = prop_filter.clone();
        }
        if let Some(emit) = self.emit {
            config.output.emit = emit;
        }
        if let Some(resolver) = self.resolver {
            config.resolver.mode = resolver;
        }
    }
}

/// Load the given config, else `hoist.toml` if present, else defaults
pub fn load_or_default_config(config_path: Option<&str>) -> Result<Config> {
    match config_path {
        Some(path) => config::load_config(path),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            debug!(path = DEFAULT_CONFIG, "using config from working directory");
            config::load_config(DEFAULT_CONFIG)
        }
        None => Ok(Config::default()),
    }
}
