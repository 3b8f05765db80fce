//! Compiler configuration.
//!
//! Loaded from TOML. Discovery checks `./qast.toml`, then
//! `<config dir>/qast/config.toml`, and falls back to defaults.
//!
//! ```toml
//! max_filter_depth = 64
//! max_filter_nodes = 10000
//! strict_field_refs = true
//! honor_condition_operators = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QastError, QastResult};
use crate::filter::{DEFAULT_MAX_DEPTH, FilterCompiler};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "qast.toml";

/// Settings for a [`crate::QueryCompiler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Deepest filter group nesting accepted.
    pub max_filter_depth: usize,
    /// Upper bound on filter groups plus conditions.
    pub max_filter_nodes: Option<usize>,
    /// Reject malformed field references instead of resolving them best-effort.
    pub strict_field_refs: bool,
    /// Compile each condition with its declared operator rather than `=`.
    pub honor_condition_operators: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_filter_depth: DEFAULT_MAX_DEPTH,
            max_filter_nodes: None,
            strict_field_refs: false,
            honor_condition_operators: false,
        }
    }
}

impl CompilerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CompilerConfigBuilder {
        CompilerConfigBuilder::default()
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> QastResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| QastError::Config(format!("Failed to parse config: {}", e)))?;
        config.check()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> QastResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            QastError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!("Loaded compiler config from {}", path.display());
        Ok(config)
    }

    /// Load the first config file found in the standard locations, or defaults.
    pub fn discover() -> QastResult<Self> {
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Candidate config files, highest priority first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("qast").join("config.toml"));
        }
        paths
    }

    /// The filter compiler these settings describe.
    pub fn filter_compiler(&self) -> FilterCompiler {
        FilterCompiler {
            max_depth: self.max_filter_depth,
            max_nodes: self.max_filter_nodes,
            honor_operators: self.honor_condition_operators,
        }
    }

    fn check(&self) -> QastResult<()> {
        if self.max_filter_depth == 0 {
            return Err(QastError::Config(
                "max_filter_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`CompilerConfig`].
#[derive(Debug, Default)]
pub struct CompilerConfigBuilder {
    config: CompilerConfig,
}

impl CompilerConfigBuilder {
    pub fn max_filter_depth(mut self, depth: usize) -> Self {
        self.config.max_filter_depth = depth;
        self
    }

    pub fn max_filter_nodes(mut self, nodes: usize) -> Self {
        self.config.max_filter_nodes = Some(nodes);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict_field_refs = strict;
        self
    }

    pub fn honor_operators(mut self, honor: bool) -> Self {
        self.config.honor_condition_operators = honor;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CompilerConfig {
        self.config
    }
}
