use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use walkshed_core::WalkTimeConfig;

/// Contents of the TOML run file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub walk_times: WalkTimeConfig,
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// CSV inputs; relative paths are resolved against the config file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct InputConfig {
    /// `from,to,length[,time]`
    pub edges: PathBuf,
    /// Optional `id,x,y`
    pub nodes: Option<PathBuf>,
    /// Single `id` column
    pub origins: PathBuf,
    /// Single `id` column
    pub targets: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
    /// `origin_id,target_id,trip_time`
    pub records: PathBuf,
    /// JSON run summary
    pub summary: Option<PathBuf>,
    /// Draw a progress bar over the origins
    #[serde(default = "show_progress")]
    pub progress: bool,
}

fn show_progress() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records: PathBuf::from("walk_times.csv"),
            summary: None,
            progress: show_progress(),
        }
    }
}

impl AppConfig {
    /// Parses a TOML document; paths are left as written
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML, does not match
    /// the expected layout or holds invalid walk time parameters
    pub fn from_toml(document: &str) -> Result<Self> {
        let config: Self = toml::from_str(document).context("Invalid configuration file")?;
        config.walk_times.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        resolve(&mut self.input.edges);
        if let Some(nodes) = self.input.nodes.as_mut() {
            resolve(nodes);
        }
        resolve(&mut self.input.origins);
        resolve(&mut self.input.targets);
        resolve(&mut self.output.records);
        if let Some(summary) = self.output.summary.as_mut() {
            resolve(summary);
        }
    }
}

/// Loads the run file at `path` and resolves relative paths against its
/// directory
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let document = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let mut config = AppConfig::from_toml(&document)
        .with_context(|| format!("Failed to load config file '{}'", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.resolve_paths(base);
    Ok(config)
}
