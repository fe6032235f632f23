use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::raster::{RasterLimits, DEFAULT_MAX_INLINE_SVG_BYTES, DEFAULT_MAX_RASTER_DIM};

pub const COMMAND_ENV: &str = "DWG_TO_SVG_CMD";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// External converter, e.g. `python3 /opt/convert.py {input} {output}`
    #[serde(default)]
    pub command: Option<String>,

    /// Recolor pure white geometry produced by the external converter
    #[serde(default)]
    pub normalize_colors: bool,

    /// SVG output above this size is rasterized to PNG
    #[serde(default = "default_max_inline_svg_bytes")]
    pub max_inline_svg_bytes: usize,

    #[serde(default = "default_max_raster_dim")]
    pub max_raster_dim: u32,
}

fn default_max_inline_svg_bytes() -> usize {
    DEFAULT_MAX_INLINE_SVG_BYTES
}

fn default_max_raster_dim() -> u32 {
    DEFAULT_MAX_RASTER_DIM
}

impl Default for Config {
    fn default() -> Self {
        Config {
            command: None,
            normalize_colors: false,
            max_inline_svg_bytes: DEFAULT_MAX_INLINE_SVG_BYTES,
            max_raster_dim: DEFAULT_MAX_RASTER_DIM,
        }
    }
}

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("dwgconvert.yml"));

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        Ok(config)
    }

    /// The environment variable wins over the config file; blank values count
    /// as unset.
    pub fn resolve_command(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|cmd| !cmd.trim().is_empty())
            .or_else(|| self.command.clone().filter(|cmd| !cmd.trim().is_empty()))
    }

    pub fn command_from_env(&self) -> Option<String> {
        self.resolve_command(std::env::var(COMMAND_ENV).ok())
    }

    pub fn raster_limits(&self) -> RasterLimits {
        RasterLimits {
            max_inline_svg_bytes: self.max_inline_svg_bytes,
            max_raster_dim: self.max_raster_dim,
        }
    }
}
