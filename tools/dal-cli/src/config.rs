//! Optimization pipeline settings
//!
//! Loaded from an optional TOML file. Command-line flags are merged on top.

use anyhow::{Context, Result};
use dal_model::CompressionLevel;
use serde::Deserialize;
use std::path::Path;

/// Which optimization passes to run, and how hard to compress the result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Convert flat units to indexed units
    pub index: bool,
    /// Merge units that share a material
    pub merge_by_material: bool,
    /// Drop joints without keyframes
    pub reduce_joints: bool,
    /// Recompute the bounding box from mesh positions
    pub recompute_aabb: bool,
    /// DEFLATE level, 0-9
    pub compression_level: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            index: false,
            merge_by_material: false,
            reduce_joints: false,
            recompute_aabb: false,
            compression_level: CompressionLevel::default().level(),
        }
    }
}

impl PipelineConfig {
    pub fn compression(&self) -> CompressionLevel {
        CompressionLevel::new(self.compression_level)
    }

    /// True when no pass would change the model.
    pub fn is_passthrough(&self) -> bool {
        !(self.index || self.merge_by_material || self.reduce_joints || self.recompute_aabb)
    }
}

pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pipeline config: {:?}", path))?;
    parse_config(&content).with_context(|| format!("Failed to parse pipeline config: {:?}", path))
}

pub fn parse_config(content: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig = toml::from_str(content)?;
    if config.compression_level > 9 {
        anyhow::bail!(
            "compression_level must be between 0 and 9, got {}",
            config.compression_level
        );
    }
    Ok(config)
}
