// crates/gm_config/src/gravmag_config.rs

//! GravMagConfig - 建模与正演的统一配置
//!
//! 汇总各层的选项结构，以 JSON 读写。缺省字段取各自的默认值。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use gm_foundation::tolerance::GeometryTolerance;
use gm_mesh::{GeneratorOptions, ParaGridOptions, ParaMeshOptions};
use gm_physics::gravimetry::{ForwardOptions, PhysicalConstants};

/// 统一配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravMagConfig {
    /// 物理常数
    #[serde(default)]
    pub constants: PhysicalConstants,

    /// 参数域 PLC 选项
    #[serde(default)]
    pub para_mesh: ParaMeshOptions,

    /// 参数域规则网格选项
    #[serde(default)]
    pub para_grid: ParaGridOptions,

    /// 网格生成器选项
    #[serde(default)]
    pub generator: GeneratorOptions,

    /// 是否按测点并行正演
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool { true }

impl Default for GravMagConfig {
    fn default() -> Self {
        Self {
            constants: PhysicalConstants::default(),
            para_mesh: ParaMeshOptions::default(),
            para_grid: ParaGridOptions::default(),
            generator: GeneratorOptions::default(),
            parallel: default_parallel(),
        }
    }
}

impl GravMagConfig {
    /// 从文件加载并校验
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&content)?;
        log::debug!("已加载配置: {}", path.as_ref().display());
        Ok(config)
    }

    /// 从 JSON 字符串解析并校验
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GravMagConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为格式化 JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.constants
            .validate()
            .map_err(|e| ConfigError::section("constants", e))?;
        self.para_mesh
            .validate()
            .map_err(|e| ConfigError::section("para_mesh", e))?;
        self.para_grid
            .validate()
            .map_err(|e| ConfigError::section("para_grid", e))?;
        self.generator
            .validate()
            .map_err(|e| ConfigError::section("generator", e))?;
        validate_tolerance(&self.para_mesh.tolerance)
    }

    /// 正演选项
    pub fn forward_options(&self) -> ForwardOptions {
        ForwardOptions {
            constants: self.constants,
            tolerance: self.para_mesh.tolerance,
            parallel: self.parallel,
        }
    }
}

fn validate_tolerance(tol: &GeometryTolerance) -> Result<(), ConfigError> {
    let fields = [
        ("vertical_edge", tol.vertical_edge),
        ("closing_point", tol.closing_point),
        ("depth_plane", tol.depth_plane),
        ("region_offset", tol.region_offset),
        ("node_merge", tol.node_merge),
    ];
    for (name, value) in fields {
        if !(value > 0.0) || !value.is_finite() {
            return Err(ConfigError::invalid_value(
                format!("para_mesh.tolerance.{}", name),
                value,
                "容差必须为正的有限值",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GravMagConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.parallel);
        assert_eq!(config.forward_options(), ForwardOptions::default());
    }

    #[test]
    fn test_serialize_deserialize() {
        let mut config = GravMagConfig::default();
        config.para_mesh.para_dx = 0.5;
        config.parallel = false;
        let json = config.to_json_string().unwrap();
        let parsed = GravMagConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = GravMagConfig::from_json_str(r#"{ "para_mesh": { "para_depth": 12.0 } }"#)
            .unwrap();
        assert_eq!(config.para_mesh.para_depth, 12.0);
        assert_eq!(config.para_mesh.para_dx, ParaMeshOptions::default().para_dx);
        assert_eq!(config.constants, PhysicalConstants::default());
        assert!(config.parallel);
    }

    #[test]
    fn test_invalid_tolerance() {
        let mut config = GravMagConfig::default();
        config.para_mesh.tolerance.vertical_edge = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
