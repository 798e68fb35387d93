// crates/gm_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `GmError` 枚举和 `GmResult` 类型别名，用于整个工作区的错误处理。
//!
//! # 错误分类
//!
//! 1. **退化几何**（重合点、零面积面）不是错误，由核函数返回零贡献
//! 2. **前置条件违规**（数组长度不匹配、缺失数据键、网格数不足、边界不闭合）立即返回错误
//! 3. **未实现路径**（3D 网格生成等）返回 [`GmError::NotImplemented`]
//!
//! 求和型计算中任何一项失败都必须中止整批计算，不允许跳过。
//!
//! # 示例
//!
//! ```
//! use gm_foundation::error::{GmError, GmResult};
//!
//! fn read_density(value: f64) -> GmResult<f64> {
//!     GmError::check_finite("density", value)?;
//!     Ok(value)
//! }
//!
//! assert!(read_density(f64::NAN).is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type GmResult<T> = Result<T, GmError>;

/// GravMag 错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GmError {
    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数据超出范围
    #[error("数据超出范围: {field}={value}, 期望范围=[{min}, {max}]")]
    OutOfRange {
        /// 字段名
        field: &'static str,
        /// 实际值
        value: f64,
        /// 最小允许值
        min: f64,
        /// 最大允许值
        max: f64,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 无效网格拓扑
    #[error("无效的网格: {message}")]
    InvalidMesh {
        /// 具体错误信息
        message: String,
    },

    /// 缺失的数据键
    #[error("缺失数据键: '{key}' ({context})")]
    MissingData {
        /// 数据名称
        key: String,
        /// 发生位置
        context: String,
    },

    /// 计算结果非有限
    #[error("非有限数值: {name}={value}")]
    NonFinite {
        /// 数值名称
        name: String,
        /// 非法值
        value: f64,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 验证失败
    #[error("验证失败: {0}")]
    Validation(String),

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },

    /// 功能未实现
    #[error("功能未实现: {feature}")]
    NotImplemented {
        /// 未实现的功能描述
        feature: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl GmError {
    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数据超出范围
    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 无效网格
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// 缺失数据键
    pub fn missing_data(key: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingData {
            key: key.into(),
            context: context.into(),
        }
    }

    /// 非有限数值
    pub fn non_finite(name: impl Into<String>, value: f64) -> Self {
        Self::NonFinite {
            name: name.into(),
            value,
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// 功能未实现
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        Self::NotImplemented {
            feature: feature.into(),
        }
    }

    // ========================================================================
    // 检查辅助
    // ========================================================================

    /// 检查数组大小
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> GmResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查值是否在范围内
    #[inline]
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> GmResult<()> {
        if value < min || value > max || value.is_nan() {
            Err(Self::out_of_range(field, value, min, max))
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> GmResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(index_type, index, len))
        } else {
            Ok(())
        }
    }

    /// 检查数值有限（非 NaN、非 Inf）
    #[inline]
    pub fn check_finite(name: &str, value: f64) -> GmResult<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Self::non_finite(name, value))
        }
    }
}

// ========================================================================
// 宏
// ========================================================================

/// 条件不满足时提前返回错误
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err.into());
        }
    };
}

/// 从 `Option` 取值，`None` 时提前返回错误
#[macro_export]
macro_rules! require {
    ($opt:expr, $err:expr $(,)?) => {
        match $opt {
            Some(value) => value,
            None => return Err($err.into()),
        }
    };
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GmError::config("测试配置错误");
        assert!(err.to_string().contains("配置错误"));
    }

    #[test]
    fn test_missing_data_display() {
        let err = GmError::missing_data("resistivity", "merge_two_meshes");
        let msg = err.to_string();
        assert!(msg.contains("resistivity"));
        assert!(msg.contains("merge_two_meshes"));
    }

    #[test]
    fn test_index_out_of_bounds() {
        let err = GmError::index_out_of_bounds("Node", 10, 5);
        assert!(err.to_string().contains("Node"));
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("5"));
    }

    #[test]
    fn test_check_size() {
        assert!(GmError::check_size("test", 10, 10).is_ok());
        assert!(GmError::check_size("test", 10, 5).is_err());
    }

    #[test]
    fn test_check_range() {
        assert!(GmError::check_range("value", 5.0, 0.0, 10.0).is_ok());
        assert!(GmError::check_range("value", -1.0, 0.0, 10.0).is_err());
        assert!(GmError::check_range("value", f64::NAN, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_check_index() {
        assert!(GmError::check_index("Cell", 5, 10).is_ok());
        assert!(GmError::check_index("Cell", 10, 10).is_err());
    }

    #[test]
    fn test_check_finite() {
        assert!(GmError::check_finite("g", 1.0).is_ok());
        assert!(matches!(
            GmError::check_finite("g", f64::INFINITY),
            Err(GmError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: i32) -> GmResult<()> {
            ensure!(value > 0, GmError::invalid_input("value must be positive"));
            Ok(())
        }

        assert!(check(1).is_ok());
        assert!(check(-1).is_err());
    }

    #[test]
    fn test_require_macro() {
        fn get_value(opt: Option<i32>) -> GmResult<i32> {
            let v = require!(opt, GmError::missing_data("value", "test"));
            Ok(v)
        }

        assert_eq!(get_value(Some(42)).unwrap(), 42);
        assert!(get_value(None).is_err());
    }
}
