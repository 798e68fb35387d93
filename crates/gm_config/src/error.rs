// crates/gm_config/src/error.rs

//! 配置层错误类型

use gm_foundation::GmError;

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 配置键
        key: String,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },

    /// 下层选项校验失败
    #[error("配置段 '{section}' 无效: {source}")]
    Section {
        /// 配置段名
        section: &'static str,
        /// 下层错误
        #[source]
        source: GmError,
    },
}

impl ConfigError {
    /// 无效值
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// 包装下层校验错误
    pub fn section(section: &'static str, source: GmError) -> Self {
        Self::Section { section, source }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<ConfigError> for GmError {
    fn from(err: ConfigError) -> Self {
        GmError::config(err.to_string())
    }
}
