// crates/gm_mesh/src/error.rs
//! 网格与 PLC 处理错误类型
//!
//! 所有错误可转换为 `gm_foundation::GmError` 向上传播

use gm_foundation::GmError;
use thiserror::Error;

/// 网格模块结果类型
pub type MeshResult<T> = Result<T, MeshError>;

/// 网格错误枚举
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// 拓扑错误
    #[error("拓扑错误: {operation} 失败, {details}")]
    InvalidTopology {
        /// 出错的操作
        operation: &'static str,
        /// 详细信息
        details: String,
    },

    /// 节点编号越界
    #[error("节点编号越界: {operation} 引用节点 {node}, 节点数 {node_count}")]
    NodeOutOfRange {
        /// 出错的操作
        operation: &'static str,
        /// 引用的节点编号
        node: usize,
        /// 当前节点数
        node_count: usize,
    },

    /// 维度不匹配
    #[error("维度不匹配: {operation} 需要 {expected}D, 实际 {actual}D")]
    DimensionMismatch {
        /// 出错的操作
        operation: &'static str,
        /// 期望维度
        expected: usize,
        /// 实际维度
        actual: usize,
    },

    /// 单元数据长度不匹配
    #[error("单元数据 '{key}' 长度 {actual} 与单元数 {expected} 不符")]
    DataLength {
        /// 数据名称
        key: String,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 元素不匹配
    #[error("元素不匹配: 操作需要 {required} 个元素, 提供 {provided}")]
    ElementCountMismatch {
        /// 需要的数量
        required: usize,
        /// 实际提供
        provided: usize,
    },
}

/// 转换到 Foundation 层错误
impl From<MeshError> for GmError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::InvalidTopology { operation, details } => {
                GmError::invalid_mesh(format!("[{}] {}", operation, details))
            }
            MeshError::NodeOutOfRange {
                node, node_count, ..
            } => GmError::index_out_of_bounds("node", node, node_count),
            MeshError::DimensionMismatch {
                operation,
                expected,
                actual,
            } => GmError::invalid_mesh(format!(
                "[{}] 维度不匹配: 期望 {}D, 实际 {}D",
                operation, expected, actual
            )),
            MeshError::DataLength {
                expected, actual, ..
            } => GmError::size_mismatch("cell_data", expected, actual),
            MeshError::ElementCountMismatch { required, provided } => {
                GmError::size_mismatch("mesh_elements", required, provided)
            }
        }
    }
}

/// 便捷构造函数
impl MeshError {
    /// 拓扑错误
    pub fn invalid_topology(operation: &'static str, details: impl Into<String>) -> Self {
        Self::InvalidTopology {
            operation,
            details: details.into(),
        }
    }

    /// 节点编号越界
    pub fn node_out_of_range(operation: &'static str, node: usize, node_count: usize) -> Self {
        Self::NodeOutOfRange {
            operation,
            node,
            node_count,
        }
    }

    /// 维度不匹配
    pub fn dimension_mismatch(operation: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            operation,
            expected,
            actual,
        }
    }

    /// 单元数据长度不匹配
    pub fn data_length(key: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DataLength {
            key: key.into(),
            expected,
            actual,
        }
    }
}
