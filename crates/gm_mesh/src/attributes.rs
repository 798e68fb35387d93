// crates/gm_mesh/src/attributes.rs

//! 单元数据表
//!
//! 以名称索引的单元标量场（电阻率、密度、磁化率等），每个数组长度等于网格单元数。

use crate::error::{MeshError, MeshResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 密度 [kg/m³]
pub const DATA_DENSITY: &str = "density";
/// 磁化率 [SI]
pub const DATA_SUSCEPTIBILITY: &str = "susceptibility";
/// 电阻率 [Ω·m]
pub const DATA_RESISTIVITY: &str = "resistivity";

/// 单元数据表
///
/// 名称按字典序保存，遍历顺序稳定。
///
/// # 示例
/// ```
/// use gm_mesh::attributes::{CellDataMap, DATA_DENSITY};
///
/// let mut data = CellDataMap::new(3);
/// data.set(DATA_DENSITY, vec![2670.0; 3]).unwrap();
/// assert_eq!(data.get(DATA_DENSITY).unwrap()[1], 2670.0);
/// assert!(data.set("bad", vec![1.0]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellDataMap {
    cell_count: usize,
    arrays: BTreeMap<String, Vec<f64>>,
}

impl CellDataMap {
    /// 创建空数据表
    pub fn new(cell_count: usize) -> Self {
        Self {
            cell_count,
            arrays: BTreeMap::new(),
        }
    }

    /// 期望的数组长度
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// 设置数据数组
    ///
    /// # 错误
    /// 长度与单元数不符
    pub fn set(&mut self, name: &str, values: Vec<f64>) -> MeshResult<()> {
        if values.len() != self.cell_count {
            return Err(MeshError::data_length(name, self.cell_count, values.len()));
        }
        self.arrays.insert(name.to_string(), values);
        Ok(())
    }

    /// 获取数据数组
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.arrays.get(name).map(|v| v.as_slice())
    }

    /// 获取可变数据数组
    pub fn get_mut(&mut self, name: &str) -> Option<&mut [f64]> {
        self.arrays.get_mut(name).map(|v| v.as_mut_slice())
    }

    /// 是否包含数据
    pub fn contains(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    /// 删除数据
    pub fn remove(&mut self, name: &str) -> Option<Vec<f64>> {
        self.arrays.remove(name)
    }

    /// 数据名称（字典序）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(|s| s.as_str())
    }

    /// 数据项数
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// 是否无数据
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// 追加一个单元，所有数组补 `fill`
    pub(crate) fn push_cell(&mut self, fill: f64) {
        self.cell_count += 1;
        for values in self.arrays.values_mut() {
            values.push(fill);
        }
    }

    /// 清空数据并设置新的单元数
    pub(crate) fn reset(&mut self, cell_count: usize) {
        self.cell_count = cell_count;
        self.arrays.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_cell_extends_arrays() {
        let mut data = CellDataMap::new(2);
        data.set("a", vec![1.0, 2.0]).unwrap();
        data.push_cell(0.0);
        assert_eq!(data.cell_count(), 3);
        assert_eq!(data.get("a").unwrap(), &[1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_names_sorted() {
        let mut data = CellDataMap::new(1);
        data.set("b", vec![0.0]).unwrap();
        data.set("a", vec![0.0]).unwrap();
        let names: Vec<&str> = data.names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(data.remove("a"), Some(vec![0.0]));
        assert_eq!(data.len(), 1);
    }
}
