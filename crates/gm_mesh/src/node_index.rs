// crates/gm_mesh/src/node_index.rs

//! 重合节点查找
//!
//! 基于 R-Tree 的位置索引，合并 PLC 或网格时复用距离不超过容差的已有节点。

use gm_geo::Point3D;
use rstar::primitives::GeomWithData;
use rstar::RTree;

type IndexedPoint = GeomWithData<[f64; 3], usize>;

/// 节点位置索引
#[derive(Debug, Clone)]
pub struct NodeIndex {
    tree: RTree<IndexedPoint>,
    tolerance: f64,
}

impl NodeIndex {
    /// 创建空索引
    pub fn new(tolerance: f64) -> Self {
        Self {
            tree: RTree::new(),
            tolerance,
        }
    }

    /// 从已有节点位置批量构建（编号为位置序号）
    pub fn from_positions<'a, I>(positions: I, tolerance: f64) -> Self
    where
        I: IntoIterator<Item = &'a Point3D>,
    {
        let items = positions
            .into_iter()
            .enumerate()
            .map(|(id, p)| IndexedPoint::new(p.to_array(), id))
            .collect();
        Self {
            tree: RTree::bulk_load(items),
            tolerance,
        }
    }

    /// 查找距离 `pos` 不超过容差的节点
    pub fn find(&self, pos: Point3D) -> Option<usize> {
        let r2 = self.tolerance * self.tolerance;
        self.tree
            .locate_within_distance(pos.to_array(), r2)
            .map(|item| item.data)
            .min()
    }

    /// 登记节点
    pub fn insert(&mut self, pos: Point3D, id: usize) {
        self.tree.insert(IndexedPoint::new(pos.to_array(), id));
    }

    /// 已登记节点数
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_within_tolerance() {
        let pts = vec![Point3D::new(0.0, 0.0, 0.0), Point3D::new(1.0, 0.0, 0.0)];
        let mut index = NodeIndex::from_positions(&pts, 1e-9);
        assert_eq!(index.find(Point3D::new(1.0, 5e-10, 0.0)), Some(1));
        assert_eq!(index.find(Point3D::new(1.0, 1e-6, 0.0)), None);
        index.insert(Point3D::new(2.0, 0.0, 0.0), 2);
        assert_eq!(index.find(Point3D::new(2.0, 0.0, 0.0)), Some(2));
        assert_eq!(index.len(), 3);
    }
}
