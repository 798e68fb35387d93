// crates/gm_mesh/src/merge.rs

//! 网格合并
//!
//! 合并结果是新网格：先复制第一个网格，再追加第二个网格的单元和边界，
//! 位置重合的节点被复用。单元数据按 "a 的值在前, b 的值在后" 拼接，
//! 两个网格必须拥有相同的数据键集合。

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::node_index::NodeIndex;
use gm_foundation::error::{GmError, GmResult};

/// 节点重合判据 [m]
pub const MERGE_NODE_TOLERANCE: f64 = 1e-9;

/// 合并两个网格
///
/// # 错误
/// - 维度不同: [`GmError::InvalidMesh`]
/// - 任一数据键只存在于一个网格: [`GmError::MissingData`]
pub fn merge_two_meshes(a: &Mesh, b: &Mesh) -> GmResult<Mesh> {
    if a.dimension() != b.dimension() {
        return Err(
            MeshError::dimension_mismatch("merge_two_meshes", a.dimension(), b.dimension()).into(),
        );
    }
    for key in a.data().names() {
        if !b.data().contains(key) {
            return Err(GmError::missing_data(key, "merge_two_meshes: 第二个网格缺少该数据"));
        }
    }
    for key in b.data().names() {
        if !a.data().contains(key) {
            return Err(GmError::missing_data(key, "merge_two_meshes: 第一个网格缺少该数据"));
        }
    }

    let mut out = a.clone_geometry();
    let mut index = NodeIndex::from_positions(a.nodes().iter().map(|n| &n.pos), MERGE_NODE_TOLERANCE);

    let node_map: Vec<usize> = b
        .nodes()
        .iter()
        .map(|node| match index.find(node.pos) {
            Some(id) => id,
            None => {
                let id = out.create_node(node.pos, node.marker);
                index.insert(node.pos, id);
                id
            }
        })
        .collect();

    for cell in b.cells() {
        let nodes = cell.nodes.iter().map(|&i| node_map[i]).collect();
        out.create_cell(nodes, cell.marker)?;
    }
    for boundary in b.boundaries() {
        let nodes = boundary.nodes.iter().map(|&i| node_map[i]).collect();
        out.create_boundary(nodes, boundary.marker)?;
    }

    out.reset_data();
    for key in a.data().names() {
        let (Some(va), Some(vb)) = (a.data().get(key), b.data().get(key)) else {
            return Err(GmError::internal(format!("数据键 '{key}' 在校验后消失")));
        };
        let mut values = Vec::with_capacity(va.len() + vb.len());
        values.extend_from_slice(va);
        values.extend_from_slice(vb);
        out.set_cell_data(key, values)?;
    }

    log::debug!(
        "merge_two_meshes: {}+{} 单元 -> {} 单元, {} 节点",
        a.cell_count(),
        b.cell_count(),
        out.cell_count(),
        out.node_count()
    );
    Ok(out)
}

/// 合并多个网格（至少两个），逐对折叠
///
/// # 错误
/// 网格少于两个: [`GmError::InvalidInput`]
pub fn merge_meshes(meshes: &[Mesh]) -> GmResult<Mesh> {
    match meshes {
        [first, second, rest @ ..] => {
            let mut merged = merge_two_meshes(first, second)?;
            for mesh in rest {
                merged = merge_two_meshes(&merged, mesh)?;
            }
            Ok(merged)
        }
        _ => Err(GmError::invalid_input(format!(
            "merge_meshes 至少需要两个网格, 实际 {}",
            meshes.len()
        ))),
    }
}
