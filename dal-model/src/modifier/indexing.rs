//! Flat to indexed mesh conversion.

use crate::types::{
    MeshIndexed, MeshIndexedJoint, MeshStraight, MeshStraightJoint, Model, RenderUnit,
};

/// Deduplicate a flat mesh into an indexed one.
///
/// The result has one index per flat vertex and at most one copy of each
/// distinct vertex, with indices referring to first occurrences.
pub fn convert_to_indexed(mesh: &MeshStraight) -> MeshIndexed {
    debug_assert!(mesh.is_consistent(), "flat mesh arrays disagree on vertex count");
    let n = mesh.vertices.len() / 3;
    MeshIndexed::from_vertices((0..n).map(|i| mesh.vertex(i)))
}

/// Deduplicate a flat skinned mesh. Joint data takes part in equality.
pub fn convert_to_indexed_joint(mesh: &MeshStraightJoint) -> MeshIndexedJoint {
    debug_assert!(mesh.is_consistent(), "flat mesh arrays disagree on vertex count");
    let n = mesh.vertices.len() / 3;
    MeshIndexedJoint::from_vertices((0..n).map(|i| mesh.vertex(i)))
}

/// Move every flat unit into the matching indexed list.
///
/// Converted units are appended after any existing indexed units, in order.
pub fn index_model(model: &mut Model) {
    let straight = std::mem::take(&mut model.units_straight);
    let straight_joint = std::mem::take(&mut model.units_straight_joint);

    let mut before = 0;
    let mut after = 0;

    for unit in straight {
        let mesh = convert_to_indexed(&unit.mesh);
        before += unit.mesh.vertices.len() / 3;
        after += mesh.vertices.len();
        model.units_indexed.push(RenderUnit {
            name: unit.name,
            mesh,
            material: unit.material,
        });
    }

    for unit in straight_joint {
        let mesh = convert_to_indexed_joint(&unit.mesh);
        before += unit.mesh.vertices.len() / 3;
        after += mesh.vertices.len();
        model.units_indexed_joint.push(RenderUnit {
            name: unit.name,
            mesh,
            material: unit.material,
        });
    }

    tracing::debug!("Indexed model: {} flat vertices -> {} unique", before, after);
}
