//! Skeleton pruning.
//!
//! A joint survives when it is a root, lies in a super-parent subtree, or has
//! a keyframe in any animation. Every other joint is spliced out: its
//! children attach to its nearest surviving ancestor, and skinned vertices
//! that referenced it follow the same ancestor (or become -1 when none
//! survives).

use glam::IVec4;
use hashbrown::HashSet;

use crate::error::ModifierError;
use crate::types::{Model, SkelJoint, Skeleton};

/// Drop joints that carry no information and rewrite every reference to them.
///
/// Returns `Ok(false)` without touching the model when it has no animations.
/// Fails when a joint's parent does not precede it.
///
/// # Panics
///
/// Panics when a skinned vertex refers to a joint index outside the skeleton.
pub fn reduce_joints(model: &mut Model) -> Result<bool, ModifierError> {
    if model.animations.is_empty() {
        tracing::debug!("No animations, keeping all {} joints", model.skeleton.len());
        return Ok(false);
    }
    model.skeleton.check_joint_order()?;

    let keep = {
        let animated: HashSet<&str> = model
            .animations
            .iter()
            .flat_map(|anim| &anim.joints)
            .filter(|joint| !joint.is_identity())
            .map(|joint| joint.name.as_str())
            .collect();
        keep_set(&model.skeleton, &animated)
    };

    let (skeleton, remap) = rebuild_skeleton(&model.skeleton, &keep);
    let removed: HashSet<String> = model
        .skeleton
        .joints
        .iter()
        .zip(&keep)
        .filter(|&(_, &kept)| !kept)
        .map(|(joint, _)| joint.name.clone())
        .collect();

    tracing::debug!("Reducing joints: {} -> {}", model.skeleton.len(), skeleton.len());

    let new_len = skeleton.len();
    model.skeleton = skeleton;

    for anim in &mut model.animations {
        anim.joints.retain(|joint| !removed.contains(joint.name.as_str()));
    }

    for unit in &mut model.units_straight_joint {
        for index in &mut unit.mesh.bone_indices {
            *index = remap_joint_index(&remap, new_len, *index);
        }
    }
    for unit in &mut model.units_indexed_joint {
        for vertex in &mut unit.mesh.vertices {
            let indices = vertex.joint_indices.to_array();
            vertex.joint_indices =
                IVec4::from_array(indices.map(|i| remap_joint_index(&remap, new_len, i)));
        }
    }

    Ok(true)
}

/// Mark the joints that must survive. Parents are visited before children.
fn keep_set(skeleton: &Skeleton, animated: &HashSet<&str>) -> Vec<bool> {
    let count = skeleton.len();
    let mut keep = vec![false; count];
    let mut under_super_parent = vec![false; count];

    for (i, joint) in skeleton.joints.iter().enumerate() {
        let parent = usize::try_from(joint.parent_index).ok();
        under_super_parent[i] =
            joint.joint_type.is_super_parent() || parent.is_some_and(|p| under_super_parent[p]);
        keep[i] = parent.is_none()
            || under_super_parent[i]
            || animated.contains(joint.name.as_str());
    }

    keep
}

/// Build the pruned skeleton and the old-index to new-index map.
///
/// A removed joint maps to the new index of its nearest kept ancestor, or -1.
fn rebuild_skeleton(skeleton: &Skeleton, keep: &[bool]) -> (Skeleton, Vec<i32>) {
    let mut remap = vec![-1i32; skeleton.len()];
    let mut joints = Vec::with_capacity(skeleton.len());

    for (i, joint) in skeleton.joints.iter().enumerate() {
        let parent = match usize::try_from(joint.parent_index) {
            Ok(p) => remap[p],
            Err(_) => -1,
        };

        if keep[i] {
            remap[i] = joints.len() as i32;
            joints.push(SkelJoint {
                parent_index: parent,
                ..joint.clone()
            });
        } else {
            remap[i] = parent;
        }
    }

    (Skeleton { joints }, remap)
}

fn remap_joint_index(remap: &[i32], new_len: usize, index: i32) -> i32 {
    if index == -1 {
        return -1;
    }
    let new_index = usize::try_from(index)
        .ok()
        .and_then(|i| remap.get(i).copied())
        .unwrap_or_else(|| {
            panic!("skinned vertex refers to joint {index} of a {}-joint skeleton", remap.len())
        });
    assert!(
        new_index >= -1 && new_index < new_len as i32,
        "joint {index} remapped to {new_index}, outside a {new_len}-joint skeleton"
    );
    new_index
}
