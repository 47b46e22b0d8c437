//! Encoder producing the payload layout described in [`crate::parser`].
//!
//! Every `append_*` here has a matching read in the parser, in the same
//! order. Building never fails; only compression can.

use crate::codec::BinaryBuffer;
use crate::compression::{CompressionLevel, zip_with_level};
use crate::error::ModelError;
use crate::types::{
    Aabb3, AnimJoint, Animation, IndexedMesh, Material, MeshStraight, MeshStraightJoint, Model,
    RenderUnit, Skeleton, Vertex, VertexJoint,
};

/// Encode a model into an uncompressed payload.
pub fn build_binary_model(model: &Model) -> BinaryBuffer {
    let mut output = BinaryBuffer::new();

    append_aabb(&mut output, &model.aabb);
    append_skeleton(&mut output, &model.skeleton);
    append_animations(&mut output, &model.animations, &model.skeleton);
    append_unit_list(&mut output, &model.units_straight, append_mesh_straight);
    append_unit_list(&mut output, &model.units_straight_joint, append_mesh_straight_joint);
    append_unit_list(&mut output, &model.units_indexed, append_mesh_indexed);
    append_unit_list(&mut output, &model.units_indexed_joint, append_mesh_indexed_joint);

    tracing::debug!("Built model payload of {} bytes", output.len());
    output
}

/// Frame an uncompressed payload into a container.
pub fn zip_binary_model(
    payload: &BinaryBuffer,
    level: CompressionLevel,
) -> Result<Vec<u8>, ModelError> {
    zip_with_level(payload.data(), level)
}

/// Encode and compress a model with the default compression level.
pub fn export_model(model: &Model) -> Result<Vec<u8>, ModelError> {
    export_model_with_level(model, CompressionLevel::default())
}

pub fn export_model_with_level(
    model: &Model,
    level: CompressionLevel,
) -> Result<Vec<u8>, ModelError> {
    let payload = build_binary_model(model);
    zip_binary_model(&payload, level)
}

// ============================================================================
// Sections
// ============================================================================

fn append_aabb(output: &mut BinaryBuffer, aabb: &Aabb3) {
    output.append_vec3(aabb.min);
    output.append_vec3(aabb.max);
}

fn append_skeleton(output: &mut BinaryBuffer, skeleton: &Skeleton) {
    output.append_count(skeleton.joints.len());
    for joint in &skeleton.joints {
        output.append_str(&joint.name);
        output.append_int32(joint.parent_index);
        output.append_int32(joint.joint_type.code());
        output.append_mat4(&joint.offset_mat);
    }
}

/// Animation joints are written in stored order. The reader pairs them with
/// skeleton joints by position.
fn append_animations(output: &mut BinaryBuffer, animations: &[Animation], skeleton: &Skeleton) {
    output.append_count(animations.len());
    for anim in animations {
        output.append_str(&anim.name);
        output.append_float32(anim.duration_ticks);
        output.append_float32(anim.ticks_per_second);
        output.append_count(anim.joints.len());

        for (i, joint) in anim.joints.iter().enumerate() {
            match skeleton.joints.get(i) {
                Some(skel) if skel.name != joint.name => {
                    tracing::warn!(
                        "Animation '{}' joint {} is '{}' but skeleton joint {} is '{}'",
                        anim.name,
                        i,
                        joint.name,
                        i,
                        skel.name
                    );
                }
                _ => {}
            }
            append_anim_joint(output, joint);
        }
    }
}

fn append_anim_joint(output: &mut BinaryBuffer, joint: &AnimJoint) {
    output.append_mat4(&joint.transform);

    output.append_count(joint.translates.len());
    for &(time, v) in &joint.translates {
        output.append_float32(time);
        output.append_vec3(v);
    }

    output.append_count(joint.rotations.len());
    for &(time, q) in &joint.rotations {
        output.append_float32(time);
        output.append_float32(q.w);
        output.append_float32(q.x);
        output.append_float32(q.y);
        output.append_float32(q.z);
    }

    output.append_count(joint.scales.len());
    for &(time, s) in &joint.scales {
        output.append_float32(time);
        output.append_float32(s);
    }
}

fn append_material(output: &mut BinaryBuffer, material: &Material) {
    output.append_float32(material.roughness);
    output.append_float32(material.metallic);
    output.append_bool8(material.alpha_blend);
    output.append_str(&material.albedo_map);
    output.append_str(&material.roughness_map);
    output.append_str(&material.metallic_map);
    output.append_str(&material.normal_map);
}

fn append_unit_list<M>(
    output: &mut BinaryBuffer,
    units: &[RenderUnit<M>],
    append_mesh: fn(&mut BinaryBuffer, &M),
) {
    output.append_count(units.len());
    for unit in units {
        output.append_str(&unit.name);
        append_material(output, &unit.material);
        append_mesh(output, &unit.mesh);
    }
}

// ============================================================================
// Meshes
// ============================================================================

fn append_mesh_straight(output: &mut BinaryBuffer, mesh: &MeshStraight) {
    debug_assert!(mesh.is_consistent(), "flat mesh arrays disagree on vertex count");
    output.append_count(mesh.vertices.len() / 3);
    output.append_float32_array(&mesh.vertices);
    output.append_float32_array(&mesh.texcoords);
    output.append_float32_array(&mesh.normals);
}

fn append_mesh_straight_joint(output: &mut BinaryBuffer, mesh: &MeshStraightJoint) {
    debug_assert!(mesh.is_consistent(), "flat mesh arrays disagree on vertex count");
    output.append_count(mesh.vertices.len() / 3);
    output.append_float32_array(&mesh.vertices);
    output.append_float32_array(&mesh.texcoords);
    output.append_float32_array(&mesh.normals);
    output.append_float32_array(&mesh.bone_weights);
    output.append_int32_array(&mesh.bone_indices);
}

fn append_mesh_indexed(output: &mut BinaryBuffer, mesh: &IndexedMesh<Vertex>) {
    output.append_count(mesh.vertices.len());
    for v in &mesh.vertices {
        output.append_vec3(v.position);
        output.append_vec3(v.normal);
        output.append_vec2(v.uv_coords);
    }
    append_indices(output, &mesh.indices);
}

fn append_mesh_indexed_joint(output: &mut BinaryBuffer, mesh: &IndexedMesh<VertexJoint>) {
    output.append_count(mesh.vertices.len());
    for v in &mesh.vertices {
        output.append_vec3(v.position);
        output.append_vec3(v.normal);
        output.append_vec2(v.uv_coords);
        output.append_float32_array(&v.joint_weights.to_array());
        output.append_int32_array(&v.joint_indices.to_array());
    }
    append_indices(output, &mesh.indices);
}

fn append_indices(output: &mut BinaryBuffer, indices: &[u32]) {
    output.append_count(indices.len());
    for &index in indices {
        output.append_int32(index as i32);
    }
}
