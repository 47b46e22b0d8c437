//! Decoder for the decompressed model payload.
//!
//! # Layout
//! ```text
//! aabb            6 × f32 (min.xyz, max.xyz)
//! skeleton        i32 count; count × { cstr name; i32 parent; i32 type; mat4 }
//! animations      i32 count; count × { cstr name; f32 duration; f32 tps;
//!                   i32 joints; joints × { mat4;
//!                     i32 n; n × (t, x, y, z);
//!                     i32 n; n × (t, w, x, y, z);
//!                     i32 n; n × (t, s) } }
//! units           four lists in order: straight, straight_joint, indexed,
//!                 indexed_joint; each i32 count; count × { cstr name;
//!                 material; mesh }
//! material        f32 roughness; f32 metallic; bool8 alpha_blend;
//!                 cstr albedo, roughness, metallic, normal
//! ```
//!
//! Matrices are 16 row-major f32. The payload must be consumed exactly.

use glam::{IVec4, Quat, Vec4};

use crate::codec::BufferCursor;
use crate::compression::unzip;
use crate::error::ModelError;
use crate::types::{
    Aabb3, AnimJoint, Animation, IndexedMesh, JointType, Material, MeshStraight,
    MeshStraightJoint, Model, NUM_JOINTS_PER_VERTEX, RenderUnit, SkelJoint, Skeleton, Vertex,
    VertexJoint,
};

// Smallest possible encoding of each record, used to bound counts before
// allocating for them.
const MAT4_SIZE: usize = 64;
const JOINT_MIN_SIZE: usize = 1 + 4 + 4 + MAT4_SIZE;
const ANIMATION_MIN_SIZE: usize = 1 + 4 + 4 + 4;
const ANIM_JOINT_MIN_SIZE: usize = MAT4_SIZE + 3 * 4;
const TRANSLATE_KEY_SIZE: usize = 4 * 4;
const ROTATION_KEY_SIZE: usize = 5 * 4;
const SCALE_KEY_SIZE: usize = 2 * 4;
const MATERIAL_MIN_SIZE: usize = 4 + 4 + 1 + 4;
const UNIT_MIN_SIZE: usize = 1 + MATERIAL_MIN_SIZE + 4;
const VERTEX_SIZE: usize = (3 + 3 + 2) * 4;
const VERTEX_JOINT_SIZE: usize = VERTEX_SIZE + 2 * NUM_JOINTS_PER_VERTEX * 4;

/// Verify the container framing and inflate the payload.
pub fn unzip_dmd(framed: &[u8]) -> Result<Vec<u8>, ModelError> {
    unzip(framed)
}

/// Decode a decompressed payload into a model.
pub fn parse_dmd(payload: &[u8]) -> Result<Model, ModelError> {
    ModelParser::new(payload).parse()
}

/// Decode a framed container into a model.
pub fn parse_model(framed: &[u8]) -> Result<Model, ModelError> {
    let payload = unzip_dmd(framed)?;
    parse_dmd(&payload)
}

/// Sequential decoder over one payload.
pub struct ModelParser<'a> {
    cursor: BufferCursor<'a>,
}

impl<'a> ModelParser<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            cursor: BufferCursor::new(payload),
        }
    }

    /// Decode every section in order and require that nothing is left over.
    pub fn parse(mut self) -> Result<Model, ModelError> {
        let aabb = self.parse_aabb()?;
        let skeleton = self.parse_skeleton()?;
        let animations = self.parse_animations(&skeleton)?;
        let units_straight = self.parse_unit_list(Self::parse_mesh_straight)?;
        let units_straight_joint = self.parse_unit_list(Self::parse_mesh_straight_joint)?;
        let units_indexed = self.parse_unit_list(Self::parse_mesh_indexed)?;
        let units_indexed_joint = self.parse_unit_list(Self::parse_mesh_indexed_joint)?;

        if !self.cursor.is_at_end() {
            return Err(self.cursor.corrupted("trailing bytes after last render unit"));
        }

        tracing::debug!(
            "Parsed model: {} joints, {} animations, {}/{}/{}/{} units",
            skeleton.len(),
            animations.len(),
            units_straight.len(),
            units_straight_joint.len(),
            units_indexed.len(),
            units_indexed_joint.len()
        );

        Ok(Model {
            units_straight,
            units_straight_joint,
            units_indexed,
            units_indexed_joint,
            animations,
            skeleton,
            aabb,
        })
    }

    // ========================================================================
    // Sections
    // ========================================================================

    fn parse_aabb(&mut self) -> Result<Aabb3, ModelError> {
        let min = self.cursor.read_vec3()?;
        let max = self.cursor.read_vec3()?;
        Ok(Aabb3::new(min, max))
    }

    fn parse_skeleton(&mut self) -> Result<Skeleton, ModelError> {
        let count = self.cursor.read_count(JOINT_MIN_SIZE)?;
        let mut joints = Vec::with_capacity(count);

        for i in 0..count {
            let name = self.cursor.read_str()?;
            let parent_index = self.cursor.read_int32()?;
            let code = self.cursor.read_int32()?;
            let offset_mat = self.cursor.read_mat4()?;

            let joint_type = JointType::from_code(code).unwrap_or_else(|| {
                tracing::warn!("Joint '{}' has unknown type code {}, using basic", name, code);
                JointType::Basic
            });
            if parent_index >= 0 && parent_index as usize >= i {
                tracing::warn!(
                    "Joint '{}' ({}) refers to parent {} which does not precede it",
                    name,
                    i,
                    parent_index
                );
            }

            joints.push(SkelJoint {
                name,
                parent_index,
                joint_type,
                offset_mat,
            });
        }

        Ok(Skeleton { joints })
    }

    /// Animation joints are positional: joint `i` belongs to skeleton joint `i`
    /// and takes its name from there.
    fn parse_animations(&mut self, skeleton: &Skeleton) -> Result<Vec<Animation>, ModelError> {
        let count = self.cursor.read_count(ANIMATION_MIN_SIZE)?;
        let mut animations = Vec::with_capacity(count);

        for _ in 0..count {
            let name = self.cursor.read_str()?;
            let duration_ticks = self.cursor.read_float32()?;
            let ticks_per_second = self.cursor.read_float32()?;
            let joint_count = self.cursor.read_count(ANIM_JOINT_MIN_SIZE)?;

            if joint_count != skeleton.len() {
                tracing::debug!(
                    "Animation '{}' has {} joints for a skeleton of {}",
                    name,
                    joint_count,
                    skeleton.len()
                );
            }

            let mut joints = Vec::with_capacity(joint_count);
            for i in 0..joint_count {
                let joint_name = skeleton.joints.get(i).map(|j| j.name.clone());
                joints.push(self.parse_anim_joint(joint_name.unwrap_or_default())?);
            }

            animations.push(Animation {
                name,
                duration_ticks,
                ticks_per_second,
                joints,
            });
        }

        Ok(animations)
    }

    fn parse_anim_joint(&mut self, name: String) -> Result<AnimJoint, ModelError> {
        let mut joint = AnimJoint {
            name,
            transform: self.cursor.read_mat4()?,
            ..Default::default()
        };

        let n = self.cursor.read_count(TRANSLATE_KEY_SIZE)?;
        joint.translates.reserve(n);
        for _ in 0..n {
            let time = self.cursor.read_float32()?;
            let v = self.cursor.read_vec3()?;
            joint.translates.push((time, v));
        }

        let n = self.cursor.read_count(ROTATION_KEY_SIZE)?;
        joint.rotations.reserve(n);
        for _ in 0..n {
            let time = self.cursor.read_float32()?;
            let w = self.cursor.read_float32()?;
            let xyz = self.cursor.read_vec3()?;
            joint.rotations.push((time, Quat::from_xyzw(xyz.x, xyz.y, xyz.z, w)));
        }

        let n = self.cursor.read_count(SCALE_KEY_SIZE)?;
        joint.scales.reserve(n);
        for _ in 0..n {
            let time = self.cursor.read_float32()?;
            let s = self.cursor.read_float32()?;
            joint.scales.push((time, s));
        }

        Ok(joint)
    }

    fn parse_material(&mut self) -> Result<Material, ModelError> {
        Ok(Material {
            roughness: self.cursor.read_float32()?,
            metallic: self.cursor.read_float32()?,
            alpha_blend: self.cursor.read_bool8()?,
            albedo_map: self.cursor.read_str()?,
            roughness_map: self.cursor.read_str()?,
            metallic_map: self.cursor.read_str()?,
            normal_map: self.cursor.read_str()?,
        })
    }

    fn parse_unit_list<M>(
        &mut self,
        parse_mesh: fn(&mut Self) -> Result<M, ModelError>,
    ) -> Result<Vec<RenderUnit<M>>, ModelError> {
        let count = self.cursor.read_count(UNIT_MIN_SIZE)?;
        let mut units = Vec::with_capacity(count);

        for _ in 0..count {
            let name = self.cursor.read_str()?;
            let material = self.parse_material()?;
            let mesh = parse_mesh(self)?;
            units.push(RenderUnit {
                name,
                mesh,
                material,
            });
        }

        Ok(units)
    }

    // ========================================================================
    // Meshes
    // ========================================================================

    fn parse_mesh_straight(&mut self) -> Result<MeshStraight, ModelError> {
        let n = self.cursor.read_count(VERTEX_SIZE)?;
        Ok(MeshStraight {
            vertices: self.cursor.read_float32_array(3 * n)?,
            texcoords: self.cursor.read_float32_array(2 * n)?,
            normals: self.cursor.read_float32_array(3 * n)?,
        })
    }

    fn parse_mesh_straight_joint(&mut self) -> Result<MeshStraightJoint, ModelError> {
        let n = self.cursor.read_count(VERTEX_JOINT_SIZE)?;
        Ok(MeshStraightJoint {
            vertices: self.cursor.read_float32_array(3 * n)?,
            texcoords: self.cursor.read_float32_array(2 * n)?,
            normals: self.cursor.read_float32_array(3 * n)?,
            bone_weights: self.cursor.read_float32_array(NUM_JOINTS_PER_VERTEX * n)?,
            bone_indices: self.cursor.read_int32_array(NUM_JOINTS_PER_VERTEX * n)?,
        })
    }

    fn parse_mesh_indexed(&mut self) -> Result<IndexedMesh<Vertex>, ModelError> {
        let n = self.cursor.read_count(VERTEX_SIZE)?;
        let mut vertices = Vec::with_capacity(n);
        for _ in 0..n {
            vertices.push(Vertex {
                position: self.cursor.read_vec3()?,
                normal: self.cursor.read_vec3()?,
                uv_coords: self.cursor.read_vec2()?,
            });
        }
        let indices = self.parse_indices(n)?;
        Ok(IndexedMesh { vertices, indices })
    }

    fn parse_mesh_indexed_joint(&mut self) -> Result<IndexedMesh<VertexJoint>, ModelError> {
        let n = self.cursor.read_count(VERTEX_JOINT_SIZE)?;
        let mut vertices = Vec::with_capacity(n);
        for _ in 0..n {
            let position = self.cursor.read_vec3()?;
            let normal = self.cursor.read_vec3()?;
            let uv_coords = self.cursor.read_vec2()?;
            let weights = self.cursor.read_float32_array(NUM_JOINTS_PER_VERTEX)?;
            let indices = self.cursor.read_int32_array(NUM_JOINTS_PER_VERTEX)?;
            vertices.push(VertexJoint {
                position,
                normal,
                uv_coords,
                joint_weights: Vec4::from_slice(&weights),
                joint_indices: IVec4::from_slice(&indices),
            });
        }
        let indices = self.parse_indices(n)?;
        Ok(IndexedMesh { vertices, indices })
    }

    /// Read the index array and check every entry against the vertex count.
    fn parse_indices(&mut self, vertex_count: usize) -> Result<Vec<u32>, ModelError> {
        let count = self.cursor.read_count(4)?;
        let start = self.cursor.position();
        let raw = self.cursor.read_int32_array(count)?;

        raw.into_iter()
            .enumerate()
            .map(|(i, index)| match usize::try_from(index) {
                Ok(v) if v < vertex_count => Ok(index as u32),
                _ => Err(ModelError::CorruptedContent {
                    position: start + 4 * i,
                    total: self.cursor.len(),
                    reason: "vertex index out of range",
                }),
            })
            .collect()
    }
}
