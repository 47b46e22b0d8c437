//! Mesh containers and the render unit that pairs a mesh with a material.
//!
//! Flat ("straight") meshes store one entry per triangle corner in parallel
//! float arrays. Indexed meshes live in [`super::indexed`].

use glam::{IVec4, Vec2, Vec3, Vec4};

use super::Material;

/// Number of joint influences stored per skinned vertex
pub const NUM_JOINTS_PER_VERTEX: usize = 4;

// ============================================================================
// Structured vertices
// ============================================================================

/// Unskinned vertex. Equality is exact float equality on every field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv_coords: Vec2,
}

/// Skinned vertex with four joint influences.
///
/// A joint index of -1 marks an unused influence slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexJoint {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv_coords: Vec2,
    pub joint_weights: Vec4,
    pub joint_indices: IVec4,
}

impl Default for VertexJoint {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            uv_coords: Vec2::ZERO,
            joint_weights: Vec4::ZERO,
            joint_indices: IVec4::splat(-1),
        }
    }
}

// ============================================================================
// Mesh trait
// ============================================================================

/// Operations shared by every mesh kind a render unit can hold.
pub trait Mesh: Clone {
    /// Number of vertices as the wire counts them.
    fn vertex_count(&self) -> usize;

    /// Append `other`'s geometry to this mesh.
    fn concat(&mut self, other: &Self);

    /// Every vertex position, used for bounding boxes.
    fn positions(&self) -> impl Iterator<Item = Vec3> + '_;
}

// ============================================================================
// Flat meshes
// ============================================================================

/// Flat mesh: `vertices` (3N), `texcoords` (2N), `normals` (3N).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshStraight {
    pub vertices: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub normals: Vec<f32>,
}

impl MeshStraight {
    /// Whether every array is sized for the same vertex count.
    pub fn is_consistent(&self) -> bool {
        let n = self.vertices.len() / 3;
        self.vertices.len() == 3 * n && self.texcoords.len() == 2 * n && self.normals.len() == 3 * n
    }

    /// Assemble the `i`th corner into a structured vertex.
    pub fn vertex(&self, i: usize) -> Vertex {
        Vertex {
            position: Vec3::from_slice(&self.vertices[3 * i..3 * i + 3]),
            normal: Vec3::from_slice(&self.normals[3 * i..3 * i + 3]),
            uv_coords: Vec2::from_slice(&self.texcoords[2 * i..2 * i + 2]),
        }
    }

    pub fn push_vertex(&mut self, v: &Vertex) {
        self.vertices.extend_from_slice(&v.position.to_array());
        self.texcoords.extend_from_slice(&v.uv_coords.to_array());
        self.normals.extend_from_slice(&v.normal.to_array());
    }
}

impl Mesh for MeshStraight {
    fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    fn concat(&mut self, other: &Self) {
        self.vertices.extend_from_slice(&other.vertices);
        self.texcoords.extend_from_slice(&other.texcoords);
        self.normals.extend_from_slice(&other.normals);
    }

    fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.chunks_exact(3).map(Vec3::from_slice)
    }
}

/// Flat skinned mesh: [`MeshStraight`]'s arrays plus `bone_weights` and
/// `bone_indices`, each [`NUM_JOINTS_PER_VERTEX`] × N.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshStraightJoint {
    pub vertices: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub normals: Vec<f32>,
    pub bone_weights: Vec<f32>,
    pub bone_indices: Vec<i32>,
}

impl MeshStraightJoint {
    pub fn is_consistent(&self) -> bool {
        let n = self.vertices.len() / 3;
        self.vertices.len() == 3 * n
            && self.texcoords.len() == 2 * n
            && self.normals.len() == 3 * n
            && self.bone_weights.len() == NUM_JOINTS_PER_VERTEX * n
            && self.bone_indices.len() == NUM_JOINTS_PER_VERTEX * n
    }

    pub fn vertex(&self, i: usize) -> VertexJoint {
        let j = NUM_JOINTS_PER_VERTEX * i;
        VertexJoint {
            position: Vec3::from_slice(&self.vertices[3 * i..3 * i + 3]),
            normal: Vec3::from_slice(&self.normals[3 * i..3 * i + 3]),
            uv_coords: Vec2::from_slice(&self.texcoords[2 * i..2 * i + 2]),
            joint_weights: Vec4::from_slice(&self.bone_weights[j..j + NUM_JOINTS_PER_VERTEX]),
            joint_indices: IVec4::from_slice(&self.bone_indices[j..j + NUM_JOINTS_PER_VERTEX]),
        }
    }

    pub fn push_vertex(&mut self, v: &VertexJoint) {
        self.vertices.extend_from_slice(&v.position.to_array());
        self.texcoords.extend_from_slice(&v.uv_coords.to_array());
        self.normals.extend_from_slice(&v.normal.to_array());
        self.bone_weights.extend_from_slice(&v.joint_weights.to_array());
        self.bone_indices.extend_from_slice(&v.joint_indices.to_array());
    }
}

impl Mesh for MeshStraightJoint {
    fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    fn concat(&mut self, other: &Self) {
        self.vertices.extend_from_slice(&other.vertices);
        self.texcoords.extend_from_slice(&other.texcoords);
        self.normals.extend_from_slice(&other.normals);
        self.bone_weights.extend_from_slice(&other.bone_weights);
        self.bone_indices.extend_from_slice(&other.bone_indices);
    }

    fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.chunks_exact(3).map(Vec3::from_slice)
    }
}

// ============================================================================
// Render unit
// ============================================================================

/// A named mesh drawn with one material.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderUnit<M> {
    pub name: String,
    pub mesh: M,
    pub material: Material,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshStraight {
        let mut mesh = MeshStraight::default();
        for (i, x) in [0.0, 1.0, 2.0].into_iter().enumerate() {
            mesh.push_vertex(&Vertex {
                position: Vec3::new(x, 0.0, -x),
                normal: Vec3::Y,
                uv_coords: Vec2::new(i as f32, 0.5),
            });
        }
        mesh
    }

    #[test]
    fn test_straight_vertex_assembly() {
        let mesh = triangle();
        assert!(mesh.is_consistent());
        assert_eq!(mesh.vertex_count(), 3);
        let v = mesh.vertex(2);
        assert_eq!(v.position, Vec3::new(2.0, 0.0, -2.0));
        assert_eq!(v.uv_coords, Vec2::new(2.0, 0.5));
        assert_eq!(v.normal, Vec3::Y);
    }

    #[test]
    fn test_straight_concat_appends() {
        let mut a = triangle();
        a.concat(&triangle());
        assert_eq!(a.vertex_count(), 6);
        assert!(a.is_consistent());
        assert_eq!(a.vertex(3), a.vertex(0));
    }

    #[test]
    fn test_inconsistent_straight_mesh() {
        let mut mesh = triangle();
        mesh.texcoords.pop();
        assert!(!mesh.is_consistent());
    }

    #[test]
    fn test_joint_vertex_assembly() {
        let mut mesh = MeshStraightJoint::default();
        let v = VertexJoint {
            position: Vec3::ONE,
            joint_weights: Vec4::new(0.5, 0.5, 0.0, 0.0),
            joint_indices: IVec4::new(3, 1, -1, -1),
            ..Default::default()
        };
        mesh.push_vertex(&v);
        assert!(mesh.is_consistent());
        assert_eq!(mesh.bone_indices, vec![3, 1, -1, -1]);
        assert_eq!(mesh.vertex(0), v);
        assert_eq!(mesh.positions().collect::<Vec<_>>(), vec![Vec3::ONE]);
    }
}
