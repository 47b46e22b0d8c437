//! Indexed meshes: a buffer of unique vertices plus an index array.
//!
//! Every unique vertex appears at most once in `vertices`. Uniqueness is
//! exact float equality (`==`), never an epsilon comparison.

use std::hash::Hash;

use glam::Vec3;
use hashbrown::HashMap;
use smallvec::SmallVec;

use super::mesh::{Mesh, Vertex, VertexJoint};

/// Vertex shapes an [`IndexedMesh`] can hold.
pub trait IndexedVertex: Clone + PartialEq {
    /// Hashable image of the vertex's content.
    ///
    /// Vertices that compare `==` must produce equal keys. The converse does
    /// not hold (NaN), so keys only select candidates for an `==` check.
    type Key: Hash + Eq;

    fn content_key(&self) -> Self::Key;

    fn position(&self) -> Vec3;
}

/// Float bits with -0.0 folded into +0.0, matching float `==`.
#[inline]
fn key_bits(v: f32) -> u32 {
    (v + 0.0).to_bits()
}

impl IndexedVertex for Vertex {
    type Key = [u32; 8];

    fn content_key(&self) -> Self::Key {
        let p = self.position;
        let n = self.normal;
        let t = self.uv_coords;
        [p.x, p.y, p.z, n.x, n.y, n.z, t.x, t.y].map(key_bits)
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

impl IndexedVertex for VertexJoint {
    type Key = [u32; 16];

    fn content_key(&self) -> Self::Key {
        let p = self.position;
        let n = self.normal;
        let t = self.uv_coords;
        let w = self.joint_weights;
        let i = self.joint_indices;
        [
            key_bits(p.x),
            key_bits(p.y),
            key_bits(p.z),
            key_bits(n.x),
            key_bits(n.y),
            key_bits(n.z),
            key_bits(t.x),
            key_bits(t.y),
            key_bits(w.x),
            key_bits(w.y),
            key_bits(w.z),
            key_bits(w.w),
            i.x as u32,
            i.y as u32,
            i.z as u32,
            i.w as u32,
        ]
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

fn index_of(len: usize) -> u32 {
    u32::try_from(len).expect("indexed mesh exceeds u32 vertex indices")
}

// ============================================================================
// IndexedMesh
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

impl<V> Default for IndexedMesh<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }
}

/// Indexed mesh of unskinned vertices
pub type MeshIndexed = IndexedMesh<Vertex>;

/// Indexed mesh of skinned vertices
pub type MeshIndexedJoint = IndexedMesh<VertexJoint>;

impl<V: IndexedVertex> IndexedMesh<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from a stream of corners, deduplicating as it goes.
    pub fn from_vertices(stream: impl IntoIterator<Item = V>) -> Self {
        let mut mesh = Self::new();
        let mut table = VertexTable::new();
        for v in stream {
            let index = table.insert(&mut mesh.vertices, v);
            mesh.indices.push(index);
        }
        mesh
    }

    /// Insert one corner by linear scan over the unique vertices.
    ///
    /// Reuses the index of an equal vertex, or appends a new unique vertex.
    /// Either way one index is pushed. Returns that index.
    pub fn add_vertex(&mut self, v: V) -> u32 {
        let index = match self.vertices.iter().position(|u| *u == v) {
            Some(found) => index_of(found),
            None => {
                self.vertices.push(v);
                index_of(self.vertices.len() - 1)
            }
        };
        self.indices.push(index);
        index
    }

    /// Corner `i` resolved through the index array.
    pub fn corner(&self, i: usize) -> &V {
        &self.vertices[self.indices[i] as usize]
    }
}

impl<V: IndexedVertex> Mesh for IndexedMesh<V> {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Re-insert every corner of `other` through the dedup table, so shared
    /// vertices collapse instead of being spliced in as raw arrays.
    fn concat(&mut self, other: &Self) {
        let mut table = VertexTable::from_vertices(&self.vertices);
        self.indices.reserve(other.indices.len());
        for &i in &other.indices {
            let v = other.vertices[i as usize].clone();
            let index = table.insert(&mut self.vertices, v);
            self.indices.push(index);
        }
    }

    fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(IndexedVertex::position)
    }
}

// ============================================================================
// VertexTable
// ============================================================================

/// Hash buckets over a unique-vertex buffer.
///
/// Gives the same results as [`IndexedMesh::add_vertex`]'s linear scan while
/// only comparing vertices whose content keys collide.
pub struct VertexTable<V: IndexedVertex> {
    buckets: HashMap<V::Key, SmallVec<[u32; 1]>>,
}

impl<V: IndexedVertex> VertexTable<V> {
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }

    /// Index an existing unique-vertex buffer.
    pub fn from_vertices(vertices: &[V]) -> Self {
        let mut table = Self::new();
        table.buckets.reserve(vertices.len());
        for (i, v) in vertices.iter().enumerate() {
            table
                .buckets
                .entry(v.content_key())
                .or_default()
                .push(index_of(i));
        }
        table
    }

    /// Return the index of a vertex equal to `v`, appending `v` if none exists.
    pub fn insert(&mut self, vertices: &mut Vec<V>, v: V) -> u32 {
        let bucket = self.buckets.entry(v.content_key()).or_default();
        if let Some(&found) = bucket.iter().find(|&&i| vertices[i as usize] == v) {
            return found;
        }
        let index = index_of(vertices.len());
        vertices.push(v);
        bucket.push(index);
        index
    }
}

impl<V: IndexedVertex> Default for VertexTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec4, Vec2, Vec4};

    fn vert(x: f32) -> Vertex {
        Vertex {
            position: Vec3::new(x, 0.0, 0.0),
            normal: Vec3::Z,
            uv_coords: Vec2::new(x, x),
        }
    }

    #[test]
    fn test_add_same_vertex_twice() {
        let mut mesh = MeshIndexed::new();
        let a = mesh.add_vertex(vert(1.0));
        let b = mesh.add_vertex(vert(1.0));
        assert_eq!(a, b);
        assert_eq!(mesh.vertices.len(), 1);
        assert_eq!(mesh.indices, vec![0, 0]);

        let c = mesh.add_vertex(vert(2.0));
        assert_eq!(c, 1);
        assert_eq!(mesh.vertices.len(), 2);
    }

    #[test]
    fn test_table_matches_linear_scan() {
        let stream: Vec<Vertex> = [0.0, 1.0, 0.0, 2.0, -0.0, 1.0, 3.0, f32::NAN, f32::NAN]
            .into_iter()
            .map(vert)
            .collect();

        let mut linear = MeshIndexed::new();
        for v in &stream {
            linear.add_vertex(*v);
        }
        let hashed = MeshIndexed::from_vertices(stream.iter().copied());

        assert_eq!(linear.indices, hashed.indices);
        assert_eq!(linear.vertices.len(), hashed.vertices.len());
        // -0.0 == 0.0, so they share a vertex; NaN never equals itself.
        assert_eq!(hashed.indices[4], hashed.indices[0]);
        assert_ne!(hashed.indices[7], hashed.indices[8]);
    }

    #[test]
    fn test_joint_vertices_differ_by_influence() {
        let base = VertexJoint {
            joint_weights: Vec4::new(1.0, 0.0, 0.0, 0.0),
            joint_indices: IVec4::new(0, -1, -1, -1),
            ..Default::default()
        };
        let other = VertexJoint {
            joint_indices: IVec4::new(1, -1, -1, -1),
            ..base
        };
        let mesh = MeshIndexedJoint::from_vertices([base, other, base]);
        assert_eq!(mesh.vertices.len(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 0]);
    }

    #[test]
    fn test_indexed_concat_dedups_and_preserves_index_count() {
        let mut a = MeshIndexed::from_vertices([vert(0.0), vert(1.0), vert(2.0)]);
        let b = MeshIndexed::from_vertices([vert(2.0), vert(3.0), vert(2.0)]);
        a.concat(&b);

        assert_eq!(a.indices.len(), 6);
        assert_eq!(a.vertices.len(), 4);
        assert_eq!(a.indices[3..], [2, 3, 2]);
        for i in 0..3 {
            assert_eq!(a.corner(3 + i), b.corner(i));
        }
    }
}
