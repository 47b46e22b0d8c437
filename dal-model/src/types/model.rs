//! The model graph: render units, skeleton, animations and bounding box.

use glam::Vec3;
use serde::Serialize;

use super::animation::Animation;
use super::indexed::{MeshIndexed, MeshIndexedJoint};
use super::mesh::{Mesh, MeshStraight, MeshStraightJoint, RenderUnit};
use super::skeleton::Skeleton;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb3 {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box holding exactly one point.
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    pub fn expand_to_contain(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// An owned model. Every collection belongs to exactly one parent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub units_straight: Vec<RenderUnit<MeshStraight>>,
    pub units_straight_joint: Vec<RenderUnit<MeshStraightJoint>>,
    pub units_indexed: Vec<RenderUnit<MeshIndexed>>,
    pub units_indexed_joint: Vec<RenderUnit<MeshIndexedJoint>>,
    pub animations: Vec<Animation>,
    pub skeleton: Skeleton,
    pub aabb: Aabb3,
}

fn unit_positions<M: Mesh>(units: &[RenderUnit<M>]) -> impl Iterator<Item = Vec3> + '_ {
    units.iter().flat_map(|u| u.mesh.positions())
}

fn unit_vertices<M: Mesh>(units: &[RenderUnit<M>]) -> usize {
    units.iter().map(|u| u.mesh.vertex_count()).sum()
}

impl Model {
    pub fn unit_count(&self) -> usize {
        self.units_straight.len()
            + self.units_straight_joint.len()
            + self.units_indexed.len()
            + self.units_indexed_joint.len()
    }

    /// Tight box around every mesh position, or a zero box for a model
    /// without geometry.
    pub fn compute_aabb(&self) -> Aabb3 {
        let mut points = unit_positions(&self.units_straight)
            .chain(unit_positions(&self.units_straight_joint))
            .chain(unit_positions(&self.units_indexed))
            .chain(unit_positions(&self.units_indexed_joint));

        let Some(first) = points.next() else {
            return Aabb3::default();
        };
        let mut aabb = Aabb3::from_point(first);
        for p in points {
            aabb.expand_to_contain(p);
        }
        aabb
    }

    pub fn stats(&self) -> ModelStats {
        let index_count = self
            .units_indexed
            .iter()
            .map(|u| u.mesh.indices.len())
            .chain(self.units_indexed_joint.iter().map(|u| u.mesh.indices.len()))
            .sum();

        ModelStats {
            units_straight: self.units_straight.len(),
            units_straight_joint: self.units_straight_joint.len(),
            units_indexed: self.units_indexed.len(),
            units_indexed_joint: self.units_indexed_joint.len(),
            vertex_count: unit_vertices(&self.units_straight)
                + unit_vertices(&self.units_straight_joint)
                + unit_vertices(&self.units_indexed)
                + unit_vertices(&self.units_indexed_joint),
            index_count,
            joint_count: self.skeleton.len(),
            animation_count: self.animations.len(),
            aabb_min: self.aabb.min.to_array(),
            aabb_max: self.aabb.max.to_array(),
        }
    }
}

/// Summary counts for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStats {
    pub units_straight: usize,
    pub units_straight_joint: usize,
    pub units_indexed: usize,
    pub units_indexed_joint: usize,
    pub vertex_count: usize,
    pub index_count: usize,
    pub joint_count: usize,
    pub animation_count: usize,
    pub aabb_min: [f32; 3],
    pub aabb_max: [f32; 3],
}
