//! In-memory model graph.
//!
//! - [`Model`] - owns everything below
//! - [`RenderUnit`] - named mesh plus [`Material`]
//! - flat meshes ([`MeshStraight`], [`MeshStraightJoint`]) and indexed
//!   meshes ([`MeshIndexed`], [`MeshIndexedJoint`])
//! - [`Skeleton`] and [`Animation`]

mod animation;
mod indexed;
mod material;
mod mesh;
mod model;
mod skeleton;

pub use animation::{AnimJoint, Animation};
pub use indexed::{IndexedMesh, IndexedVertex, MeshIndexed, MeshIndexedJoint, VertexTable};
pub use material::Material;
pub use mesh::{
    Mesh, MeshStraight, MeshStraightJoint, NUM_JOINTS_PER_VERTEX, RenderUnit, Vertex, VertexJoint,
};
pub use model::{Aabb3, Model, ModelStats};
pub use skeleton::{JointType, SkelJoint, Skeleton};
