//! Codec and optimizer for DAL model containers (`.dmd`)
//!
//! A container is a short header followed by a zlib stream. The inflated
//! payload holds the bounding box, skeleton, animations and four lists of
//! render units (flat, flat skinned, indexed, indexed skinned).
//!
//! # Modules
//!
//! - [`codec`] - wire scalars, [`BinaryBuffer`] builder and [`BufferCursor`] reader
//! - [`compression`] - container framing around the zlib stream
//! - [`parser`] - container or payload to [`Model`]
//! - [`exporter`] - [`Model`] to payload or container
//! - [`modifier`] - vertex indexing, material merging, joint reduction
//! - [`types`] - the in-memory model graph
//!
//! # Example
//!
//! ```no_run
//! use dal_model::{export_model, modifier, parse_model};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("character.dmd")?;
//! let mut model = parse_model(&bytes)?;
//! modifier::index_model(&mut model);
//! modifier::merge_model_by_material(&mut model);
//! std::fs::write("character.opt.dmd", export_model(&model)?)?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod compression;
pub mod error;
pub mod exporter;
pub mod modifier;
pub mod parser;
pub mod types;

pub use codec::{BinaryBuffer, BufferCursor};
pub use compression::{CompressionLevel, MAGIC};
pub use error::{DecompressFailure, ModelError, ModifierError};
pub use exporter::{
    build_binary_model, export_model, export_model_with_level, zip_binary_model,
};
pub use parser::{ModelParser, parse_dmd, parse_model, unzip_dmd};
pub use types::{
    Aabb3, AnimJoint, Animation, IndexedMesh, IndexedVertex, JointType, Material, Mesh,
    MeshIndexed, MeshIndexedJoint, MeshStraight, MeshStraightJoint, Model, ModelStats,
    NUM_JOINTS_PER_VERTEX, RenderUnit, SkelJoint, Skeleton, Vertex, VertexJoint, VertexTable,
};
