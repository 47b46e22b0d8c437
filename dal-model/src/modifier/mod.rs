//! In-place optimizations over a parsed [`Model`](crate::Model).
//!
//! - [`convert_to_indexed`] / [`index_model`] - vertex deduplication
//! - [`merge_by_material`] / [`merge_model_by_material`] - render unit merging
//! - [`reduce_joints`] - skeleton pruning

mod indexing;
mod joints;
mod merge;

pub use indexing::{convert_to_indexed, convert_to_indexed_joint, index_model};
pub use joints::reduce_joints;
pub use merge::{merge_by_material, merge_model_by_material};
