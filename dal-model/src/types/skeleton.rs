//! Joint hierarchy.
//!
//! Joints are stored flat. A joint refers to its parent by index and every
//! parent precedes its children, so a single forward pass always visits a
//! parent before anything under it.

use glam::Mat4;

use crate::error::ModifierError;

/// Role of a joint in the hierarchy.
///
/// `HairRoot` and `SkirtRoot` mark "super-parents": they and every joint
/// below them always survive joint reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JointType {
    #[default]
    Basic,
    HairRoot,
    SkirtRoot,
}

impl JointType {
    /// Decode a wire code. Returns `None` for codes outside 0..=2.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Basic),
            1 => Some(Self::HairRoot),
            2 => Some(Self::SkirtRoot),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Basic => 0,
            Self::HairRoot => 1,
            Self::SkirtRoot => 2,
        }
    }

    pub fn is_super_parent(self) -> bool {
        self != Self::Basic
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkelJoint {
    pub name: String,
    /// Index of the parent joint, -1 for a root
    pub parent_index: i32,
    pub joint_type: JointType,
    pub offset_mat: Mat4,
}

impl Default for SkelJoint {
    fn default() -> Self {
        Self {
            name: String::new(),
            parent_index: -1,
            joint_type: JointType::Basic,
            offset_mat: Mat4::IDENTITY,
        }
    }
}

impl SkelJoint {
    pub fn new(name: impl Into<String>, parent_index: i32) -> Self {
        Self {
            name: name.into(),
            parent_index,
            ..Default::default()
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_index < 0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skeleton {
    pub joints: Vec<SkelJoint>,
}

impl Skeleton {
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Index of the first joint called `name`.
    pub fn find_index_by_name(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }

    pub fn is_joint_order_valid(&self) -> bool {
        self.check_joint_order().is_ok()
    }

    /// Check that every parent index is -1 or smaller than its child's index.
    pub fn check_joint_order(&self) -> Result<(), ModifierError> {
        for (i, joint) in self.joints.iter().enumerate() {
            let parent = joint.parent_index;
            if parent < -1 || (parent >= 0 && parent as usize >= i) {
                return Err(ModifierError::JointOrder { joint: i, parent });
            }
        }
        Ok(())
    }
}
