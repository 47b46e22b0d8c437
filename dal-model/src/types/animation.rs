//! Keyframe animations.
//!
//! Animation joints are matched to skeleton joints by name, never by index.
//! Tracks are sparse: each one holds only the keyframes that were authored.

use glam::{Mat4, Quat, Vec3};

/// Per-joint keyframe tracks of one animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimJoint {
    pub name: String,
    /// Legacy transform, carried through unchanged
    pub transform: Mat4,
    pub translates: Vec<(f32, Vec3)>,
    pub rotations: Vec<(f32, Quat)>,
    pub scales: Vec<(f32, f32)>,
}

impl Default for AnimJoint {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Mat4::IDENTITY,
            translates: Vec::new(),
            rotations: Vec::new(),
            scales: Vec::new(),
        }
    }
}

impl AnimJoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_translate(&mut self, time: f32, x: f32, y: f32, z: f32) {
        self.translates.push((time, Vec3::new(x, y, z)));
    }

    /// Add a rotation keyframe. Components are given w first, as on the wire.
    pub fn add_rotation(&mut self, time: f32, w: f32, x: f32, y: f32, z: f32) {
        self.rotations.push((time, Quat::from_xyzw(x, y, z, w)));
    }

    pub fn add_scale(&mut self, time: f32, scale: f32) {
        self.scales.push((time, scale));
    }

    /// True when no track has a keyframe, so the joint contributes no motion.
    pub fn is_identity(&self) -> bool {
        self.translates.is_empty() && self.rotations.is_empty() && self.scales.is_empty()
    }

    pub fn keyframe_count(&self) -> usize {
        self.translates.len() + self.rotations.len() + self.scales.len()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Animation {
    pub name: String,
    pub duration_ticks: f32,
    pub ticks_per_second: f32,
    pub joints: Vec<AnimJoint>,
}

impl Animation {
    pub fn find_joint(&self, name: &str) -> Option<&AnimJoint> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// Length in seconds, or zero when the tick rate is unset.
    pub fn duration_seconds(&self) -> f32 {
        if self.ticks_per_second > 0.0 {
            self.duration_ticks / self.ticks_per_second
        } else {
            0.0
        }
    }
}
