//! Surface material attached to every render unit.

/// PBR material description.
///
/// Map paths are empty when unset. Equality compares every field exactly and
/// is what merge-by-material uses to decide which units share a material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub albedo_map: String,
    pub roughness_map: String,
    pub metallic_map: String,
    pub normal_map: String,
    pub roughness: f32,
    pub metallic: f32,
    /// Alpha-blended units are never merged with anything.
    pub alpha_blend: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo_map: String::new(),
            roughness_map: String::new(),
            metallic_map: String::new(),
            normal_map: String::new(),
            roughness: 0.5,
            metallic: 1.0,
            alpha_blend: false,
        }
    }
}
