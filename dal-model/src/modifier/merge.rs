//! Merging render units that share a material.

use crate::types::{Mesh, Model, RenderUnit};

/// Concatenate units with equal materials, keeping first-occurrence order.
///
/// Alpha-blended units are never merged and pass through unchanged at their
/// position in the output. Every other unit is folded into the first earlier
/// output unit with an equal material, or starts a new one. A merged unit
/// keeps the name of the unit that started it.
pub fn merge_by_material<M: Mesh>(units: Vec<RenderUnit<M>>) -> Vec<RenderUnit<M>> {
    let mut output: Vec<RenderUnit<M>> = Vec::with_capacity(units.len());

    for unit in units {
        if unit.material.alpha_blend {
            output.push(unit);
            continue;
        }

        let target = output
            .iter_mut()
            .find(|u| !u.material.alpha_blend && u.material == unit.material);
        match target {
            Some(target) => {
                tracing::debug!("Merging unit '{}' into '{}'", unit.name, target.name);
                target.mesh.concat(&unit.mesh);
            }
            None => output.push(unit),
        }
    }

    output
}

/// Apply [`merge_by_material`] to each unit list of the model.
pub fn merge_model_by_material(model: &mut Model) {
    let before = model.unit_count();

    model.units_straight = merge_by_material(std::mem::take(&mut model.units_straight));
    model.units_straight_joint = merge_by_material(std::mem::take(&mut model.units_straight_joint));
    model.units_indexed = merge_by_material(std::mem::take(&mut model.units_indexed));
    model.units_indexed_joint = merge_by_material(std::mem::take(&mut model.units_indexed_joint));

    tracing::debug!("Merged render units: {} -> {}", before, model.unit_count());
}
