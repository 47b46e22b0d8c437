//! Integration tests for the dal binary
//!
//! Tests the full pipeline: write a model -> run dal -> read the output back

use std::path::Path;
use std::process::Command;

use dal_model::{
    AnimJoint, Animation, Material, MeshStraight, MeshStraightJoint, Model, RenderUnit, SkelJoint,
    Skeleton, Vertex, VertexJoint, export_model, parse_model,
};
use glam::{IVec4, Vec2, Vec3, Vec4};
use tempfile::tempdir;

fn quad() -> Vec<Vertex> {
    [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        .into_iter()
        .map(|(x, y)| Vertex {
            position: Vec3::new(x, y, 0.0),
            normal: Vec3::Z,
            uv_coords: Vec2::new(x, y),
        })
        .collect()
}

/// Two flat units sharing a material, one skinned unit and a 3-joint chain
/// where only the root moves.
fn test_model() -> Model {
    let mut flat = MeshStraight::default();
    for v in quad() {
        flat.push_vertex(&v);
    }
    let mut skinned = MeshStraightJoint::default();
    for v in quad() {
        skinned.push_vertex(&VertexJoint {
            position: v.position,
            normal: v.normal,
            uv_coords: v.uv_coords,
            joint_weights: Vec4::new(0.5, 0.5, 0.0, 0.0),
            joint_indices: IVec4::new(1, 2, -1, -1),
        });
    }

    let material = Material {
        albedo_map: "tiles.png".into(),
        ..Default::default()
    };

    let mut root = AnimJoint::new("root");
    root.add_translate(0.0, 0.0, 1.0, 0.0);

    let mut model = Model {
        units_straight: vec![
            RenderUnit {
                name: "left".into(),
                mesh: flat.clone(),
                material: material.clone(),
            },
            RenderUnit {
                name: "right".into(),
                mesh: flat,
                material,
            },
        ],
        units_straight_joint: vec![RenderUnit {
            name: "body".into(),
            mesh: skinned,
            material: Material::default(),
        }],
        skeleton: Skeleton {
            joints: vec![
                SkelJoint::new("root", -1),
                SkelJoint::new("spine", 0),
                SkelJoint::new("neck", 1),
            ],
        },
        animations: vec![Animation {
            name: "bob".into(),
            duration_ticks: 10.0,
            ticks_per_second: 10.0,
            joints: vec![root, AnimJoint::new("spine"), AnimJoint::new("neck")],
        }],
        ..Default::default()
    };
    model.aabb = model.compute_aabb();
    model
}

fn write_model(path: &Path, model: &Model) {
    let bytes = export_model(model).expect("Failed to export model");
    std::fs::write(path, bytes).expect("Failed to write model");
}

fn read_model(path: &Path) -> Model {
    let bytes = std::fs::read(path).expect("Failed to read model");
    parse_model(&bytes).expect("Failed to parse model")
}

fn dal(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dal"))
        .args(args)
        .output()
        .expect("Failed to run dal")
}

/// Test optimize with every pass enabled through flags
#[test]
fn test_optimize_all_passes() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("model.dmd");
    let output = dir.path().join("model.opt.dmd");
    write_model(&input, &test_model());

    let result = dal(&[
        "optimize",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-i",
        "-m",
        "-r",
        "--level",
        "9",
    ]);
    assert!(result.status.success(), "dal optimize failed");

    let model = read_model(&output);
    assert!(model.units_straight.is_empty());
    assert_eq!(model.units_indexed.len(), 1);
    assert_eq!(model.units_indexed[0].mesh.vertices.len(), 4);
    assert_eq!(model.units_indexed[0].mesh.indices.len(), 12);
    assert_eq!(model.skeleton.len(), 1);

    let joints = model.units_indexed_joint[0].mesh.vertices[0].joint_indices;
    assert_eq!(joints, IVec4::new(0, 0, -1, -1));
}

/// Test that optimize without passes re-encodes the same model
#[test]
fn test_optimize_passthrough_default_output() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("plain.dmd");
    let model = test_model();
    write_model(&input, &model);

    let result = dal(&["optimize", input.to_str().unwrap()]);
    assert!(result.status.success(), "dal optimize failed");

    let output = dir.path().join("plain.opt.dmd");
    assert!(output.exists(), "Default output file should exist");
    assert_eq!(read_model(&output), model);
}

/// Test optimize driven by a pipeline config file
#[test]
fn test_optimize_with_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("model.dmd");
    let output = dir.path().join("merged.dmd");
    let config = dir.path().join("pipeline.toml");
    write_model(&input, &test_model());
    std::fs::write(&config, "merge_by_material = true\ncompression_level = 1\n")
        .expect("Failed to write config");

    let result = dal(&[
        "optimize",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(result.status.success(), "dal optimize failed");

    let model = read_model(&output);
    assert_eq!(model.units_straight.len(), 1);
    assert_eq!(model.units_straight[0].name, "left");
    assert_eq!(model.units_straight[0].mesh.vertices.len(), 36);
    assert_eq!(model.skeleton.len(), 3);
}

/// Test info --json output
#[test]
fn test_info_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("model.dmd");
    write_model(&input, &test_model());

    let result = dal(&["info", input.to_str().unwrap(), "--json"]);
    assert!(result.status.success(), "dal info failed");

    let stats: serde_json::Value =
        serde_json::from_slice(&result.stdout).expect("info --json should print JSON");
    assert_eq!(stats["units_straight"], 2);
    assert_eq!(stats["units_straight_joint"], 1);
    assert_eq!(stats["vertex_count"], 18);
    assert_eq!(stats["joint_count"], 3);
    assert_eq!(stats["animation_count"], 1);
}

/// Test that a corrupted file is reported as a failure
#[test]
fn test_info_rejects_bad_magic() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("bad.dmd");
    std::fs::write(&input, b"notdal0000").expect("Failed to write file");

    let result = dal(&["info", input.to_str().unwrap()]);
    assert!(!result.status.success(), "dal info should fail on bad magic");
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("magic number mismatch"), "stderr: {stderr}");
}
