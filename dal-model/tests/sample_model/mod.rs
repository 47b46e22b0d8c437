//! Programmatic model generation for integration tests.
//!
//! Builds a model that exercises every section of the payload:
//! - 4-joint skeleton (Root -> Spine -> Head, plus a hair root)
//! - 2 animations with sparse tracks
//! - one unit in each of the four render unit lists

use dal_model::{
    Aabb3, AnimJoint, Animation, IndexedMesh, JointType, Material, MeshStraight,
    MeshStraightJoint, Model, RenderUnit, SkelJoint, Skeleton, Vertex, VertexJoint,
};
use glam::{IVec4, Mat4, Quat, Vec2, Vec3, Vec4};

/// Joint count of the sample skeleton
pub const JOINT_COUNT: usize = 4;

pub fn skeleton() -> Skeleton {
    let joint = |name: &str, parent: i32, joint_type, y: f32| SkelJoint {
        name: name.into(),
        parent_index: parent,
        joint_type,
        offset_mat: Mat4::from_rotation_translation(
            Quat::from_rotation_z(y * 0.25),
            Vec3::new(0.0, y, 0.0),
        ),
    };
    Skeleton {
        joints: vec![
            joint("Root", -1, JointType::Basic, 0.0),
            joint("Spine", 0, JointType::Basic, 1.0),
            joint("Head", 1, JointType::Basic, 2.0),
            joint("Ponytail", 2, JointType::HairRoot, 2.5),
        ],
    }
}

pub fn animations() -> Vec<Animation> {
    let mut root = AnimJoint::new("Root");
    root.add_translate(0.0, 0.0, 0.0, 0.0);
    root.add_translate(15.0, 0.0, 0.5, 0.0);
    root.add_rotation(0.0, 1.0, 0.0, 0.0, 0.0);

    let mut head = AnimJoint::new("Head");
    head.add_rotation(10.0, 0.9238795, 0.0, 0.3826834, 0.0);
    head.add_scale(20.0, 1.25);

    let wave = Animation {
        name: "wave".into(),
        duration_ticks: 30.0,
        ticks_per_second: 24.0,
        joints: vec![
            root,
            AnimJoint::new("Spine"),
            head,
            AnimJoint::new("Ponytail"),
        ],
    };

    let idle = Animation {
        name: "idle".into(),
        duration_ticks: 1.0,
        ticks_per_second: 30.0,
        joints: ["Root", "Spine", "Head", "Ponytail"]
            .into_iter()
            .map(AnimJoint::new)
            .collect(),
    };

    vec![wave, idle]
}

fn corner(x: f32, y: f32) -> Vertex {
    Vertex {
        position: Vec3::new(x, y, 0.0),
        normal: Vec3::Z,
        uv_coords: Vec2::new(x, 1.0 - y),
    }
}

/// Two triangles forming a unit quad, as six flat corners.
pub fn quad_corners() -> Vec<Vertex> {
    [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        .into_iter()
        .map(|(x, y)| corner(x, y))
        .collect()
}

pub fn skinned(v: Vertex, joint: i32) -> VertexJoint {
    VertexJoint {
        position: v.position,
        normal: v.normal,
        uv_coords: v.uv_coords,
        joint_weights: Vec4::new(0.75, 0.25, 0.0, 0.0),
        joint_indices: IVec4::new(joint, 0, -1, -1),
    }
}

pub fn model() -> Model {
    let mut flat = MeshStraight::default();
    for v in quad_corners() {
        flat.push_vertex(&v);
    }

    let mut flat_joint = MeshStraightJoint::default();
    for v in quad_corners() {
        flat_joint.push_vertex(&skinned(v, 1));
    }

    let indexed = IndexedMesh::from_vertices(quad_corners());
    let indexed_joint =
        IndexedMesh::from_vertices(quad_corners().into_iter().map(|v| skinned(v, 2)));

    let mut model = Model {
        units_straight: vec![RenderUnit {
            name: "floor".into(),
            mesh: flat,
            material: Material {
                albedo_map: "floor_albedo.png".into(),
                roughness_map: "floor_rough.png".into(),
                roughness: 0.8,
                metallic: 0.0,
                ..Default::default()
            },
        }],
        units_straight_joint: vec![RenderUnit {
            name: "cape".into(),
            mesh: flat_joint,
            material: Material {
                albedo_map: "cape.png".into(),
                alpha_blend: true,
                ..Default::default()
            },
        }],
        units_indexed: vec![RenderUnit {
            name: "sign".into(),
            mesh: indexed,
            material: Material {
                normal_map: "sign_n.png".into(),
                metallic_map: "sign_m.png".into(),
                ..Default::default()
            },
        }],
        units_indexed_joint: vec![RenderUnit {
            name: "face".into(),
            mesh: indexed_joint,
            material: Material::default(),
        }],
        animations: animations(),
        skeleton: skeleton(),
        aabb: Aabb3::default(),
    };
    model.aabb = model.compute_aabb();
    model
}
