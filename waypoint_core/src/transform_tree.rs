//! Static transform tree of the recording platform.
//!
//! The platform description lists named frames and the fixed joints that
//! connect them. A joint origin places the child frame inside the parent
//! frame, so walking from any frame up to the root yields its pose in the
//! root frame. Any two frames can then be related through the root.

use crate::rigid::{rotation_from_rpy, RigidTransform};
use nalgebra::{IsometryMatrix3, Translation3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Built-in description of the recording vehicle.
const DEFAULT_PLATFORM: &str = include_str!("../../config/platform.json");

/// Errors raised while building or querying a transform tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A joint or query refers to a frame that was never declared
    #[error("Unknown frame: {0}")]
    UnknownFrame(String),

    /// The same frame name is declared twice
    #[error("Duplicate frame: {0}")]
    DuplicateFrame(String),

    /// A frame is the child of more than one joint
    #[error("Frame {frame} has two parents ({first}, {second})")]
    MultipleParents {
        frame: String,
        first: String,
        second: String,
    },

    /// Following parents from this frame never reaches the root
    #[error("Frame {0} is part of a cycle")]
    Cycle(String),

    /// The description has zero or several parentless frames
    #[error("Expected exactly one root frame, found {0:?}")]
    RootCount(Vec<String>),

    /// JSON could not be parsed into a description
    #[error("Malformed platform description: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Placement of a child frame inside its parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    /// Translation [x, y, z] in meters
    #[serde(default)]
    pub xyz: [f64; 3],

    /// Fixed-axis rotation [roll, pitch, yaw] in radians
    #[serde(default)]
    pub rpy: [f64; 3],
}

impl Origin {
    /// Transform mapping child-frame points into the parent frame.
    pub fn transform(&self) -> RigidTransform {
        let rotation = rotation_from_rpy(self.rpy[0], self.rpy[1], self.rpy[2]);
        let translation = Translation3::from(Vector3::from(self.xyz));
        IsometryMatrix3::from_parts(translation, rotation)
    }
}

/// A rigid connection between two frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedJoint {
    pub name: String,
    pub parent: String,
    pub child: String,
    #[serde(default)]
    pub origin: Origin,
}

/// Serialized form of the platform: frames plus fixed joints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDescription {
    pub name: String,
    pub frames: Vec<String>,
    pub joints: Vec<FixedJoint>,
}

/// Resolved transform tree. Read-only once built.
#[derive(Debug, Clone)]
pub struct TransformTree {
    name: String,
    root: String,

    /// Pose of every frame in the root frame
    poses: HashMap<String, RigidTransform>,
}

impl TransformTree {
    /// Parses and validates a JSON platform description.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let description: PlatformDescription = serde_json::from_str(json)?;
        Self::from_description(&description)
    }

    /// The platform description shipped with the crate.
    pub fn default_platform() -> Result<Self, TreeError> {
        Self::from_json(DEFAULT_PLATFORM)
    }

    /// Validates the description and resolves every frame's pose in the root.
    pub fn from_description(description: &PlatformDescription) -> Result<Self, TreeError> {
        let mut declared: HashSet<&str> = HashSet::new();
        for frame in &description.frames {
            if !declared.insert(frame.as_str()) {
                return Err(TreeError::DuplicateFrame(frame.clone()));
            }
        }

        // child -> joint
        let mut parent_of: HashMap<&str, &FixedJoint> = HashMap::new();
        for joint in &description.joints {
            for end in [&joint.parent, &joint.child] {
                if !declared.contains(end.as_str()) {
                    return Err(TreeError::UnknownFrame(end.clone()));
                }
            }
            if let Some(existing) = parent_of.insert(joint.child.as_str(), joint) {
                return Err(TreeError::MultipleParents {
                    frame: joint.child.clone(),
                    first: existing.parent.clone(),
                    second: joint.parent.clone(),
                });
            }
        }

        let roots: Vec<String> = description
            .frames
            .iter()
            .filter(|f| !parent_of.contains_key(f.as_str()))
            .cloned()
            .collect();
        if roots.len() != 1 {
            return Err(TreeError::RootCount(roots));
        }
        let root = roots[0].clone();

        let mut poses = HashMap::with_capacity(description.frames.len());
        for frame in &description.frames {
            let mut pose = RigidTransform::identity();
            let mut current = frame.as_str();
            let mut steps = 0;
            while let Some(joint) = parent_of.get(current) {
                steps += 1;
                if steps > description.frames.len() {
                    return Err(TreeError::Cycle(frame.clone()));
                }
                pose = joint.origin.transform() * pose;
                current = joint.parent.as_str();
            }
            poses.insert(frame.clone(), pose);
        }

        Ok(Self {
            name: description.name.clone(),
            root,
            poses,
        })
    }

    /// Platform name from the description.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the root frame.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Pose of `frame` in the root frame.
    pub fn pose_in_root(&self, frame: &str) -> Result<&RigidTransform, TreeError> {
        self.poses
            .get(frame)
            .ok_or_else(|| TreeError::UnknownFrame(frame.to_string()))
    }

    /// Transform mapping points expressed in `from` into `to`.
    pub fn transform(&self, from: &str, to: &str) -> Result<RigidTransform, TreeError> {
        let root_from = self.pose_in_root(from)?;
        let root_to = self.pose_in_root(to)?;
        Ok(root_to.inverse() * *root_from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    fn joint(name: &str, parent: &str, child: &str, xyz: [f64; 3], rpy: [f64; 3]) -> FixedJoint {
        FixedJoint {
            name: name.to_string(),
            parent: parent.to_string(),
            child: child.to_string(),
            origin: Origin { xyz, rpy },
        }
    }

    fn chain() -> PlatformDescription {
        PlatformDescription {
            name: "test".to_string(),
            frames: vec!["base".into(), "mount".into(), "cam".into()],
            joints: vec![
                joint("base_to_mount", "base", "mount", [1.0, 0.0, 1.5], [0.0, 0.0, 0.0]),
                joint("mount_to_cam", "mount", "cam", [0.0, 0.5, 0.0], [0.0, 0.0, FRAC_PI_2]),
            ],
        }
    }

    #[test]
    fn test_chain_resolves_root() {
        let tree = TransformTree::from_description(&chain()).unwrap();
        assert_eq!(tree.root(), "base");
        assert!(tree.pose_in_root("cam").is_ok());

        let cam_in_base = tree.pose_in_root("cam").unwrap();
        let origin = cam_in_base.transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(1.0, 0.5, 1.5), epsilon = 1e-12);
    }

    #[test]
    fn test_base_to_camera_transform() {
        let tree = TransformTree::from_description(&chain()).unwrap();
        let base_to_cam = tree.transform("base", "cam").unwrap();

        // Point 1m ahead of the camera origin along base +x lies on cam -y (cam yawed +90 deg)
        let p = base_to_cam.transform_point(&Point3::new(2.0, 0.5, 1.5));
        assert_relative_eq!(p, Point3::new(0.0, -1.0, 0.0), epsilon = 1e-12);

        let back = tree.transform("cam", "base").unwrap().transform_point(&p);
        assert_relative_eq!(back, Point3::new(2.0, 0.5, 1.5), epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_frame_query() {
        let tree = TransformTree::from_description(&chain()).unwrap();
        let err = tree.transform("base", "lidar").unwrap_err();
        assert!(matches!(err, TreeError::UnknownFrame(ref f) if f == "lidar"));
    }

    #[test]
    fn test_joint_to_undeclared_frame() {
        let mut desc = chain();
        desc.joints.push(joint("extra", "cam", "ghost", [0.0; 3], [0.0; 3]));
        assert!(matches!(
            TransformTree::from_description(&desc),
            Err(TreeError::UnknownFrame(_))
        ));
    }

    #[test]
    fn test_two_parents_rejected() {
        let mut desc = chain();
        desc.joints.push(joint("again", "base", "cam", [0.0; 3], [0.0; 3]));
        assert!(matches!(
            TransformTree::from_description(&desc),
            Err(TreeError::MultipleParents { .. })
        ));
    }

    #[test]
    fn test_detached_cycle_rejected() {
        let mut desc = chain();
        desc.frames.push("a".into());
        desc.frames.push("b".into());
        desc.joints.push(joint("ab", "a", "b", [0.0; 3], [0.0; 3]));
        desc.joints.push(joint("ba", "b", "a", [0.0; 3], [0.0; 3]));
        assert!(matches!(
            TransformTree::from_description(&desc),
            Err(TreeError::Cycle(_))
        ));
    }

    #[test]
    fn test_two_roots_rejected() {
        let mut desc = chain();
        desc.frames.push("lidar".into());
        assert!(matches!(
            TransformTree::from_description(&desc),
            Err(TreeError::RootCount(ref r)) if r.len() == 2
        ));
    }

    #[test]
    fn test_default_platform_has_cameras() {
        let tree = TransformTree::default_platform().unwrap();
        assert_eq!(tree.root(), "base_link");
        for frame in ["interfacea_link0", "interfacea_link1", "interfacea_link2"] {
            assert!(tree.pose_in_root(frame).is_ok(), "missing {frame}");
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            TransformTree::from_json("{\"name\": 3}"),
            Err(TreeError::Malformed(_))
        ));
    }
}
