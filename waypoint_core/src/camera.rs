//! Cameras of the recording platform and their body-frame transforms.

use crate::rigid::{camera_axes, RigidTransform};
use crate::transform_tree::{TransformTree, TreeError};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Body frame every waypoint is first expressed in.
pub const BODY_FRAME: &str = "base_link";

/// Camera identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Camera {
    /// Center camera with the wide lens
    FrontWide,

    /// Left-facing side camera
    Left,

    /// Right-facing side camera
    Right,
}

impl Camera {
    /// All cameras, in output column order.
    pub const ALL: [Camera; 3] = [Camera::FrontWide, Camera::Left, Camera::Right];

    /// Returns the name used in table columns.
    pub fn name(&self) -> &'static str {
        match self {
            Camera::FrontWide => "front_wide",
            Camera::Left => "left",
            Camera::Right => "right",
        }
    }

    /// Returns the frame name of the camera in the platform description.
    pub fn frame(&self) -> &'static str {
        match self {
            Camera::FrontWide => "interfacea_link2",
            Camera::Left => "interfacea_link0",
            Camera::Right => "interfacea_link1",
        }
    }

    /// Position of the camera in [`Camera::ALL`].
    pub fn slot(&self) -> usize {
        match self {
            Camera::FrontWide => 0,
            Camera::Left => 1,
            Camera::Right => 2,
        }
    }
}

impl std::fmt::Display for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Camera {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "front_wide" | "frontwide" | "center" => Ok(Camera::FrontWide),
            "left" => Ok(Camera::Left),
            "right" => Ok(Camera::Right),
            _ => Err(format!("Unknown camera: {}", s)),
        }
    }
}

/// Body-to-camera transforms for all three cameras, resolved once.
#[derive(Debug, Clone)]
pub struct CameraRig {
    body_to_camera: [RigidTransform; 3],
}

impl CameraRig {
    /// Resolves every camera frame against the tree.
    ///
    /// Fails if any camera frame (or the body frame) is missing, which is
    /// fatal for a run: every waypoint needs all three transforms.
    pub fn from_tree(tree: &TransformTree, body_frame: &str) -> Result<Self, TreeError> {
        let resolve = |camera: Camera| tree.transform(body_frame, camera.frame());
        Ok(Self {
            body_to_camera: [
                resolve(Camera::FrontWide)?,
                resolve(Camera::Left)?,
                resolve(Camera::Right)?,
            ],
        })
    }

    /// Rig whose cameras coincide with the body frame.
    pub fn identity() -> Self {
        Self {
            body_to_camera: [RigidTransform::identity(); 3],
        }
    }

    /// Transform mapping body-frame points into the camera's own frame.
    pub fn body_to_camera(&self, camera: Camera) -> &RigidTransform {
        &self.body_to_camera[camera.slot()]
    }

    /// Projects a body-frame point into the camera, in camera axis convention.
    pub fn project(&self, camera: Camera, body: &Point3<f64>) -> Point3<f64> {
        camera_axes(&self.body_to_camera(camera).transform_point(body))
    }
}
