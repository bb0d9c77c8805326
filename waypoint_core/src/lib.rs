//! Waypoint Core - Lookahead Targets for Recorded Driving Data
//!
//! For each recorded frame this library looks ahead along the driven path,
//! picks the frames reached at fixed distance intervals and expresses them:
//! 1. **Body frame**: relative to the current vehicle pose
//! 2. **Camera frames**: through the static platform transform tree, per camera
//!
//! It also carries the hand-made turn-signal fixes applied to datasets after
//! the waypoint pass. Nothing here touches the filesystem.

pub mod rigid;
pub mod transform_tree;
pub mod camera;
pub mod trajectory;
pub mod waypoints;
pub mod turn_signal;
pub mod patches;

// Re-export key types for convenience
pub use camera::{Camera, CameraRig, BODY_FRAME};
pub use patches::{ManualPatch, PatchError, PatchList};
pub use rigid::RigidTransform;
pub use trajectory::{Frame, Pose, Trajectory};
pub use transform_tree::{PlatformDescription, TransformTree, TreeError};
pub use turn_signal::TurnLabel;
pub use waypoints::{FrameWaypoints, Waypoint, WaypointComputer, WaypointConfig, WaypointStats};
