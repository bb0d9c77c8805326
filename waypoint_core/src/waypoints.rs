//! Lookahead waypoints along a recorded trajectory.
//!
//! For every frame the path ahead is walked until fixed distance targets
//! (5 m, 10 m, ... by default) are reached. The first later frame reaching
//! each target becomes a waypoint, expressed in the current frame's body
//! coordinates and in each camera's coordinates.
//!
//! Ranks are filled in order. The first rank whose target lies beyond the
//! end of the recorded path stops the search for that frame, so populated
//! ranks always form a prefix `1..=n`.

use crate::camera::{Camera, CameraRig};
use crate::rigid::to_local;
use crate::trajectory::Trajectory;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Lookahead configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaypointConfig {
    /// Number of lookahead ranks per frame
    pub count: usize,

    /// Path distance between consecutive ranks
    pub spacing: f64,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            count: 10,
            spacing: 5.0,
        }
    }
}

impl WaypointConfig {
    /// Path distance targeted by `rank` (1-based).
    pub fn target(&self, rank: usize) -> f64 {
        self.spacing * rank as f64
    }

    /// Target of the last rank; no lookahead goes further.
    pub fn horizon(&self) -> f64 {
        self.target(self.count)
    }

    /// Iterates ranks `1..=count`.
    pub fn ranks(&self) -> impl Iterator<Item = usize> {
        1..=self.count
    }
}

/// Outcome of searching one rank's target along the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookahead {
    /// Offset into the cumulative series of the first entry reaching the target
    Reached(usize),

    /// The recorded path ends before the target
    PathTooShort,
}

/// Finds the first entry of a non-decreasing series that is `>= target`.
pub fn lookahead(series: &[f64], target: f64) -> Lookahead {
    let offset = series.partition_point(|&d| d < target);
    if offset < series.len() {
        Lookahead::Reached(offset)
    } else {
        Lookahead::PathTooShort
    }
}

/// A single lookahead waypoint of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Lookahead rank (1-based)
    pub rank: usize,

    /// Index of the frame that reached the target
    pub source_index: i64,

    /// Steering angle recorded at the source frame
    pub steering_angle: f64,

    /// Position in the current frame's body coordinates
    pub local: Point3<f64>,

    /// Position per camera, ordered as [`Camera::ALL`]
    pub cameras: [Point3<f64>; 3],
}

impl Waypoint {
    pub fn camera(&self, camera: Camera) -> &Point3<f64> {
        &self.cameras[camera.slot()]
    }
}

/// All waypoints found for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameWaypoints {
    /// Row index of the frame
    pub index: i64,

    /// Populated ranks, in rank order starting at 1
    pub waypoints: Vec<Waypoint>,
}

impl FrameWaypoints {
    /// Waypoint for `rank`, `None` if the path ran out first.
    pub fn get(&self, rank: usize) -> Option<&Waypoint> {
        rank.checked_sub(1).and_then(|i| self.waypoints.get(i))
    }

    pub fn populated(&self) -> usize {
        self.waypoints.len()
    }
}

/// Coverage summary over a whole trajectory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointStats {
    /// Frames processed
    pub frames: usize,

    /// Frames with at least the first rank
    pub with_first: usize,

    /// Frames with every rank
    pub complete: usize,
}

impl WaypointStats {
    pub fn collect(results: &[FrameWaypoints], config: &WaypointConfig) -> Self {
        Self {
            frames: results.len(),
            with_first: results.iter().filter(|r| r.populated() > 0).count(),
            complete: results
                .iter()
                .filter(|r| r.populated() == config.count)
                .count(),
        }
    }
}

/// Computes waypoints for frames of a trajectory.
///
/// Holds only read-only state, so one computer serves every dataset.
#[derive(Debug, Clone)]
pub struct WaypointComputer {
    rig: CameraRig,
    config: WaypointConfig,
}

impl WaypointComputer {
    pub fn new(rig: CameraRig, config: WaypointConfig) -> Self {
        Self { rig, config }
    }

    pub fn config(&self) -> &WaypointConfig {
        &self.config
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Waypoints of frame `i`.
    ///
    /// # Panics
    /// If `i` is out of bounds for the trajectory.
    pub fn compute_frame(&self, trajectory: &Trajectory, i: usize) -> FrameWaypoints {
        let frames = trajectory.frames();
        let current = &frames[i];
        let base = current.pose.transform();
        let series = trajectory.cumulative_from(i, self.config.horizon());

        let mut waypoints = Vec::with_capacity(self.config.count);
        for rank in self.config.ranks() {
            let offset = match lookahead(&series, self.config.target(rank)) {
                Lookahead::Reached(offset) => offset,
                Lookahead::PathTooShort => break,
            };
            let source = &frames[i + 1 + offset];

            let local = to_local(&base, &source.pose.point());
            let cameras = Camera::ALL.map(|camera| self.rig.project(camera, &local));

            waypoints.push(Waypoint {
                rank,
                source_index: source.index,
                steering_angle: source.steering_angle,
                local,
                cameras,
            });
        }

        FrameWaypoints {
            index: current.index,
            waypoints,
        }
    }

    /// Waypoints of every frame, in trajectory order.
    pub fn compute(&self, trajectory: &Trajectory) -> Vec<FrameWaypoints> {
        (0..trajectory.len())
            .map(|i| self.compute_frame(trajectory, i))
            .collect()
    }
}
