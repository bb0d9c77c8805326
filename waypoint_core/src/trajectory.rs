//! Recorded frames and the trajectory they form.

use crate::rigid::{pose_transform, RigidTransform};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Vehicle pose in the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World position [x, y, z]
    pub position: Vector3<f64>,

    /// [roll, pitch, yaw] in radians, intrinsic X-Y-Z
    pub orientation: [f64; 3],
}

impl Pose {
    pub fn new(position: Vector3<f64>, orientation: [f64; 3]) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose with zero rotation.
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self::new(Vector3::new(x, y, z), [0.0; 3])
    }

    /// Transform mapping vehicle-local points into the world.
    pub fn transform(&self) -> RigidTransform {
        pose_transform(&self.position, &self.orientation)
    }

    pub fn point(&self) -> Point3<f64> {
        Point3::from(self.position)
    }
}

/// One recorded timestep with a valid position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Row index from the source table (increasing, may have gaps)
    pub index: i64,
    pub pose: Pose,
    pub steering_angle: f64,
}

impl Frame {
    pub fn new(index: i64, pose: Pose, steering_angle: f64) -> Self {
        Self {
            index,
            pose,
            steering_angle,
        }
    }
}

/// Ordered frames of a single recording session.
///
/// Frames are kept in the order given, which must be temporal order.
/// Frames without a position never get here; they are dropped while
/// the source table is read, so neighbours across a dropped row are
/// treated as adjacent.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    frames: Vec<Frame>,

    /// Ground-plane distance from frame i to frame i + 1
    steps: Vec<f64>,
}

impl Trajectory {
    pub fn new(frames: Vec<Frame>) -> Self {
        let steps = frames
            .windows(2)
            .map(|pair| planar_distance(&pair[0].pose, &pair[1].pose))
            .collect();
        Self { frames, steps }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Distance from frame `i` to the next frame, `None` for the last frame.
    pub fn distance_to_next(&self, i: usize) -> Option<f64> {
        self.steps.get(i).copied()
    }

    /// Distance to the next frame for every frame (`None` at the end).
    pub fn distances(&self) -> Vec<Option<f64>> {
        (0..self.frames.len()).map(|i| self.distance_to_next(i)).collect()
    }

    /// Running path distance from frame `i` to each later frame.
    ///
    /// Entry `j` is the distance from frame `i` to frame `i + 1 + j`. The
    /// series stops at the first entry reaching `horizon` (inclusive), so
    /// callers only pay for the lookahead they need. The series is
    /// non-decreasing.
    pub fn cumulative_from(&self, i: usize, horizon: f64) -> Vec<f64> {
        let mut series = Vec::new();
        let mut total = 0.0;
        for step in self.steps.iter().skip(i) {
            total += step;
            series.push(total);
            if total >= horizon {
                break;
            }
        }
        series
    }
}

/// Distance in the ground (x, y) plane; height is ignored.
pub fn planar_distance(a: &Pose, b: &Pose) -> f64 {
    let dx = b.position.x - a.position.x;
    let dy = b.position.y - a.position.y;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line(xs: &[f64]) -> Trajectory {
        Trajectory::new(
            xs.iter()
                .enumerate()
                .map(|(i, &x)| Frame::new(i as i64, Pose::at(x, 0.0, 0.0), 0.0))
                .collect(),
        )
    }

    #[test]
    fn test_distances_end_with_none() {
        let t = line(&[0.0, 3.0, 7.0]);
        assert_eq!(t.distances(), vec![Some(3.0), Some(4.0), None]);
    }

    #[test]
    fn test_planar_distance_ignores_height() {
        let d = planar_distance(&Pose::at(0.0, 0.0, 0.0), &Pose::at(3.0, 4.0, 100.0));
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn test_cumulative_from_stops_at_horizon() {
        let t = line(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(t.cumulative_from(0, 2.0), vec![1.0, 2.0]);
        assert_eq!(t.cumulative_from(3, 10.0), vec![1.0, 2.0]);
        assert!(t.cumulative_from(5, 10.0).is_empty());
    }

    #[test]
    fn test_empty_and_single() {
        assert!(Trajectory::new(vec![]).is_empty());
        let t = line(&[1.0]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.distances(), vec![None]);
    }
}
