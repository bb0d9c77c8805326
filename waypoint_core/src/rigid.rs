//! Rigid-body helpers: rotation construction, pose transforms, camera axes.
//!
//! All transforms are `IsometryMatrix3<f64>` (rotation matrix + translation),
//! so composition and inversion never leave the rigid group.

use nalgebra::{IsometryMatrix3, Point3, Rotation3, Translation3, Vector3};

/// A rigid transform between two coordinate frames.
pub type RigidTransform = IsometryMatrix3<f64>;

/// Active rotation from intrinsic X-Y-Z Euler angles.
///
/// Rotates about x by `roll`, then about the new y by `pitch`, then about
/// the new z by `yaw`: `R = Rx(roll) * Ry(pitch) * Rz(yaw)`.
pub fn rotation_from_intrinsic_xyz(roll: f64, pitch: f64, yaw: f64) -> Rotation3<f64> {
    let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), roll);
    let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), pitch);
    let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), yaw);
    rx * ry * rz
}

/// Rotation from fixed-axis roll/pitch/yaw, as used by joint origins.
///
/// `R = Rz(yaw) * Ry(pitch) * Rx(roll)`
pub fn rotation_from_rpy(roll: f64, pitch: f64, yaw: f64) -> Rotation3<f64> {
    Rotation3::from_euler_angles(roll, pitch, yaw)
}

/// Pose of a recorded frame in the world: maps frame-local points to world points.
///
/// # Arguments
/// * `position` - World position (x, y, z)
/// * `orientation` - (roll, pitch, yaw) in radians, intrinsic X-Y-Z
pub fn pose_transform(position: &Vector3<f64>, orientation: &[f64; 3]) -> RigidTransform {
    let rotation = rotation_from_intrinsic_xyz(orientation[0], orientation[1], orientation[2]);
    IsometryMatrix3::from_parts(Translation3::from(*position), rotation)
}

/// Expresses a world point in the local frame of `base`.
pub fn to_local(base: &RigidTransform, world: &Point3<f64>) -> Point3<f64> {
    base.inverse_transform_point(world)
}

/// Re-orders axes after the rigid camera transform: `(x, y, z) -> (z, -x, -y)`.
///
/// A point straight ahead of the camera link (+x) ends up on -y.
pub fn camera_axes(p: &Point3<f64>) -> Point3<f64> {
    Point3::new(p.z, -p.x, -p.y)
}

/// Inverse of [`camera_axes`].
pub fn body_axes(p: &Point3<f64>) -> Point3<f64> {
    Point3::new(-p.y, -p.z, p.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_pose() {
        let pose = pose_transform(&Vector3::zeros(), &[0.0, 0.0, 0.0]);
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(pose.transform_point(&p), p);
    }

    #[test]
    fn test_yaw_rotates_x_onto_y() {
        let r = rotation_from_intrinsic_xyz(0.0, 0.0, FRAC_PI_2);
        let v = r * Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(v, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_intrinsic_order() {
        // Roll first, then pitch about the rolled y axis
        let r = rotation_from_intrinsic_xyz(FRAC_PI_2, FRAC_PI_2, 0.0);
        let expected = Rotation3::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);
        assert_relative_eq!(r.matrix(), expected.matrix(), epsilon = 1e-12);
    }

    #[test]
    fn test_rpy_matches_fixed_axis_product() {
        let (r, p, y) = (0.1, -0.2, 0.3);
        let expected = Rotation3::from_axis_angle(&Vector3::z_axis(), y)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), p)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), r);
        assert_relative_eq!(rotation_from_rpy(r, p, y).matrix(), expected.matrix(), epsilon = 1e-12);
    }

    #[test]
    fn test_to_local_translated_and_yawed() {
        // Vehicle at (10, 0, 0) facing +y; a point 5m further along +y is 5m ahead
        let base = pose_transform(&Vector3::new(10.0, 0.0, 0.0), &[0.0, 0.0, FRAC_PI_2]);
        let local = to_local(&base, &Point3::new(10.0, 5.0, 0.0));
        assert_relative_eq!(local, Point3::new(5.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_camera_axes() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(camera_axes(&p), Point3::new(3.0, -1.0, -2.0));
    }

    proptest! {
        #[test]
        fn prop_camera_axes_invertible(x in -1e3..1e3f64, y in -1e3..1e3f64, z in -1e3..1e3f64) {
            let p = Point3::new(x, y, z);
            prop_assert_eq!(body_axes(&camera_axes(&p)), p);
        }

        #[test]
        fn prop_pose_inverse_round_trip(
            x in -1e3..1e3f64, y in -1e3..1e3f64, z in -10.0..10.0f64,
            roll in -3.0..3.0f64, pitch in -1.5..1.5f64, yaw in -3.0..3.0f64,
        ) {
            let pose = pose_transform(&Vector3::new(x, y, z), &[roll, pitch, yaw]);
            let p = Point3::new(x + 7.0, y - 3.0, z + 1.0);
            let back = pose.transform_point(&to_local(&pose, &p));
            prop_assert!((back - p).norm() <= 1e-9 * p.coords.norm().max(1.0));
        }
    }
}
