use nalgebra::{Point3, UnitQuaternion, Vector3};

use std::f64::consts::TAU;

/// Point on a circle of the given radius, centered on the origin and lying in
/// the xz plane tilted about the x axis by `inclination` (radians).
///
/// At `inclination = 0` the circle lies flat in the xz plane (y is up). The
/// path is closed with period 2pi in `angle`, and its height never exceeds
/// `radius * |sin(inclination)|`.
pub fn inclined_circle_point(angle: f64, radius: f64, inclination: f64) -> Point3<f64> {
    let (sin_a, cos_a) = angle.sin_cos();
    let (sin_i, cos_i) = inclination.sin_cos();
    Point3::new(
        cos_a * radius,
        sin_a * radius * sin_i,
        sin_a * radius * cos_i,
    )
}

/// Wraps an angle into [0, 2pi).
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Rotation for an intrinsic XYZ Euler triple: the x rotation
/// is outermost, so `R = Rx * Ry * Rz`.
pub fn euler_xyz(x: f64, y: f64, z: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), x)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), y)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), z)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_inclined_circle_flat() {
        approx::assert_relative_eq!(
            inclined_circle_point(0.0, 10.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
        );
        approx::assert_abs_diff_eq!(
            inclined_circle_point(FRAC_PI_2, 10.0, 0.0),
            Point3::new(0.0, 0.0, 10.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_inclined_circle_tilted() {
        // A quarter turn along a 90 degree inclined orbit goes straight up
        approx::assert_abs_diff_eq!(
            inclined_circle_point(FRAC_PI_2, 2.0, FRAC_PI_2),
            Point3::new(0.0, 2.0, 0.0),
            epsilon = 1e-12
        );

        // Distance from the center never changes, whatever the tilt
        for i in 0..16 {
            let angle = i as f64 * 0.4;
            let p = inclined_circle_point(angle, 3.5, 1.234);
            approx::assert_relative_eq!(p.coords.norm(), 3.5, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_wrap_angle() {
        approx::assert_relative_eq!(wrap_angle(3.0 * PI), PI, max_relative = 1e-12);
        approx::assert_relative_eq!(wrap_angle(-FRAC_PI_2), 1.5 * PI, max_relative = 1e-12);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!(wrap_angle(-1e-18) < TAU);
    }

    #[test]
    fn test_euler_xyz_order() {
        // Rz is applied first: x goes to y, then Rx(90) sends y to z
        let r = euler_xyz(FRAC_PI_2, 0.0, FRAC_PI_2);
        approx::assert_abs_diff_eq!(r * Vector3::x(), Vector3::z(), epsilon = 1e-12);
    }
}
