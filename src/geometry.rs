// src/geometry.rs - stateless vector math shared by the scoring pipeline
use nalgebra::Vector3;

/// Componentwise vector from `from` to `to`.
pub fn vector_between(from: Vector3<f64>, to: Vector3<f64>) -> Vector3<f64> {
    to - from
}

/// Angle at `center` between the rays toward `p1` and `p2`, in degrees.
///
/// The cosine is clamped to [-1, 1] before `acos`, so the result is always
/// in [0, 180]. A zero-magnitude ray (degenerate input) yields 0 rather
/// than propagating NaN into the score.
pub fn angle_degrees(center: Vector3<f64>, p1: Vector3<f64>, p2: Vector3<f64>) -> f64 {
    let v1 = vector_between(center, p1);
    let v2 = vector_between(center, p2);

    let mag1 = v1.norm();
    let mag2 = v2.norm();
    if mag1 == 0.0 || mag2 == 0.0 {
        return 0.0;
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_angle() {
        let center = Vector3::zeros();
        let p1 = Vector3::new(1.0, 0.0, 0.0);
        let p2 = Vector3::new(0.0, 1.0, 0.0);
        assert!((angle_degrees(center, p1, p2) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_rays() {
        let center = Vector3::new(0.5, 0.5, 0.0);
        let p1 = Vector3::new(1.0, 0.5, 0.0);
        let p2 = Vector3::new(2.0, 0.5, 0.0);
        assert!(angle_degrees(center, p1, p2).abs() < 1e-9);

        let opposite = Vector3::new(-1.0, 0.5, 0.0);
        assert!((angle_degrees(center, p1, opposite) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_ray_returns_zero() {
        let center = Vector3::new(0.3, 0.4, 0.0);
        let p2 = Vector3::new(0.6, 0.1, 0.2);
        assert_eq!(angle_degrees(center, center, p2), 0.0);
        assert_eq!(angle_degrees(center, p2, center), 0.0);
    }

    #[test]
    fn angle_always_within_range() {
        // Sweep a grid of ray pairs; acos clamping keeps everything in [0, 180].
        for i in 0..20 {
            for j in 0..20 {
                let a = i as f64 * 0.33;
                let b = j as f64 * 0.21;
                let p1 = Vector3::new(a.sin(), a.cos(), (a * 0.5).sin());
                let p2 = Vector3::new(b.cos(), b.sin(), (b * 0.7).cos());
                let angle = angle_degrees(Vector3::zeros(), p1, p2);
                assert!((0.0..=180.0).contains(&angle), "angle {angle} out of range");
            }
        }
    }
}
