use crate::Float;

pub const INFINITY: Float = std::f32::INFINITY;

/// Epsilon used to offset shadow and continuation ray origins off a surface.
pub const RAY_EPSILON: Float = 1.0e-4;

pub fn lerp(t: Float, v1: Float, v2: Float) -> Float {
    (1.0 - t) * v1 + t * v2
}

/// Solves `a*t^2 + b*t + c = 0`, returning the roots in ascending order.
/// The discriminant is computed in f64 to dodge catastrophic cancellation
/// on near-tangent rays.
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    let discrim = b as f64 * b as f64 - 4.0 * a as f64 * c as f64;
    if discrim < 0.0 {
        return None;
    }
    let root_discrim = discrim.sqrt();

    let q = if b < 0.0 {
        -0.5 * (b as f64 - root_discrim)
    } else {
        -0.5 * (b as f64 + root_discrim)
    };

    let t0 = (q / a as f64) as Float;
    let t1 = (c as f64 / q) as Float;
    if t0 > t1 {
        Some((t1, t0))
    } else {
        Some((t0, t1))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lerp() {
        assert_abs_diff_eq!(lerp(0.25, 0.0, 4.0), 1.0);
        assert_abs_diff_eq!(lerp(0.0, -1.0, 1.0), -1.0);
        assert_abs_diff_eq!(lerp(1.0, -1.0, 1.0), 1.0);
    }

    #[test]
    fn test_quadratic_roots() {
        // (t - 1)(t - 3) = t^2 - 4t + 3
        let (t0, t1) = quadratic(1.0, -4.0, 3.0).unwrap();
        assert_abs_diff_eq!(t0, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(t1, 3.0, epsilon = 1e-6);

        assert!(quadratic(1.0, 0.0, 1.0).is_none());
    }
}
