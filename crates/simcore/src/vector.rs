//! Planar vector helpers used by the vehicle model.
//!
//! Every "length" here is the squared magnitude. The tuning constants of the
//! drivetrain and tire models are calibrated against the squared quantity, so
//! none of these helpers take a square root.

use nalgebra as na;

pub type Vec2 = na::Vector2<f64>;

#[inline]
pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

/// Operations on [`Vec2`] with squared-length semantics.
pub trait PlanarExt {
    /// `x² + y²`.
    fn length_sq(&self) -> f64;

    /// Divides by the squared length. The zero vector is returned unchanged.
    fn unit_sq(&self) -> Vec2;

    /// Rotates by `theta` radians as `(x cosθ - y sinθ, -x sinθ + y cosθ)`.
    fn rotated(&self, theta: f64) -> Vec2;

    /// Component of `self` along `axis`. Zero when `axis` is zero.
    fn projected_on(&self, axis: &Vec2) -> Vec2;

    /// Zero when the squared length is below `threshold`.
    fn deadzoned(&self, threshold: f64) -> Vec2;

    /// Scales down so that the squared length does not exceed `max`.
    fn clamped_magnitude(&self, max: f64) -> Vec2;

    /// Shrinks the squared length by `amount`, stopping at zero.
    fn decreased_by(&self, amount: f64) -> Vec2;

    /// Grows the squared length by `amount`. The zero vector has no direction
    /// and stays zero.
    fn increased_by(&self, amount: f64) -> Vec2;

    /// Angle of the vector in radians, `atan2(y, x)`.
    fn heading_angle(&self) -> f64;
}

impl PlanarExt for Vec2 {
    #[inline]
    fn length_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    fn unit_sq(&self) -> Vec2 {
        let length = self.length_sq();
        if length == 0.0 {
            *self
        } else {
            self * (1.0 / length)
        }
    }

    fn rotated(&self, theta: f64) -> Vec2 {
        let (sin_theta, cos_theta) = theta.sin_cos();
        vec2(
            self.x * cos_theta - self.y * sin_theta,
            -self.x * sin_theta + self.y * cos_theta,
        )
    }

    fn projected_on(&self, axis: &Vec2) -> Vec2 {
        let axis_sq = axis.length_sq();
        if axis_sq == 0.0 {
            return Vec2::zeros();
        }
        axis * (self.dot(axis) / axis_sq)
    }

    fn deadzoned(&self, threshold: f64) -> Vec2 {
        if self.length_sq() < threshold {
            Vec2::zeros()
        } else {
            *self
        }
    }

    fn clamped_magnitude(&self, max: f64) -> Vec2 {
        let length = self.length_sq();
        if length > max && length > 0.0 {
            self * (max / length)
        } else {
            *self
        }
    }

    fn decreased_by(&self, amount: f64) -> Vec2 {
        let length = self.length_sq();
        if length <= amount {
            Vec2::zeros()
        } else {
            self * ((length - amount) / length)
        }
    }

    fn increased_by(&self, amount: f64) -> Vec2 {
        let length = self.length_sq();
        if length == 0.0 {
            *self
        } else {
            self * ((length + amount) / length)
        }
    }

    fn heading_angle(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

/// Whichever of `a` and `b` has the larger magnitude. Ties keep `a`.
#[inline]
pub fn most(a: f64, b: f64) -> f64 {
    if b.abs() > a.abs() { b } else { a }
}

/// Component-wise [`most`].
pub fn most_vec(a: &Vec2, b: &Vec2) -> Vec2 {
    vec2(most(a.x, b.x), most(a.y, b.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_length_is_squared() {
        assert!((vec2(3.0, 4.0).length_sq() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_unit_divides_by_squared_length() {
        let u = vec2(2.0, 0.0).unit_sq();
        assert_relative_eq!(u.x, 0.5);
        assert_relative_eq!(u.y, 0.0);
        assert_eq!(Vec2::zeros().unit_sq(), Vec2::zeros());
    }

    #[test]
    fn test_rotation_is_clockwise_for_positive_angles() {
        let r = vec2(0.0, 1.0).rotated(FRAC_PI_2);
        assert_relative_eq!(r.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(r.y, 0.0, epsilon = 1e-12);
        let r = vec2(1.0, 0.0).rotated(FRAC_PI_2);
        assert_relative_eq!(r.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_projection_keeps_the_axis_component() {
        let p = vec2(3.0, 5.0).projected_on(&vec2(0.0, 2.0));
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 5.0);
        assert_eq!(vec2(1.0, 1.0).projected_on(&Vec2::zeros()), Vec2::zeros());
    }

    #[test]
    fn test_deadzone_uses_squared_threshold() {
        // 0.3² = 0.09 sits inside a 0.1 deadzone
        assert_eq!(vec2(0.3, 0.0).deadzoned(0.1), Vec2::zeros());
        assert_eq!(vec2(0.4, 0.0).deadzoned(0.1), vec2(0.4, 0.0));
    }

    #[test]
    fn test_decrease_stops_at_zero() {
        let v = vec2(0.0, 2.0);
        let d = v.decreased_by(1.0);
        // squared length 4 scaled by (4 - 1) / 4
        assert_relative_eq!(d.y, 1.5, epsilon = 1e-12);
        assert_eq!(v.decreased_by(4.0), Vec2::zeros());
        assert_eq!(v.decreased_by(10.0), Vec2::zeros());
    }

    #[test]
    fn test_increase_grows_and_leaves_zero_alone() {
        let v = vec2(1.0, 0.0).increased_by(1.0);
        assert_relative_eq!(v.x, 2.0);
        assert_eq!(Vec2::zeros().increased_by(5.0), Vec2::zeros());
    }

    #[test]
    fn test_clamp_limits_squared_length() {
        let v = vec2(4.0, 0.0).clamped_magnitude(2.0);
        assert_relative_eq!(v.x, 0.5);
        assert_eq!(vec2(1.0, 0.0).clamped_magnitude(2.0), vec2(1.0, 0.0));
    }

    #[test]
    fn test_most_prefers_larger_magnitude() {
        assert_eq!(most(0.2, -0.7), -0.7);
        assert_eq!(most(1.0, -1.0), 1.0);
        assert_eq!(most_vec(&vec2(1.0, 0.0), &vec2(0.5, -0.25)), vec2(1.0, -0.25));
    }
}
