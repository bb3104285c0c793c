use std::f32::consts::{PI, TAU};

pub const PI_OVER_2: f32 = std::f32::consts::FRAC_PI_2;

/// Reduce an angle in radians into the range `(-π, π]`.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    let mut wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid maps +π onto -π; keep the upper bound inclusive.
    if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_keeps_small_angles() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(1.0) - 1.0).abs() < 1e-6);
        assert!((wrap_angle(-1.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn wrap_angle_folds_full_turns() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-TAU - 0.5) + 0.5).abs() < 1e-5);
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
    }

    #[test]
    fn wrap_angle_upper_bound_is_inclusive() {
        assert!((wrap_angle(PI) - PI).abs() < 1e-6);
        assert!(wrap_angle(-PI) > 0.0);
    }

    #[test]
    fn wrap_angle_stays_in_range() {
        for i in -100..100 {
            let a = wrap_angle(i as f32 * 0.37);
            assert!(a > -PI - 1e-6 && a <= PI + 1e-6, "{a} out of range");
        }
    }
}
