use std::f64::consts::PI;

/// Frame duration the tuned constants refer to, in seconds.
pub const REFERENCE_FRAME_TIME: f64 = 0.017;

/// Scales an impulse for a tick of length `dt`.
///
/// Ticks longer than the reference frame are damped by `sqrt(frame / dt)` so large steps
/// do not overshoot.
#[inline]
pub fn timescale_impulse_factor(dt: f64) -> f64 {
    if dt > REFERENCE_FRAME_TIME {
        (REFERENCE_FRAME_TIME / dt).sqrt() * dt
    } else {
        dt
    }
}

#[inline]
pub fn damping_multiplier(damping_factor: f64, dt: f64) -> f64 {
    (1.0 - damping_factor).powf(dt / REFERENCE_FRAME_TIME)
}

#[inline]
pub fn inverse_square(distance: f64, scale: f64, min_separation: f64) -> f64 {
    let clamped = distance.max(min_separation);
    scale / (clamped * clamped)
}

/// Moves `current` toward `target` by the fraction `1 - exp(-rate * dt)` of the gap.
#[inline]
pub fn exponential_approach(current: f64, target: f64, rate: f64, dt: f64) -> f64 {
    target + (current - target) * (-rate * dt).exp()
}

/// Blend factor between true positions (0) and positions normalized to a common radius (1)
/// used by the radial repulsion, derived from the attraction residual.
#[inline]
pub fn true_lengths_ratio_override(attraction_error: f64) -> f64 {
    ((attraction_error + 1.0).ln() - 0.5).clamp(0.0, 1.0)
}

/// Share of the slot pull that is proportional to the offset rather than to its square.
pub const ATTRACTION_LINEAR_SHARE: f64 = 0.1;

/// Factor applied to the offset `delta` from a group to its slot to get the velocity impulse
/// of the central attraction.
///
/// The pull is measured in unit-direction space and rescaled to `reference_distance`, so a
/// molecule turns toward its slots at the same angular rate whatever its size. Returns zero
/// for a group sitting on the center.
#[inline]
pub fn central_attraction_gain(
    offset: f64,
    distance: f64,
    reference_distance: f64,
    strength: f64,
    dt: f64,
) -> f64 {
    if distance < 1e-12 {
        return 0.0;
    }
    dt * strength * (offset + ATTRACTION_LINEAR_SHARE * distance) * reference_distance / distance
}

/// Magnitude of the angular spring between two groups around the central atom.
///
/// Positive values push the groups apart. Opening an angle is twice as stiff as closing it,
/// and the spring stiffens up to threefold as the current angle shrinks.
#[inline]
pub fn angle_spring(current_angle: f64, target_angle: f64, scale: f64, dt: f64) -> f64 {
    let asymmetry = if current_angle < target_angle { 2.0 } else { 0.5 };
    let closeness = (3.0 * (PI - current_angle).powi(2) / (PI * PI)).clamp(1.0, 3.0);
    timescale_impulse_factor(dt) * (target_angle - current_angle) * scale * asymmetry * closeness
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn timescale_factor_is_identity_for_short_ticks() {
        assert_eq!(timescale_impulse_factor(0.01), 0.01);
        assert_eq!(timescale_impulse_factor(REFERENCE_FRAME_TIME), REFERENCE_FRAME_TIME);
    }

    #[test]
    fn timescale_factor_grows_with_square_root_for_long_ticks() {
        let dt = 4.0 * REFERENCE_FRAME_TIME;
        assert!((timescale_impulse_factor(dt) - 2.0 * REFERENCE_FRAME_TIME).abs() < TOLERANCE);
    }

    #[test]
    fn damping_multiplier_is_frame_rate_independent() {
        let one_long = damping_multiplier(0.1, 2.0 * REFERENCE_FRAME_TIME);
        let two_short = damping_multiplier(0.1, REFERENCE_FRAME_TIME).powi(2);
        assert!((one_long - two_short).abs() < TOLERANCE);
        assert!((damping_multiplier(0.1, REFERENCE_FRAME_TIME) - 0.9).abs() < TOLERANCE);
    }

    #[test]
    fn inverse_square_clamps_small_distances() {
        assert_eq!(inverse_square(2.0, 8.0, 1e-3), 2.0);
        assert_eq!(inverse_square(0.0, 1.0, 0.5), 4.0);
        assert!(inverse_square(0.0, 1.0, 1e-3).is_finite());
    }

    #[test]
    fn exponential_approach_converges_to_target() {
        assert_eq!(exponential_approach(5.0, 10.0, 1.0, 0.0), 5.0);
        let halfway = exponential_approach(0.0, 10.0, 2.0_f64.ln(), 1.0);
        assert!((halfway - 5.0).abs() < 1e-9);
        assert!((exponential_approach(0.0, 10.0, 10.0, 100.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn ratio_override_is_clamped_to_unit_interval() {
        assert_eq!(true_lengths_ratio_override(0.0), 0.0);
        assert_eq!(true_lengths_ratio_override(0.5), 0.0);
        assert_eq!(true_lengths_ratio_override(100.0), 1.0);
        let mid = true_lengths_ratio_override(1.5);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn central_attraction_turns_molecules_of_any_size_alike() {
        // A group 10 degrees off its slot, at the reference radius and at one tenth of it.
        let chord = 2.0 * (5.0_f64.to_radians()).sin();
        let large = central_attraction_gain(10.0 * chord, 10.0, 10.0, 3.0, 0.01);
        let small = central_attraction_gain(chord, 1.0, 10.0, 3.0, 0.01);
        // Angular velocity gained is `gain * offset / distance`.
        let large_turn = large * 10.0 * chord / 10.0;
        let small_turn = small * chord / 1.0;
        assert!((large_turn - small_turn).abs() < TOLERANCE);
        assert_eq!(central_attraction_gain(0.0, 0.0, 10.0, 3.0, 0.01), 0.0);
    }

    #[test]
    fn central_attraction_keeps_a_linear_floor() {
        let gain = central_attraction_gain(0.0, 10.0, 10.0, 3.0, 0.01);
        assert!((gain - 0.01 * 3.0 * ATTRACTION_LINEAR_SHARE * 10.0).abs() < TOLERANCE);
        assert!(central_attraction_gain(1.0, 10.0, 10.0, 3.0, 0.01) > gain);
    }

    #[test]
    fn angle_spring_opens_small_angles_and_closes_large_ones() {
        let target = 109.47_f64.to_radians();
        assert!(angle_spring(90.0_f64.to_radians(), target, 3.0, 0.01) > 0.0);
        assert!(angle_spring(150.0_f64.to_radians(), target, 3.0, 0.01) < 0.0);
        assert_eq!(angle_spring(target, target, 3.0, 0.01), 0.0);
    }

    #[test]
    fn angle_spring_is_stiffer_when_opening() {
        let target = PI / 2.0;
        let opening = angle_spring(target - 0.1, target, 1.0, 0.01).abs();
        let closing = angle_spring(target + 0.1, target, 1.0, 0.01).abs();
        assert!(opening > closing);
    }
}
