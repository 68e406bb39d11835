use nalgebra::{Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;

pub const NORMALIZE_EPSILON: f64 = 1e-12;

pub fn fallback_axis() -> Vector3<f64> {
    Vector3::z()
}

/// Normalizes `v`, returning [`fallback_axis`] for zero-length or non-finite input.
pub fn safe_normalize(v: &Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if !norm.is_finite() || norm < NORMALIZE_EPSILON {
        fallback_axis()
    } else {
        v / norm
    }
}

pub fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let unit = safe_normalize(v);
    let helper = if unit.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    safe_normalize(&unit.cross(&helper))
}

/// Angle between two vectors in radians, with the cosine clamped to `[-1, 1]`.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    safe_normalize(a)
        .dot(&safe_normalize(b))
        .clamp(-1.0, 1.0)
        .acos()
}

pub fn angle_between_degrees(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    angle_between(a, b).to_degrees()
}

/// The smallest rotation taking the direction of `from` onto the direction of `to`.
///
/// Antiparallel inputs rotate by half a turn about an arbitrary perpendicular axis; a zero
/// vector on either side yields the identity.
pub fn minimal_rotation(from: &Vector3<f64>, to: &Vector3<f64>) -> UnitQuaternion<f64> {
    if from.norm() < NORMALIZE_EPSILON || to.norm() < NORMALIZE_EPSILON {
        return UnitQuaternion::identity();
    }
    UnitQuaternion::rotation_between(from, to).unwrap_or_else(|| {
        UnitQuaternion::from_axis_angle(&Unit::new_normalize(any_perpendicular(from)), PI)
    })
}

pub fn is_finite_vector(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn safe_normalize_returns_unit_vector() {
        let n = safe_normalize(&Vector3::new(3.0, 0.0, 4.0));
        assert!((n.norm() - 1.0).abs() < TOLERANCE);
        assert!((n.x - 0.6).abs() < TOLERANCE);
    }

    #[test]
    fn safe_normalize_falls_back_for_degenerate_input() {
        assert_eq!(safe_normalize(&Vector3::zeros()), fallback_axis());
        assert_eq!(
            safe_normalize(&Vector3::new(f64::NAN, 1.0, 0.0)),
            fallback_axis()
        );
    }

    #[test]
    fn any_perpendicular_is_orthogonal_unit_vector() {
        for v in [Vector3::x(), Vector3::y(), Vector3::new(1.0, 2.0, -3.0)] {
            let p = any_perpendicular(&v);
            assert!(p.dot(&v).abs() < TOLERANCE);
            assert!((p.norm() - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn angle_between_handles_parallel_and_antiparallel() {
        let v = Vector3::new(1.0, 1.0, 0.0);
        assert!(angle_between(&v, &(v * 2.0)).abs() < 1e-6);
        assert!((angle_between(&v, &-v) - PI).abs() < 1e-6);
        assert!((angle_between_degrees(&Vector3::x(), &Vector3::y()) - 90.0).abs() < TOLERANCE);
    }

    #[test]
    fn minimal_rotation_maps_from_onto_to() {
        let from = Vector3::new(1.0, 2.0, 3.0);
        let to = Vector3::new(-2.0, 0.5, 1.0);
        let rotated = minimal_rotation(&from, &to) * safe_normalize(&from);
        assert!((rotated - safe_normalize(&to)).norm() < 1e-9);
    }

    #[test]
    fn minimal_rotation_handles_antiparallel_vectors() {
        let from = Vector3::new(0.0, 0.0, 2.0);
        let rotated = minimal_rotation(&from, &-from) * Vector3::z();
        assert!((rotated + Vector3::z()).norm() < 1e-9);
    }

    #[test]
    fn minimal_rotation_of_zero_vector_is_identity() {
        let rotation = minimal_rotation(&Vector3::zeros(), &Vector3::x());
        assert!(rotation.angle() < TOLERANCE);
    }
}
