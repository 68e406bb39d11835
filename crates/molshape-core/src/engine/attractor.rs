use super::error::EngineError;
use super::permutation::Permutation;
use crate::core::utils::geometry::minimal_rotation;
use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

/// Improvement a later permutation needs over the current best to replace it.
pub const TIE_EPSILON: f64 = 1e-9;
const RANK_TOLERANCE: f64 = 1e-9;

/// The best superposition of a set of actual orientations onto an ideal geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct AttractionResult {
    /// `sum(1 - dot(R a_i, ideal_p(i)))`; zero for a perfect match.
    pub error: f64,
    /// Rotation from the actual frame into the ideal frame.
    pub rotation: UnitQuaternion<f64>,
    /// Maps the index of an actual orientation to the index of its ideal slot.
    pub permutation: Permutation,
    /// `targets[i]` is the ideal slot of actual orientation `i`, expressed in the actual frame.
    pub targets: Vec<Vector3<f64>>,
}

impl AttractionResult {
    fn empty() -> Self {
        Self {
            error: 0.0,
            rotation: UnitQuaternion::identity(),
            permutation: Permutation::identity(0),
            targets: Vec::new(),
        }
    }

    /// Expresses an ideal-frame direction in the actual frame.
    pub fn to_actual_frame(&self, ideal: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse_transform_vector(ideal)
    }
}

/// Least-squares rotation `R` minimizing `sum |R a_i - b_i|^2` (Kabsch).
///
/// Reflections are corrected by flipping the axis of the smallest singular value. When the
/// correlation matrix has rank one (all vectors collinear) the rotation about that line is
/// undetermined, and the minimal rotation between the principal axes is returned instead.
pub fn best_fit_rotation(actual: &[Vector3<f64>], ideal: &[Vector3<f64>]) -> UnitQuaternion<f64> {
    let correlation: Matrix3<f64> = actual
        .iter()
        .zip(ideal)
        .fold(Matrix3::zeros(), |m, (a, b)| m + a * b.transpose());

    let svd = correlation.svd(true, true);
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return UnitQuaternion::identity();
    };
    let singular = svd.singular_values;
    let largest = singular.max();
    let rank = singular
        .iter()
        .filter(|&&s| s > RANK_TOLERANCE * largest.max(1.0))
        .count();

    match rank {
        0 => UnitQuaternion::identity(),
        1 => {
            let principal = singular.imax();
            minimal_rotation(&u.column(principal).into_owned(), &v_t.row(principal).transpose())
        }
        _ => {
            let v = v_t.transpose();
            let mut correction = Matrix3::identity();
            if (v * u.transpose()).determinant() < 0.0 {
                let smallest = singular.imin();
                correction[(smallest, smallest)] = -1.0;
            }
            let matrix = v * correction * u.transpose();
            let quaternion =
                UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(matrix));
            UnitQuaternion::new_normalize(quaternion.into_inner())
        }
    }
}

pub fn residual_error(
    rotation: &UnitQuaternion<f64>,
    actual: &[Vector3<f64>],
    ideal: &[Vector3<f64>],
) -> f64 {
    actual
        .iter()
        .zip(ideal)
        .map(|(a, b)| 1.0 - (rotation * a).dot(b))
        .sum()
}

/// Finds the permutation and rotation that best superimpose `actual` onto `ideal`.
///
/// Permutations are tried in the given order; a later one wins only if it lowers the error by
/// more than [`TIE_EPSILON`]. Inputs are expected to be unit vectors and are never modified.
pub fn find_closest_matching_configuration(
    actual: &[Vector3<f64>],
    ideal: &[Vector3<f64>],
    permutations: &[Permutation],
) -> Result<AttractionResult, EngineError> {
    if actual.len() != ideal.len() {
        return Err(EngineError::InvalidInput(format!(
            "cannot match {} orientations against {} ideal slots",
            actual.len(),
            ideal.len()
        )));
    }
    if actual.is_empty() {
        return Ok(AttractionResult::empty());
    }
    if permutations.is_empty() {
        return Err(EngineError::InvalidInput(
            "at least one permutation is required".to_string(),
        ));
    }

    let mut best: Option<AttractionResult> = None;
    for permutation in permutations {
        if permutation.len() != actual.len() {
            return Err(EngineError::InvalidInput(format!(
                "permutation of length {} does not fit {} orientations",
                permutation.len(),
                actual.len()
            )));
        }
        let permuted_ideal = permutation.apply_to(ideal);
        let rotation = best_fit_rotation(actual, &permuted_ideal);
        let error = residual_error(&rotation, actual, &permuted_ideal);
        if best
            .as_ref()
            .is_none_or(|current| error < current.error - TIE_EPSILON)
        {
            best = Some(AttractionResult {
                error,
                rotation,
                permutation: permutation.clone(),
                targets: Vec::new(),
            });
        }
    }

    let mut best = best.ok_or_else(|| {
        EngineError::Internal("no permutation produced a candidate match".to_string())
    })?;
    let targets = best
        .permutation
        .apply_to(ideal)
        .iter()
        .map(|slot| best.to_actual_frame(slot))
        .collect();
    best.targets = targets;
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::configuration::configuration;
    use nalgebra::Unit;

    const TOLERANCE: f64 = 1e-6;

    fn sample_rotation() -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Unit::new_normalize(Vector3::new(1.0, -2.0, 0.5)), 0.9)
    }

    #[test]
    fn identity_input_matches_with_identity_rotation() {
        for n in 2..=6 {
            let ideal = configuration(n).unit_vectors();
            let result =
                find_closest_matching_configuration(&ideal, &ideal, &Permutation::all(n)).unwrap();
            assert!(result.error.abs() < TOLERANCE, "n = {n}: error {}", result.error);
            assert!(result.rotation.angle() < TOLERANCE, "n = {n}");
            assert!(result.permutation.is_identity(), "n = {n}");
        }
    }

    #[test]
    fn rotated_input_recovers_inverse_rotation() {
        let ideal = configuration(5).unit_vectors();
        let q = sample_rotation();
        let actual: Vec<_> = ideal.iter().map(|v| q * v).collect();
        let result =
            find_closest_matching_configuration(&actual, &ideal, &[Permutation::identity(5)])
                .unwrap();
        assert!(result.error.abs() < TOLERANCE);
        assert!(result.rotation.angle_to(&q.inverse()) < TOLERANCE);
        for (target, a) in result.targets.iter().zip(&actual) {
            assert!((target - a).norm() < TOLERANCE);
        }
    }

    #[test]
    fn swapped_pair_is_recovered_from_tetrahedron() {
        let ideal = configuration(4).unit_vectors();
        let q = sample_rotation();
        let swapped = [ideal[0], ideal[2], ideal[1], ideal[3]];
        let actual: Vec<_> = swapped.iter().map(|v| q * v).collect();
        let permutations = Permutation::within_classes(&['a', 'b', 'b', 'c']);

        let result = find_closest_matching_configuration(&actual, &ideal, &permutations).unwrap();
        assert_eq!(result.permutation.indices(), &[0, 2, 1, 3]);
        assert!(result.error.abs() < TOLERANCE);
        for (i, a) in actual.iter().enumerate() {
            let mapped = result.rotation * a;
            assert!((mapped - ideal[result.permutation.apply(i)]).norm() < TOLERANCE);
        }
    }

    #[test]
    fn exhaustive_search_finds_an_exact_match_for_relabelled_tetrahedron() {
        let ideal = configuration(4).unit_vectors();
        let q = sample_rotation();
        let actual: Vec<_> = [ideal[3], ideal[1], ideal[0], ideal[2]]
            .iter()
            .map(|v| q * v)
            .collect();
        let result =
            find_closest_matching_configuration(&actual, &ideal, &Permutation::all(4)).unwrap();
        assert!(result.error.abs() < TOLERANCE);
    }

    #[test]
    fn reflected_input_is_never_matched_by_a_reflection() {
        let ideal = configuration(4).unit_vectors();
        let mirrored: Vec<_> = ideal.iter().map(|v| Vector3::new(v.x, v.y, -v.z)).collect();
        let rotation = best_fit_rotation(&mirrored, &ideal);
        let matrix = rotation.to_rotation_matrix();
        assert!((matrix.matrix().determinant() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn collinear_input_uses_minimal_rotation() {
        let axis = Vector3::new(0.0, 1.0, 1.0).normalize();
        let actual = [axis, -axis];
        let ideal = configuration(2).unit_vectors();
        let result =
            find_closest_matching_configuration(&actual, &ideal, &[Permutation::identity(2)])
                .unwrap();
        assert!(result.error.abs() < TOLERANCE);
        assert!((result.rotation * axis - Vector3::x()).norm() < TOLERANCE);
        assert!((result.rotation.angle() - std::f64::consts::FRAC_PI_2).abs() < TOLERANCE);
    }

    #[test]
    fn single_vector_is_matched_exactly() {
        let actual = [Vector3::new(0.0, 0.0, -1.0)];
        let ideal = [Vector3::x()];
        let result =
            find_closest_matching_configuration(&actual, &ideal, &[Permutation::identity(1)])
                .unwrap();
        assert!(result.error.abs() < TOLERANCE);
        assert!((result.targets[0] - actual[0]).norm() < TOLERANCE);
    }

    #[test]
    fn ties_keep_the_earlier_permutation() {
        let ideal = configuration(2).unit_vectors();
        let actual = [Vector3::y(), -Vector3::y()];
        let permutations = Permutation::all(2);
        let result = find_closest_matching_configuration(&actual, &ideal, &permutations).unwrap();
        assert!(result.permutation.is_identity());
    }

    #[test]
    fn inputs_are_not_mutated() {
        let ideal = configuration(3).unit_vectors();
        let actual: Vec<_> = ideal.iter().map(|v| sample_rotation() * v).collect();
        let actual_before = actual.clone();
        let ideal_before = ideal.clone();
        find_closest_matching_configuration(&actual, &ideal, &Permutation::all(3)).unwrap();
        assert_eq!(actual, actual_before);
        assert_eq!(ideal, ideal_before);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let ideal = configuration(3).unit_vectors();
        let result =
            find_closest_matching_configuration(&ideal[..2], &ideal, &[Permutation::identity(2)]);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn empty_permutation_set_is_rejected_for_non_empty_input() {
        let ideal = configuration(2).unit_vectors();
        let result = find_closest_matching_configuration(&ideal, &ideal, &[]);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn wrong_length_permutation_is_rejected() {
        let ideal = configuration(2).unit_vectors();
        let result =
            find_closest_matching_configuration(&ideal, &ideal, &[Permutation::identity(3)]);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let result = find_closest_matching_configuration(&[], &[], &[]).unwrap();
        assert_eq!(result.error, 0.0);
        assert!(result.targets.is_empty());
    }
}
