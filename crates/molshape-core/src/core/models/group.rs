use super::element::Element;
use crate::core::physics::params::PhysicsConfig;
use crate::core::physics::potentials;
use crate::core::utils::geometry::{
    any_perpendicular, fallback_axis, is_finite_vector, safe_normalize,
};
use nalgebra::Vector3;

/// Sine of the angle below which two groups count as lying on one ray from the origin.
const COLLINEAR_TOLERANCE: f64 = 1e-6;
/// Sideways share of the repulsion between groups on one ray.
const COLLINEAR_TIE_BREAK: f64 = 0.1;

/// A point mass standing in for one electron domain: a bonded atom or a lone pair.
///
/// Positions are relative to the molecule's frame, with the central atom at the origin. The
/// bond order of a group lives on the bond attaching it to its parent, not on the group.
#[derive(Debug, Clone, PartialEq)]
pub struct PairGroup {
    /// Monotonic serial assigned when the group joins a molecule; `0` before that.
    pub(crate) serial: u64,
    /// Current position in model units.
    pub position: Vector3<f64>,
    /// Current velocity in model units per second.
    pub velocity: Vector3<f64>,
    /// Whether this group represents a lone pair rather than an atom.
    pub is_lone_pair: bool,
    /// Chemical element of an atom; `None` for lone pairs and generic VSEPR atoms.
    pub element: Option<Element>,
    /// Set while the user holds the group; every force and integration pass skips it.
    pub user_controlled: bool,
}

impl PairGroup {
    pub fn new(position: Vector3<f64>, is_lone_pair: bool, element: Option<Element>) -> Self {
        Self {
            serial: 0,
            position,
            velocity: Vector3::zeros(),
            is_lone_pair,
            element,
            user_controlled: false,
        }
    }

    pub fn atom(position: Vector3<f64>, element: Option<Element>) -> Self {
        Self::new(position, false, element)
    }

    pub fn lone_pair(position: Vector3<f64>) -> Self {
        Self::new(position, true, None)
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Unit vector from `origin` toward this group.
    pub fn orientation_from(&self, origin: &Vector3<f64>) -> Vector3<f64> {
        safe_normalize(&(self.position - origin))
    }

    pub fn add_velocity(&mut self, impulse: &Vector3<f64>) {
        self.velocity += impulse;
    }

    pub fn add_position(&mut self, delta: &Vector3<f64>) {
        self.position += delta;
    }

    /// Overwrites the position and stops the group.
    pub fn drag_to_position(&mut self, position: Vector3<f64>) {
        self.position = position;
        self.velocity = Vector3::zeros();
    }

    fn repulsion_position(&self, ratio: f64, config: &PhysicsConfig) -> Vector3<f64> {
        let normalized = safe_normalize(&self.position) * config.bonded_pair_distance;
        self.position.lerp(&normalized, ratio)
    }

    /// The impulse `other` exerts on this group during one tick.
    ///
    /// `true_lengths_ratio_override` blends the positions used for the distance between true
    /// positions (`0`) and positions projected onto the bonded-pair sphere (`1`). Returns zero
    /// when either group is user-controlled.
    pub fn repulsion_impulse(
        &self,
        other: &PairGroup,
        dt: f64,
        true_lengths_ratio_override: f64,
        config: &PhysicsConfig,
    ) -> Vector3<f64> {
        if self.user_controlled || other.user_controlled {
            return Vector3::zeros();
        }
        let ratio = true_lengths_ratio_override.clamp(0.0, 1.0);
        let delta = self.repulsion_position(ratio, config) - other.repulsion_position(ratio, config);
        let distance = delta.norm();
        let axis = any_perpendicular(&self.position);
        let side = if self.serial <= other.serial { -axis } else { axis };
        let (direction, separation) = if distance > config.min_separation * 1e-3 {
            let direction = delta / distance;
            if self.shares_ray_with(other) {
                // A purely radial push would be discarded by the integrator.
                (safe_normalize(&(direction + side * COLLINEAR_TIE_BREAK)), distance)
            } else {
                (direction, distance)
            }
        } else {
            // Groups that coincide once blended separate sideways, in opposite senses, as
            // strongly as their true separation warrants.
            (side, (self.position - other.position).norm())
        };
        let magnitude = potentials::timescale_impulse_factor(dt)
            * potentials::inverse_square(
                separation,
                config.electron_pair_repulsion_scale,
                config.min_separation,
            );
        direction * magnitude
    }

    /// Whether both groups point the same way from the origin.
    fn shares_ray_with(&self, other: &PairGroup) -> bool {
        let a = safe_normalize(&self.position);
        let b = safe_normalize(&other.position);
        a.dot(&b) > 0.0 && a.cross(&b).norm() < COLLINEAR_TOLERANCE
    }

    pub fn repulse_from(
        &mut self,
        other: &PairGroup,
        dt: f64,
        true_lengths_ratio_override: f64,
        config: &PhysicsConfig,
    ) {
        let impulse = self.repulsion_impulse(other, dt, true_lengths_ratio_override, config);
        self.add_velocity(&impulse);
    }

    /// Integrates one tick of motion about `origin`, the parent's position.
    ///
    /// Radial velocity is discarded first so bond lengths are governed only by
    /// [`attract_to_ideal_distance`](Self::attract_to_ideal_distance).
    pub fn step_forward(&mut self, dt: f64, origin: &Vector3<f64>, config: &PhysicsConfig) {
        if self.user_controlled {
            return;
        }
        let radial = self.orientation_from(origin);
        self.velocity -= radial * self.velocity.dot(&radial);
        self.position += self.velocity * dt;
        self.velocity *= potentials::damping_multiplier(config.damping_factor, dt);
    }

    pub fn attract_to_ideal_distance(
        &mut self,
        dt: f64,
        origin: &Vector3<f64>,
        ideal_distance: f64,
        config: &PhysicsConfig,
    ) {
        if self.user_controlled {
            return;
        }
        let offset = self.position - origin;
        let distance = offset.norm();
        let new_distance = potentials::exponential_approach(
            distance,
            ideal_distance,
            config.distance_attraction_rate,
            dt,
        );
        self.position = origin + safe_normalize(&offset) * new_distance;
    }

    /// Resets a group whose state stopped being finite. Returns `true` if a reset happened.
    pub fn recover_non_finite(&mut self, origin: &Vector3<f64>, ideal_distance: f64) -> bool {
        if is_finite_vector(&self.position) && is_finite_vector(&self.velocity) {
            return false;
        }
        let direction = if is_finite_vector(&self.position) {
            self.orientation_from(origin)
        } else {
            fallback_axis()
        };
        self.position = origin + direction * ideal_distance;
        self.velocity = Vector3::zeros();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn config() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    fn atom_at(x: f64, y: f64, z: f64) -> PairGroup {
        PairGroup::atom(Vector3::new(x, y, z), None)
    }

    #[test]
    fn new_group_has_expected_default_fields() {
        let lp = PairGroup::lone_pair(Vector3::new(0.0, 7.0, 0.0));
        assert!(lp.is_lone_pair);
        assert_eq!(lp.element, None);
        assert_eq!(lp.velocity, Vector3::zeros());
        assert!(!lp.user_controlled);
        assert_eq!(lp.serial(), 0);

        let atom = PairGroup::atom(Vector3::x(), Some(Element::F));
        assert!(!atom.is_lone_pair);
        assert_eq!(atom.element, Some(Element::F));
    }

    #[test]
    fn repulsion_pushes_groups_apart_with_equal_and_opposite_impulses() {
        let a = atom_at(10.0, 0.0, 0.0);
        let b = atom_at(0.0, 10.0, 0.0);
        let on_a = a.repulsion_impulse(&b, 0.01, 0.0, &config());
        let on_b = b.repulsion_impulse(&a, 0.01, 0.0, &config());
        assert!(on_a.dot(&(a.position - b.position)) > 0.0);
        assert!((on_a + on_b).norm() < TOLERANCE);
    }

    #[test]
    fn repulsion_follows_inverse_square_law() {
        let a = atom_at(1.0, 0.0, 0.0);
        let near = atom_at(-1.0, 0.0, 0.0);
        let far = atom_at(-3.0, 0.0, 0.0);
        let near_impulse = a.repulsion_impulse(&near, 0.01, 0.0, &config()).norm();
        let far_impulse = a.repulsion_impulse(&far, 0.01, 0.0, &config()).norm();
        assert!((near_impulse / far_impulse - 4.0).abs() < 1e-9);
    }

    #[test]
    fn repulsion_ratio_normalizes_positions_to_bonded_radius() {
        let a = atom_at(20.0, 0.0, 0.0);
        let b = atom_at(0.0, 5.0, 0.0);
        let normalized = a.repulsion_impulse(&b, 0.01, 1.0, &config());
        let equal_radius = atom_at(10.0, 0.0, 0.0).repulsion_impulse(
            &atom_at(0.0, 10.0, 0.0),
            0.01,
            0.0,
            &config(),
        );
        assert!((normalized - equal_radius).norm() < TOLERANCE);
    }

    #[test]
    fn repulsion_is_noop_when_either_group_is_user_controlled() {
        let mut a = atom_at(10.0, 0.0, 0.0);
        let mut b = atom_at(0.0, 10.0, 0.0);
        b.user_controlled = true;
        a.repulse_from(&b, 0.01, 0.0, &config());
        assert_eq!(a.velocity, Vector3::zeros());

        b.user_controlled = false;
        a.user_controlled = true;
        b.repulse_from(&a, 0.01, 0.0, &config());
        assert_eq!(b.velocity, Vector3::zeros());
    }

    #[test]
    fn coincident_groups_receive_finite_opposite_impulses() {
        let mut a = atom_at(10.0, 0.0, 0.0);
        let mut b = atom_at(10.0, 0.0, 0.0);
        a.serial = 1;
        b.serial = 2;
        let on_a = a.repulsion_impulse(&b, 0.01, 0.0, &config());
        let on_b = b.repulsion_impulse(&a, 0.01, 0.0, &config());
        assert!(is_finite_vector(&on_a) && is_finite_vector(&on_b));
        assert!(on_a.norm() > 0.0);
        assert!((on_a + on_b).norm() < TOLERANCE);
    }

    #[test]
    fn groups_on_one_ray_are_pushed_sideways() {
        let mut atom = atom_at(10.0, 0.0, 0.0);
        let mut lp = PairGroup::lone_pair(Vector3::new(7.0, 0.0, 0.0));
        atom.serial = 1;
        lp.serial = 2;
        let on_atom = atom.repulsion_impulse(&lp, 0.01, 0.0, &config());
        let on_lp = lp.repulsion_impulse(&atom, 0.01, 0.0, &config());
        assert!(on_atom.x > 0.0);
        assert!(on_atom.y.abs() + on_atom.z.abs() > 0.05 * on_atom.norm());
        assert!((on_atom + on_lp).norm() < TOLERANCE);

        let mut moved = atom.clone();
        moved.add_velocity(&on_atom);
        moved.step_forward(0.01, &Vector3::zeros(), &config());
        assert!(moved.velocity.norm() > 0.0);
        assert!(moved.position.y.abs() + moved.position.z.abs() > 0.0);
    }

    #[test]
    fn groups_blended_onto_one_point_use_their_true_separation() {
        let mut atom = atom_at(10.0, 0.0, 0.0);
        let mut lp = PairGroup::lone_pair(Vector3::new(7.0, 0.0, 0.0));
        atom.serial = 1;
        lp.serial = 2;
        let blended = atom.repulsion_impulse(&lp, 0.01, 1.0, &config());
        let expected = potentials::timescale_impulse_factor(0.01)
            * potentials::inverse_square(3.0, config().electron_pair_repulsion_scale, 1e-3);
        assert!((blended.norm() - expected).abs() < 1e-9);
        assert!(blended.x.abs() < TOLERANCE);
        assert!((blended + lp.repulsion_impulse(&atom, 0.01, 1.0, &config())).norm() < TOLERANCE);
    }

    #[test]
    fn step_forward_discards_radial_velocity_and_damps() {
        let mut group = atom_at(10.0, 0.0, 0.0);
        group.velocity = Vector3::new(5.0, 1.0, 0.0);
        group.step_forward(0.017, &Vector3::zeros(), &config());
        assert!((group.position - Vector3::new(10.0, 0.017, 0.0)).norm() < TOLERANCE);
        assert!((group.velocity - Vector3::new(0.0, 0.9, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn attract_to_ideal_distance_preserves_direction() {
        let mut group = atom_at(0.0, 20.0, 0.0);
        group.attract_to_ideal_distance(0.05, &Vector3::zeros(), 10.0, &config());
        let expected = 10.0 + 10.0 * (-0.5_f64).exp();
        assert!((group.position.norm() - expected).abs() < TOLERANCE);
        assert!(group.position.x.abs() < TOLERANCE && group.position.z.abs() < TOLERANCE);
    }

    #[test]
    fn integration_skips_user_controlled_groups() {
        let mut group = atom_at(3.0, 4.0, 0.0);
        group.velocity = Vector3::new(0.0, 0.0, 2.0);
        group.user_controlled = true;
        group.step_forward(0.1, &Vector3::zeros(), &config());
        group.attract_to_ideal_distance(0.1, &Vector3::zeros(), 10.0, &config());
        assert_eq!(group.position, Vector3::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn drag_to_position_overwrites_position_and_stops_group() {
        let mut group = atom_at(10.0, 0.0, 0.0);
        group.velocity = Vector3::new(1.0, 1.0, 1.0);
        group.drag_to_position(Vector3::new(0.0, 0.0, 9.0));
        assert_eq!(group.position, Vector3::new(0.0, 0.0, 9.0));
        assert_eq!(group.velocity, Vector3::zeros());
    }

    #[test]
    fn recover_non_finite_resets_to_ideal_distance() {
        let mut group = atom_at(0.0, 3.0, 0.0);
        assert!(!group.recover_non_finite(&Vector3::zeros(), 10.0));

        group.velocity = Vector3::new(f64::INFINITY, 0.0, 0.0);
        assert!(group.recover_non_finite(&Vector3::zeros(), 10.0));
        assert_eq!(group.position, Vector3::new(0.0, 10.0, 0.0));
        assert_eq!(group.velocity, Vector3::zeros());

        group.position = Vector3::new(f64::NAN, 0.0, 0.0);
        assert!(group.recover_non_finite(&Vector3::zeros(), 10.0));
        assert!((group.position.norm() - 10.0).abs() < TOLERANCE);
    }
}
