use super::attractor::{AttractionResult, find_closest_matching_configuration};
use super::error::EngineError;
use super::permutation::Permutation;
use crate::core::models::element::Element;
use crate::core::models::group::PairGroup;
use crate::core::models::ids::GroupId;
use crate::core::models::topology::BondOrder;
use crate::core::physics::params::PhysicsConfig;
use crate::core::physics::potentials;
use crate::core::utils::geometry::{angle_between, safe_normalize};
use nalgebra::Vector3;
use slotmap::SlotMap;

/// Equivalence class of a neighbor: groups of the same class may trade ideal slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupCategory {
    LonePair,
    /// VSEPR atoms, distinguished only by bond order.
    Bond(BondOrder),
    /// Atoms of a real molecule, distinguished by element and bond order.
    Atom(Option<Element>, BondOrder),
}

/// The neighbors of one atom together with the ideal geometry they should adopt.
///
/// A shape only stores group keys; the forces it computes are applied to the arena passed to
/// each call. Neighbors are ordered lone pairs first so they line up with the lone-pair slots of
/// the ideal geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalShape {
    center: GroupId,
    groups: Vec<GroupId>,
    ideal_orientations: Vec<Vector3<f64>>,
    permutations: Vec<Permutation>,
    pinned: Vec<bool>,
    around_central_atom: bool,
}

impl LocalShape {
    pub fn new(
        center: GroupId,
        groups: Vec<GroupId>,
        ideal_orientations: Vec<Vector3<f64>>,
        permutations: Vec<Permutation>,
        pinned: Vec<bool>,
        around_central_atom: bool,
    ) -> Result<Self, EngineError> {
        if groups.len() != ideal_orientations.len() || groups.len() != pinned.len() {
            return Err(EngineError::InvalidInput(format!(
                "local shape has {} groups, {} ideal orientations and {} mobility flags",
                groups.len(),
                ideal_orientations.len(),
                pinned.len()
            )));
        }
        Ok(Self {
            center,
            groups,
            ideal_orientations,
            permutations,
            pinned,
            around_central_atom,
        })
    }

    pub fn center(&self) -> GroupId {
        self.center
    }

    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    pub fn ideal_orientations(&self) -> &[Vector3<f64>] {
        &self.ideal_orientations
    }

    pub fn permutations(&self) -> &[Permutation] {
        &self.permutations
    }

    pub fn is_around_central_atom(&self) -> bool {
        self.around_central_atom
    }

    fn position_of(
        arena: &SlotMap<GroupId, PairGroup>,
        id: GroupId,
    ) -> Result<Vector3<f64>, EngineError> {
        arena
            .get(id)
            .map(|group| group.position)
            .ok_or_else(|| {
                EngineError::Internal(format!("local shape refers to missing group {id:?}"))
            })
    }

    pub fn match_orientations(
        &self,
        arena: &SlotMap<GroupId, PairGroup>,
    ) -> Result<AttractionResult, EngineError> {
        let center = Self::position_of(arena, self.center)?;
        let actual = self
            .groups
            .iter()
            .map(|&id| Self::position_of(arena, id).map(|p| safe_normalize(&(p - center))))
            .collect::<Result<Vec<_>, _>>()?;
        find_closest_matching_configuration(&actual, &self.ideal_orientations, &self.permutations)
    }

    /// Pulls every mobile neighbor toward its matched ideal orientation, keeping its distance.
    ///
    /// Around the central atom the pull is a velocity impulse, scaled so that real molecules
    /// measured in Ångström turn as quickly as model-sized ones; around any other atom the
    /// position is nudged directly. Returns the position-space residual measured before the
    /// pull, `sqrt(sum |target_i - p_i|^2)`.
    pub fn apply_attraction(
        &self,
        arena: &mut SlotMap<GroupId, PairGroup>,
        dt: f64,
        config: &PhysicsConfig,
    ) -> Result<f64, EngineError> {
        self.attract(arena, dt, config).map(|(error, _)| error)
    }

    fn attract(
        &self,
        arena: &mut SlotMap<GroupId, PairGroup>,
        dt: f64,
        config: &PhysicsConfig,
    ) -> Result<(f64, AttractionResult), EngineError> {
        let center = Self::position_of(arena, self.center)?;
        let result = self.match_orientations(arena)?;
        let nudge = (config.terminal_attraction_rate * dt).min(1.0);

        let mut squared_error = 0.0;
        for (index, &id) in self.groups.iter().enumerate() {
            let group = arena.get_mut(id).ok_or_else(|| {
                EngineError::Internal(format!("local shape refers to missing group {id:?}"))
            })?;
            let distance = (group.position - center).norm();
            let target = center + result.targets[index] * distance;
            let delta = target - group.position;
            squared_error += delta.norm_squared();

            if self.pinned[index] || group.user_controlled {
                continue;
            }
            if self.around_central_atom {
                let gain = potentials::central_attraction_gain(
                    delta.norm(),
                    distance,
                    config.bonded_pair_distance,
                    config.attraction_strength,
                    dt,
                );
                group.add_velocity(&(delta * gain));
            } else {
                group.add_position(&(delta * nudge));
            }
        }
        Ok((squared_error.sqrt(), result))
    }

    /// [`apply_attraction`](Self::apply_attraction) followed, around the central atom, by
    /// angular springs driving every pair of neighbors toward their ideal mutual angle.
    pub fn apply_angle_attraction_repulsion(
        &self,
        arena: &mut SlotMap<GroupId, PairGroup>,
        dt: f64,
        config: &PhysicsConfig,
    ) -> Result<f64, EngineError> {
        let (error, result) = self.attract(arena, dt, config)?;
        if !self.around_central_atom {
            return Ok(error);
        }

        let center = Self::position_of(arena, self.center)?;
        let positions = self
            .groups
            .iter()
            .map(|&id| Self::position_of(arena, id))
            .collect::<Result<Vec<_>, _>>()?;

        for i in 0..self.groups.len() {
            for j in (i + 1)..self.groups.len() {
                let current = angle_between(&(positions[i] - center), &(positions[j] - center));
                let target = angle_between(&result.targets[i], &result.targets[j]);
                let magnitude =
                    potentials::angle_spring(current, target, config.angle_repulsion_scale, dt);
                let push = safe_normalize(&(positions[i] - positions[j])) * magnitude;

                self.push_group(arena, i, &push);
                self.push_group(arena, j, &-push);
            }
        }
        Ok(error)
    }

    fn push_group(
        &self,
        arena: &mut SlotMap<GroupId, PairGroup>,
        index: usize,
        impulse: &Vector3<f64>,
    ) {
        if self.pinned[index] {
            return;
        }
        if let Some(group) = arena.get_mut(self.groups[index]) {
            if !group.user_controlled {
                group.add_velocity(impulse);
            }
        }
    }
}
