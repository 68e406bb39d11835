use super::attractor::find_closest_matching_configuration;
use super::error::{EngineError, MoleculeError};
use super::local_shape::{GroupCategory, LocalShape};
use super::permutation::Permutation;
use crate::core::geometry::configuration::{GeometryConfiguration, MAX_STERIC_NUMBER};
use crate::core::geometry::vsepr::VseprConfiguration;
use crate::core::models::element::Element;
use crate::core::models::events::{EventQueue, MoleculeEvent};
use crate::core::models::group::PairGroup;
use crate::core::models::ids::GroupId;
use crate::core::models::topology::{Bond, BondOrder};
use crate::core::physics::params::PhysicsConfig;
use crate::core::shapes::real::RealMoleculeShape;
use crate::core::utils::geometry::{
    NORMALIZE_EPSILON, angle_between_degrees, fallback_axis, is_finite_vector, safe_normalize,
};
use nalgebra::Vector3;
use slotmap::{SecondaryMap, SlotMap};
use tracing::debug;

/// Update policy of a molecule.
#[derive(Debug, Clone)]
pub enum MoleculeKind {
    /// Freely editable molecule relaxing toward ideal VSEPR geometry.
    Vsepr,
    /// Locked experimental structure; only lone pairs move.
    Real {
        shape: &'static RealMoleculeShape,
        central_shape: LocalShape,
    },
}

/// A central atom with its radial groups and their terminal lone pairs.
///
/// The molecule owns every [`PairGroup`] in a slotmap arena and keeps the bonds between them
/// as a tree of depth at most two rooted at the central atom: radial atoms and lone pairs hang
/// off the central atom, and terminal lone pairs hang off radial atoms. Every successful
/// structural edit appends [`MoleculeEvent`]s to an internal queue that a view drains once per
/// frame with [`drain_events`](Self::drain_events).
#[derive(Debug, Clone)]
pub struct Molecule {
    pub(crate) groups: SlotMap<GroupId, PairGroup>,
    order: Vec<GroupId>,
    bonds: Vec<Bond>,
    neighbors: SecondaryMap<GroupId, Vec<GroupId>>,
    parents: SecondaryMap<GroupId, GroupId>,
    central_atom: GroupId,
    next_serial: u64,
    pub(crate) config: PhysicsConfig,
    pub(crate) kind: MoleculeKind,
    events: EventQueue,
}

impl Default for Molecule {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl Molecule {
    pub fn new(config: PhysicsConfig) -> Self {
        Self::with_central_element(config, None)
    }

    /// Creates a molecule after validating `config`.
    pub fn try_new(config: PhysicsConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn with_central_element(config: PhysicsConfig, element: Option<Element>) -> Self {
        let central = PairGroup::atom(Vector3::zeros(), element);
        let mut groups = SlotMap::with_key();
        let central_atom = groups.insert(central.clone());
        let mut neighbors = SecondaryMap::new();
        neighbors.insert(central_atom, Vec::new());
        let mut events = EventQueue::new();
        events.push(MoleculeEvent::GroupAdded {
            id: central_atom,
            group: central,
        });

        Self {
            groups,
            order: vec![central_atom],
            bonds: Vec::new(),
            neighbors,
            parents: SecondaryMap::new(),
            central_atom,
            next_serial: 1,
            config,
            kind: MoleculeKind::Vsepr,
            events,
        }
    }

    // --- Queries ---

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn kind(&self) -> &MoleculeKind {
        &self.kind
    }

    pub fn is_real(&self) -> bool {
        matches!(self.kind, MoleculeKind::Real { .. })
    }

    pub fn real_shape(&self) -> Option<&'static RealMoleculeShape> {
        match &self.kind {
            MoleculeKind::Real { shape, .. } => Some(*shape),
            MoleculeKind::Vsepr => None,
        }
    }

    pub fn central_atom(&self) -> GroupId {
        self.central_atom
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.groups.contains_key(id)
    }

    pub fn group(&self, id: GroupId) -> Option<&PairGroup> {
        self.groups.get(id)
    }

    /// All groups, central atom first, in insertion order.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &PairGroup)> {
        self.order
            .iter()
            .filter_map(move |&id| self.groups.get(id).map(|group| (id, group)))
    }

    pub fn group_ids(&self) -> &[GroupId] {
        &self.order
    }

    pub fn group_count(&self) -> usize {
        self.order.len()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn neighbors(&self, id: GroupId) -> &[GroupId] {
        self.neighbors.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn neighbor_count(&self, id: GroupId) -> usize {
        self.neighbors(id).len()
    }

    pub fn parent_of(&self, id: GroupId) -> Option<GroupId> {
        self.parents.get(id).copied()
    }

    pub fn bond_between(&self, a: GroupId, b: GroupId) -> Option<&Bond> {
        self.bonds.iter().find(|bond| bond.connects(a, b))
    }

    pub fn parent_bond(&self, id: GroupId) -> Option<&Bond> {
        self.parent_of(id)
            .and_then(|parent| self.bond_between(parent, id))
    }

    /// Bond length the group is pulled toward, or `None` for the central atom.
    pub fn ideal_distance(&self, id: GroupId) -> Option<f64> {
        self.parent_bond(id).map(|bond| bond.length)
    }

    pub fn radial_groups(&self) -> Vec<GroupId> {
        self.neighbors(self.central_atom).to_vec()
    }

    pub fn radial_atoms(&self) -> Vec<GroupId> {
        self.radial_filtered(false)
    }

    pub fn radial_lone_pairs(&self) -> Vec<GroupId> {
        self.radial_filtered(true)
    }

    fn radial_filtered(&self, lone_pairs: bool) -> Vec<GroupId> {
        self.neighbors(self.central_atom)
            .iter()
            .copied()
            .filter(|&id| self.groups.get(id).is_some_and(|g| g.is_lone_pair == lone_pairs))
            .collect()
    }

    /// Lone pairs attached to a radial atom rather than to the central atom.
    pub fn distant_lone_pairs(&self) -> Vec<GroupId> {
        self.groups()
            .filter(|(id, group)| {
                group.is_lone_pair && self.parent_of(*id) != Some(self.central_atom)
            })
            .map(|(id, _)| id)
            .collect()
    }

    pub fn lone_pairs(&self) -> Vec<GroupId> {
        self.groups()
            .filter(|(_, group)| group.is_lone_pair)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn steric_number(&self) -> usize {
        self.neighbor_count(self.central_atom)
    }

    pub fn vsepr_configuration(&self) -> VseprConfiguration {
        VseprConfiguration::new(self.radial_atoms().len(), self.radial_lone_pairs().len())
    }

    /// Angle in degrees between two groups as seen from the central atom.
    pub fn bond_angle(&self, a: GroupId, b: GroupId) -> Option<f64> {
        let center = self.groups.get(self.central_atom)?.position;
        let pa = self.groups.get(a)?.position;
        let pb = self.groups.get(b)?.position;
        Some(angle_between_degrees(&(pa - center), &(pb - center)))
    }

    /// Largest bond length a view should allow; real molecules have no such limit.
    pub fn maximum_bond_length(&self) -> Option<f64> {
        match self.kind {
            MoleculeKind::Vsepr => Some(self.config.maximum_bond_length()),
            MoleculeKind::Real { .. } => None,
        }
    }

    /// Distance at which new lone pairs are placed from their parent.
    pub fn lone_pair_distance(&self) -> f64 {
        match &self.kind {
            MoleculeKind::Vsepr => self.config.lone_pair_distance,
            MoleculeKind::Real { shape, .. } => shape.lone_pair_distance(&self.config),
        }
    }

    pub fn pending_events(&self) -> impl Iterator<Item = &MoleculeEvent> {
        self.events.iter()
    }

    pub fn drain_events(&mut self) -> Vec<MoleculeEvent> {
        self.events.drain()
    }

    // --- Structural edits ---

    fn ensure_unlocked(&self) -> Result<(), MoleculeError> {
        if self.is_real() {
            Err(MoleculeError::StructureLocked)
        } else {
            Ok(())
        }
    }

    /// Adds `group` as a dependent of `parent`, joined by a bond of `order` and `length`.
    ///
    /// The group keeps the given position unless it coincides with the parent, in which case
    /// it is placed `length` away along a fixed axis.
    pub fn add_group_and_bond(
        &mut self,
        group: PairGroup,
        parent: GroupId,
        order: BondOrder,
        length: f64,
    ) -> Result<GroupId, MoleculeError> {
        self.ensure_unlocked()?;
        self.insert_group_and_bond(group, parent, order, length)
    }

    pub(crate) fn insert_group_and_bond(
        &mut self,
        mut group: PairGroup,
        parent: GroupId,
        order: BondOrder,
        length: f64,
    ) -> Result<GroupId, MoleculeError> {
        let parent_group = self
            .groups
            .get(parent)
            .ok_or(MoleculeError::GroupNotFound(parent))?;
        if parent_group.is_lone_pair {
            return Err(MoleculeError::LonePairParent(parent));
        }
        let parent_is_radial = self.parent_of(parent) == Some(self.central_atom);
        if parent != self.central_atom && !(parent_is_radial && group.is_lone_pair) {
            return Err(MoleculeError::DepthExceeded { parent });
        }
        if order.is_lone_pair() != group.is_lone_pair {
            return Err(MoleculeError::BondOrderMismatch {
                order,
                is_lone_pair: group.is_lone_pair,
            });
        }
        if !(length.is_finite() && length > 0.0) {
            return Err(MoleculeError::InvalidBondLength(length));
        }
        if self.neighbor_count(parent) >= MAX_STERIC_NUMBER {
            return Err(MoleculeError::TooManyNeighbors {
                parent,
                max: MAX_STERIC_NUMBER,
            });
        }

        let origin = parent_group.position;
        if !is_finite_vector(&group.position) || (group.position - origin).norm() < NORMALIZE_EPSILON
        {
            group.position = origin + fallback_axis() * length;
        }
        group.serial = self.next_serial;
        self.next_serial += 1;

        let id = self.groups.insert(group.clone());
        self.order.push(id);
        self.neighbors.insert(id, vec![parent]);
        if let Some(siblings) = self.neighbors.get_mut(parent) {
            siblings.push(id);
        }
        self.parents.insert(id, parent);
        let bond = Bond::new(parent, id, order, length);
        self.bonds.push(bond);

        debug!(
            serial = group.serial,
            lone_pair = group.is_lone_pair,
            %order,
            length,
            "Added pair group."
        );
        self.events.push(MoleculeEvent::GroupAdded { id, group });
        self.events.push(MoleculeEvent::BondAdded(bond));
        self.debug_assert_tree();
        Ok(id)
    }

    /// Removes a group together with every group depending on it.
    ///
    /// Returns the removed keys, dependents first. Events are emitted per group in the same
    /// order: the parent bond's `BondRemoved`, then `GroupRemoved`.
    pub fn remove_group(&mut self, id: GroupId) -> Result<Vec<GroupId>, MoleculeError> {
        self.ensure_unlocked()?;
        if id == self.central_atom {
            return Err(MoleculeError::CentralAtomRemoval);
        }
        if !self.groups.contains_key(id) {
            return Err(MoleculeError::GroupNotFound(id));
        }
        let mut removed = self.dependents_of(id);
        removed.push(id);
        for &group in &removed {
            self.detach(group);
        }
        self.debug_assert_tree();
        debug!(count = removed.len(), "Removed pair groups.");
        Ok(removed)
    }

    /// Removes every group except the central atom.
    pub fn remove_all_groups(&mut self) -> Result<Vec<GroupId>, MoleculeError> {
        self.ensure_unlocked()?;
        let mut removed = Vec::new();
        for id in self.radial_groups() {
            removed.extend(self.remove_group(id)?);
        }
        Ok(removed)
    }

    /// Every non-central group has exactly one parent bond.
    fn debug_assert_tree(&self) {
        debug_assert_eq!(self.bonds.len() + 1, self.groups.len());
        debug_assert_eq!(self.order.len(), self.groups.len());
        debug_assert!(self.order.iter().all(|&id| {
            id == self.central_atom
                || self
                    .parent_of(id)
                    .is_some_and(|parent| self.bond_between(parent, id).is_some())
        }));
    }

    fn dependents_of(&self, id: GroupId) -> Vec<GroupId> {
        let mut dependents = Vec::new();
        for &child in self.neighbors(id) {
            if self.parent_of(child) == Some(id) {
                dependents.extend(self.dependents_of(child));
                dependents.push(child);
            }
        }
        dependents
    }

    fn detach(&mut self, id: GroupId) {
        if let Some(parent) = self.parents.remove(id) {
            if let Some(siblings) = self.neighbors.get_mut(parent) {
                siblings.retain(|&n| n != id);
            }
        }
        let (incident, kept): (Vec<Bond>, Vec<Bond>) =
            std::mem::take(&mut self.bonds)
                .into_iter()
                .partition(|bond| bond.contains(id));
        self.bonds = kept;
        for bond in incident {
            self.events.push(MoleculeEvent::BondRemoved(bond));
        }
        self.neighbors.remove(id);
        self.order.retain(|&g| g != id);
        if let Some(group) = self.groups.remove(id) {
            self.events.push(MoleculeEvent::GroupRemoved { id, group });
        }
    }

    /// Marks a group as held (or released) by the user.
    pub fn set_user_controlled(
        &mut self,
        id: GroupId,
        user_controlled: bool,
    ) -> Result<(), MoleculeError> {
        let group = self
            .groups
            .get_mut(id)
            .ok_or(MoleculeError::GroupNotFound(id))?;
        group.user_controlled = user_controlled;
        Ok(())
    }

    /// Moves a group to `position` and stops it.
    ///
    /// The central atom, and the bonded atoms of a real molecule, cannot be dragged.
    pub fn drag_group(&mut self, id: GroupId, position: Vector3<f64>) -> Result<(), MoleculeError> {
        if !is_finite_vector(&position) {
            return Err(MoleculeError::NonFinitePosition);
        }
        let is_real = self.is_real();
        if id == self.central_atom {
            return Err(MoleculeError::ImmovableGroup(id));
        }
        let group = self
            .groups
            .get_mut(id)
            .ok_or(MoleculeError::GroupNotFound(id))?;
        if is_real && !group.is_lone_pair {
            return Err(MoleculeError::ImmovableGroup(id));
        }
        group.drag_to_position(position);
        Ok(())
    }

    /// Suggests where a new radial group should appear: the free slot of the next larger ideal
    /// geometry that best complements the current radial groups.
    ///
    /// Lone pairs favour the earliest matching slot, atoms the latest, so that a new lone pair
    /// lands where lone pairs prefer (e.g. equatorial) and a new atom does not.
    pub fn suggest_direction(&self, is_lone_pair: bool) -> Result<Vector3<f64>, EngineError> {
        let center = self
            .groups
            .get(self.central_atom)
            .map(|g| g.position)
            .unwrap_or_else(Vector3::zeros);
        let mut radial = self.radial_groups();
        let count = radial.len();
        if count >= MAX_STERIC_NUMBER {
            return Err(MoleculeError::TooManyNeighbors {
                parent: self.central_atom,
                max: MAX_STERIC_NUMBER,
            }
            .into());
        }
        let geometry = GeometryConfiguration::get(count + 1).ok_or(
            EngineError::UnsupportedStericNumber {
                steric_number: count + 1,
            },
        )?;
        let ideal = geometry.unit_vectors();
        if count == 0 {
            return Ok(ideal[0]);
        }

        radial.sort_by_key(|&id| !self.groups.get(id).is_some_and(|g| g.is_lone_pair));
        let actual: Vec<Vector3<f64>> = radial
            .iter()
            .filter_map(|&id| self.groups.get(id))
            .map(|g| g.orientation_from(&center))
            .collect();
        let permutations = Permutation::all(count);

        let slots: Vec<usize> = if is_lone_pair {
            (0..=count).collect()
        } else {
            (0..=count).rev().collect()
        };
        let mut best: Option<(f64, Vector3<f64>)> = None;
        for slot in slots {
            let remaining: Vec<Vector3<f64>> = ideal
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != slot)
                .map(|(_, v)| *v)
                .collect();
            let result = find_closest_matching_configuration(&actual, &remaining, &permutations)?;
            if best
                .as_ref()
                .is_none_or(|(error, _)| result.error < error - super::attractor::TIE_EPSILON)
            {
                best = Some((result.error, result.to_actual_frame(&ideal[slot])));
            }
        }
        best.map(|(_, direction)| safe_normalize(&direction))
            .ok_or_else(|| EngineError::Internal("no open slot was evaluated".to_string()))
    }

    /// Adds a group to the central atom at the suggested direction and the default distance.
    pub fn add_radial_group(
        &mut self,
        is_lone_pair: bool,
        order: BondOrder,
    ) -> Result<GroupId, EngineError> {
        self.ensure_unlocked()?;
        let direction = self.suggest_direction(is_lone_pair)?;
        let length = if is_lone_pair {
            self.config.lone_pair_distance
        } else {
            self.config.bonded_pair_distance
        };
        let group = PairGroup::new(direction * length, is_lone_pair, None);
        Ok(self.add_group_and_bond(group, self.central_atom, order, length)?)
    }

    /// Adds `count` lone pairs to a radial atom, in the slots of the ideal geometry that leave
    /// the bond to the central atom in place.
    pub fn add_terminal_lone_pairs(
        &mut self,
        atom: GroupId,
        count: usize,
    ) -> Result<Vec<GroupId>, EngineError> {
        self.ensure_unlocked()?;
        let distance = self.lone_pair_distance();
        self.place_terminal_lone_pairs(atom, count, distance)
    }

    pub(crate) fn place_terminal_lone_pairs(
        &mut self,
        atom: GroupId,
        count: usize,
        distance: f64,
    ) -> Result<Vec<GroupId>, EngineError> {
        let group = self
            .groups
            .get(atom)
            .ok_or(MoleculeError::GroupNotFound(atom))?;
        if group.is_lone_pair {
            return Err(MoleculeError::LonePairParent(atom).into());
        }
        let parent = self
            .parent_of(atom)
            .filter(|&p| p == self.central_atom)
            .ok_or(MoleculeError::DepthExceeded { parent: atom })?;
        if self.neighbor_count(atom) + count > MAX_STERIC_NUMBER {
            return Err(MoleculeError::TooManyNeighbors {
                parent: atom,
                max: MAX_STERIC_NUMBER,
            }
            .into());
        }
        if count == 0 {
            return Ok(Vec::new());
        }

        let atom_position = group.position;
        let parent_position = self
            .groups
            .get(parent)
            .map(|g| g.position)
            .ok_or(MoleculeError::GroupNotFound(parent))?;
        let geometry = GeometryConfiguration::get(count + 1).ok_or(
            EngineError::UnsupportedStericNumber {
                steric_number: count + 1,
            },
        )?;
        let ideal = geometry.unit_vectors();
        let toward_parent = safe_normalize(&(parent_position - atom_position));
        let fit = find_closest_matching_configuration(
            &[toward_parent],
            &[ideal[count]],
            &[Permutation::identity(1)],
        )?;

        let mut added = Vec::with_capacity(count);
        for slot in &ideal[..count] {
            let position = atom_position + fit.to_actual_frame(slot) * distance;
            let id = self.insert_group_and_bond(
                PairGroup::lone_pair(position),
                atom,
                BondOrder::LonePair,
                distance,
            )?;
            added.push(id);
        }
        Ok(added)
    }

    // --- Local shapes ---

    fn vsepr_category(&self, center: GroupId, neighbor: GroupId) -> GroupCategory {
        match self.groups.get(neighbor) {
            Some(group) if group.is_lone_pair => GroupCategory::LonePair,
            _ => GroupCategory::Bond(
                self.bond_between(center, neighbor)
                    .map_or(BondOrder::Single, |bond| bond.order),
            ),
        }
    }

    fn real_category(&self, center: GroupId, neighbor: GroupId) -> GroupCategory {
        match self.groups.get(neighbor) {
            Some(group) if !group.is_lone_pair => GroupCategory::Atom(
                group.element,
                self.bond_between(center, neighbor)
                    .map_or(BondOrder::Single, |bond| bond.order),
            ),
            _ => GroupCategory::LonePair,
        }
    }

    fn neighbors_lone_pairs_first(&self, atom: GroupId) -> Vec<GroupId> {
        let mut neighbors = self.neighbors(atom).to_vec();
        neighbors.sort_by_key(|&id| !self.groups.get(id).is_some_and(|g| g.is_lone_pair));
        neighbors
    }

    /// The shape an atom's neighbors should take under VSEPR: the ideal geometry of its steric
    /// number, with lone pairs interchangeable among themselves and bonds among bonds of the
    /// same order. The central atom is never moved by a shape around another atom.
    pub fn vsepr_local_shape(&self, atom: GroupId) -> Result<LocalShape, EngineError> {
        let neighbors = self.neighbors_lone_pairs_first(atom);
        let geometry = GeometryConfiguration::get(neighbors.len()).ok_or(
            EngineError::UnsupportedStericNumber {
                steric_number: neighbors.len(),
            },
        )?;
        let categories: Vec<GroupCategory> = neighbors
            .iter()
            .map(|&n| self.vsepr_category(atom, n))
            .collect();
        let pinned = neighbors.iter().map(|&n| n == self.central_atom).collect();
        LocalShape::new(
            atom,
            neighbors,
            geometry.unit_vectors(),
            Permutation::within_classes(&categories),
            pinned,
            atom == self.central_atom,
        )
    }

    /// The shape of a real molecule's central atom: its current orientations are the ideal,
    /// atoms are pinned, and only atoms of equal element and bond order are interchangeable.
    pub(crate) fn real_central_shape(&self) -> Result<LocalShape, EngineError> {
        let center = self.central_atom;
        let center_position = self
            .groups
            .get(center)
            .map(|g| g.position)
            .ok_or(MoleculeError::GroupNotFound(center))?;
        let neighbors = self.neighbors_lone_pairs_first(center);
        let mut ideal = Vec::with_capacity(neighbors.len());
        let mut pinned = Vec::with_capacity(neighbors.len());
        for &id in &neighbors {
            let group = self.groups.get(id).ok_or(MoleculeError::GroupNotFound(id))?;
            ideal.push(group.orientation_from(&center_position));
            pinned.push(!group.is_lone_pair);
        }
        let categories: Vec<GroupCategory> = neighbors
            .iter()
            .map(|&n| self.real_category(center, n))
            .collect();
        LocalShape::new(
            center,
            neighbors,
            ideal,
            Permutation::within_classes(&categories),
            pinned,
            true,
        )
    }
}
