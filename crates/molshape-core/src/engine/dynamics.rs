use super::error::EngineError;
use super::molecule::{Molecule, MoleculeKind};
use crate::core::models::ids::GroupId;
use crate::core::physics::potentials;
use nalgebra::Vector3;
use tracing::{trace, warn};

impl Molecule {
    /// The tick length actually simulated for a requested `dt`.
    pub fn effective_time_step(&self, dt: f64) -> f64 {
        dt.min(self.config.max_time_step)
    }

    /// Advances the simulation by `dt` seconds, clamped to the configured maximum step.
    ///
    /// A zero step does nothing; negative or non-finite steps are rejected.
    pub fn update(&mut self, dt: f64) -> Result<(), EngineError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "time step must be finite and non-negative (got {dt})"
            )));
        }
        if dt == 0.0 {
            return Ok(());
        }
        let dt = self.effective_time_step(dt);

        match self.kind {
            MoleculeKind::Vsepr => self.apply_vsepr_forces(dt)?,
            MoleculeKind::Real { .. } => self.apply_real_forces(dt)?,
        }
        self.integrate(dt);
        Ok(())
    }

    /// Atoms other than the central atom whose neighbors need arranging.
    fn terminal_atoms_with_lone_pairs(&self) -> Vec<GroupId> {
        self.radial_atoms()
            .into_iter()
            .filter(|&id| self.neighbor_count(id) > 1)
            .collect()
    }

    fn apply_vsepr_forces(&mut self, dt: f64) -> Result<(), EngineError> {
        let center = self.central_atom();
        let radial = self.radial_groups();
        if radial.len() > 1 {
            let shape = self.vsepr_local_shape(center)?;
            let error = shape.apply_attraction(&mut self.groups, dt, &self.config)?;
            let ratio = potentials::true_lengths_ratio_override(error);
            trace!(error, ratio, "Central attraction applied.");
            self.apply_radial_repulsion(&radial, dt, ratio);
        }
        for atom in self.terminal_atoms_with_lone_pairs() {
            let shape = self.vsepr_local_shape(atom)?;
            shape.apply_angle_attraction_repulsion(&mut self.groups, dt, &self.config)?;
        }
        Ok(())
    }

    /// Pairwise repulsion between radial groups, computed from one snapshot of positions.
    fn apply_radial_repulsion(&mut self, radial: &[GroupId], dt: f64, ratio: f64) {
        let snapshot: Vec<_> = radial
            .iter()
            .filter_map(|&id| self.groups.get(id).map(|g| (id, g.clone())))
            .collect();
        let impulses: Vec<(GroupId, Vector3<f64>)> = snapshot
            .iter()
            .map(|(id, group)| {
                let impulse = snapshot
                    .iter()
                    .filter(|(other_id, _)| other_id != id)
                    .map(|(_, other)| group.repulsion_impulse(other, dt, ratio, &self.config))
                    .fold(Vector3::zeros(), |sum, impulse| sum + impulse);
                (*id, impulse)
            })
            .collect();
        for (id, impulse) in impulses {
            if let Some(group) = self.groups.get_mut(id) {
                group.add_velocity(&impulse);
            }
        }
    }

    fn apply_real_forces(&mut self, dt: f64) -> Result<(), EngineError> {
        if let MoleculeKind::Real { central_shape, .. } = &self.kind {
            let error =
                central_shape.apply_angle_attraction_repulsion(&mut self.groups, dt, &self.config)?;
            trace!(error, "Real central attraction applied.");
        }
        for atom in self.terminal_atoms_with_lone_pairs() {
            let shape = self.vsepr_local_shape(atom)?;
            shape.apply_angle_attraction_repulsion(&mut self.groups, dt, &self.config)?;
        }
        Ok(())
    }

    /// Moves every mobile group by its velocity and pulls it back to its bond length.
    fn integrate(&mut self, dt: f64) {
        let locked_atoms = self.is_real();
        for &id in self.group_ids().to_vec().iter() {
            let (Some(parent), Some(ideal)) = (self.parent_of(id), self.ideal_distance(id)) else {
                continue;
            };
            let Some(origin) = self.groups.get(parent).map(|g| g.position) else {
                continue;
            };
            let config = self.config;
            let Some(group) = self.groups.get_mut(id) else {
                continue;
            };
            if locked_atoms && !group.is_lone_pair {
                continue;
            }
            group.step_forward(dt, &origin, &config);
            group.attract_to_ideal_distance(dt, &origin, ideal, &config);
            if group.recover_non_finite(&origin, ideal) {
                warn!(
                    serial = group.serial(),
                    "Pair group left finite space and was reset to its bond length."
                );
            }
        }
    }
}
