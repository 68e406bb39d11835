use crate::error::{CliError, Result};
use molshape::core::geometry::vsepr::VseprConfiguration;
use molshape::core::models::element::Element;
use molshape::core::models::ids::GroupId;
use molshape::core::models::topology::BondOrder;
use molshape::engine::molecule::Molecule;
use molshape::workflows::relax::RelaxationResult;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MoleculeSummary {
    pub formula: Option<String>,
    pub name: Option<String>,
    pub axe: String,
    pub steric_number: usize,
    pub electron_geometry: Option<String>,
    pub molecular_shape: Option<String>,
    pub configuration: VseprConfiguration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RelaxationSummary {
    pub ticks: usize,
    pub simulated_time: f64,
    pub settled: bool,
    pub max_speed: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupRecord {
    pub serial: u64,
    pub kind: &'static str,
    pub element: Option<Element>,
    pub parent: Option<u64>,
    pub bond_order: Option<BondOrder>,
    pub distance: f64,
    pub position: [f64; 3],
}

#[derive(Debug, Serialize)]
pub struct AngleRecord {
    pub a: u64,
    pub b: u64,
    pub degrees: f64,
}

/// Final geometry of a relaxed molecule, as written by `--output`.
#[derive(Debug, Serialize)]
pub struct GeometryReport {
    pub molecule: MoleculeSummary,
    pub relaxation: RelaxationSummary,
    pub groups: Vec<GroupRecord>,
    /// Angles at the central atom between every pair of radial groups.
    pub angles: Vec<AngleRecord>,
}

impl GeometryReport {
    pub fn from_molecule(molecule: &Molecule, result: &RelaxationResult) -> Self {
        let configuration = molecule.vsepr_configuration();
        let shape = molecule.real_shape();
        let serials: HashMap<GroupId, u64> = molecule
            .groups()
            .map(|(id, group)| (id, group.serial()))
            .collect();

        let groups = molecule
            .groups()
            .map(|(id, group)| {
                let parent = molecule.parent_of(id);
                let origin = parent
                    .and_then(|p| molecule.group(p))
                    .map(|p| p.position)
                    .unwrap_or(group.position);
                GroupRecord {
                    serial: group.serial(),
                    kind: if group.is_lone_pair { "lone-pair" } else { "atom" },
                    element: group.element,
                    parent: parent.and_then(|p| serials.get(&p).copied()),
                    bond_order: molecule.parent_bond(id).map(|b| b.order),
                    distance: (group.position - origin).norm(),
                    position: [group.position.x, group.position.y, group.position.z],
                }
            })
            .collect();

        let radial = molecule.radial_groups();
        let mut angles = Vec::new();
        for (i, &a) in radial.iter().enumerate() {
            for &b in &radial[i + 1..] {
                if let Some(degrees) = molecule.bond_angle(a, b) {
                    angles.push(AngleRecord {
                        a: serials.get(&a).copied().unwrap_or_default(),
                        b: serials.get(&b).copied().unwrap_or_default(),
                        degrees,
                    });
                }
            }
        }

        Self {
            molecule: MoleculeSummary {
                formula: shape.map(|s| s.formula.to_string()),
                name: shape.map(|s| s.name.to_string()),
                axe: configuration.axe_notation(),
                steric_number: configuration.steric_number(),
                electron_geometry: configuration
                    .electron_geometry()
                    .map(|g| g.name().to_string()),
                molecular_shape: configuration
                    .molecular_shape()
                    .map(|s| s.name().to_string()),
                configuration,
            },
            relaxation: RelaxationSummary {
                ticks: result.ticks,
                simulated_time: result.simulated_time,
                settled: result.settled,
                max_speed: result.max_speed,
            },
            groups,
            angles,
        }
    }

    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let content = self.to_toml().map_err(|e| CliError::ReportWriting {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Human-readable lines printed after a run.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let title = match (&self.molecule.formula, &self.molecule.name) {
            (Some(formula), Some(name)) => format!("{} ({})", name, formula),
            _ => "VSEPR molecule".to_string(),
        };
        lines.push(format!(
            "{}: {} [{}]",
            title,
            self.molecule.axe,
            self.molecule
                .molecular_shape
                .as_deref()
                .unwrap_or("unsupported")
        ));
        lines.push(format!(
            "  {} after {} ticks ({:.2} s simulated)",
            if self.relaxation.settled {
                "Settled"
            } else {
                "Still moving"
            },
            self.relaxation.ticks,
            self.relaxation.simulated_time
        ));
        for angle in &self.angles {
            lines.push(format!(
                "  angle #{}-A-#{}: {:.2}°",
                angle.a, angle.b, angle.degrees
            ));
        }
        lines
    }
}
