use nalgebra::Vector3;

pub const MAX_STERIC_NUMBER: usize = 6;

const SQRT_3_OVER_2: f64 = 0.866_025_403_784_438_6;
const SQRT_8_OVER_3: f64 = 0.942_809_041_582_063_4;
const SQRT_2_OVER_3: f64 = 0.471_404_520_791_031_7;
const SQRT_6_OVER_3: f64 = 0.816_496_580_927_726;
const ONE_THIRD: f64 = 1.0 / 3.0;

/// The ideal arrangement of `steric_number` electron pairs around an atom.
///
/// Directions are unit vectors ordered so that the slots lone pairs prefer come first:
/// equatorial positions before axial ones for the trigonal bipyramid, and an axial pair first
/// for the octahedron. Filling the first `k` slots with lone pairs therefore always yields the
/// VSEPR-favoured molecular shape.
#[derive(Debug, PartialEq)]
pub struct GeometryConfiguration {
    pub steric_number: usize,
    pub name: &'static str,
    directions: &'static [[f64; 3]],
}

static CONFIGURATIONS: [GeometryConfiguration; MAX_STERIC_NUMBER + 1] = [
    GeometryConfiguration {
        steric_number: 0,
        name: "Empty",
        directions: &[],
    },
    GeometryConfiguration {
        steric_number: 1,
        name: "Diatomic",
        directions: &[[1.0, 0.0, 0.0]],
    },
    GeometryConfiguration {
        steric_number: 2,
        name: "Linear",
        directions: &[[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]],
    },
    GeometryConfiguration {
        steric_number: 3,
        name: "Trigonal Planar",
        directions: &[
            [0.0, 1.0, 0.0],
            [SQRT_3_OVER_2, -0.5, 0.0],
            [-SQRT_3_OVER_2, -0.5, 0.0],
        ],
    },
    GeometryConfiguration {
        steric_number: 4,
        name: "Tetrahedral",
        directions: &[
            [0.0, 0.0, 1.0],
            [SQRT_8_OVER_3, 0.0, -ONE_THIRD],
            [-SQRT_2_OVER_3, SQRT_6_OVER_3, -ONE_THIRD],
            [-SQRT_2_OVER_3, -SQRT_6_OVER_3, -ONE_THIRD],
        ],
    },
    GeometryConfiguration {
        steric_number: 5,
        name: "Trigonal Bipyramidal",
        directions: &[
            [0.0, 1.0, 0.0],
            [SQRT_3_OVER_2, -0.5, 0.0],
            [-SQRT_3_OVER_2, -0.5, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ],
    },
    GeometryConfiguration {
        steric_number: 6,
        name: "Octahedral",
        directions: &[
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
        ],
    },
];

impl GeometryConfiguration {
    /// Looks up the configuration for a steric number, or `None` above [`MAX_STERIC_NUMBER`].
    pub fn get(steric_number: usize) -> Option<&'static GeometryConfiguration> {
        CONFIGURATIONS.get(steric_number)
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    pub fn unit_vector(&self, slot: usize) -> Option<Vector3<f64>> {
        self.directions
            .get(slot)
            .map(|d| Vector3::new(d[0], d[1], d[2]))
    }

    pub fn unit_vectors(&self) -> Vec<Vector3<f64>> {
        self.directions
            .iter()
            .map(|d| Vector3::new(d[0], d[1], d[2]))
            .collect()
    }
}

/// Returns the configuration for `steric_number`.
///
/// # Panics
///
/// Panics when `steric_number` exceeds [`MAX_STERIC_NUMBER`]. Use
/// [`GeometryConfiguration::get`] when the input is not already validated.
pub fn configuration(steric_number: usize) -> &'static GeometryConfiguration {
    debug_assert!(
        steric_number <= MAX_STERIC_NUMBER,
        "steric number {steric_number} is out of range"
    );
    &CONFIGURATIONS[steric_number]
}
