use super::ids::GroupId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum BondOrder {
    LonePair = 0,
    Single = 1,
    Double = 2,
    Triple = 3,
}

impl Default for BondOrder {
    fn default() -> Self {
        BondOrder::Single
    }
}

impl BondOrder {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::LonePair),
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            _ => None,
        }
    }

    pub fn is_lone_pair(self) -> bool {
        self == Self::LonePair
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "0" | "lp" | "lone-pair" => Ok(Self::LonePair),
            "1" | "s" | "single" => Ok(Self::Single),
            "2" | "d" | "double" => Ok(Self::Double),
            "3" | "t" | "triple" => Ok(Self::Triple),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::LonePair => "Lone Pair",
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
            }
        )
    }
}

/// A bond between two pair groups of the same molecule.
///
/// Bonds form a tree rooted at the central atom; `a` is always the endpoint closer to the root
/// (the parent) and `b` the dependent group. Lone pairs are attached through bonds of order
/// [`BondOrder::LonePair`], so every non-central group has exactly one parent bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub a: GroupId,       // Parent endpoint
    pub b: GroupId,       // Dependent endpoint
    pub order: BondOrder, // Bond order, or LonePair for lone pair attachment
    pub length: f64,      // Ideal distance between the endpoints
}

impl Bond {
    pub fn new(a: GroupId, b: GroupId, order: BondOrder, length: f64) -> Self {
        Self {
            a,
            b,
            order,
            length,
        }
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.a == id || self.b == id
    }

    pub fn other_atom(&self, id: GroupId) -> Option<GroupId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn connects(&self, x: GroupId, y: GroupId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_group_id(n: u64) -> GroupId {
        GroupId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn bond_order_from_str_parses_valid_strings() {
        assert_eq!("0".parse::<BondOrder>().unwrap(), BondOrder::LonePair);
        assert_eq!("lone-pair".parse::<BondOrder>().unwrap(), BondOrder::LonePair);
        assert_eq!("LP".parse::<BondOrder>().unwrap(), BondOrder::LonePair);
        assert_eq!("1".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("S".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("double".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!("3".parse::<BondOrder>().unwrap(), BondOrder::Triple);
        assert_eq!("T".parse::<BondOrder>().unwrap(), BondOrder::Triple);
    }

    #[test]
    fn bond_order_from_str_rejects_invalid_strings() {
        assert!("".parse::<BondOrder>().is_err());
        assert!("quadruple".parse::<BondOrder>().is_err());
        assert!("4".parse::<BondOrder>().is_err());
        assert!("aromatic".parse::<BondOrder>().is_err());
    }

    #[test]
    fn bond_order_value_round_trips_through_from_value() {
        for order in [
            BondOrder::LonePair,
            BondOrder::Single,
            BondOrder::Double,
            BondOrder::Triple,
        ] {
            assert_eq!(BondOrder::from_value(order.value()), Some(order));
        }
        assert_eq!(BondOrder::from_value(4), None);
    }

    #[test]
    fn bond_order_display_outputs_expected_strings() {
        assert_eq!(BondOrder::LonePair.to_string(), "Lone Pair");
        assert_eq!(BondOrder::Single.to_string(), "Single");
        assert_eq!(BondOrder::Triple.to_string(), "Triple");
    }

    #[test]
    fn bond_order_default_is_single() {
        assert_eq!(BondOrder::default(), BondOrder::Single);
        assert!(!BondOrder::default().is_lone_pair());
        assert!(BondOrder::LonePair.is_lone_pair());
    }

    #[test]
    fn bond_other_atom_returns_opposite_endpoint() {
        let a = dummy_group_id(1);
        let b = dummy_group_id(2);
        let bond = Bond::new(a, b, BondOrder::Double, 10.0);
        assert_eq!(bond.other_atom(a), Some(b));
        assert_eq!(bond.other_atom(b), Some(a));
        assert_eq!(bond.length, 10.0);
    }

    #[test]
    fn bond_other_atom_returns_none_for_unrelated_group() {
        let bond = Bond::new(dummy_group_id(10), dummy_group_id(20), BondOrder::Single, 1.0);
        let unrelated = dummy_group_id(30);
        assert!(!bond.contains(unrelated));
        assert_eq!(bond.other_atom(unrelated), None);
    }

    #[test]
    fn bond_connects_is_symmetric() {
        let a = dummy_group_id(5);
        let b = dummy_group_id(7);
        let bond = Bond::new(a, b, BondOrder::LonePair, 7.0);
        assert!(bond.connects(a, b));
        assert!(bond.connects(b, a));
        assert!(!bond.connects(a, dummy_group_id(9)));
    }
}
