use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A chemical element that can appear in the molecules handled by the solver.
///
/// Only main-group elements that commonly take part in VSEPR examples are represented.
/// The solver itself never inspects the element of a group except to decide which radial
/// atoms of a real molecule are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    /// Hydrogen.
    H,
    /// Beryllium.
    Be,
    /// Boron.
    B,
    /// Carbon.
    C,
    /// Nitrogen.
    N,
    /// Oxygen.
    O,
    /// Fluorine.
    F,
    /// Silicon.
    Si,
    /// Phosphorus.
    P,
    /// Sulfur.
    S,
    /// Chlorine.
    Cl,
    /// Selenium.
    Se,
    /// Bromine.
    Br,
    /// Krypton.
    Kr,
    /// Iodine.
    I,
    /// Xenon.
    Xe,
}

static ELEMENTS_BY_SYMBOL: Map<&'static str, Element> = phf_map! {
    "H" => Element::H,
    "Be" => Element::Be,
    "B" => Element::B,
    "C" => Element::C,
    "N" => Element::N,
    "O" => Element::O,
    "F" => Element::F,
    "Si" => Element::Si,
    "P" => Element::P,
    "S" => Element::S,
    "Cl" => Element::Cl,
    "Se" => Element::Se,
    "Br" => Element::Br,
    "Kr" => Element::Kr,
    "I" => Element::I,
    "Xe" => Element::Xe,
};

impl Element {
    /// Returns the IUPAC symbol of the element.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::H => "H",
            Self::Be => "Be",
            Self::B => "B",
            Self::C => "C",
            Self::N => "N",
            Self::O => "O",
            Self::F => "F",
            Self::Si => "Si",
            Self::P => "P",
            Self::S => "S",
            Self::Cl => "Cl",
            Self::Se => "Se",
            Self::Br => "Br",
            Self::Kr => "Kr",
            Self::I => "I",
            Self::Xe => "Xe",
        }
    }

    /// Returns the English name of the element.
    pub fn name(self) -> &'static str {
        match self {
            Self::H => "Hydrogen",
            Self::Be => "Beryllium",
            Self::B => "Boron",
            Self::C => "Carbon",
            Self::N => "Nitrogen",
            Self::O => "Oxygen",
            Self::F => "Fluorine",
            Self::Si => "Silicon",
            Self::P => "Phosphorus",
            Self::S => "Sulfur",
            Self::Cl => "Chlorine",
            Self::Se => "Selenium",
            Self::Br => "Bromine",
            Self::Kr => "Krypton",
            Self::I => "Iodine",
            Self::Xe => "Xenon",
        }
    }

    /// Looks up an element by its exact, case-sensitive symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        ELEMENTS_BY_SYMBOL.get(symbol).copied()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown element symbol: '{0}'")]
pub struct ParseElementError(pub String);

impl FromStr for Element {
    type Err = ParseElementError;

    /// Parses an element symbol, accepting any capitalization (`"cl"`, `"CL"`, `"Cl"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(element) = Self::from_symbol(trimmed) {
            return Ok(element);
        }
        let mut chars = trimmed.chars();
        let normalized: String = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        };
        Self::from_symbol(&normalized).ok_or_else(|| ParseElementError(s.to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_symbol_is_case_sensitive() {
        assert_eq!(Element::from_symbol("Cl"), Some(Element::Cl));
        assert_eq!(Element::from_symbol("CL"), None);
        assert_eq!(Element::from_symbol("Xe"), Some(Element::Xe));
    }

    #[test]
    fn from_str_normalizes_capitalization() {
        assert_eq!("cl".parse::<Element>(), Ok(Element::Cl));
        assert_eq!("XE".parse::<Element>(), Ok(Element::Xe));
        assert_eq!(" h ".parse::<Element>(), Ok(Element::H));
    }

    #[test]
    fn from_str_rejects_unknown_symbols() {
        assert_eq!(
            "Zz".parse::<Element>(),
            Err(ParseElementError("Zz".to_string()))
        );
        assert!("".parse::<Element>().is_err());
    }

    #[test]
    fn every_symbol_maps_back_to_its_element() {
        for (symbol, element) in ELEMENTS_BY_SYMBOL.entries() {
            assert_eq!(element.symbol(), *symbol);
            assert_eq!(element.to_string(), *symbol);
        }
        assert_eq!(ELEMENTS_BY_SYMBOL.len(), 16);
    }

    #[test]
    fn name_returns_english_name() {
        assert_eq!(Element::O.name(), "Oxygen");
        assert_eq!(Element::Br.name(), "Bromine");
    }
}
