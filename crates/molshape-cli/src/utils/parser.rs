use molshape::core::shapes::real::{self, RealMoleculeShape};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid override '{0}'. Expected KEY=VALUE (e.g., 'physics.damping-factor=0.2').")]
    InvalidKeyValue(String),

    #[error("Key cannot be empty in override '{0}'.")]
    EmptyKey(String),

    #[error("Unknown molecule '{0}'. Run 'molshape list' to see the available formulas.")]
    UnknownMolecule(String),
}

/// Splits a `KEY=VALUE` override at its first `=`.
pub fn parse_key_value(input: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidKeyValue(input.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(input.to_string()));
    }
    Ok((key, value.trim()))
}

pub fn parse_formula(input: &str) -> Result<&'static RealMoleculeShape, ParseError> {
    real::find(input).ok_or_else(|| ParseError::UnknownMolecule(input.trim().to_string()))
}
