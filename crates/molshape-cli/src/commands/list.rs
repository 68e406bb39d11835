use crate::error::Result;
use molshape::core::shapes::real;

pub fn run() -> Result<()> {
    println!("Available real molecules:");
    for line in catalog_lines() {
        println!("  {}", line);
    }
    Ok(())
}

pub fn catalog_lines() -> Vec<String> {
    let mut shapes = real::ALL.to_vec();
    shapes.sort_by_key(|shape| shape.formula);
    shapes
        .iter()
        .map(|shape| {
            format!(
                "{:<6} {:<26} {}",
                shape.formula,
                shape.name,
                shape.vsepr_configuration()
            )
        })
        .collect()
}
