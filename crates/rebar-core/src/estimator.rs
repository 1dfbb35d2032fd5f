//! Mass and cost of steel rebar.
//!
//! Inputs are assumed to be validated already; these functions never fail.

/// Divisor of the usual `d² / 162` rebar mass approximation.
const DENSITY_DIVISOR: f64 = 162.0;

/// Mass per meter of rebar in kg/m, `diameter_mm² / 162`.
pub fn linear_density(diameter_mm: f64) -> f64 {
    diameter_mm * diameter_mm / DENSITY_DIVISOR
}

/// Mass in kg of `total_length_m` meters of rebar.
pub fn weight(total_length_m: f64, diameter_mm: f64) -> f64 {
    total_length_m * linear_density(diameter_mm)
}

/// Unrounded cost of `weight_kg` kilograms at `unit_price` per kilogram.
pub fn cost(weight_kg: f64, unit_price: f64) -> f64 {
    weight_kg * unit_price
}
