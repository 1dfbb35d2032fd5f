//! Rebar and concrete quantity estimation.
//!
//! Rebar rows are grouped by diameter, priced by weight and packed into
//! standard stock bars with first-fit decreasing to report offcut waste.

pub mod estimator;
pub mod format;
pub mod packer;
pub mod report;
pub mod types;

pub use packer::{pack, StockPacker};
pub use report::{estimate, Estimator};
pub use types::*;
