use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Standard stock bar length in meters.
pub const DEFAULT_STOCK_BAR_LENGTH_M: f64 = 12.0;

/// Upper bound on the pieces a single request may expand to, across all rows.
pub const MAX_PIECES: usize = 10_000;

/// One input row: `count` pieces of `piece_length_m` cut from bars of `diameter_mm`.
///
/// Fields are signed so that negative values reach row validation instead of
/// failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebarSpec {
    pub diameter_mm: i64,
    pub piece_length_m: f64,
    pub count: i64,
}

/// Input: What user provides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub concrete_volume_m3: f64,
    /// Price per kilogram of rebar
    #[serde(default)]
    pub rebar_unit_price: f64,
    /// Price per cubic meter of concrete
    #[serde(default)]
    pub concrete_unit_price: f64,
    #[serde(default = "default_stock_bar_length")]
    pub stock_bar_length_m: f64,
    #[serde(default)]
    pub specs: Vec<RebarSpec>,
}

fn default_stock_bar_length() -> f64 {
    DEFAULT_STOCK_BAR_LENGTH_M
}

impl Default for EstimateRequest {
    fn default() -> Self {
        Self {
            concrete_volume_m3: 0.0,
            rebar_unit_price: 0.0,
            concrete_unit_price: 0.0,
            stock_bar_length_m: DEFAULT_STOCK_BAR_LENGTH_M,
            specs: Vec::new(),
        }
    }
}

/// Individual piece lengths per diameter, one entry per physical cut piece.
pub type PieceSet = BTreeMap<u32, Vec<f64>>;

/// Pieces cut from a single stock bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBar {
    pub pieces: Vec<f64>,
    pub used_length_m: f64,
}

/// Output of the cutting-stock packer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingResult {
    pub bar_count: u32,
    /// Leftover per bar, in the order bars were opened
    pub waste_per_bar: Vec<f64>,
    /// Cutting pattern of each bar
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bars: Vec<StockBar>,
}

impl PackingResult {
    pub fn empty() -> Self {
        Self {
            bar_count: 0,
            waste_per_bar: Vec::new(),
            bars: Vec::new(),
        }
    }

    pub fn total_waste(&self) -> f64 {
        self.waste_per_bar.iter().sum()
    }
}

/// Per-diameter quantities, cost and stock requirement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiameterReport {
    pub diameter_mm: u32,
    pub piece_count: usize,
    pub total_length_m: f64,
    pub total_weight_kg: f64,
    pub total_cost: f64,
    pub bars_required: u32,
    pub waste_list: Vec<f64>,
    pub total_waste_m: f64,
    /// Share of purchased stock length that ends up as offcut
    pub waste_percentage: f64,
}

/// Project-wide totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub total_rebar_weight_kg: f64,
    pub total_rebar_cost: f64,
    pub concrete_volume_m3: f64,
    pub concrete_cost: f64,
    pub total_cost: f64,
    pub total_bars: u32,
    pub total_waste_m: f64,
}

/// Output: What the estimator returns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimateReport {
    pub diameters: Vec<DiameterReport>,
    pub summary: ProjectSummary,
}

/// One offcut, flattened for tabular export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteRow {
    pub diameter_mm: u32,
    pub waste_m: f64,
}

/// Key/value line of the summary sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: f64,
}

impl EstimateReport {
    /// Every offcut as `(diameter, waste)` pairs, ordered by diameter then bar.
    pub fn waste_rows(&self) -> Vec<WasteRow> {
        self.diameters
            .iter()
            .flat_map(|d| {
                d.waste_list.iter().map(move |&waste_m| WasteRow {
                    diameter_mm: d.diameter_mm,
                    waste_m,
                })
            })
            .collect()
    }

    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        let s = &self.summary;
        [
            ("Total rebar weight (kg)", s.total_rebar_weight_kg),
            ("Rebar cost", s.total_rebar_cost),
            ("Concrete cost", s.concrete_cost),
            ("Total cost", s.total_cost),
        ]
        .into_iter()
        .map(|(label, value)| SummaryRow {
            label: label.to_string(),
            value,
        })
        .collect()
    }
}

/// A single problem found while validating an input row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("row {row}: {field} = {value} ({reason})")]
pub struct SpecIssue {
    /// 1-based position in the request
    pub row: usize,
    pub field: String,
    pub value: String,
    pub reason: String,
}

/// Error type for estimation and packing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimatorError {
    #[error("Invalid rebar specification: {}", join_issues(.0))]
    InvalidSpecs(Vec<SpecIssue>),

    #[error("Cannot cut a {length_m} m piece of {diameter_mm} mm rebar from {stock_length_m} m stock bars")]
    UnpackablePiece {
        diameter_mm: u32,
        length_m: f64,
        stock_length_m: f64,
    },

    #[error("Piece of {length_m} m is longer than the {stock_length_m} m stock bar")]
    PieceTooLong { length_m: f64, stock_length_m: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn join_issues(issues: &[SpecIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, EstimatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_from_partial_json() {
        let request: EstimateRequest =
            serde_json::from_str(r#"{"specs": [{"diameter_mm": 16, "piece_length_m": 7.5, "count": 20}]}"#)
                .unwrap();

        assert_eq!(request.stock_bar_length_m, DEFAULT_STOCK_BAR_LENGTH_M);
        assert_eq!(request.concrete_volume_m3, 0.0);
        assert_eq!(request.specs.len(), 1);
    }

    #[test]
    fn test_negative_count_deserializes_for_validation() {
        let spec: RebarSpec =
            serde_json::from_str(r#"{"diameter_mm": -16, "piece_length_m": 7.5, "count": -1}"#)
                .unwrap();
        assert_eq!(spec.diameter_mm, -16);
        assert_eq!(spec.count, -1);
    }

    #[test]
    fn test_invalid_specs_message_lists_every_row() {
        let err = EstimatorError::InvalidSpecs(vec![
            SpecIssue {
                row: 1,
                field: "diameter_mm".into(),
                value: "0".into(),
                reason: "must be positive".into(),
            },
            SpecIssue {
                row: 3,
                field: "piece_length_m".into(),
                value: "-2".into(),
                reason: "must be positive".into(),
            },
        ]);

        let message = err.to_string();
        assert!(message.contains("row 1"));
        assert!(message.contains("row 3"));
    }
}
