use crate::estimator;
use crate::packer::StockPacker;
use crate::types::*;
use tracing::debug;

mod validate;

/// Turns rebar rows and unit prices into a priced, packed material report.
pub struct Estimator {
    request: EstimateRequest,
    rows: Vec<validate::CutRow>,
    packer: StockPacker,
}

impl Estimator {
    /// Validates the configuration and every row before building an estimator.
    ///
    /// All offending rows are reported together in [`EstimatorError::InvalidSpecs`].
    pub fn new(request: EstimateRequest) -> Result<Self> {
        validate::check_configuration(&request)?;
        let rows = validate::check_specs(&request.specs)?;

        let packer = StockPacker::new(request.stock_bar_length_m)?;
        Ok(Self {
            request,
            rows,
            packer,
        })
    }

    /// Expands each row's count into individual pieces, merging rows that share a diameter.
    pub fn piece_set(&self) -> PieceSet {
        let mut pieces = PieceSet::new();
        for row in self.rows.iter().filter(|r| r.count > 0) {
            pieces
                .entry(row.diameter_mm)
                .or_default()
                .extend(std::iter::repeat(row.piece_length_m).take(row.count));
        }
        pieces
    }

    /// Runs the full flow: expand, pack and price each diameter, then total.
    pub fn estimate(&self) -> Result<EstimateReport> {
        let diameters = self
            .piece_set()
            .into_iter()
            .map(|(diameter_mm, pieces)| self.diameter_report(diameter_mm, &pieces))
            .collect::<Result<Vec<_>>>()?;

        let summary = self.calculate_summary(&diameters);
        Ok(EstimateReport { diameters, summary })
    }

    fn diameter_report(&self, diameter_mm: u32, pieces: &[f64]) -> Result<DiameterReport> {
        let packing = self.packer.pack(pieces).map_err(|err| match err {
            EstimatorError::PieceTooLong {
                length_m,
                stock_length_m,
            } => EstimatorError::UnpackablePiece {
                diameter_mm,
                length_m,
                stock_length_m,
            },
            other => other,
        })?;

        let total_length_m: f64 = pieces.iter().sum();
        let total_weight_kg = estimator::weight(total_length_m, f64::from(diameter_mm));
        let total_cost = estimator::cost(total_weight_kg, self.request.rebar_unit_price);

        let total_waste_m = packing.total_waste();
        let stock_used = f64::from(packing.bar_count) * self.packer.stock_length_m();
        let waste_percentage = if stock_used > 0.0 {
            (total_waste_m / stock_used) * 100.0
        } else {
            0.0
        };

        debug!(
            diameter_mm,
            pieces = pieces.len(),
            total_length_m,
            bars = packing.bar_count,
            "priced diameter"
        );

        Ok(DiameterReport {
            diameter_mm,
            piece_count: pieces.len(),
            total_length_m,
            total_weight_kg,
            total_cost,
            bars_required: packing.bar_count,
            waste_list: packing.waste_per_bar,
            total_waste_m,
            waste_percentage,
        })
    }

    /// Sums the diameter reports and adds the concrete line.
    fn calculate_summary(&self, diameters: &[DiameterReport]) -> ProjectSummary {
        let total_rebar_weight_kg: f64 = diameters.iter().map(|d| d.total_weight_kg).sum();
        let total_rebar_cost: f64 = diameters.iter().map(|d| d.total_cost).sum();
        let concrete_cost = self.request.concrete_volume_m3 * self.request.concrete_unit_price;

        ProjectSummary {
            total_rebar_weight_kg,
            total_rebar_cost,
            concrete_volume_m3: self.request.concrete_volume_m3,
            concrete_cost,
            total_cost: total_rebar_cost + concrete_cost,
            total_bars: diameters.iter().map(|d| d.bars_required).sum(),
            total_waste_m: diameters.iter().map(|d| d.total_waste_m).sum(),
        }
    }
}

/// Validates `request` and computes its report in one call.
pub fn estimate(request: EstimateRequest) -> Result<EstimateReport> {
    Estimator::new(request)?.estimate()
}
