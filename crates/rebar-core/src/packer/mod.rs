use crate::types::*;
use tracing::debug;


/// Slack allowed when comparing accumulated lengths against the stock length.
/// Sums such as `2.4 * 5` land a few ulps above 12.0 in f64.
pub const LENGTH_TOLERANCE_M: f64 = 1e-9;

/// Cuts pieces from fixed-length stock bars using first-fit decreasing.
#[derive(Debug, Clone, Copy)]
pub struct StockPacker {
    stock_length_m: f64,
}

impl StockPacker {
    /// Validates the stock length and builds a new packer.
    pub fn new(stock_length_m: f64) -> Result<Self> {
        if !stock_length_m.is_finite() || stock_length_m <= 0.0 {
            return Err(EstimatorError::InvalidInput(format!(
                "Stock bar length must be a positive number, got {stock_length_m}"
            )));
        }

        Ok(Self { stock_length_m })
    }

    pub fn stock_length_m(&self) -> f64 {
        self.stock_length_m
    }

    /// Assigns every piece to a stock bar and reports the offcut of each bar.
    ///
    /// Fails without opening any bar if a piece can never fit, since first-fit
    /// would otherwise have no bar to put it in.
    pub fn pack(&self, pieces: &[f64]) -> Result<PackingResult> {
        if pieces.is_empty() {
            return Ok(PackingResult::empty());
        }

        self.check_pieces(pieces)?;

        let mut sorted = pieces.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));

        let bars = self.first_fit_decreasing(&sorted);
        let waste_per_bar: Vec<f64> = bars
            .iter()
            .map(|bar| (self.stock_length_m - bar.used_length_m).max(0.0))
            .collect();

        debug!(
            pieces = pieces.len(),
            bars = bars.len(),
            stock_length_m = self.stock_length_m,
            "packed pieces into stock bars"
        );

        Ok(PackingResult {
            bar_count: bars.len() as u32,
            waste_per_bar,
            bars,
        })
    }

    /// Rejects oversized batches and pieces that are not positive finite
    /// lengths or exceed the stock length. The stock comparison is exact; the
    /// tolerance only applies to accumulated sums during placement.
    fn check_pieces(&self, pieces: &[f64]) -> Result<()> {
        if pieces.len() > MAX_PIECES {
            return Err(EstimatorError::InvalidInput(format!(
                "At most {MAX_PIECES} pieces can be packed at once, got {}",
                pieces.len()
            )));
        }

        for &piece in pieces {
            if !piece.is_finite() || piece <= 0.0 {
                return Err(EstimatorError::InvalidInput(format!(
                    "Piece length must be a positive number, got {piece}"
                )));
            }

            if piece > self.stock_length_m {
                return Err(EstimatorError::PieceTooLong {
                    length_m: piece,
                    stock_length_m: self.stock_length_m,
                });
            }
        }
        Ok(())
    }

    /// Places pieces (already sorted longest first) into the first open bar
    /// with enough room, opening a new bar when none has.
    fn first_fit_decreasing(&self, sorted: &[f64]) -> Vec<StockBar> {
        let mut bars: Vec<StockBar> = Vec::new();

        for &piece in sorted {
            let limit = self.stock_length_m + LENGTH_TOLERANCE_M;
            match bars
                .iter_mut()
                .find(|bar| bar.used_length_m + piece <= limit)
            {
                Some(bar) => {
                    bar.used_length_m += piece;
                    bar.pieces.push(piece);
                }
                None => bars.push(StockBar {
                    pieces: vec![piece],
                    used_length_m: piece,
                }),
            }
        }

        bars
    }
}

/// Packs `pieces` into bars of `stock_length_m`.
pub fn pack(pieces: &[f64], stock_length_m: f64) -> Result<PackingResult> {
    StockPacker::new(stock_length_m)?.pack(pieces)
}
