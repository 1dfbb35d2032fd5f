use crate::types::*;

/// A row that passed validation, narrowed to unsigned types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct CutRow {
    pub diameter_mm: u32,
    pub piece_length_m: f64,
    pub count: usize,
}

/// Rejects negative quantities and prices, and a non-positive stock length.
pub(super) fn check_configuration(request: &EstimateRequest) -> Result<()> {
    let scalars = [
        ("concrete_volume_m3", request.concrete_volume_m3),
        ("rebar_unit_price", request.rebar_unit_price),
        ("concrete_unit_price", request.concrete_unit_price),
    ];

    for (name, value) in scalars {
        if !value.is_finite() || value < 0.0 {
            return Err(EstimatorError::InvalidInput(format!(
                "'{name}' must be zero or positive, got {value}"
            )));
        }
    }

    let stock = request.stock_bar_length_m;
    if !stock.is_finite() || stock <= 0.0 {
        return Err(EstimatorError::InvalidInput(format!(
            "'stock_bar_length_m' must be positive, got {stock}"
        )));
    }

    Ok(())
}

/// Checks every row and returns all problems at once.
///
/// The running piece total is capped at [`MAX_PIECES`]; the row that crosses
/// it is reported.
pub(super) fn check_specs(specs: &[RebarSpec]) -> Result<Vec<CutRow>> {
    let mut issues = Vec::new();
    let mut rows = Vec::with_capacity(specs.len());
    let mut total_pieces: usize = 0;
    let mut cap_reported = false;

    for (idx, spec) in specs.iter().enumerate() {
        let row = idx + 1;
        match cut_row(row, spec) {
            Ok(cut) => {
                total_pieces = total_pieces.saturating_add(cut.count);
                if total_pieces > MAX_PIECES && !cap_reported {
                    cap_reported = true;
                    issues.push(issue(
                        row,
                        "count",
                        spec.count,
                        &format!("request would need more than {MAX_PIECES} pieces"),
                    ));
                }
                rows.push(cut);
            }
            Err(row_issues) => issues.extend(row_issues),
        }
    }

    if issues.is_empty() {
        Ok(rows)
    } else {
        Err(EstimatorError::InvalidSpecs(issues))
    }
}

fn cut_row(row: usize, spec: &RebarSpec) -> std::result::Result<CutRow, Vec<SpecIssue>> {
    let mut issues = Vec::new();

    let diameter_mm = if spec.diameter_mm <= 0 {
        issues.push(issue(row, "diameter_mm", spec.diameter_mm, "diameter must be positive"));
        None
    } else if let Ok(d) = u32::try_from(spec.diameter_mm) {
        Some(d)
    } else {
        issues.push(issue(row, "diameter_mm", spec.diameter_mm, "diameter is out of range"));
        None
    };

    if !spec.piece_length_m.is_finite() || spec.piece_length_m <= 0.0 {
        issues.push(issue(
            row,
            "piece_length_m",
            spec.piece_length_m,
            "piece length must be positive",
        ));
    }

    let count = match usize::try_from(spec.count) {
        Ok(c) if c <= MAX_PIECES => Some(c),
        Ok(_) => {
            issues.push(issue(
                row,
                "count",
                spec.count,
                &format!("count must not exceed {MAX_PIECES}"),
            ));
            None
        }
        Err(_) => {
            issues.push(issue(row, "count", spec.count, "count must not be negative"));
            None
        }
    };

    match (diameter_mm, count) {
        (Some(diameter_mm), Some(count)) if issues.is_empty() => Ok(CutRow {
            diameter_mm,
            piece_length_m: spec.piece_length_m,
            count,
        }),
        _ => Err(issues),
    }
}

fn issue(row: usize, field: &str, value: impl ToString, reason: &str) -> SpecIssue {
    SpecIssue {
        row,
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(diameter_mm: i64, piece_length_m: f64, count: i64) -> RebarSpec {
        RebarSpec {
            diameter_mm,
            piece_length_m,
            count,
        }
    }

    #[test]
    fn test_row_with_three_problems_reports_all() {
        let issues = cut_row(4, &spec(0, -1.0, -3)).unwrap_err();

        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["diameter_mm", "piece_length_m", "count"]);
        assert!(issues.iter().all(|i| i.row == 4));
    }

    #[test]
    fn test_negative_and_oversized_diameters() {
        let negative = cut_row(1, &spec(-16, 7.5, 1)).unwrap_err();
        assert_eq!(negative[0].reason, "diameter must be positive");

        let huge = cut_row(1, &spec(i64::from(u32::MAX) + 1, 7.5, 1)).unwrap_err();
        assert_eq!(huge[0].reason, "diameter is out of range");
    }

    #[test]
    fn test_zero_count_row_is_valid() {
        let cut = cut_row(1, &spec(12, 3.0, 0)).unwrap();
        assert_eq!(cut.count, 0);
        assert_eq!(cut.diameter_mm, 12);
    }

    #[test]
    fn test_single_row_over_piece_cap() {
        let err = check_specs(&[spec(16, 7.5, 4_000_000_000)]).unwrap_err();
        match err {
            EstimatorError::InvalidSpecs(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].field, "count");
                assert_eq!(issues[0].value, "4000000000");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_running_total_over_piece_cap_names_crossing_row() {
        let half = (MAX_PIECES / 2) as i64;
        let err = check_specs(&[
            spec(12, 3.0, half),
            spec(14, 3.0, half),
            spec(16, 3.0, 1),
            spec(18, 3.0, 1),
        ])
        .unwrap_err();

        match err {
            EstimatorError::InvalidSpecs(issues) => {
                let rows: Vec<usize> = issues.iter().map(|i| i.row).collect();
                assert_eq!(rows, vec![3]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_exactly_at_piece_cap_is_accepted() {
        let rows = check_specs(&[spec(12, 3.0, MAX_PIECES as i64)]).unwrap();
        assert_eq!(rows[0].count, MAX_PIECES);
    }
}
