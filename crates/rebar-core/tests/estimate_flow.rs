use rebar_core::format::{format_currency, round_to};
use rebar_core::{estimate, pack, EstimateRequest, EstimatorError};

const SITE_REQUEST: &str = r#"{
    "concrete_volume_m3": 50.0,
    "rebar_unit_price": 48000,
    "concrete_unit_price": 2500000,
    "specs": [
        {"diameter_mm": 16, "piece_length_m": 7.5, "count": 20},
        {"diameter_mm": 14, "piece_length_m": 5.2, "count": 15}
    ]
}"#;

#[test]
fn test_json_request_to_report() {
    let request: EstimateRequest = serde_json::from_str(SITE_REQUEST).unwrap();
    let report = estimate(request).unwrap();

    assert_eq!(report.diameters.len(), 2);
    assert_eq!(report.summary.total_bars, 28);

    let d16 = report
        .diameters
        .iter()
        .find(|d| d.diameter_mm == 16)
        .unwrap();
    assert_eq!(round_to(d16.total_weight_kg, 2), 237.04);
    assert_eq!(format_currency(d16.total_cost), "11,377,777");

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["summary"]["total_cost"].is_number());
    assert_eq!(json["diameters"][0]["diameter_mm"], 14);
}

#[test]
fn test_report_totals_are_consistent() {
    let request: EstimateRequest = serde_json::from_str(SITE_REQUEST).unwrap();
    let report = estimate(request).unwrap();
    let s = &report.summary;

    assert_eq!(s.total_cost, s.total_rebar_cost + s.concrete_cost);
    assert_eq!(report.waste_rows().len() as u32, s.total_bars);

    let waste_sum: f64 = report.waste_rows().iter().map(|w| w.waste_m).sum();
    assert!((waste_sum - s.total_waste_m).abs() < 1e-9);
}

#[test]
fn test_standalone_packer_and_estimator_agree() {
    let mut pieces = vec![7.5; 20];
    pieces.extend(vec![5.2; 15]);
    let packing = pack(&pieces, 12.0).unwrap();

    let request: EstimateRequest = serde_json::from_str(
        r#"{"specs": [
            {"diameter_mm": 16, "piece_length_m": 7.5, "count": 20},
            {"diameter_mm": 16, "piece_length_m": 5.2, "count": 15}
        ]}"#,
    )
    .unwrap();
    let report = estimate(request).unwrap();

    assert_eq!(report.diameters[0].bars_required, packing.bar_count);
    assert_eq!(report.diameters[0].waste_list, packing.waste_per_bar);
    assert_eq!(report.summary.total_cost, 0.0);
}

#[test]
fn test_errors_render_readable_messages() {
    let err = pack(&[13.0], 12.0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Piece of 13 m is longer than the 12 m stock bar"
    );

    let request: EstimateRequest = serde_json::from_str(
        r#"{"stock_bar_length_m": 6.0, "specs": [{"diameter_mm": 20, "piece_length_m": 6.5, "count": 1}]}"#,
    )
    .unwrap();
    let err = estimate(request).unwrap_err();
    assert!(matches!(err, EstimatorError::UnpackablePiece { .. }));
    assert_eq!(
        err.to_string(),
        "Cannot cut a 6.5 m piece of 20 mm rebar from 6 m stock bars"
    );
}
