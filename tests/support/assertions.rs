use rust_decimal::Decimal;

use divvy::domain::{AllocationReport, Catalog, ParameterSet, ReportStatus};

pub fn assert_decimal_near(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}

/// Check every report-level invariant against the catalog and parameters
/// that produced it.
pub fn assert_report_consistent(report: &AllocationReport, catalog: &Catalog, params: &ParameterSet) {
    if report.status == ReportStatus::Infeasible {
        assert!(report.rows.is_empty(), "infeasible report has rows");
        assert_eq!(report.leftover_funds, params.initial_funds());
        return;
    }

    let gross = Decimal::ONE + params.tax_rate();
    let mut position = 0;
    for row in &report.rows {
        assert!(row.lots >= 1, "row {} has no lots", row.name);
        assert!(row.lots <= params.max_lots(), "row {} over max lots", row.name);

        let offset = catalog.instruments()[position..]
            .iter()
            .position(|i| i.name() == row.name)
            .unwrap_or_else(|| panic!("row {} out of catalog order", row.name));
        let instrument = &catalog.instruments()[position + offset];
        position += offset + 1;

        let lots = Decimal::from(row.lots);
        assert_eq!(row.cost, lots * instrument.price_per_lot() * gross);
        assert_eq!(
            row.annual_return,
            lots * instrument.price_per_lot() * instrument.dividend_yield()
        );
    }

    let total_cost: Decimal = report.rows.iter().map(|r| r.cost).sum();
    let total_return: Decimal = report.rows.iter().map(|r| r.annual_return).sum();
    assert_eq!(report.total_cost, total_cost);
    assert_eq!(report.total_return, total_return);
    assert!(report.total_cost <= params.initial_funds() + Decimal::new(1, 4));
    assert!(report.leftover_funds >= Decimal::ZERO);
    assert_decimal_near(
        report.leftover_funds,
        params.initial_funds() - report.total_cost,
        Decimal::new(1, 4),
    );
    assert!(report.instruments_held() >= params.min_instruments());
}
