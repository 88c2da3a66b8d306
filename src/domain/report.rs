//! Allocation reports: the auditable result of one catalog solve.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::money::Price;

/// How a report's allocation was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// The solver proved the allocation optimal.
    Optimal,
    /// Best allocation found before the solver's limit expired.
    OptimalityUnknown,
    /// No allocation satisfies the budget and diversification constraints.
    Infeasible,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Optimal => "optimal",
            Self::OptimalityUnknown => "optimality unknown",
            Self::Infeasible => "infeasible",
        };
        f.write_str(label)
    }
}

/// One purchased instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationRow {
    pub name: String,
    pub lots: u32,
    /// Grossed-up cost of the lots, tax included.
    pub cost: Price,
    /// Projected annual dividend income.
    pub annual_return: Price,
}

/// Result for one catalog. Rows follow catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationReport {
    pub catalog: String,
    pub status: ReportStatus,
    pub rows: Vec<AllocationRow>,
    pub total_return: Price,
    pub total_cost: Price,
    pub leftover_funds: Price,
    pub initial_funds: Price,
    /// Cheapest spend meeting the diversification floor; set on infeasible
    /// reports so the shortfall is visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_spend: Option<Price>,
    pub generated_at: DateTime<Utc>,
}

impl AllocationReport {
    /// Explicit report for a catalog with no feasible allocation.
    #[must_use]
    pub fn infeasible(
        catalog: impl Into<String>,
        initial_funds: Price,
        minimum_spend: Price,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            status: ReportStatus::Infeasible,
            rows: Vec::new(),
            total_return: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            leftover_funds: initial_funds,
            initial_funds,
            minimum_spend: Some(minimum_spend),
            generated_at,
        }
    }

    #[must_use]
    pub fn is_feasible(&self) -> bool {
        self.status != ReportStatus::Infeasible
    }

    /// Number of distinct instruments held.
    #[must_use]
    pub fn instruments_held(&self) -> usize {
        self.rows.len()
    }

    /// Funds missing to reach the diversification floor, if infeasible.
    #[must_use]
    pub fn shortfall(&self) -> Option<Price> {
        self.minimum_spend
            .filter(|_| !self.is_feasible())
            .map(|spend| (spend - self.initial_funds).max(Decimal::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_infeasible_report_is_empty() {
        let report = AllocationReport::infeasible("tiny.csv", dec!(50), dec!(110), Utc::now());
        assert!(!report.is_feasible());
        assert!(report.rows.is_empty());
        assert_eq!(report.total_cost, Decimal::ZERO);
        assert_eq!(report.leftover_funds, dec!(50));
        assert_eq!(report.shortfall(), Some(dec!(60)));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ReportStatus::OptimalityUnknown).unwrap();
        assert_eq!(json, "\"optimality_unknown\"");
    }
}
