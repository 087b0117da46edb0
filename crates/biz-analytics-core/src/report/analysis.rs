use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::kpi::record::FinancialRecord;
use crate::report::period::{Period, PeriodKey};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::BizAnalyticsResult;

// ---------------------------------------------------------------------------
// Output types — Analysis Report
// ---------------------------------------------------------------------------

/// One aggregate group of the analysis report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    /// "2024", "Q1/2024" or "1/2024" depending on granularity
    pub label: String,
    pub revenue: Money,
    pub total_costs: Money,
    pub profit: Money,
    pub investment: Money,
    /// Recomputed from the group sums, not averaged per record
    pub roi: Percent,
    /// Recomputed from the group sums, not averaged per record
    pub ros: Percent,
}

/// Period-aggregated report over a set of financial records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub period: Period,
    /// Groups in ascending time order
    pub groups: Vec<PeriodSummary>,
}

/// Parallel-array projection of the report for charting front ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub revenues: Vec<Money>,
    pub total_costs: Vec<Money>,
    pub profits: Vec<Money>,
    pub rois: Vec<Percent>,
    pub ross: Vec<Percent>,
}

/// Headline totals across all records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub total_revenue: Money,
    pub total_costs: Money,
    pub total_profit: Money,
    pub record_count: usize,
}

#[derive(Default)]
struct GroupSums {
    revenue: Decimal,
    total_costs: Decimal,
    profit: Decimal,
    investment: Decimal,
}

fn safe_pct(numerator: Decimal, denominator: Decimal) -> Percent {
    if denominator > dec!(0) {
        numerator / denominator * dec!(100)
    } else {
        Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Function: build_analysis_report
// ---------------------------------------------------------------------------

/// Group records by the requested period, sum revenue / total costs /
/// profit / investment per group, and recompute ROI and ROS from the group
/// sums with the calculator's zero-guards.
pub fn build_analysis_report(
    records: &[FinancialRecord],
    period: Period,
) -> BizAnalyticsResult<ComputationOutput<AnalysisReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if records.is_empty() {
        warnings.push("No financial records; the report is empty".to_string());
    }

    // BTreeMap keeps the groups in ascending time order.
    let mut sums: BTreeMap<PeriodKey, GroupSums> = BTreeMap::new();
    for record in records {
        let key = PeriodKey::for_date(record.date(), period);
        let entry = sums.entry(key).or_default();
        let figures = record.figures();
        entry.revenue += figures.revenue;
        entry.total_costs += figures.total_costs;
        entry.profit += figures.profit;
        entry.investment += record.inputs().investment;
    }

    let groups = sums
        .into_iter()
        .map(|(key, group)| PeriodSummary {
            label: key.label(),
            revenue: group.revenue,
            total_costs: group.total_costs,
            profit: group.profit,
            investment: group.investment,
            roi: safe_pct(group.profit, group.investment),
            ros: safe_pct(group.profit, group.revenue),
        })
        .collect();

    let report = AnalysisReport { period, groups };
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Period-Aggregated Analysis Report with per-group ROI/ROS",
        &serde_json::json!({
            "period": period,
            "records": records.len(),
        }),
        warnings,
        elapsed,
        report,
    ))
}

impl AnalysisReport {
    /// Project the groups into the parallel arrays the chart layer consumes.
    pub fn chart_series(&self) -> ChartSeries {
        ChartSeries {
            labels: self.groups.iter().map(|g| g.label.clone()).collect(),
            revenues: self.groups.iter().map(|g| g.revenue).collect(),
            total_costs: self.groups.iter().map(|g| g.total_costs).collect(),
            profits: self.groups.iter().map(|g| g.profit).collect(),
            rois: self.groups.iter().map(|g| g.roi).collect(),
            ross: self.groups.iter().map(|g| g.ros).collect(),
        }
    }
}

/// Headline totals across all records: total revenue, total costs, total
/// profit, record count.
pub fn dashboard_summary(records: &[FinancialRecord]) -> DashboardSummary {
    DashboardSummary {
        total_revenue: records.iter().map(|r| r.figures().revenue).sum(),
        total_costs: records.iter().map(|r| r.figures().total_costs).sum(),
        total_profit: records.iter().map(|r| r.figures().profit).sum(),
        record_count: records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::record::FinancialInputs;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(id: u64, date: (i32, u32, u32), units: u32, investment: Decimal) -> FinancialRecord {
        FinancialRecord::new(
            id,
            FinancialInputs {
                date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
                fixed_costs: dec!(1000),
                variable_cost_per_unit: dec!(50),
                price_per_unit: dec!(200),
                units_sold: units,
                investment,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_groups_ordered_ascending() {
        let records = vec![
            record(1, (2024, 5, 1), 10, dec!(0)),
            record(2, (2023, 12, 1), 10, dec!(0)),
            record(3, (2024, 1, 1), 10, dec!(0)),
        ];
        let report = build_analysis_report(&records, Period::Month).unwrap().result;
        let labels: Vec<&str> = report.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["12/2023", "1/2024", "5/2024"]);
    }

    #[test]
    fn test_roi_recomputed_from_sums_not_averaged() {
        // Two records in the same month:
        //   r1: units 100, investment 5000 -> revenue 20000, total 11000, profit 9000
        //   r2: units 10,  investment 0    -> revenue 2000,  total 1500,  profit 500
        // Group: profit 9500, investment 5000 -> roi = 190
        // (averaging per-record ROIs 180 and 0 would give 90)
        let records = vec![
            record(1, (2024, 3, 1), 100, dec!(5000)),
            record(2, (2024, 3, 20), 10, dec!(0)),
        ];
        let report = build_analysis_report(&records, Period::Month).unwrap().result;
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].roi, dec!(190));
    }

    #[test]
    fn test_empty_report_warns() {
        let output = build_analysis_report(&[], Period::Year).unwrap();
        assert!(output.result.groups.is_empty());
        assert!(!output.warnings.is_empty());
    }

    #[test]
    fn test_dashboard_summary_totals() {
        let records = vec![
            record(1, (2024, 3, 1), 100, dec!(5000)),
            record(2, (2024, 4, 1), 10, dec!(0)),
        ];
        let stats = dashboard_summary(&records);
        assert_eq!(stats.total_revenue, dec!(22000));
        assert_eq!(stats.total_costs, dec!(12500));
        assert_eq!(stats.total_profit, dec!(9500));
        assert_eq!(stats.record_count, 2);
    }
}
