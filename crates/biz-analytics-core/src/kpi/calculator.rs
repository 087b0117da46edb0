use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BizAnalyticsError;
use crate::kpi::record::FinancialInputs;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::BizAnalyticsResult;

// ---------------------------------------------------------------------------
// Output types — KPI Calculation
// ---------------------------------------------------------------------------

/// Overall health classification derived from the computed KPIs.
///
/// Variants are checked in declaration order; the first matching condition
/// wins. A profitable business with zero investment has roi = 0, which skips
/// the `LowRoi` branch entirely (the original system behaves the same way).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HealthAssessment {
    /// Loss-making and selling fewer units than the break-even volume
    LossBelowBreakEven,
    /// Loss-making despite covering the break-even volume
    LossReviewCosts,
    /// Profitable but ROI is below 5%
    LowRoi,
    /// Profitable but ROS is below 10%
    LowRos,
    Healthy,
}

/// The full derived-figure snapshot for one set of financial inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiFigures {
    /// price_per_unit * units_sold
    pub revenue: Money,
    /// fixed_costs + variable_cost_per_unit * units_sold
    pub gross_costs: Money,
    /// gross_costs + investment
    pub total_costs: Money,
    /// revenue - total_costs
    pub profit: Money,
    /// price_per_unit - variable_cost_per_unit (contribution margin)
    pub margin_per_unit: Money,
    /// profit / investment as a whole percentage; 0 when investment is 0
    pub roi: Percent,
    /// profit / revenue as a whole percentage; 0 when revenue is 0
    pub ros: Percent,
    /// Units needed for profit = 0; 0 when margin_per_unit <= 0
    pub break_even: Decimal,
    pub assessment: HealthAssessment,
    /// Human-readable recommendation matching the assessment
    pub recommendation: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Safe percentage: numerator / denominator * 100, or zero when the
/// denominator is not positive.
fn safe_pct(numerator: Decimal, denominator: Decimal) -> Percent {
    if denominator > dec!(0) {
        numerator / denominator * dec!(100)
    } else {
        Decimal::ZERO
    }
}

fn require_non_negative(field: &str, value: Money) -> BizAnalyticsResult<()> {
    if value < dec!(0) {
        return Err(BizAnalyticsError::InvalidInput {
            field: field.to_string(),
            reason: format!("{} cannot be negative", field),
        });
    }
    Ok(())
}

fn recommendation_for(assessment: HealthAssessment) -> String {
    match assessment {
        HealthAssessment::LossBelowBreakEven => {
            "Warning: Loss. Sales volume is below the break-even point. \
             It is necessary to increase sales or reduce variable costs."
        }
        HealthAssessment::LossReviewCosts => {
            "Warning: Loss. Sales volume covers the break-even point, \
             so the cost structure needs review: reduce fixed costs or \
             reconsider the size of the investment."
        }
        HealthAssessment::LowRoi => {
            "Attention: Low ROI. The business is profitable, but the return \
             on investment is below 5%. The invested capital is working \
             inefficiently."
        }
        HealthAssessment::LowRos => {
            "Attention: Low ROS. The business is profitable, but the return \
             on sales is below 10%. Margins are thin; review pricing or \
             variable costs."
        }
        HealthAssessment::Healthy => {
            "Healthy state: Business is profitable, sales are above the \
             break-even point, and profitability indicators (ROI, ROS) are \
             positive."
        }
    }
    .to_string()
}

// ---------------------------------------------------------------------------
// Function: calculate_kpi
// ---------------------------------------------------------------------------

/// Compute the full KPI snapshot for one set of financial inputs: revenue,
/// cost totals, profit, contribution margin, ROI, ROS, break-even volume,
/// and a health assessment with a recommendation text.
///
/// Division guards return zero rather than erroring: roi is 0 when there is
/// no investment, ros is 0 when there is no revenue, and break_even is 0
/// when the contribution margin is not positive.
pub fn calculate_kpi(
    inputs: &FinancialInputs,
) -> BizAnalyticsResult<ComputationOutput<KpiFigures>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validate inputs ---
    require_non_negative("fixed_costs", inputs.fixed_costs)?;
    require_non_negative("variable_cost_per_unit", inputs.variable_cost_per_unit)?;
    require_non_negative("price_per_unit", inputs.price_per_unit)?;
    require_non_negative("investment", inputs.investment)?;

    let units = Decimal::from(inputs.units_sold);

    // --- Core formulas ---
    let revenue = inputs.price_per_unit * units;
    let gross_costs = inputs.fixed_costs + inputs.variable_cost_per_unit * units;
    let total_costs = gross_costs + inputs.investment;
    let profit = revenue - total_costs;
    let margin_per_unit = inputs.price_per_unit - inputs.variable_cost_per_unit;

    let roi = safe_pct(profit, inputs.investment);
    let ros = safe_pct(profit, revenue);

    let break_even = if margin_per_unit > dec!(0) {
        inputs.fixed_costs / margin_per_unit
    } else {
        Decimal::ZERO
    };

    if inputs.units_sold == 0 {
        warnings.push("No units sold; revenue and ROS are zero".to_string());
    }
    if margin_per_unit <= dec!(0) && inputs.price_per_unit > dec!(0) {
        warnings.push(
            "Contribution margin is zero or negative; break-even volume is unreachable"
                .to_string(),
        );
    }

    // --- Health assessment (first matching branch wins) ---
    let assessment = if profit <= dec!(0) {
        if units < break_even {
            HealthAssessment::LossBelowBreakEven
        } else {
            HealthAssessment::LossReviewCosts
        }
    } else if roi > dec!(0) && roi < dec!(5) {
        HealthAssessment::LowRoi
    } else if ros > dec!(0) && ros < dec!(10) {
        HealthAssessment::LowRos
    } else {
        HealthAssessment::Healthy
    };

    let figures = KpiFigures {
        revenue,
        gross_costs,
        total_costs,
        profit,
        margin_per_unit,
        roi,
        ros,
        break_even,
        assessment,
        recommendation: recommendation_for(assessment),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Business KPI Calculation (Revenue, Profit, ROI, ROS, Break-even)",
        &serde_json::json!({
            "date": inputs.date,
            "fixed_costs": inputs.fixed_costs.to_string(),
            "variable_cost_per_unit": inputs.variable_cost_per_unit.to_string(),
            "price_per_unit": inputs.price_per_unit.to_string(),
            "units_sold": inputs.units_sold,
            "investment": inputs.investment.to_string(),
        }),
        warnings,
        elapsed,
        figures,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn inputs(
        fixed: Decimal,
        variable: Decimal,
        price: Decimal,
        units: u32,
        investment: Decimal,
    ) -> FinancialInputs {
        FinancialInputs {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            fixed_costs: fixed,
            variable_cost_per_unit: variable,
            price_per_unit: price,
            units_sold: units,
            investment,
        }
    }

    #[test]
    fn test_negative_fixed_costs_rejected() {
        let result = calculate_kpi(&inputs(dec!(-1), dec!(0), dec!(10), 5, dec!(0)));
        assert!(matches!(
            result,
            Err(BizAnalyticsError::InvalidInput { ref field, .. }) if field == "fixed_costs"
        ));
    }

    #[test]
    fn test_loss_covering_breakeven_classified_as_review_costs() {
        // price 100, variable 50 -> margin 50; fixed 1000 -> break-even 20
        // units 30 covers break-even, but investment 2000 forces a loss:
        // revenue 3000, gross 2500, total 4500, profit -1500
        let result = calculate_kpi(&inputs(dec!(1000), dec!(50), dec!(100), 30, dec!(2000)))
            .unwrap()
            .result;
        assert_eq!(result.profit, dec!(-1500));
        assert_eq!(result.assessment, HealthAssessment::LossReviewCosts);
    }

    #[test]
    fn test_low_roi_branch() {
        // fixed 100, variable 50, price 100, units 100, investment 4800
        // revenue 10000, gross 5100, total 9900, profit 100
        // roi = 100/4800*100 ≈ 2.08 -> LowRoi
        let result = calculate_kpi(&inputs(dec!(100), dec!(50), dec!(100), 100, dec!(4800)))
            .unwrap()
            .result;
        assert_eq!(result.profit, dec!(100));
        assert_eq!(result.assessment, HealthAssessment::LowRoi);
    }

    #[test]
    fn test_low_ros_branch() {
        // fixed 0, variable 95, price 100, units 100, investment 100
        // revenue 10000, gross 9500, total 9600, profit 400
        // roi = 400% (not low), ros = 4% -> LowRos
        let result = calculate_kpi(&inputs(dec!(0), dec!(95), dec!(100), 100, dec!(100)))
            .unwrap()
            .result;
        assert_eq!(result.assessment, HealthAssessment::LowRos);
    }

    #[test]
    fn test_zero_margin_warns_but_succeeds() {
        let output = calculate_kpi(&inputs(dec!(500), dec!(10), dec!(10), 20, dec!(0))).unwrap();
        assert_eq!(output.result.break_even, Decimal::ZERO);
        assert!(!output.warnings.is_empty());
    }
}
