use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use biz_analytics_core::kpi::{calculate_kpi, FinancialInputs};

use crate::input;

/// Arguments for a one-shot KPI calculation
#[derive(Args)]
pub struct KpiArgs {
    /// Record date (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Total fixed costs for the period
    #[arg(long)]
    pub fixed_costs: Option<Decimal>,

    /// Variable cost per unit
    #[arg(long, alias = "variable-cost")]
    pub variable_cost_per_unit: Option<Decimal>,

    /// Selling price per unit
    #[arg(long, alias = "price")]
    pub price_per_unit: Option<Decimal>,

    /// Units sold
    #[arg(long, alias = "units")]
    pub units_sold: Option<u32>,

    /// Investment for the period (defaults to 0)
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_kpi(args: KpiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let kpi_input: FinancialInputs = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        FinancialInputs {
            date: args.date.unwrap_or_else(|| Local::now().date_naive()),
            fixed_costs: args
                .fixed_costs
                .ok_or("--fixed-costs is required (or provide --input)")?,
            variable_cost_per_unit: args
                .variable_cost_per_unit
                .ok_or("--variable-cost-per-unit is required (or provide --input)")?,
            price_per_unit: args
                .price_per_unit
                .ok_or("--price-per-unit is required (or provide --input)")?,
            units_sold: args
                .units_sold
                .ok_or("--units-sold is required (or provide --input)")?,
            investment: args.investment.unwrap_or(Decimal::ZERO),
        }
    };
    let result = calculate_kpi(&kpi_input)?;
    Ok(serde_json::to_value(result)?)
}
