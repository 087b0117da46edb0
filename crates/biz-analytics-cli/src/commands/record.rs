use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use biz_analytics_core::kpi::FinancialInputs;

use crate::commands::CommandContext;
use crate::store;

/// Arguments for adding a financial record
#[derive(Args)]
pub struct AddArgs {
    /// Record date (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Total fixed costs for the period
    #[arg(long)]
    pub fixed_costs: Decimal,

    /// Variable cost per unit
    #[arg(long, alias = "variable-cost")]
    pub variable_cost_per_unit: Decimal,

    /// Selling price per unit
    #[arg(long, alias = "price")]
    pub price_per_unit: Decimal,

    /// Units sold
    #[arg(long, alias = "units")]
    pub units_sold: u32,

    /// Investment for the period (defaults to 0)
    #[arg(long, default_value = "0")]
    pub investment: Decimal,
}

/// Arguments for editing a financial record: unset flags keep the stored
/// value
#[derive(Args)]
pub struct EditArgs {
    /// Record id
    pub id: u64,

    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub fixed_costs: Option<Decimal>,

    #[arg(long, alias = "variable-cost")]
    pub variable_cost_per_unit: Option<Decimal>,

    #[arg(long, alias = "price")]
    pub price_per_unit: Option<Decimal>,

    #[arg(long, alias = "units")]
    pub units_sold: Option<u32>,

    #[arg(long)]
    pub investment: Option<Decimal>,
}

/// Arguments naming one record by id
#[derive(Args)]
pub struct IdArgs {
    /// Record id
    pub id: u64,
}

pub fn run_add(args: AddArgs, ctx: &CommandContext) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ledger = store::load(&ctx.ledger_path)?;
    let inputs = FinancialInputs {
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        fixed_costs: args.fixed_costs,
        variable_cost_per_unit: args.variable_cost_per_unit,
        price_per_unit: args.price_per_unit,
        units_sold: args.units_sold,
        investment: args.investment,
    };
    let record = serde_json::to_value(ledger.add_record(inputs)?)?;
    store::save(&ctx.ledger_path, &ledger)?;
    Ok(record)
}

pub fn run_edit(args: EditArgs, ctx: &CommandContext) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ledger = store::load(&ctx.ledger_path)?;
    let current = ledger.record(args.id)?.inputs().clone();
    let inputs = FinancialInputs {
        date: args.date.unwrap_or(current.date),
        fixed_costs: args.fixed_costs.unwrap_or(current.fixed_costs),
        variable_cost_per_unit: args
            .variable_cost_per_unit
            .unwrap_or(current.variable_cost_per_unit),
        price_per_unit: args.price_per_unit.unwrap_or(current.price_per_unit),
        units_sold: args.units_sold.unwrap_or(current.units_sold),
        investment: args.investment.unwrap_or(current.investment),
    };
    let record = serde_json::to_value(ledger.update_record(args.id, inputs)?)?;
    store::save(&ctx.ledger_path, &ledger)?;
    Ok(record)
}

pub fn run_delete(args: IdArgs, ctx: &CommandContext) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ledger = store::load(&ctx.ledger_path)?;
    let removed = ledger.delete_record(args.id)?;
    store::save(&ctx.ledger_path, &ledger)?;
    Ok(json!({ "deleted": removed.id }))
}

pub fn run_show(args: IdArgs, ctx: &CommandContext) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger = store::load(&ctx.ledger_path)?;
    let record = ledger.record(args.id)?;

    // Generated records also show the sales they were rolled up from
    if record.generated_from_sales {
        let sales = ledger.sales_for_date(record.date());
        return Ok(json!({
            "record": record,
            "sales": sales,
        }));
    }
    Ok(serde_json::to_value(record)?)
}

pub fn run_list(ctx: &CommandContext) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger = store::load(&ctx.ledger_path)?;
    Ok(serde_json::to_value(ledger.records_by_date_desc())?)
}
