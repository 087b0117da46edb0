use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use biz_analytics_core::sales::SaleFilter;

use crate::commands::CommandContext;
use crate::store;

/// Arguments for recording a sale
#[derive(Args)]
pub struct AddSaleArgs {
    /// Sale date and time, e.g. 2024-05-10T14:30:00 (defaults to now)
    #[arg(long)]
    pub sold_at: Option<NaiveDateTime>,

    /// Units sold
    #[arg(long)]
    pub quantity: u32,

    /// Unit price (defaults to the product's list price)
    #[arg(long)]
    pub unit_price: Option<Decimal>,

    /// Customer name
    #[arg(long)]
    pub customer: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Id of an existing product
    #[arg(long)]
    pub product: u64,

    /// Id of an existing department
    #[arg(long)]
    pub department: u64,
}

/// Arguments for searching sales; unset filters match everything
#[derive(Args)]
pub struct SalesArgs {
    /// Earliest sale date (inclusive)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Latest sale date (inclusive)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Category ids to match (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<u64>,

    /// Department ids to match (repeatable)
    #[arg(long = "department")]
    pub departments: Vec<u64>,

    /// Customer name prefix
    #[arg(long)]
    pub customer_starts: Option<String>,

    /// Customer name suffix
    #[arg(long)]
    pub customer_ends: Option<String>,

    /// Product name prefix
    #[arg(long)]
    pub product_starts: Option<String>,

    /// Product name suffix
    #[arg(long)]
    pub product_ends: Option<String>,
}

/// Arguments for generating financial records from sales
#[derive(Args)]
pub struct GenerateArgs {
    /// First day of the range (defaults to 30 days ago)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the range (defaults to today)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

pub fn run_add_sale(
    args: AddSaleArgs,
    ctx: &CommandContext,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ledger = store::load(&ctx.ledger_path)?;
    let unit_price = match args.unit_price {
        Some(price) => price,
        None => ledger.product(args.product)?.price,
    };
    let sale = serde_json::to_value(ledger.add_sale(
        args.sold_at.unwrap_or_else(|| Local::now().naive_local()),
        args.quantity,
        unit_price,
        args.customer,
        args.notes,
        args.product,
        args.department,
    )?)?;
    store::save(&ctx.ledger_path, &ledger)?;
    Ok(sale)
}

pub fn run_sales(args: SalesArgs, ctx: &CommandContext) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger = store::load(&ctx.ledger_path)?;
    let filter = SaleFilter {
        start: args.start.and_then(|d| d.and_hms_opt(0, 0, 0)),
        end: args.end.and_then(end_bound),
        category_ids: args.categories,
        department_ids: args.departments,
        customer_name_starts: args.customer_starts,
        customer_name_ends: args.customer_ends,
        product_name_starts: args.product_starts,
        product_name_ends: args.product_ends,
    };
    Ok(serde_json::to_value(ledger.search_sales(&filter))?)
}

/// Exclusive filter bound for an inclusive end date: the following day's
/// midnight, so sales with sub-second timestamps in the final second of
/// the day still match.
fn end_bound(end: NaiveDate) -> Option<NaiveDateTime> {
    end.succ_opt().and_then(|next| next.and_hms_opt(0, 0, 0))
}

pub fn run_generate(
    args: GenerateArgs,
    ctx: &CommandContext,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ledger = store::load(&ctx.ledger_path)?;
    let today = Local::now().date_naive();
    let start = args.start.unwrap_or(today - Duration::days(30));
    let end = args.end.unwrap_or(today);

    let summary = ledger.generate_from_sales(start, end, &ctx.estimates)?;
    store::save(&ctx.ledger_path, &ledger)?;
    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        "generated financial records from sales"
    );
    Ok(serde_json::to_value(summary)?)
}
