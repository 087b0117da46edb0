use chrono::Local;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::commands::CommandContext;
use crate::store;

/// Arguments for adding a category
#[derive(Args)]
pub struct AddCategoryArgs {
    /// Category name
    #[arg(long)]
    pub name: String,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,
}

/// Arguments for adding a department
#[derive(Args)]
pub struct AddDepartmentArgs {
    /// Department name
    #[arg(long)]
    pub name: String,

    /// Responsible manager
    #[arg(long)]
    pub manager: Option<String>,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,
}

/// Arguments for adding a product
#[derive(Args)]
pub struct AddProductArgs {
    /// Product name
    #[arg(long)]
    pub name: String,

    /// Short stock code, e.g. SM-001
    #[arg(long)]
    pub code: Option<String>,

    /// List price per unit
    #[arg(long)]
    pub price: Decimal,

    /// Units in stock
    #[arg(long, default_value = "0")]
    pub stock: u32,

    /// Id of an existing category
    #[arg(long)]
    pub category: u64,
}

pub fn run_add_category(
    args: AddCategoryArgs,
    ctx: &CommandContext,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ledger = store::load(&ctx.ledger_path)?;
    let category = serde_json::to_value(ledger.add_category(
        args.name,
        args.description,
        Local::now().date_naive(),
    ))?;
    store::save(&ctx.ledger_path, &ledger)?;
    Ok(category)
}

pub fn run_categories(ctx: &CommandContext) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger = store::load(&ctx.ledger_path)?;
    Ok(serde_json::to_value(ledger.categories())?)
}

pub fn run_add_department(
    args: AddDepartmentArgs,
    ctx: &CommandContext,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ledger = store::load(&ctx.ledger_path)?;
    let department = serde_json::to_value(ledger.add_department(
        args.name,
        args.manager,
        args.description,
        Local::now().date_naive(),
    ))?;
    store::save(&ctx.ledger_path, &ledger)?;
    Ok(department)
}

pub fn run_departments(ctx: &CommandContext) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger = store::load(&ctx.ledger_path)?;
    Ok(serde_json::to_value(ledger.departments())?)
}

pub fn run_add_product(
    args: AddProductArgs,
    ctx: &CommandContext,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ledger = store::load(&ctx.ledger_path)?;
    let product = serde_json::to_value(ledger.add_product(
        args.name,
        args.code,
        args.price,
        args.stock,
        args.category,
        Local::now().date_naive(),
    )?)?;
    store::save(&ctx.ledger_path, &ledger)?;
    Ok(product)
}

pub fn run_products(ctx: &CommandContext) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger = store::load(&ctx.ledger_path)?;
    Ok(serde_json::to_value(ledger.products())?)
}
