mod commands;
mod config;
mod input;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::catalog::{AddCategoryArgs, AddDepartmentArgs, AddProductArgs};
use commands::kpi::KpiArgs;
use commands::record::{AddArgs, EditArgs, IdArgs};
use commands::report::ReportArgs;
use commands::sales::{AddSaleArgs, GenerateArgs, SalesArgs};
use commands::CommandContext;

/// Business analytics: KPI tracking, period reports, and the sales ledger
#[derive(Parser)]
#[command(
    name = "bas",
    version,
    about = "Business analytics: KPI tracking, period reports, and the sales ledger",
    long_about = "A CLI for recording financial inputs, computing business KPIs \
                  (revenue, profit, ROI, ROS, break-even, margin) with decimal \
                  precision, reporting them by year/quarter/month, and managing \
                  the reference data and sales that feed them."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to the ledger file (default: ledger.json)
    #[arg(long, env = "BAS_LEDGER", global = true)]
    ledger: Option<PathBuf>,

    /// Path to an optional bas.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// One-shot KPI calculation without touching the ledger
    Kpi(KpiArgs),
    /// Add a financial record to the ledger
    Add(AddArgs),
    /// Edit a financial record's inputs (KPIs are recomputed)
    Edit(EditArgs),
    /// Delete a financial record
    Delete(IdArgs),
    /// Show one financial record (plus its sales when generated)
    Show(IdArgs),
    /// List financial records, newest first
    List,
    /// Period-aggregated analysis report
    Report(ReportArgs),
    /// Headline totals across all records
    Dashboard,
    /// Add a category
    AddCategory(AddCategoryArgs),
    /// List categories
    Categories,
    /// Add a department
    AddDepartment(AddDepartmentArgs),
    /// List departments
    Departments,
    /// Add a product
    AddProduct(AddProductArgs),
    /// List products
    Products,
    /// Record a sale
    AddSale(AddSaleArgs),
    /// Search sales
    Sales(SalesArgs),
    /// Generate financial records from the sales rollup
    GenerateFromSales(GenerateArgs),
    /// Replace the ledger with a demo dataset
    Seed,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let ctx = match build_context(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Kpi(args) => commands::kpi::run_kpi(args),
        Commands::Add(args) => commands::record::run_add(args, &ctx),
        Commands::Edit(args) => commands::record::run_edit(args, &ctx),
        Commands::Delete(args) => commands::record::run_delete(args, &ctx),
        Commands::Show(args) => commands::record::run_show(args, &ctx),
        Commands::List => commands::record::run_list(&ctx),
        Commands::Report(args) => commands::report::run_report(args, &ctx),
        Commands::Dashboard => commands::report::run_dashboard(&ctx),
        Commands::AddCategory(args) => commands::catalog::run_add_category(args, &ctx),
        Commands::Categories => commands::catalog::run_categories(&ctx),
        Commands::AddDepartment(args) => commands::catalog::run_add_department(args, &ctx),
        Commands::Departments => commands::catalog::run_departments(&ctx),
        Commands::AddProduct(args) => commands::catalog::run_add_product(args, &ctx),
        Commands::Products => commands::catalog::run_products(&ctx),
        Commands::AddSale(args) => commands::sales::run_add_sale(args, &ctx),
        Commands::Sales(args) => commands::sales::run_sales(args, &ctx),
        Commands::GenerateFromSales(args) => commands::sales::run_generate(args, &ctx),
        Commands::Seed => commands::seed::run_seed(&ctx),
        Commands::Version => {
            println!("bas {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

/// Resolve the ledger path and cost-estimate ratios: the --ledger flag (or
/// BAS_LEDGER) wins over the config file, which wins over ledger.json.
fn build_context(cli: &Cli) -> Result<CommandContext, Box<dyn std::error::Error>> {
    let file_config = config::load(cli.config.as_deref())?;
    let ledger_path = cli
        .ledger
        .clone()
        .or(file_config.ledger_path)
        .unwrap_or_else(|| PathBuf::from("ledger.json"));

    Ok(CommandContext {
        ledger_path,
        estimates: file_config.estimates,
    })
}
