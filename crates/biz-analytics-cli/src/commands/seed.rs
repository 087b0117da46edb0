use chrono::{Duration, Local};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use biz_analytics_core::ledger::Ledger;

use crate::commands::CommandContext;
use crate::store;

const CATEGORIES: [(&str, &str); 5] = [
    ("Electronics", "Electronic devices and accessories"),
    ("Clothing", "Clothing and footwear"),
    ("Food Products", "Food items"),
    ("Furniture", "Home and office furniture"),
    ("Books", "Books and educational materials"),
];

const DEPARTMENTS: [(&str, &str, &str); 5] = [
    ("Sales Department", "John Smith", "Responsible for product sales"),
    ("Marketing Department", "Mary Johnson", "Marketing campaigns and advertising"),
    ("Logistics Department", "Alex Brown", "Delivery and warehouse operations"),
    ("Customer Service", "Emma Wilson", "Customer support and service"),
    ("Online Department", "David Lee", "Online sales and e-commerce"),
];

// (name, code, price, stock, category index)
const PRODUCTS: [(&str, &str, Decimal, u32, usize); 10] = [
    ("Samsung Smartphone", "SM-001", dec!(15000), 50, 0),
    ("Dell Laptop", "DL-002", dec!(35000), 25, 0),
    ("Men's T-Shirt", "TS-003", dec!(500), 200, 1),
    ("Jeans", "JN-004", dec!(1200), 150, 1),
    ("White Bread", "BR-005", dec!(25), 500, 2),
    ("Milk", "ML-006", dec!(35), 300, 2),
    ("Office Desk", "TB-007", dec!(4500), 40, 3),
    ("Office Chair", "CH-008", dec!(3200), 60, 3),
    ("C# Programming Book", "BK-009", dec!(450), 100, 4),
    ("Database Fundamentals Book", "BK-010", dec!(380), 80, 4),
];

const SALE_COUNT: usize = 50;

/// Replace the ledger with the demo dataset: the reference tables above
/// plus randomized sales spread over the last 30 days.
pub fn run_seed(ctx: &CommandContext) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ledger = Ledger::new();
    let mut rng = rand::thread_rng();
    let today = Local::now().date_naive();

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (i, (name, description)) in CATEGORIES.iter().enumerate() {
        let created = today - Duration::days(30 - 5 * i as i64);
        let category = ledger.add_category(
            name.to_string(),
            Some(description.to_string()),
            created,
        );
        category_ids.push(category.id);
    }

    let mut department_ids = Vec::with_capacity(DEPARTMENTS.len());
    for (i, (name, manager, description)) in DEPARTMENTS.iter().enumerate() {
        let created = today - Duration::days(30 - 3 * i as i64);
        let department = ledger.add_department(
            name.to_string(),
            Some(manager.to_string()),
            Some(description.to_string()),
            created,
        );
        department_ids.push(department.id);
    }

    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (i, (name, code, price, stock, category_idx)) in PRODUCTS.iter().enumerate() {
        let created = today - Duration::days(20 - 2 * i as i64);
        let product = ledger.add_product(
            name.to_string(),
            Some(code.to_string()),
            *price,
            *stock,
            category_ids[*category_idx],
            created,
        )?;
        products.push((product.id, product.price));
    }

    for i in 0..SALE_COUNT {
        let (product_id, price) = products[rng.gen_range(0..products.len())];
        let department_id = department_ids[rng.gen_range(0..department_ids.len())];
        let quantity = rng.gen_range(1..10);
        let sold_at = (today - Duration::days(rng.gen_range(0..30)))
            .and_hms_opt(rng.gen_range(0..24), rng.gen_range(0..60), 0)
            .ok_or("invalid sale time")?;

        ledger.add_sale(
            sold_at,
            quantity,
            price,
            Some(format!("Customer {}", i + 1)),
            Some(format!("Sale #{}", i + 1)),
            product_id,
            department_id,
        )?;
    }

    store::save(&ctx.ledger_path, &ledger)?;
    tracing::info!(path = %ctx.ledger_path.display(), "seeded demo ledger");

    Ok(json!({
        "categories": CATEGORIES.len(),
        "departments": DEPARTMENTS.len(),
        "products": PRODUCTS.len(),
        "sales": SALE_COUNT,
        "ledger": ctx.ledger_path.display().to_string(),
    }))
}
