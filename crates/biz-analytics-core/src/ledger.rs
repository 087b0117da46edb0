//! The persistence aggregate: financial records, reference data, and sales
//! in one serde document with per-table id counters.
//!
//! The ledger is a snapshot store. Derived KPI figures are computed when a
//! record is created or its inputs change, and are serialized as stored —
//! loading a ledger never recomputes them.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Department, Product};
use crate::error::BizAnalyticsError;
use crate::kpi::record::{FinancialInputs, FinancialRecord};
use crate::sales::{rollup_sales_by_day, CostEstimates, Sale, SaleFilter};
use crate::types::Money;
use crate::BizAnalyticsResult;

fn one() -> u64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NextIds {
    #[serde(default = "one")]
    record: u64,
    #[serde(default = "one")]
    category: u64,
    #[serde(default = "one")]
    department: u64,
    #[serde(default = "one")]
    product: u64,
    #[serde(default = "one")]
    sale: u64,
}

impl Default for NextIds {
    fn default() -> Self {
        Self {
            record: 1,
            category: 1,
            department: 1,
            product: 1,
            sale: 1,
        }
    }
}

/// Counts returned by [`Ledger::generate_from_sales`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationSummary {
    pub created: usize,
    pub updated: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    records: Vec<FinancialRecord>,
    categories: Vec<Category>,
    departments: Vec<Department>,
    products: Vec<Product>,
    sales: Vec<Sale>,
    next_ids: NextIds,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Financial records
    // -----------------------------------------------------------------------

    /// Create a record from inputs, computing the KPI snapshot once.
    pub fn add_record(&mut self, inputs: FinancialInputs) -> BizAnalyticsResult<&FinancialRecord> {
        let id = self.next_ids.record;
        let record = FinancialRecord::new(id, inputs)?;
        self.next_ids.record += 1;
        self.records.push(record);
        Ok(self.records.last().unwrap())
    }

    pub fn record(&self, id: u64) -> BizAnalyticsResult<&FinancialRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(BizAnalyticsError::NotFound {
                entity: "FinancialRecord",
                id,
            })
    }

    /// Replace a record's inputs and recompute its snapshot.
    pub fn update_record(
        &mut self,
        id: u64,
        inputs: FinancialInputs,
    ) -> BizAnalyticsResult<&FinancialRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(BizAnalyticsError::NotFound {
                entity: "FinancialRecord",
                id,
            })?;
        record.update_inputs(inputs)?;
        Ok(record)
    }

    pub fn delete_record(&mut self, id: u64) -> BizAnalyticsResult<FinancialRecord> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(BizAnalyticsError::NotFound {
                entity: "FinancialRecord",
                id,
            })?;
        Ok(self.records.remove(pos))
    }

    /// All records in storage order (by id).
    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    /// Records ordered by date descending, newest first.
    pub fn records_by_date_desc(&self) -> Vec<&FinancialRecord> {
        let mut sorted: Vec<&FinancialRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.date().cmp(&a.date()));
        sorted
    }

    // -----------------------------------------------------------------------
    // Reference data
    // -----------------------------------------------------------------------

    pub fn add_category(
        &mut self,
        name: String,
        description: Option<String>,
        created: NaiveDate,
    ) -> &Category {
        let id = self.next_ids.category;
        self.next_ids.category += 1;
        self.categories.push(Category {
            id,
            name,
            description,
            created,
        });
        self.categories.last().unwrap()
    }

    /// Categories ordered by name.
    pub fn categories(&self) -> Vec<&Category> {
        let mut sorted: Vec<&Category> = self.categories.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    pub fn add_department(
        &mut self,
        name: String,
        manager: Option<String>,
        description: Option<String>,
        created: NaiveDate,
    ) -> &Department {
        let id = self.next_ids.department;
        self.next_ids.department += 1;
        self.departments.push(Department {
            id,
            name,
            manager,
            description,
            created,
        });
        self.departments.last().unwrap()
    }

    /// Departments ordered by name.
    pub fn departments(&self) -> Vec<&Department> {
        let mut sorted: Vec<&Department> = self.departments.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    /// Add a product; its category must exist.
    pub fn add_product(
        &mut self,
        name: String,
        code: Option<String>,
        price: Money,
        stock_quantity: u32,
        category_id: u64,
        created: NaiveDate,
    ) -> BizAnalyticsResult<&Product> {
        if !self.categories.iter().any(|c| c.id == category_id) {
            return Err(BizAnalyticsError::NotFound {
                entity: "Category",
                id: category_id,
            });
        }
        let id = self.next_ids.product;
        self.next_ids.product += 1;
        self.products.push(Product {
            id,
            name,
            code,
            price,
            stock_quantity,
            category_id,
            created,
        });
        Ok(self.products.last().unwrap())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: u64) -> BizAnalyticsResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(BizAnalyticsError::NotFound {
                entity: "Product",
                id,
            })
    }

    // -----------------------------------------------------------------------
    // Sales
    // -----------------------------------------------------------------------

    /// Record a sale. Product and department must exist; the total amount is
    /// fixed at entry as unit_price * quantity.
    #[allow(clippy::too_many_arguments)]
    pub fn add_sale(
        &mut self,
        sold_at: NaiveDateTime,
        quantity: u32,
        unit_price: Money,
        customer_name: Option<String>,
        notes: Option<String>,
        product_id: u64,
        department_id: u64,
    ) -> BizAnalyticsResult<&Sale> {
        self.product(product_id)?;
        if !self.departments.iter().any(|d| d.id == department_id) {
            return Err(BizAnalyticsError::NotFound {
                entity: "Department",
                id: department_id,
            });
        }
        let id = self.next_ids.sale;
        self.next_ids.sale += 1;
        self.sales.push(Sale {
            id,
            sold_at,
            quantity,
            unit_price,
            total_amount: unit_price * Decimal::from(quantity),
            customer_name,
            notes,
            product_id,
            department_id,
        });
        Ok(self.sales.last().unwrap())
    }

    /// Sales matching the filter, ordered by sale time descending.
    pub fn search_sales(&self, filter: &SaleFilter) -> Vec<&Sale> {
        let mut matched: Vec<&Sale> = self
            .sales
            .iter()
            .filter(|sale| {
                // Sales are only accepted with a valid product id, so the
                // lookup cannot fail here.
                let product = self
                    .products
                    .iter()
                    .find(|p| p.id == sale.product_id);
                match product {
                    Some(p) => filter.matches(sale, &p.name, p.category_id),
                    None => false,
                }
            })
            .collect();
        matched.sort_by(|a, b| b.sold_at.cmp(&a.sold_at));
        matched
    }

    /// All sales on the given calendar date, newest first.
    pub fn sales_for_date(&self, date: NaiveDate) -> Vec<&Sale> {
        let mut matched: Vec<&Sale> = self
            .sales
            .iter()
            .filter(|s| s.sold_at.date() == date)
            .collect();
        matched.sort_by(|a, b| b.sold_at.cmp(&a.sold_at));
        matched
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    // -----------------------------------------------------------------------
    // Generation from sales
    // -----------------------------------------------------------------------

    /// For each day in [start, end] with sales, upsert the financial record
    /// for that date from the day's rollup: price = average unit price,
    /// units = total quantity, variable cost and fixed costs from the
    /// estimation ratios, investment zero. Existing records for a date are
    /// overwritten and marked as generated; figures are recomputed.
    pub fn generate_from_sales(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        estimates: &CostEstimates,
    ) -> BizAnalyticsResult<GenerationSummary> {
        let in_range: Vec<Sale> = self
            .sales
            .iter()
            .filter(|s| {
                let date = s.sold_at.date();
                date >= start && date <= end
            })
            .cloned()
            .collect();

        let mut created = 0;
        let mut updated = 0;

        for day in rollup_sales_by_day(&in_range) {
            let inputs = FinancialInputs {
                date: day.date,
                fixed_costs: day.revenue * estimates.fixed_cost_ratio,
                variable_cost_per_unit: day.average_unit_price * estimates.variable_cost_ratio,
                price_per_unit: day.average_unit_price,
                units_sold: day.units,
                investment: Decimal::ZERO,
            };

            match self.records.iter_mut().find(|r| r.date() == day.date) {
                Some(existing) => {
                    existing.update_inputs(inputs)?;
                    existing.generated_from_sales = true;
                    updated += 1;
                }
                None => {
                    let id = self.next_ids.record;
                    let mut record = FinancialRecord::new(id, inputs)?;
                    record.generated_from_sales = true;
                    self.next_ids.record += 1;
                    self.records.push(record);
                    created += 1;
                }
            }
        }

        Ok(GenerationSummary { created, updated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn inputs(day: NaiveDate) -> FinancialInputs {
        FinancialInputs {
            date: day,
            fixed_costs: dec!(1000),
            variable_cost_per_unit: dec!(50),
            price_per_unit: dec!(200),
            units_sold: 100,
            investment: dec!(5000),
        }
    }

    fn seeded() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_category("Food".to_string(), None, date(2024, 1, 1));
        ledger.add_department("Sales".to_string(), None, None, date(2024, 1, 1));
        ledger
            .add_product(
                "Milk".to_string(),
                Some("ML-006".to_string()),
                dec!(35),
                300,
                1,
                date(2024, 1, 2),
            )
            .unwrap();
        ledger
    }

    #[test]
    fn test_record_crud_and_ordering() {
        let mut ledger = Ledger::new();
        let id1 = ledger.add_record(inputs(date(2024, 1, 10))).unwrap().id;
        let id2 = ledger.add_record(inputs(date(2024, 3, 5))).unwrap().id;
        assert_eq!((id1, id2), (1, 2));

        // Newest first
        let listed = ledger.records_by_date_desc();
        assert_eq!(listed[0].id, 2);
        assert_eq!(listed[1].id, 1);

        ledger.delete_record(1).unwrap();
        assert!(matches!(
            ledger.record(1),
            Err(BizAnalyticsError::NotFound { .. })
        ));

        // Ids are never reused
        let id3 = ledger.add_record(inputs(date(2024, 4, 1))).unwrap().id;
        assert_eq!(id3, 3);
    }

    #[test]
    fn test_sale_requires_existing_product_and_department() {
        let mut ledger = seeded();
        let when = date(2024, 5, 1).and_hms_opt(10, 0, 0).unwrap();
        assert!(ledger
            .add_sale(when, 2, dec!(35), None, None, 99, 1)
            .is_err());
        assert!(ledger
            .add_sale(when, 2, dec!(35), None, None, 1, 99)
            .is_err());
        let sale = ledger
            .add_sale(when, 2, dec!(35), None, None, 1, 1)
            .unwrap();
        assert_eq!(sale.total_amount, dec!(70));
    }

    #[test]
    fn test_generate_from_sales_creates_then_updates() {
        let mut ledger = seeded();
        let when = date(2024, 5, 10).and_hms_opt(9, 0, 0).unwrap();
        // Two sales on the same day: 2 + 3 units at 35 -> revenue 175, avg 35
        ledger
            .add_sale(when, 2, dec!(35), None, None, 1, 1)
            .unwrap();
        ledger
            .add_sale(when, 3, dec!(35), None, None, 1, 1)
            .unwrap();

        let summary = ledger
            .generate_from_sales(date(2024, 5, 1), date(2024, 5, 31), &CostEstimates::default())
            .unwrap();
        assert_eq!(summary, GenerationSummary { created: 1, updated: 0 });

        let record = ledger.record(1).unwrap();
        assert!(record.generated_from_sales);
        assert_eq!(record.inputs().units_sold, 5);
        assert_eq!(record.inputs().price_per_unit, dec!(35));
        // fixed = 10% of 175, variable = 60% of 35
        assert_eq!(record.inputs().fixed_costs, dec!(17.5));
        assert_eq!(record.inputs().variable_cost_per_unit, dec!(21.0));
        assert_eq!(record.inputs().investment, Decimal::ZERO);

        // Running again for the same range updates instead of creating
        let summary = ledger
            .generate_from_sales(date(2024, 5, 1), date(2024, 5, 31), &CostEstimates::default())
            .unwrap();
        assert_eq!(summary, GenerationSummary { created: 0, updated: 1 });
        assert_eq!(ledger.records().len(), 1);
    }

    #[test]
    fn test_search_sales_orders_descending() {
        let mut ledger = seeded();
        let morning = date(2024, 5, 10).and_hms_opt(9, 0, 0).unwrap();
        let evening = date(2024, 5, 10).and_hms_opt(20, 0, 0).unwrap();
        ledger
            .add_sale(morning, 1, dec!(35), Some("Alice".to_string()), None, 1, 1)
            .unwrap();
        ledger
            .add_sale(evening, 1, dec!(35), Some("Bob".to_string()), None, 1, 1)
            .unwrap();

        let all = ledger.search_sales(&SaleFilter::default());
        assert_eq!(all[0].customer_name.as_deref(), Some("Bob"));

        let filter = SaleFilter {
            customer_name_starts: Some("Al".to_string()),
            ..SaleFilter::default()
        };
        let matched = ledger.search_sales(&filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].customer_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_ledger_round_trip_preserves_counters() {
        let mut ledger = seeded();
        ledger.add_record(inputs(date(2024, 2, 1))).unwrap();
        let json = serde_json::to_string(&ledger).unwrap();
        let mut back: Ledger = serde_json::from_str(&json).unwrap();
        let id = back.add_record(inputs(date(2024, 2, 2))).unwrap().id;
        assert_eq!(id, 2);
    }
}
