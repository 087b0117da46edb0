//! Sale entries, the daily rollup feeding the financial records, and the
//! sale search filter.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Money;

/// One recorded sale. `total_amount` is fixed at entry time as
/// `unit_price * quantity` and stored with the sale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sale {
    pub id: u64,
    pub sold_at: NaiveDateTime,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub product_id: u64,
    pub department_id: u64,
}

/// Aggregated sales for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySales {
    pub date: NaiveDate,
    /// Sum of total_amount across the day's sales
    pub revenue: Money,
    /// Sum of quantity
    pub units: u32,
    /// revenue / units, 0 when no units were sold
    pub average_unit_price: Money,
}

/// Group sales by the calendar date of `sold_at`, ascending by date.
pub fn rollup_sales_by_day(sales: &[Sale]) -> Vec<DailySales> {
    let mut days: BTreeMap<NaiveDate, (Decimal, u32)> = BTreeMap::new();
    for sale in sales {
        let entry = days.entry(sale.sold_at.date()).or_insert((Decimal::ZERO, 0));
        entry.0 += sale.total_amount;
        entry.1 += sale.quantity;
    }

    days.into_iter()
        .map(|(date, (revenue, units))| DailySales {
            date,
            revenue,
            units,
            average_unit_price: if units > 0 {
                revenue / Decimal::from(units)
            } else {
                Decimal::ZERO
            },
        })
        .collect()
}

/// Ratios used to estimate a day's cost structure from its sales when
/// generating financial records: variable cost per unit as a share of the
/// average price, fixed costs as a share of revenue. Investment is always
/// estimated as zero and can be set manually afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostEstimates {
    pub variable_cost_ratio: Decimal,
    pub fixed_cost_ratio: Decimal,
}

impl Default for CostEstimates {
    fn default() -> Self {
        Self {
            variable_cost_ratio: dec!(0.6),
            fixed_cost_ratio: dec!(0.1),
        }
    }
}

/// Search criteria for sales. Unset fields match everything; set fields
/// are combined with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleFilter {
    pub start: Option<NaiveDateTime>,
    /// Exclusive upper bound on sale time; pass the following day's
    /// midnight to cover a whole calendar day regardless of sub-second
    /// precision
    pub end: Option<NaiveDateTime>,
    /// Match sales whose product belongs to any of these categories
    pub category_ids: Vec<u64>,
    pub department_ids: Vec<u64>,
    pub customer_name_starts: Option<String>,
    pub customer_name_ends: Option<String>,
    pub product_name_starts: Option<String>,
    pub product_name_ends: Option<String>,
}

impl SaleFilter {
    /// Whether the sale matches, given the name and category of its product.
    pub fn matches(&self, sale: &Sale, product_name: &str, product_category_id: u64) -> bool {
        if let Some(start) = self.start {
            if sale.sold_at < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if sale.sold_at >= end {
                return false;
            }
        }
        if !self.category_ids.is_empty() && !self.category_ids.contains(&product_category_id) {
            return false;
        }
        if !self.department_ids.is_empty() && !self.department_ids.contains(&sale.department_id) {
            return false;
        }
        if let Some(ref prefix) = self.customer_name_starts {
            match sale.customer_name {
                Some(ref name) if name.starts_with(prefix.as_str()) => {}
                _ => return false,
            }
        }
        if let Some(ref suffix) = self.customer_name_ends {
            match sale.customer_name {
                Some(ref name) if name.ends_with(suffix.as_str()) => {}
                _ => return false,
            }
        }
        if let Some(ref prefix) = self.product_name_starts {
            if !product_name.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(ref suffix) = self.product_name_ends {
            if !product_name.ends_with(suffix.as_str()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sale(id: u64, day: u32, hour: u32, quantity: u32, unit_price: Decimal) -> Sale {
        Sale {
            id,
            sold_at: NaiveDate::from_ymd_opt(2024, 5, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            quantity,
            unit_price,
            total_amount: unit_price * Decimal::from(quantity),
            customer_name: Some(format!("Customer {}", id)),
            notes: None,
            product_id: 1,
            department_id: 1,
        }
    }

    #[test]
    fn test_rollup_groups_by_calendar_date() {
        let sales = vec![
            sale(1, 10, 9, 2, dec!(100)),
            sale(2, 10, 18, 3, dec!(200)),
            sale(3, 11, 12, 1, dec!(50)),
        ];
        let days = rollup_sales_by_day(&sales);
        assert_eq!(days.len(), 2);
        // Day 10: revenue 200 + 600 = 800, units 5, avg 160
        assert_eq!(days[0].revenue, dec!(800));
        assert_eq!(days[0].units, 5);
        assert_eq!(days[0].average_unit_price, dec!(160));
        assert_eq!(days[1].revenue, dec!(50));
    }

    #[test]
    fn test_default_cost_estimates() {
        let estimates = CostEstimates::default();
        assert_eq!(estimates.variable_cost_ratio, dec!(0.6));
        assert_eq!(estimates.fixed_cost_ratio, dec!(0.1));
    }

    #[test]
    fn test_filter_customer_prefix_and_category() {
        let s = sale(4, 10, 9, 1, dec!(10));
        let mut filter = SaleFilter {
            customer_name_starts: Some("Customer".to_string()),
            ..SaleFilter::default()
        };
        assert!(filter.matches(&s, "Milk", 3));

        filter.category_ids = vec![1, 2];
        assert!(!filter.matches(&s, "Milk", 3));
    }

    #[test]
    fn test_filter_end_bound_covers_whole_final_day() {
        // A sale in the last second of the end day, with sub-second
        // precision, must still match when the bound is the next day's
        // midnight
        let mut late = sale(6, 10, 23, 1, dec!(10));
        late.sold_at = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 750)
            .unwrap();
        let next_midnight = NaiveDate::from_ymd_opt(2024, 5, 11)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let filter = SaleFilter {
            end: Some(next_midnight),
            ..SaleFilter::default()
        };
        assert!(filter.matches(&late, "Milk", 3));

        // The bound itself is excluded: a sale at exactly that midnight
        // belongs to the next day
        let mut midnight = late.clone();
        midnight.sold_at = next_midnight;
        assert!(!filter.matches(&midnight, "Milk", 3));
    }

    #[test]
    fn test_filter_product_name_suffix() {
        let s = sale(5, 10, 9, 1, dec!(10));
        let filter = SaleFilter {
            product_name_ends: Some("Book".to_string()),
            ..SaleFilter::default()
        };
        assert!(filter.matches(&s, "C# Programming Book", 5));
        assert!(!filter.matches(&s, "Milk", 3));
    }
}
