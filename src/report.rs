//! Restock alert computation
//!
//! Pure aggregation over sold line items. Revenue drives the ranking:
//! revenue per category, deterministic tie-break, then the best-selling
//! products inside the winning category with a low-stock flag.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::db::reports::SalesRow;

/// Stock at or below this is flagged for restock.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// How many products to surface from the top category.
const TOP_PRODUCT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Decimal,
    /// Share of total revenue, percent rounded to one decimal
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProduct {
    pub product_id: i64,
    pub name: String,
    pub revenue: Decimal,
    pub quantity_in_stock: i32,
    pub low_stock: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RestockReport {
    NoSignal {
        message: String,
    },
    Alert {
        top_selling_category: String,
        percentage: f64,
        alert: String,
        breakdown: Vec<CategoryRevenue>,
        top_products: Vec<TopProduct>,
    },
}

/// Aggregate sold line items into a restock report.
///
/// Ties on revenue break by category name ascending and product id
/// ascending, so the same sales history always produces the same report.
pub fn compute_restock_report(rows: &[SalesRow]) -> RestockReport {
    if rows.is_empty() {
        return RestockReport::NoSignal {
            message: "No sales recorded yet. Record some orders to see restock alerts."
                .to_string(),
        };
    }

    let mut revenue_by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
    for row in rows {
        let revenue = Decimal::from(row.quantity) * row.price_at_purchase;
        *revenue_by_category.entry(row.category.as_str()).or_default() += revenue;
    }

    let total: Decimal = revenue_by_category.values().copied().sum();
    if total.is_zero() {
        return RestockReport::NoSignal {
            message: "Sales recorded but no revenue yet. Restock alerts need priced sales."
                .to_string(),
        };
    }

    let mut breakdown: Vec<CategoryRevenue> = revenue_by_category
        .into_iter()
        .map(|(category, revenue)| CategoryRevenue {
            category: category.to_string(),
            share_percent: share_percent(revenue, total),
            revenue,
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.category.cmp(&b.category))
    });

    let top = breakdown[0].clone();

    let mut by_product: BTreeMap<i64, TopProduct> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.category == top.category) {
        let revenue = Decimal::from(row.quantity) * row.price_at_purchase;
        by_product
            .entry(row.product_id)
            .and_modify(|p| p.revenue += revenue)
            .or_insert_with(|| TopProduct {
                product_id: row.product_id,
                name: row.product_name.clone(),
                revenue,
                quantity_in_stock: row.quantity_in_stock,
                low_stock: row.quantity_in_stock <= LOW_STOCK_THRESHOLD,
            });
    }
    let mut top_products: Vec<TopProduct> = by_product.into_values().collect();
    top_products.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    top_products.truncate(TOP_PRODUCT_LIMIT);

    let alert = format!(
        "{} drives {:.1}% of your revenue. Consider restocking its top products.",
        top.category, top.share_percent
    );

    RestockReport::Alert {
        top_selling_category: top.category,
        percentage: top.share_percent,
        alert,
        breakdown,
        top_products,
    }
}

fn share_percent(revenue: Decimal, total: Decimal) -> f64 {
    ((revenue / total) * Decimal::from(100))
        .round_dp(1)
        .to_f64()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        product_id: i64,
        name: &str,
        category: &str,
        stock: i32,
        quantity: i32,
        price: &str,
    ) -> SalesRow {
        SalesRow {
            product_id,
            product_name: name.to_string(),
            category: category.to_string(),
            quantity_in_stock: stock,
            quantity,
            price_at_purchase: price.parse().unwrap(),
        }
    }

    #[test]
    fn no_rows_yields_no_signal() {
        match compute_restock_report(&[]) {
            RestockReport::NoSignal { message } => assert!(message.contains("No sales")),
            other => panic!("expected NoSignal, got {other:?}"),
        }
    }

    #[test]
    fn zero_revenue_yields_no_signal() {
        let rows = vec![row(1, "Freebie", "Promo", 10, 3, "0.00")];
        match compute_restock_report(&rows) {
            RestockReport::NoSignal { message } => assert!(message.contains("no revenue")),
            other => panic!("expected NoSignal, got {other:?}"),
        }
    }

    #[test]
    fn top_category_is_by_revenue_not_quantity() {
        // Accessories sell more units, Phones earn more revenue
        let rows = vec![
            row(1, "Budget Phone", "Phones", 8, 2, "150.00"),
            row(2, "USB Cable", "Accessories", 20, 10, "5.00"),
        ];
        match compute_restock_report(&rows) {
            RestockReport::Alert {
                top_selling_category,
                percentage,
                breakdown,
                ..
            } => {
                assert_eq!(top_selling_category, "Phones");
                // 300 of 350 total
                assert!((percentage - 85.7).abs() < 0.05);
                assert_eq!(breakdown.len(), 2);
                assert_eq!(breakdown[0].category, "Phones");
                assert_eq!(breakdown[1].category, "Accessories");
            }
            other => panic!("expected Alert, got {other:?}"),
        }
    }

    #[test]
    fn revenue_tie_breaks_by_category_name() {
        let rows = vec![
            row(1, "Widget", "Zeta", 10, 1, "50.00"),
            row(2, "Gadget", "Alpha", 10, 1, "50.00"),
        ];
        match compute_restock_report(&rows) {
            RestockReport::Alert {
                top_selling_category,
                ..
            } => assert_eq!(top_selling_category, "Alpha"),
            other => panic!("expected Alert, got {other:?}"),
        }
    }

    #[test]
    fn top_products_ranked_and_capped() {
        let rows = vec![
            row(1, "A", "Phones", 10, 1, "10.00"),
            row(2, "B", "Phones", 10, 1, "40.00"),
            row(3, "C", "Phones", 10, 1, "30.00"),
            row(4, "D", "Phones", 10, 1, "20.00"),
        ];
        match compute_restock_report(&rows) {
            RestockReport::Alert { top_products, .. } => {
                let ids: Vec<i64> = top_products.iter().map(|p| p.product_id).collect();
                assert_eq!(ids, vec![2, 3, 4]);
            }
            other => panic!("expected Alert, got {other:?}"),
        }
    }

    #[test]
    fn repeat_sales_of_one_product_accumulate() {
        let rows = vec![
            row(1, "Charger", "Accessories", 4, 2, "10.00"),
            row(1, "Charger", "Accessories", 4, 3, "10.00"),
            row(2, "Case", "Accessories", 9, 1, "30.00"),
        ];
        match compute_restock_report(&rows) {
            RestockReport::Alert { top_products, .. } => {
                assert_eq!(top_products[0].product_id, 1);
                assert_eq!(
                    top_products[0].revenue,
                    "50.00".parse::<Decimal>().unwrap()
                );
                assert!(top_products[0].low_stock);
                assert!(!top_products[1].low_stock);
            }
            other => panic!("expected Alert, got {other:?}"),
        }
    }

    #[test]
    fn product_revenue_tie_breaks_by_id() {
        let rows = vec![
            row(9, "Late", "Phones", 10, 1, "25.00"),
            row(3, "Early", "Phones", 10, 1, "25.00"),
        ];
        match compute_restock_report(&rows) {
            RestockReport::Alert { top_products, .. } => {
                assert_eq!(top_products[0].product_id, 3);
            }
            other => panic!("expected Alert, got {other:?}"),
        }
    }
}
