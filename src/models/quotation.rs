use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::{QuotationStatus, StatusChange};

pub const COLLECTION: &str = "quotations";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationItem {
    pub description: String,
    pub sku: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl QuotationItem {
    /// `None` when the product does not fit in a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.quantity
            .checked_mul(self.unit_price)
            .map(|total| total.round_dp(2))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    pub folio: String,
    pub request_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub branch_id: Option<String>,
    pub items: Vec<QuotationItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub notes: Option<String>,
    pub valid_until: Option<NaiveDate>,
    pub status: QuotationStatus,
    pub created_by: String,
    #[serde(default)]
    pub status_history: Vec<StatusChange<QuotationStatus>>,
}

/// Subtotal, IVA and total rounded to cents, or `None` on overflow.
pub fn totals(items: &[QuotationItem], tax_rate: Decimal) -> Option<(Decimal, Decimal, Decimal)> {
    let subtotal = items.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.line_total()?)
    })?;
    let tax = subtotal.checked_mul(tax_rate)?.round_dp(2);
    Some((subtotal, tax, subtotal.checked_add(tax)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn item(qty: &str, price: &str) -> QuotationItem {
        QuotationItem {
            description: "Cemento gris 50kg".into(),
            sku: None,
            quantity: Decimal::from_str(qty).unwrap(),
            unit_price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn totals_apply_tax_on_subtotal() {
        let items = vec![item("10", "215.50"), item("2.5", "89.90")];
        let (subtotal, tax, total) = totals(&items, Decimal::from_str("0.16").unwrap()).unwrap();
        assert_eq!(subtotal, Decimal::from_str("2379.75").unwrap());
        assert_eq!(tax, Decimal::from_str("380.76").unwrap());
        assert_eq!(total, Decimal::from_str("2760.51").unwrap());
    }

    #[test]
    fn overflowing_amounts_yield_none() {
        let huge = item("79228162514264337593543950335", "2");
        assert_eq!(huge.line_total(), None);
        let max = item("79228162514264337593543950335", "1");
        assert!(max.line_total().is_some());
        assert_eq!(totals(&[max.clone(), max], Decimal::from_str("0.16").unwrap()), None);
    }
}
