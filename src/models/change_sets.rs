//! Incoming change-sets for create and write operations.
//!
//! Every field is a [`Patch`], so a change-set records exactly which fields the
//! caller touched. That list drives both the line description default and the
//! recompute queue.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patch::Patch;

/// Change-set for a sale order header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleOrderValues {
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub customer_id: Patch<Uuid>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub template_id: Patch<Uuid>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub website_description: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub validity_date: Patch<NaiveDate>,
}

impl SaleOrderValues {
    /// Column names of the fields this change-set touches.
    pub fn modified_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_present() {
            fields.push("name");
        }
        if self.customer_id.is_present() {
            fields.push("customer_id");
        }
        if self.template_id.is_present() {
            fields.push("template_id");
        }
        if self.website_description.is_present() {
            fields.push("website_description");
        }
        if self.validity_date.is_present() {
            fields.push("validity_date");
        }
        fields
    }
}

/// Change-set for a sale order line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleOrderLineValues {
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub order_id: Patch<Uuid>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub sequence: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub product_id: Patch<Uuid>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub product_uom_qty: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub uom_id: Patch<Uuid>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub price_unit: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub discount: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub website_description: Patch<String>,
}

impl SaleOrderLineValues {
    pub fn modified_fields(&self) -> Vec<&'static str> {
        [
            ("order_id", self.order_id.is_present()),
            ("sequence", self.sequence.is_present()),
            ("product_id", self.product_id.is_present()),
            ("name", self.name.is_present()),
            ("product_uom_qty", self.product_uom_qty.is_present()),
            ("uom_id", self.uom_id.is_present()),
            ("price_unit", self.price_unit.is_present()),
            ("discount", self.discount.is_present()),
            ("website_description", self.website_description.is_present()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
    }
}

/// Change-set for an optional product on a quotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleOrderOptionValues {
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub order_id: Patch<Uuid>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub sequence: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub product_id: Patch<Uuid>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub uom_id: Patch<Uuid>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub quantity: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub price_unit: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub discount: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_omitted")]
    pub website_description: Patch<String>,
}

impl SaleOrderOptionValues {
    pub fn modified_fields(&self) -> Vec<&'static str> {
        [
            ("order_id", self.order_id.is_present()),
            ("sequence", self.sequence.is_present()),
            ("product_id", self.product_id.is_present()),
            ("uom_id", self.uom_id.is_present()),
            ("name", self.name.is_present()),
            ("quantity", self.quantity.is_present()),
            ("price_unit", self.price_unit.is_present()),
            ("discount", self.discount.is_present()),
            ("website_description", self.website_description.is_present()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn modified_fields_lists_only_touched_fields() {
        let values = SaleOrderValues {
            template_id: Patch::Value(Uuid::new_v4()),
            website_description: Patch::Cleared,
            ..Default::default()
        };
        assert_eq!(
            values.modified_fields(),
            vec!["template_id", "website_description"]
        );
        assert!(SaleOrderValues::default().modified_fields().is_empty());
    }

    #[test]
    fn line_values_from_json() {
        let product = Uuid::new_v4();
        let values: SaleOrderLineValues = serde_json::from_value(json!({
            "product_id": product,
            "product_uom_qty": "2",
            "website_description": null,
        }))
        .unwrap();

        assert_eq!(values.product_id, Patch::Value(product));
        assert_eq!(values.product_uom_qty, Patch::Value(dec!(2)));
        assert_eq!(values.website_description, Patch::Cleared);
        assert!(values.name.is_omitted());
        assert_eq!(
            values.modified_fields(),
            vec!["product_id", "product_uom_qty", "website_description"]
        );
    }

    #[test]
    fn option_values_serialize_only_present_fields() {
        let values = SaleOrderOptionValues {
            name: Patch::Value("Extended warranty".to_string()),
            uom_id: Patch::Cleared,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            json!({ "uom_id": null, "name": "Extended warranty" })
        );
    }
}
