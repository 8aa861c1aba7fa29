use serde::{Deserialize, Serialize};

use crudkit_core::{FieldKind, FieldSpec, Schema};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Unit price in the shop's currency.
    #[serde(serialize_with = "crudkit_core::number::serialize")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Schema for Product {
    const KIND: &'static str = "Product";
    const COLLECTION: &'static str = "products";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", FieldKind::String),
        FieldSpec::required("price", FieldKind::Number),
        FieldSpec::optional("description", FieldKind::String),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn description_is_optional() {
        let p = Product::validate(&json!({ "name": "Widget", "price": 9.99 })).unwrap();
        assert_eq!(p.description, None);
        assert!(!p.to_document().contains_key("description"));
    }

    #[test]
    fn price_accepts_numeric_strings() {
        let p = Product::validate(&json!({ "name": "Widget", "price": "12.50" })).unwrap();
        assert_eq!(p.price, 12.5);
    }

    #[test]
    fn price_rejects_words() {
        let err = Product::validate(&json!({ "name": "Widget", "price": "cheap" })).unwrap_err();
        assert_eq!(err.errors()[0].field, "price");
        assert!(err.to_string().starts_with("Product validation failed: price: Cast to Number"));
    }

    #[test]
    fn description_can_be_cleared_by_update() {
        let p = Product::validate(&json!({
            "name": "Widget",
            "price": 3,
            "description": "blue",
        }))
        .unwrap();
        let cleared = p.apply_patch(&json!({ "description": null })).unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.price, 3.0);
    }
}
