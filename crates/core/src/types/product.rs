//! Catalog products.
//!
//! Products come read-only from the billing server and are never mutated
//! locally. Records from its document store carry the id as `_id`, others as
//! `id`; `_id` wins when both are present.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product in the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProduct", rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Image URL.
    pub image: String,
    /// Current (discounted) price.
    pub price: Price,
    /// Pre-discount price, shown struck through when present.
    pub regular_price: Option<Price>,
    /// Units sold, as reported by the billing server.
    pub sales: u64,
}

impl Product {
    /// The minimal projection stored in the cart.
    #[must_use]
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            description: self.description.clone(),
        }
    }

    /// Whether the product is sold below its regular price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.regular_price.is_some_and(|regular| regular > self.price)
    }

    /// Case-insensitive substring match on name, description and category.
    ///
    /// `needle` must already be lower-cased.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }
}

/// Wire shape accepted from the billing server.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    #[serde(rename = "_id")]
    document_id: Option<ProductId>,
    id: Option<ProductId>,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    image: String,
    price: Price,
    regular_price: Option<Price>,
    #[serde(default)]
    sales: u64,
}

impl TryFrom<RawProduct> for Product {
    type Error = String;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let id = raw
            .document_id
            .or(raw.id)
            .ok_or_else(|| format!("product {:?} has neither `_id` nor `id`", raw.name))?;

        Ok(Self {
            id,
            name: raw.name,
            description: raw.description,
            category: raw.category,
            image: raw.image,
            price: raw.price,
            regular_price: raw.regular_price,
            sales: raw.sales,
        })
    }
}

/// The subset of a product that is copied into a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub description: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Basmati Rice".to_string(),
            description: "Long grain, 5kg bag".to_string(),
            category: "Groceries".to_string(),
            image: "https://img.example/rice.jpg".to_string(),
            price: Price::from(650),
            regular_price: Some(Price::from(720)),
            sales: 31,
        }
    }

    #[test]
    fn test_deserialize_document_id() {
        let json = r#"{
            "_id": "665f1c",
            "name": "Tea",
            "description": "Assam leaf",
            "category": "Beverages",
            "image": "tea.jpg",
            "price": 120,
            "regularPrice": 150,
            "sales": 8
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new("665f1c"));
        assert_eq!(product.regular_price, Some(Price::from(150)));
        assert_eq!(product.sales, 8);
    }

    #[test]
    fn test_deserialize_plain_id_and_defaults() {
        let json = r#"{"id": 7, "name": "Salt", "price": 35.5}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new("7"));
        assert_eq!(product.category, "");
        assert_eq!(product.regular_price, None);
        assert_eq!(product.sales, 0);
    }

    #[test]
    fn test_document_id_preferred_over_id() {
        let json = r#"{"_id": "doc", "id": "legacy", "name": "Oil", "price": 200}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new("doc"));
    }

    #[test]
    fn test_deserialize_without_any_id_fails() {
        let json = r#"{"name": "Ghost", "price": 1}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_summary_projection() {
        let summary = sample().summary();
        assert_eq!(summary.id, ProductId::new("p1"));
        assert_eq!(summary.price, Price::from(650));
        assert_eq!(summary.image, "https://img.example/rice.jpg");
    }

    #[test]
    fn test_matches_any_text_field() {
        let product = sample();
        assert!(product.matches("basmati"));
        assert!(product.matches("5kg"));
        assert!(product.matches("grocer"));
        assert!(!product.matches("lentil"));
    }

    #[test]
    fn test_is_discounted() {
        let mut product = sample();
        assert!(product.is_discounted());
        product.regular_price = Some(product.price);
        assert!(!product.is_discounted());
        product.regular_price = None;
        assert!(!product.is_discounted());
    }
}
