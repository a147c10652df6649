use crate::domain::money::Money;
use crate::error::{Result, VendingError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A product offered by the machine. The name doubles as its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: Money,
}

impl Product {
    pub fn new(name: impl Into<String>, price: i64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VendingError::ValidationError(
                "Product name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            name,
            price: Money::positive(price)?,
        })
    }
}

/// The read-only product list and accepted cash denominations.
///
/// Deserializes from `{ "products": [...], "cash": [...] }`. Instances built
/// through [`Catalog::new`] or [`Catalog::validated`] uphold:
/// at least one product, unique names, positive prices and denominations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
    #[serde(rename = "cash")]
    cash_denominations: Vec<Money>,
}

impl Catalog {
    pub fn new(products: Vec<Product>, cash_denominations: Vec<Money>) -> Result<Self> {
        Self {
            products,
            cash_denominations,
        }
        .validated()
    }

    /// Checks the catalog invariants, consuming and returning it on success.
    pub fn validated(self) -> Result<Self> {
        if self.products.is_empty() {
            return Err(VendingError::CatalogError(
                "Catalog has no products".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            if product.name.trim().is_empty() {
                return Err(VendingError::CatalogError(
                    "Product name must not be empty".to_string(),
                ));
            }
            if !product.price.is_positive() {
                return Err(VendingError::CatalogError(format!(
                    "Product '{}' has non-positive price {}",
                    product.name,
                    product.price.value()
                )));
            }
            if !seen.insert(product.name.as_str()) {
                return Err(VendingError::CatalogError(format!(
                    "Duplicate product name '{}'",
                    product.name
                )));
            }
        }

        if let Some(bad) = self.cash_denominations.iter().find(|d| !d.is_positive()) {
            return Err(VendingError::CatalogError(format!(
                "Cash denomination must be positive, got {}",
                bad.value()
            )));
        }

        Ok(self)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn cash_denominations(&self) -> &[Money] {
        &self.cash_denominations
    }

    pub fn find_product(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    pub fn accepts(&self, denomination: Money) -> bool {
        self.cash_denominations.contains(&denomination)
    }
}
