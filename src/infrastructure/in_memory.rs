use crate::domain::catalog::{Catalog, Product};
use crate::domain::money::Money;
use crate::domain::ports::CatalogSource;
use crate::error::Result;
use async_trait::async_trait;

/// A catalog source backed by data held in memory.
///
/// `StaticCatalog::default()` serves the machine's built-in product list.
/// The data is validated on every load.
#[derive(Clone)]
pub struct StaticCatalog {
    products: Vec<Product>,
    cash: Vec<Money>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>, cash: Vec<Money>) -> Self {
        Self { products, cash }
    }
}

impl From<Catalog> for StaticCatalog {
    fn from(catalog: Catalog) -> Self {
        Self::new(
            catalog.products().to_vec(),
            catalog.cash_denominations().to_vec(),
        )
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        let products = [("콜라", 1100), ("물", 600), ("커피", 700)]
            .into_iter()
            .map(|(name, price)| Product {
                name: name.to_string(),
                price: Money::new(price),
            })
            .collect();
        let cash = [100, 500, 1000, 5000, 10000]
            .into_iter()
            .map(Money::new)
            .collect();

        Self::new(products, cash)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load(&self) -> Result<Catalog> {
        Catalog::new(self.products.clone(), self.cash.clone())
    }
}
