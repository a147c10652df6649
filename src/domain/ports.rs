use super::catalog::Catalog;
use crate::error::Result;
use async_trait::async_trait;

/// Supplies the catalog a session is opened with. Loaded once, never written.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Catalog>;
}

pub type CatalogSourceBox = Box<dyn CatalogSource>;
