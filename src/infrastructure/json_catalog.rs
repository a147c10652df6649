use crate::domain::catalog::Catalog;
use crate::domain::ports::CatalogSource;
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads the catalog from a JSON file shaped like
/// `{ "products": [{ "name": "콜라", "price": 1100 }], "cash": [500, 1000] }`.
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn load(&self) -> Result<Catalog> {
        let bytes = tokio::fs::read(&self.path).await?;
        let catalog: Catalog = serde_json::from_slice(&bytes)?;
        catalog.validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use crate::error::VendingError;
    use std::io::Write;

    fn write_json(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_valid_catalog() {
        let file = write_json(
            r#"{"products":[{"name":"콜라","price":1100},{"name":"물","price":600}],"cash":[500,1000]}"#,
        );
        let catalog = JsonFileCatalog::new(file.path()).load().await.unwrap();

        assert_eq!(catalog.products().len(), 2);
        assert_eq!(catalog.products()[1].name, "물");
        assert_eq!(catalog.cash_denominations(), &[Money::new(500), Money::new(1000)]);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonFileCatalog::new(dir.path().join("absent.json")).load().await;
        assert!(matches!(result, Err(VendingError::IoError(_))));
    }

    #[tokio::test]
    async fn test_malformed_json_is_json_error() {
        let file = write_json(r#"{"products": [ }"#);
        let result = JsonFileCatalog::new(file.path()).load().await;
        assert!(matches!(result, Err(VendingError::JsonError(_))));
    }

    #[tokio::test]
    async fn test_invalid_catalog_is_rejected() {
        let file = write_json(r#"{"products":[{"name":"콜라","price":0}],"cash":[500]}"#);
        let result = JsonFileCatalog::new(file.path()).load().await;
        assert!(matches!(result, Err(VendingError::CatalogError(_))));
    }
}
