//! 本地商品目录：从 JSON 数组加载，按名称/描述做大小写无关的子串匹配

use crate::kernel::services::ports::{Product, SearchFuture, SearchProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct CatalogSearchProvider {
    products: Arc<Vec<Product>>,
    latency: Duration,
}

impl CatalogSearchProvider {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(products),
            latency: Duration::ZERO,
        }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let products: Vec<Product> =
            serde_json::from_str(&data).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(path = %path.display(), products = products.len(), "catalog loaded");
        Ok(Self::new(products))
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn matching_products(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

impl SearchProvider for CatalogSearchProvider {
    fn search(&self, query: &str) -> SearchFuture {
        let products = self.products.clone();
        let latency = self.latency;
        let query = query.to_string();
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            Ok(matching_products(&products, &query))
        })
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/catalog.rs"]
mod tests;
