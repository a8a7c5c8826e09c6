use otocards_core::catalog;
use otocards_core::model::{Card, Category};

use crate::error::CatalogError;

/// Fetches the card catalog from the Catalog API, falling back to the
/// bundled deck on any failure.
///
/// Catalog-fetch failures are recovered locally and never surfaced: the
/// session is expected to start with *some* deck in all circumstances.
#[derive(Clone)]
pub struct CatalogService {
    base_url: String,
    client: reqwest::Client,
}

impl CatalogService {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch cards for a stack/category, degrading to the bundled catalog.
    pub async fn fetch(&self, stack: Option<&str>, category: Option<Category>) -> Vec<Card> {
        match self.try_fetch(stack, category).await {
            Ok(cards) => cards,
            Err(err) => {
                tracing::warn!(error = %err, "catalog fetch failed, using bundled catalog");
                let mut cards = catalog::bundled();
                if let Some(category) = category {
                    cards.retain(|card| card.category == category);
                }
                cards
            }
        }
    }

    async fn try_fetch(
        &self,
        stack: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<Card>, CatalogError> {
        let mut request = self
            .client
            .get(format!("{}/cards", self.base_url.trim_end_matches('/')));
        if let Some(stack) = stack {
            request = request.query(&[("stack", stack)]);
        }
        if let Some(category) = category {
            request = request.query(&[("category", category.as_str())]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_falls_back_to_bundled_deck() {
        // Port 1 is never bound; the request fails immediately.
        let service = CatalogService::new("http://127.0.0.1:1");

        let cards = service.fetch(Some(catalog::BUNDLED_STACK), None).await;
        assert_eq!(cards.len(), catalog::bundled().len());
    }

    #[tokio::test]
    async fn fallback_respects_category_filter() {
        let service = CatalogService::new("http://127.0.0.1:1");

        let cards = service.fetch(None, Some(Category::Otology)).await;
        assert!(!cards.is_empty());
        assert!(cards.iter().all(|c| c.category == Category::Otology));
    }
}
