//! Menu catalog endpoint.

use cafeverse_core::MenuCategory;

use crate::client::CafeApiClient;
use crate::error::ApiError;
use crate::types::{MenuResponse, RawMenuCategory};

impl CafeApiClient {
    /// Fetches the public menu (`GET /api/menu/`), grouped by category.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Rejected`] on a non-2xx answer (after retries for 5xx).
    /// - [`ApiError::Http`] on network failure after all retries.
    /// - [`ApiError::Deserialize`] if the response shape is unexpected.
    pub async fn fetch_menu(&self) -> Result<Vec<MenuCategory>, ApiError> {
        let url = self.endpoint("api/menu/")?;
        let response: MenuResponse = self.get_json(&url, None).await?;
        let categories: Vec<MenuCategory> = response
            .data
            .into_iter()
            .map(RawMenuCategory::into_category)
            .collect();
        tracing::debug!(categories = categories.len(), "menu fetched");
        Ok(categories)
    }
}
