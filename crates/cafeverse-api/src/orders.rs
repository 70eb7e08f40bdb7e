//! Order endpoints: creation, the customer's own orders, and the admin view.

use cafeverse_core::{OrderRecord, OrderSubmission};

use crate::client::CafeApiClient;
use crate::error::ApiError;
use crate::types::{
    AdminAction, AdminActionRequest, CancelOrderRequest, OrderCreated, OrderListResponse,
};

impl CafeApiClient {
    /// Submits a new order (`POST /api/order/`).
    ///
    /// Sent exactly once, with no overall timeout and no retry.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] on 401/403.
    /// - [`ApiError::Rejected`] on any other non-2xx status, or when the
    ///   envelope's `status` is not `"success"`; carries the backend message.
    /// - [`ApiError::Http`] on transport failure.
    /// - [`ApiError::Deserialize`] if the body is not the expected envelope.
    pub async fn create_order(
        &self,
        token: &str,
        submission: &OrderSubmission,
    ) -> Result<OrderCreated, ApiError> {
        let url = self.endpoint("api/order/")?;
        tracing::debug!(
            order_type = %submission.order_type,
            items = submission.items.len(),
            "submitting order"
        );
        let response = Self::authorized(self.http().post(url.clone()), token)
            .json(submission)
            .send()
            .await?;
        let envelope = Self::decode_envelope(response, url.as_str()).await?;
        Ok(OrderCreated::from_envelope(&envelope))
    }

    /// Lists the signed-in customer's orders (`GET /api/order/`).
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] on 401/403.
    /// - [`ApiError::Rejected`] on any other non-2xx status (after retries for 5xx).
    /// - [`ApiError::Http`] on network failure after all retries.
    /// - [`ApiError::Deserialize`] if the response shape is unexpected.
    pub async fn list_my_orders(&self, token: &str) -> Result<Vec<OrderRecord>, ApiError> {
        let url = self.endpoint("api/order/")?;
        let response: OrderListResponse = self.get_json(&url, Some(token)).await?;
        Ok(response.data)
    }

    /// Cancels one of the customer's orders (`PATCH /api/order/`).
    ///
    /// # Errors
    ///
    /// Same as [`CafeApiClient::create_order`].
    pub async fn cancel_order(&self, token: &str, order_id: i64) -> Result<(), ApiError> {
        let url = self.endpoint("api/order/")?;
        let response = Self::authorized(self.http().patch(url.clone()), token)
            .timeout(self.read_timeout())
            .json(&CancelOrderRequest { order_id })
            .send()
            .await?;
        Self::decode_envelope(response, url.as_str()).await?;
        tracing::info!(order_id, "order cancelled");
        Ok(())
    }

    /// Lists every order for staff (`GET /api/orders/`).
    ///
    /// # Errors
    ///
    /// Same as [`CafeApiClient::list_my_orders`].
    pub async fn list_all_orders(&self, token: &str) -> Result<Vec<OrderRecord>, ApiError> {
        let url = self.endpoint("api/orders/")?;
        self.get_json(&url, Some(token)).await
    }

    /// Applies a staff action to an order (`PATCH /api/orders/{id}/`).
    ///
    /// The admin endpoint answers with the updated order or an empty body;
    /// only the HTTP status is inspected.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] on 401/403.
    /// - [`ApiError::Rejected`] on any other non-2xx status.
    /// - [`ApiError::Http`] on transport failure.
    pub async fn update_order_status(
        &self,
        token: &str,
        order_id: i64,
        action: AdminAction,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/orders/{order_id}/"))?;
        let response = Self::authorized(self.http().patch(url.clone()), token)
            .timeout(self.read_timeout())
            .json(&AdminActionRequest { action })
            .send()
            .await?;
        Self::decode::<serde::de::IgnoredAny>(response, url.as_str())
            .await
            .or_else(|err| match err {
                // An empty 2xx body is not valid JSON but is still a success.
                ApiError::Deserialize { .. } => Ok(serde::de::IgnoredAny),
                other => Err(other),
            })?;
        tracing::info!(order_id, ?action, "order status updated");
        Ok(())
    }
}
