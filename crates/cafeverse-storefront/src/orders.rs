//! The customer's order history and the staff dashboard.

use std::sync::Arc;

use cafeverse_api::{AdminAction, ApiError, CafeApiClient};
use cafeverse_core::{filter_orders, OrderRecord, StatusCounts, StatusFilter, TypeFilter};

use crate::auth::{AuthContext, LoginReason};
use crate::error::OrdersError;

/// The signed-in customer's orders, with cancellation of pending ones.
#[derive(Debug)]
pub struct OrderTracker {
    client: CafeApiClient,
    auth: Arc<dyn AuthContext>,
    orders: Vec<OrderRecord>,
}

impl OrderTracker {
    /// # Errors
    ///
    /// [`OrdersError::LoginRequired`] when nobody is signed in; a login is
    /// requested.
    pub fn open(client: CafeApiClient, auth: Arc<dyn AuthContext>) -> Result<Self, OrdersError> {
        if auth.current_actor().is_none() {
            auth.request_login(LoginReason::ViewOrders);
            return Err(OrdersError::LoginRequired(LoginReason::ViewOrders));
        }
        Ok(Self {
            client,
            auth,
            orders: Vec::new(),
        })
    }

    /// Reloads the order list from the backend.
    ///
    /// # Errors
    ///
    /// [`OrdersError::LoginRequired`] when the session is gone or the backend
    /// refuses the token; [`OrdersError::Api`] for anything else.
    pub async fn refresh(&mut self) -> Result<&[OrderRecord], OrdersError> {
        let token = session_token(self.auth.as_ref(), LoginReason::ViewOrders)?;
        let orders = self
            .client
            .list_my_orders(&token)
            .await
            .map_err(|e| expire_on_unauthorized(self.auth.as_ref(), e))?;
        tracing::debug!(orders = orders.len(), "orders loaded");
        self.orders = orders;
        Ok(&self.orders)
    }

    #[must_use]
    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    #[must_use]
    pub fn visible(&self, status: StatusFilter) -> Vec<&OrderRecord> {
        filter_orders(&self.orders, status, TypeFilter::All)
    }

    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.orders)
    }

    /// Cancels a pending order from the loaded list, then reloads.
    ///
    /// # Errors
    ///
    /// - [`OrdersError::UnknownOrder`] if `order_id` is not loaded.
    /// - [`OrdersError::NotCancellable`] unless the order is pending; no
    ///   request is sent.
    /// - Otherwise as [`OrderTracker::refresh`], with a backend refusal
    ///   carrying its message in [`OrdersError::Api`].
    pub async fn cancel(&mut self, order_id: i64) -> Result<(), OrdersError> {
        let order = self
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .ok_or(OrdersError::UnknownOrder(order_id))?;
        if !order.is_cancellable() {
            return Err(OrdersError::NotCancellable {
                id: order_id,
                status: order.status,
            });
        }

        let token = session_token(self.auth.as_ref(), LoginReason::ViewOrders)?;
        self.client
            .cancel_order(&token, order_id)
            .await
            .map_err(|e| expire_on_unauthorized(self.auth.as_ref(), e))?;
        self.refresh().await?;
        Ok(())
    }
}

/// Every order, for actors with the `admin` role.
#[derive(Debug)]
pub struct AdminDashboard {
    client: CafeApiClient,
    auth: Arc<dyn AuthContext>,
    orders: Vec<OrderRecord>,
}

impl AdminDashboard {
    /// # Errors
    ///
    /// - [`OrdersError::LoginRequired`] when nobody is signed in.
    /// - [`OrdersError::AdminOnly`] for a signed-in non-admin.
    pub fn open(client: CafeApiClient, auth: Arc<dyn AuthContext>) -> Result<Self, OrdersError> {
        let Some(actor) = auth.current_actor() else {
            auth.request_login(LoginReason::AdminDashboard);
            return Err(OrdersError::LoginRequired(LoginReason::AdminDashboard));
        };
        if !actor.is_admin() {
            tracing::warn!(user_id = actor.id, "non-admin tried to open the dashboard");
            return Err(OrdersError::AdminOnly);
        }
        Ok(Self {
            client,
            auth,
            orders: Vec::new(),
        })
    }

    /// # Errors
    ///
    /// Same as [`OrderTracker::refresh`].
    pub async fn refresh(&mut self) -> Result<&[OrderRecord], OrdersError> {
        let token = session_token(self.auth.as_ref(), LoginReason::AdminDashboard)?;
        let orders = self
            .client
            .list_all_orders(&token)
            .await
            .map_err(|e| expire_on_unauthorized(self.auth.as_ref(), e))?;
        tracing::debug!(orders = orders.len(), "dashboard loaded");
        self.orders = orders;
        Ok(&self.orders)
    }

    #[must_use]
    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    #[must_use]
    pub fn visible(&self, status: StatusFilter, order_type: TypeFilter) -> Vec<&OrderRecord> {
        filter_orders(&self.orders, status, order_type)
    }

    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.orders)
    }

    /// Marks an order complete, then reloads the dashboard.
    ///
    /// # Errors
    ///
    /// Same as [`AdminDashboard::refresh`].
    pub async fn mark_complete(&mut self, order_id: i64) -> Result<(), OrdersError> {
        let token = session_token(self.auth.as_ref(), LoginReason::AdminDashboard)?;
        self.client
            .update_order_status(&token, order_id, AdminAction::MarkComplete)
            .await
            .map_err(|e| expire_on_unauthorized(self.auth.as_ref(), e))?;
        self.refresh().await?;
        Ok(())
    }
}

fn session_token(auth: &dyn AuthContext, reason: LoginReason) -> Result<String, OrdersError> {
    auth.token().ok_or_else(|| {
        auth.request_login(reason);
        OrdersError::LoginRequired(reason)
    })
}

fn expire_on_unauthorized(auth: &dyn AuthContext, err: ApiError) -> OrdersError {
    if let ApiError::Unauthorized { status, .. } = err {
        tracing::warn!(status, "session rejected by backend");
        auth.request_login(LoginReason::SessionExpired);
        OrdersError::LoginRequired(LoginReason::SessionExpired)
    } else {
        OrdersError::Api(err)
    }
}
