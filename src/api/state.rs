//! Application state shared across handlers.

use crate::auth::{AuthState, SessionService};
use crate::order::OrderRepository;
use crate::product::ProductRepository;
use crate::upload::ImageStore;

/// Shared state for the API layer.
#[derive(Clone)]
pub struct AppState {
    /// Session authority: login, refresh rotation, logout.
    pub sessions: SessionService,
    /// Access guard state for the auth middleware.
    pub auth: AuthState,
    /// Product catalog.
    pub products: ProductRepository,
    /// Orders.
    pub orders: OrderRepository,
    /// Validated image storage.
    pub images: ImageStore,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        sessions: SessionService,
        auth: AuthState,
        products: ProductRepository,
        orders: OrderRepository,
        images: ImageStore,
    ) -> Self {
        Self {
            sessions,
            auth,
            products,
            orders,
            images,
        }
    }
}
