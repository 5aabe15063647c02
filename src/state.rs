//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds only immutable data: the parsed configuration and the upstream
//! client. Sessions live entirely in the client's cookie, so there is no
//! per-request state to share or lock.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::error::ProxyError;
use crate::proxy::Upstream;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub upstream: Upstream,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, ProxyError> {
        let upstream = Upstream::new(&config)?;
        Ok(Self { config: Arc::new(config), upstream })
    }
}
