//! API middleware components

pub mod auth;
pub mod logging;
pub mod metrics;

pub use auth::BearerToken;
pub use logging::{logging_middleware, REQUEST_ID_HEADER};
pub use metrics::metrics_middleware;
