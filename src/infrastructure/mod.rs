//! Infrastructure layer - Catalog, services and observability implementations

pub mod experiment;
pub mod logging;
pub mod observability;
pub mod services;
