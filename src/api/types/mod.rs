//! API request, response and error types

pub mod assignment;
pub mod error;
pub mod event;
pub mod json;

pub use assignment::{AssignmentRequest, AssignmentResponse};
pub use error::{ApiError, ApiErrorResponse};
pub use event::{BatchRequest, BatchResponse, EventResponse};
pub use json::Json;
